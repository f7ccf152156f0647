/// Validate a role name: 1-50 chars, letters, numbers, underscores and hyphens only.
pub fn validate_role_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Some("Role name is required".to_string());
    }
    if trimmed.chars().count() > 50 {
        return Some("Role name must be at most 50 characters".to_string());
    }
    if !trimmed
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
    {
        return Some(
            "Role name may only contain letters, numbers, underscores, and hyphens".to_string(),
        );
    }
    None
}

/// Validate an optional text field with a max length (empty is OK).
pub fn validate_optional(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if !trimmed.is_empty() && trimmed.chars().count() > max_len {
        return Some(format!("{field_name} must be at most {max_len} characters"));
    }
    None
}

/// Report permission ids that are not part of the catalog.
pub fn validate_permission_ids(requested: &[i64], known: &[i64]) -> Option<String> {
    let mut unknown: Vec<i64> = requested
        .iter()
        .copied()
        .filter(|id| !known.contains(id))
        .collect();
    if unknown.is_empty() {
        return None;
    }
    unknown.sort_unstable();
    unknown.dedup();
    let ids: Vec<String> = unknown.iter().map(|id| id.to_string()).collect();
    Some(format!("Unknown permission ids: {}", ids.join(", ")))
}
