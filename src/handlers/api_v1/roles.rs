use actix_web::{HttpResponse, web};

use crate::errors::AppError;
use crate::handlers::AppState;
use crate::models::{NewRole, PermissionSetUpdate, RoleUpdate};
use crate::validate;

/// GET /api/v1/roles - All roles with their permissions
pub async fn list(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let roles = state.store.list_roles().await?;
    Ok(HttpResponse::Ok().json(roles))
}

/// GET /api/v1/roles/{id}
pub async fn read(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let role = state.store.get_role(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(role))
}

/// POST /api/v1/roles - Create a (non-system) role
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<NewRole>,
) -> Result<HttpResponse, AppError> {
    let mut errors = Vec::new();
    errors.extend(validate::validate_role_name(&body.name));
    errors.extend(validate::validate_optional(&body.description, "Description", 500));
    errors.extend(check_permission_ids(&state, &body.permission_ids).await?);
    if let Some(err) = AppError::from_validation(errors) {
        return Err(err);
    }

    let role = state.store.create_role(&body, false).await?;
    log::info!("Role '{}' created with {} permissions", role.name, role.permissions.len());
    Ok(HttpResponse::Created().json(role))
}

/// PUT /api/v1/roles/{id} - Rename / describe a role
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<RoleUpdate>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let mut errors = Vec::new();
    errors.extend(validate::validate_role_name(&body.name));
    errors.extend(validate::validate_optional(&body.description, "Description", 500));
    if let Some(err) = AppError::from_validation(errors) {
        return Err(err);
    }

    let existing = state.store.get_role(id).await?;
    if existing.is_system && existing.name != body.name.trim() {
        return Err(AppError::Conflict("System roles cannot be renamed".to_string()));
    }

    let role = state.store.update_role(id, &body).await?;
    Ok(HttpResponse::Ok().json(role))
}

/// DELETE /api/v1/roles/{id}
pub async fn delete(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let role = state.store.get_role(id).await?;
    if role.is_system {
        return Err(AppError::Conflict(format!(
            "Role '{}' is a system role and cannot be deleted",
            role.name
        )));
    }

    state.store.delete_role(id).await?;
    log::info!("Role '{}' deleted", role.name);
    Ok(HttpResponse::NoContent().finish())
}

/// PUT /api/v1/roles/{id}/permissions - Replace the role's whole permission set
pub async fn set_permissions(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<PermissionSetUpdate>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let permission_ids = body.normalized_ids();

    // 404 for a missing role wins over validation of the body.
    state.store.get_role(id).await?;
    if let Some(details) = check_permission_ids(&state, &permission_ids).await? {
        return Err(AppError::Validation(details));
    }

    let role = state.store.set_role_permissions(id, &permission_ids).await?;
    log::info!("Role '{}' now has {} permissions", role.name, role.permissions.len());
    Ok(HttpResponse::Ok().json(role))
}

async fn check_permission_ids(
    state: &AppState,
    requested: &[i64],
) -> Result<Option<String>, AppError> {
    if requested.is_empty() {
        return Ok(None);
    }
    let known: Vec<i64> = state
        .store
        .list_permissions()
        .await?
        .into_iter()
        .map(|p| p.id)
        .collect();
    Ok(validate::validate_permission_ids(requested, &known))
}
