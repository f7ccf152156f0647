//! Lexical alias inference for permission subjects with no route of their own.
//!
//! A subject such as `PatientPayment` is usually managed from the same screen
//! as `Patient`. When no route maps it directly, the best lexically similar
//! mapped subject lends it its sidebar destinations.
//!
//! Scoring tiers, strongest first:
//! 1. the subject contains the candidate as a substring,
//! 2. every candidate token is one of the subject's tokens,
//! 3. some tokens match and the candidate is long enough to be meaningful.
//!
//! The numbers in [`AliasScoring`] are tunables. Only the tier order is fixed.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::mapper::SubjectNavMap;
use crate::models::Permission;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasScoring {
    /// Base score for substring containment; the candidate length is added.
    pub contains_base: u32,
    /// Base score when all candidate tokens match; the match count is added.
    pub all_tokens_base: u32,
    /// Minimum candidate length (in chars) for a partial token match to count.
    pub partial_min_len: usize,
    /// Lowest score that is accepted as an alias.
    pub min_score: u32,
}

impl Default for AliasScoring {
    fn default() -> Self {
        AliasScoring {
            contains_base: 1000,
            all_tokens_base: 500,
            partial_min_len: 6,
            min_score: 2,
        }
    }
}

impl AliasScoring {
    /// How strongly `candidate` (a mapped subject) resembles `subject` (an unmapped one).
    pub fn score(&self, subject: &str, candidate: &str) -> u32 {
        let subject_lower = subject.to_lowercase();
        let candidate_lower = candidate.to_lowercase();
        if candidate_lower.is_empty() {
            return 0;
        }

        let candidate_len = candidate_lower.chars().count();
        if subject_lower.contains(&candidate_lower) {
            return self.contains_base + to_u32(candidate_len);
        }

        let subject_tokens: HashSet<String> = tokenize(subject).into_iter().collect();
        let candidate_tokens = tokenize(candidate);
        let match_count = candidate_tokens
            .iter()
            .filter(|t| subject_tokens.contains(*t))
            .count();

        if !candidate_tokens.is_empty() && match_count == candidate_tokens.len() {
            self.all_tokens_base + to_u32(match_count)
        } else if match_count > 0 && candidate_len >= self.partial_min_len {
            to_u32(match_count)
        } else {
            0
        }
    }

    pub fn accepts(&self, score: u32) -> bool {
        score >= self.min_score
    }
}

fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Split a subject into lowercase word tokens on camelCase boundaries and
/// `_` / `-` / whitespace separators. `"SupplyRequest"` -> `["supply", "request"]`.
pub fn tokenize(subject: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut prev_lower_or_digit = false;

    for c in subject.chars() {
        if c == '_' || c == '-' || c.is_whitespace() {
            flush(&mut current, &mut tokens);
            prev_lower_or_digit = false;
            continue;
        }
        if c.is_uppercase() && prev_lower_or_digit {
            flush(&mut current, &mut tokens);
        }
        prev_lower_or_digit = c.is_lowercase() || c.is_ascii_digit();
        current.extend(c.to_lowercase());
    }
    flush(&mut current, &mut tokens);
    tokens
}

fn flush(current: &mut String, tokens: &mut Vec<String>) {
    if !current.is_empty() {
        tokens.push(std::mem::take(current));
    }
}

/// One alias decision, kept for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasMatch {
    pub subject: String,
    pub borrowed_from: String,
    pub score: u32,
}

/// Best mapped candidate for `subject`, if any scores at or above the threshold.
/// Ties keep the first candidate in iteration order.
pub fn best_alias<'a, I>(subject: &str, candidates: I, scoring: &AliasScoring) -> Option<(&'a str, u32)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(&'a str, u32)> = None;
    for candidate in candidates {
        let score = scoring.score(subject, candidate);
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((candidate, score));
        }
    }
    best.filter(|(_, score)| scoring.accepts(*score))
}

/// Give every catalog subject missing from `map` the nav keys of its best alias.
///
/// Candidates are the subjects mapped before this call, so the outcome does not
/// depend on the order in which unmapped subjects are visited. Subjects with no
/// acceptable candidate stay unmapped.
///
/// Map keys are lowercased, which would hide camelCase token boundaries, so
/// scoring uses the catalog's spelling of each subject when it has one.
pub fn infer_aliases(
    map: &mut SubjectNavMap,
    catalog: &[Permission],
    scoring: &AliasScoring,
) -> Vec<AliasMatch> {
    let mut spelled: BTreeMap<String, String> = BTreeMap::new();
    for permission in catalog {
        spelled
            .entry(permission.subject.to_lowercase())
            .or_insert_with(|| permission.subject.clone());
    }

    let candidates: Vec<String> = map
        .keys()
        .map(|key| spelled.get(key).cloned().unwrap_or_else(|| key.clone()))
        .collect();
    let unmapped: Vec<(&String, &String)> = spelled
        .iter()
        .filter(|(key, _)| !map.contains_key(*key))
        .collect();

    let mut matches = Vec::new();
    for (key, subject) in unmapped {
        let Some((winner, score)) =
            best_alias(subject, candidates.iter().map(String::as_str), scoring)
        else {
            continue;
        };
        let Some(nav_keys) = map.get(&winner.to_lowercase()).cloned() else {
            continue;
        };
        log::debug!("Permission subject {subject} borrows nav of {winner} (score {score})");
        matches.push(AliasMatch {
            subject: subject.clone(),
            borrowed_from: winner.to_string(),
            score,
        });
        map.insert(key.clone(), nav_keys);
    }
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_splits_case_and_separators() {
        assert_eq!(tokenize("SupplyRequest"), vec!["supply", "request"]);
        assert_eq!(tokenize("daily_balance-import"), vec!["daily", "balance", "import"]);
        assert_eq!(tokenize("patient2Visit"), vec!["patient2", "visit"]);
        assert_eq!(tokenize("__Role__"), vec!["role"]);
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn tokenize_is_idempotent_on_plain_tokens() {
        let first = tokenize("InvoiceStatistic");
        let again = tokenize(&first.join("_"));
        assert_eq!(first, again);
        assert_eq!(tokenize("supply request"), vec!["supply", "request"]);
    }

    #[test]
    fn substring_scores_include_candidate_length() {
        let s = AliasScoring::default();
        assert_eq!(s.score("PatientPayment", "Patient"), 1007);
        assert_eq!(s.score("patientpayment", "patient"), 1007);
    }

    #[test]
    fn full_token_match_without_substring() {
        let s = AliasScoring::default();
        // "paymentpatient" is not a substring of "patientpaymentplan".
        assert_eq!(s.score("PatientPaymentPlan", "payment_patient"), 502);
    }

    #[test]
    fn partial_match_needs_long_candidate() {
        let s = AliasScoring::default();
        assert_eq!(s.score("BalanceSheet", "daily_balance"), 1);
        // "role_x" has 6 chars, "rolex" would have 5.
        assert_eq!(s.score("RoleAudit", "role_x"), 1);
        assert_eq!(s.score("RoleAudit", "rolex"), 0);
    }

    #[test]
    fn no_overlap_scores_zero() {
        let s = AliasScoring::default();
        assert_eq!(s.score("Backup", "patient"), 0);
        assert_eq!(s.score("Backup", ""), 0);
    }

    #[test]
    fn best_alias_prefers_first_on_tie() {
        let s = AliasScoring::default();
        let picked = best_alias("ab_cd_ef", ["cd_xxxx", "ef_yyyy"], &s);
        assert_eq!(picked, None, "score 1 each is below threshold");

        let s = AliasScoring { min_score: 1, ..s };
        assert_eq!(best_alias("ab_cd_ef", ["cd_xxxx", "ef_yyyy"], &s), Some(("cd_xxxx", 1)));
    }
}
