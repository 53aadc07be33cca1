//! Input normalization helpers
//!
//! Field-presence rules live on the request types (`validator` derives);
//! this module holds the small transformations applied after validation.

use sha2::{Digest, Sha256};

/// Split a comma-separated skills string into trimmed, non-empty entries
pub fn parse_skills(skills: &str) -> Vec<String> {
    skills
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Treat blank optional fields as absent
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Gravatar URL for an email address (200px, PG rating, mystery-person fallback)
pub fn gravatar_url(email: &str) -> String {
    let digest = Sha256::digest(email.trim().to_lowercase().as_bytes());
    format!(
        "https://www.gravatar.com/avatar/{}?s=200&r=pg&d=mm",
        hex::encode(digest)
    )
}
