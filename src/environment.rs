//! CI environment metadata.
//!
//! Every environment lookup happens once, here, at the process boundary.
//! The resulting [`EnvironmentMetadata`] is passed by reference into the
//! extraction and rendering functions, which never read the environment
//! themselves.

use chrono::{DateTime, Utc};

pub const CI_BUILD_ID: &str = "CI_BUILD_ID";
pub const CI_BUILD_URL: &str = "CI_BUILD_URL";
pub const CI_COMMIT_SHA: &str = "CI_COMMIT_SHA";
pub const CI_COMMIT_REF: &str = "CI_COMMIT_REF";
pub const CI_PIPELINE_NAME: &str = "CI_PIPELINE_NAME";

const FALLBACK_BUILD_URL: &str = "http://localhost";
const FALLBACK_UNKNOWN: &str = "unknown";
const FALLBACK_PIPELINE: &str = "Local";

/// Metadata describing the CI execution being reported on.
///
/// Values are carried through unmodified; nothing here validates their
/// format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentMetadata {
    pub build_id: String,
    pub build_url: String,
    pub commit_sha: String,
    /// Branch name with any leading `refs/heads/` removed.
    pub branch: String,
    pub pipeline_name: String,
}

impl EnvironmentMetadata {
    /// Read metadata from the process environment.
    pub fn from_env(now: DateTime<Utc>) -> Self {
        Self::from_lookup(|key| std::env::var(key).ok(), now)
    }

    /// Build metadata from an arbitrary key lookup.
    ///
    /// Unset or empty values fall back to local-run literals. The build id
    /// fallback is `local-<unix millis>` derived from `now`.
    pub fn from_lookup<F>(lookup: F, now: DateTime<Utc>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let commit_ref = get(CI_COMMIT_REF).unwrap_or_else(|| FALLBACK_UNKNOWN.to_string());

        Self {
            build_id: get(CI_BUILD_ID)
                .unwrap_or_else(|| format!("local-{}", now.timestamp_millis())),
            build_url: get(CI_BUILD_URL).unwrap_or_else(|| FALLBACK_BUILD_URL.to_string()),
            commit_sha: get(CI_COMMIT_SHA).unwrap_or_else(|| FALLBACK_UNKNOWN.to_string()),
            branch: branch_from_ref(&commit_ref),
            pipeline_name: get(CI_PIPELINE_NAME)
                .unwrap_or_else(|| FALLBACK_PIPELINE.to_string()),
        }
    }
}

/// Strip the `refs/heads/` prefix from a git ref.
pub fn branch_from_ref(commit_ref: &str) -> String {
    commit_ref
        .strip_prefix("refs/heads/")
        .unwrap_or(commit_ref)
        .to_string()
}
