//! Version information

use serde::Serialize;
use std::fmt;

/// Build-time version details for the `version` command
#[derive(Debug, Clone, Serialize)]
pub struct VersionInfo {
    /// Crate version
    pub version: String,

    /// Git commit, when stamped at build time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,

    /// Build date, when stamped at build time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_date: Option<String>,

    /// Target triple, when stamped at build time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl VersionInfo {
    /// Version details of the running binary
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            commit: option_env!("SVCEXT_BUILD_COMMIT").map(str::to_string),
            build_date: option_env!("SVCEXT_BUILD_DATE").map(str::to_string),
            target: option_env!("SVCEXT_BUILD_TARGET").map(str::to_string),
        }
    }

    /// One-line rendering
    pub fn display(&self) -> String {
        format!("svcext {}", self.version)
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}
