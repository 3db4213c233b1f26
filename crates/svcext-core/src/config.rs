//! Client profile loading and parsing (svcext.yaml)

use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::debug;

/// Profile file names to search for
const CONFIG_FILE_NAMES: &[&str] = &["svcext.yaml", "svcext.yml"];

/// Management endpoint used when the profile does not name one
pub const DEFAULT_ENDPOINT: &str = "https://management.platform.example.com";

/// Client profile file contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClientProfile {
    /// Management API endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Subscription the hosted services live under
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<String>,

    /// Algorithm assumed when a thumbprint arrives without one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_thumbprint_algorithm: Option<String>,

    /// Extension version pin used when a request does not carry one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_extension_version: Option<String>,
}

/// Loaded client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// The parsed profile
    pub profile: ClientProfile,

    /// Where the profile was loaded from; `None` when running on defaults
    pub config_path: Option<Utf8PathBuf>,
}

impl ClientConfig {
    /// Load the profile from the specified path or search for it.
    ///
    /// An explicit path must exist; with no path, the current directory
    /// and its ancestors are searched, and built-in defaults apply when
    /// nothing is found.
    pub fn load(path: Option<&Utf8Path>) -> Result<Self> {
        if let Some(p) = path {
            let content = fs::read_to_string(p).map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::config_not_found(p.as_str())
                } else {
                    Error::Io(e)
                }
            })?;
            let profile: ClientProfile = serde_yaml_ng::from_str(&content)?;
            return Ok(Self {
                profile,
                config_path: Some(p.to_owned()),
            });
        }

        match Self::find_config() {
            Some((config_path, content)) => {
                debug!("Using client profile: {}", config_path);
                let profile: ClientProfile = serde_yaml_ng::from_str(&content)?;
                Ok(Self {
                    profile,
                    config_path: Some(config_path),
                })
            }
            None => {
                debug!("No client profile found, using defaults");
                Ok(Self {
                    profile: ClientProfile::default(),
                    config_path: None,
                })
            }
        }
    }

    /// Find a profile in the current directory or its ancestors
    fn find_config() -> Option<(Utf8PathBuf, String)> {
        let cwd = Utf8PathBuf::try_from(std::env::current_dir().ok()?).ok()?;
        let mut current = cwd.as_path();

        loop {
            for name in CONFIG_FILE_NAMES {
                let path = current.join(name);
                if path.exists() {
                    if let Ok(content) = fs::read_to_string(&path) {
                        return Some((path, content));
                    }
                }
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => return None,
            }
        }
    }

    /// Write a starter profile; refuses to overwrite unless `force`
    pub fn init(
        path: &Utf8Path,
        endpoint: Option<String>,
        subscription_id: Option<String>,
        force: bool,
    ) -> Result<()> {
        if path.exists() && !force {
            return Err(Error::malformed_profile(format!(
                "{path} already exists (use --force to overwrite)"
            )));
        }
        let profile = ClientProfile {
            endpoint: Some(endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())),
            subscription_id,
            default_thumbprint_algorithm: Some("sha256".to_string()),
            default_extension_version: None,
        };
        let content = serde_yaml_ng::to_string(&profile)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Management endpoint, defaulted
    pub fn endpoint(&self) -> &str {
        self.profile.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    /// Subscription id; an error when the profile does not carry one
    pub fn require_subscription(&self) -> Result<&str> {
        self.profile
            .subscription_id
            .as_deref()
            .ok_or_else(|| Error::missing_field("subscription-id"))
    }

    /// Algorithm assumed for bare thumbprints, if configured
    pub fn default_thumbprint_algorithm(&self) -> Option<&str> {
        self.profile.default_thumbprint_algorithm.as_deref()
    }

    /// Version pin applied to requests without one, if configured
    pub fn default_extension_version(&self) -> Option<&str> {
        self.profile.default_extension_version.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_profile(dir: &tempfile::TempDir, content: &str) -> Utf8PathBuf {
        let path = Utf8PathBuf::try_from(dir.path().join("svcext.yaml")).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_profile(
            &dir,
            "endpoint: https://management.example.test\nsubscription-id: sub-1234\n",
        );

        let config = ClientConfig::load(Some(&path)).unwrap();
        assert_eq!(config.endpoint(), "https://management.example.test");
        assert_eq!(config.require_subscription().unwrap(), "sub-1234");
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let err = ClientConfig::load(Some(Utf8Path::new("/nonexistent/svcext.yaml"))).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound { .. }));
    }

    #[test]
    fn test_missing_subscription_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_profile(&dir, "endpoint: https://management.example.test\n");

        let config = ClientConfig::load(Some(&path)).unwrap();
        assert!(matches!(
            config.require_subscription().unwrap_err(),
            Error::MissingField { .. }
        ));
    }

    #[test]
    fn test_defaults_apply() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_profile(&dir, "subscription-id: sub-1234\n");

        let config = ClientConfig::load(Some(&path)).unwrap();
        assert_eq!(config.endpoint(), DEFAULT_ENDPOINT);
        assert!(config.default_thumbprint_algorithm().is_none());
        assert!(config.default_extension_version().is_none());
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_profile(&dir, "subscription-id: sub-1234\n");

        let err = ClientConfig::init(&path, None, None, false).unwrap_err();
        assert!(matches!(err, Error::MalformedProfile { .. }));

        ClientConfig::init(&path, None, Some("sub-5678".into()), true).unwrap();
        let config = ClientConfig::load(Some(&path)).unwrap();
        assert_eq!(config.require_subscription().unwrap(), "sub-5678");
    }
}
