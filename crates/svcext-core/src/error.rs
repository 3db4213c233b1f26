//! Error types for svcext-core

use thiserror::Error;

/// Result type alias using svcext-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for svcext
#[derive(Error, Debug)]
pub enum Error {
    /// Named hosted service does not exist
    #[error("Hosted service not found: {service}")]
    InvalidServiceReference { service: String },

    /// Slot has no active deployment
    #[error("No deployment found in slot: {slot}")]
    InvalidDeploymentReference { slot: String },

    /// Named role is not part of the deployment
    #[error("Role not found in deployment: {role}")]
    InvalidRoleReference { role: String },

    /// Authentication material is missing, doubled up, or incomplete
    #[error("Invalid certificate reference: {message}")]
    InvalidCertificateReference { message: String },

    /// Parameter combination does not form a valid request
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// Client profile file not found
    #[error("Client profile not found: {path}")]
    ConfigNotFound { path: String },

    /// Client profile exists but cannot be used
    #[error("Invalid client profile: {message}")]
    MalformedProfile { message: String },

    /// Missing required field
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid service reference error
    pub fn invalid_service_reference(service: impl Into<String>) -> Self {
        Self::InvalidServiceReference {
            service: service.into(),
        }
    }

    /// Create an invalid deployment reference error
    pub fn invalid_deployment_reference(slot: impl Into<String>) -> Self {
        Self::InvalidDeploymentReference { slot: slot.into() }
    }

    /// Create an invalid role reference error
    pub fn invalid_role_reference(role: impl Into<String>) -> Self {
        Self::InvalidRoleReference { role: role.into() }
    }

    /// Create an invalid certificate reference error
    pub fn invalid_certificate_reference(message: impl Into<String>) -> Self {
        Self::InvalidCertificateReference {
            message: message.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Create a profile not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create a malformed profile error
    pub fn malformed_profile(message: impl Into<String>) -> Self {
        Self::MalformedProfile {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }
}
