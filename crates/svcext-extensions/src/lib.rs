//! # svcext-extensions
//!
//! The domain-join extension surface: parameter validation, configuration
//! payload construction, and the extension manager that rewrites
//! deployment extension configurations.
//!
//! The pipeline is single-shot: validate a flat parameter bag into a
//! typed request, build the configuration input, hand it to the manager,
//! and apply the result. Nothing is persisted between invocations.

pub mod domain_join;
pub mod manager;
pub mod validate;

pub use domain_join::{
    AuthMaterial, DomainJoinConfig, DomainJoinParams, JoinOptionsSpec, JoinTarget, DEFAULT_VERSION,
    EXTENSION_TYPE, PROVIDER_NAMESPACE,
};
pub use manager::ExtensionManager;
pub use validate::{ValidatedDomainJoin, Validator};
