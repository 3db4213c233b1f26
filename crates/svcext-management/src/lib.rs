//! # svcext-management
//!
//! Client surface for the hosted-service management API: the
//! [`ServiceManagement`] trait consumed by the rest of the workspace and
//! the HTTP implementation used by the CLI.

pub mod http;
pub mod traits;

pub use http::HttpManagementClient;
pub use traits::ServiceManagement;
