//! # svcext-core
//!
//! Core library for the svcext CLI providing:
//! - Client profile parsing (svcext.yaml)
//! - The error taxonomy shared across the workspace
//! - Type definitions for hosted services, deployments, and extensions

pub mod certificate;
pub mod config;
pub mod credential;
pub mod error;
pub mod join;
pub mod types;

pub use config::ClientConfig;
pub use error::{Error, Result};
