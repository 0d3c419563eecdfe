//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod container;
pub mod error;
pub mod occi;
pub mod ssh;
pub mod stack;

pub use config::{ResolvedConfig, SvcmgrConfig, validate_config_key, validate_config_value};
pub use error::{AttributeHeaderError, ConfigError, DistributionStep, LifecycleError};
pub use ssh::{PublicKey, parse_public_key};
pub use stack::{RemoteState, StackDetails, StackOutput};
