//! Application services: use-case orchestration.
//!
//! Each service module implements a single use-case by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports`, never from `crate::infra`, `crate::commands`,
//! or `crate::output`.

pub mod bundle_distribution;
pub mod config_service;
pub mod container_provision;
pub mod key_registration;
pub mod lifecycle;
pub mod remote_control;
