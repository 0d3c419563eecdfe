//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, filesystem
//! access, HTTP calls and local persistence.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod cloud_controller;
pub mod command_runner;
pub mod config;
pub mod entity_store;
pub mod fs;
pub mod git;
pub mod service_endpoint;
