//! Integration tests for svcmgr CLI
//!
//! These tests spawn the binary or drive the HTTP adapters against a local
//! mock server. They are slower and should be run separately from unit tests.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod cli_tests;
mod cloud_controller;
