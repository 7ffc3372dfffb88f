//! Test Module
//!
//! Cross-component test suite for the routing core.
//!
//! ## Test Categories
//! - `router_tests`: routing decisions, overrides, fallbacks, metadata
//! - `integration_tests`: full pipeline against mocked HTTP collaborators

pub mod integration_tests;
