//! Test utilities for storyboard tests.
//!
//! This module provides mock services and workspace fixtures.

pub mod mock_services;

#[allow(unused_imports)]
pub use mock_services::{MockRenderer, MockTextService, fixture_workspace, png};
