//! Utility functions and helpers
//!
//! This module provides various utility functions used throughout the library.
//!
//! ## Modules
//!
//! - [`retry`] - Retry logic for transient source failures
//! - [`util`] - Byte formatting and timing helpers

pub mod retry;
#[allow(clippy::module_inception)]
pub mod util;
