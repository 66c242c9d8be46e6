//! Compass Common - Shared utilities for the Compass search client
//!
//! This crate provides functionality used across the Compass crates:
//!
//! - **Initialization**: [`init_tracing`] for consistent logging setup
//! - **Errors**: [`FetchError`], the error every remote service call returns
//!
//! # Example
//!
//! ```rust,ignore
//! compass_common::init_tracing("compass", 1)?;
//! ```

pub mod error;
pub mod init;

// Re-export commonly used items at crate root
pub use error::{FetchError, FetchResult};
pub use init::init_tracing;
