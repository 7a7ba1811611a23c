//! Core building blocks shared by both commands
//!
//! - **config**: publish.toml parsing, defaults and validation
//! - **context**: project root, config and root manifest, loaded once
//! - **error**: error types with contextual help messages

pub mod config;
pub mod context;
pub mod error;
