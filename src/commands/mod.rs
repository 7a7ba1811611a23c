//! CLI commands for npm-publisher
//!
//! - **publish**: stage, verify and publish the npm package for the current version
//! - **pipeline**: print the Buildkite pipeline for the current build

pub mod pipeline;
pub mod publish;

pub use pipeline::run_pipeline;
pub use publish::run_publish;
