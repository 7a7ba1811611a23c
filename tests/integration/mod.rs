//! Integration tests for npm-publisher

mod helpers;
mod test_pipeline;
mod test_publish;
