// Library root: re-exports all modules so integration tests and external
// consumers can access the crate's public API.

pub mod analytics;
pub mod config;
pub mod report;
pub mod snapshot;
