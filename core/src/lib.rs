pub mod api;
pub mod batch;
pub mod cache;
pub mod config;
pub mod errors;
pub mod lastrun;
pub mod refresh;
pub mod types;
