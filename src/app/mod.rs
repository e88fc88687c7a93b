pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
mod context;
pub mod job_file;

pub use context::AppContext;
