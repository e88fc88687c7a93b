//! bi-publisher: publish BI models, their database connections and analysis
//! schemas to a BI server, rolling back partial publishes on failure.

pub mod app;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;

pub use app::api::{encrypt_password, export_entry, publish, validate};
pub use app::commands::job::JobResult;
pub use app::commands::publish::{ModelArtifacts, PublishRun};
pub use app::commands::validate::ConnectionValidator;
pub use domain::{AppError, ConnectionDescriptor, PublishError, ValidationError};
