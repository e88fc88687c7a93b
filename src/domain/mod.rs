pub mod access_control;
pub mod config;
pub mod connection;
pub mod database;
pub mod error;
pub mod job;
pub mod outcome;
pub mod password;
pub mod publish_model;
pub mod variables;
pub mod xml;

pub use access_control::AccessControlModel;
pub use config::{CsrfConfig, HttpConfig, PublisherConfig};
pub use connection::ConnectionDescriptor;
pub use database::{ConnectionPayload, DatabaseAccessType, DatabaseDescriptor, DatabaseType};
pub use error::{AppError, PublishError, ValidationError};
pub use job::{
    BuildModelEntry, ConnectionInfoProvider, DatasourcePublishEntry, Hop, Job, JobEntry,
    JobEntryKind, RepositoryAttributes,
};
pub use outcome::{PublishOutcome, PublishState};
pub use publish_model::{AclAccessType, PublishModel};
pub use variables::Variables;
