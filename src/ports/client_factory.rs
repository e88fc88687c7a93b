use crate::domain::{AppError, ConnectionDescriptor};
use crate::ports::{DatasourcePublisher, ServerProbe};

/// Builds fresh per-run clients for a connection.
///
/// Probes and publishers carry per-run mutable state, so every job-entry
/// execution asks for new instances.
pub trait PublishClientFactory {
    fn probe(&self, connection: &ConnectionDescriptor) -> Result<Box<dyn ServerProbe>, AppError>;

    fn publisher(
        &self,
        connection: &ConnectionDescriptor,
    ) -> Result<Box<dyn DatasourcePublisher>, AppError>;
}
