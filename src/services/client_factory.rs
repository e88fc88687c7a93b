use crate::domain::{AppError, ConnectionDescriptor, PublisherConfig};
use crate::ports::{DatasourcePublisher, PublishClientFactory, ServerProbe};
use crate::services::{DatasourcePublishService, HttpCapabilityProber};

/// Builds reqwest-backed probes and publishers from the loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct HttpClientFactory {
    config: PublisherConfig,
}

impl HttpClientFactory {
    pub fn new(config: PublisherConfig) -> Self {
        Self { config }
    }
}

impl PublishClientFactory for HttpClientFactory {
    fn probe(&self, connection: &ConnectionDescriptor) -> Result<Box<dyn ServerProbe>, AppError> {
        Ok(Box::new(HttpCapabilityProber::new(connection, &self.config)?))
    }

    fn publisher(
        &self,
        connection: &ConnectionDescriptor,
    ) -> Result<Box<dyn DatasourcePublisher>, AppError> {
        Ok(Box::new(DatasourcePublishService::new(connection, &self.config)?))
    }
}
