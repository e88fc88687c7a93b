mod capability_prober;
mod client_factory;
mod console_messages;
mod datasource_publish;
mod http_transport;

pub use capability_prober::HttpCapabilityProber;
pub use client_factory::HttpClientFactory;
pub use console_messages::ConsoleMessageSink;
pub use datasource_publish::{DatasourcePublishService, dsw_domain_id};
pub use http_transport::HttpTransport;
