mod client_factory;
mod datasource_publisher;
mod message_sink;
mod server_probe;
mod transport;

pub use client_factory::PublishClientFactory;
pub use datasource_publisher::{DatasourcePublisher, MetadataUpload, SchemaUpload};
pub use message_sink::{MessageKind, MessageSink};
pub use server_probe::ServerProbe;
pub use transport::{
    FormValue, HttpMethod, HttpResponse, MultipartForm, RequestBody, Resource, Transport,
};
