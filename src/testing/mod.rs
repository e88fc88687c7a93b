//! In-crate fakes for the publish ports.

use std::cell::RefCell;
use std::rc::Rc;

use crate::domain::{
    AppError, ConnectionDescriptor, DatabaseDescriptor, PublishError, PublishOutcome,
};
use crate::ports::{
    DatasourcePublisher, MessageKind, MessageSink, MetadataUpload, PublishClientFactory,
    SchemaUpload, ServerProbe,
};

#[derive(Debug, Clone)]
pub struct FakeProbe {
    pub platform: bool,
    pub credentials: bool,
    pub unauthenticated: bool,
    pub publish: bool,
    pub manage: bool,
    pub status: i32,
    pub(crate) calls: RefCell<Vec<&'static str>>,
}

impl FakeProbe {
    pub fn healthy() -> Self {
        Self {
            platform: true,
            credentials: true,
            unauthenticated: false,
            publish: true,
            manage: true,
            status: 200,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: &'static str, answer: bool) -> bool {
        self.calls.borrow_mut().push(call);
        answer
    }
}

impl ServerProbe for FakeProbe {
    fn is_host_reachable_and_is_target_platform(&self) -> bool {
        self.record("reachable", self.platform)
    }

    fn has_credentials(&self) -> bool {
        self.record("credentials", self.credentials)
    }

    fn is_unauthenticated(&self) -> bool {
        self.record("unauthenticated", self.unauthenticated)
    }

    fn can_publish(&self) -> bool {
        self.record("publish", self.publish)
    }

    fn can_manage_datasources(&self) -> bool {
        self.record("manage", self.manage)
    }

    fn can_create(&self) -> bool {
        self.record("create", true)
    }

    fn can_execute(&self) -> bool {
        self.record("execute", true)
    }

    fn last_status(&self) -> i32 {
        self.status
    }
}

#[derive(Debug, Default)]
pub struct RecordingMessageSink {
    messages: RefCell<Vec<(MessageKind, String, String)>>,
}

impl RecordingMessageSink {
    pub fn messages(&self) -> Vec<(MessageKind, String, String)> {
        self.messages.borrow().clone()
    }
}

impl MessageSink for RecordingMessageSink {
    fn show(&self, kind: MessageKind, title: &str, message: &str) {
        self.messages.borrow_mut().push((kind, title.to_string(), message.to_string()));
    }
}

/// Scripted publisher that logs every call it receives.
#[derive(Debug, Clone)]
pub struct FakePublisher {
    pub existing_connection: Option<String>,
    pub database_result: Result<(), PublishError>,
    pub metadata_result: Result<PublishOutcome, PublishError>,
    pub schema_result: Result<PublishOutcome, PublishError>,
    pub delete_connection_result: Result<(), PublishError>,
    pub delete_model_result: Result<(), PublishError>,
    pub(crate) log: Rc<RefCell<Vec<String>>>,
}

impl Default for FakePublisher {
    fn default() -> Self {
        Self {
            existing_connection: None,
            database_result: Ok(()),
            metadata_result: Ok(PublishOutcome::Success),
            schema_result: Ok(PublishOutcome::Success),
            delete_connection_result: Ok(()),
            delete_model_result: Ok(()),
            log: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl FakePublisher {
    pub fn calls(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    fn record(&self, call: String) {
        self.log.borrow_mut().push(call);
    }
}

impl DatasourcePublisher for FakePublisher {
    fn connection_exists(&self, name: &str) -> Result<Option<String>, PublishError> {
        self.record(format!("exists {name}"));
        Ok(self.existing_connection.clone())
    }

    fn publish_database_meta(
        &self,
        database: &DatabaseDescriptor,
        force_override: bool,
    ) -> Result<(), PublishError> {
        let verb = if self.existing_connection.is_some() && force_override { "update" } else { "add" };
        self.record(format!("{verb} {}", database.name));
        self.database_result.clone()
    }

    fn publish_dsw(&self, upload: MetadataUpload<'_>) -> Result<PublishOutcome, PublishError> {
        self.record(format!("dsw {}", upload.domain_id));
        self.metadata_result.clone()
    }

    fn publish_metadata(&self, upload: MetadataUpload<'_>) -> Result<PublishOutcome, PublishError> {
        self.record(format!("metadata {}", upload.domain_id));
        self.metadata_result.clone()
    }

    fn publish_mondrian_schema(
        &self,
        upload: SchemaUpload<'_>,
    ) -> Result<PublishOutcome, PublishError> {
        self.record(format!("schema {} {}", upload.catalog_name, upload.datasource_info));
        self.schema_result.clone()
    }

    fn delete_database_meta(&self, name: &str) -> Result<(), PublishError> {
        self.record(format!("delete-connection {name}"));
        self.delete_connection_result.clone()
    }

    fn delete_model(&self, model_name: &str, dsw: bool) -> Result<(), PublishError> {
        self.record(format!("delete-model {model_name} dsw={dsw}"));
        self.delete_model_result.clone()
    }
}

/// Hands out clones of one probe and one publisher; publisher clones share a call log.
#[derive(Debug, Clone)]
pub struct FakeClientFactory {
    pub probe: FakeProbe,
    pub publisher: FakePublisher,
}

impl FakeClientFactory {
    pub fn new(publisher: FakePublisher) -> Self {
        Self { probe: FakeProbe::healthy(), publisher }
    }
}

impl PublishClientFactory for FakeClientFactory {
    fn probe(&self, _connection: &ConnectionDescriptor) -> Result<Box<dyn ServerProbe>, AppError> {
        Ok(Box::new(self.probe.clone()))
    }

    fn publisher(
        &self,
        _connection: &ConnectionDescriptor,
    ) -> Result<Box<dyn DatasourcePublisher>, AppError> {
        Ok(Box::new(self.publisher.clone()))
    }
}
