//! Datasource publish port definition.

use crate::domain::{AccessControlModel, DatabaseDescriptor, PublishError, PublishOutcome};

/// Metadata document to import.
#[derive(Debug, Clone, Copy)]
pub struct MetadataUpload<'a> {
    pub domain_id: &'a str,
    pub xmi: &'a str,
    pub acl: Option<&'a AccessControlModel>,
    pub overwrite: bool,
}

/// OLAP schema to import as an analysis catalog.
#[derive(Debug, Clone, Copy)]
pub struct SchemaUpload<'a> {
    pub catalog_name: &'a str,
    pub schema: &'a str,
    pub datasource_info: &'a str,
    pub overwrite: bool,
}

/// Port for the create/update/delete primitives of a publish run.
pub trait DatasourcePublisher {
    /// Remote id of the connection named `name`, if one exists.
    fn connection_exists(&self, name: &str) -> Result<Option<String>, PublishError>;

    /// Create the connection, or update it in place when `force_override` is set and it exists.
    fn publish_database_meta(
        &self,
        database: &DatabaseDescriptor,
        force_override: bool,
    ) -> Result<(), PublishError>;

    fn publish_dsw(&self, upload: MetadataUpload<'_>) -> Result<PublishOutcome, PublishError>;

    fn publish_metadata(&self, upload: MetadataUpload<'_>) -> Result<PublishOutcome, PublishError>;

    fn publish_mondrian_schema(
        &self,
        upload: SchemaUpload<'_>,
    ) -> Result<PublishOutcome, PublishError>;

    fn delete_database_meta(&self, name: &str) -> Result<(), PublishError>;

    fn delete_model(&self, model_name: &str, dsw: bool) -> Result<(), PublishError>;
}
