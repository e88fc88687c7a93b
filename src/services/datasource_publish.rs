//! Datasource publish primitives against the BI server data-access plugin.

use crate::domain::{
    AppError, ConnectionDescriptor, ConnectionPayload, DatabaseDescriptor, PublishError,
    PublishOutcome, PublisherConfig, database::RemoteConnection,
};
use crate::ports::{
    DatasourcePublisher, HttpMethod, HttpResponse, MetadataUpload, MultipartForm, RequestBody,
    Resource, SchemaUpload, Transport,
};
use crate::services::HttpTransport;

const CONNECTION_ADD: &str = "plugin/data-access/api/connection/add";
const CONNECTION_UPDATE: &str = "plugin/data-access/api/connection/update";
const CONNECTION_DELETE_BY_NAME: &str = "plugin/data-access/api/connection/deletebyname";
const CONNECTION_GET: &str = "plugin/data-access/api/connection/getresponse";
const METADATA_IMPORT: &str = "plugin/data-access/api/metadata/import";
const DSW_IMPORT: &str = "plugin/data-access/api/datasource/dsw/import";
const DSW_DOMAIN: &str = "plugin/data-access/api/datasource/dsw/domain";
const METADATA_DOMAIN: &str = "plugin/data-access/api/datasource/metadata/domain";
const MONDRIAN_POST_ANALYSIS: &str = "plugin/data-access/api/mondrian/postAnalysis";

const XMI_SUFFIX: &str = ".xmi";
const XML_MIME: &str = "text/xml";
const CONFLICT: u16 = 409;

/// Domain id under which a DSW model is stored: the name with `.xmi` appended once.
pub fn dsw_domain_id(model_name: &str) -> String {
    if model_name.ends_with(XMI_SUFFIX) {
        model_name.to_string()
    } else {
        format!("{model_name}{XMI_SUFFIX}")
    }
}

/// Publishes connections, models and schemas through one session.
#[derive(Debug)]
pub struct DatasourcePublishService<T: Transport = HttpTransport> {
    transport: T,
}

impl DatasourcePublishService<HttpTransport> {
    pub fn new(connection: &ConnectionDescriptor, config: &PublisherConfig) -> Result<Self, AppError> {
        Ok(Self::with_transport(HttpTransport::publishing(connection, config)?))
    }
}

impl<T: Transport> DatasourcePublishService<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    fn respond(response: Option<HttpResponse>, doing: &str) -> Result<HttpResponse, PublishError> {
        response.ok_or_else(|| PublishError::Transport(doing.to_string()))
    }

    fn metadata_form(upload: &MetadataUpload<'_>, domain_id: &str) -> MultipartForm {
        let mut form = MultipartForm::new().text("domainId", domain_id).file(
            "metadataFile",
            upload.xmi,
            domain_id,
            XML_MIME,
        );
        if upload.overwrite {
            form = form.text("overwrite", "true");
        }
        if let Some(acl) = upload.acl.and_then(|acl| acl.to_xml()) {
            form = form.text("acl", acl);
        }
        form
    }
}

impl<T: Transport> DatasourcePublisher for DatasourcePublishService<T> {
    fn connection_exists(&self, name: &str) -> Result<Option<String>, PublishError> {
        let resource = Resource::new(CONNECTION_GET).query("name", name);
        let response = Self::respond(self.transport.get(&resource), "looking up a connection")?;
        if !response.is_success() {
            return Ok(None);
        }

        let remote: RemoteConnection = match serde_json::from_str(&response.body) {
            Ok(remote) => remote,
            Err(e) => {
                tracing::debug!(error = %e, name, "connection lookup returned no connection");
                return Ok(None);
            }
        };
        Ok(remote.id.filter(|id| !id.trim().is_empty()))
    }

    fn publish_database_meta(
        &self,
        database: &DatabaseDescriptor,
        force_override: bool,
    ) -> Result<(), PublishError> {
        let (path, id) = match self.connection_exists(&database.name)? {
            Some(id) if force_override => (CONNECTION_UPDATE, Some(id)),
            Some(_) => return Err(PublishError::ConnectionExists(database.name.clone())),
            None => (CONNECTION_ADD, None),
        };

        let payload = ConnectionPayload::from_descriptor(database, id)?;
        let body = serde_json::to_value(&payload)
            .map_err(|e| PublishError::failed("database connection", e.to_string()))?;

        let response = Self::respond(
            self.transport.post(&Resource::new(path), RequestBody::Json(body)),
            "publishing the database connection",
        )?;

        match response.status {
            status if (200..300).contains(&status) => {
                tracing::info!(connection = %database.name, endpoint = path, "database connection published");
                Ok(())
            }
            CONFLICT => Err(PublishError::DuplicateDatasource(database.name.clone())),
            status => Err(PublishError::failed("database connection", format!("HTTP {status}"))),
        }
    }

    fn publish_dsw(&self, upload: MetadataUpload<'_>) -> Result<PublishOutcome, PublishError> {
        let domain_id = dsw_domain_id(upload.domain_id);
        let form = Self::metadata_form(&upload, &domain_id).text("checkConnection", "true");

        let response = Self::respond(
            self.transport.multipart_upload(HttpMethod::Put, &Resource::new(DSW_IMPORT), form),
            "publishing the DSW model",
        )?;

        Ok(match response.status {
            200 | 201 => PublishOutcome::Success,
            CONFLICT => PublishOutcome::Conflict,
            status => {
                tracing::warn!(status, body = %response.body, domain_id, "DSW import failed");
                PublishOutcome::Failed
            }
        })
    }

    fn publish_metadata(&self, upload: MetadataUpload<'_>) -> Result<PublishOutcome, PublishError> {
        let form = Self::metadata_form(&upload, upload.domain_id);

        let response = Self::respond(
            self.transport.multipart_upload(HttpMethod::Put, &Resource::new(METADATA_IMPORT), form),
            "publishing the metadata model",
        )?;

        if response.body.trim() == PublishOutcome::Success.code().to_string() {
            return Ok(PublishOutcome::Success);
        }
        tracing::warn!(status = response.status, body = %response.body, domain_id = upload.domain_id, "metadata import failed");
        Ok(PublishOutcome::Failed)
    }

    fn publish_mondrian_schema(
        &self,
        upload: SchemaUpload<'_>,
    ) -> Result<PublishOutcome, PublishError> {
        let parameters =
            format!("Datasource={};retainInlineAnnotations=true", upload.datasource_info);
        let form = MultipartForm::new()
            .text("parameters", parameters)
            .file(
                "uploadAnalysis",
                upload.schema,
                format!("{}.mondrian.xml", upload.catalog_name),
                XML_MIME,
            )
            .text("catalogName", upload.catalog_name)
            .text("overwrite", if upload.overwrite { "true" } else { "false" })
            .text("xmlaEnabledFlag", "false");

        let response = Self::respond(
            self.transport.multipart_upload(
                HttpMethod::Post,
                &Resource::new(MONDRIAN_POST_ANALYSIS),
                form,
            ),
            "publishing the Mondrian schema",
        )?;

        if response.status != 200 {
            tracing::warn!(status = response.status, catalog = upload.catalog_name, "analysis import failed");
            return Ok(PublishOutcome::Failed);
        }
        Ok(PublishOutcome::from_body(&response.body))
    }

    fn delete_database_meta(&self, name: &str) -> Result<(), PublishError> {
        let resource = Resource::new(CONNECTION_DELETE_BY_NAME).query("name", name);
        let response =
            Self::respond(self.transport.get(&resource), "deleting the database connection")?;
        if response.is_success() {
            Ok(())
        } else {
            Err(PublishError::failed(
                format!("deletion of connection '{name}'"),
                format!("HTTP {}", response.status),
            ))
        }
    }

    fn delete_model(&self, model_name: &str, dsw: bool) -> Result<(), PublishError> {
        let resource = if dsw {
            Resource::new(DSW_DOMAIN).segment(dsw_domain_id(model_name))
        } else {
            Resource::new(METADATA_DOMAIN).segment(model_name)
        };
        let response = Self::respond(self.transport.delete(&resource), "deleting the model")?;
        if response.is_success() {
            Ok(())
        } else {
            Err(PublishError::failed(
                format!("deletion of model '{model_name}'"),
                format!("HTTP {}", response.status),
            ))
        }
    }
}
