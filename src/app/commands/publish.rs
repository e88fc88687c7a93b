//! Datasource publish with compensating rollback.
//!
//! A run publishes, in order, the database connection, the metadata model and
//! (when the job built one) the Mondrian schema. If any step fails after the
//! connection went out, the already published resources are deleted again on
//! a best-effort basis and the original error is returned.

use crate::app::commands::validate::ConnectionValidator;
use crate::domain::job::build_model::keys;
use crate::domain::publish_model::validate_model_name;
use crate::domain::{
    AppError, DatabaseDescriptor, DatasourcePublishEntry, Job, PublishError, PublishModel,
    PublishOutcome, PublishState, Variables,
};
use crate::ports::{DatasourcePublisher, MetadataUpload, PublishClientFactory, SchemaUpload};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaArtifact {
    pub document: String,
    pub datasource_info: String,
}

/// Model documents a build-model entry left in the job variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelArtifacts {
    pub xmi: String,
    pub dsw: bool,
    pub schema: Option<SchemaArtifact>,
}

impl ModelArtifacts {
    pub fn from_variables(variables: &Variables, model_name: &str) -> Result<Self, PublishError> {
        let xmi = variables
            .get(&keys::xmi(model_name))
            .ok_or_else(|| PublishError::MissingModelArtifact(model_name.to_string()))?;
        let dsw = variables
            .get(&keys::dsw_flag(model_name))
            .is_some_and(|flag| flag.trim().eq_ignore_ascii_case("true"));
        let schema = match (
            variables.get(&keys::mondrian_schema(model_name)),
            variables.get(&keys::mondrian_datasource(model_name)),
        ) {
            (Some(document), Some(datasource_info)) => Some(SchemaArtifact {
                document: document.to_string(),
                datasource_info: datasource_info.to_string(),
            }),
            _ => None,
        };
        Ok(Self { xmi: xmi.to_string(), dsw, schema })
    }
}

/// One publish attempt; remembers what went out so it can be undone.
pub struct PublishRun<'a> {
    publisher: &'a dyn DatasourcePublisher,
    state: PublishState,
    published_connection: Option<String>,
    published_model: Option<(String, bool)>,
}

impl<'a> PublishRun<'a> {
    pub fn new(publisher: &'a dyn DatasourcePublisher) -> Self {
        Self {
            publisher,
            state: PublishState::NotStarted,
            published_connection: None,
            published_model: None,
        }
    }

    pub fn state(&self) -> PublishState {
        self.state
    }

    pub fn execute(
        &mut self,
        model: &PublishModel,
        database: &DatabaseDescriptor,
        artifacts: &ModelArtifacts,
    ) -> Result<(), PublishError> {
        match self.publish_all(model, database, artifacts) {
            Ok(()) => {
                self.transition(PublishState::Complete);
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, state = %self.state, "publish failed");
                self.rollback();
                Err(err)
            }
        }
    }

    fn transition(&mut self, next: PublishState) {
        tracing::debug!(from = %self.state, to = %next, "publish state");
        self.state = next;
    }

    fn publish_all(
        &mut self,
        model: &PublishModel,
        database: &DatabaseDescriptor,
        artifacts: &ModelArtifacts,
    ) -> Result<(), PublishError> {
        if !model.override_existing && self.publisher.connection_exists(&database.name)?.is_some() {
            return Err(PublishError::ConnectionExists(database.name.clone()));
        }

        self.publisher.publish_database_meta(database, model.override_existing)?;
        self.published_connection = Some(database.name.clone());
        self.transition(PublishState::DbConnectionPublished);

        let acl = model.access_control();
        let upload = MetadataUpload {
            domain_id: &model.model_name,
            xmi: &artifacts.xmi,
            acl: acl.as_ref(),
            overwrite: model.override_existing,
        };
        let outcome = if artifacts.dsw {
            self.publisher.publish_dsw(upload)?
        } else {
            self.publisher.publish_metadata(upload)?
        };
        match outcome {
            PublishOutcome::Success => {}
            PublishOutcome::Conflict => {
                return Err(PublishError::DuplicateDatasource(model.model_name.clone()));
            }
            other => {
                return Err(PublishError::failed(
                    format!("model '{}'", model.model_name),
                    format!("server returned code {}", other.code()),
                ));
            }
        }
        self.published_model = Some((model.model_name.clone(), artifacts.dsw));
        self.transition(PublishState::MetadataPublished);

        let Some(schema) = &artifacts.schema else {
            return Ok(());
        };
        let outcome = self.publisher.publish_mondrian_schema(SchemaUpload {
            catalog_name: &model.model_name,
            schema: &schema.document,
            datasource_info: &schema.datasource_info,
            overwrite: model.override_existing,
        })?;
        match outcome {
            PublishOutcome::Success => self.transition(PublishState::SchemaPublished),
            PublishOutcome::CatalogExists => {
                tracing::warn!(catalog = %model.model_name, "analysis catalog already exists, leaving it in place");
            }
            other => {
                return Err(PublishError::failed(
                    format!("Mondrian schema '{}'", model.model_name),
                    format!("server returned code {}", other.code()),
                ));
            }
        }
        Ok(())
    }

    /// Best effort: failures are logged, never returned.
    fn rollback(&mut self) {
        if self.published_connection.is_none() && self.published_model.is_none() {
            return;
        }
        self.transition(PublishState::RollingBack);

        if let Some((model_name, dsw)) = self.published_model.take() {
            match self.publisher.delete_model(&model_name, dsw) {
                Ok(()) => tracing::info!(model = %model_name, "rolled back model"),
                Err(e) => tracing::warn!(error = %e, model = %model_name, "model rollback failed"),
            }
        }

        if let Some(name) = self.published_connection.take() {
            match self.publisher.delete_database_meta(&name) {
                Ok(()) => tracing::info!(connection = %name, "rolled back database connection"),
                Err(e) => {
                    tracing::warn!(error = %e, connection = %name, "connection rollback failed")
                }
            }
        }
    }
}

/// Execute the publish entry `entry_name` of `job`.
///
/// Local configuration problems surface before any request is made; the
/// server is then validated, and only after that is anything created.
pub fn execute(
    job: &Job,
    entry_name: &str,
    entry: &DatasourcePublishEntry,
    variables: &Variables,
    factory: &dyn PublishClientFactory,
) -> Result<(), AppError> {
    let mut model = entry.to_publish_model(variables)?;

    let provider = job
        .find_preceding_provider(entry_name)
        .and_then(|found| found.connection_info_provider())
        .ok_or(PublishError::MissingDatabase)?;
    if model.model_name.is_empty() {
        model.model_name = provider.model_name(variables);
    }
    validate_model_name(&model.model_name)?;
    let database = provider.connection_info(variables)?;
    let artifacts = ModelArtifacts::from_variables(variables, &model.model_name)?;

    let probe = factory.probe(&model.connection)?;
    ConnectionValidator::new(probe.as_ref(), &model.connection).validate_connection_in_runtime()?;

    let publisher = factory.publisher(&model.connection)?;
    PublishRun::new(publisher.as_ref()).execute(&model, &database, &artifacts)?;

    tracing::info!(model = %model.model_name, connection = %database.name, "published");
    Ok(())
}
