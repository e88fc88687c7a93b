//! Entry that hands a pre-built model to the rest of the job.

use std::path::PathBuf;

use crate::domain::database::DatabaseDescriptor;
use crate::domain::variables::Variables;
use crate::domain::PublishError;

/// Names of the job variables a build-model entry exports.
pub mod keys {
    pub fn xmi(model: &str) -> String {
        format!("BuildModel.XMI.{model}")
    }

    pub fn dsw_flag(model: &str) -> String {
        format!("BuildModel.XMI.DSW.{model}")
    }

    pub fn mondrian_schema(model: &str) -> String {
        format!("BuildModel.Mondrian.Schema.{model}")
    }

    pub fn mondrian_datasource(model: &str) -> String {
        format!("BuildModel.Mondrian.Datasource.{model}")
    }
}

/// Capability of entries that know which database backs their output.
pub trait ConnectionInfoProvider {
    /// Database the model was built against, with variables resolved.
    fn connection_info(&self, variables: &Variables) -> Result<DatabaseDescriptor, PublishError>;

    /// Name of the model the entry produces.
    fn model_name(&self, variables: &Variables) -> String;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildModelEntry {
    pub model_name: String,
    pub database: Option<DatabaseDescriptor>,
    /// Serialized logical model produced by the modeling tool.
    pub xmi_path: PathBuf,
    /// Optional OLAP schema built alongside the model.
    pub schema_path: Option<PathBuf>,
    /// Whether the XMI is a data-source-wizard document.
    pub dsw: bool,
}

impl ConnectionInfoProvider for BuildModelEntry {
    fn connection_info(&self, variables: &Variables) -> Result<DatabaseDescriptor, PublishError> {
        let database = self.database.as_ref().ok_or(PublishError::MissingDatabase)?;
        let resolved = database.resolve(variables);
        if resolved.is_jndi() {
            return Err(PublishError::JndiNotSupported(resolved.name));
        }
        Ok(resolved)
    }

    fn model_name(&self, variables: &Variables) -> String {
        variables.resolve(&self.model_name)
    }
}
