//! Build-model entry: loads pre-built model documents into job variables.

use std::fs;
use std::path::Path;

use crate::domain::job::build_model::keys;
use crate::domain::publish_model::validate_model_name;
use crate::domain::{AppError, BuildModelEntry, ConnectionInfoProvider, PublishError, Variables};

pub fn execute(entry: &BuildModelEntry, variables: &mut Variables) -> Result<(), AppError> {
    let model_name = entry.model_name(variables);
    validate_model_name(&model_name)?;
    let database = entry.connection_info(variables)?;

    let xmi = read_artifact(&entry.xmi_path, &model_name)?;
    variables.set(keys::xmi(&model_name), xmi);
    variables.set(keys::dsw_flag(&model_name), entry.dsw.to_string());

    if let Some(schema_path) = &entry.schema_path {
        let schema = read_artifact(schema_path, &model_name)?;
        variables.set(keys::mondrian_schema(&model_name), schema);
        variables.set(keys::mondrian_datasource(&model_name), database.name.clone());
    }

    tracing::info!(
        model = %model_name,
        database = %database.name,
        dsw = entry.dsw,
        schema = entry.schema_path.is_some(),
        "model loaded"
    );
    Ok(())
}

fn read_artifact(path: &Path, model_name: &str) -> Result<String, AppError> {
    fs::read_to_string(path).map_err(|err| {
        tracing::error!(path = %path.display(), error = %err, "cannot read model document");
        AppError::from(PublishError::MissingModelArtifact(model_name.to_string()))
    })
}
