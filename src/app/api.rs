//! API facade for the application.
//!
//! Glues context creation and command execution together for the CLI and for
//! library callers.

use std::path::Path;

use crate::app::AppContext;
use crate::app::commands::job::{JobResult, run_job};
use crate::app::commands::validate::ConnectionValidator;
use crate::app::config::load_config;
use crate::app::job_file::load_job;
use crate::domain::password::encrypt_password_if_not_using_variables;
use crate::domain::{AppError, ConnectionDescriptor, JobEntryKind, xml};
use crate::ports::{MessageSink, PublishClientFactory};
use crate::services::{ConsoleMessageSink, HttpClientFactory};

fn create_context(
    config_path: Option<&Path>,
) -> Result<AppContext<HttpClientFactory, ConsoleMessageSink>, AppError> {
    let config = load_config(config_path)?;
    Ok(AppContext::new(HttpClientFactory::new(config), ConsoleMessageSink))
}

/// Check that `connection` can publish; messages go to the console.
pub fn validate(connection: &ConnectionDescriptor, config_path: Option<&Path>) -> Result<bool, AppError> {
    let ctx = create_context(config_path)?;
    validate_with(&ctx, connection)
}

pub fn validate_with<F: PublishClientFactory, M: MessageSink>(
    ctx: &AppContext<F, M>,
    connection: &ConnectionDescriptor,
) -> Result<bool, AppError> {
    let probe = ctx.clients().probe(connection)?;
    Ok(ConnectionValidator::new(probe.as_ref(), connection).validate_connection(ctx.messages(), false))
}

/// Load and run the job file at `job_path`.
pub fn publish(job_path: &Path, config_path: Option<&Path>) -> Result<JobResult, AppError> {
    let ctx = create_context(config_path)?;
    publish_with(&ctx, job_path)
}

pub fn publish_with<F: PublishClientFactory, M: MessageSink>(
    ctx: &AppContext<F, M>,
    job_path: &Path,
) -> Result<JobResult, AppError> {
    let loaded = load_job(job_path)?;
    Ok(run_job(&loaded.job, loaded.variables, ctx.clients()))
}

/// Obscured form of a password for job files.
pub fn encrypt_password(password: &str) -> String {
    encrypt_password_if_not_using_variables(password)
}

/// Persisted XML form of the publish entry `entry_name`.
pub fn export_entry(job_path: &Path, entry_name: &str) -> Result<String, AppError> {
    let loaded = load_job(job_path)?;
    let entry = loaded
        .job
        .entry(entry_name)
        .ok_or_else(|| AppError::JobEntryNotFound(entry_name.to_string()))?;
    let JobEntryKind::DatasourcePublish(publish) = &entry.kind else {
        return Err(AppError::config_error(format!(
            "Job entry '{entry_name}' is not a datasource publish entry"
        )));
    };

    Ok(format!(
        "<entry>\n    {}\n    {}\n{}</entry>\n",
        xml::tag("name", &entry.name),
        xml::tag("type", "DatasourcePublish"),
        publish.to_xml()
    ))
}
