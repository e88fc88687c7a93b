//! Job runner: executes entries in hop order and aggregates a result.

use chrono::{DateTime, Utc};

use crate::app::commands::{build_model, publish};
use crate::domain::{AppError, Job, JobEntry, JobEntryKind, Variables};
use crate::ports::PublishClientFactory;

/// Outcome of one job run.
#[derive(Debug, Clone)]
pub struct JobResult {
    pub result: bool,
    pub nr_errors: u32,
    pub entries_run: Vec<String>,
    pub messages: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl JobResult {
    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

/// Run `job` from its start entry, stopping at the first failing entry.
pub fn run_job(job: &Job, variables: Variables, factory: &dyn PublishClientFactory) -> JobResult {
    let started_at = Utc::now();
    let mut variables = variables;
    let mut entries_run = Vec::new();
    let mut messages = Vec::new();
    let mut nr_errors = 0;

    tracing::info!(job = %job.name, "job started");
    for entry in job.execution_order() {
        entries_run.push(entry.name.clone());
        match run_entry(job, entry, &mut variables, factory) {
            Ok(()) => {
                tracing::debug!(entry = %entry.name, "entry finished");
            }
            Err(err) => {
                tracing::error!(job = %job.name, entry = %entry.name, error = %err, "entry failed");
                messages.push(format!("{}: {}", entry.name, err));
                nr_errors += 1;
                break;
            }
        }
    }

    let result = JobResult {
        result: nr_errors == 0,
        nr_errors,
        entries_run,
        messages,
        started_at,
        finished_at: Utc::now(),
    };
    tracing::info!(
        job = %job.name,
        success = result.result,
        errors = result.nr_errors,
        elapsed_ms = result.elapsed_ms(),
        "job finished"
    );
    result
}

fn run_entry(
    job: &Job,
    entry: &JobEntry,
    variables: &mut Variables,
    factory: &dyn PublishClientFactory,
) -> Result<(), AppError> {
    match &entry.kind {
        JobEntryKind::Start => Ok(()),
        JobEntryKind::BuildModel(build) => build_model::execute(build, variables),
        JobEntryKind::DatasourcePublish(publish_entry) => {
            publish::execute(job, &entry.name, publish_entry, variables, factory)
        }
    }
}
