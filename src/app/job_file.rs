//! TOML job files.
//!
//! ```toml
//! name = "nightly"
//!
//! [variables]
//! MODEL = "sales"
//!
//! [[entries]]
//! type = "build_model"
//! name = "build"
//! model_name = "${MODEL}"
//! xmi = "sales.xmi"
//! database = { name = "acme_db", type = "POSTGRESQL", hostname = "db", database_name = "acme" }
//!
//! [[entries]]
//! type = "datasource_publish"
//! name = "publish"
//! server_url = "http://localhost:8080/pentaho"
//! server_user_id = "admin"
//! server_password = "${BI_PASSWORD}"
//! ```
//!
//! Without `[[hops]]` the entries are chained in declaration order.
//! `${NAME}` falls back to the process environment when `[variables]` does
//! not define `NAME`.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::password::decrypt_password_optionally_encrypted;
use crate::domain::{
    AppError, BuildModelEntry, DatabaseAccessType, DatabaseDescriptor, DatabaseType,
    DatasourcePublishEntry, Hop, Job, JobEntry, JobEntryKind, Variables,
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct JobFile {
    name: String,
    #[serde(default)]
    variables: BTreeMap<String, String>,
    #[serde(default)]
    entries: Vec<EntryFile>,
    #[serde(default)]
    hops: Vec<HopFile>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum EntryFile {
    Start {
        name: String,
    },
    BuildModel {
        name: String,
        model_name: String,
        xmi: PathBuf,
        #[serde(default)]
        schema: Option<PathBuf>,
        #[serde(default)]
        dsw: bool,
        #[serde(default)]
        database: Option<DatabaseFile>,
    },
    DatasourcePublish {
        name: String,
        server_url: String,
        #[serde(default)]
        server_user_id: String,
        #[serde(default)]
        server_password: String,
        #[serde(default)]
        model_name: String,
        #[serde(default, rename = "override")]
        override_existing: bool,
        #[serde(default)]
        acl_access_type: String,
        #[serde(default)]
        acl_user_or_role: String,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DatabaseFile {
    name: String,
    #[serde(rename = "type", default = "default_database_type")]
    database_type: String,
    #[serde(default)]
    access: DatabaseAccessType,
    #[serde(default)]
    hostname: String,
    #[serde(default)]
    port: String,
    #[serde(default)]
    database_name: String,
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    options: BTreeMap<String, String>,
    #[serde(default)]
    lower_case_identifiers: bool,
    #[serde(default)]
    quote_all_fields: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct HopFile {
    from: String,
    to: String,
}

fn default_database_type() -> String {
    DatabaseType::default().short_name().to_string()
}

/// A job together with the variables it declares.
#[derive(Debug, Clone)]
pub struct LoadedJob {
    pub job: Job,
    pub variables: Variables,
}

pub fn load_job(path: &Path) -> Result<LoadedJob, AppError> {
    let content = fs::read_to_string(path).map_err(|err| {
        AppError::config_error(format!("Cannot read job file {}: {}", path.display(), err))
    })?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut loaded = parse_job_content(&content, base_dir)?;
    loaded.variables.fill_missing(std::env::vars());
    Ok(loaded)
}

/// Parse job TOML; relative model paths are taken from `base_dir`.
///
/// Only the variables the file declares are returned.
pub fn parse_job_content(content: &str, base_dir: &Path) -> Result<LoadedJob, AppError> {
    let file: JobFile = toml::from_str(content)?;

    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(file.entries.len());
    for entry in file.entries {
        let entry = into_entry(entry, base_dir)?;
        if !seen.insert(entry.name.clone()) {
            return Err(AppError::config_error(format!("Duplicate job entry '{}'", entry.name)));
        }
        entries.push(entry);
    }

    let hops = if file.hops.is_empty() {
        entries
            .windows(2)
            .map(|pair| Hop { from: pair[0].name.clone(), to: pair[1].name.clone() })
            .collect()
    } else {
        let mut hops = Vec::with_capacity(file.hops.len());
        for hop in file.hops {
            for end in [&hop.from, &hop.to] {
                if !seen.contains(end) {
                    return Err(AppError::JobEntryNotFound(end.clone()));
                }
            }
            hops.push(Hop { from: hop.from, to: hop.to });
        }
        hops
    };

    let mut variables = Variables::new();
    for (name, value) in file.variables {
        variables.set(name, value);
    }

    Ok(LoadedJob { job: Job { name: file.name, entries, hops }, variables })
}

fn into_entry(entry: EntryFile, base_dir: &Path) -> Result<JobEntry, AppError> {
    let entry = match entry {
        EntryFile::Start { name } => JobEntry::new(name, JobEntryKind::Start),
        EntryFile::BuildModel { name, model_name, xmi, schema, dsw, database } => {
            let database = database.map(into_database).transpose()?;
            JobEntry::new(
                name,
                JobEntryKind::BuildModel(BuildModelEntry {
                    model_name,
                    database,
                    xmi_path: base_dir.join(xmi),
                    schema_path: schema.map(|schema| base_dir.join(schema)),
                    dsw,
                }),
            )
        }
        EntryFile::DatasourcePublish {
            name,
            server_url,
            server_user_id,
            server_password,
            model_name,
            override_existing,
            acl_access_type,
            acl_user_or_role,
        } => JobEntry::new(
            name,
            JobEntryKind::DatasourcePublish(DatasourcePublishEntry {
                server_url,
                server_user_id,
                server_password: decrypt_password_optionally_encrypted(&server_password)?,
                model_name,
                override_existing,
                acl_access_type,
                acl_user_or_role,
            }),
        ),
    };
    Ok(entry)
}

fn into_database(file: DatabaseFile) -> Result<DatabaseDescriptor, AppError> {
    Ok(DatabaseDescriptor {
        name: file.name,
        database_type: file.database_type.parse()?,
        access_type: file.access,
        hostname: file.hostname,
        port: file.port,
        database_name: file.database_name,
        username: file.username,
        password: decrypt_password_optionally_encrypted(&file.password)?,
        extra_options: file.options,
        force_lower_case_identifiers: file.lower_case_identifiers,
        quote_all_fields: file.quote_all_fields,
    })
}
