//! Shared testing utilities for bipub CLI tests.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated working directory with a job file and its model documents.
#[allow(dead_code)]
pub struct TestContext {
    root: TempDir,
}

#[allow(dead_code)]
impl TestContext {
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        fs::write(root.path().join("sales.xmi"), "<xmi:XMI/>").expect("Failed to write model");
        Self { root }
    }

    pub fn work_dir(&self) -> &Path {
        self.root.path()
    }

    /// Build a command for invoking the compiled `bipub` binary in the work directory.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("bipub").expect("Failed to locate bipub binary");
        cmd.current_dir(self.work_dir())
            .env_remove("BIPUB_TIMEOUT_SECS")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Write a two-entry job (build model, then publish) targeting `server_url`.
    pub fn write_job(&self, server_url: &str) -> PathBuf {
        let content = format!(
            r#"name = "nightly"

[[entries]]
type = "build_model"
name = "build"
model_name = "sales"
xmi = "sales.xmi"

[entries.database]
name = "acme_db"
type = "POSTGRESQL"
hostname = "db.internal"
database_name = "acme"
username = "etl"
password = "etl"

[[entries]]
type = "datasource_publish"
name = "publish"
server_url = "{server_url}"
server_user_id = "admin"
server_password = "password"
"#
        );
        let path = self.work_dir().join("job.toml");
        fs::write(&path, content).expect("Failed to write job file");
        path
    }

    pub fn write_config(&self, content: &str) -> PathBuf {
        let path = self.work_dir().join("bipub.toml");
        fs::write(&path, content).expect("Failed to write config file");
        path
    }
}
