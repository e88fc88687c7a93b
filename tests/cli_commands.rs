mod common;

use common::TestContext;
use mockito::Matcher;
use predicates::prelude::*;

const PUBLISH_ACTION: &str = "org.pentaho.security.publish";
const MANAGE_ACTION: &str = "org.pentaho.platform.dataaccess.datasource.security.manage";

fn mock_healthy_server(server: &mut mockito::Server) -> Vec<mockito::Mock> {
    vec![
        server
            .mock("GET", "/pentaho/webcontext.js")
            .with_status(200)
            .with_body("var CONTEXT_PATH = '/pentaho/';")
            .create(),
        server
            .mock("GET", "/pentaho/api/authorization/action/isauthorized")
            .match_query(Matcher::UrlEncoded("authAction".into(), PUBLISH_ACTION.into()))
            .with_status(200)
            .with_body("true")
            .create(),
        server
            .mock("GET", "/pentaho/api/authorization/action/isauthorized")
            .match_query(Matcher::UrlEncoded("authAction".into(), MANAGE_ACTION.into()))
            .with_status(200)
            .with_body("true")
            .create(),
        server
            .mock("GET", "/pentaho/plugin/data-access/api/connection/getresponse")
            .match_query(Matcher::UrlEncoded("name".into(), "acme_db".into()))
            .with_status(404)
            .create(),
        server
            .mock("POST", "/pentaho/plugin/data-access/api/connection/add")
            .match_body(Matcher::PartialJson(serde_json::json!({ "name": "acme_db" })))
            .with_status(200)
            .create(),
    ]
}

#[test]
fn encrypt_prints_obscured_password() {
    let ctx = TestContext::new();
    ctx.cli()
        .args(["encrypt", "s3cret"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Encrypted "))
        .stdout(predicate::str::contains("s3cret").not());
}

#[test]
fn encrypt_leaves_variables_alone() {
    let ctx = TestContext::new();
    ctx.cli().args(["encrypt", "${BI_PASSWORD}"]).assert().success().stdout("${BI_PASSWORD}\n");
}

#[test]
fn export_entry_prints_persisted_xml() {
    let ctx = TestContext::new();
    let job = ctx.write_job("http://localhost:8080/pentaho");

    ctx.cli()
        .arg("export-entry")
        .arg(&job)
        .arg("publish")
        .assert()
        .success()
        .stdout(predicate::str::contains("<name>publish</name>"))
        .stdout(predicate::str::contains(
            "<server_url>http://localhost:8080/pentaho</server_url>",
        ))
        .stdout(predicate::str::contains("<server_password>Encrypted "))
        .stdout(predicate::str::contains("<override>N</override>"));
}

#[test]
fn export_entry_fails_for_unknown_entry() {
    let ctx = TestContext::new();
    let job = ctx.write_job("http://localhost:8080/pentaho");

    ctx.cli()
        .arg("export-entry")
        .arg(&job)
        .arg("absent")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Job entry 'absent' not found"));
}

#[test]
fn validate_rejects_unreachable_server() {
    let ctx = TestContext::new();
    ctx.cli()
        .args(["validate", "--url", "http://127.0.0.1:1/pentaho", "--user", "admin"])
        .args(["--password", "password"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid BI Server"));
}

#[test]
fn validate_accepts_healthy_server() {
    let ctx = TestContext::new();
    let mut server = mockito::Server::new();
    let _mocks = mock_healthy_server(&mut server);
    let url = format!("{}/pentaho", server.url());

    ctx.cli()
        .args(["validate", "--url", &url, "--user", "admin", "--password", "password"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Connection Successful"));
}

#[test]
fn publish_runs_job_against_server() {
    let ctx = TestContext::new();
    let mut server = mockito::Server::new();
    let _mocks = mock_healthy_server(&mut server);
    let metadata = server
        .mock("PUT", "/pentaho/plugin/data-access/api/metadata/import")
        .match_header("content-type", Matcher::Regex("multipart/form-data".into()))
        .with_status(200)
        .with_body("3")
        .expect(1)
        .create();
    let job = ctx.write_job(&format!("{}/pentaho", server.url()));

    ctx.cli()
        .arg("publish")
        .arg(&job)
        .assert()
        .success()
        .stdout(predicate::str::contains("Job finished"));
    metadata.assert();
}

#[test]
fn failed_metadata_publish_rolls_back_connection() {
    let ctx = TestContext::new();
    let mut server = mockito::Server::new();
    let _mocks = mock_healthy_server(&mut server);
    server
        .mock("PUT", "/pentaho/plugin/data-access/api/metadata/import")
        .with_status(200)
        .with_body("2")
        .create();
    let rollback = server
        .mock("GET", "/pentaho/plugin/data-access/api/connection/deletebyname")
        .match_query(Matcher::UrlEncoded("name".into(), "acme_db".into()))
        .with_status(200)
        .expect(1)
        .create();
    let config = ctx.write_config("[csrf]\nenabled = false\n");
    let job = ctx.write_job(&format!("{}/pentaho", server.url()));

    ctx.cli()
        .arg("--config")
        .arg(&config)
        .arg("publish")
        .arg(&job)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Job finished with 1 error(s)"));
    rollback.assert();
}

#[test]
fn invalid_config_is_reported() {
    let ctx = TestContext::new();
    let config = ctx.write_config("[http]\ntimeout_secs = 0\n");
    let job = ctx.write_job("http://localhost:8080/pentaho");

    ctx.cli()
        .arg("--config")
        .arg(&config)
        .arg("publish")
        .arg(&job)
        .assert()
        .failure()
        .stderr(predicate::str::contains("timeout_secs must be greater than 0"));
}
