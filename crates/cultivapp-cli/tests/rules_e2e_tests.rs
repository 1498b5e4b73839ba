//! End-to-end tests for `cultivapp rules` and `cultivapp config`

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::{
    matchers::{body_json, header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn cultivapp(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("cultivapp").unwrap();
    cmd.current_dir(dir.path())
        .env("CULTIVAPP_CONFIG", dir.path().join("config.toml"))
        .env("NO_COLOR", "1")
        .env_remove("CULTIVAPP_SERVER_URL")
        .env_remove("CULTIVAPP_TOKEN");
    cmd
}

#[tokio::test]
async fn test_rules_list_filtered() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/reglas"))
        .and(query_param("tipo", "RIEGO"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "id": 1, "descripcion": "Riego por goteo", "tipo": "RIEGO", "intervaloDias": 2 }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    cultivapp(&dir)
        .args(["--server-url", &server.uri(), "rules", "list", "--tipo", "riego"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Riego por goteo"))
        .stdout(predicate::str::contains("Total: 1 rule(s)"));
}

#[tokio::test]
async fn test_rules_list_server_error() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/reglas"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Error interno"))
        .mount(&server)
        .await;

    cultivapp(&dir)
        .args(["--server-url", &server.uri(), "rules", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error interno"));
}

#[tokio::test]
async fn test_rules_add_and_delete() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/api/reglas"))
        .and(body_json(serde_json::json!({
            "descripcion": "Abonado mensual",
            "tipo": "FERTILIZACION",
            "intervaloDias": 30
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": 12,
            "descripcion": "Abonado mensual",
            "tipo": "FERTILIZACION",
            "intervaloDias": 30
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/reglas/12"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    cultivapp(&dir)
        .args([
            "--server-url",
            &server.uri(),
            "rules",
            "add",
            "--descripcion",
            "Abonado mensual",
            "--tipo",
            "FERTILIZACION",
            "--intervalo",
            "30",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created rule 12"));

    cultivapp(&dir)
        .args(["--server-url", &server.uri(), "rules", "delete", "12"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted rule 12"));
}

#[tokio::test]
async fn test_rules_add_rejects_zero_interval() {
    let dir = TempDir::new().unwrap();
    cultivapp(&dir)
        .args(["rules", "add", "-d", "x", "-t", "RIEGO", "-i", "0"])
        .assert()
        .failure();
}

#[tokio::test]
async fn test_token_from_config_file_is_sent() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/reglas/tipos"))
        .and(header("authorization", "Bearer abc123"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!(["RIEGO", "COSECHA"])),
        )
        .expect(1)
        .mount(&server)
        .await;

    cultivapp(&dir)
        .args(["config", "set", "token", "abc123"])
        .assert()
        .success();
    cultivapp(&dir)
        .args(["config", "set", "server_url", &server.uri()])
        .assert()
        .success();

    cultivapp(&dir)
        .args(["config", "get", "server_url"])
        .assert()
        .success()
        .stdout(predicate::str::contains(server.uri()));

    cultivapp(&dir)
        .args(["rules", "types"])
        .assert()
        .success()
        .stdout(predicate::str::contains("RIEGO"))
        .stdout(predicate::str::contains("COSECHA"));
}

#[test]
fn test_config_show_masks_token() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.toml"), "token = \"secret-token-9876\"\n").unwrap();

    cultivapp(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("****9876"))
        .stdout(predicate::str::contains("secret-token").not());
}
