use assert_cmd::Command;

#[test]
fn openapi_prints_books_paths() {
    let output = Command::cargo_bin("owl")
        .unwrap()
        .arg("openapi")
        .env("OWL_ENV", "local")
        .env("OWL_CONFIG_DIR", std::env::temp_dir().join("owl-cli-no-config"))
        .output()
        .unwrap();

    assert!(output.status.success());
    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["info"]["title"], "Owl Bookstore API");
    assert!(doc["paths"]["/books"]["post"].is_object());
    assert!(doc["paths"]["/books/{id}"]["delete"].is_object());
    assert!(doc["paths"].get("/").is_none());
}

#[test]
fn unknown_environment_fails() {
    Command::cargo_bin("owl")
        .unwrap()
        .arg("openapi")
        .env("OWL_ENV", "qa")
        .assert()
        .failure();
}

#[test]
fn serve_rejects_invalid_port() {
    Command::cargo_bin("owl")
        .unwrap()
        .args(["serve", "--port", "not-a-port"])
        .assert()
        .failure();
}
