mod common;

use assert_cmd::Command;
use phonebook::{ContactsEngine, MemoryContactsEngine, NewContact};
use predicates::prelude::*;
use tempfile::TempDir;

fn phonebook(base_url: &str, args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("phonebook").expect("bin");
    cmd.arg("--addr").arg(base_url).args(args);
    cmd.assert()
}

// `phonebook` with no args should exit with a non-zero code
#[test]
fn client_cli_no_args() {
    Command::cargo_bin("phonebook").expect("bin").assert().failure();
}

#[test]
fn client_cli_help() {
    Command::cargo_bin("phonebook")
        .expect("bin")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("rm"));
}

#[test]
fn client_cli_rejects_malformed_ids() {
    Command::cargo_bin("phonebook")
        .expect("bin")
        .args(["rm", "not-an-id"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("malformatted id"));
}

#[tokio::test]
async fn client_cli_lists_adds_and_removes() {
    let engine = MemoryContactsEngine::new();
    let arto = engine
        .insert(NewContact::new("Arto Hellas", "040-123456"))
        .unwrap();
    engine
        .insert(NewContact::new("Ada Lovelace", "39-445323"))
        .unwrap();
    let base_url = common::spawn_engine(engine.clone()).await;

    let handle = tokio::task::spawn_blocking(move || {
        phonebook(&base_url, &["list", "arto"])
            .success()
            .stdout(predicate::str::contains("Arto Hellas 040-123456"))
            .stdout(predicate::str::contains("Ada Lovelace").not());

        phonebook(&base_url, &["add", "Grace Hopper", "12-3456789"])
            .success()
            .stderr(predicate::str::contains("Added Grace Hopper"));

        phonebook(&base_url, &["add", "Ada Lovelace", "39-999999", "--yes"])
            .success()
            .stderr(predicate::str::contains("phone number of Ada Lovelace was updated"));

        phonebook(&base_url, &["add", "Linus", "1234"])
            .code(1)
            .stderr(predicate::str::contains("Person validation failed"));

        let id = arto.id.to_string();
        phonebook(&base_url, &["rm", &id, "--yes"])
            .success()
            .stdout(predicate::str::contains("deleted Arto Hellas"));

        phonebook(&base_url, &["info"])
            .success()
            .stdout(predicate::str::contains("Phonebook has info for 2 people"));
    });
    handle.await.expect("cli run");

    let names: Vec<_> = engine
        .list()
        .unwrap()
        .into_iter()
        .map(|c| (c.name, c.number))
        .collect();
    assert_eq!(
        names,
        [
            ("Ada Lovelace".to_string(), "39-999999".to_string()),
            ("Grace Hopper".to_string(), "12-3456789".to_string()),
        ]
    );
}

#[test]
fn server_cli_rejects_unknown_engines() {
    Command::cargo_bin("phonebook-server")
        .expect("bin")
        .args(["--engine", "mongo"])
        .assert()
        .failure();
}

#[test]
fn admin_cli_lists_and_adds_records() {
    let temp_dir = TempDir::new().expect("unable to create temporary working directory");

    Command::cargo_bin("phonebook-admin")
        .expect("bin")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 0 records in the phonebook"));

    Command::cargo_bin("phonebook-admin")
        .expect("bin")
        .arg(temp_dir.path())
        .args(["Ada Lovelace", "39-445323"])
        .assert()
        .success()
        .stdout(predicate::str::contains("added Ada Lovelace number 39-445323 to phonebook"));

    Command::cargo_bin("phonebook-admin")
        .expect("bin")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout("Ada Lovelace 39-445323\n");
}

#[test]
fn admin_cli_applies_the_service_rules() {
    let temp_dir = TempDir::new().expect("unable to create temporary working directory");

    Command::cargo_bin("phonebook-admin")
        .expect("bin")
        .arg(temp_dir.path())
        .args(["Ada Lovelace", "12"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Person validation failed"));

    Command::cargo_bin("phonebook-admin")
        .expect("bin")
        .arg(temp_dir.path())
        .args(["Ada Lovelace", "39-445323"])
        .assert()
        .success();

    Command::cargo_bin("phonebook-admin")
        .expect("bin")
        .arg(temp_dir.path())
        .args(["Ada Lovelace", "12-3456789"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("name must be unique"));
}

// a name without a number is a usage error
#[test]
fn admin_cli_requires_a_number_with_a_name() {
    let temp_dir = TempDir::new().expect("unable to create temporary working directory");
    Command::cargo_bin("phonebook-admin")
        .expect("bin")
        .arg(temp_dir.path())
        .arg("Ada Lovelace")
        .assert()
        .failure();
}
