use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn contactdir() -> Command {
    let mut cmd = cargo_bin_cmd!("contactdir");
    cmd.env_remove("SUPABASE_URL")
        .env_remove("SUPABASE_ANON_KEY")
        .env_remove("RUST_LOG")
        .env_remove("CONTACTDIR_LOG");
    cmd
}

fn fixture() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[
            {{"id": 3, "name": "Carol White", "email": "carol@example.com", "phone": "555-0103", "company": "Other Inc"}},
            {{"id": 1, "name": "Alice Smith", "email": "alice@example.com", "phone": "555-0101", "company": "Acme Corp"}},
            {{"id": 2, "name": "Bob Jones", "email": "bob@acme.io", "phone": null, "company": "Other Inc"}}
        ]"#
    )
    .unwrap();
    file
}

#[test]
fn missing_service_url_is_fatal() {
    contactdir()
        .args(["list"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Missing env.SUPABASE_URL"));
}

#[test]
fn missing_service_key_is_fatal() {
    contactdir()
        .env("SUPABASE_URL", "https://example.supabase.co")
        .args(["status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing env.SUPABASE_ANON_KEY"));
}

#[test]
fn list_without_query_prints_everyone_by_name() {
    let file = fixture();
    let out = contactdir()
        .args(["--fixture", file.path().to_str().unwrap(), "list"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let out = String::from_utf8(out).unwrap();
    let alice = out.find("Alice Smith").unwrap();
    let bob = out.find("Bob Jones").unwrap();
    let carol = out.find("Carol White").unwrap();
    assert!(alice < bob && bob < carol);
}

#[test]
fn list_filters_on_name_email_and_company() {
    let file = fixture();
    contactdir()
        .args(["--fixture", file.path().to_str().unwrap(), "list", "acme"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alice Smith"))
        .stdout(predicate::str::contains("Bob Jones"))
        .stdout(predicate::str::contains("Carol White").not());
}

#[test]
fn list_with_no_match_prints_search_empty_state() {
    let file = fixture();
    contactdir()
        .args(["--fixture", file.path().to_str().unwrap(), "list", "zzz"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No contacts found matching your search."));
}

#[test]
fn list_json_round_trips_the_rows() {
    let file = fixture();
    let out = contactdir()
        .args(["--fixture", file.path().to_str().unwrap(), "list", "other", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let rows: Vec<serde_json::Value> = serde_json::from_slice(&out).unwrap();
    let names: Vec<_> = rows.iter().map(|r| r["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["Bob Jones", "Carol White"]);
    assert_eq!(rows[0]["phone"], "");
}

#[test]
fn status_reports_connection_and_count() {
    let file = fixture();
    contactdir()
        .args(["--fixture", file.path().to_str().unwrap(), "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Connection Status: Connected"))
        .stdout(predicate::str::contains("Total Contacts: 3"));
}

#[test]
fn unreadable_fixture_fails() {
    contactdir()
        .args(["--fixture", "/definitely/not/here.json", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}
