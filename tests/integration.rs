use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_hdoc")))
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

// -- stdin mode --

#[test]
fn stdin_mode_produces_json() {
    let input = std::fs::read_to_string(fixture_path("sample.h")).unwrap();

    cmd()
        .args(["--name", "sample.h"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"sample.h\""))
        .stdout(predicate::str::contains("A sample header."));
}

#[test]
fn stdin_mode_default_name() {
    cmd()
        .write_stdin("int f(void);\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"stdin.h\""));
}

#[test]
fn stdin_mode_html_format() {
    let input = std::fs::read_to_string(fixture_path("sample.h")).unwrap();

    cmd()
        .args(["-f", "html", "--name", "sample.h"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<!DOCTYPE html>"))
        .stdout(predicate::str::contains("<h1 id=\"sample-h\">sample.h</h1>"));
}

#[test]
fn stdin_mode_substitutes_source_url() {
    let input = std::fs::read_to_string(fixture_path("sample.h")).unwrap();

    cmd()
        .args(["--name", "sample.h"])
        .args(["--source-url", "https://example.com/blob/${name}"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "https://example.com/blob/sample.h#L4",
        ));
}

// -- file mode --

#[test]
fn file_mode_creates_output() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("geometry.h"))
        .arg(fixture_path("shapes.h"))
        .assert()
        .success();

    assert!(dir.path().join("geometry.json").exists());
    assert!(dir.path().join("shapes.json").exists());
}

#[test]
fn file_mode_requires_output() {
    cmd()
        .arg(fixture_path("sample.h"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("--output is required"));
}

#[test]
fn unknown_format_fails() {
    cmd()
        .args(["-f", "docx"])
        .write_stdin("int f(void);\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

// -- cross-references --

#[test]
fn includes_link_across_the_batch() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("geometry.h"))
        .arg(fixture_path("shapes.h"))
        .assert()
        .success();

    let shapes = std::fs::read_to_string(dir.path().join("shapes.json")).unwrap();
    assert!(shapes.contains("#geometry-h"));
    let geometry = std::fs::read_to_string(dir.path().join("geometry.json")).unwrap();
    assert!(geometry.contains("#shapes-h"));
    assert!(geometry.contains("&lt;math.h&gt;"));
}

#[test]
fn include_outside_the_batch_stays_plain() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("geometry.h"))
        .assert()
        .success();

    let geometry = std::fs::read_to_string(dir.path().join("geometry.json")).unwrap();
    assert!(!geometry.contains("#shapes-h"));
    assert!(geometry.contains("shapes.h"));
}

#[test]
fn section_groups_entries_in_json() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .args(["--source-url", "https://example.com/blob/${name}"])
        .arg(fixture_path("geometry.h"))
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("geometry.json")).unwrap())
            .unwrap();
    assert_eq!(json["id"], "geometry-h");
    assert_eq!(json["sections"][0]["id"], "angles");
    assert_eq!(json["sections"][0]["functions"][0]["name"], "geo_norm_angle");
    assert_eq!(
        json["sections"][0]["functions"][0]["permalink"],
        "https://example.com/blob/geometry.h#L45"
    );
    assert_eq!(json["functions"][0]["name"], "geo_trace");
    assert_eq!(json["function_types"][0]["name"], "geo_trace_fn");
    assert_eq!(json["structs"][0]["name"], "geo_point");
    assert_eq!(json["enums"][0]["name"], "geo_winding");
    assert_eq!(json["defines"][0]["name"], "GEO_PI");
}

// -- errors --

#[test]
fn semantic_error_reports_position() {
    cmd()
        .write_stdin("/** @brief one\n * @brief two\n */\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate `@brief`"))
        .stderr(predicate::str::contains("stdin.h:2:4"));
}

#[test]
fn lex_error_reports_position() {
    cmd()
        .write_stdin("int x[3];\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("stdin.h:1:6"))
        .stderr(predicate::str::contains("lex error"));
}

#[test]
fn batch_error_names_the_failing_file() {
    let dir = TempDir::new().unwrap();
    let bad = dir.path().join("bad.h");
    std::fs::write(&bad, "#import <x.h>\n").unwrap();

    cmd()
        .args(["-o", dir.path().join("out").to_str().unwrap()])
        .arg(fixture_path("geometry.h"))
        .arg(bad.to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad.h:1:2"))
        .stderr(predicate::str::contains("unknown preprocessor directive"));
}

// -- html file mode --

#[test]
fn html_file_mode_renders_param_tables() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .args(["-f", "html"])
        .arg(fixture_path("geometry.h"))
        .assert()
        .success();

    let html = std::fs::read_to_string(dir.path().join("geometry.html")).unwrap();
    assert!(html.contains("<table class=\"params\">"));
    assert!(html.contains("<h2 id=\"angles\">Angles</h2>"));
    assert!(html.contains("<div class=\"warning\">"));
    assert!(html.contains("<a href=\"#geo_winding\">geo_winding</a>"));
}
