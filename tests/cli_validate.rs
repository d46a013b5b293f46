use std::path::PathBuf;
use std::process::Command;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static TEMP_NONCE: AtomicU64 = AtomicU64::new(0);

const SCHEMA: &str = r#"{
  "types": {
    "Address": { "kind": "object", "fields": { "zip": { "kind": "number" } } },
    "User": {
      "kind": "object",
      "fields": {
        "name": { "kind": "string" },
        "age": { "kind": "number" },
        "address": { "kind": "union", "types": [{ "kind": "ref", "name": "Address" }, { "kind": "undefined" }] }
      }
    }
  },
  "root": "User"
}"#;

fn shapecheck_bin() -> PathBuf {
    if let Some(path) = option_env!("CARGO_BIN_EXE_shapecheck") {
        return PathBuf::from(path);
    }

    let mut exe = std::env::current_exe().expect("test executable path should be known");
    exe.pop();
    if exe.file_name().and_then(|name| name.to_str()) == Some("deps") {
        exe.pop();
    }
    exe.join("shapecheck")
}

fn temp_path(prefix: &str, extension: &str) -> PathBuf {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time should move forward")
        .as_nanos();
    let counter = TEMP_NONCE.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("{prefix}-{timestamp}-{counter}.{extension}"))
}

fn write_temp(prefix: &str, extension: &str, contents: &str) -> PathBuf {
    let path = temp_path(prefix, extension);
    std::fs::write(&path, contents).expect("temp file write should succeed");
    path
}

#[test]
fn validate_reports_each_ndjson_document() {
    let schema = write_temp("shapecheck-schema", "json", SCHEMA);
    let input = write_temp(
        "shapecheck-users",
        "ndjson",
        "{\"name\": \"Alice\", \"age\": 30}\n{\"name\": \"Bob\"}\n",
    );

    let output = Command::new(shapecheck_bin())
        .arg("validate")
        .arg("--schema")
        .arg(&schema)
        .arg("--ndjson")
        .arg("--input")
        .arg(&input)
        .env("NO_COLOR", "1")
        .output()
        .expect("shapecheck validate should execute");

    let _ = std::fs::remove_file(schema);
    let _ = std::fs::remove_file(input);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(":1"), "expected first document to be listed, got: {stdout}");
    assert!(
        stdout.contains("User: Field \"age\" is not of type \"number\""),
        "expected age failure in stdout, got: {stdout}"
    );
}

#[test]
fn validate_json_format_reports_union_failures_at_the_union() {
    let schema = write_temp("shapecheck-schema", "json", SCHEMA);
    let input = write_temp(
        "shapecheck-user",
        "json",
        "{\"payload\": {\"name\": \"Alice\", \"age\": 30, \"address\": {\"zip\": \"x\"}}}",
    );

    let output = Command::new(shapecheck_bin())
        .arg("validate")
        .arg("-s")
        .arg(&schema)
        .arg("--json-pointer")
        .arg("/payload")
        .arg("--format")
        .arg("json")
        .arg("-i")
        .arg(&input)
        .output()
        .expect("shapecheck validate should execute");

    let _ = std::fs::remove_file(schema);
    let _ = std::fs::remove_file(input);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let line: serde_json::Value = serde_json::from_str(stdout.trim()).expect("one JSON report line");
    assert_eq!(line["result"]["fieldPath"], serde_json::json!(["address"]));
    assert_eq!(line["result"]["success"], serde_json::json!(false));
}

#[test]
fn validate_passes_with_explicit_type() {
    let schema = write_temp("shapecheck-schema", "json", SCHEMA);
    let input = write_temp("shapecheck-address", "json", "{\"zip\": 12345}");

    let output = Command::new(shapecheck_bin())
        .arg("validate")
        .arg("--schema")
        .arg(&schema)
        .arg("--type")
        .arg("Address")
        .arg("--input")
        .arg(&input)
        .output()
        .expect("shapecheck validate should execute");

    let _ = std::fs::remove_file(schema);
    let _ = std::fs::remove_file(input);

    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn describe_lists_declared_types() {
    let schema = write_temp("shapecheck-schema", "json", SCHEMA);

    let output = Command::new(shapecheck_bin())
        .arg("describe")
        .arg("--schema")
        .arg(&schema)
        .output()
        .expect("shapecheck describe should execute");

    let _ = std::fs::remove_file(schema);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.lines().collect::<Vec<_>>(),
        ["Named(\"Address\" = [Interface])", "Named(\"User\" = [Interface])"]
    );
}

#[test]
fn unclassifiable_schema_is_an_error() {
    let schema = write_temp("shapecheck-schema", "json", r#"{"types": {"T": {"name": {"kind": "string"}}}}"#);

    let output = Command::new(shapecheck_bin())
        .arg("describe")
        .arg("--schema")
        .arg(&schema)
        .output()
        .expect("shapecheck describe should execute");

    let _ = std::fs::remove_file(schema);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unclassifiable descriptor"), "got: {stderr}");
}

#[test]
fn ndjson_labels_use_source_line_numbers_across_blank_lines() {
    let schema = write_temp("shapecheck-schema", "json", SCHEMA);
    let input = write_temp(
        "shapecheck-users",
        "ndjson",
        "{\"name\": \"Alice\", \"age\": 30}\n\n{\"name\": \"Bob\"}\n",
    );

    let output = Command::new(shapecheck_bin())
        .arg("validate")
        .arg("--schema")
        .arg(&schema)
        .arg("--ndjson")
        .arg("--format")
        .arg("json")
        .arg("--input")
        .arg(&input)
        .output()
        .expect("shapecheck validate should execute");

    let input_str = input.to_string_lossy().to_string();
    let _ = std::fs::remove_file(schema);
    let _ = std::fs::remove_file(input);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let labels: Vec<String> = stdout
        .lines()
        .map(|line| {
            let line: serde_json::Value = serde_json::from_str(line).expect("JSON report line");
            line["document"].as_str().unwrap_or_default().to_string()
        })
        .collect();
    assert_eq!(labels, [format!("{input_str}:1"), format!("{input_str}:3")]);
}

#[test]
fn ndjson_parse_errors_name_the_source_line() {
    let schema = write_temp("shapecheck-schema", "json", SCHEMA);
    let input = write_temp("shapecheck-users", "ndjson", "{\"name\": \"Alice\", \"age\": 30}\n\n{oops\n");

    let output = Command::new(shapecheck_bin())
        .arg("validate")
        .arg("--schema")
        .arg(&schema)
        .arg("--ndjson")
        .arg("--input")
        .arg(&input)
        .output()
        .expect("shapecheck validate should execute");

    let _ = std::fs::remove_file(schema);
    let _ = std::fs::remove_file(input);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("NDJSON line 3"), "got: {stderr}");
}
