//! Command-line behaviour of the `violation-tracker` binary

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn temp_file(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(suffix).expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write temp file");
    file
}

fn bin() -> Command {
    Command::cargo_bin("violation-tracker").expect("binary should build")
}

const CURRENT_JSON: &str = r#"[
    {"rule_key": "R1", "line": 3, "message": "Avoid magic numbers"},
    {"rule_key": "R1", "line": 5, "message": "Brand new finding"}
]"#;

const REFERENCE_JSON: &str = r#"[
    {"id": 7, "rule_key": "R1", "line": 2, "message": "Avoid magic numbers", "created_at": "2023-01-01T00:00:00Z"},
    {"id": 8, "rule_key": "R2", "line": 9, "message": "Gone", "created_at": "2023-01-01T00:00:00Z"}
]"#;

#[test]
fn test_track_json_with_sources() {
    let current = temp_file(".json", CURRENT_JSON);
    let reference = temp_file(".json", REFERENCE_JSON);
    let reference_source = temp_file(".java", "class A {\n  int x = 42;\n}\n");
    let current_source = temp_file(".java", "// header\nclass A {\n  int x = 42;\n}\n  int y = 7;\n");

    let output = bin()
        .args(["--format", "json", "track"])
        .arg(current.path())
        .arg(reference.path())
        .arg("--reference-source")
        .arg(reference_source.path())
        .arg("--current-source")
        .arg(current_source.path())
        .args(["--analysis-time", "2024-06-01T12:00:00Z"])
        .output()
        .expect("Failed to run binary");

    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Output should be JSON");

    assert_eq!(json["summary"]["new"], 1);
    assert_eq!(json["summary"]["tracked"], 1);
    assert_eq!(json["summary"]["closed"], 1);

    let violations = json["violations"].as_array().unwrap();
    assert_eq!(violations[0]["is_new"], false);
    assert_eq!(violations[0]["reference_id"], 7);
    assert_eq!(violations[0]["tier"], "line_and_message");
    assert_eq!(violations[0]["created_at"], "2023-01-01T00:00:00Z");
    assert_eq!(violations[1]["is_new"], true);
    assert_eq!(violations[1]["created_at"], "2024-06-01T12:00:00Z");

    assert_eq!(json["closed"][0]["id"], 8);
}

#[test]
fn test_track_tsv_input_and_output() {
    let current = temp_file(".tsv", "rule_key\tline\tmessage\nR1\t2\tAvoid magic numbers\n");
    let reference = temp_file(
        ".tsv",
        "id\trule_key\tline\tmessage\tchecksum\tpermanent_id\tcreated_at\n\
         7\tR1\t2\tAvoid magic numbers\t\t55\t2023-01-01T00:00:00Z\n",
    );

    bin()
        .args(["--format", "tsv", "track"])
        .arg(current.path())
        .arg(reference.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("rule_key\tline\tis_new"))
        .stdout(predicate::str::contains("R1\t2\tfalse"))
        .stdout(predicate::str::contains("\t55\t7\tline+message\t"));
}

#[test]
fn test_track_text_output() {
    let current = temp_file(".json", CURRENT_JSON);
    let reference = temp_file(".json", REFERENCE_JSON);

    bin()
        .arg("track")
        .arg(current.path())
        .arg(reference.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Tracking Results"))
        .stdout(predicate::str::contains("New: 2"))
        .stdout(predicate::str::contains("Closed:"));
}

#[test]
fn test_track_rejects_invalid_checksum() {
    let current = temp_file(
        ".json",
        r#"[{"rule_key": "R1", "line": 1, "message": "m", "checksum": "nope"}]"#,
    );
    let reference = temp_file(".json", "[]");

    bin()
        .arg("track")
        .arg(current.path())
        .arg(reference.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid checksum"));
}

#[test]
fn test_track_requires_both_sources() {
    let current = temp_file(".json", "[]");
    let reference = temp_file(".json", "[]");
    let source = temp_file(".java", "class A {}\n");

    bin()
        .arg("track")
        .arg(current.path())
        .arg(reference.path())
        .arg("--current-source")
        .arg(source.path())
        .assert()
        .failure();
}

#[test]
fn test_track_with_config_file() {
    let current = temp_file(".json", r#"[{"rule_key": "R1", "message": "abcdef-1"}]"#);
    let reference = temp_file(
        ".json",
        r#"[{"id": 1, "rule_key": "R1", "message": "abcdef-2", "created_at": "2023-01-01T00:00:00Z"}]"#,
    );
    let config = temp_file(".json", r#"{"message_max_length": 6}"#);

    bin()
        .args(["--format", "tsv", "track"])
        .arg(current.path())
        .arg(reference.path())
        .arg("--config")
        .arg(config.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("no-line+message"));
}

#[test]
fn test_checksums_command() {
    let source = temp_file(".txt", "Привет Мир");

    bin()
        .arg("checksums")
        .arg(source.path())
        .assert()
        .success()
        .stdout("1\t5ba3a45e1299ede07f56e5531351be52\n");
}

#[test]
fn test_diff_command() {
    let reference = temp_file(".java", "a();\nb();\n");
    let current = temp_file(".java", "x();\na();\nb();\n");

    bin()
        .args(["--format", "tsv", "diff"])
        .arg(reference.path())
        .arg(current.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("reference\tcurrent\n1\t2\n2\t3\n"));
}

#[test]
fn test_track_csv_with_quoted_messages() {
    let current = temp_file(
        ".csv",
        "rule_key,line,message\nR1,3,\"Remove this import, or use it\"\n",
    );
    let reference = temp_file(
        ".csv",
        "id,rule_key,line,message,checksum,permanent_id,created_at\n\
         4,R1,3,\"Remove this import, or use it\",,,2023-01-01T00:00:00Z\n",
    );

    let output = bin()
        .args(["--format", "json", "track"])
        .arg(current.path())
        .arg(reference.path())
        .output()
        .expect("Failed to run binary");

    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Output should be JSON");
    assert_eq!(json["summary"]["tracked"], 1);
    assert_eq!(
        json["violations"][0]["message"],
        "Remove this import, or use it"
    );
}

#[test]
fn test_track_tsv_output_escapes_messages() {
    let current = temp_file(
        ".json",
        r#"[{"rule_key": "R1", "line": 1, "message": "Expected:\tfoo\nActual:\tbar"}]"#,
    );
    let reference = temp_file(".json", "[]");

    let output = bin()
        .args(["--format", "tsv", "track"])
        .arg(current.path())
        .arg(reference.path())
        .output()
        .expect("Failed to run binary");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("Output should be UTF-8");
    let rows: Vec<&str> = stdout.lines().collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].split('\t').count(), 8);
    assert!(rows[1].ends_with("Expected:\\tfoo\\nActual:\\tbar"));
}

#[test]
fn test_track_reports_references_past_end_of_file() {
    let reference = temp_file(
        ".json",
        r#"[{"id": 3, "rule_key": "R1", "line": 6, "message": "Performance", "created_at": "2023-01-01T00:00:00Z"}]"#,
    );
    let current = temp_file(".json", "[]");
    let reference_source = temp_file(".java", "interface A {\n  void a();\n  void b();\n  void c();\n  void d();\n  void e();\n}");
    let current_source = temp_file(".java", "interface A {\n  void a();\n}");

    let output = bin()
        .args(["--format", "json", "track"])
        .arg(current.path())
        .arg(reference.path())
        .arg("--reference-source")
        .arg(reference_source.path())
        .arg("--current-source")
        .arg(current_source.path())
        .output()
        .expect("Failed to run binary");

    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Output should be JSON");
    assert_eq!(json["closed"][0]["id"], 3);
    assert_eq!(json["closed"][0]["removed"], true);
    assert!(json["closed"][0]["relocated_line"].is_null());
}
