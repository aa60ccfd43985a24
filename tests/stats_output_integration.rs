use serde_json::Value;
use std::fs;
use std::process::Command;

#[path = "integration/mod.rs"]
mod test_utils;
use test_utils::{TestFixture, MEETING_JSON};

fn punctmark() -> Command {
    Command::new(env!("CARGO_BIN_EXE_punctmark"))
}

/// Test that --stats-out creates a JSON file with the run summary
#[test]
fn test_stats_output_json_structure() {
    let fixture = TestFixture::new();
    let source = fixture.create_file("meeting.json", MEETING_JSON);
    let stats_file = fixture.root_path.join("stats").join("run.json");

    let output = punctmark()
        .arg(&source)
        .args(["--family", "narrative"])
        .arg("--stats-out")
        .arg(&stats_file)
        .output()
        .expect("Failed to run punctmark");

    assert!(output.status.success(), "punctmark failed: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "1\t0\t5\tFAIL\n1\t10\t15\tPASS\n4\t30\t31\tPASS\n6\t29\t30\tFAIL\n"
    );

    let stats: Value = serde_json::from_str(&fs::read_to_string(&stats_file).expect("Failed to read stats file"))
        .expect("Failed to parse JSON");
    assert_eq!(stats["rules"], serde_json::json!([1, 2, 3, 4, 5, 6, 7]));
    assert_eq!(stats["documents_processed"], 1);
    assert_eq!(stats["documents_failed"], 0);
    assert_eq!(stats["total_findings"], 4);
    assert_eq!(stats["total_failed_checks"], 2);

    let documents = stats["documents"].as_array().expect("documents should be an array");
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0]["status"], "success");
    assert!(documents[0]["error"].is_null());
    assert_eq!(documents[0]["chars_processed"], 31);
}

/// Test that --write-aux writes findings beside the input and keeps stdout empty
#[test]
fn test_write_aux_with_explicit_rules() {
    let fixture = TestFixture::new();
    fixture.create_file("meeting.json", MEETING_JSON);
    let stats_file = fixture.root_path.join("run_stats.json");

    let output = punctmark()
        .arg(&fixture.root_path)
        .args(["--rules", "6,1", "--write-aux", "--concurrent"])
        .arg("--stats-out")
        .arg(&stats_file)
        .output()
        .expect("Failed to run punctmark");

    assert!(output.status.success(), "punctmark failed: {}", String::from_utf8_lossy(&output.stderr));
    assert!(output.stdout.is_empty());

    let aux = fs::read_to_string(fixture.root_path.join("meeting_findings.tsv")).expect("Aux file should exist");
    assert_eq!(aux, "6\t29\t30\tFAIL\n1\t0\t5\tFAIL\n1\t10\t15\tPASS\n");
}

/// Test that unreadable documents are recorded as failed without aborting the run
#[test]
fn test_failed_document_is_recorded() {
    let fixture = TestFixture::new();
    let broken = fixture.create_file("broken.json", "{ not json");
    let stats_file = fixture.root_path.join("run_stats.json");

    let output = punctmark()
        .arg(&broken)
        .arg("--stats-out")
        .arg(&stats_file)
        .output()
        .expect("Failed to run punctmark");
    assert!(output.status.success());

    let stats: Value = serde_json::from_str(&fs::read_to_string(&stats_file).expect("Failed to read stats file"))
        .expect("Failed to parse JSON");
    assert_eq!(stats["documents_failed"], 1);
    assert_eq!(stats["documents"][0]["status"], "failed");
    assert!(stats["documents"][0]["error"].is_string());

    let strict = punctmark()
        .arg(&broken)
        .arg("--fail-fast")
        .arg("--stats-out")
        .arg(&stats_file)
        .output()
        .expect("Failed to run punctmark");
    assert!(!strict.status.success());
}

/// Test that the annotator program and its arguments may contain spaces
#[cfg(unix)]
#[test]
fn test_annotator_path_with_spaces() {
    use std::os::unix::fs::PermissionsExt;

    let fixture = TestFixture::new();
    let story = fixture.create_file("story.txt", "sarah met Emily on July 4 2021.");
    let annotated = fixture.create_file("cached output/meeting.json", MEETING_JSON);
    let script = fixture.create_file(
        "my tools/annotate.sh",
        "#!/bin/sh\ncat >/dev/null\ncat \"$1\"\n",
    );
    let mut perms = fs::metadata(&script).expect("Script should exist").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&script, perms).expect("Failed to mark script executable");

    let output = punctmark()
        .arg(&story)
        .args(["--family", "narrative"])
        .arg("--annotator")
        .arg(&script)
        .arg("--annotator-arg")
        .arg(&annotated)
        .arg("--stats-out")
        .arg(fixture.root_path.join("run_stats.json"))
        .output()
        .expect("Failed to run punctmark");

    assert!(output.status.success(), "punctmark failed: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "1\t0\t5\tFAIL\n1\t10\t15\tPASS\n4\t30\t31\tPASS\n6\t29\t30\tFAIL\n"
    );
}
