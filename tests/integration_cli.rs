//! CLI integration tests: spawn the built binary and inspect its output
//! files and exit behavior.

use std::fs;
use std::path::PathBuf;
use std::process::Command;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_turret-cli"))
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("turret_cli_{name}"));
    fs::create_dir_all(&dir).expect("scratch dir");
    dir
}

#[test]
fn writes_both_trace_files_with_the_scenario_header() {
    let dir = scratch_dir("header");
    let output = cli()
        .current_dir(&dir)
        .args(["0", "0", "0", "100", "0", "0", "0", "0", "50"])
        .output()
        .expect("failed to run turret-cli");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    for name in ["resultsinitial.dat", "resultsfinal.dat"] {
        let contents = fs::read_to_string(dir.join(name)).expect(name);
        let mut lines = contents.lines();
        assert_eq!(lines.next().unwrap(), "0 0 0 100 0 0", "{name} header");

        let mut rows = 0;
        for line in lines {
            let fields: Vec<&str> = line.split_whitespace().collect();
            assert_eq!(fields.len(), 4, "{name} rows are `t x y z`");
            for field in fields {
                field.parse::<f64>().unwrap_or_else(|_| {
                    panic!("{name}: non-numeric field {field:?}")
                });
            }
            rows += 1;
        }
        assert!(rows >= 2, "{name} should hold trajectory rows");
    }
}

#[test]
fn custom_prefix_names_the_trace_files() {
    let dir = scratch_dir("prefix");
    let output = cli()
        .current_dir(&dir)
        .args(["0", "0", "0", "12", "0", "0", "0", "0", "60"])
        .args(["--prefix", "shot_"])
        .output()
        .expect("failed to run turret-cli");

    assert!(output.status.success());
    assert!(dir.join("shot_initial.dat").exists());
    assert!(dir.join("shot_final.dat").exists());
}

#[test]
fn json_output_is_parseable() {
    let dir = scratch_dir("json");
    let output = cli()
        .current_dir(&dir)
        .args(["0", "0", "0", "15", "0", "0", "0", "0", "60"])
        .args(["--output", "json"])
        .output()
        .expect("failed to run turret-cli");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let value: serde_json::Value =
        serde_json::from_str(&stdout).expect("stdout should be JSON");
    assert!(value.get("angle_rad").is_some());
    assert!(value.get("landing_error").is_some());
}

#[test]
fn wrong_argument_count_prints_usage_and_fails() {
    let output = cli().args(["1", "2", "3"]).output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr).to_lowercase();
    assert!(stderr.contains("usage"), "stderr: {stderr}");
}

#[test]
fn malformed_numbers_are_rejected() {
    let output = cli()
        .args(["0", "0", "0", "not-a-number", "0", "0", "0", "0", "50"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn overhead_target_fails_with_a_named_error() {
    let dir = scratch_dir("overhead");
    let output = cli()
        .current_dir(&dir)
        .args(["0", "0", "0", "0", "0", "50", "5", "3", "40"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("degenerate aiming geometry"),
        "stderr: {stderr}"
    );
}
