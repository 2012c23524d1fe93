//! Exit code contract of `riserplan check`
//!
//! | Exit Code | Meaning |
//! |-----------|---------|
//! | 0 | The schedule satisfies every constraint |
//! | 1 | Constraint violations, or the input could not be loaded |

use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

fn riserplan_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_riserplan"))
}

fn write_default_input(dir: &std::path::Path) -> PathBuf {
    let output = Command::new(riserplan_binary())
        .args(["init", "building", "-o"])
        .arg(dir)
        .output()
        .expect("Failed to execute init");
    assert!(output.status.success());
    dir.join("building.toml")
}

#[test]
fn exit_0_valid_schedule() {
    let dir = tempdir().unwrap();
    let input = write_default_input(dir.path());

    let output = Command::new(riserplan_binary())
        .arg("check")
        .arg(&input)
        .output()
        .expect("Failed to execute check");

    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("no constraint violations"));
}

#[test]
fn exit_1_when_the_horizon_is_exhausted() {
    let dir = tempdir().unwrap();
    let input = write_default_input(dir.path());
    let overrides = dir.path().join("overrides.toml");
    // one installation longer than the search horizon forces overlapping crews
    fs::write(&overrides, "\"install-K1-P1\" = 20000.0\n").unwrap();

    let output = Command::new(riserplan_binary())
        .arg("check")
        .arg(&input)
        .arg("--overrides")
        .arg(&overrides)
        .output()
        .expect("Failed to execute check");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("violation:"));
    assert!(stderr.contains("constraint violation(s)"));
}

#[test]
fn exit_1_on_unreadable_input() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("broken.toml");
    fs::write(&input, "start_date = 12").unwrap();

    let status = Command::new(riserplan_binary())
        .arg("check")
        .arg(&input)
        .status()
        .expect("Failed to execute check");

    assert_eq!(status.code(), Some(1));
}
