use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

const CONFIG_VARS: &[&str] = &[
    "SLIDEKIT_CONFIG_PATH",
    "SLIDEKIT_CONFIG_JSON",
    "SLIDEKIT_AUTOPLAY",
    "SLIDEKIT_DELAY_MS",
    "SLIDEKIT_PAGINATION_DOTS",
    "SLIDEKIT_PAUSE_ON_HOVER",
    "SLIDEKIT_IMAGES",
    "SLIDEKITCTL_TUI_SCRIPT",
];

/// Command running in an empty directory with no slidekit env set.
fn slidekitctl(dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("slidekitctl");
    cmd.current_dir(dir.path());
    for var in CONFIG_VARS {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn check_reports_defaults() {
    let dir = TempDir::new().expect("tempdir");
    slidekitctl(&dir)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("config: built-in defaults"))
        .stdout(predicate::str::contains("autoplay: every 3s, quiet period 6s"))
        .stdout(predicate::str::contains("ok"));
}

#[test]
fn check_surfaces_warnings_and_rejects_bad_values() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("slidekit.toml"), "delay_ms = 200\n")
        .expect("write");
    slidekitctl(&dir)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("config: ./slidekit.toml"))
        .stdout(predicate::str::contains("warning: autoplay delay (200 ms)"));

    slidekitctl(&dir)
        .arg("check")
        .env("SLIDEKIT_DELAY_MS", "0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("greater than zero"));
}

#[test]
fn simulate_prints_frames_with_virtual_time() {
    let dir = TempDir::new().expect("tempdir");
    slidekitctl(&dir)
        .args(["simulate", "--for", "2500ms"])
        .args(["--image", "a.jpg", "--image", "b.jpg", "--image", "c.jpg"])
        .env("SLIDEKIT_DELAY_MS", "1000")
        .assert()
        .success()
        .stdout(predicate::str::contains("t=0ms active=0 slides=[*..]"))
        .stdout(predicate::str::contains("t=1000ms active=1 slides=[.*.] dots=[0 (1) 2]"))
        .stdout(predicate::str::contains("t=2000ms active=2"));
}

#[test]
fn simulate_replays_a_script_file() {
    let dir = TempDir::new().expect("tempdir");
    let script = dir.path().join("events.txt");
    fs::write(
        &script,
        "# click the last dot, then stop\n1500ms dot 2\n4s destroy\n",
    )
    .expect("write");

    let output = slidekitctl(&dir)
        .args(["simulate", "--for", "10s", "--script"])
        .arg(&script)
        .args(["--slide", "intro", "--slide", "outro", "--image", "extra.png"])
        .env("SLIDEKIT_DELAY_MS", "1000")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8_lossy(&output);
    let lines: Vec<&str> = text.lines().collect();

    assert!(lines.contains(&"t=1500ms event dot 2"), "{text}");
    assert!(lines.contains(&"t=1500ms active=2 slides=[..*] dots=[0 1 (2)]"), "{text}");
    // Quiet period holds the carousel on slide 2 until destroy at 4s.
    assert!(
        !lines
            .iter()
            .any(|l| l.starts_with("t=2000ms") || l.starts_with("t=3000ms")),
        "{text}"
    );
    assert_eq!(lines.last().copied(), Some("t=4000ms unmount"));
}

#[test]
fn simulate_without_slides_fails() {
    let dir = TempDir::new().expect("tempdir");
    slidekitctl(&dir)
        .arg("simulate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no slides or images provided"));
}

#[test]
fn run_reads_actions_from_stdin() {
    let dir = TempDir::new().expect("tempdir");
    slidekitctl(&dir)
        .args(["run", "--image", "a.jpg", "--image", "b.jpg"])
        .env("SLIDEKIT_AUTOPLAY", "false")
        .env("RUST_LOG", "info")
        .write_stdin("next\nquit\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("active=1 slides=[.*]"))
        .stderr(predicate::str::contains("carousel stopped"));
}

#[test]
fn play_runs_from_a_script() {
    let dir = TempDir::new().expect("tempdir");
    let script = dir.path().join("keys.txt");
    fs::write(&script, "right\nwait:500ms\nright\nright\nq\n").expect("write");

    slidekitctl(&dir)
        .args(["play", "--image", "a.jpg", "--image", "b.jpg"])
        .env("SLIDEKITCTL_TUI_SCRIPT", &script)
        .assert()
        .success()
        .stdout(predicate::str::contains("Slide 2/2"))
        .stdout(predicate::str::contains(
            "stopped at slide 2 of 2 (b.jpg) after 3 transitions",
        ));
}
