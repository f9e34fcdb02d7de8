use assert_cmd::cargo::cargo_bin_cmd;

#[test]
fn top_level_help_lists_commands() {
    let mut cmd = cargo_bin_cmd!("slidekitctl");
    let output = cmd.arg("--help").assert().success().get_output().stdout.clone();
    let text = String::from_utf8_lossy(&output);
    for command in ["check", "simulate", "run", "play"] {
        assert!(text.contains(command), "help missing '{command}'");
    }
}

#[test]
fn simulate_help_documents_event_flags() {
    let mut cmd = cargo_bin_cmd!("slidekitctl");
    let output = cmd
        .arg("simulate")
        .arg("--help")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8_lossy(&output);
    assert!(text.contains("--event"), "simulate help missing --event");
    assert!(text.contains("--for"), "simulate help missing --for");
    assert!(text.contains("--script"), "simulate help missing --script");
    assert!(text.contains("--image"), "simulate help missing --image");
}
