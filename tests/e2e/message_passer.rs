//! E2E tests for the message-passer binary

use crate::common::harness::MessagePasserHarness;

#[test]
fn test_no_noise_echoes_file() {
    let harness = MessagePasserHarness::new();
    let file = harness.write_file("message.txt", b"Mr. Watson, come here.\nI want to see you.");
    let output = harness.run_on(&file, &["-n", "0"]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(output.stdout, b"Mr. Watson, come here.\nI want to see you.\n");
}

#[test]
fn test_seeded_noise_is_reproducible() {
    let harness = MessagePasserHarness::new();
    let file = harness.write_file("message.txt", &b"the rain in spain ".repeat(20));

    let first = harness.run_on(&file, &["--noise", "0.2", "--seed", "99"]);
    let second = harness.run_on(&file, &["--noise", "0.2", "--seed", "99"]);
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn test_config_file_supplies_settings() {
    let harness = MessagePasserHarness::new();
    let file = harness.write_file("message.txt", b"configured");
    let config = format!(
        r#"{{ "noise": 0.0, "seed": 3, "filename": {:?} }}"#,
        file.to_str().unwrap()
    );
    let config_path = harness.write_file("config.json", config.as_bytes());

    let output = harness.run(&["--config", config_path.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(output.stdout, b"configured\n");
}

#[test]
fn test_log_file_is_created() {
    let harness = MessagePasserHarness::new();
    let file = harness.write_file("message.txt", b"logged");
    let log_path = harness.path("passer.log");

    let output = harness.run_on(&file, &["--log-file", log_path.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(log_path.exists());
}

#[test]
fn test_missing_filename_fails() {
    let harness = MessagePasserHarness::new();
    let output = harness.run(&["-n", "0.1"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("filename not specified"));
}

#[test]
fn test_unreadable_file_fails() {
    let harness = MessagePasserHarness::new();
    let missing = harness.path("missing.txt");
    let output = harness.run_on(&missing, &[]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unable to read from file"));
}

#[test]
fn test_out_of_range_noise_fails() {
    let harness = MessagePasserHarness::new();
    let file = harness.write_file("message.txt", b"abc");
    let output = harness.run_on(&file, &["-n", "0.8"]);
    assert!(!output.status.success());
}

#[test]
fn test_unknown_flag_is_usage_error() {
    let harness = MessagePasserHarness::new();
    let output = harness.run(&["--volume", "11"]);
    assert_eq!(output.status.code(), Some(2));
}
