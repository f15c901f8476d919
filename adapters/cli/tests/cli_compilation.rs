use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "lost-drone"])
        .status()
        .expect("failed to invoke cargo check for lost-drone CLI binary");

    assert!(status.success(), "cargo check --bin lost-drone should succeed");
}

#[test]
fn headless_run_reports_an_outcome() {
    let output = Command::new(env!("CARGO_BIN_EXE_lost-drone"))
        .args(["--seconds", "2", "--idle"])
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run lost-drone");

    assert!(output.status.success(), "lost-drone exited with {}", output.status);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("outcome: unfinished"), "stdout: {stdout}");
}

#[test]
fn zero_frame_length_is_rejected() {
    let output = Command::new(env!("CARGO_BIN_EXE_lost-drone"))
        .args(["--frame-ms", "0"])
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run lost-drone");

    assert!(!output.status.success());
}
