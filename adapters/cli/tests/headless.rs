use std::{fs, process::Command};

fn lava_runner() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_lava-runner"));
    let _ = command.env("RUST_LOG", "off");
    command
}

#[test]
fn headless_run_reports_the_bundled_first_level() {
    let output = lava_runner()
        .args(["--headless", "2", "--seed", "1"])
        .output()
        .expect("failed to run lava-runner");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("level 1 (Lava Pit): playing"),
        "unexpected output: {stdout}"
    );
}

#[test]
fn headless_run_follows_the_campaign() {
    let path = std::env::temp_dir().join(format!("lava-runner-{}.toml", std::process::id()));
    fs::write(
        &path,
        "[[level]]\nname = \"pit\"\nrows = [\" \", \"@\", \"!\"]\n",
    )
    .expect("write level pack");

    let output = lava_runner()
        .arg("--levels")
        .arg(&path)
        .args(["--lives", "1", "--headless", "3", "--seed", "9"])
        .output()
        .expect("failed to run lava-runner");
    let _ = fs::remove_file(&path);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Retry { level: 0 }"),
        "unexpected output: {stdout}"
    );
    assert!(
        stdout.contains("GameOver { restart_level: 0 }"),
        "unexpected output: {stdout}"
    );
    assert!(
        stdout.contains("1 lives left"),
        "unexpected output: {stdout}"
    );
}

#[test]
fn invalid_level_packs_fail_with_context() {
    let path = std::env::temp_dir().join(format!("lava-runner-bad-{}.toml", std::process::id()));
    fs::write(&path, "[[level]]\nname = \"empty\"\nrows = [\"o\"]\n").expect("write level pack");

    let output = lava_runner()
        .arg("--levels")
        .arg(&path)
        .args(["--headless", "1"])
        .output()
        .expect("failed to run lava-runner");
    let _ = fs::remove_file(&path);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid level pack"),
        "unexpected stderr: {stderr}"
    );
}
