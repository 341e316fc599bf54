use std::process::Command;
use tempfile::TempDir;

fn subtran(cwd: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_subtran"));
    cmd.current_dir(cwd.path());
    cmd
}

#[test]
fn test_help_lists_flags() {
    let cwd = TempDir::new().unwrap();
    let output = subtran(&cwd).arg("--help").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--input"));
    assert!(stdout.contains("--lang"));
    assert!(stdout.contains("--workers"));
}

#[test]
fn test_missing_input_fails_with_usage() {
    let cwd = TempDir::new().unwrap();
    let output = subtran(&cwd).args(["--lang", "fr"]).output().unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--input"));
}

#[test]
fn test_nonexistent_input_fails_and_is_logged() {
    let cwd = TempDir::new().unwrap();
    let output = subtran(&cwd)
        .args(["--input", "does-not-exist.vtt", "--lang", "fr"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let log = std::fs::read_to_string(cwd.path().join("translate_errors.log")).unwrap();
    assert!(log.contains("Access error"));
    assert!(log.contains("does-not-exist.vtt"));
}

#[test]
fn test_unreachable_service_still_writes_output() {
    let cwd = TempDir::new().unwrap();
    std::fs::write(
        cwd.path().join("movie.vtt"),
        "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nHello\n",
    )
    .unwrap();

    // Nothing serves the discard port, so every line falls back
    let output = subtran(&cwd)
        .args([
            "--input",
            "movie.vtt",
            "--lang",
            "fr",
            "--endpoint",
            "http://127.0.0.1:9/translate",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let translated = std::fs::read_to_string(cwd.path().join("movie_fr.vtt")).unwrap();
    assert_eq!(translated, "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nHello");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Completed: 1 files, 0 lines"));
}
