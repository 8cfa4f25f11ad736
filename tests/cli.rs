use std::path::Path;
use std::process::{Command, Output};

fn igcopy(input: &Path, output: &Path, config_dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_igcopy"))
        .arg("--input")
        .arg(input)
        .arg("--output")
        .arg(output)
        .env("IGCOPY_CONFIG", config_dir.join("absent.toml"))
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn touch(root: &Path, relative: &str, data: &[u8]) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, data).unwrap();
}

#[test]
fn test_missing_arguments_is_a_usage_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_igcopy")).arg("--input").arg("in").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--output"));
}

#[test]
fn test_mirrors_then_skips() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = temp_dir.path().join("in");
    let output = temp_dir.path().join("out");
    touch(&input, "a.jpg", b"jpeg data");
    touch(&input, "sub/b.png", b"png data");
    touch(&input, "notes.txt", b"text");

    let first = igcopy(&input, &output, temp_dir.path());
    assert!(first.status.success(), "{}", String::from_utf8_lossy(&first.stderr));
    assert_eq!(String::from_utf8_lossy(&first.stdout), "[Copying] a.jpg\n[Copying] sub/b.png\n");
    assert_eq!(std::fs::read(output.join("a.jpg")).unwrap(), b"jpeg data");
    assert_eq!(std::fs::read(output.join("sub/b.png")).unwrap(), b"png data");
    assert!(output.join("igcopy.db").is_file());
    assert!(output.join("sub/igcopy.db").is_file());
    assert!(!output.join("notes.txt").exists());

    let second = igcopy(&input, &output, temp_dir.path());
    assert!(second.status.success());
    assert_eq!(
        String::from_utf8_lossy(&second.stdout),
        "[Skipped] a.jpg (already in DB)\n[Skipped] sub/b.png (already in DB)\n"
    );
}

#[test]
fn test_missing_input_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    let result = igcopy(&temp_dir.path().join("missing"), &temp_dir.path().join("out"), temp_dir.path());
    assert_eq!(result.status.code(), Some(1));
    assert!(result.stdout.is_empty());
    assert!(String::from_utf8_lossy(&result.stderr).starts_with("Error:"));
    assert!(!temp_dir.path().join("out").exists());
}

#[test]
fn test_invalid_configuration_fails_before_work() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = temp_dir.path().join("in");
    touch(&input, "a.jpg", b"jpeg data");
    let config = temp_dir.path().join("config.toml");
    std::fs::write(&config, "[ledger]\nbusy_timeout_ms = 0\n").unwrap();

    let result = Command::new(env!("CARGO_BIN_EXE_igcopy"))
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(temp_dir.path().join("out"))
        .env("IGCOPY_CONFIG", &config)
        .output()
        .unwrap();
    assert_eq!(result.status.code(), Some(1));
    assert!(!temp_dir.path().join("out").exists());
}

#[test]
fn test_configuration_path_is_logged() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = temp_dir.path().join("in");
    std::fs::create_dir_all(&input).unwrap();
    let config = temp_dir.path().join("absent.toml");

    let result = Command::new(env!("CARGO_BIN_EXE_igcopy"))
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(temp_dir.path().join("out"))
        .env("IGCOPY_CONFIG", &config)
        .env("IGCOPY_LOG__ANSI", "false")
        .env("RUST_LOG", "debug")
        .output()
        .unwrap();
    assert!(result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("loaded configuration"), "{stderr}");
    assert!(stderr.contains("absent.toml"), "{stderr}");
}
