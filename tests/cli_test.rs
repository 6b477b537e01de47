//! CLIの終了コードとエラー出力の確認
//!
//! 入力検証で弾かれるケースのみ（送信は発生しない）

use std::path::Path;
use std::process::{Command, Output};

fn run_analyze(home: &Path, image: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_meal-ai"))
        .env("HOME", home)
        .arg("analyze")
        .arg(image)
        .args(["--url", "http://127.0.0.1:9/unreachable"])
        .output()
        .expect("meal-aiの起動失敗")
}

#[test]
fn test_oversized_image_exits_with_message() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let image = dir.path().join("feast.jpg");
    let file = std::fs::File::create(&image).unwrap();
    file.set_len(11 * 1024 * 1024).unwrap();

    let output = run_analyze(dir.path(), &image);

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("✖ File size must be less than 10MB"), "stderr: {}", stderr);
    assert!(!stderr.contains("TooLarge"), "Debug表現が出ている: {}", stderr);
}

#[test]
fn test_text_file_exits_with_message() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let notes = dir.path().join("notes.txt");
    std::fs::write(&notes, b"not a meal").unwrap();

    let output = run_analyze(dir.path(), &notes);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("✖ Please upload an image file"), "stderr: {}", stderr);
    assert!(!stderr.contains("NotAnImage"), "Debug表現が出ている: {}", stderr);
}

#[test]
fn test_missing_file_exits_with_message() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output = run_analyze(dir.path(), &dir.path().join("missing.jpg"));

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("✖ ファイルが見つかりません"), "stderr: {}", stderr);
}
