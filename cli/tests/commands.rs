use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

fn cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_imgtool-cli"))
        .args(args)
        .env_remove("IMGTOOL_SETTINGS_FILE")
        .output()
        .expect("run imgtool-cli")
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("imgtool-cli-{name}-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn names_prints_the_plan() {
    let output = cli(&["names", "--base", "img", "--start", "1", "--count", "3", "--ext", ".png"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(
        stdout.lines().collect::<Vec<_>>(),
        vec!["img_001.png", "img_002.png", "img_003.png"]
    );
}

#[test]
fn settings_merges_known_keys_only() {
    let dir = scratch_dir("settings");
    let blob = dir.join("settings.json");
    fs::write(&blob, r#"{"fontSize": 40, "unknownKey": "x", "alignment": "left"}"#).unwrap();

    let output = cli(&["settings", "--file", blob.to_str().unwrap()]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["fontSize"], 40);
    assert_eq!(value["alignment"], "left");
    assert!(value.get("unknownKey").is_none());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn settings_field_prints_one_value() {
    let dir = scratch_dir("field");
    let blob = dir.join("settings.json");
    fs::write(&blob, r##"{"fontColor": "#00ff00"}"##).unwrap();

    let output = cli(&["settings", "--file", blob.to_str().unwrap(), "--field", "fontColor"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap().trim(), "\"#00ff00\"");

    let unknown = cli(&["settings", "--file", blob.to_str().unwrap(), "--field", "nope"]);
    assert!(!unknown.status.success());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn settings_rejects_malformed_blob() {
    let dir = scratch_dir("malformed");
    let blob = dir.join("settings.json");
    fs::write(&blob, "[1, 2]").unwrap();

    let output = cli(&["settings", "--file", blob.to_str().unwrap()]);
    assert!(!output.status.success());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn check_fails_when_any_file_is_rejected() {
    let dir = scratch_dir("check");
    let good = dir.join("photo.jpg");
    let bad = dir.join("archive.zip");
    fs::write(&good, [0xff, 0xd8, 0xff]).unwrap();
    fs::write(&bad, b"PK").unwrap();

    let ok = cli(&["check", good.to_str().unwrap()]);
    assert!(ok.status.success());

    let mixed = cli(&["check", good.to_str().unwrap(), bad.to_str().unwrap()]);
    assert!(!mixed.status.success());
    let stdout = String::from_utf8(mixed.stdout).unwrap();
    assert!(stdout.contains("Invalid file type"));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn fonts_marks_the_default() {
    let output = cli(&["fonts"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().filter(|line| line.starts_with('*')).count(), 1);
}
