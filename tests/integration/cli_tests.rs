//! CLI integration tests
//!
//! These tests run the `layoutseq` binary against small apktool-style
//! directories built in temporary directories.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SCREEN: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<LinearLayout xmlns:android="http://schemas.android.com/apk/res/android"
    android:layout_width="match_parent"
    android:layout_height="match_parent">
    <TextView android:id="@id/title" />
    <Button android:onClick="save" />
    <com.example.app.widget.FancyButton />
</LinearLayout>"#;

const MAIN_ACTIVITY: &str = r#".class public Lcom/example/app/MainActivity;
.super Landroid/app/Activity;

.method protected onCreate(Landroid/os/Bundle;)V
    .locals 1
    invoke-super {p0, p1}, Landroid/app/Activity;->onCreate(Landroid/os/Bundle;)V
    const v0, 0x7f0b0001
    invoke-virtual {p0, v0}, Lcom/example/app/MainActivity;->setContentView(I)V
    return-void
.end method
"#;

const R_LAYOUT: &str = r#".class public final Lcom/example/app/R$layout;
.super Ljava/lang/Object;

.field public static final activity_main:I = 0x7f0b0001
.field public static final activity_unused:I = 0x7f0b0002

.method private constructor <init>()V
    .locals 0
    invoke-direct {p0}, Ljava/lang/Object;-><init>()V
    return-void
.end method
"#;

const FANCY_BUTTON: &str = r#".class public Lcom/example/app/widget/FancyButton;
.super Landroid/widget/Button;
"#;

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// apktool output with two screens, one list item and the smali behind them
fn sample_apktool_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "res/layout/activity_main.xml", SCREEN);
    write(dir.path(), "res/layout/activity_unused.xml", SCREEN);
    write(dir.path(), "res/layout/item_song.xml", SCREEN);
    write(dir.path(), "res/layout/abc_screen_simple.xml", SCREEN);
    write(dir.path(), "smali/com/example/app/MainActivity.smali", MAIN_ACTIVITY);
    write(dir.path(), "smali/com/example/app/R$layout.smali", R_LAYOUT);
    write(dir.path(), "smali_classes2/com/example/app/widget/FancyButton.smali", FANCY_BUTTON);
    dir
}

fn layoutseq() -> Command {
    Command::cargo_bin("layoutseq").unwrap()
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_cli_help() {
    layoutseq()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--package"))
        .stdout(predicate::str::contains("--apktool-dir"))
        .stdout(predicate::str::contains("--token-dir"));
}

#[test]
fn test_cli_requires_package() {
    layoutseq()
        .args(["--apktool-dir", ".", "--token-dir", "."])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--package"));
}

// ============================================================================
// Runs
// ============================================================================

#[test]
fn test_cli_writes_token_list() {
    let apk = sample_apktool_dir();
    let out = TempDir::new().unwrap();

    layoutseq()
        .args(["--package", "com.example.app", "--quiet"])
        .arg("--apktool-dir")
        .arg(apk.path())
        .arg("--token-dir")
        .arg(out.path())
        .assert()
        .success();

    let contents = fs::read_to_string(out.path().join("com.example.app-layout.lst")).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(
        lines,
        vec![
            "com.example.app 2 item_song.xml Layout { TextView Button Button }",
            "com.example.app 1 activity_main.xml Layout { TextView Button Button }",
            "com.example.app 1 activity_unused.xml Layout { TextView Button Button }",
        ]
    );
}

#[test]
fn test_cli_aliases_and_reachable_only() {
    let apk = sample_apktool_dir();
    let out = TempDir::new().unwrap();
    let report = out.path().join("reach.json");

    layoutseq()
        .args(["--package", "com.example.app", "--reachable-only", "--quiet"])
        .arg("--atd")
        .arg(apk.path())
        .arg("--td")
        .arg(out.path())
        .arg("--reachability")
        .arg(&report)
        .assert()
        .success();

    let contents = fs::read_to_string(out.path().join("com.example.app-layout.lst")).unwrap();
    assert!(contents.contains("activity_main.xml"));
    assert!(contents.contains("item_song.xml"));
    assert!(!contents.contains("activity_unused.xml"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["valid_layout_names"][0], "activity_main");
}

#[test]
fn test_cli_summary_output() {
    let apk = sample_apktool_dir();
    let out = TempDir::new().unwrap();

    layoutseq()
        .args(["--package", "com.example.app"])
        .arg("--apktool-dir")
        .arg(apk.path())
        .arg("--token-dir")
        .arg(out.path().join("nested/dir"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Tokenized 3 of 4 layouts"));

    assert!(out.path().join("nested/dir/com.example.app-layout.lst").exists());
}

#[test]
fn test_cli_missing_layout_dir_fails() {
    let apk = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    layoutseq()
        .args(["--package", "com.example.app", "--quiet"])
        .arg("--apktool-dir")
        .arg(apk.path())
        .arg("--token-dir")
        .arg(out.path())
        .assert()
        .failure();

    assert!(!out.path().join("com.example.app-layout.lst").exists());
}
