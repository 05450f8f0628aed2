//! CLI end-to-end tests for the `symprefix` binary.
//!
//! These tests spawn the actual binary and validate stdout, exit codes and
//! the written destination tree.
//!
//! Exit code expectations:
//! - 0: Success
//! - 2: Invalid arguments (missing source directory, bad flags)
//! - 3: Config error (symbols file missing)
//! - 4: I/O error (a file could not be read or written)

use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::Command;

/// Run symprefix with given arguments and return (stdout, stderr, exit_code).
fn run_symprefix(args: &[&str], cwd: &Path) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_symprefix"))
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .env_remove("SYMPREFIX_EXTENSIONS")
        .env_remove("SYMPREFIX_VERBOSE")
        .env_remove("SYMPREFIX_DRY_RUN")
        .output()
        .expect("failed to execute symprefix");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

/// Scratch tree with a symbols file, one C source and a README.
fn fixture() -> tempfile::TempDir {
    let temp = tempfile::tempdir().unwrap();
    fs::write(temp.path().join("symbols.txt"), "_add\n").unwrap();
    fs::create_dir_all(temp.path().join("src")).unwrap();
    fs::write(
        temp.path().join("src/a.c"),
        "int add(int a,int b){return add(a,b);}",
    )
    .unwrap();
    fs::write(temp.path().join("src/README.md"), "add things\n").unwrap();
    temp
}

// ============================================================================
// Success Paths
// ============================================================================

#[test]
fn rename_writes_destination_tree() {
    let temp = fixture();
    let (stdout, _stderr, exit_code) =
        run_symprefix(&["symbols.txt", "lib_", "src", "out"], temp.path());

    assert_eq!(exit_code, 0, "expected success, got {}", exit_code);
    assert_eq!(
        fs::read_to_string(temp.path().join("out/a.c")).unwrap(),
        "int lib_add(int a,int b){return lib_add(a,b);}"
    );
    assert_eq!(
        fs::read(temp.path().join("out/README.md")).unwrap(),
        b"add things\n"
    );
    assert!(stdout.starts_with("renamed 2 occurrence(s)"), "stdout: {stdout}");
}

#[test]
fn logs_progress_to_stderr() {
    let temp = fixture();
    let (_stdout, stderr, exit_code) =
        run_symprefix(&["symbols.txt", "lib_", "src", "out"], temp.path());

    assert_eq!(exit_code, 0);
    assert!(stderr.contains("Processing directory"), "stderr: {stderr}");
    assert!(stderr.contains("Processing: a.c"), "stderr: {stderr}");
    assert!(!stderr.contains("Replacing"), "stderr: {stderr}");
}

#[test]
fn verbose_logs_each_replacement() {
    let temp = fixture();
    let (_stdout, stderr, exit_code) =
        run_symprefix(&["-v", "symbols.txt", "lib_", "src", "out"], temp.path());

    assert_eq!(exit_code, 0);
    assert!(
        stderr.contains("Replacing 'add' with 'lib_add' at 1:5"),
        "stderr: {stderr}"
    );
}

#[test]
fn json_format_emits_run_response() {
    let temp = fixture();
    let (stdout, _stderr, exit_code) = run_symprefix(
        &["--format", "json", "symbols.txt", "lib_", "src", "out"],
        temp.path(),
    );

    assert_eq!(exit_code, 0);
    let json: Value = serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    assert_eq!(json["status"], "ok");
    assert_eq!(json["prefix"], "lib_");
    assert_eq!(json["symbols"], 1);
    assert_eq!(json["replacements"], 2);
    assert_eq!(json["files_copied"], 1);
}

#[test]
fn dry_run_leaves_destination_absent() {
    let temp = fixture();
    let (stdout, _stderr, exit_code) = run_symprefix(
        &["--dry-run", "symbols.txt", "lib_", "src", "out"],
        temp.path(),
    );

    assert_eq!(exit_code, 0);
    assert!(stdout.starts_with("would rename 2"), "stdout: {stdout}");
    assert!(!temp.path().join("out").exists());
}

// ============================================================================
// Failure Paths
// ============================================================================

#[test]
fn missing_symbols_file_returns_exit_3() {
    let temp = fixture();
    let (stdout, stderr, exit_code) = run_symprefix(
        &["--format", "json", "nope.txt", "lib_", "src", "out"],
        temp.path(),
    );

    assert_eq!(exit_code, 3, "expected exit code 3, got {}", exit_code);
    assert!(stderr.contains("symbols file not found"), "stderr: {stderr}");
    let json: Value = serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    assert_eq!(json["status"], "error");
    assert_eq!(json["error"]["code"], 3);
    assert!(!temp.path().join("out").exists());
}

#[test]
fn missing_source_dir_returns_exit_2() {
    let temp = fixture();
    let (stdout, _stderr, exit_code) =
        run_symprefix(&["symbols.txt", "lib_", "missing", "out"], temp.path());

    assert_eq!(exit_code, 2, "expected exit code 2, got {}", exit_code);
    assert!(stdout.is_empty(), "text format keeps errors off stdout");
}

#[test]
fn missing_positional_returns_exit_2() {
    let temp = fixture();
    let (_stdout, _stderr, exit_code) = run_symprefix(&["symbols.txt", "lib_"], temp.path());
    assert_eq!(exit_code, 2);
}

#[test]
fn destination_equal_to_source_returns_exit_2() {
    let temp = fixture();
    let (_stdout, stderr, exit_code) =
        run_symprefix(&["symbols.txt", "lib_", "src", "src"], temp.path());

    assert_eq!(exit_code, 2, "expected exit code 2, got {}", exit_code);
    assert!(stderr.contains("source directory"), "stderr: {stderr}");
    assert_eq!(
        fs::read(temp.path().join("src/README.md")).unwrap(),
        b"add things\n"
    );
    assert_eq!(
        fs::read_to_string(temp.path().join("src/a.c")).unwrap(),
        "int add(int a,int b){return add(a,b);}"
    );
}

#[test]
fn write_failure_returns_exit_4() {
    let temp = fixture();
    fs::write(temp.path().join("src/b.c"), "int z = add(0, 0);\n").unwrap();
    // A directory where out/a.c should go makes the first write fail.
    fs::create_dir_all(temp.path().join("out/a.c")).unwrap();

    let (stdout, _stderr, exit_code) = run_symprefix(
        &["--format", "json", "symbols.txt", "lib_", "src", "out"],
        temp.path(),
    );

    assert_eq!(exit_code, 4, "expected exit code 4, got {}", exit_code);
    let json: Value = serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    assert_eq!(json["error"]["code"], 4);
    assert!(!temp.path().join("out/b.c").exists());
}
