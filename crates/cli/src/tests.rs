use super::*;
use std::fs;
use tempfile::TempDir;
use test_support::{input_file, read_back};

struct Captured {
    status: i32,
    stdout: Vec<u8>,
    stderr: String,
}

fn run_captured(args: &[&str]) -> Captured {
    let input = input_file(b"").unwrap();
    let output = tempfile::tempfile().unwrap();
    run_files(args, &input, &output)
}

fn run_files(args: &[&str], input: &fs::File, output: &fs::File) -> Captured {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let status = run_with(
        std::iter::once(&PROGRAM_NAME).chain(args),
        input.as_fd(),
        output.as_fd(),
        &mut stdout,
        &mut stderr,
    );
    Captured {
        status,
        stdout,
        stderr: String::from_utf8(stderr).unwrap(),
    }
}

#[test]
fn help_is_written_to_stdout() {
    let captured = run_captured(&["--help"]);

    assert_eq!(captured.status, 0);
    assert_eq!(captured.stdout, HELP_TEXT.as_bytes());
    assert!(captured.stderr.is_empty());
}

#[test]
fn version_reports_package_version() {
    let captured = run_captured(&["-V"]);

    assert_eq!(captured.status, 0);
    assert_eq!(
        String::from_utf8(captured.stdout).unwrap(),
        format!("pipetee {}\n", env!("CARGO_PKG_VERSION"))
    );
}

#[test]
fn missing_destinations_is_a_usage_error() {
    let captured = run_captured(&[]);

    assert_eq!(captured.status, ExitCode::Syntax.as_i32());
    assert!(captured.stdout.is_empty());
    assert!(captured.stderr.starts_with("pipetee: error:"), "{}", captured.stderr);
    assert!(captured.stderr.contains("Usage: pipetee"));
}

#[cfg(target_os = "linux")]
#[test]
fn malformed_size_falls_back_instead_of_failing() {
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("dest");

    for size in ["--size=-5", "--size=big", "--size=+"] {
        let input = input_file(b"fallback").unwrap();
        let output = tempfile::tempfile().unwrap();
        let captured = run_files(&["-q", size, dest.to_str().unwrap()], &input, &output);

        assert_eq!(captured.status, 0, "{size}: {}", captured.stderr);
        assert!(captured.stderr.is_empty(), "{size}: {}", captured.stderr);
        assert_eq!(fs::read(&dest).unwrap(), b"fallback");
    }
}

#[cfg(target_os = "linux")]
#[test]
fn transfer_copies_to_destinations_and_output() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("first");
    let second = dir.path().join("second");
    let input = input_file(b"hello world\n").unwrap();
    let mut output = tempfile::tempfile().unwrap();

    let captured = run_files(
        &["-q", first.to_str().unwrap(), second.to_str().unwrap()],
        &input,
        &output,
    );

    assert_eq!(captured.status, 0, "{}", captured.stderr);
    assert!(captured.stdout.is_empty());
    assert_eq!(fs::read(&first).unwrap(), b"hello world\n");
    assert_eq!(fs::read(&second).unwrap(), b"hello world\n");
    assert_eq!(read_back(&mut output).unwrap(), b"hello world\n");
}

#[cfg(target_os = "linux")]
#[test]
fn out_of_range_size_is_clamped_not_rejected() {
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("dest");

    for size in ["0", "2000000"] {
        let input = input_file(b"clamped").unwrap();
        let output = tempfile::tempfile().unwrap();
        let captured = run_files(&["-q", "-s", size, dest.to_str().unwrap()], &input, &output);
        assert_eq!(captured.status, 0, "size {size}: {}", captured.stderr);
    }
}

#[test]
fn unopenable_destination_reports_file_select() {
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("missing").join("dest");

    let captured = run_captured(&["-q", dest.to_str().unwrap()]);

    assert_eq!(captured.status, ExitCode::FileSelect.as_i32());
    assert!(captured.stderr.starts_with("pipetee: could not open"), "{}", captured.stderr);
    assert!(captured.stderr.contains(dest.to_str().unwrap()));
    assert!(
        captured
            .stderr
            .ends_with("pipetee error: errors selecting output files (code 3)\n"),
        "{}",
        captured.stderr
    );
}

#[test]
fn exit_code_from_never_reports_out_of_range_status_as_success() {
    let debug = |code: std::process::ExitCode| format!("{code:?}");

    assert_eq!(debug(exit_code_from(0)), debug(std::process::ExitCode::SUCCESS));
    assert_eq!(debug(exit_code_from(14)), debug(std::process::ExitCode::from(14)));
    assert_eq!(debug(exit_code_from(-4)), debug(std::process::ExitCode::FAILURE));
    assert_eq!(debug(exit_code_from(4096)), debug(std::process::ExitCode::FAILURE));
}
