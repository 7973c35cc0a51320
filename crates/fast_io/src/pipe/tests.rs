//! Tests for kernel pipe creation and capacity control.

use super::*;
use std::fs::File;
use std::io::{Read, Write};

#[test]
fn test_new_pipe_carries_bytes_from_writer_to_reader() {
    let pipe = KernelPipe::new().unwrap();
    let (reader, writer) = pipe.into_parts();
    let mut reader = File::from(reader);
    let mut writer = File::from(writer);

    writer.write_all(b"through the pipe").unwrap();
    drop(writer);

    let mut received = String::new();
    reader.read_to_string(&mut received).unwrap();
    assert_eq!(received, "through the pipe");
}

#[test]
fn test_parse_pipe_max_size_trims_newline() {
    assert_eq!(parse_pipe_max_size("1048576\n").unwrap(), 1_048_576);
}

#[test]
fn test_parse_pipe_max_size_rejects_garbage() {
    let error = parse_pipe_max_size("lots\n").unwrap_err();
    assert_eq!(error.kind(), io::ErrorKind::InvalidData);
    assert!(error.to_string().contains("lots"));
}

#[cfg(target_os = "linux")]
#[test]
fn test_new_pipe_reports_positive_capacity() {
    let pipe = KernelPipe::new().unwrap();
    let capacity = pipe.capacity().unwrap();
    assert!(capacity >= 4096, "unexpected default capacity {capacity}");
}

#[cfg(target_os = "linux")]
#[test]
fn test_set_capacity_grants_at_least_request() {
    let pipe = KernelPipe::new().unwrap();
    let granted = pipe.set_capacity(128 * 1024).unwrap();

    assert!(granted >= 128 * 1024);
    assert_eq!(pipe.capacity().unwrap(), granted);
}

#[cfg(target_os = "linux")]
#[test]
fn test_set_capacity_rounds_up_to_page_multiple() {
    let pipe = KernelPipe::new().unwrap();
    let granted = pipe.set_capacity(100_000).unwrap();

    assert!(granted >= 100_000);
    assert!(granted.is_power_of_two(), "kernel granted {granted}");
}

#[cfg(target_os = "linux")]
#[test]
fn test_capacity_is_shared_by_both_ends() {
    let pipe = KernelPipe::new().unwrap();
    let granted = set_pipe_capacity(pipe.writer(), 256 * 1024).unwrap();

    assert_eq!(pipe_capacity(pipe.reader()).unwrap(), granted);
}

#[cfg(target_os = "linux")]
#[test]
fn test_pipe_capacity_of_regular_file_fails() {
    let file = tempfile::tempfile().unwrap();
    let error = pipe_capacity(file.as_fd()).unwrap_err();
    assert_eq!(error.raw_os_error(), Some(libc::EBADF));
}

#[cfg(target_os = "linux")]
#[test]
fn test_set_pipe_capacity_rejects_oversized_request() {
    let pipe = KernelPipe::new().unwrap();
    let error = pipe.set_capacity(usize::MAX).unwrap_err();
    assert_eq!(error.kind(), io::ErrorKind::InvalidInput);
}

#[cfg(target_os = "linux")]
#[test]
fn test_max_pipe_capacity_reads_proc() {
    if std::path::Path::new(PIPE_MAX_SIZE_PATH).exists() {
        let ceiling = max_pipe_capacity().unwrap();
        assert!(ceiling >= 4096);
    }
}
