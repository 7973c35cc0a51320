//! Tests for splice and tee against real pipes and files.

#![cfg(target_os = "linux")]

use super::*;
use crate::pipe::KernelPipe;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::os::fd::AsFd;
use tempfile::NamedTempFile;

/// Helper to create a temp file with specified content
fn create_temp_file(content: &[u8]) -> io::Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(content)?;
    file.flush()?;
    file.seek(SeekFrom::Start(0))?;
    Ok(file)
}

/// Reads exactly `len` bytes queued in the pipe behind `reader`.
fn read_pipe(pipe: &KernelPipe, len: usize) -> Vec<u8> {
    let mut reader = File::from(pipe.reader().try_clone_to_owned().unwrap());
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf).unwrap();
    buf
}

#[test]
fn test_splice_file_into_pipe() {
    let content = b"zero-copy from a regular file";
    let source = create_temp_file(content).unwrap();
    let pipe = KernelPipe::new().unwrap();

    let moved = splice_move(source.as_file().as_fd(), pipe.writer(), 4096).unwrap();

    assert_eq!(moved, content.len());
    assert_eq!(read_pipe(&pipe, moved), content);
}

#[test]
fn test_splice_respects_requested_length() {
    let content = b"0123456789ABCDEFGHIJ";
    let source = create_temp_file(content).unwrap();
    let pipe = KernelPipe::new().unwrap();

    let moved = splice_move(source.as_file().as_fd(), pipe.writer(), 10).unwrap();

    assert_eq!(moved, 10);
    assert_eq!(read_pipe(&pipe, moved), b"0123456789");
}

#[test]
fn test_splice_pipe_into_file() {
    let content = b"drained into a file";
    let pipe = KernelPipe::new().unwrap();
    File::from(pipe.writer().try_clone_to_owned().unwrap())
        .write_all(content)
        .unwrap();
    let mut dest = NamedTempFile::new().unwrap();

    let moved = splice_move(pipe.reader(), dest.as_file().as_fd(), content.len()).unwrap();
    assert_eq!(moved, content.len());

    let mut written = Vec::new();
    dest.seek(SeekFrom::Start(0)).unwrap();
    dest.read_to_end(&mut written).unwrap();
    assert_eq!(written, content);
}

#[test]
fn test_splice_reports_end_of_stream_as_zero() {
    let pipe = KernelPipe::new().unwrap();
    let (reader, writer) = pipe.into_parts();
    drop(writer);
    let sink = KernelPipe::new().unwrap();

    let moved = splice_move(reader.as_fd(), sink.writer(), 4096).unwrap();
    assert_eq!(moved, 0);
}

#[test]
fn test_splice_into_pipe_without_reader_fails_with_epipe() {
    let content = b"nobody listens";
    let source = create_temp_file(content).unwrap();
    let stage = KernelPipe::new().unwrap();
    splice_move(source.as_file().as_fd(), stage.writer(), content.len()).unwrap();

    let target = KernelPipe::new().unwrap();
    let (reader, writer) = target.into_parts();
    drop(reader);

    let error = splice_move(stage.reader(), writer.as_fd(), content.len()).unwrap_err();
    assert_eq!(error.raw_os_error(), Some(libc::EPIPE));
}

#[test]
fn test_splice_between_two_files_is_rejected() {
    let source = create_temp_file(b"no pipe on either side").unwrap();
    let dest = NamedTempFile::new().unwrap();

    let error = splice_move(source.as_file().as_fd(), dest.as_file().as_fd(), 64).unwrap_err();
    assert_eq!(error.raw_os_error(), Some(libc::EINVAL));
}

#[test]
fn test_tee_leaves_source_intact() {
    let content = b"shared staging bytes";
    let source = KernelPipe::new().unwrap();
    File::from(source.writer().try_clone_to_owned().unwrap())
        .write_all(content)
        .unwrap();
    let first = KernelPipe::new().unwrap();
    let second = KernelPipe::new().unwrap();

    assert_eq!(tee_dup(source.reader(), first.writer(), content.len()).unwrap(), content.len());
    assert_eq!(tee_dup(source.reader(), second.writer(), content.len()).unwrap(), content.len());

    assert_eq!(read_pipe(&first, content.len()), content);
    assert_eq!(read_pipe(&second, content.len()), content);
    assert_eq!(read_pipe(&source, content.len()), content);
}

#[test]
fn test_tee_is_short_when_target_lacks_room() {
    let source = KernelPipe::new().unwrap();
    let target = KernelPipe::new().unwrap();
    let target_capacity = target.set_capacity(4096).unwrap();
    source.set_capacity(64 * 1024).unwrap();

    let payload = vec![0x5au8; target_capacity * 2];
    File::from(source.writer().try_clone_to_owned().unwrap())
        .write_all(&payload)
        .unwrap();

    let duplicated = tee_dup(source.reader(), target.writer(), payload.len()).unwrap();
    assert!(duplicated <= target_capacity);
    assert!(duplicated < payload.len());
}

#[test]
fn test_tee_from_regular_file_is_rejected() {
    let source = create_temp_file(b"not a pipe").unwrap();
    let target = KernelPipe::new().unwrap();

    let error = tee_dup(source.as_file().as_fd(), target.writer(), 10).unwrap_err();
    assert_eq!(error.raw_os_error(), Some(libc::EINVAL));
}
