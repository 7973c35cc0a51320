//! Shared helpers for pipetee's unit and integration tests.

#![deny(missing_docs)]

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};

/// Deterministic payload of `len` bytes whose pages all differ.
///
/// Offsets are mixed into the value so that a reordered or duplicated chunk
/// shows up as a content mismatch rather than an identical byte run.
#[must_use]
pub fn patterned_bytes(len: usize) -> Vec<u8> {
    (0..len)
        .map(|offset| (offset ^ (offset >> 8) ^ (offset >> 16)) as u8)
        .collect()
}

/// Anonymous temporary file holding `content`, rewound to the start.
///
/// # Errors
///
/// Returns the I/O error from creating or writing the file.
pub fn input_file(content: &[u8]) -> io::Result<File> {
    let mut file = tempfile::tempfile()?;
    file.write_all(content)?;
    file.seek(SeekFrom::Start(0))?;
    Ok(file)
}

/// Reads everything written to `file` so far, from the start.
///
/// # Errors
///
/// Returns the I/O error from seeking or reading.
pub fn read_back(file: &mut File) -> io::Result<Vec<u8>> {
    file.seek(SeekFrom::Start(0))?;
    let mut content = Vec::new();
    file.read_to_end(&mut content)?;
    Ok(content)
}
