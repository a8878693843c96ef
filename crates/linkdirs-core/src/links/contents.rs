//! Byte-for-byte file comparison

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::Context;

use crate::error::Result;

const CHUNK_SIZE: usize = 8192;

/// Check whether two files hold exactly the same bytes
///
/// Files of different length are rejected without reading them.
///
/// # Errors
///
/// Returns an error if either file cannot be opened or read.
pub fn same_contents(first: &Path, second: &Path) -> Result<bool> {
    let first_file = File::open(first)
        .with_context(|| format!("Failed to open file for comparison: {}", first.display()))?;
    let second_file = File::open(second)
        .with_context(|| format!("Failed to open file for comparison: {}", second.display()))?;

    let first_len = first_file
        .metadata()
        .with_context(|| format!("Failed to read metadata for: {}", first.display()))?
        .len();
    let second_len = second_file
        .metadata()
        .with_context(|| format!("Failed to read metadata for: {}", second.display()))?
        .len();
    if first_len != second_len {
        return Ok(false);
    }

    let mut first_reader = BufReader::new(first_file);
    let mut second_reader = BufReader::new(second_file);
    let mut first_buf = [0; CHUNK_SIZE];
    let mut second_buf = [0; CHUNK_SIZE];

    loop {
        let read = fill(&mut first_reader, &mut first_buf)
            .with_context(|| format!("Failed to read file: {}", first.display()))?;
        let other = fill(&mut second_reader, &mut second_buf)
            .with_context(|| format!("Failed to read file: {}", second.display()))?;

        if read != other || first_buf[..read] != second_buf[..other] {
            return Ok(false);
        }
        if read == 0 {
            return Ok(true);
        }
    }
}

/// Read until `buf` is full or the reader is exhausted
fn fill(reader: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match reader.read(&mut buf[total..])? {
            0 => break,
            n => total += n,
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_pair(first: &[u8], second: &[u8]) -> (TempDir, std::path::PathBuf, std::path::PathBuf) {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a");
        let b = tmp.path().join("b");
        fs::write(&a, first).unwrap();
        fs::write(&b, second).unwrap();
        (tmp, a, b)
    }

    #[test]
    fn test_identical() {
        let (_tmp, a, b) = write_pair(b"pinky\n", b"pinky\n");
        assert!(same_contents(&a, &b).unwrap());
    }

    #[test]
    fn test_same_length_different_bytes() {
        let (_tmp, a, b) = write_pair(b"qwerty", b"qwertz");
        assert!(!same_contents(&a, &b).unwrap());
    }

    #[test]
    fn test_different_length() {
        let (_tmp, a, b) = write_pair(b"qwerty", b"qwerty\n");
        assert!(!same_contents(&a, &b).unwrap());
    }

    #[test]
    fn test_empty_files() {
        let (_tmp, a, b) = write_pair(b"", b"");
        assert!(same_contents(&a, &b).unwrap());
    }

    #[test]
    fn test_difference_past_first_chunk() {
        let mut first = vec![b'x'; CHUNK_SIZE * 2 + 17];
        let second = first.clone();
        first[CHUNK_SIZE + 5] = b'y';
        let (_tmp, a, b) = write_pair(&first, &second);
        assert!(!same_contents(&a, &b).unwrap());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let (tmp, a, _b) = write_pair(b"x", b"x");
        assert!(same_contents(&a, &tmp.path().join("missing")).is_err());
    }
}
