//! Builds a [`ChunkyString`] from a file or any reader, one byte at a time.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use tracing::debug;

use crate::chunky_string::ChunkyString;

const READ_BUF_SIZE: usize = 64 * 1024; // 64KB reads

/// Reads the whole file at `path` into a new string via `push_back`.
pub fn read_message<const N: usize, P: AsRef<Path>>(path: P) -> io::Result<ChunkyString<N>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let message = message_from_reader(BufReader::with_capacity(READ_BUF_SIZE, file))?;
    debug!(path = %path.display(), len = message.len(), chunks = message.chunk_count(), "read message");
    Ok(message)
}

pub fn message_from_reader<const N: usize, R: Read>(mut reader: R) -> io::Result<ChunkyString<N>> {
    let mut message = ChunkyString::new();
    let mut buf = vec![0u8; READ_BUF_SIZE];

    loop {
        let bytes_read = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        for &c in &buf[..bytes_read] {
            message.push_back(c);
        }
    }

    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_message_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"line one\nline two\n").unwrap();

        let message: ChunkyString = read_message(file.path()).unwrap();
        assert_eq!(message.to_string(), "line one\nline two\n");
        assert_eq!(message.chunk_count(), 2);
    }

    #[test]
    fn test_read_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result: io::Result<ChunkyString> = read_message(temp_dir.path().join("missing.txt"));
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_message_from_reader_keeps_raw_bytes() {
        let bytes: &[u8] = &[0xff, b'a', 0x00, b'\r', b'\n'];
        let message: ChunkyString<2> = message_from_reader(bytes).unwrap();
        assert_eq!(message.to_bytes(), bytes);
    }
}
