//! Shared helpers for end-to-end tests.

use chunky::{ChunkyString, Position};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Position of the byte at `index`, found by walking from `begin()`.
pub fn nth<const N: usize>(s: &ChunkyString<N>, index: usize) -> Position {
    let mut pos = s.begin();
    for _ in 0..index {
        pos = s.next_position(pos).unwrap();
    }
    pos
}

pub fn chunk_lens<const N: usize>(s: &ChunkyString<N>) -> Vec<usize> {
    s.chunks().map(<[u8]>::len).collect()
}

/// Temp directory plus a handle on the compiled `message-passer` binary.
pub struct MessagePasserHarness {
    temp_dir: TempDir,
}

impl MessagePasserHarness {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    pub fn write_file(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.path(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents).unwrap();
        path
    }

    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_message-passer"))
            .args(args)
            .current_dir(self.temp_dir.path())
            .env_remove("RUST_LOG")
            .output()
            .unwrap()
    }

    pub fn run_on(&self, file: &Path, extra: &[&str]) -> Output {
        let mut args = vec!["-f", file.to_str().unwrap()];
        args.extend_from_slice(extra);
        self.run(&args)
    }
}
