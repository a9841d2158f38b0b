// Chunky string library - exposes the container and its collaborators

mod chunk;
pub mod chunky_string;
pub mod config;
pub mod cursor;
pub mod error;
pub mod message;
pub mod transmission;

// Re-export commonly used types
pub use chunky_string::{ChunkyString, DEFAULT_CHUNK_CAPACITY};
pub use cursor::{Cursor, CursorMut, CursorRef, Iter, Position};
pub use error::{ChunkyError, ConfigError, TransmissionError};
