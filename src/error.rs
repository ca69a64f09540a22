//! Error types for the bitmask-restore crate.

use std::path::PathBuf;

/// Errors that can occur while recovering masks and restoring an image.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to load an image file (missing, corrupt, or unreadable).
    #[error("failed to load image '{path}': {source}")]
    Load {
        /// Path of the image that failed to load.
        path: PathBuf,
        /// Underlying decode error.
        source: image::ImageError,
    },

    /// A mask text file could not be parsed.
    #[error("malformed mask file '{path}': {reason}")]
    MaskParse {
        /// Path of the offending mask file.
        path: PathBuf,
        /// What was wrong with the content.
        reason: String,
    },

    /// Paired buffers or images disagree on their size.
    #[error("inconsistent sizes: expected {expected} bytes, got {actual}")]
    InconsistentSize {
        /// Length the data was required to have.
        expected: usize,
        /// Length actually observed.
        actual: usize,
    },

    /// The masked region starting at `seed` runs past the end of the image.
    #[error("masked region out of range: seed {seed} + {len} bytes exceeds buffer of {buffer_len}")]
    OutOfRange {
        /// Byte offset where the masked region starts.
        seed: usize,
        /// Length of the masked region in bytes.
        len: usize,
        /// Total length of the target buffer.
        buffer_len: usize,
    },

    /// A restoration round failed; wraps the underlying cause.
    #[error("round {round} failed: {source}")]
    Round {
        /// 1-based round number, counting down from the total.
        round: u32,
        /// What went wrong inside the round.
        source: Box<Error>,
    },

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error occurred while encoding or writing the restored image.
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),
}

impl Error {
    /// Tag an error with the round it occurred in.
    pub(crate) fn in_round(self, round: u32) -> Self {
        Self::Round {
            round,
            source: Box::new(self),
        }
    }
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
