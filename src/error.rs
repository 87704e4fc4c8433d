//! Error types for biochunk

use thiserror::Error;

/// Result type alias for biochunk operations
pub type Result<T> = std::result::Result<T, BiochunkError>;

/// Error types that can occur while parsing.
///
/// Any error is terminal to the parse call that produced it: no partial
/// record is ever emitted, and no recovery is attempted. Records appended
/// to the caller's collection by earlier successful calls remain valid.
///
/// Line numbers in format errors count the lines fed during the current
/// parse call; when the whole input is parsed in one unbounded call they
/// are absolute file line numbers.
#[derive(Debug, Error)]
pub enum BiochunkError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid FASTA format
    #[error("Invalid FASTA format at line {line}: {msg}")]
    InvalidFastaFormat {
        /// Line number where error occurred
        line: usize,
        /// Error message
        msg: String,
    },

    /// Invalid FASTQ format
    #[error("Invalid FASTQ format at line {line}: {msg}")]
    InvalidFastqFormat {
        /// Line number where error occurred
        line: usize,
        /// Error message
        msg: String,
    },

    /// Invalid MHAP format
    #[error("Invalid MHAP format at line {line}: {msg}")]
    InvalidMhapFormat {
        /// Line number where error occurred
        line: usize,
        /// Error message
        msg: String,
    },

    /// Invalid PAF format
    #[error("Invalid PAF format at line {line}: {msg}")]
    InvalidPafFormat {
        /// Line number where error occurred
        line: usize,
        /// Error message
        msg: String,
    },

    /// Byte budget exhausted before a single record could be completed
    #[error("Chunk of {max_bytes} bytes is too small to hold a complete record")]
    ChunkTooSmall {
        /// The budget that was too small
        max_bytes: u64,
    },

    /// A single record field outgrew the largest storage size class
    #[error("Record field exceeds the {limit}-byte storage ceiling")]
    StorageExceeded {
        /// The storage ceiling in bytes
        limit: usize,
    },
}
