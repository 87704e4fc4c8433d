//! biochunk: chunk-resumable streaming parsers for bioinformatics formats
//!
//! # Overview
//!
//! biochunk turns raw bytes from FASTA, FASTQ, MHAP and PAF files into
//! strongly-typed records under a caller-controlled byte budget. A parse
//! call stops once its budget is consumed and rewinds the source to an
//! exact record boundary, so the next call resumes byte-exactly where the
//! previous one stopped — chunked parsing is observationally identical to
//! one unbounded call.
//!
//! ## Key Features
//!
//! - **Bounded memory**: a fixed 64 KiB read buffer plus working storage
//!   that grows through fixed size classes, regardless of file size
//! - **Chunk-resumable**: interleave parsing with other work by bounding
//!   each call with `max_bytes`
//! - **Bring your own types**: parsers are generic over a per-format
//!   factory trait; default record types are provided
//! - **Gzip input**: transparent decompression for unbounded parsing
//!
//! ## Quick Start
//!
//! ```no_run
//! use biochunk::{ChunkParser, FastqParser, FastqRecord};
//!
//! # fn main() -> biochunk::Result<()> {
//! let mut parser = FastqParser::from_path("reads.fastq")?;
//! let mut reads: Vec<FastqRecord> = Vec::new();
//!
//! // Consume at most 512 MiB of input per call.
//! while parser.parse_objects(&mut reads, 512 * 1024 * 1024)? {
//!     // process and drain `reads` between chunks
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`formats`]: the four format parsers and the [`ChunkParser`] facade
//! - [`io`]: the [`ByteSource`] contract and its file/gzip implementations
//! - [`types`]: default record types
//! - [`error`]: the error enum and `Result` alias

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod formats;
pub mod io;
mod storage;
pub mod types;

// Re-export commonly used types
pub use error::{BiochunkError, Result};
pub use formats::{ChunkParser, FastaParser, FastqParser, MhapParser, PafParser};
pub use formats::{FromFasta, FromFastq, FromMhap, FromPaf};
pub use io::{ByteSource, FileSource, GzipSource, BUFFER_SIZE};
pub use storage::{LARGE_STORAGE, MEDIUM_STORAGE, SMALL_STORAGE};
pub use types::{FastaRecord, FastqRecord, MhapRecord, PafRecord};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
