//! FASTQ chunked parser.
//!
//! # Format
//!
//! Records have a fixed four-line period: a name line starting with `@`, a
//! sequence line, a separator line starting with `+` (content ignored) and
//! a quality line the same length as the sequence:
//!
//! ```text
//! @read1
//! GATTACA
//! +
//! !!!!!!!
//! ```
//!
//! A record completes on the newline ending its quality line, or at end of
//! input for an unterminated final record.
//!
//! # Example
//!
//! ```
//! use biochunk::{ChunkParser, FastqParser, FastqRecord};
//! use std::io::Cursor;
//!
//! # fn main() -> biochunk::Result<()> {
//! let mut parser = FastqParser::new(Cursor::new("@r1\nACGT\n+\n!!!!\n"));
//! let mut reads: Vec<FastqRecord> = Vec::new();
//! parser.parse_objects(&mut reads, 0)?;
//!
//! assert_eq!(reads[0].name, "r1");
//! assert_eq!(reads[0].sequence, b"ACGT");
//! assert_eq!(reads[0].quality, b"!!!!");
//! # Ok(())
//! # }
//! ```

use crate::error::{BiochunkError, Result};
use crate::formats::ChunkParser;
use crate::io::chunk::{ChunkReader, RecordMachine};
use crate::io::source::{ByteSource, FileSource, GzipSource};
use crate::storage::{Region, MEDIUM_STORAGE, SMALL_STORAGE};
use crate::types::FastqRecord;
use std::fs::File;
use std::marker::PhantomData;
use std::path::Path;

/// Factory contract for objects built from FASTQ records.
///
/// Called once per record, after validation, with the trimmed name (marker
/// stripped), the sequence and the quality scores. The spans point into
/// the parser's working storage and are only valid for the duration of
/// the call.
pub trait FromFastq: Sized {
    /// Construct an object from the validated fields of one record.
    fn from_parts(name: &[u8], sequence: &[u8], quality: &[u8]) -> Self;
}

/// Chunk-resumable FASTQ parser.
pub struct FastqParser<S: ByteSource, T: FromFastq = FastqRecord> {
    reader: ChunkReader<S>,
    machine: FastqMachine<T>,
}

impl<T: FromFastq> FastqParser<FileSource, T> {
    /// Open the FASTQ file at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(FastqParser::new(FileSource::open(path)?))
    }
}

impl<T: FromFastq> FastqParser<GzipSource<File>, T> {
    /// Open the gzip-compressed FASTQ file at `path`.
    ///
    /// Gzip streams cannot rewind, so only unbounded parse calls
    /// (`max_bytes == 0`) are supported.
    pub fn from_gzip_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(FastqParser::new(GzipSource::open(path)?))
    }
}

impl<S: ByteSource, T: FromFastq> FastqParser<S, T> {
    /// Create a parser over any byte source.
    pub fn new(source: S) -> Self {
        FastqParser {
            reader: ChunkReader::new(source),
            machine: FastqMachine {
                name: Region::clipped(SMALL_STORAGE),
                sequence: Region::growable(MEDIUM_STORAGE),
                quality: Region::growable(MEDIUM_STORAGE),
                role: 0,
                pending: 0,
                line: 0,
                _record: PhantomData,
            },
        }
    }
}

impl<S: ByteSource, T: FromFastq> ChunkParser for FastqParser<S, T> {
    type Record = T;

    fn parse_objects(&mut self, dst: &mut Vec<T>, max_bytes: u64) -> Result<bool> {
        self.reader.run(&mut self.machine, dst, max_bytes)
    }

    fn reset(&mut self) -> Result<()> {
        self.reader.rewind_to_start()
    }
}

/// Incremental FASTQ state machine.
///
/// `role` is the line index modulo four: name, sequence, separator,
/// quality. The name region keeps the marker byte for validation.
struct FastqMachine<T: FromFastq> {
    name: Region,
    sequence: Region,
    quality: Region,
    role: u8,
    pending: u64,
    line: usize,
    _record: PhantomData<T>,
}

impl<T: FromFastq> FastqMachine<T> {
    fn close_record(&mut self, dst: &mut Vec<T>) -> Result<()> {
        self.name.trim_end();
        self.sequence.trim_end();
        self.quality.trim_end();

        let name = self.name.as_slice();
        if name.first() != Some(&b'@') {
            return Err(BiochunkError::InvalidFastqFormat {
                line: self.line,
                msg: "Expected '@' at start of header".to_string(),
            });
        }
        if name.len() < 2 {
            return Err(BiochunkError::InvalidFastqFormat {
                line: self.line,
                msg: "Record has an empty name".to_string(),
            });
        }
        if self.sequence.is_empty() {
            return Err(BiochunkError::InvalidFastqFormat {
                line: self.line,
                msg: "Record has no sequence".to_string(),
            });
        }
        if self.quality.is_empty() {
            return Err(BiochunkError::InvalidFastqFormat {
                line: self.line,
                msg: "Record has no quality scores".to_string(),
            });
        }
        if self.sequence.len() != self.quality.len() {
            return Err(BiochunkError::InvalidFastqFormat {
                line: self.line,
                msg: format!(
                    "Sequence length ({}) != quality length ({})",
                    self.sequence.len(),
                    self.quality.len()
                ),
            });
        }

        dst.push(T::from_parts(
            &name[1..],
            self.sequence.as_slice(),
            self.quality.as_slice(),
        ));

        self.name.clear();
        self.sequence.clear();
        self.quality.clear();
        self.pending = 0;
        Ok(())
    }
}

impl<T: FromFastq> RecordMachine for FastqMachine<T> {
    type Record = T;

    fn begin_call(&mut self) {
        self.name.clear();
        self.sequence.clear();
        self.quality.clear();
        self.role = 0;
        self.pending = 0;
        self.line = 0;
    }

    fn feed(&mut self, bytes: &[u8], dst: &mut Vec<T>) -> Result<()> {
        for &c in bytes {
            self.pending += 1;
            if c == b'\n' {
                self.line += 1;
                self.role = (self.role + 1) % 4;
                if self.role == 0 {
                    self.close_record(dst)?;
                }
            } else {
                match self.role {
                    0 => {
                        if !(self.name.is_empty() && c.is_ascii_whitespace()) {
                            self.name.push(c)?;
                        }
                    }
                    1 => self.sequence.push(c)?,
                    2 => {} // separator line, content ignored
                    _ => self.quality.push(c)?,
                }
            }
        }
        Ok(())
    }

    fn finish(&mut self, dst: &mut Vec<T>) -> Result<()> {
        if self.name.is_empty() && self.sequence.is_empty() && self.quality.is_empty() {
            return Ok(());
        }
        self.close_record(dst)
    }

    fn pending_bytes(&self) -> u64 {
        self.pending
    }
}
