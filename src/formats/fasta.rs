//! FASTA chunked parser.
//!
//! # Format
//!
//! A record is one header line starting with `>` followed by one or more
//! sequence lines:
//!
//! ```text
//! >read1 optional description
//! GATTACAGATTACA
//! TGCATGCA
//! >read2
//! ACGTACGT
//! ```
//!
//! The record name is everything after the marker, trimmed of surrounding
//! whitespace; the sequence is the concatenation of the body lines with
//! line breaks stripped. A `>` at the start of any line after the header
//! closes the record; the last record is closed at end of input, with or
//! without a trailing newline.
//!
//! # Example
//!
//! ```
//! use biochunk::{ChunkParser, FastaParser, FastaRecord};
//! use std::io::Cursor;
//!
//! # fn main() -> biochunk::Result<()> {
//! let mut parser = FastaParser::new(Cursor::new(">seq1\nACGT\nACGT\n>seq2\nTTTT\n"));
//! let mut reads: Vec<FastaRecord> = Vec::new();
//! parser.parse_objects(&mut reads, 0)?;
//!
//! assert_eq!(reads.len(), 2);
//! assert_eq!(reads[0].name, "seq1");
//! assert_eq!(reads[0].sequence, b"ACGTACGT");
//! # Ok(())
//! # }
//! ```

use crate::error::{BiochunkError, Result};
use crate::formats::ChunkParser;
use crate::io::chunk::{ChunkReader, RecordMachine};
use crate::io::source::{ByteSource, FileSource, GzipSource};
use crate::storage::{Region, MEDIUM_STORAGE, SMALL_STORAGE};
use crate::types::FastaRecord;
use std::fs::File;
use std::marker::PhantomData;
use std::path::Path;

/// Factory contract for objects built from FASTA records.
///
/// The parser calls this once per record, after validation, with the
/// trimmed name (marker stripped) and the concatenated sequence. Both
/// spans point into the parser's working storage and are only valid for
/// the duration of the call.
pub trait FromFasta: Sized {
    /// Construct an object from the validated fields of one record.
    fn from_parts(name: &[u8], sequence: &[u8]) -> Self;
}

/// Chunk-resumable FASTA parser.
pub struct FastaParser<S: ByteSource, T: FromFasta = FastaRecord> {
    reader: ChunkReader<S>,
    machine: FastaMachine<T>,
}

impl<T: FromFasta> FastaParser<FileSource, T> {
    /// Open the FASTA file at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(FastaParser::new(FileSource::open(path)?))
    }
}

impl<T: FromFasta> FastaParser<GzipSource<File>, T> {
    /// Open the gzip-compressed FASTA file at `path`.
    ///
    /// Gzip streams cannot rewind, so only unbounded parse calls
    /// (`max_bytes == 0`) are supported.
    pub fn from_gzip_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(FastaParser::new(GzipSource::open(path)?))
    }
}

impl<S: ByteSource, T: FromFasta> FastaParser<S, T> {
    /// Create a parser over any byte source.
    pub fn new(source: S) -> Self {
        FastaParser {
            reader: ChunkReader::new(source),
            machine: FastaMachine {
                name: Region::clipped(SMALL_STORAGE),
                sequence: Region::growable(MEDIUM_STORAGE),
                in_body: false,
                at_line_start: true,
                pending: 0,
                line: 0,
                _record: PhantomData,
            },
        }
    }
}

impl<S: ByteSource, T: FromFasta> ChunkParser for FastaParser<S, T> {
    type Record = T;

    fn parse_objects(&mut self, dst: &mut Vec<T>, max_bytes: u64) -> Result<bool> {
        self.reader.run(&mut self.machine, dst, max_bytes)
    }

    fn reset(&mut self) -> Result<()> {
        self.reader.rewind_to_start()
    }
}

/// Incremental FASTA state machine.
///
/// Cycles between reading the record's first line (the name) and its body;
/// the name region keeps the marker byte so validation can check it.
struct FastaMachine<T: FromFasta> {
    name: Region,
    sequence: Region,
    in_body: bool,
    at_line_start: bool,
    pending: u64,
    line: usize,
    _record: PhantomData<T>,
}

impl<T: FromFasta> FastaMachine<T> {
    fn close_record(&mut self, dst: &mut Vec<T>) -> Result<()> {
        self.name.trim_end();
        self.sequence.trim_end();

        let name = self.name.as_slice();
        if name.first() != Some(&b'>') {
            return Err(BiochunkError::InvalidFastaFormat {
                line: self.line,
                msg: "Expected '>' at start of header".to_string(),
            });
        }
        if name.len() < 2 {
            return Err(BiochunkError::InvalidFastaFormat {
                line: self.line,
                msg: "Record has an empty name".to_string(),
            });
        }
        if self.sequence.is_empty() {
            return Err(BiochunkError::InvalidFastaFormat {
                line: self.line,
                msg: "Record has no sequence".to_string(),
            });
        }

        dst.push(T::from_parts(&name[1..], self.sequence.as_slice()));

        self.name.clear();
        self.sequence.clear();
        self.pending = 0;
        Ok(())
    }
}

impl<T: FromFasta> RecordMachine for FastaMachine<T> {
    type Record = T;

    fn begin_call(&mut self) {
        self.name.clear();
        self.sequence.clear();
        self.in_body = false;
        self.at_line_start = true;
        self.pending = 0;
        self.line = 0;
    }

    fn feed(&mut self, bytes: &[u8], dst: &mut Vec<T>) -> Result<()> {
        for &c in bytes {
            self.pending += 1;
            if c == b'\n' {
                self.line += 1;
                self.in_body = true;
                self.at_line_start = true;
            } else if c == b'>' && self.at_line_start && self.in_body {
                // Marker at the start of a body line: the previous record
                // ends here and this byte already belongs to the next one.
                self.close_record(dst)?;
                self.name.push(b'>')?;
                self.pending = 1;
                self.in_body = false;
                self.at_line_start = false;
            } else {
                self.at_line_start = false;
                if self.in_body {
                    self.sequence.push(c)?;
                } else if !(self.name.is_empty() && c.is_ascii_whitespace()) {
                    self.name.push(c)?;
                }
            }
        }
        Ok(())
    }

    fn finish(&mut self, dst: &mut Vec<T>) -> Result<()> {
        if self.name.is_empty() && self.sequence.is_empty() {
            return Ok(());
        }
        self.close_record(dst)
    }

    fn pending_bytes(&self) -> u64 {
        self.pending
    }
}
