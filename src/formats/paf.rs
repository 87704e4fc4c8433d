//! PAF chunked parser.
//!
//! # Format
//!
//! One mapping per line, twelve tab-delimited fields in fixed order:
//!
//! ```text
//! query_name  query_length  query_start  query_end  strand
//! target_name  target_length  target_start  target_end
//! num_matches  alignment_length  mapq
//! ```
//!
//! The two name fields are kept as text (trimmed, clipped to the small
//! storage class); the strand field is a single character; everything else
//! is an unsigned integer. Exactly twelve fields are required. Optional
//! SAM-like tag columns emitted by some aligners are rejected, not
//! skipped.
//!
//! # Example
//!
//! ```
//! use biochunk::{ChunkParser, PafParser, PafRecord};
//! use std::io::Cursor;
//!
//! # fn main() -> biochunk::Result<()> {
//! let line = "read1\t10000\t100\t9900\t+\tchr1\t50000\t1000\t10900\t9500\t9800\t60\n";
//! let mut parser = PafParser::new(Cursor::new(line));
//! let mut mappings: Vec<PafRecord> = Vec::new();
//! parser.parse_objects(&mut mappings, 0)?;
//!
//! assert_eq!(mappings[0].query_name, "read1");
//! assert_eq!(mappings[0].strand, '+');
//! assert_eq!(mappings[0].mapq, 60);
//! # Ok(())
//! # }
//! ```

use crate::error::{BiochunkError, Result};
use crate::formats::ChunkParser;
use crate::io::chunk::{ChunkReader, RecordMachine};
use crate::io::source::{ByteSource, FileSource, GzipSource};
use crate::storage::{Region, SMALL_STORAGE};
use crate::types::PafRecord;
use std::fs::File;
use std::marker::PhantomData;
use std::path::Path;

/// Number of fields in a PAF record.
const PAF_FIELD_COUNT: usize = 12;

/// Factory contract for objects built from PAF records.
///
/// The name spans are trimmed, clipped to the small storage class and
/// guaranteed non-empty; they point into the parser's working storage and
/// are only valid for the duration of the call. The strand byte is passed
/// through verbatim.
pub trait FromPaf: Sized {
    /// Construct an object from the validated fields of one record.
    #[allow(clippy::too_many_arguments)]
    fn from_parts(
        query_name: &[u8],
        query_length: u32,
        query_start: u32,
        query_end: u32,
        strand: u8,
        target_name: &[u8],
        target_length: u32,
        target_start: u32,
        target_end: u32,
        num_matches: u32,
        alignment_length: u32,
        mapq: u32,
    ) -> Self;
}

/// Chunk-resumable PAF parser.
pub struct PafParser<S: ByteSource, T: FromPaf = PafRecord> {
    reader: ChunkReader<S>,
    machine: PafMachine<T>,
}

impl<T: FromPaf> PafParser<FileSource, T> {
    /// Open the PAF file at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(PafParser::new(FileSource::open(path)?))
    }
}

impl<T: FromPaf> PafParser<GzipSource<File>, T> {
    /// Open the gzip-compressed PAF file at `path`.
    ///
    /// Gzip streams cannot rewind, so only unbounded parse calls
    /// (`max_bytes == 0`) are supported.
    pub fn from_gzip_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(PafParser::new(GzipSource::open(path)?))
    }
}

impl<S: ByteSource, T: FromPaf> PafParser<S, T> {
    /// Create a parser over any byte source.
    pub fn new(source: S) -> Self {
        PafParser {
            reader: ChunkReader::new(source),
            machine: PafMachine {
                line_buf: Region::growable(SMALL_STORAGE),
                pending: 0,
                line: 0,
                _record: PhantomData,
            },
        }
    }
}

impl<S: ByteSource, T: FromPaf> ChunkParser for PafParser<S, T> {
    type Record = T;

    fn parse_objects(&mut self, dst: &mut Vec<T>, max_bytes: u64) -> Result<bool> {
        self.reader.run(&mut self.machine, dst, max_bytes)
    }

    fn reset(&mut self) -> Result<()> {
        self.reader.rewind_to_start()
    }
}

fn paf_error(line: usize, msg: String) -> BiochunkError {
    BiochunkError::InvalidPafFormat { line, msg }
}

fn parse_u32(token: &str, field: &'static str, line: usize) -> Result<u32> {
    token.trim().parse().map_err(|_| {
        paf_error(line, format!("Invalid value '{}' for field '{}'", token, field))
    })
}

/// Trim a name token and clip it to the small storage class.
fn name_span(token: &str) -> &[u8] {
    let bytes = token.trim().as_bytes();
    &bytes[..bytes.len().min(SMALL_STORAGE)]
}

/// Incremental PAF state machine: accumulates one line, then tokenizes.
struct PafMachine<T: FromPaf> {
    line_buf: Region,
    pending: u64,
    line: usize,
    _record: PhantomData<T>,
}

impl<T: FromPaf> PafMachine<T> {
    fn close_line(&mut self, dst: &mut Vec<T>) -> Result<()> {
        self.line_buf.trim_end();
        let line = self.line;

        let text = std::str::from_utf8(self.line_buf.as_slice())
            .map_err(|_| paf_error(line, "Record is not valid UTF-8".to_string()))?;

        let fields: Vec<&str> = text.split('\t').collect();
        if fields.len() != PAF_FIELD_COUNT {
            return Err(paf_error(
                line,
                format!(
                    "Expected {} tab-delimited fields, got {}",
                    PAF_FIELD_COUNT,
                    fields.len()
                ),
            ));
        }

        let query_name = name_span(fields[0]);
        let target_name = name_span(fields[5]);
        if query_name.is_empty() || target_name.is_empty() {
            return Err(paf_error(line, "Empty sequence name".to_string()));
        }

        let strand = fields[4].trim().as_bytes().first().copied().ok_or_else(|| {
            paf_error(line, "Empty strand field".to_string())
        })?;

        dst.push(T::from_parts(
            query_name,
            parse_u32(fields[1], "query_length", line)?,
            parse_u32(fields[2], "query_start", line)?,
            parse_u32(fields[3], "query_end", line)?,
            strand,
            target_name,
            parse_u32(fields[6], "target_length", line)?,
            parse_u32(fields[7], "target_start", line)?,
            parse_u32(fields[8], "target_end", line)?,
            parse_u32(fields[9], "num_matches", line)?,
            parse_u32(fields[10], "alignment_length", line)?,
            parse_u32(fields[11], "mapq", line)?,
        ));

        self.line_buf.clear();
        self.pending = 0;
        Ok(())
    }
}

impl<T: FromPaf> RecordMachine for PafMachine<T> {
    type Record = T;

    fn begin_call(&mut self) {
        self.line_buf.clear();
        self.pending = 0;
        self.line = 0;
    }

    fn feed(&mut self, bytes: &[u8], dst: &mut Vec<T>) -> Result<()> {
        for &c in bytes {
            self.pending += 1;
            if c == b'\n' {
                self.line += 1;
                self.close_line(dst)?;
            } else {
                self.line_buf.push(c)?;
            }
        }
        Ok(())
    }

    fn finish(&mut self, dst: &mut Vec<T>) -> Result<()> {
        if self.line_buf.is_empty() {
            return Ok(());
        }
        self.line += 1;
        self.close_line(dst)
    }

    fn pending_bytes(&self) -> u64 {
        self.pending
    }
}
