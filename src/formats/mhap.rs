//! MHAP chunked parser.
//!
//! # Format
//!
//! One overlap per line, twelve space-delimited fields in fixed order:
//!
//! ```text
//! a_id b_id error minmers a_rc a_begin a_end a_length b_rc b_begin b_end b_length
//! ```
//!
//! All fields are unsigned integers except `error`, a floating-point error
//! rate. Exactly twelve fields are required; fewer or more fail the call.
//!
//! # Example
//!
//! ```
//! use biochunk::{ChunkParser, MhapParser, MhapRecord};
//! use std::io::Cursor;
//!
//! # fn main() -> biochunk::Result<()> {
//! let mut parser = MhapParser::new(Cursor::new("1 2 0.01 5 0 0 10 10 0 0 10 10\n"));
//! let mut overlaps: Vec<MhapRecord> = Vec::new();
//! parser.parse_objects(&mut overlaps, 0)?;
//!
//! assert_eq!(overlaps[0].a_id, 1);
//! assert_eq!(overlaps[0].b_id, 2);
//! assert_eq!(overlaps[0].error, 0.01);
//! # Ok(())
//! # }
//! ```

use crate::error::{BiochunkError, Result};
use crate::formats::ChunkParser;
use crate::io::chunk::{ChunkReader, RecordMachine};
use crate::io::source::{ByteSource, FileSource, GzipSource};
use crate::storage::{Region, SMALL_STORAGE};
use crate::types::MhapRecord;
use std::fs::File;
use std::marker::PhantomData;
use std::path::Path;

/// Number of fields in an MHAP record.
const MHAP_FIELD_COUNT: usize = 12;

/// Factory contract for objects built from MHAP records.
pub trait FromMhap: Sized {
    /// Construct an object from the twelve validated fields of one record.
    #[allow(clippy::too_many_arguments)]
    fn from_parts(
        a_id: u32,
        b_id: u32,
        error: f64,
        minmers: u32,
        a_rc: u32,
        a_begin: u32,
        a_end: u32,
        a_length: u32,
        b_rc: u32,
        b_begin: u32,
        b_end: u32,
        b_length: u32,
    ) -> Self;
}

/// Chunk-resumable MHAP parser.
pub struct MhapParser<S: ByteSource, T: FromMhap = MhapRecord> {
    reader: ChunkReader<S>,
    machine: MhapMachine<T>,
}

impl<T: FromMhap> MhapParser<FileSource, T> {
    /// Open the MHAP file at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(MhapParser::new(FileSource::open(path)?))
    }
}

impl<T: FromMhap> MhapParser<GzipSource<File>, T> {
    /// Open the gzip-compressed MHAP file at `path`.
    ///
    /// Gzip streams cannot rewind, so only unbounded parse calls
    /// (`max_bytes == 0`) are supported.
    pub fn from_gzip_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(MhapParser::new(GzipSource::open(path)?))
    }
}

impl<S: ByteSource, T: FromMhap> MhapParser<S, T> {
    /// Create a parser over any byte source.
    pub fn new(source: S) -> Self {
        MhapParser {
            reader: ChunkReader::new(source),
            machine: MhapMachine {
                line_buf: Region::growable(SMALL_STORAGE),
                pending: 0,
                line: 0,
                _record: PhantomData,
            },
        }
    }
}

impl<S: ByteSource, T: FromMhap> ChunkParser for MhapParser<S, T> {
    type Record = T;

    fn parse_objects(&mut self, dst: &mut Vec<T>, max_bytes: u64) -> Result<bool> {
        self.reader.run(&mut self.machine, dst, max_bytes)
    }

    fn reset(&mut self) -> Result<()> {
        self.reader.rewind_to_start()
    }
}

fn mhap_error(line: usize, msg: String) -> BiochunkError {
    BiochunkError::InvalidMhapFormat { line, msg }
}

fn parse_u32(token: &str, field: &'static str, line: usize) -> Result<u32> {
    token.trim().parse().map_err(|_| {
        mhap_error(line, format!("Invalid value '{}' for field '{}'", token, field))
    })
}

fn parse_f64(token: &str, field: &'static str, line: usize) -> Result<f64> {
    token.trim().parse().map_err(|_| {
        mhap_error(line, format!("Invalid value '{}' for field '{}'", token, field))
    })
}

/// Incremental MHAP state machine: accumulates one line, then tokenizes.
struct MhapMachine<T: FromMhap> {
    line_buf: Region,
    pending: u64,
    line: usize,
    _record: PhantomData<T>,
}

impl<T: FromMhap> MhapMachine<T> {
    fn close_line(&mut self, dst: &mut Vec<T>) -> Result<()> {
        self.line_buf.trim_end();
        let line = self.line;

        let text = std::str::from_utf8(self.line_buf.as_slice())
            .map_err(|_| mhap_error(line, "Record is not valid UTF-8".to_string()))?;

        let fields: Vec<&str> = text.split(' ').collect();
        if fields.len() != MHAP_FIELD_COUNT {
            return Err(mhap_error(
                line,
                format!(
                    "Expected {} space-delimited fields, got {}",
                    MHAP_FIELD_COUNT,
                    fields.len()
                ),
            ));
        }

        dst.push(T::from_parts(
            parse_u32(fields[0], "a_id", line)?,
            parse_u32(fields[1], "b_id", line)?,
            parse_f64(fields[2], "error", line)?,
            parse_u32(fields[3], "minmers", line)?,
            parse_u32(fields[4], "a_rc", line)?,
            parse_u32(fields[5], "a_begin", line)?,
            parse_u32(fields[6], "a_end", line)?,
            parse_u32(fields[7], "a_length", line)?,
            parse_u32(fields[8], "b_rc", line)?,
            parse_u32(fields[9], "b_begin", line)?,
            parse_u32(fields[10], "b_end", line)?,
            parse_u32(fields[11], "b_length", line)?,
        ));

        self.line_buf.clear();
        self.pending = 0;
        Ok(())
    }
}

impl<T: FromMhap> RecordMachine for MhapMachine<T> {
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
