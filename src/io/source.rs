//! Byte sources feeding the chunked parsers.
//!
//! A [`ByteSource`] is a readable stream with end-of-input detection and a
//! relative seek. Budgeted parse calls rewind the source so the next call
//! resumes at an exact record boundary; sources that cannot seek (gzip
//! streams) support unbounded parsing only.

use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

/// Contract required of any input the parsers consume.
///
/// Implemented for [`FileSource`] (plain files), [`GzipSource`] (gzip
/// streams) and [`std::io::Cursor`] (in-memory buffers). Opening and
/// closing the underlying resource is the caller's concern; the parsers
/// only read, probe for end of input, and rewind.
pub trait ByteSource {
    /// Read up to `buf.len()` bytes into `buf`, returning the count read.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Whether the end of the input has been observed.
    fn end_of_input(&self) -> bool;

    /// Move the read position by `offset` bytes relative to the current one.
    ///
    /// Sources that cannot seek return an error with
    /// [`io::ErrorKind::Unsupported`].
    fn seek_relative(&mut self, offset: i64) -> io::Result<()>;
}

/// A plain file as a byte source.
pub struct FileSource {
    file: File,
    eof: bool,
}

impl FileSource {
    /// Open the file at `path` for parsing.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(FileSource {
            file: File::open(path)?,
            eof: false,
        })
    }
}

impl ByteSource for FileSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let read = self.file.read(buf)?;
        if read == 0 && !buf.is_empty() {
            self.eof = true;
        }
        Ok(read)
    }

    fn end_of_input(&self) -> bool {
        self.eof
    }

    fn seek_relative(&mut self, offset: i64) -> io::Result<()> {
        self.file.seek(SeekFrom::Current(offset))?;
        self.eof = false;
        Ok(())
    }
}

/// A gzip-compressed stream as a byte source.
///
/// Decompresses on the fly with [`MultiGzDecoder`], so concatenated gzip
/// members (bgzip output included) are handled. The decompressed stream has
/// no seekable position: budgeted parse calls that need to rewind, and
/// `reset`, fail with an [`io::ErrorKind::Unsupported`] error. Unbounded
/// parsing (`max_bytes == 0`) is fully supported.
pub struct GzipSource<R: Read> {
    decoder: MultiGzDecoder<R>,
    eof: bool,
}

impl GzipSource<File> {
    /// Open the gzip file at `path` for parsing.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(GzipSource::new(File::open(path)?))
    }
}

impl<R: Read> GzipSource<R> {
    /// Wrap a reader producing a gzip stream.
    pub fn new(inner: R) -> Self {
        GzipSource {
            decoder: MultiGzDecoder::new(inner),
            eof: false,
        }
    }
}

impl<R: Read> ByteSource for GzipSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let read = self.decoder.read(buf)?;
        if read == 0 && !buf.is_empty() {
            self.eof = true;
        }
        Ok(read)
    }

    fn end_of_input(&self) -> bool {
        self.eof
    }

    fn seek_relative(&mut self, _offset: i64) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "gzip streams do not support rewinding",
        ))
    }
}

impl<T: AsRef<[u8]>> ByteSource for io::Cursor<T> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Read::read(self, buf)
    }

    fn end_of_input(&self) -> bool {
        self.position() >= self.get_ref().as_ref().len() as u64
    }

    fn seek_relative(&mut self, offset: i64) -> io::Result<()> {
        self.seek(SeekFrom::Current(offset)).map(|_| ())
    }
}
