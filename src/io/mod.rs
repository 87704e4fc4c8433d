//! I/O: byte sources and the chunked reading driver.

pub(crate) mod chunk;
pub mod source;

pub use chunk::BUFFER_SIZE;
pub use source::{ByteSource, FileSource, GzipSource};
