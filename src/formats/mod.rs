//! Format state machines and the chunk-parsing facade.
//!
//! One module per supported format. Each parser owns its byte source, a
//! 64 KiB scratch buffer and the working storage for one in-progress
//! record, and implements [`ChunkParser`] so callers can drive any format
//! through the same two operations.

pub mod fasta;
pub mod fastq;
pub mod mhap;
pub mod paf;

pub use fasta::{FastaParser, FromFasta};
pub use fastq::{FastqParser, FromFastq};
pub use mhap::{FromMhap, MhapParser};
pub use paf::{FromPaf, PafParser};

use crate::error::Result;
use std::sync::Arc;

/// Chunk-resumable parser facade shared by all four formats.
///
/// A parser hands out records in file order and can be driven either in one
/// unbounded call or in bounded chunks that resume byte-exactly where the
/// previous call stopped:
///
/// ```no_run
/// use biochunk::{ChunkParser, FastaParser, FastaRecord};
///
/// # fn main() -> biochunk::Result<()> {
/// let mut parser = FastaParser::from_path("reads.fasta")?;
/// let mut reads: Vec<FastaRecord> = Vec::new();
///
/// // Hold at most ~1 GiB of input per call.
/// while parser.parse_objects(&mut reads, 1024 * 1024 * 1024)? {
///     // process or drain `reads` between chunks
/// }
/// # Ok(())
/// # }
/// ```
pub trait ChunkParser {
    /// Object emitted per completed record.
    type Record;

    /// Parse records into `dst`, in file order, until the source is
    /// exhausted or `max_bytes` input bytes have been consumed. A
    /// `max_bytes` of zero means unbounded. Returns `true` when
    /// unconsumed input remains.
    ///
    /// When the budget runs out, the source is rewound to the first byte
    /// of the first record not emitted, so the next call resumes there. A
    /// call that cannot complete even one record within its budget fails
    /// with `ChunkTooSmall`; a syntactically invalid record fails the
    /// whole call with a format error. Records appended by earlier calls
    /// are never retracted.
    fn parse_objects(&mut self, dst: &mut Vec<Self::Record>, max_bytes: u64) -> Result<bool>;

    /// Like [`parse_objects`](ChunkParser::parse_objects), but appends
    /// shared-ownership records. This is a conversion layer over the
    /// exclusive-ownership path, not a second parser.
    fn parse_objects_shared(
        &mut self,
        dst: &mut Vec<Arc<Self::Record>>,
        max_bytes: u64,
    ) -> Result<bool> {
        let mut owned = Vec::new();
        let more = self.parse_objects(&mut owned, max_bytes)?;
        dst.reserve(owned.len());
        dst.extend(owned.into_iter().map(Arc::new));
        Ok(more)
    }

    /// Rewind the byte source to its start. Caller-owned collections of
    /// already-emitted records are untouched.
    fn reset(&mut self) -> Result<()>;
}
