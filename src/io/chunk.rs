//! Chunked reading: refill, byte budget, rewind.
//!
//! All four parsers share this driver. Each parse call repeatedly refills a
//! fixed scratch buffer from the byte source and feeds it to the format's
//! state machine. With a nonzero budget, refills are capped at the budget's
//! remainder, so a call never feeds more than `max_bytes` bytes; when the
//! budget runs out the source is rewound by the bytes of the in-progress
//! record, landing the next call exactly on that record's first byte.

use crate::error::{BiochunkError, Result};
use crate::io::source::ByteSource;

/// Size of the scratch buffer refilled from the byte source (64 KiB).
pub const BUFFER_SIZE: usize = 64 * 1024;

/// One format's incremental state machine, driven one refill at a time.
pub(crate) trait RecordMachine {
    /// Object emitted per completed record.
    type Record;

    /// Reset the per-call parse cursor (field offsets, line counters,
    /// pending byte count). Called at the start of every parse call, so a
    /// record abandoned by a budget rewind is re-read from scratch.
    fn begin_call(&mut self);

    /// Consume `bytes`, appending completed records to `dst`.
    fn feed(&mut self, bytes: &[u8], dst: &mut Vec<Self::Record>) -> Result<()>;

    /// Finalize a trailing record at end of input.
    fn finish(&mut self, dst: &mut Vec<Self::Record>) -> Result<()>;

    /// Bytes consumed so far that belong to the in-progress record.
    fn pending_bytes(&self) -> u64;
}

/// Byte source plus scratch buffer and position accounting.
pub(crate) struct ChunkReader<S: ByteSource> {
    source: S,
    buffer: Vec<u8>,
    position: u64,
}

impl<S: ByteSource> ChunkReader<S> {
    pub fn new(source: S) -> Self {
        ChunkReader {
            source,
            buffer: vec![0; BUFFER_SIZE],
            position: 0,
        }
    }

    /// Rewind the source to its first byte.
    pub fn rewind_to_start(&mut self) -> Result<()> {
        self.source.seek_relative(-(self.position as i64))?;
        self.position = 0;
        Ok(())
    }

    fn rewind(&mut self, bytes: u64) -> Result<()> {
        self.source.seek_relative(-(bytes as i64))?;
        self.position -= bytes;
        Ok(())
    }

    /// Drive one parse call. Returns whether unconsumed input remains.
    pub fn run<M: RecordMachine>(
        &mut self,
        machine: &mut M,
        dst: &mut Vec<M::Record>,
        max_bytes: u64,
    ) -> Result<bool> {
        machine.begin_call();
        let emitted_before = dst.len();
        let mut total: u64 = 0;

        loop {
            let want = if max_bytes == 0 {
                self.buffer.len()
            } else {
                (max_bytes - total).min(self.buffer.len() as u64) as usize
            };

            if want == 0 {
                // Budget consumed with input left over. Rewind to the start
                // of the record in progress; the next call re-reads it.
                self.rewind(machine.pending_bytes())?;
                if dst.len() == emitted_before {
                    return Err(BiochunkError::ChunkTooSmall { max_bytes });
                }
                return Ok(true);
            }

            let read = self.source.read(&mut self.buffer[..want])?;
            self.position += read as u64;
            total += read as u64;

            machine.feed(&self.buffer[..read], dst)?;

            if read == 0 || self.source.end_of_input() {
                machine.finish(dst)?;
                return Ok(false);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Machine treating each byte as one record, for driver-level tests.
    struct ByteMachine;

    impl RecordMachine for ByteMachine {
        type Record = u8;

        fn begin_call(&mut self) {}

        fn feed(&mut self, bytes: &[u8], dst: &mut Vec<u8>) -> Result<()> {
            dst.extend_from_slice(bytes);
            Ok(())
        }

        fn finish(&mut self, _dst: &mut Vec<u8>) -> Result<()> {
            Ok(())
        }

        fn pending_bytes(&self) -> u64 {
            0
        }
    }

    #[test]
    fn unbounded_run_consumes_everything() {
        let mut reader = ChunkReader::new(Cursor::new(b"abcdef".to_vec()));
        let mut out = Vec::new();
        let more = reader.run(&mut ByteMachine, &mut out, 0).unwrap();
        assert!(!more);
        assert_eq!(out, b"abcdef");
    }

    #[test]
    fn budget_caps_bytes_fed_per_call() {
        let mut reader = ChunkReader::new(Cursor::new(b"abcdef".to_vec()));
        let mut out = Vec::new();

        assert!(reader.run(&mut ByteMachine, &mut out, 4).unwrap());
        assert_eq!(out, b"abcd");

        assert!(!reader.run(&mut ByteMachine, &mut out, 4).unwrap());
        assert_eq!(out, b"abcdef");
    }

    #[test]
    fn rewind_to_start_replays_input() {
        let mut reader = ChunkReader::new(Cursor::new(b"abc".to_vec()));
        let mut out = Vec::new();
        reader.run(&mut ByteMachine, &mut out, 0).unwrap();
        reader.rewind_to_start().unwrap();
        reader.run(&mut ByteMachine, &mut out, 0).unwrap();
        assert_eq!(out, b"abcabc");
    }
}
