//! Default record types for the four supported formats.
//!
//! The parsers are generic over the object they emit; these types are the
//! batteries-included implementations of the factory traits, so each parser
//! works out of the box. Callers with their own domain types implement the
//! matching `From*` trait instead and skip these entirely.

use crate::formats::{FromFasta, FromFastq, FromMhap, FromPaf};

/// A FASTA record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    /// Record name (text after the '>' marker, trimmed)
    pub name: String,
    /// Sequence with line breaks stripped
    pub sequence: Vec<u8>,
}

impl FromFasta for FastaRecord {
    fn from_parts(name: &[u8], sequence: &[u8]) -> Self {
        FastaRecord {
            name: String::from_utf8_lossy(name).into_owned(),
            sequence: sequence.to_vec(),
        }
    }
}

/// A FASTQ record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastqRecord {
    /// Record name (text after the '@' marker, trimmed)
    pub name: String,
    /// Sequence
    pub sequence: Vec<u8>,
    /// Per-base quality scores, same length as the sequence
    pub quality: Vec<u8>,
}

impl FromFastq for FastqRecord {
    fn from_parts(name: &[u8], sequence: &[u8], quality: &[u8]) -> Self {
        FastqRecord {
            name: String::from_utf8_lossy(name).into_owned(),
            sequence: sequence.to_vec(),
            quality: quality.to_vec(),
        }
    }
}

/// An MHAP overlap record
///
/// Twelve space-delimited values describing an overlap between two reads
/// identified by numeric ids, as emitted by MHAP and minimap-style
/// overlappers.
#[derive(Debug, Clone, PartialEq)]
pub struct MhapRecord {
    /// Id of the first read
    pub a_id: u32,
    /// Id of the second read
    pub b_id: u32,
    /// Error rate of the overlap
    pub error: f64,
    /// Number of shared min-mers
    pub minmers: u32,
    /// Whether the first read is reverse-complemented
    pub a_rc: u32,
    /// Overlap begin on the first read
    pub a_begin: u32,
    /// Overlap end on the first read
    pub a_end: u32,
    /// Length of the first read
    pub a_length: u32,
    /// Whether the second read is reverse-complemented
    pub b_rc: u32,
    /// Overlap begin on the second read
    pub b_begin: u32,
    /// Overlap end on the second read
    pub b_end: u32,
    /// Length of the second read
    pub b_length: u32,
}

impl MhapRecord {
    /// Relative orientation of the two reads: `'+'` when both strands
    /// match, `'-'` otherwise.
    pub fn orientation(&self) -> char {
        if self.a_rc == self.b_rc {
            '+'
        } else {
            '-'
        }
    }
}

impl FromMhap for MhapRecord {
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
    ) -> Self {
        MhapRecord {
            a_id,
            b_id,
            error,
            minmers,
            a_rc,
            a_begin,
            a_end,
            a_length,
            b_rc,
            b_begin,
            b_end,
            b_length,
        }
    }
}

/// A PAF alignment record
///
/// Twelve tab-delimited values describing an approximate mapping between a
/// query and a target sequence, the default output of minimap2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PafRecord {
    /// Query sequence name
    pub query_name: String,
    /// Query sequence length
    pub query_length: u32,
    /// Query start coordinate (0-based)
    pub query_start: u32,
    /// Query end coordinate (0-based, exclusive)
    pub query_end: u32,
    /// Relative strand: '+' (same) or '-' (opposite)
    pub strand: char,
    /// Target sequence name
    pub target_name: String,
    /// Target sequence length
    pub target_length: u32,
    /// Target start on the original strand (0-based)
    pub target_start: u32,
    /// Target end on the original strand (0-based, exclusive)
    pub target_end: u32,
    /// Number of matching bases
    pub num_matches: u32,
    /// Alignment block length (matches, mismatches and gaps)
    pub alignment_length: u32,
    /// Mapping quality
    pub mapq: u32,
}

impl PafRecord {
    /// Alignment identity (`num_matches / alignment_length`), between 0 and 1.
    pub fn identity(&self) -> f64 {
        if self.alignment_length == 0 {
            0.0
        } else {
            f64::from(self.num_matches) / f64::from(self.alignment_length)
        }
    }
}

impl FromPaf for PafRecord {
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
    ) -> Self {
        PafRecord {
            query_name: String::from_utf8_lossy(query_name).into_owned(),
            query_length,
            query_start,
            query_end,
            strand: strand as char,
            target_name: String::from_utf8_lossy(target_name).into_owned(),
            target_length,
            target_start,
            target_end,
            num_matches,
            alignment_length,
            mapq,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mhap_orientation_follows_strand_flags() {
        let record = MhapRecord::from_parts(1, 2, 0.01, 5, 0, 0, 10, 10, 0, 0, 10, 10);
        assert_eq!(record.orientation(), '+');

        let record = MhapRecord::from_parts(1, 2, 0.01, 5, 0, 0, 10, 10, 1, 0, 10, 10);
        assert_eq!(record.orientation(), '-');
    }

    #[test]
    fn paf_identity_handles_empty_alignment() {
        let record = PafRecord::from_parts(b"q", 100, 0, 90, b'+', b"t", 200, 10, 100, 85, 90, 60);
        assert!((record.identity() - 85.0 / 90.0).abs() < 1e-9);

        let degenerate = PafRecord::from_parts(b"q", 100, 0, 0, b'+', b"t", 200, 0, 0, 0, 0, 0);
        assert_eq!(degenerate.identity(), 0.0);
    }
}
