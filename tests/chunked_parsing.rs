//! Integration tests for chunked parsing across all four formats.
//!
//! These exercise the public facade end to end: whole-file parsing,
//! chunked parsing with resumption, reset, budget errors, cross-format
//! misuse and gzip input.

use biochunk::{
    BiochunkError, ChunkParser, FastaParser, FastaRecord, FastqParser, FastqRecord, MhapParser,
    MhapRecord, PafParser, PafRecord,
};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_temp(content: &[u8]) -> NamedTempFile {
    let mut tmp = NamedTempFile::new().expect("Failed to create temp file");
    tmp.write_all(content).expect("Failed to write temp file");
    tmp
}

fn sample_fasta(records: usize) -> String {
    let mut out = String::new();
    for i in 0..records {
        out.push_str(&format!(">read_{} simulated\n", i));
        let seq = "ACGTACGTGG".repeat(i % 7 + 1);
        // Wrap the sequence at 40 columns like most FASTA writers do.
        for chunk in seq.as_bytes().chunks(40) {
            out.push_str(std::str::from_utf8(chunk).unwrap());
            out.push('\n');
        }
    }
    out
}

fn sample_fastq(records: usize) -> String {
    let mut out = String::new();
    for i in 0..records {
        let seq = "GATTACA".repeat(i % 5 + 1);
        out.push_str(&format!(
            "@read_{}\n{}\n+\n{}\n",
            i,
            seq,
            "I".repeat(seq.len())
        ));
    }
    out
}

fn sample_mhap(records: usize) -> String {
    (0..records)
        .map(|i| format!("{} {} 0.08 11 0 100 1900 2000 1 50 1850 2000\n", i + 1, i + 2))
        .collect()
}

fn sample_paf(records: usize) -> String {
    (0..records)
        .map(|i| {
            format!(
                "read_{}\t2000\t100\t1900\t+\tchr1\t50000\t1000\t2800\t1700\t1800\t60\n",
                i
            )
        })
        .collect()
}

#[test]
fn fasta_parse_whole_and_in_chunks() {
    let tmp = write_temp(sample_fasta(50).as_bytes());

    let mut whole: Vec<FastaRecord> = Vec::new();
    let mut parser = FastaParser::from_path(tmp.path()).unwrap();
    assert!(!parser.parse_objects(&mut whole, 0).unwrap());
    assert_eq!(whole.len(), 50);

    let mut chunked: Vec<FastaRecord> = Vec::new();
    let mut parser = FastaParser::from_path(tmp.path()).unwrap();
    let mut calls = 0;
    while parser.parse_objects(&mut chunked, 256).unwrap() {
        calls += 1;
        assert!(!chunked.is_empty(), "a bounded call emitted nothing");
    }
    assert!(calls > 1, "budget of 256 bytes should need several calls");
    assert_eq!(chunked, whole);
}

#[test]
fn fastq_parse_whole_and_in_chunks() {
    let tmp = write_temp(sample_fastq(40).as_bytes());

    let mut whole: Vec<FastqRecord> = Vec::new();
    let mut parser = FastqParser::from_path(tmp.path()).unwrap();
    assert!(!parser.parse_objects(&mut whole, 0).unwrap());
    assert_eq!(whole.len(), 40);

    let mut chunked: Vec<FastqRecord> = Vec::new();
    let mut parser = FastqParser::from_path(tmp.path()).unwrap();
    while parser.parse_objects(&mut chunked, 128).unwrap() {}
    assert_eq!(chunked, whole);
}

#[test]
fn mhap_parse_whole_and_in_chunks() {
    let tmp = write_temp(sample_mhap(150).as_bytes());

    let mut whole: Vec<MhapRecord> = Vec::new();
    let mut parser = MhapParser::from_path(tmp.path()).unwrap();
    assert!(!parser.parse_objects(&mut whole, 0).unwrap());
    assert_eq!(whole.len(), 150);

    let mut chunked: Vec<MhapRecord> = Vec::new();
    let mut parser = MhapParser::from_path(tmp.path()).unwrap();
    while parser.parse_objects(&mut chunked, 1024).unwrap() {}
    assert_eq!(chunked, whole);
}

#[test]
fn paf_parse_whole_and_in_chunks() {
    let tmp = write_temp(sample_paf(120).as_bytes());

    let mut whole: Vec<PafRecord> = Vec::new();
    let mut parser = PafParser::from_path(tmp.path()).unwrap();
    assert!(!parser.parse_objects(&mut whole, 0).unwrap());
    assert_eq!(whole.len(), 120);

    let mut chunked: Vec<PafRecord> = Vec::new();
    let mut parser = PafParser::from_path(tmp.path()).unwrap();
    while parser.parse_objects(&mut chunked, 1024).unwrap() {}
    assert_eq!(chunked, whole);
}

#[test]
fn parse_and_reset_reproduces_the_result() {
    let tmp = write_temp(sample_fasta(30).as_bytes());
    let mut parser = FastaParser::from_path(tmp.path()).unwrap();

    let mut first: Vec<FastaRecord> = Vec::new();
    parser.parse_objects(&mut first, 0).unwrap();

    parser.reset().unwrap();

    let mut second: Vec<FastaRecord> = Vec::new();
    while parser.parse_objects(&mut second, 512).unwrap() {}

    assert_eq!(first, second);
}

#[test]
fn chunk_size_error_leaves_parser_retryable() {
    let tmp = write_temp(sample_fastq(5).as_bytes());
    let mut parser = FastqParser::from_path(tmp.path()).unwrap();
    let mut reads: Vec<FastqRecord> = Vec::new();

    let err = parser.parse_objects(&mut reads, 4).unwrap_err();
    assert!(matches!(err, BiochunkError::ChunkTooSmall { max_bytes: 4 }));
    assert!(reads.is_empty());

    // The source was rewound to the record start; a workable budget succeeds.
    while parser.parse_objects(&mut reads, 4096).unwrap() {}
    assert_eq!(reads.len(), 5);
}

#[test]
fn wrong_format_is_a_format_error() {
    let fasta = write_temp(sample_fasta(3).as_bytes());
    let mut parser = FastqParser::from_path(fasta.path()).unwrap();
    let mut reads: Vec<FastqRecord> = Vec::new();
    assert!(matches!(
        parser.parse_objects(&mut reads, 0),
        Err(BiochunkError::InvalidFastqFormat { .. })
    ));

    let mhap = write_temp(sample_mhap(3).as_bytes());
    let mut parser = PafParser::from_path(mhap.path()).unwrap();
    let mut mappings: Vec<PafRecord> = Vec::new();
    assert!(matches!(
        parser.parse_objects(&mut mappings, 0),
        Err(BiochunkError::InvalidPafFormat { .. })
    ));

    let paf = write_temp(sample_paf(3).as_bytes());
    let mut parser = MhapParser::from_path(paf.path()).unwrap();
    let mut overlaps: Vec<MhapRecord> = Vec::new();
    assert!(matches!(
        parser.parse_objects(&mut overlaps, 0),
        Err(BiochunkError::InvalidMhapFormat { .. })
    ));
}

#[test]
fn shared_ownership_output_matches_owned() {
    let tmp = write_temp(sample_fastq(10).as_bytes());

    let mut owned: Vec<FastqRecord> = Vec::new();
    let mut parser = FastqParser::from_path(tmp.path()).unwrap();
    parser.parse_objects(&mut owned, 0).unwrap();

    let mut shared: Vec<std::sync::Arc<FastqRecord>> = Vec::new();
    let mut parser = FastqParser::from_path(tmp.path()).unwrap();
    parser.parse_objects_shared(&mut shared, 0).unwrap();

    assert_eq!(shared.len(), owned.len());
    for (a, b) in shared.iter().zip(owned.iter()) {
        assert_eq!(a.as_ref(), b);
    }
}

#[test]
fn gzip_input_parses_unbounded() {
    let plain = sample_fastq(25);

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(plain.as_bytes()).unwrap();
    let tmp = write_temp(&encoder.finish().unwrap());

    let mut from_gzip: Vec<FastqRecord> = Vec::new();
    let mut parser = FastqParser::from_gzip_path(tmp.path()).unwrap();
    assert!(!parser.parse_objects(&mut from_gzip, 0).unwrap());
    assert_eq!(from_gzip.len(), 25);
}

#[test]
fn gzip_input_rejects_budgeted_rewind() {
    let plain = sample_fastq(100);

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(plain.as_bytes()).unwrap();
    let tmp = write_temp(&encoder.finish().unwrap());

    let mut reads: Vec<FastqRecord> = Vec::new();
    let mut parser = FastqParser::from_gzip_path(tmp.path()).unwrap();
    // The budget forces a rewind, which a gzip stream cannot perform.
    let err = parser.parse_objects(&mut reads, 64).unwrap_err();
    match err {
        BiochunkError::Io(io_err) => {
            assert_eq!(io_err.kind(), std::io::ErrorKind::Unsupported);
        }
        other => panic!("expected an I/O error, got {:?}", other),
    }
}

#[test]
fn interleaved_draining_between_chunks() {
    // The intended usage pattern: drain the sink after every bounded call.
    let tmp = write_temp(sample_paf(60).as_bytes());
    let mut parser = PafParser::from_path(tmp.path()).unwrap();

    let mut total = 0usize;
    let mut batch: Vec<PafRecord> = Vec::new();
    loop {
        let more = parser.parse_objects(&mut batch, 512).unwrap();
        total += batch.len();
        batch.clear();
        if !more {
            break;
        }
    }
    assert_eq!(total, 60);
}
