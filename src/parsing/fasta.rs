//! FASTA reading and writing using noodles.
//!
//! Records are read into [`SequenceRecord`]s holding the full header line
//! (name plus description) and the unwrapped residues.
//!
//! Files ending in `.gz` or `.bgz` are decompressed while reading.

use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use noodles::fasta;
use thiserror::Error;

use crate::core::record::SequenceRecord;

#[derive(Error, Debug)]
pub enum FastaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid FASTA format: {0}")]
    InvalidFormat(String),

    #[error("noodles error: {0}")]
    Noodles(String),
}

const UTF8_BOM: char = '\u{feff}';

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Parse a FASTA file into ordered records.
///
/// # Errors
///
/// Returns `FastaError::Io` if the file cannot be read, or the errors of
/// [`parse_fasta_text`] if the content is malformed.
pub fn parse_fasta_file(path: &Path) -> Result<Vec<SequenceRecord>, FastaError> {
    let file = std::fs::File::open(path)?;
    let mut content = String::new();

    if is_gzipped(path) {
        BufReader::new(GzDecoder::new(file)).read_to_string(&mut content)?;
    } else {
        BufReader::new(file).read_to_string(&mut content)?;
    }

    parse_fasta_text(&content)
}

/// Parse FASTA text into ordered records.
///
/// Wrapped sequence lines are joined, blank lines are ignored and a leading
/// UTF-8 byte order mark is dropped. Empty input yields no records.
///
/// # Errors
///
/// Returns `FastaError::InvalidFormat` if sequence data appears before the
/// first header line, or `FastaError::Noodles` if a record cannot be read.
pub fn parse_fasta_text(text: &str) -> Result<Vec<SequenceRecord>, FastaError> {
    let text = text.trim_start_matches(UTF8_BOM).trim_start();

    if let Some(first_line) = text.lines().next() {
        if !first_line.starts_with('>') {
            return Err(FastaError::InvalidFormat(format!(
                "expected a '>' header line, found '{}'",
                truncate(first_line, 40)
            )));
        }
    }

    let mut reader = fasta::io::Reader::new(text.as_bytes());
    parse_fasta_reader(&mut reader)
}

/// Parse from a noodles FASTA reader
fn parse_fasta_reader<R: BufRead>(
    reader: &mut fasta::io::Reader<R>,
) -> Result<Vec<SequenceRecord>, FastaError> {
    let mut records = Vec::new();

    for result in reader.records() {
        let record = result
            .map_err(|e| FastaError::Noodles(format!("Failed to parse FASTA record: {e}")))?;

        let mut header = String::from_utf8_lossy(record.name()).into_owned();
        if let Some(description) = record.description() {
            header.push(' ');
            header.push_str(&String::from_utf8_lossy(description));
        }

        let sequence = String::from_utf8_lossy(record.sequence().as_ref()).into_owned();
        records.push(SequenceRecord::new(header, sequence));
    }

    Ok(records)
}

/// Write records as FASTA, one `>` header line per record followed by the
/// sequence wrapped at 80 residues. Records with an empty sequence produce a
/// header line only.
///
/// # Errors
///
/// Returns `FastaError::Io` if writing fails.
pub fn write_fasta<W: Write + ?Sized>(
    writer: &mut W,
    records: &[SequenceRecord],
) -> Result<(), FastaError> {
    {
        let mut fasta_writer = fasta::io::Writer::new(&mut *writer);

        for record in records {
            let definition =
                fasta::record::Definition::new(record.header.as_bytes().to_vec(), None);
            let sequence = fasta::record::Sequence::from(record.sequence.as_bytes().to_vec());
            fasta_writer.write_record(&fasta::Record::new(definition, sequence))?;
        }
    }

    writer.flush()?;
    Ok(())
}

/// Serialize records to a FASTA string
///
/// # Errors
///
/// Returns `FastaError::Io` if formatting into the buffer fails.
pub fn to_fasta_string(records: &[SequenceRecord]) -> Result<String, FastaError> {
    let mut buffer = Vec::new();
    write_fasta(&mut buffer, records)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars).collect();
        format!("{head}...")
    }
}
