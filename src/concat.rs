//! Renaming FASTA headers to species names and concatenating alignments.
//!
//! Every input alignment must hold one record per species, in species-list
//! order. Output record `i` is headed by species `i` and carries the sequences
//! at index `i` of every input, joined in input order.

use std::path::Path;

use thiserror::Error;
use tracing::{debug, warn};

use crate::core::record::SequenceRecord;
use crate::core::types::SpeciesName;
use crate::parsing::fasta::{parse_fasta_file, FastaError};

#[derive(Error, Debug)]
pub enum ConcatError {
    #[error("No FASTA files given")]
    NoInputs,

    #[error("{file} has {records} sequences but the species list has {species}")]
    AlignmentLength {
        file: String,
        records: usize,
        species: usize,
    },

    #[error("Failed to read {file}: {source}")]
    Fasta {
        file: String,
        #[source]
        source: FastaError,
    },
}

/// One input alignment and where it came from
#[derive(Debug, Clone)]
pub struct AlignmentInput {
    pub label: String,
    pub records: Vec<SequenceRecord>,
}

impl AlignmentInput {
    pub fn new(label: impl Into<String>, records: Vec<SequenceRecord>) -> Self {
        Self {
            label: label.into(),
            records,
        }
    }

    /// # Errors
    ///
    /// Returns `ConcatError::Fasta` if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConcatError> {
        let label = path.display().to_string();
        let records = parse_fasta_file(path).map_err(|source| ConcatError::Fasta {
            file: label.clone(),
            source,
        })?;
        Ok(Self { label, records })
    }

    /// True when all sequences have the same length
    #[must_use]
    pub fn is_aligned(&self) -> bool {
        self.records
            .windows(2)
            .all(|pair| pair[0].len() == pair[1].len())
    }
}

/// Rename records to species names and concatenate them across inputs.
///
/// # Errors
///
/// Returns `ConcatError::NoInputs` for an empty input list, or
/// `ConcatError::AlignmentLength` if any input's record count differs from
/// the number of species.
pub fn rename_and_concatenate(
    inputs: &[AlignmentInput],
    species: &[SpeciesName],
) -> Result<Vec<SequenceRecord>, ConcatError> {
    if inputs.is_empty() {
        return Err(ConcatError::NoInputs);
    }

    for input in inputs {
        if input.records.len() != species.len() {
            return Err(ConcatError::AlignmentLength {
                file: input.label.clone(),
                records: input.records.len(),
                species: species.len(),
            });
        }
        if !input.is_aligned() {
            warn!(file = %input.label, "Sequences differ in length; input may not be aligned");
        }
    }

    let records: Vec<SequenceRecord> = species
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let sequence: String = inputs
                .iter()
                .map(|input| input.records[i].sequence.as_str())
                .collect();
            SequenceRecord::new(name.as_str(), sequence)
        })
        .collect();

    debug!(
        species = records.len(),
        inputs = inputs.len(),
        length = records.first().map_or(0, SequenceRecord::len),
        "Concatenated alignments"
    );

    Ok(records)
}
