use serde::{Deserialize, Serialize};

/// A single FASTA record: the header line without its leading `>`, and the
/// residues with line breaks removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceRecord {
    pub header: String,
    pub sequence: String,
}

impl SequenceRecord {
    pub fn new(header: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            sequence: sequence.into(),
        }
    }

    /// A record with a header and no residues, used to hold a species' slot
    pub fn placeholder(header: impl Into<String>) -> Self {
        Self::new(header, String::new())
    }

    /// Number of residues in the sequence
    #[must_use]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// First whitespace-delimited token of the header (the accession for NCBI records)
    #[must_use]
    pub fn accession(&self) -> &str {
        self.header.split_whitespace().next().unwrap_or("")
    }
}
