//! Core data types shared by the fetch, align, and concat tools.
//!
//! - [`SpeciesName`](types::SpeciesName): a trimmed, non-empty species name from the species list
//! - [`SequenceRecord`](record::SequenceRecord): a FASTA header and its residues
//! - [`MatchOutcome`](types::MatchOutcome): how a species was reconciled against fetched records
//! - [`Algorithm`](types::Algorithm): alignment programs available on the EBI service
//!
//! The order of the species list is canonical: every output produced from it
//! keeps the same order.

pub mod record;
pub mod types;
