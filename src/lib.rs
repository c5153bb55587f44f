//! # phylobuilder
//!
//! A library and command-line toolkit for assembling multi-gene alignments for a
//! list of species.
//!
//! Building a species tree starts with the same chores every time: find one
//! sequence of each gene for every species, align each gene, then stitch the
//! alignments together with consistent species names. `phylobuilder` covers
//! those three steps while keeping the species list as the single source of
//! truth for output order.
//!
//! ## Features
//!
//! - **Ordered fetching**: one NCBI record per species, in species-list order
//! - **Placeholders**: species without a usable record keep their row
//! - **Name checks**: headers that do not name the species are flagged for review
//! - **Remote alignment**: submits to EMBL-EBI (Clustal Omega, MAFFT, MUSCLE, ...)
//!   and waits for the job
//! - **Concatenation**: renames headers to species names and joins alignments
//!
//! ## Modules
//!
//! - [`core`]: Species names, sequence records, and outcome types
//! - [`matching`]: Reconciliation of fetched records against the species list
//! - [`parsing`]: FASTA and species-list parsers
//! - [`remote`]: NCBI Entrez and EMBL-EBI clients
//! - [`concat`]: Header renaming and alignment concatenation
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod concat;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod remote;
pub mod utils;

// Re-export commonly used types for convenience
pub use core::record::SequenceRecord;
pub use core::types::*;
pub use matching::{reconcile, ReconcileConfig, ReconciliationReport, SequenceReconciler};
