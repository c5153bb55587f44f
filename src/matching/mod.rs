//! Reconciliation of fetched sequence records against the species list.
//!
//! This module provides the core of the fetch tool:
//!
//! - [`SequenceReconciler`]: turns per-species candidate records into one ordered output
//! - [`HeaderMatcher`]: pluggable rule deciding whether a header names a species
//!
//! ## Reconciliation
//!
//! For each species, in list order:
//!
//! 1. **Length filter**: candidates outside `[min_length, max_length]` are dropped
//! 2. **Name check**: the first survivor whose header names the species is `Matched`
//! 3. **Fallback**: otherwise the first survivor is kept as a `NameMismatch`
//! 4. **Nothing left**: the species is `NotFound`
//!
//! Species without a usable record keep their slot as an empty placeholder, so
//! the output stays row-aligned with the species list. `skip_errors` drops those
//! slots instead, and `skip_warnings` treats name mismatches as missing.
//!
//! ## Example
//!
//! ```rust
//! use std::convert::Infallible;
//! use phylobuilder::{reconcile, ReconcileConfig, SequenceRecord, SpeciesName};
//!
//! let species: Vec<SpeciesName> = ["Homo sapiens", "Mus musculus"]
//!     .iter()
//!     .filter_map(|s| SpeciesName::new(s))
//!     .collect();
//!
//! let report = reconcile(
//!     &species,
//!     |s| -> Result<_, Infallible> {
//!         Ok(if s.as_str() == "Homo sapiens" {
//!             vec![SequenceRecord::new("MN1 Homo sapiens COI", "ACGT".repeat(160))]
//!         } else {
//!             vec![]
//!         })
//!     },
//!     ReconcileConfig::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(report.entries.len(), 2);
//! assert!(report.entries[1].is_placeholder());
//! ```

pub mod matcher;
pub mod reconcile;

pub use matcher::{ContainsMatcher, HeaderMatcher, MatcherKind, TokenMatcher};
pub use reconcile::{
    reconcile, OutputEntry, ReconcileConfig, ReconciliationReport, SequenceReconciler,
};
