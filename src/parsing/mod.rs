//! Parsers for the text inputs of the toolkit.
//!
//! - **FASTA files**: ordered header/sequence records, plain or gzip compressed
//! - **Species lists**: newline-separated species names defining output order
//!
//! ## Example
//!
//! ```rust
//! use phylobuilder::parsing::fasta::parse_fasta_text;
//! use phylobuilder::parsing::species::parse_species_text;
//!
//! let records = parse_fasta_text(">MN123456.1 Homo sapiens COI\nACGT\nACGT\n").unwrap();
//! assert_eq!(records[0].sequence, "ACGTACGT");
//!
//! let species = parse_species_text("Homo sapiens\n\nMus musculus\n");
//! assert_eq!(species.len(), 2);
//! ```

pub mod fasta;
pub mod species;
