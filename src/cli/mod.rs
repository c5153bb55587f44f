//! Command-line interface for phylobuilder.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **fetch**: Download one gene's sequence for every species in a list from NCBI
//! - **align**: Submit a FASTA file to an EMBL-EBI alignment service and save the result
//! - **concat**: Rename alignment headers to species names and concatenate alignments
//!
//! ## Usage
//!
//! ```text
//! # One COI sequence per species, placeholders for species without one
//! phylobuilder fetch -f species.txt -g COI -e me@example.org --min-length 500 --max-length 2000
//!
//! # Align with MAFFT, writing output_mafft.fasta
//! phylobuilder align -f output.fasta -e me@example.org -a mafft
//!
//! # Build a supermatrix from two gene alignments
//! phylobuilder concat -f COI_mafft.fasta cytb_mafft.fasta -s used_species.txt -o supermatrix.fasta
//! ```

use clap::{Parser, Subcommand};

pub mod align;
pub mod concat;
pub mod fetch;

#[derive(Parser)]
#[command(name = "phylobuilder")]
#[command(version)]
#[command(about = "Fetch, align, and concatenate gene sequences for phylogenetics")]
#[command(
    long_about = "phylobuilder prepares multi-gene alignments for a list of species.\n\nIt can:\n- Fetch one sequence per species for a gene from NCBI, keeping species order\n- Submit sequences to an EMBL-EBI alignment service and wait for the result\n- Rename alignment headers to species names and concatenate several alignments"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Format of the summary printed to stdout
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch gene sequences for a list of species from NCBI
    Fetch(fetch::FetchArgs),

    /// Submit a multiple sequence alignment job to EMBL-EBI
    Align(align::AlignArgs),

    /// Replace FASTA headers with species names and concatenate files
    Concat(concat::ConcatArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
