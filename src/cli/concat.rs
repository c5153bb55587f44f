use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::cli::OutputFormat;
use crate::concat::{rename_and_concatenate, AlignmentInput};
use crate::parsing::fasta::write_fasta;
use crate::parsing::species::read_species_file;
use crate::utils::output::write_atomic;

#[derive(Args)]
pub struct ConcatArgs {
    /// Input FASTA files, concatenated in the order given
    #[arg(short, long, required = true, num_args = 1..)]
    pub fasta_files: Vec<PathBuf>,

    /// File containing species names, one per line
    #[arg(short, long)]
    pub species_list: PathBuf,

    /// Output FASTA file
    #[arg(short, long)]
    pub output_file: PathBuf,
}

/// Execute concat subcommand
///
/// # Errors
///
/// Returns an error if an input cannot be read, any input's sequence count
/// differs from the species count, or the output cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ConcatArgs, format: OutputFormat, _verbose: bool) -> anyhow::Result<()> {
    let species = read_species_file(&args.species_list).with_context(|| {
        format!(
            "Failed to read species list {}",
            args.species_list.display()
        )
    })?;

    let inputs = args
        .fasta_files
        .iter()
        .map(|path| AlignmentInput::from_file(path))
        .collect::<Result<Vec<_>, _>>()?;

    for input in &inputs {
        info!("{}: {} sequences", input.label, input.records.len());
    }

    let records = rename_and_concatenate(&inputs, &species)?;

    write_atomic(&args.output_file, |w| {
        write_fasta(w, &records).map_err(anyhow::Error::from)
    })
    .with_context(|| format!("Failed to write {}", args.output_file.display()))?;

    let length = records.first().map_or(0, |r| r.len());
    match format {
        OutputFormat::Text => println!(
            "Wrote {} species x {} columns from {} file(s) to {}",
            records.len(),
            length,
            inputs.len(),
            args.output_file.display()
        ),
        OutputFormat::Json => {
            let summary = serde_json::json!({
                "output": args.output_file.display().to_string(),
                "species": records.len(),
                "columns": length,
                "inputs": inputs.iter().map(|i| i.label.as_str()).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}
