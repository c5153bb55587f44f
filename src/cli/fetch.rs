use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::cli::OutputFormat;
use crate::core::types::MatchOutcome;
use crate::matching::matcher::MatcherKind;
use crate::matching::reconcile::{
    ReconcileConfig, ReconciliationReport, SequenceReconciler, DEFAULT_MAX_LENGTH,
    DEFAULT_MIN_LENGTH,
};
use crate::parsing::fasta::write_fasta;
use crate::parsing::species::read_species_file;
use crate::remote::entrez::{
    EntrezClient, EntrezConfig, GeneDatabase, GeneQuery, DEFAULT_MAX_CANDIDATES,
    EUTILS_BASE_URL,
};
use crate::utils::output::{write_atomic, write_species_list};
use crate::utils::progress::attach;
use crate::utils::validation::{
    validate_candidate_count, validate_email, validate_length_bounds, validate_query_template,
};

#[derive(Args)]
pub struct FetchArgs {
    /// File with one species name per line
    #[arg(short, long)]
    pub file: PathBuf,

    /// Gene name to search for (e.g. COI, cytb, 16S)
    #[arg(short, long)]
    pub gene: String,

    /// Email address sent to NCBI to identify the caller
    #[arg(short, long)]
    pub email: String,

    /// Output FASTA file
    #[arg(short, long, default_value = "output.fasta")]
    pub output: PathBuf,

    /// Minimum sequence length (inclusive)
    #[arg(long, default_value_t = DEFAULT_MIN_LENGTH)]
    pub min_length: usize,

    /// Maximum sequence length (inclusive)
    #[arg(long, default_value_t = DEFAULT_MAX_LENGTH)]
    pub max_length: usize,

    /// Leave out species for which no sequence was found
    #[arg(long)]
    pub skip_errors: bool,

    /// Leave out sequences whose header does not name the species
    #[arg(long)]
    pub skip_warnings: bool,

    /// File listing the matched species, written with --skip-errors or --skip-warnings
    #[arg(long, default_value = "used_species.txt")]
    pub manifest: PathBuf,

    /// Number of candidate records fetched per species
    #[arg(long, default_value_t = DEFAULT_MAX_CANDIDATES)]
    pub max_candidates: usize,

    /// Custom Entrez search term using {species}, {gene}, {min_length}, {max_length}
    #[arg(long)]
    pub query_template: Option<String>,

    /// NCBI API key
    #[arg(long)]
    pub api_key: Option<String>,

    /// How a header is checked against the species name
    #[arg(long, value_enum, default_value = "contains")]
    pub matcher: MatcherKind,

    /// Base URL of the E-utilities service
    #[arg(long, default_value = EUTILS_BASE_URL)]
    pub eutils_url: String,
}

impl FetchArgs {
    fn validate(&self) -> anyhow::Result<()> {
        validate_email(&self.email)?;
        validate_length_bounds(self.min_length, self.max_length)?;
        validate_candidate_count(self.max_candidates)?;
        if let Some(template) = &self.query_template {
            validate_query_template(template)?;
        }
        Ok(())
    }

    fn reconcile_config(&self) -> ReconcileConfig {
        ReconcileConfig {
            min_length: self.min_length,
            max_length: self.max_length,
            skip_errors: self.skip_errors,
            skip_warnings: self.skip_warnings,
            placeholder_label: Some(self.gene.clone()),
        }
    }

    fn entrez_config(&self) -> EntrezConfig {
        EntrezConfig {
            api_key: self.api_key.clone(),
            max_candidates: self.max_candidates,
            query_template: self.query_template.clone(),
            base_url: self.eutils_url.trim_end_matches('/').to_string(),
            ..EntrezConfig::new(&self.email)
        }
    }
}

/// Execute fetch subcommand
///
/// # Errors
///
/// Returns an error if the arguments are invalid, the species list cannot be
/// read, any NCBI request fails, or the outputs cannot be written. Nothing is
/// written when a request fails.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: FetchArgs, format: OutputFormat, _verbose: bool) -> anyhow::Result<()> {
    args.validate()?;

    let species = read_species_file(&args.file)
        .with_context(|| format!("Failed to read species list {}", args.file.display()))?;
    info!("Loaded {} species from {}", species.len(), args.file.display());

    let database = EntrezClient::new(args.entrez_config())?;
    let reconciler =
        SequenceReconciler::new(args.reconcile_config()).with_matcher(args.matcher.build());

    let progress = ProgressBar::new(species.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let attached = attach(&progress);
    let result = reconciler.reconcile(&species, |name| {
        progress.set_message(name.to_string());
        let query = GeneQuery {
            species: name,
            gene: &args.gene,
            min_length: args.min_length,
            max_length: args.max_length,
        };
        let candidates = database.fetch_candidates(&query);
        progress.inc(1);
        candidates
    });
    drop(attached);
    progress.finish_and_clear();

    let report = result.context("Sequence download failed; no output was written")?;

    for outcome in &report.outcomes {
        if let (MatchOutcome::Matched | MatchOutcome::NameMismatch, Some(accession)) =
            (outcome.outcome, &outcome.accession)
        {
            info!(
                "For {} {}, found {} ({})",
                outcome.species, args.gene, accession, outcome.outcome
            );
        }
    }

    write_atomic(&args.output, |w| {
        write_fasta(w, &report.records()).map_err(anyhow::Error::from)
    })
    .with_context(|| format!("Failed to write {}", args.output.display()))?;

    let manifest = report.manifest();
    if let Some(matched) = manifest {
        write_species_list(&args.manifest, matched)
            .with_context(|| format!("Failed to write {}", args.manifest.display()))?;
    }

    let manifest_path = manifest.map(|_| &args.manifest);
    match format {
        OutputFormat::Text => print_text_summary(&report, &args, manifest_path),
        OutputFormat::Json => print_json_summary(&report, &args, manifest_path)?,
    }

    Ok(())
}

fn print_text_summary(
    report: &ReconciliationReport,
    args: &FetchArgs,
    manifest: Option<&PathBuf>,
) {
    let found = report.count(MatchOutcome::Matched) + report.count(MatchOutcome::NameMismatch);
    println!("Found species ({found}):");
    for outcome in &report.outcomes {
        if let Some(accession) = &outcome.accession {
            let flag = if outcome.outcome == MatchOutcome::NameMismatch {
                "  [name mismatch]"
            } else {
                ""
            };
            println!("  {}\t{accession}{flag}", outcome.species);
        }
    }

    let not_found: Vec<String> = report.not_found().map(ToString::to_string).collect();
    println!("\nUnfound species ({}):", not_found.len());
    for name in &not_found {
        println!("  {name}");
    }

    if !report.warnings.is_empty() {
        println!();
        for warning in &report.warnings {
            println!("{warning}");
        }
    }

    println!(
        "\nWrote {} records for {} to {}",
        report.entries.len(),
        args.gene,
        args.output.display()
    );
    if let Some(path) = manifest {
        println!(
            "Wrote {} matched species to {}",
            report.matched.len(),
            path.display()
        );
    }
}

fn print_json_summary(
    report: &ReconciliationReport,
    args: &FetchArgs,
    manifest: Option<&PathBuf>,
) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "gene": args.gene,
        "output": args.output.display().to_string(),
        "manifest": manifest.map(|p| p.display().to_string()),
        "records_written": report.entries.len(),
        "matched": report.count(MatchOutcome::Matched),
        "name_mismatch": report.count(MatchOutcome::NameMismatch),
        "not_found": report.count(MatchOutcome::NotFound),
        "species": report.outcomes,
        "skipped": report.skipped,
        "warnings": report.warnings,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
