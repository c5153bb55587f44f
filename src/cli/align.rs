use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use tracing::{info, warn};

use crate::cli::OutputFormat;
use crate::core::types::Algorithm;
use crate::parsing::fasta::parse_fasta_text;
use crate::remote::ebi::{summary_url, wait_for_job, AlignmentService, EbiClient, PollConfig};
use crate::utils::output::{alignment_output_path, write_atomic};
use crate::utils::validation::validate_email;

#[derive(Args)]
pub struct AlignArgs {
    /// Input FASTA file
    #[arg(short, long)]
    pub file: PathBuf,

    /// Email address sent to EMBL-EBI with the job
    #[arg(short, long)]
    pub email: String,

    /// Alignment algorithm to use
    #[arg(short, long, value_enum, default_value = "clustalo")]
    pub algorithm: Algorithm,

    /// Output file (default: <input name>_<algorithm>.fasta)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Seconds between job status checks
    #[arg(long, default_value = "10")]
    pub poll_interval: u64,

    /// Give up after this many seconds (default: wait until the job ends)
    #[arg(long)]
    pub max_wait: Option<u64>,

    /// Open the job summary page in a browser
    #[arg(long)]
    pub open: bool,
}

impl AlignArgs {
    fn poll_config(&self) -> PollConfig {
        PollConfig {
            interval: Duration::from_secs(self.poll_interval),
            max_wait: self.max_wait.map(Duration::from_secs),
        }
    }
}

/// Execute align subcommand
///
/// # Errors
///
/// Returns an error if the input is not FASTA with at least two sequences, the
/// job cannot be submitted, ends in an error state or times out, or the
/// result cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: AlignArgs, format: OutputFormat, _verbose: bool) -> anyhow::Result<()> {
    validate_email(&args.email)?;

    let content = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let fasta = content.trim_start_matches('\u{feff}');

    let records = parse_fasta_text(fasta)
        .with_context(|| format!("{} is not a valid FASTA file", args.file.display()))?;
    if records.len() < 2 {
        anyhow::bail!(
            "{} has {} sequence(s); an alignment needs at least two",
            args.file.display(),
            records.len()
        );
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| alignment_output_path(&args.file, args.algorithm));

    let service = EbiClient::new(args.algorithm, &args.email)?;
    let job_id = service
        .submit(fasta)
        .context("Failed to submit alignment job")?;
    let url = summary_url(args.algorithm, &job_id);

    if let OutputFormat::Text = format {
        println!("Job submitted. Job ID: {job_id}");
        println!("You can check it at: {url}");
    }
    info!("Submitted {} sequences to {}", records.len(), args.algorithm);

    if args.open {
        if let Err(e) = open::that(&url) {
            warn!("Could not open browser: {e}");
        }
    }

    wait_for_job(&service, &job_id, &args.poll_config())?;

    let aligned = service
        .result(&job_id)
        .context("Failed to download alignment")?;
    write_atomic(&output, |w| w.write_all(aligned.as_bytes()))
        .with_context(|| format!("Failed to write {}", output.display()))?;

    match format {
        OutputFormat::Text => println!("Alignment saved to {}", output.display()),
        OutputFormat::Json => {
            let summary = serde_json::json!({
                "job_id": job_id,
                "algorithm": args.algorithm,
                "summary_url": url,
                "input": args.file.display().to_string(),
                "output": output.display().to_string(),
                "sequences": records.len(),
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}
