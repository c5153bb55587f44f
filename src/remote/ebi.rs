//! EMBL-EBI Job Dispatcher client for multiple sequence alignment.
//!
//! A job is submitted with `POST <base>/<tool>/run/`, polled with
//! `GET <base>/<tool>/status/<job>` and its aligned FASTA is downloaded from
//! `GET <base>/<tool>/result/<job>/fa`.

use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::core::types::Algorithm;
use crate::remote::{build_client, read_body, RemoteError, DEFAULT_REQUEST_TIMEOUT};

pub const EBI_BASE_URL: &str = "https://www.ebi.ac.uk/Tools/services/rest";
pub const EBI_SUMMARY_BASE_URL: &str = "https://www.ebi.ac.uk/jdispatcher/msa";

/// Default delay between two status checks
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

const SERVICE: &str = "EMBL-EBI";

/// Status reported by the job dispatcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Queued,
    Running,
    Finished,
    Error,
    Failure,
    NotFound,
    Other(String),
}

impl JobStatus {
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "QUEUED" | "PENDING" => Self::Queued,
            "RUNNING" => Self::Running,
            "FINISHED" => Self::Finished,
            "ERROR" => Self::Error,
            "FAILURE" => Self::Failure,
            "NOT_FOUND" => Self::NotFound,
            _ => Self::Other(s.trim().to_string()),
        }
    }

    /// True when the job ended without a result
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Error | Self::Failure | Self::NotFound)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Queued => write!(f, "QUEUED"),
            Self::Running => write!(f, "RUNNING"),
            Self::Finished => write!(f, "FINISHED"),
            Self::Error => write!(f, "ERROR"),
            Self::Failure => write!(f, "FAILURE"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

/// A remote service that aligns FASTA sequences as an asynchronous job
pub trait AlignmentService {
    /// Submit sequences and return the job id.
    ///
    /// # Errors
    ///
    /// Returns a `RemoteError` if the submission is rejected or fails.
    fn submit(&self, fasta: &str) -> Result<String, RemoteError>;

    /// # Errors
    ///
    /// Returns a `RemoteError` if the status cannot be retrieved.
    fn status(&self, job_id: &str) -> Result<JobStatus, RemoteError>;

    /// Download the aligned FASTA of a finished job.
    ///
    /// # Errors
    ///
    /// Returns a `RemoteError` if the result cannot be retrieved.
    fn result(&self, job_id: &str) -> Result<String, RemoteError>;
}

/// Polling schedule for [`wait_for_job`]
#[derive(Debug, Clone)]
pub struct PollConfig {
    pub interval: Duration,
    /// Give up after this long; `None` waits until the job ends
    pub max_wait: Option<Duration>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_wait: None,
        }
    }
}

/// Block until a job finishes.
///
/// # Errors
///
/// Returns `RemoteError::JobFailed` if the job ends in an error state,
/// `RemoteError::Timeout` if `max_wait` elapses first, or any error of
/// [`AlignmentService::status`].
pub fn wait_for_job<S>(service: &S, job_id: &str, config: &PollConfig) -> Result<(), RemoteError>
where
    S: AlignmentService + ?Sized,
{
    let started = Instant::now();

    loop {
        let status = service.status(job_id)?;

        if status == JobStatus::Finished {
            info!(job_id, elapsed = ?started.elapsed(), "Alignment job finished");
            return Ok(());
        }
        if status.is_failed() {
            return Err(RemoteError::JobFailed {
                job_id: job_id.to_string(),
                status: status.to_string(),
            });
        }

        let waited = started.elapsed();
        if config.max_wait.is_some_and(|max_wait| waited >= max_wait) {
            return Err(RemoteError::Timeout {
                job_id: job_id.to_string(),
                waited,
            });
        }

        debug!(job_id, %status, "Checking job status...");
        thread::sleep(config.interval);
    }
}

/// URL of the human-readable job summary page
#[must_use]
pub fn summary_url(algorithm: Algorithm, job_id: &str) -> String {
    format!("{EBI_SUMMARY_BASE_URL}/{algorithm}/summary?jobId={job_id}")
}

/// Blocking client for one alignment tool of the job dispatcher
pub struct EbiClient {
    client: reqwest::blocking::Client,
    base_url: String,
    algorithm: Algorithm,
    email: String,
}

impl EbiClient {
    /// # Errors
    ///
    /// Returns `RemoteError::Http` if the HTTP client cannot be created.
    pub fn new(algorithm: Algorithm, email: impl Into<String>) -> Result<Self, RemoteError> {
        Self::with_base_url(EBI_BASE_URL, algorithm, email)
    }

    /// # Errors
    ///
    /// Returns `RemoteError::Http` if the HTTP client cannot be created.
    pub fn with_base_url(
        base_url: &str,
        algorithm: Algorithm,
        email: impl Into<String>,
    ) -> Result<Self, RemoteError> {
        Ok(Self {
            client: build_client(DEFAULT_REQUEST_TIMEOUT)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            algorithm,
            email: email.into(),
        })
    }

    fn tool_url(&self, path: &str) -> String {
        format!("{}/{}/{path}", self.base_url, self.algorithm)
    }

    fn get(&self, path: &str) -> Result<String, RemoteError> {
        let url = self.tool_url(path);
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|source| RemoteError::Http { url, source })?;
        read_body(response, SERVICE)
    }
}

impl AlignmentService for EbiClient {
    fn submit(&self, fasta: &str) -> Result<String, RemoteError> {
        let url = self.tool_url("run/");
        let response = self
            .client
            .post(&url)
            .form(&[
                ("sequence", fasta),
                ("email", self.email.as_str()),
                ("order", "input"),
            ])
            .send()
            .map_err(|source| RemoteError::Http { url, source })?;

        let job_id = read_body(response, SERVICE)?.trim().to_string();
        if job_id.is_empty() {
            return Err(RemoteError::Parse {
                service: SERVICE,
                message: "empty job id".to_string(),
            });
        }
        Ok(job_id)
    }

    fn status(&self, job_id: &str) -> Result<JobStatus, RemoteError> {
        self.get(&format!("status/{job_id}"))
            .map(|body| JobStatus::parse(&body))
    }

    fn result(&self, job_id: &str) -> Result<String, RemoteError> {
        self.get(&format!("result/{job_id}/fa"))
    }
}
