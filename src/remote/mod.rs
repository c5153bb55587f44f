//! Clients for the remote services used by the toolkit.
//!
//! - [`entrez`]: NCBI Entrez E-utilities, searched per species and gene
//! - [`ebi`]: EMBL-EBI Job Dispatcher for multiple sequence alignment
//!
//! Each service sits behind a trait ([`GeneDatabase`], [`AlignmentService`]) so
//! the reconciliation and polling logic can run against in-memory fakes.
//! All calls are blocking. Any failure here is fatal for the current run.

use std::time::Duration;

use thiserror::Error;

pub mod ebi;
pub mod entrez;

pub use ebi::{AlignmentService, EbiClient, JobStatus, PollConfig};
pub use entrez::{EntrezClient, EntrezConfig, GeneDatabase, GeneQuery};

/// Default timeout for a single HTTP request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} returned HTTP {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("Failed to parse {service} response: {message}")]
    Parse {
        service: &'static str,
        message: String,
    },

    #[error("Alignment job {job_id} ended with status {status}")]
    JobFailed { job_id: String, status: String },

    #[error("Alignment job {job_id} did not finish within {waited:?}")]
    Timeout { job_id: String, waited: Duration },
}

/// Build a blocking HTTP client with the crate user agent
fn build_client(timeout: Duration) -> Result<reqwest::blocking::Client, RemoteError> {
    reqwest::blocking::Client::builder()
        .user_agent(concat!("phylobuilder/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
        .map_err(|source| RemoteError::Http {
            url: String::new(),
            source,
        })
}

/// Read a response body, turning non-success statuses into `RemoteError::Status`
fn read_body(
    response: reqwest::blocking::Response,
    service: &'static str,
) -> Result<String, RemoteError> {
    let status = response.status();
    let url = response.url().to_string();
    let body = response
        .text()
        .map_err(|source| RemoteError::Http { url, source })?;

    if !status.is_success() {
        return Err(RemoteError::Status {
            service,
            status: status.as_u16(),
            body: body.trim().to_string(),
        });
    }

    Ok(body)
}

#[cfg(test)]
pub(crate) mod test_support {
    use wiremock::{Mock, MockServer};

    /// A mock HTTP server on its own runtime, reachable from blocking clients
    pub(crate) struct TestServer {
        server: MockServer,
        runtime: tokio::runtime::Runtime,
    }

    impl TestServer {
        pub(crate) fn start() -> Self {
            let runtime = tokio::runtime::Runtime::new().unwrap();
            let server = runtime.block_on(MockServer::start());
            Self { server, runtime }
        }

        pub(crate) fn mount(&self, mock: Mock) {
            self.runtime.block_on(mock.mount(&self.server));
        }

        pub(crate) fn uri(&self) -> String {
            self.server.uri()
        }
    }
}
