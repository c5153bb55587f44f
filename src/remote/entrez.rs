//! NCBI Entrez nucleotide search.
//!
//! A species/gene query is an `esearch` for candidate ids sorted by relevance,
//! followed by an `efetch` of those ids as FASTA.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::core::record::SequenceRecord;
use crate::core::types::SpeciesName;
use crate::parsing::fasta::parse_fasta_text;
use crate::remote::{build_client, read_body, RemoteError, DEFAULT_REQUEST_TIMEOUT};

pub const EUTILS_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// Default number of candidate records fetched per species
pub const DEFAULT_MAX_CANDIDATES: usize = 5;

const SERVICE: &str = "NCBI Entrez";

/// A request for sequences of one gene in one species
#[derive(Debug, Clone, Copy)]
pub struct GeneQuery<'a> {
    pub species: &'a SpeciesName,
    pub gene: &'a str,
    pub min_length: usize,
    pub max_length: usize,
}

impl GeneQuery<'_> {
    /// Render the Entrez search term.
    ///
    /// Without a template the term is
    /// `<species>[Organism] AND <gene>[All Fields] AND <min>:<max>[Sequence Length]`.
    /// A template may use `{species}`, `{gene}` (or `{gene_name}`), `{min_length}`
    /// and `{max_length}` placeholders.
    #[must_use]
    pub fn search_term(&self, template: Option<&str>) -> String {
        match template {
            Some(template) => template
                .replace("{species}", self.species.as_str())
                .replace("{gene_name}", self.gene)
                .replace("{gene}", self.gene)
                .replace("{min_length}", &self.min_length.to_string())
                .replace("{max_length}", &self.max_length.to_string()),
            None => format!(
                "{}[Organism] AND {}[All Fields] AND {}:{}[Sequence Length]",
                self.species, self.gene, self.min_length, self.max_length
            ),
        }
    }
}

/// A source of candidate sequence records for a species and gene
pub trait GeneDatabase {
    /// Return zero or more candidate records, best first.
    ///
    /// # Errors
    ///
    /// Returns a `RemoteError` when the database cannot be queried.
    fn fetch_candidates(&self, query: &GeneQuery<'_>) -> Result<Vec<SequenceRecord>, RemoteError>;
}

/// Settings for talking to Entrez.
///
/// NCBI asks every caller to identify itself with an email address; it is sent
/// with every request made by the client built from this config.
#[derive(Debug, Clone)]
pub struct EntrezConfig {
    pub email: String,
    pub tool: String,
    pub api_key: Option<String>,
    pub base_url: String,
    /// Maximum number of ids requested from `esearch`
    pub max_candidates: usize,
    /// Custom search term template, see [`GeneQuery::search_term`]
    pub query_template: Option<String>,
    pub timeout: Duration,
}

impl EntrezConfig {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            tool: env!("CARGO_PKG_NAME").to_string(),
            api_key: None,
            base_url: EUTILS_BASE_URL.to_string(),
            max_candidates: DEFAULT_MAX_CANDIDATES,
            query_template: None,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ESearchResponse {
    esearchresult: Option<ESearchResult>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ESearchResult {
    #[serde(default)]
    idlist: Vec<String>,
    #[serde(rename = "ERROR")]
    error: Option<String>,
}

/// Parse the id list out of an `esearch` JSON response
fn parse_esearch_ids(body: &str) -> Result<Vec<String>, RemoteError> {
    let response: ESearchResponse =
        serde_json::from_str(body).map_err(|e| RemoteError::Parse {
            service: SERVICE,
            message: e.to_string(),
        })?;

    if let Some(error) = response.error {
        return Err(RemoteError::Parse {
            service: SERVICE,
            message: error,
        });
    }

    let result = response.esearchresult.ok_or_else(|| RemoteError::Parse {
        service: SERVICE,
        message: "missing esearchresult".to_string(),
    })?;

    if let Some(error) = result.error {
        return Err(RemoteError::Parse {
            service: SERVICE,
            message: error,
        });
    }

    Ok(result.idlist)
}

/// Blocking Entrez client for the nucleotide database
pub struct EntrezClient {
    client: reqwest::blocking::Client,
    config: EntrezConfig,
}

impl EntrezClient {
    /// # Errors
    ///
    /// Returns `RemoteError::Http` if the HTTP client cannot be created.
    pub fn new(config: EntrezConfig) -> Result<Self, RemoteError> {
        Ok(Self {
            client: build_client(config.timeout)?,
            config,
        })
    }

    fn get(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<String, RemoteError> {
        let url = format!("{}/{endpoint}", self.config.base_url);

        let mut request = self
            .client
            .get(&url)
            .query(params)
            .query(&[
                ("email", self.config.email.as_str()),
                ("tool", self.config.tool.as_str()),
            ]);
        if let Some(api_key) = &self.config.api_key {
            request = request.query(&[("api_key", api_key.as_str())]);
        }

        let response = request
            .send()
            .map_err(|source| RemoteError::Http { url, source })?;
        read_body(response, SERVICE)
    }

    /// Search the nucleotide database, returning ids by relevance
    ///
    /// # Errors
    ///
    /// Returns a `RemoteError` if the request fails or the response is malformed.
    pub fn search(&self, term: &str) -> Result<Vec<String>, RemoteError> {
        let retmax = self.config.max_candidates.to_string();
        let body = self.get(
            "esearch.fcgi",
            &[
                ("db", "nucleotide"),
                ("term", term),
                ("sort", "relevance"),
                ("retmax", retmax.as_str()),
                ("retmode", "json"),
            ],
        )?;
        parse_esearch_ids(&body)
    }

    /// Fetch records for the given ids as FASTA
    ///
    /// # Errors
    ///
    /// Returns a `RemoteError` if the request fails or the FASTA is malformed.
    pub fn fetch_fasta(&self, ids: &[String]) -> Result<Vec<SequenceRecord>, RemoteError> {
        let id_list = ids.join(",");
        let body = self.get(
            "efetch.fcgi",
            &[
                ("db", "nucleotide"),
                ("id", id_list.as_str()),
                ("rettype", "fasta"),
                ("retmode", "text"),
            ],
        )?;

        parse_fasta_text(&body).map_err(|e| RemoteError::Parse {
            service: SERVICE,
            message: e.to_string(),
        })
    }
}

impl GeneDatabase for EntrezClient {
    fn fetch_candidates(&self, query: &GeneQuery<'_>) -> Result<Vec<SequenceRecord>, RemoteError> {
        let term = query.search_term(self.config.query_template.as_deref());
        let ids = self.search(&term)?;
        debug!(species = %query.species, %term, hits = ids.len(), "Entrez search");

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        self.fetch_fasta(&ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::test_support::TestServer;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, ResponseTemplate};

    fn species() -> SpeciesName {
        SpeciesName::new("Homo sapiens").unwrap()
    }

    #[test]
    fn test_default_search_term() {
        let species = species();
        let query = GeneQuery {
            species: &species,
            gene: "COI",
            min_length: 500,
            max_length: 2000,
        };

        assert_eq!(
            query.search_term(None),
            "Homo sapiens[Organism] AND COI[All Fields] AND 500:2000[Sequence Length]"
        );
    }

    #[test]
    fn test_templated_search_term() {
        let species = species();
        let query = GeneQuery {
            species: &species,
            gene: "cytb",
            min_length: 0,
            max_length: 1_000_000,
        };
        let template = "{species}[Organism] AND {gene_name}[Gene] AND mitochondrion[Filter] \
                        AND {min_length}:{max_length}[SLEN]";

        assert_eq!(
            query.search_term(Some(template)),
            "Homo sapiens[Organism] AND cytb[Gene] AND mitochondrion[Filter] AND 0:1000000[SLEN]"
        );
    }

    #[test]
    fn test_parse_esearch_ids() {
        let body = r#"{"header":{"type":"esearch","version":"0.3"},
            "esearchresult":{"count":"2","retmax":"2","retstart":"0",
            "idlist":["2549312740","1798253411"]}}"#;

        let ids = parse_esearch_ids(body).unwrap();
        assert_eq!(ids, vec!["2549312740", "1798253411"]);
    }

    #[test]
    fn test_parse_esearch_no_hits() {
        let body = r#"{"esearchresult":{"count":"0","retmax":"0","retstart":"0","idlist":[]}}"#;
        assert!(parse_esearch_ids(body).unwrap().is_empty());
    }

    #[test]
    fn test_parse_esearch_errors() {
        let body = r#"{"error":"API rate limit exceeded","count":"4"}"#;
        assert!(matches!(
            parse_esearch_ids(body),
            Err(RemoteError::Parse { .. })
        ));

        let body = r#"{"esearchresult":{"ERROR":"Invalid query"}}"#;
        assert!(matches!(
            parse_esearch_ids(body),
            Err(RemoteError::Parse { .. })
        ));

        assert!(parse_esearch_ids("<html>").is_err());
    }

    #[test]
    fn test_config_defaults() {
        let config = EntrezConfig::new("someone@example.org");
        assert_eq!(config.base_url, EUTILS_BASE_URL);
        assert_eq!(config.max_candidates, DEFAULT_MAX_CANDIDATES);
        assert_eq!(config.tool, "phylobuilder");
        assert!(config.api_key.is_none());
    }

    fn client_for(server: &TestServer) -> EntrezClient {
        let config = EntrezConfig {
            base_url: server.uri(),
            max_candidates: 3,
            ..EntrezConfig::new("me@example.org")
        };
        EntrezClient::new(config).unwrap()
    }

    fn coi_query(species: &SpeciesName) -> GeneQuery<'_> {
        GeneQuery {
            species,
            gene: "COI",
            min_length: 500,
            max_length: 2000,
        }
    }

    #[test]
    fn test_fetch_candidates_searches_then_fetches() {
        let server = TestServer::start();
        server.mount(
            Mock::given(method("GET"))
                .and(path("/esearch.fcgi"))
                .and(query_param("db", "nucleotide"))
                .and(query_param(
                    "term",
                    "Homo sapiens[Organism] AND COI[All Fields] AND 500:2000[Sequence Length]",
                ))
                .and(query_param("sort", "relevance"))
                .and(query_param("retmax", "3"))
                .and(query_param("retmode", "json"))
                .and(query_param("email", "me@example.org"))
                .and(query_param("tool", "phylobuilder"))
                .respond_with(ResponseTemplate::new(200).set_body_string(
                    r#"{"esearchresult":{"count":"2","idlist":["22","11"]}}"#,
                )),
        );
        server.mount(
            Mock::given(method("GET"))
                .and(path("/efetch.fcgi"))
                .and(query_param("id", "22,11"))
                .and(query_param("rettype", "fasta"))
                .and(query_param("email", "me@example.org"))
                .respond_with(ResponseTemplate::new(200).set_body_string(
                    ">MN22.1 Homo sapiens COI\nACGT\nACGT\n>MN11.1 Homo sapiens isolate 7 COI\nGGCC\n",
                )),
        );

        let species = species();
        let records = client_for(&server)
            .fetch_candidates(&coi_query(&species))
            .unwrap();

        assert_eq!(
            records,
            vec![
                SequenceRecord::new("MN22.1 Homo sapiens COI", "ACGTACGT"),
                SequenceRecord::new("MN11.1 Homo sapiens isolate 7 COI", "GGCC"),
            ]
        );
    }

    #[test]
    fn test_fetch_candidates_without_hits_skips_efetch() {
        let server = TestServer::start();
        server.mount(
            Mock::given(path("/esearch.fcgi")).respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"esearchresult":{"count":"0","idlist":[]}}"#),
            ),
        );
        server.mount(
            Mock::given(path("/efetch.fcgi")).respond_with(ResponseTemplate::new(500)),
        );

        let species = species();
        let records = client_for(&server)
            .fetch_candidates(&coi_query(&species))
            .unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_server_error_is_status_error() {
        let server = TestServer::start();
        server.mount(
            Mock::given(path("/esearch.fcgi"))
                .respond_with(ResponseTemplate::new(500).set_body_string("backend down\n")),
        );

        let species = species();
        let err = client_for(&server)
            .fetch_candidates(&coi_query(&species))
            .unwrap_err();

        match err {
            RemoteError::Status { status, body, .. } => {
                assert_eq!(status, 500);
                assert_eq!(body, "backend down");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_api_key_is_sent() {
        let server = TestServer::start();
        server.mount(
            Mock::given(path("/esearch.fcgi"))
                .and(query_param("api_key", "secret"))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_string(r#"{"esearchresult":{"idlist":["5"]}}"#),
                ),
        );

        let config = EntrezConfig {
            base_url: server.uri(),
            api_key: Some("secret".to_string()),
            ..EntrezConfig::new("me@example.org")
        };
        let ids = EntrezClient::new(config).unwrap().search("x").unwrap();
        assert_eq!(ids, vec!["5"]);
    }
}
