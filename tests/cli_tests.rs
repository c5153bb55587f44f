//! End-to-end tests for the phylobuilder binary.
//!
//! Network calls go to a local mock server, never to NCBI or EMBL-EBI.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;
use wiremock::matchers::{any, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use phylobuilder::parsing::fasta::parse_fasta_file;

fn phylobuilder() -> Command {
    Command::cargo_bin("phylobuilder").expect("binary should build")
}

/// Mock server kept alive on its own runtime while the binary runs
struct TestServer {
    server: MockServer,
    runtime: tokio::runtime::Runtime,
}

impl TestServer {
    fn start() -> Self {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let server = runtime.block_on(MockServer::start());
        Self { server, runtime }
    }

    fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }
}

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_help_lists_subcommands() {
    phylobuilder()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("fetch"))
        .stdout(predicate::str::contains("align"))
        .stdout(predicate::str::contains("concat"));
}

#[test]
fn test_concat_renames_and_joins_in_species_order() {
    let dir = TempDir::new().unwrap();
    let coi = write(
        &dir,
        "coi.fasta",
        ">MN1.1 Homo sapiens COI\nACGT\n>MN2.1 Mus musculus COI\nAC-T\n",
    );
    let cytb = write(
        &dir,
        "cytb.fasta",
        ">XY9.1 Homo sapiens cytb\nGG\n>Mus musculus cytb not found.\n--\n",
    );
    let species = write(&dir, "species.txt", "Homo sapiens\nMus musculus\n");
    let output = dir.path().join("supermatrix.fasta");

    phylobuilder()
        .arg("concat")
        .arg("-f")
        .arg(&coi)
        .arg(&cytb)
        .arg("-s")
        .arg(&species)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 2 species"));

    let records = parse_fasta_file(&output).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].header, "Homo sapiens");
    assert_eq!(records[0].sequence, "ACGTGG");
    assert_eq!(records[1].header, "Mus musculus");
    assert_eq!(records[1].sequence, "AC-T--");
}

#[test]
fn test_concat_json_summary() {
    let dir = TempDir::new().unwrap();
    let gene = write(&dir, "gene.fasta", ">a\nAAA\n>b\nCCC\n");
    let species = write(&dir, "species.txt", "Alpha one\nBeta two\n");
    let output = dir.path().join("out.fasta");

    let assert = phylobuilder()
        .args(["--format", "json", "concat", "-f"])
        .arg(&gene)
        .arg("-s")
        .arg(&species)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let summary: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(summary["species"], 2);
    assert_eq!(summary["columns"], 3);
}

#[test]
fn test_concat_count_mismatch_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let gene = write(&dir, "gene.fasta", ">only one\nACGT\n");
    let species = write(&dir, "species.txt", "Homo sapiens\nMus musculus\n");
    let output = dir.path().join("out.fasta");

    phylobuilder()
        .arg("concat")
        .arg("-f")
        .arg(&gene)
        .arg("-s")
        .arg(&species)
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("gene.fasta"));

    assert!(!output.exists());
}

#[test]
fn test_concat_requires_input_files() {
    let dir = TempDir::new().unwrap();
    let species = write(&dir, "species.txt", "Homo sapiens\n");

    phylobuilder()
        .arg("concat")
        .arg("-s")
        .arg(&species)
        .arg("-o")
        .arg(dir.path().join("out.fasta"))
        .assert()
        .failure();
}

#[test]
fn test_fetch_rejects_invalid_email() {
    let dir = TempDir::new().unwrap();
    let species = write(&dir, "species.txt", "Homo sapiens\n");
    let output = dir.path().join("out.fasta");

    phylobuilder()
        .arg("fetch")
        .arg("-f")
        .arg(&species)
        .args(["-g", "COI", "-e", "not-an-email", "-o"])
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("email"));

    assert!(!output.exists());
}

#[test]
fn test_fetch_rejects_inverted_length_bounds() {
    let dir = TempDir::new().unwrap();
    let species = write(&dir, "species.txt", "Homo sapiens\n");
    let output = dir.path().join("out.fasta");

    phylobuilder()
        .arg("fetch")
        .arg("-f")
        .arg(&species)
        .args(["-g", "COI", "-e", "me@example.org"])
        .args(["--min-length", "2000", "--max-length", "500", "-o"])
        .arg(&output)
        .assert()
        .failure();

    assert!(!output.exists());
}

#[test]
fn test_fetch_rejects_template_without_species() {
    let dir = TempDir::new().unwrap();
    let species = write(&dir, "species.txt", "Homo sapiens\n");

    phylobuilder()
        .arg("fetch")
        .arg("-f")
        .arg(&species)
        .args(["-g", "COI", "-e", "me@example.org"])
        .args(["--query-template", "{gene}[Gene]"])
        .arg("-o")
        .arg(dir.path().join("out.fasta"))
        .assert()
        .failure();
}

#[test]
fn test_fetch_rejects_empty_species_list() {
    let dir = TempDir::new().unwrap();
    let species = write(&dir, "species.txt", "\n   \n");

    phylobuilder()
        .arg("fetch")
        .arg("-f")
        .arg(&species)
        .args(["-g", "COI", "-e", "me@example.org", "-o"])
        .arg(dir.path().join("out.fasta"))
        .assert()
        .failure();
}

#[test]
fn test_align_rejects_single_sequence() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "single.fasta", ">only\nACGT\n");

    phylobuilder()
        .arg("align")
        .arg("-f")
        .arg(&input)
        .args(["-e", "me@example.org"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least two"));
}

#[test]
fn test_align_rejects_non_fasta_input() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "notes.txt", "just some text\n");

    phylobuilder()
        .arg("align")
        .arg("-f")
        .arg(&input)
        .args(["-e", "me@example.org"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a valid FASTA"));
}

#[test]
fn test_align_rejects_unknown_algorithm() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "in.fasta", ">a\nAC\n>b\nAG\n");

    phylobuilder()
        .arg("align")
        .arg("-f")
        .arg(&input)
        .args(["-e", "me@example.org", "-a", "blast"])
        .assert()
        .failure();
}

#[test]
fn test_fetch_network_failure_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let species = write(&dir, "species.txt", "Homo sapiens\nMus musculus\n");
    let output = dir.path().join("output.fasta");
    let manifest = dir.path().join("used_species.txt");

    let server = TestServer::start();
    server.mount(Mock::given(any()).respond_with(ResponseTemplate::new(500)));

    phylobuilder()
        .arg("fetch")
        .arg("-f")
        .arg(&species)
        .args(["-g", "COI", "-e", "me@example.org", "--skip-errors"])
        .arg("--eutils-url")
        .arg(server.server.uri())
        .arg("-o")
        .arg(&output)
        .arg("--manifest")
        .arg(&manifest)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no output was written"));

    assert!(!output.exists());
    assert!(!manifest.exists());
}

#[test]
fn test_fetch_writes_placeholders_and_manifest() {
    let dir = TempDir::new().unwrap();
    let species = write(&dir, "species.txt", "Homo sapiens\nMus musculus\n");
    let output = dir.path().join("output.fasta");
    let manifest = dir.path().join("used_species.txt");

    let server = TestServer::start();
    server.mount(Mock::given(path("/esearch.fcgi")).respond_with(
        ResponseTemplate::new(200).set_body_string(r#"{"esearchresult":{"idlist":["1"]}}"#),
    ));
    server.mount(Mock::given(path("/efetch.fcgi")).respond_with(
        ResponseTemplate::new(200).set_body_string(">MN1.1 Homo sapiens COI\nACGTACGT\n"),
    ));

    phylobuilder()
        .arg("fetch")
        .arg("-f")
        .arg(&species)
        .args(["-g", "COI", "-e", "me@example.org", "--skip-warnings"])
        .arg("--eutils-url")
        .arg(server.server.uri())
        .arg("-o")
        .arg(&output)
        .arg("--manifest")
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains("Unfound species (0)"));

    let records = parse_fasta_file(&output).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].header, "MN1.1 Homo sapiens COI");
    assert_eq!(records[0].sequence, "ACGTACGT");
    assert_eq!(records[1].header, "Mus musculus COI not found.");
    assert!(records[1].sequence.is_empty());

    assert_eq!(fs::read_to_string(&manifest).unwrap(), "Homo sapiens\n");
}

