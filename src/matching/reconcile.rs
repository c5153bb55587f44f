use serde::Serialize;
use tracing::{debug, warn};

use crate::core::record::SequenceRecord;
use crate::core::types::{MatchOutcome, SpeciesName};
use crate::matching::matcher::{ContainsMatcher, HeaderMatcher};

/// Default inclusive length bounds, matching the NCBI query defaults
pub const DEFAULT_MIN_LENGTH: usize = 0;
pub const DEFAULT_MAX_LENGTH: usize = 1_000_000;

/// Configuration for reconciling fetched records against the species list
#[derive(Debug, Clone)]
pub struct ReconcileConfig {
    /// Minimum sequence length (inclusive)
    pub min_length: usize,
    /// Maximum sequence length (inclusive)
    pub max_length: usize,
    /// Drop species without a usable record instead of writing a placeholder
    pub skip_errors: bool,
    /// Treat records whose header does not name the species as missing
    pub skip_warnings: bool,
    /// Text placed between the species name and "not found." in placeholder
    /// headers, usually the gene name
    pub placeholder_label: Option<String>,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_LENGTH,
            max_length: DEFAULT_MAX_LENGTH,
            skip_errors: false,
            skip_warnings: false,
            placeholder_label: None,
        }
    }
}

impl ReconcileConfig {
    fn accepts_length(&self, length: usize) -> bool {
        (self.min_length..=self.max_length).contains(&length)
    }

    /// Header used for a species whose slot has no usable record
    #[must_use]
    pub fn placeholder_header(&self, species: &SpeciesName) -> String {
        match &self.placeholder_label {
            Some(label) => format!("{species} {label} not found."),
            None => species.to_string(),
        }
    }
}

/// One slot of the output FASTA
#[derive(Debug, Clone, Serialize)]
pub struct OutputEntry {
    pub species: SpeciesName,
    /// `None` when the slot is held by a placeholder
    pub record: Option<SequenceRecord>,
    pub outcome: MatchOutcome,
}

impl OutputEntry {
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.record.is_none()
    }
}

/// How one input species was resolved, independent of what was emitted
#[derive(Debug, Clone, Serialize)]
pub struct SpeciesOutcome {
    pub species: SpeciesName,
    pub outcome: MatchOutcome,
    /// Accession of the selected record, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accession: Option<String>,
}

/// Result of a reconciliation run
#[derive(Debug, Clone, Serialize)]
pub struct ReconciliationReport {
    /// Output slots in input order, after applying the skip policy
    pub entries: Vec<OutputEntry>,
    /// Outcome for every input species, in input order
    pub outcomes: Vec<SpeciesOutcome>,
    /// Species whose outcome is `Matched`, in input order
    pub matched: Vec<SpeciesName>,
    /// Species left out of the output by `skip_errors`
    pub skipped: Vec<SpeciesName>,
    /// Warnings for records emitted despite a header mismatch
    pub warnings: Vec<String>,
    #[serde(skip)]
    config: ReconcileConfig,
}

impl ReconciliationReport {
    /// Records to write, with placeholders materialized for empty slots
    #[must_use]
    pub fn records(&self) -> Vec<SequenceRecord> {
        self.entries
            .iter()
            .map(|entry| match &entry.record {
                Some(record) => record.clone(),
                None => SequenceRecord::placeholder(self.config.placeholder_header(&entry.species)),
            })
            .collect()
    }

    /// Species to write to the manifest, present only when a skip flag was set
    #[must_use]
    pub fn manifest(&self) -> Option<&[SpeciesName]> {
        if self.config.skip_errors || self.config.skip_warnings {
            Some(&self.matched)
        } else {
            None
        }
    }

    /// Number of input species with the given outcome
    #[must_use]
    pub fn count(&self, outcome: MatchOutcome) -> usize {
        self.outcomes.iter().filter(|o| o.outcome == outcome).count()
    }

    /// Input species without any usable record
    pub fn not_found(&self) -> impl Iterator<Item = &SpeciesName> {
        self.outcomes
            .iter()
            .filter(|o| o.outcome == MatchOutcome::NotFound)
            .map(|o| &o.species)
    }
}

/// Reconciles records fetched per species into an ordered FASTA output
pub struct SequenceReconciler {
    config: ReconcileConfig,
    matcher: Box<dyn HeaderMatcher>,
}

impl SequenceReconciler {
    /// Create a reconciler using case-insensitive containment matching
    pub fn new(config: ReconcileConfig) -> Self {
        Self {
            config,
            matcher: Box::new(ContainsMatcher),
        }
    }

    /// Replace the header matching strategy
    #[must_use]
    pub fn with_matcher(mut self, matcher: Box<dyn HeaderMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    /// Select a record for one species from its candidates.
    ///
    /// Candidates outside the length bounds are discarded. The first survivor
    /// whose header names the species is `Matched`; otherwise the first survivor
    /// is returned tentatively as a `NameMismatch`.
    pub fn classify(
        &self,
        species: &SpeciesName,
        candidates: Vec<SequenceRecord>,
    ) -> (MatchOutcome, Option<SequenceRecord>) {
        let mut survivors: Vec<SequenceRecord> = candidates
            .into_iter()
            .filter(|c| self.config.accepts_length(c.len()))
            .collect();

        if survivors.is_empty() {
            return (MatchOutcome::NotFound, None);
        }

        if let Some(pos) = survivors
            .iter()
            .position(|c| self.matcher.matches(&c.header, species.as_str()))
        {
            return (MatchOutcome::Matched, Some(survivors.swap_remove(pos)));
        }

        (MatchOutcome::NameMismatch, Some(survivors.swap_remove(0)))
    }

    /// Fetch and reconcile every species in order.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `fetch`; no report is built in that case.
    pub fn reconcile<F, E>(
        &self,
        species_list: &[SpeciesName],
        mut fetch: F,
    ) -> Result<ReconciliationReport, E>
    where
        F: FnMut(&SpeciesName) -> Result<Vec<SequenceRecord>, E>,
    {
        let mut entries = Vec::with_capacity(species_list.len());
        let mut outcomes = Vec::with_capacity(species_list.len());
        let mut matched = Vec::new();
        let mut skipped = Vec::new();
        let mut warnings = Vec::new();

        for species in species_list {
            let candidates = fetch(species)?;
            let candidate_count = candidates.len();
            let (outcome, record) = self.classify(species, candidates);

            debug!(%species, candidate_count, %outcome, "Reconciled species");

            outcomes.push(SpeciesOutcome {
                species: species.clone(),
                outcome,
                accession: record.as_ref().map(|r| r.accession().to_string()),
            });

            let emitted = match outcome {
                MatchOutcome::Matched => {
                    matched.push(species.clone());
                    record
                }
                MatchOutcome::NameMismatch if !self.config.skip_warnings => {
                    let message = format!(
                        "WARNING: Full/Same name for {species} not found in fasta header, check it manually!"
                    );
                    warn!("{message}");
                    warnings.push(message);
                    record
                }
                MatchOutcome::NameMismatch => {
                    warn!(%species, "Discarding record whose header does not name the species");
                    None
                }
                MatchOutcome::NotFound => {
                    warn!(%species, "No sequence found within length bounds");
                    None
                }
            };

            if emitted.is_none() && self.config.skip_errors {
                skipped.push(species.clone());
                continue;
            }

            entries.push(OutputEntry {
                species: species.clone(),
                record: emitted,
                outcome,
            });
        }

        // Every species keeps its slot unless skipping was requested
        assert!(
            self.config.skip_errors || entries.len() == species_list.len(),
            "output has {} entries for {} species",
            entries.len(),
            species_list.len()
        );
        assert_eq!(entries.len() + skipped.len(), species_list.len());

        Ok(ReconciliationReport {
            entries,
            outcomes,
            matched,
            skipped,
            warnings,
            config: self.config.clone(),
        })
    }
}

/// Reconcile with the default matcher.
///
/// # Errors
///
/// Returns the first error produced by `fetch`.
pub fn reconcile<F, E>(
    species_list: &[SpeciesName],
    fetch: F,
    config: ReconcileConfig,
) -> Result<ReconciliationReport, E>
where
    F: FnMut(&SpeciesName) -> Result<Vec<SequenceRecord>, E>,
{
    SequenceReconciler::new(config).reconcile(species_list, fetch)
}
