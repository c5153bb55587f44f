use serde::{Deserialize, Serialize};

/// A species name as listed in the input species file.
///
/// Always trimmed and never empty. The position of a species in its list is
/// the canonical position for every downstream output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeciesName(String);

impl SpeciesName {
    /// Build a species name from a line of text, returning `None` for blank input.
    pub fn new(s: impl AsRef<str>) -> Option<Self> {
        let trimmed = s.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SpeciesName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SpeciesName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of reconciling a queried species against the records returned for it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    /// A length-compatible record whose header confirms the species
    Matched,
    /// Length-compatible records exist, but no header names the species
    NameMismatch,
    /// No record satisfies the length bounds
    NotFound,
}

impl std::fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Matched => write!(f, "matched"),
            Self::NameMismatch => write!(f, "name mismatch"),
            Self::NotFound => write!(f, "not found"),
        }
    }
}

/// Alignment programs offered by the EMBL-EBI job dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum Algorithm {
    #[default]
    Clustalo,
    Mafft,
    Muscle,
    Tcoffee,
    EmbossCons,
    Kalign,
}

impl Algorithm {
    /// Tool name used in EBI service URLs and output file names
    #[must_use]
    pub fn tool_name(self) -> &'static str {
        match self {
            Self::Clustalo => "clustalo",
            Self::Mafft => "mafft",
            Self::Muscle => "muscle",
            Self::Tcoffee => "tcoffee",
            Self::EmbossCons => "emboss_cons",
            Self::Kalign => "kalign",
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tool_name())
    }
}
