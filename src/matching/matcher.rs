//! Strategies for deciding whether a FASTA header names a given species.

/// Decides whether a candidate header confirms the identity of a species
pub trait HeaderMatcher {
    fn matches(&self, candidate_header: &str, species_name: &str) -> bool;
}

/// Case-insensitive containment of the species name in the header.
///
/// Both strings are split on whitespace and re-joined with single spaces before
/// comparing, so genus and species must both appear, adjacent and in order,
/// regardless of the spacing or case used by either side.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContainsMatcher;

impl HeaderMatcher for ContainsMatcher {
    fn matches(&self, candidate_header: &str, species_name: &str) -> bool {
        let species = normalize(species_name);
        if species.is_empty() {
            return false;
        }
        normalize(candidate_header).contains(&species)
    }
}

/// Every species token must equal a whole header token.
///
/// Stricter than [`ContainsMatcher`]: `Homo sapiens` does not match a header
/// reading `Homo sapiensis`. Punctuation at either end of a header token is
/// ignored so `(Homo sapiens)` still matches.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenMatcher;

impl HeaderMatcher for TokenMatcher {
    fn matches(&self, candidate_header: &str, species_name: &str) -> bool {
        let header_tokens: Vec<String> = candidate_header
            .split_whitespace()
            .map(|token| {
                token
                    .trim_matches(|c: char| !c.is_alphanumeric())
                    .to_lowercase()
            })
            .collect();

        let mut species_tokens = species_name.split_whitespace().peekable();
        if species_tokens.peek().is_none() {
            return false;
        }

        species_tokens.all(|token| {
            let token = token.to_lowercase();
            header_tokens.iter().any(|h| *h == token)
        })
    }
}

/// Matcher selection exposed on the command line
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum MatcherKind {
    /// Species name appears in the header (case-insensitive)
    #[default]
    Contains,
    /// Every word of the species name is a word of the header
    Tokens,
}

impl MatcherKind {
    #[must_use]
    pub fn build(self) -> Box<dyn HeaderMatcher> {
        match self {
            Self::Contains => Box::new(ContainsMatcher),
            Self::Tokens => Box::new(TokenMatcher),
        }
    }
}

fn normalize(s: &str) -> String {
    s.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
