use std::path::Path;

use thiserror::Error;

use crate::core::types::SpeciesName;

#[derive(Error, Debug)]
pub enum SpeciesListError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No species names found in {0}")]
    Empty(String),
}

/// Read a species list file: one species per line, blank lines ignored.
///
/// # Errors
///
/// Returns `SpeciesListError::Io` if the file cannot be read, or
/// `SpeciesListError::Empty` if it contains no species.
pub fn read_species_file(path: &Path) -> Result<Vec<SpeciesName>, SpeciesListError> {
    let content = std::fs::read_to_string(path)?;
    let species = parse_species_text(&content);

    if species.is_empty() {
        return Err(SpeciesListError::Empty(path.display().to_string()));
    }

    Ok(species)
}

/// Parse newline-separated species names, keeping their order.
///
/// Lines are trimmed; blank lines and a leading UTF-8 byte order mark are dropped.
#[must_use]
pub fn parse_species_text(text: &str) -> Vec<SpeciesName> {
    text.trim_start_matches('\u{feff}')
        .lines()
        .filter_map(SpeciesName::new)
        .collect()
}
