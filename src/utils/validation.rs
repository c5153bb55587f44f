//! Centralized validation of user-supplied options.

/// Upper bound on the ids requested per species from Entrez
pub const MAX_CANDIDATES_LIMIT: usize = 100;

/// Validation error types
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid email address: '{0}'")]
    InvalidEmail(String),
    #[error("Minimum length {min} exceeds maximum length {max}")]
    InvalidLengthBounds { min: usize, max: usize },
    #[error("Query template must contain a {{species}} placeholder")]
    TemplateMissingSpecies,
    #[error("Candidate count must be between 1 and {max}, got {0}", max = MAX_CANDIDATES_LIMIT)]
    InvalidCandidateCount(usize),
}

/// Check that an email address looks deliverable: one `@`, non-empty local part,
/// a dotted domain and no whitespace.
///
/// # Examples
///
/// ```
/// use phylobuilder::utils::validation::validate_email;
///
/// assert!(validate_email("someone@example.org").is_ok());
/// assert!(validate_email("someone").is_err());
/// ```
///
/// # Errors
///
/// Returns `ValidationError::InvalidEmail` if the address is malformed.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::InvalidEmail(email.to_string());

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }

    let labels_ok = domain.split('.').all(|label| !label.is_empty());
    if !domain.contains('.') || !labels_ok {
        return Err(invalid());
    }

    Ok(())
}

/// # Errors
///
/// Returns `ValidationError::InvalidLengthBounds` if `min > max`.
pub fn validate_length_bounds(min: usize, max: usize) -> Result<(), ValidationError> {
    if min > max {
        return Err(ValidationError::InvalidLengthBounds { min, max });
    }
    Ok(())
}

/// A template without `{species}` would send the same search for every species.
///
/// # Errors
///
/// Returns `ValidationError::TemplateMissingSpecies` if the placeholder is absent.
pub fn validate_query_template(template: &str) -> Result<(), ValidationError> {
    if template.contains("{species}") {
        Ok(())
    } else {
        Err(ValidationError::TemplateMissingSpecies)
    }
}

/// # Errors
///
/// Returns `ValidationError::InvalidCandidateCount` outside `1..=MAX_CANDIDATES_LIMIT`.
pub fn validate_candidate_count(count: usize) -> Result<(), ValidationError> {
    if (1..=MAX_CANDIDATES_LIMIT).contains(&count) {
        Ok(())
    } else {
        Err(ValidationError::InvalidCandidateCount(count))
    }
}
