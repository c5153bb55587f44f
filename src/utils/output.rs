//! Output file helpers.
//!
//! Files are written to a temporary file next to their destination and renamed
//! into place only once fully written, so a failed run leaves no partial output.

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::core::types::{Algorithm, SpeciesName};

/// Write a file atomically through `write`.
///
/// # Errors
///
/// Returns the error of `write`, or an IO error if the temporary file cannot be
/// created or moved into place. The destination is untouched on error.
pub fn write_atomic<F, E>(path: &Path, write: F) -> Result<(), E>
where
    F: FnOnce(&mut dyn Write) -> Result<(), E>,
    E: From<std::io::Error>,
{
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        write(&mut writer)?;
        writer.flush()?;
    }

    // Temp files are created owner-only; outputs get the usual permissions
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(temp.path(), std::fs::Permissions::from_mode(0o644))?;
    }

    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Write species names, one per line
///
/// # Errors
///
/// Returns an IO error if the file cannot be written.
pub fn write_species_list(path: &Path, species: &[SpeciesName]) -> std::io::Result<()> {
    write_atomic(path, |w| {
        for name in species {
            writeln!(w, "{name}")?;
        }
        Ok(())
    })
}

/// Default output name for an alignment: `<input stem>_<algorithm>.fasta` in
/// the current directory.
#[must_use]
pub fn alignment_output_path(input: &Path, algorithm: Algorithm) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    PathBuf::from(format!("{stem}_{algorithm}.fasta"))
}
