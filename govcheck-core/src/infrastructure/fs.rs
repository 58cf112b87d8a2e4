// govcheck-core/src/infrastructure/fs.rs

use crate::infrastructure::error::InfrastructureError;
use std::io::Write;
use std::path::Path;

/// Reads a whole file, keeping the path in the error.
pub fn read_file(path: &Path) -> Result<String, InfrastructureError> {
    std::fs::read_to_string(path).map_err(|source| InfrastructureError::Read {
        path: path.display().to_string(),
        source,
    })
}

/// Write content to a file atomically using a temporary file.
///
/// The temporary file lives in the target directory so that the final
/// rename never crosses filesystems: readers see either the old content or
/// the new one, never a partial report or config.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
    temp_file.write_all(content.as_ref())?;
    temp_file
        .persist(path)
        .map_err(|e| InfrastructureError::Io(e.error))?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write_overwrites_existing() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("report.json");

        atomic_write(&file_path, "{}")?;
        atomic_write(&file_path, r#"{"success": true}"#)?;

        assert_eq!(fs::read_to_string(&file_path)?, r#"{"success": true}"#);
        assert_eq!(fs::read_dir(dir.path())?.count(), 1);
        Ok(())
    }

    #[test]
    fn test_read_file_reports_path() -> Result<()> {
        let dir = tempdir()?;
        let missing = dir.path().join("manifest.json");
        let err = read_file(&missing).unwrap_err();
        assert!(err.to_string().contains("manifest.json"));
        Ok(())
    }
}
