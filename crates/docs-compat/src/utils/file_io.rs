use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Read a source document to a string
pub fn read_document(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
}

/// Replace a document's contents.
///
/// The new text is written to a temporary file next to `path` and renamed
/// over it, so a file watcher never observes a half-written page.
pub fn replace_document(path: &Path, content: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in: {}", dir.display()))?;
    tmp.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write file: {}", path.display()))?;
    tmp.persist(path)
        .with_context(|| format!("Failed to replace file: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.md");
        fs::write(&path, "old").unwrap();

        replace_document(&path, "new").unwrap();
        assert_eq!(read_document(&path).unwrap(), "new");
        // Only the page itself remains; the temp file was renamed over it.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_read_missing_document() {
        let err = read_document(Path::new("no-such-page.md")).unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }
}
