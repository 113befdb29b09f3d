//! Document loading from the filesystem.
//!
//! Walks a directory recursively and collects text documents for ingestion.

use crate::error::{Result, SvarError};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A source document read from disk.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// Stable source ID: path relative to the ingestion root.
    pub source_id: String,
    /// Title derived from the file stem.
    pub title: String,
    /// Full text content.
    pub content: String,
    /// Absolute path on disk.
    pub path: PathBuf,
}

/// Recursively collect document files under `root` matching `extensions`.
///
/// Files that cannot be read as UTF-8 are skipped with a warning. Results
/// are sorted by path for deterministic ingestion order.
pub fn load_directory(root: &Path, extensions: &[String]) -> Result<Vec<SourceDocument>> {
    if !root.is_dir() {
        return Err(SvarError::Loader(format!(
            "Not a directory: {}",
            root.display()
        )));
    }

    let mut paths = Vec::new();
    collect_files(root, extensions, &mut paths)?;
    paths.sort();

    let mut documents = Vec::new();
    for path in paths {
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let source_id = path
                    .strip_prefix(root)
                    .unwrap_or(&path)
                    .to_string_lossy()
                    .to_string();
                let title = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_else(|| source_id.clone());

                debug!("Loaded {} ({} chars)", source_id, content.len());
                documents.push(SourceDocument {
                    source_id,
                    title,
                    content,
                    path,
                });
            }
            Err(e) => {
                warn!("Skipping unreadable file {}: {}", path.display(), e);
            }
        }
    }

    Ok(documents)
}

fn collect_files(dir: &Path, extensions: &[String], out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            collect_files(&path, extensions, out)?;
        } else if path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
        {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exts() -> Vec<String> {
        vec!["txt".to_string(), "md".to_string()]
    }

    #[test]
    fn test_load_directory_recursive() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "alpha").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub").join("b.md"), "beta").unwrap();
        std::fs::write(dir.path().join("skip.bin"), "binary").unwrap();

        let docs = load_directory(dir.path(), &exts()).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].source_id, "a.txt");
        assert_eq!(docs[0].title, "a");
        assert_eq!(docs[0].content, "alpha");
        assert!(docs[1].source_id.ends_with("b.md"));
    }

    #[test]
    fn test_load_directory_rejects_file_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.txt");
        std::fs::write(&file, "alpha").unwrap();

        assert!(load_directory(&file, &exts()).is_err());
    }
}
