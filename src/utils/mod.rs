// Small helpers shared by the pipeline and the watch loop.

pub mod ignore_rules;
pub mod paths;

pub use ignore_rules::IgnoreRules;
pub use paths::display_label;

use crate::error::{Result, StyleError};
use std::fs;
use std::path::Path;

/// Blake3 digest of `content`.
pub fn content_hash(content: &[u8]) -> blake3::Hash {
    blake3::hash(content)
}

/// Blake3 digest of the file at `path`.
pub fn file_hash(path: &Path) -> Result<blake3::Hash> {
    let content = fs::read(path).map_err(|e| StyleError::io(path, e))?;
    Ok(content_hash(&content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_hash_tracks_content() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a.tsx");
        let b = temp_dir.path().join("b.tsx");

        fs::write(&a, "same content").unwrap();
        fs::write(&b, "same content").unwrap();
        assert_eq!(file_hash(&a).unwrap(), file_hash(&b).unwrap());

        fs::write(&b, "other content").unwrap();
        assert_ne!(file_hash(&a).unwrap(), file_hash(&b).unwrap());
        assert_eq!(file_hash(&a).unwrap().to_hex().len(), 64);
    }

    #[test]
    fn test_file_hash_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = file_hash(&temp_dir.path().join("gone.tsx")).unwrap_err();
        assert!(matches!(err, StyleError::Io { .. }));
    }
}
