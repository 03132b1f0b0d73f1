// Path labels for console output
//
// Reports name files relative to the watched root with `/` separators,
// whatever the platform, so the summary line stays short and stable.

use std::path::{Path, MAIN_SEPARATOR};

/// Relative Unix-style label for `path` under `root`.
///
/// Canonicalizes both sides first so symlinked roots (`/var` vs
/// `/private/var` on macOS) still strip; falls back to the path as given
/// when it isn't under `root`.
pub fn display_label(path: &Path, root: &Path) -> String {
    let (path_to_use, root_to_use) = match (path.canonicalize(), root.canonicalize()) {
        (Ok(p), Ok(r)) => (p, r),
        _ => (path.to_path_buf(), root.to_path_buf()),
    };

    let relative = path_to_use
        .strip_prefix(&root_to_use)
        .map(Path::to_path_buf)
        .unwrap_or(path_to_use);

    let label = relative.to_string_lossy();
    if MAIN_SEPARATOR == '\\' {
        label.replace('\\', "/")
    } else {
        label.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_label_is_relative() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("components")).unwrap();
        fs::write(root.join("components/Card.tsx"), "").unwrap();

        assert_eq!(
            display_label(&root.join("components/Card.tsx"), root),
            "components/Card.tsx"
        );
    }

    #[test]
    fn test_missing_path_outside_root_is_kept() {
        let label = display_label(Path::new("/elsewhere/App.tsx"), Path::new("/project/src"));
        assert!(label.ends_with("App.tsx"));
    }
}
