//! Ignore rules shared by the tree walk and the watch loop
//!
//! Both sides apply the same filters, so an event for a file the walk would
//! skip never starts a cycle:
//!
//! - hidden entries (any path component starting with `.`)
//! - `.gitignore` files anywhere under the root, deepest match first
//! - [`DEFAULT_IGNORES`]

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use ignore::Match;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Dependency and VCS directories skipped even without a `.gitignore`.
pub const DEFAULT_IGNORES: &[&str] = &[".git/", "node_modules/", "dist/"];

#[derive(Debug, Clone)]
pub struct IgnoreRules {
    root: PathBuf,
    defaults: Option<Gitignore>,
}

impl IgnoreRules {
    pub fn new(root: &Path) -> Self {
        let mut builder = GitignoreBuilder::new(root);
        for line in DEFAULT_IGNORES {
            if let Err(e) = builder.add_line(None, line) {
                warn!("Bad default ignore {:?}: {:?}", line, e);
            }
        }

        let defaults = match builder.build() {
            Ok(gi) => Some(gi),
            Err(e) => {
                warn!("Failed to build default ignore matcher: {:?}", e);
                None
            }
        };

        Self {
            root: root.to_path_buf(),
            defaults,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether `path` falls under one of [`DEFAULT_IGNORES`]. The tree walk
    /// applies this as an entry filter; it handles the rest itself.
    pub fn is_default_ignored(&self, path: &Path, is_dir: bool) -> bool {
        let Ok(rel_path) = path.strip_prefix(&self.root) else {
            return false;
        };
        if rel_path.as_os_str().is_empty() {
            return false;
        }
        self.defaults.as_ref().is_some_and(|gi| {
            gi.matched_path_or_any_parents(rel_path, is_dir)
                .is_ignore()
        })
    }

    /// Whether the tree walk would skip `path`. Paths outside the root are
    /// always ignored.
    pub fn is_ignored(&self, path: &Path) -> bool {
        let Ok(rel_path) = path.strip_prefix(&self.root) else {
            return true;
        };

        let hidden = rel_path.components().any(|c| {
            c.as_os_str()
                .to_str()
                .is_some_and(|name| name.starts_with('.'))
        });
        if hidden {
            return true;
        }

        let is_dir = path.is_dir();
        if self.is_default_ignored(path, is_dir) {
            return true;
        }

        for dir in path.ancestors().skip(1) {
            if !dir.starts_with(&self.root) {
                break;
            }
            let Some(gi) = dir_gitignore(dir) else {
                continue;
            };
            let Ok(rel) = path.strip_prefix(dir) else {
                continue;
            };
            match gi.matched_path_or_any_parents(rel, is_dir) {
                Match::Ignore(_) => return true,
                Match::Whitelist(_) => return false,
                Match::None => {}
            }
        }

        false
    }
}

fn dir_gitignore(dir: &Path) -> Option<Gitignore> {
    let path = dir.join(".gitignore");
    if !path.is_file() {
        return None;
    }
    let (gi, err) = Gitignore::new(&path);
    if let Some(e) = err {
        warn!("Failed to parse {:?}: {:?}", path, e);
    }
    Some(gi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_root_gitignore_patterns() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join(".gitignore"), "generated/\n*.stories.tsx\n").unwrap();
        fs::create_dir(root.join("generated")).unwrap();
        fs::write(root.join("generated/Icons.tsx"), "").unwrap();
        fs::write(root.join("Button.stories.tsx"), "").unwrap();
        fs::write(root.join("Button.tsx"), "").unwrap();

        let rules = IgnoreRules::new(root);

        assert!(rules.is_ignored(&root.join("generated/Icons.tsx")));
        assert!(rules.is_ignored(&root.join("Button.stories.tsx")));
        assert!(!rules.is_ignored(&root.join("Button.tsx")));
    }

    #[test]
    fn test_nested_gitignore_and_whitelist() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join(".gitignore"), "*.gen.tsx\n").unwrap();
        fs::create_dir_all(root.join("ui/icons")).unwrap();
        fs::write(root.join("ui/.gitignore"), "Draft.tsx\n!Keep.gen.tsx\n").unwrap();

        let rules = IgnoreRules::new(root);

        assert!(rules.is_ignored(&root.join("ui/Draft.tsx")));
        assert!(rules.is_ignored(&root.join("ui/icons/Draft.tsx")));
        assert!(!rules.is_ignored(&root.join("Draft.tsx")));
        assert!(rules.is_ignored(&root.join("ui/Other.gen.tsx")));
        assert!(!rules.is_ignored(&root.join("ui/Keep.gen.tsx")));
    }

    #[test]
    fn test_hidden_default_and_outside_paths() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let rules = IgnoreRules::new(root);

        assert!(rules.is_ignored(&root.join(".cache/App.tsx")));
        assert!(rules.is_ignored(&root.join(".App.tsx")));
        assert!(rules.is_ignored(Path::new("/elsewhere/App.tsx")));
        assert!(rules.is_ignored(&root.join("node_modules/x/App.tsx")));
        assert!(!rules.is_ignored(&root.join("App.tsx")));

        assert!(rules.is_default_ignored(&root.join("dist"), true));
        assert!(!rules.is_default_ignored(root, true));
    }
}
