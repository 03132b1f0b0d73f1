//! One generation cycle
//!
//! A cycle always re-scans the whole source tree, whatever triggered it:
//!
//! 1. load and verify the rule table
//! 2. read and scan every source file (sorted path order)
//! 3. reserve existing ids, then inject new ones and rewrite changed files
//! 4. build the stylesheet from the sorted class set and write it if changed
//! 5. diff against the previous cycle (only when a trigger is given)
//!
//! Per-file problems are logged and skipped. A cycle that can't load its
//! rule table fails as a whole and leaves [`WatcherState`] untouched.

use crate::config::{Config, ScannerKind};
use crate::diff::{diff, Delta, SortedSet};
use crate::error::{Result, StyleError};
use crate::extract::{tokenize, FileAttributes, Scanner};
use crate::ids::{inject_ids, is_generated_identifier, IdRegistry};
use crate::rules::RuleTable;
use crate::stylesheet::{build_stylesheet, write_if_changed};
use crate::utils::{content_hash, IgnoreRules};
use crate::watcher::WatcherState;
use ignore::WalkBuilder;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Class and generated-id sets observed by one cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub classes: SortedSet,
    pub ids: SortedSet,
}

/// What a cycle did, for the console summary and `build --json`.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    /// Label of the file whose change started the cycle
    pub trigger: Option<String>,
    pub output: PathBuf,
    pub files_scanned: usize,
    pub files_skipped: usize,
    pub files_rewritten: usize,
    pub ids_injected: usize,
    pub classes: usize,
    pub ids: usize,
    pub rules_matched: usize,
    pub rules_unmatched: usize,
    pub stylesheet_written: bool,
    /// Present only for triggered cycles
    pub class_delta: Option<Delta>,
    pub id_delta: Option<Delta>,
    pub elapsed_ms: f64,
}

struct SourceFile {
    path: PathBuf,
    content: String,
    attributes: FileAttributes,
}

/// Run one full generation cycle.
///
/// `trigger` is the label of the changed file, `None` for the initial run,
/// which reports no diff.
pub fn run_cycle(
    config: &Config,
    state: &mut WatcherState,
    trigger: Option<&str>,
) -> Result<CycleReport> {
    let start = Instant::now();

    let table = RuleTable::load(&config.rules)?;

    let mut scanner = open_scanner(config.scanner)?;
    let paths = collect_sources(config);

    let mut files = Vec::with_capacity(paths.len());
    let mut files_skipped = 0;
    for path in paths {
        match read_and_scan(&mut scanner, &path) {
            Ok(file) => files.push(file),
            Err(e) => {
                warn!("Skipping {:?}: {}", path, e);
                files_skipped += 1;
            }
        }
    }

    let mut registry = IdRegistry::new();
    if config.seed_existing_ids {
        for file in &files {
            for id in file.attributes.id_values(&file.content) {
                registry.reserve(id);
            }
        }
        debug!("Reserved {} existing ids", registry.len());
    }

    let mut class_tokens: Vec<&str> = Vec::new();
    let mut generated: Vec<String> = Vec::new();
    let mut known_hashes = HashMap::with_capacity(files.len());
    let mut files_rewritten = 0;
    let mut ids_injected = 0;

    for file in &files {
        for attr in &file.attributes.classes {
            class_tokens.extend(tokenize(attr.value.text(&file.content)));
        }
        generated.extend(
            file.attributes
                .id_values(&file.content)
                .filter(|id| is_generated_identifier(id))
                .map(str::to_string),
        );

        let mut hash = content_hash(file.content.as_bytes());
        if config.inject_ids {
            let injection = inject_ids(&file.content, &file.attributes, &mut registry);
            if injection.changed() {
                match fs::write(&file.path, &injection.content) {
                    Ok(()) => {
                        debug!("Injected {:?} into {:?}", injection.injected, file.path);
                        files_rewritten += 1;
                        ids_injected += injection.injected.len();
                        hash = content_hash(injection.content.as_bytes());
                        generated.extend(injection.injected);
                    }
                    Err(e) => warn!("Failed to rewrite {:?}: {}", file.path, e),
                }
            }
        }

        // The watcher compares against this to ignore our own rewrite
        known_hashes.insert(file.path.clone(), hash);
    }

    let snapshot = Snapshot {
        classes: class_tokens.into_iter().collect(),
        ids: generated.into_iter().collect(),
    };

    let sheet = build_stylesheet(
        &snapshot.classes,
        &table,
        config.emit_id_selectors.then_some(&snapshot.ids),
    );
    let stylesheet_written = match write_if_changed(&config.output, &sheet.css) {
        Ok(written) => written,
        Err(e) => {
            error!("Failed to write stylesheet: {}", e);
            false
        }
    };

    let (class_delta, id_delta) = match trigger {
        Some(_) => {
            let previous = state.previous.take().unwrap_or_default();
            (
                Some(diff(&previous.classes, &snapshot.classes)),
                Some(diff(&previous.ids, &snapshot.ids)),
            )
        }
        None => (None, None),
    };

    let report = CycleReport {
        trigger: trigger.map(str::to_string),
        output: config.output.clone(),
        files_scanned: files.len(),
        files_skipped,
        files_rewritten,
        ids_injected,
        classes: snapshot.classes.len(),
        ids: snapshot.ids.len(),
        rules_matched: sheet.matched,
        rules_unmatched: sheet.unmatched,
        stylesheet_written,
        class_delta,
        id_delta,
        elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
    };

    state.previous = Some(snapshot);
    state.known_hashes = known_hashes;

    info!(
        "Cycle done: {} files, {} classes, {} ids in {:.2}ms",
        report.files_scanned, report.classes, report.ids, report.elapsed_ms
    );
    Ok(report)
}

fn open_scanner(kind: ScannerKind) -> Result<Scanner> {
    match Scanner::new(kind) {
        Ok(scanner) => Ok(scanner),
        Err(StyleError::Language(e)) => {
            warn!("TSX grammar unavailable ({}), using regex scanner", e);
            Scanner::new(ScannerKind::Regex)
        }
        Err(e) => Err(e),
    }
}

/// Every source file under `config.source_dir`, honouring nested
/// `.gitignore` files and skipping hidden entries and the default ignores,
/// in sorted path order.
pub fn collect_sources(config: &Config) -> Vec<PathBuf> {
    if !config.source_dir.is_dir() {
        warn!("Source directory {:?} not found", config.source_dir);
        return Vec::new();
    }

    // Canonical paths, so they line up with the ones watch events carry
    let root = config
        .source_dir
        .canonicalize()
        .unwrap_or_else(|_| config.source_dir.clone());

    // Same filters the watch loop applies through `IgnoreRules::is_ignored`
    let rules = IgnoreRules::new(&root);
    let mut paths: Vec<PathBuf> = WalkBuilder::new(&root)
        .hidden(true)
        .git_ignore(true)
        .require_git(false)
        .parents(false)
        .ignore(false)
        .git_global(false)
        .git_exclude(false)
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            !rules.is_default_ignored(entry.path(), is_dir)
        })
        .sort_by_file_path(|a, b| a.cmp(b))
        .build()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Walk error: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
        .map(|entry| entry.into_path())
        .filter(|path| config.is_source_file(path))
        .collect();

    paths.sort();
    paths
}

fn read_and_scan(scanner: &mut Scanner, path: &Path) -> Result<SourceFile> {
    let content = fs::read_to_string(path).map_err(|e| StyleError::io(path, e))?;
    let attributes = scanner.scan(path, &content)?;
    Ok(SourceFile {
        path: path.to_path_buf(),
        content,
        attributes,
    })
}
