// dx-styles - incremental atomic CSS for TSX component trees
//
// Scans a source tree for `className` values, matches each distinct token
// against a precompiled rule table, writes a stylesheet containing only the
// rules in use, and tags class-bearing elements with generated ids.
// Re-runs on every (debounced) source change.

pub mod config;
pub mod diff;
pub mod error;
pub mod extract;
pub mod ids;
pub mod pipeline;
pub mod report;
pub mod rules;
pub mod stylesheet;
pub mod utils;
pub mod watcher;

pub use config::Config;
pub use error::{Result, StyleError};
pub use pipeline::{run_cycle, CycleReport};
pub use rules::RuleTable;
pub use watcher::WatcherState;
