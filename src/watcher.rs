//! Debounced watch loop.
//!
//! A single thread owns everything: it receives `notify` events over a
//! channel, feeds them to a [`Debouncer`], and runs a generation cycle when
//! the debounce window expires. Events that arrive while a cycle runs wait
//! in the channel, so at most one cycle is ever in flight.
//!
//! Change detection is hash based: an event for a file whose blake3 digest
//! matches the one recorded by the last cycle is dropped. That covers editor
//! touch-saves as well as the id injector's own rewrites. Ignore handling
//! is shared with the tree walk ([`IgnoreRules`]), so files the walk skips
//! never trigger a cycle.

use crate::config::Config;
use crate::error::{Result, StyleError};
use crate::pipeline::{run_cycle, CycleReport, Snapshot};
use crate::report::print_summary;
use crate::utils::{display_label, file_hash, IgnoreRules};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, RecvTimeoutError};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Upper bound on a blocking receive while nothing is pending.
const IDLE_POLL: Duration = Duration::from_millis(500);

/// Where the debounce coordinator is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    /// A change is pending; only the most recent path is kept
    Armed { path: PathBuf, deadline: Instant },
    /// A cycle is executing
    Running,
}

/// Coalesces bursts of change events into one trigger.
///
/// Pure state machine: callers pass in the current time, which keeps it
/// testable without sleeping.
#[derive(Debug, Clone)]
pub struct Debouncer {
    state: DebounceState,
    window: Duration,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            state: DebounceState::Idle,
            window,
        }
    }

    pub fn state(&self) -> &DebounceState {
        &self.state
    }

    /// Record a change to `path`. Arms the timer from Idle and restarts it
    /// (replacing the pending path) when already armed.
    pub fn on_change(&mut self, path: PathBuf, now: Instant) {
        match self.state {
            DebounceState::Running => {
                debug!("Change to {:?} while a cycle runs, ignored", path);
            }
            DebounceState::Idle | DebounceState::Armed { .. } => {
                self.state = DebounceState::Armed {
                    path,
                    deadline: now + self.window,
                };
            }
        }
    }

    /// How long until the pending trigger fires; `None` when nothing is armed.
    pub fn time_until_fire(&self, now: Instant) -> Option<Duration> {
        match &self.state {
            DebounceState::Armed { deadline, .. } => Some(deadline.saturating_duration_since(now)),
            _ => None,
        }
    }

    /// If the window has expired, move to Running and hand back the trigger
    /// path.
    pub fn poll(&mut self, now: Instant) -> Option<PathBuf> {
        let expired = matches!(
            &self.state,
            DebounceState::Armed { deadline, .. } if now >= *deadline
        );
        if !expired {
            return None;
        }
        match std::mem::replace(&mut self.state, DebounceState::Running) {
            DebounceState::Armed { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Cycle finished (successfully or not).
    pub fn finish(&mut self) {
        if self.state == DebounceState::Running {
            self.state = DebounceState::Idle;
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(Config::default().debounce())
    }
}

/// Everything that survives from one cycle to the next. Owned by the loop
/// driver and passed by reference into every cycle.
#[derive(Debug, Default)]
pub struct WatcherState {
    /// Sets from the last successful cycle, for diffing
    pub previous: Option<Snapshot>,
    /// Content digest of every source file as the last cycle left it
    pub known_hashes: HashMap<PathBuf, blake3::Hash>,
    pub debounce: Debouncer,
}

impl WatcherState {
    pub fn new(config: &Config) -> Self {
        Self {
            debounce: Debouncer::new(config.debounce()),
            ..Self::default()
        }
    }

    /// Whether an event for `path` reflects new content. Deleted and
    /// unreadable files always count.
    pub fn is_content_change(&self, path: &Path) -> bool {
        let Some(known) = self.known_hashes.get(path) else {
            return true;
        };
        match file_hash(path) {
            Ok(hash) => hash != *known,
            Err(e) => {
                debug!("Treating {:?} as changed: {}", path, e);
                true
            }
        }
    }
}

fn is_relevant_kind(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}

impl WatcherState {
    /// Feed one filesystem event to the debouncer. Paths the tree walk would
    /// skip and files whose content is unchanged are dropped. Returns whether
    /// any path armed (or re-armed) the trigger.
    pub fn on_event(
        &mut self,
        config: &Config,
        rules: &IgnoreRules,
        event: &Event,
        now: Instant,
    ) -> bool {
        if !is_relevant_kind(&event.kind) {
            return false;
        }

        let mut armed = false;
        for path in &event.paths {
            if path.is_dir() || !config.is_source_file(path) || rules.is_ignored(path) {
                continue;
            }
            if !self.is_content_change(path) {
                debug!("Content unchanged: {:?}", path);
                continue;
            }
            self.debounce.on_change(path.clone(), now);
            armed = true;
        }
        armed
    }

    /// Run a cycle if the debounce window has expired. The debouncer is back
    /// to Idle afterwards whether or not the cycle succeeded.
    pub fn tick(
        &mut self,
        config: &Config,
        rules: &IgnoreRules,
        now: Instant,
    ) -> Option<(String, Result<CycleReport>)> {
        let path = self.debounce.poll(now)?;
        let label = display_label(&path, rules.root());
        let result = run_cycle(config, self, Some(&label));
        self.debounce.finish();
        Some((label, result))
    }
}

/// Run the initial cycle (fatal on failure), then watch until the event
/// channel closes. Later cycle failures are logged and the loop keeps going.
pub fn watch(config: &Config, state: &mut WatcherState) -> Result<()> {
    let initial = run_cycle(config, state, None)?;
    print_summary(&initial);

    // Events carry absolute paths; compare against the canonical root
    let root = config
        .source_dir
        .canonicalize()
        .map_err(|e| StyleError::io(&config.source_dir, e))?;
    let rules = IgnoreRules::new(&root);

    let (event_tx, event_rx) = channel::<notify::Result<Event>>();
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            let _ = event_tx.send(res);
        },
        notify::Config::default(),
    )?;
    watcher.watch(&root, RecursiveMode::Recursive)?;
    info!(
        "Watching {:?} ({} files tracked, {}ms debounce)",
        root,
        state.known_hashes.len(),
        config.debounce_ms
    );

    loop {
        let timeout = state
            .debounce
            .time_until_fire(Instant::now())
            .unwrap_or(IDLE_POLL);

        match event_rx.recv_timeout(timeout) {
            Ok(Ok(event)) => {
                state.on_event(config, &rules, &event, Instant::now());
            }
            Ok(Err(e)) => {
                warn!("Watch error: {:?}", e);
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        match state.tick(config, &rules, Instant::now()) {
            Some((_, Ok(report))) => print_summary(&report),
            Some((label, Err(e))) => error!("Cycle for {} failed: {}", label, e),
            None => {}
        }
    }

    info!("Watcher channel closed, stopping");
    Ok(())
}
