// ABOUTME: Continuous mode: re-runs the deployment when watched source directories change.
// ABOUTME: Runs are awaited one at a time; changes seen during a run coalesce via WatchState.

mod state;

use std::future::Future;
use std::path::{Path, PathBuf};

use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use walkdir::WalkDir;

pub use state::WatchState;

use crate::deploy::{DeployError, DeployReport};
use crate::error::{Error, Result};
use crate::output::Output;

/// What the filesystem event source reports to the loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchMessage {
    /// A qualifying write touched this path.
    Changed(PathBuf),
    /// The event source itself failed. Not fatal.
    SourceError(String),
}

/// Only data writes trigger a run; creates, removes, renames and metadata
/// changes do not.
pub fn is_write(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Any)
    )
}

/// Every directory under each root, the roots included.
pub fn watched_dirs<P: AsRef<Path>>(roots: &[P]) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for root in roots {
        for entry in WalkDir::new(root.as_ref()).sort_by_file_name() {
            let entry = entry.map_err(std::io::Error::from)?;
            if entry.file_type().is_dir() {
                dirs.push(entry.into_path());
            }
        }
    }
    Ok(dirs)
}

/// Keeps the underlying watcher registered for as long as it is held.
pub struct DirectoryWatcher {
    _watcher: RecommendedWatcher,
    dirs: Vec<PathBuf>,
}

impl DirectoryWatcher {
    /// The directories registered at startup.
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }
}

/// Register every directory under `roots` and return the stream of changes.
///
/// Each directory is watched on its own, non-recursively, so directories
/// created later are not picked up.
pub fn start<P: AsRef<Path>>(
    roots: &[P],
) -> Result<(DirectoryWatcher, mpsc::UnboundedReceiver<WatchMessage>)> {
    let (tx, rx) = mpsc::unbounded_channel();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) if is_write(&event.kind) => {
                for path in event.paths {
                    let _ = tx.send(WatchMessage::Changed(path));
                }
            }
            Ok(_) => {}
            Err(e) => {
                let _ = tx.send(WatchMessage::SourceError(e.to_string()));
            }
        },
        notify::Config::default(),
    )
    .map_err(Error::WatcherInit)?;

    let dirs = watched_dirs(roots)?;
    for dir in &dirs {
        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .map_err(|source| Error::Watch {
                path: dir.clone(),
                source,
            })?;
    }
    tracing::debug!(count = dirs.len(), "watching directories");

    Ok((
        DirectoryWatcher {
            _watcher: watcher,
            dirs,
        },
        rx,
    ))
}

/// Consume change messages until the source closes, invoking `run` for
/// qualifying changes.
///
/// `run` is never invoked while a previous invocation is still pending.
/// Messages that arrive during a run are drained afterwards; any number of
/// changes among them produce exactly one follow-up run.
pub async fn drive<F, Fut>(
    mut events: mpsc::UnboundedReceiver<WatchMessage>,
    mut run: F,
    output: &Output,
) where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<DeployReport, DeployError>>,
{
    let mut state = WatchState::Idle;

    while let Some(message) = events.recv().await {
        if !accept(message, &mut state) {
            continue;
        }

        loop {
            report(run().await, output);

            while let Ok(message) = events.try_recv() {
                accept(message, &mut state);
            }
            if !state.on_finished() {
                break;
            }
            tracing::debug!("changes arrived during the last run, deploying again");
        }
    }
}

/// Feed one message into the state machine. Returns `true` if it starts a run.
fn accept(message: WatchMessage, state: &mut WatchState) -> bool {
    match message {
        WatchMessage::Changed(path) => {
            tracing::debug!(path = %path.display(), "change detected");
            state.on_change()
        }
        WatchMessage::SourceError(e) => {
            tracing::warn!("file watcher error: {e}");
            false
        }
    }
}

fn report(result: std::result::Result<DeployReport, DeployError>, output: &Output) {
    match result {
        Ok(report) => output.success(&format!("deployed {}", report.id)),
        Err(e) => output.error(&e.to_string()),
    }
}
