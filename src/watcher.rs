//! Debounced watching of the env file.
//!
//! The parent directory is watched rather than the file itself, so the watch
//! survives editors that replace the file on save and can start before the
//! file exists. Events for other files in the directory are dropped.

use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{new_debouncer, DebouncedEvent, Debouncer};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;

use crate::error::{GenError, GenResult};

/// A settled change to the watched file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// The file was written, created or replaced.
    Changed(PathBuf),
    /// The file no longer exists.
    Removed(PathBuf),
    Error(String),
}

impl WatchEvent {
    pub fn path(&self) -> Option<&Path> {
        match self {
            WatchEvent::Changed(p) | WatchEvent::Removed(p) => Some(p),
            WatchEvent::Error(_) => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            WatchEvent::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

pub struct FileWatcher {
    file: PathBuf,
    debounce: Duration,
}

impl FileWatcher {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            debounce: Duration::from_millis(crate::config::DEFAULT_DEBOUNCE_MS),
        }
    }

    /// Wait this long after the last write before firing.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Directory that is actually registered with the OS watcher.
    pub fn watch_root(&self) -> PathBuf {
        match self.file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Start watching.
    ///
    /// The returned debouncer must be kept alive for events to keep arriving.
    pub fn watch(&self) -> GenResult<(Debouncer<RecommendedWatcher>, Receiver<WatchEvent>)> {
        let (tx, rx) = channel::<WatchEvent>();
        let file_name = self
            .file
            .file_name()
            .map(|name| name.to_os_string())
            .ok_or_else(|| {
                GenError::Watch(format!("{} is not a file path", self.file.display()))
            })?;

        let mut debouncer = new_debouncer(
            self.debounce,
            move |result: Result<Vec<DebouncedEvent>, notify::Error>| match result {
                Ok(events) => {
                    let paths = events.into_iter().map(|event| event.path);
                    if let Some(event) = settle(&file_name, paths) {
                        let _ = tx.send(event);
                    }
                }
                Err(e) => {
                    let _ = tx.send(WatchEvent::Error(e.to_string()));
                }
            },
        )?;

        let root = self.watch_root();
        debouncer
            .watcher()
            .watch(&root, RecursiveMode::NonRecursive)?;
        log::debug!(
            "Watching {} for changes to {}",
            root.display(),
            self.file.display()
        );

        Ok((debouncer, rx))
    }
}

/// Collapse one debounce batch into at most one event for `file_name`.
fn settle(
    file_name: &OsString,
    paths: impl IntoIterator<Item = PathBuf>,
) -> Option<WatchEvent> {
    let path = paths
        .into_iter()
        .find(|path| path.file_name() == Some(file_name.as_os_str()))?;

    if path.exists() {
        Some(WatchEvent::Changed(path))
    } else {
        Some(WatchEvent::Removed(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use tempfile::TempDir;

    /// Wait for the first event about `.env` matching `wanted`.
    fn next_env_event(
        rx: &Receiver<WatchEvent>,
        wanted: fn(&WatchEvent) -> bool,
    ) -> Option<WatchEvent> {
        let deadline = Instant::now() + Duration::from_secs(10);
        while let Some(left) = deadline.checked_duration_since(Instant::now()) {
            let event = rx.recv_timeout(left).ok()?;
            let is_env = event
                .path()
                .and_then(|p| p.file_name())
                .is_some_and(|name| name == ".env");
            if is_env && wanted(&event) {
                return Some(event);
            }
        }
        None
    }

    #[test]
    fn test_watch_event_path() {
        let path = PathBuf::from("/project/.env");

        let changed = WatchEvent::Changed(path.clone());
        assert_eq!(changed.path(), Some(path.as_path()));

        let removed = WatchEvent::Removed(path.clone());
        assert_eq!(removed.path(), Some(path.as_path()));

        let error = WatchEvent::Error("test error".to_string());
        assert_eq!(error.path(), None);
        assert_eq!(error.error_message(), Some("test error"));
    }

    #[test]
    fn test_watch_root() {
        assert_eq!(FileWatcher::new(".env").watch_root(), PathBuf::from("."));
        assert_eq!(
            FileWatcher::new("config/.env.local").watch_root(),
            PathBuf::from("config")
        );
    }

    #[test]
    fn test_with_debounce() {
        let watcher = FileWatcher::new(".env").with_debounce(Duration::from_millis(1000));
        assert_eq!(watcher.debounce, Duration::from_millis(1000));
        assert_eq!(watcher.file(), Path::new(".env"));
    }

    #[test]
    fn test_settle_filters_other_files() {
        let dir = TempDir::new().unwrap();
        let env = dir.path().join(".env");
        std::fs::write(&env, "A=1").unwrap();

        let name = OsString::from(".env");
        assert_eq!(settle(&name, vec![dir.path().join("config.ts")]), None);
        assert_eq!(
            settle(
                &name,
                vec![dir.path().join("config.ts"), env.clone()]
            ),
            Some(WatchEvent::Changed(env.clone()))
        );

        std::fs::remove_file(&env).unwrap();
        assert_eq!(
            settle(&name, vec![env.clone()]),
            Some(WatchEvent::Removed(env))
        );
    }

    #[test]
    fn test_watch_reports_changes_and_removal() {
        let dir = TempDir::new().unwrap();
        let env = dir.path().join(".env");
        let watcher = FileWatcher::new(&env).with_debounce(Duration::from_millis(100));
        let (_debouncer, rx) = watcher.watch().unwrap();

        std::fs::write(dir.path().join("config.ts"), "// generated").unwrap();
        std::fs::write(&env, "A=1").unwrap();

        let changed = next_env_event(&rx, |e| matches!(e, WatchEvent::Changed(_)));
        assert!(changed.is_some(), "no change event for .env");

        std::thread::sleep(Duration::from_millis(300));
        for event in rx.try_iter() {
            assert_ne!(
                event.path().and_then(|p| p.file_name()),
                Some(std::ffi::OsStr::new("config.ts"))
            );
        }

        std::fs::remove_file(&env).unwrap();
        let removed = next_env_event(&rx, |e| matches!(e, WatchEvent::Removed(_)));
        assert!(removed.is_some(), "no removal event for .env");
    }
}
