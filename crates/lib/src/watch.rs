//! Block until something changes in a set of directories.
//!
//! Every target gets its own listener. [`DirectoryWatch::wait`] races them
//! and returns the first event any of them sees; all listeners are torn down
//! as soon as it returns. There is no debouncing and no timeout.
//!
//! # Targets
//!
//! A trailing `/...` marks a target recursive, so `src/...` watches the whole
//! `src` tree while `src` only watches its direct entries.

use std::fmt;
use std::path::{Path, PathBuf};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info};

const RECURSIVE_SUFFIX: &str = "...";

#[derive(Debug, Error)]
pub enum WatchError {
  #[error("one or more watch directories must be specified")]
  NoTargets,

  #[error("failed to watch {}: {source}", path.display())]
  Register {
    path: PathBuf,
    #[source]
    source: notify::Error,
  },

  #[error("watch on {} failed: {source}", path.display())]
  Backend {
    path: PathBuf,
    #[source]
    source: notify::Error,
  },

  #[error("watch ended without an event")]
  Closed,
}

/// A directory to watch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchTarget {
  pub path: PathBuf,
  pub recursive: bool,
}

impl WatchTarget {
  /// Parse a command line argument such as `web/...`.
  pub fn parse(arg: &str) -> Self {
    let stripped = arg
      .strip_suffix(RECURSIVE_SUFFIX)
      .filter(|rest| rest.is_empty() || rest.ends_with('/') || rest.ends_with('\\'));

    match stripped {
      Some("") => Self {
        path: PathBuf::from("."),
        recursive: true,
      },
      Some(rest) => {
        // Keep the separator when it is all there is (`/...` is the root).
        let dir = &rest[..rest.len() - 1];
        Self {
          path: PathBuf::from(if dir.is_empty() { rest } else { dir }),
          recursive: true,
        }
      }
      None => Self {
        path: PathBuf::from(arg),
        recursive: false,
      },
    }
  }

  fn mode(&self) -> RecursiveMode {
    if self.recursive {
      RecursiveMode::Recursive
    } else {
      RecursiveMode::NonRecursive
    }
  }
}

/// The event that ended a wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
  pub kind: EventKind,
  pub paths: Vec<PathBuf>,
}

impl From<Event> for WatchEvent {
  fn from(event: Event) -> Self {
    Self {
      kind: event.kind,
      paths: event.paths,
    }
  }
}

impl fmt::Display for WatchEvent {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:?}", self.kind)?;
    for path in &self.paths {
      write!(f, " {}", path.display())?;
    }
    Ok(())
  }
}

struct Listener {
  path: PathBuf,
  // Dropping the watcher removes the OS watch.
  watcher: RecommendedWatcher,
  events: mpsc::Receiver<notify::Result<Event>>,
}

/// Registered listeners, one per target.
pub struct DirectoryWatch {
  listeners: Vec<Listener>,
}

impl DirectoryWatch {
  /// Register a listener for every target.
  ///
  /// Fails without waiting if `targets` is empty or any registration fails.
  /// Events that happen after this returns are not lost, even if
  /// [`wait`](Self::wait) is called later.
  pub fn register(targets: &[WatchTarget]) -> Result<Self, WatchError> {
    if targets.is_empty() {
      return Err(WatchError::NoTargets);
    }

    let mut listeners = Vec::with_capacity(targets.len());
    for target in targets {
      listeners.push(Self::listen(target)?);
    }
    Ok(Self { listeners })
  }

  fn listen(target: &WatchTarget) -> Result<Listener, WatchError> {
    let register_err = |source| WatchError::Register {
      path: target.path.clone(),
      source,
    };

    // Only the first event matters, so a full slot just drops the rest.
    let (tx, rx) = mpsc::channel(1);
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
      if let Ok(event) = &res
        && event.kind.is_access()
      {
        return;
      }
      let _ = tx.try_send(res);
    })
    .map_err(register_err)?;
    watcher.watch(&target.path, target.mode()).map_err(register_err)?;

    debug!(path = %target.path.display(), recursive = target.recursive, "watching");
    Ok(Listener {
      path: target.path.clone(),
      watcher,
      events: rx,
    })
  }

  /// Paths being watched, in registration order.
  pub fn paths(&self) -> impl Iterator<Item = &Path> {
    self.listeners.iter().map(|l| l.path.as_path())
  }

  /// Wait for the first event from any listener.
  pub async fn wait(self) -> Result<WatchEvent, WatchError> {
    let (done_tx, mut done_rx) = mpsc::channel(1);
    let mut tasks = JoinSet::new();

    for listener in self.listeners {
      let done_tx = done_tx.clone();
      tasks.spawn(async move {
        let Listener {
          path,
          watcher,
          mut events,
        } = listener;
        let result = match events.recv().await {
          Some(Ok(event)) => Ok(WatchEvent::from(event)),
          Some(Err(source)) => Err(WatchError::Backend { path, source }),
          None => Err(WatchError::Closed),
        };
        // Losers of the race find the slot taken and give up.
        let _ = done_tx.try_send(result);
        drop(watcher);
      });
    }
    drop(done_tx);

    let result = done_rx.recv().await.unwrap_or(Err(WatchError::Closed));
    tasks.abort_all();

    if let Ok(event) = &result {
      info!(%event, "event");
    }
    result
  }
}
