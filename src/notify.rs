//! Fire-and-forget notifications about scan outcomes.
//!
//! A [`Manager`] is built by the caller and owns its senders; there is no
//! global registry. [`Manager::dispatch`] hands the notification to one
//! worker thread per enabled sender. Delivery is at most once with no retry,
//! and failures are logged, never returned.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::config::NotificationsConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: Level,
    pub title: String,
    pub body: String,
}

/// A notification channel.
pub trait Sender: Send + Sync {
    fn name(&self) -> &str;
    fn is_enabled(&self, level: Level) -> bool;
    fn send(&self, notification: &Notification) -> Result<()>;
}

#[derive(Clone, Default)]
pub struct Manager {
    senders: Vec<Arc<dyn Sender>>,
}

impl Manager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Senders described by the `[notifications]` config section.
    pub fn from_config(config: &NotificationsConfig) -> Self {
        let mut manager = Self::new();
        if config.log {
            manager.add(Arc::new(LogSender::new(config.min_level)));
        }
        if let Some(path) = &config.file {
            manager.add(Arc::new(FileSender::new(path.clone(), config.min_level)));
        }
        manager
    }

    pub fn add(&mut self, sender: Arc<dyn Sender>) {
        self.senders.push(sender);
    }

    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }

    /// Start delivering `notification` to every sender enabled for its level.
    pub fn dispatch(&self, notification: Notification) -> Dispatch {
        let notification = Arc::new(notification);
        let mut handles = Vec::new();

        for sender in self.senders.iter().filter(|s| s.is_enabled(notification.level)) {
            let (tx, rx) = mpsc::channel::<Arc<Notification>>();
            let worker = Arc::clone(sender);
            let spawned = thread::Builder::new()
                .name(format!("notify-{}", sender.name()))
                .spawn(move || {
                    for n in rx {
                        if let Err(e) = worker.send(&n) {
                            warn!(sender = worker.name(), error = %e, "notification delivery failed");
                        }
                    }
                });
            match spawned {
                Ok(handle) => {
                    // The worker owns the receiver; a failed send means it already exited.
                    let _ = tx.send(Arc::clone(&notification));
                    handles.push(handle);
                }
                Err(e) => warn!(sender = sender.name(), error = %e, "cannot start notification worker"),
            }
        }

        Dispatch { handles }
    }
}

/// In-flight deliveries started by [`Manager::dispatch`].
#[must_use = "dropping a Dispatch detaches its deliveries"]
pub struct Dispatch {
    handles: Vec<JoinHandle<()>>,
}

impl Dispatch {
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Block until every delivery has finished.
    pub fn wait(self) {
        for handle in self.handles {
            if handle.join().is_err() {
                warn!("notification sender panicked");
            }
        }
    }
}

/// Emits notifications as tracing events.
pub struct LogSender {
    min_level: Level,
}

impl LogSender {
    pub fn new(min_level: Level) -> Self {
        Self { min_level }
    }
}

impl Sender for LogSender {
    fn name(&self) -> &str {
        "log"
    }

    fn is_enabled(&self, level: Level) -> bool {
        level >= self.min_level
    }

    fn send(&self, n: &Notification) -> Result<()> {
        match n.level {
            Level::Info => info!(title = %n.title, "{}", n.body),
            Level::Warn => warn!(title = %n.title, "{}", n.body),
            Level::Error => error!(title = %n.title, "{}", n.body),
        }
        Ok(())
    }
}

/// Appends notifications to a file, one JSON object per line.
pub struct FileSender {
    path: PathBuf,
    min_level: Level,
}

impl FileSender {
    pub fn new(path: PathBuf, min_level: Level) -> Self {
        Self { path, min_level }
    }
}

impl Sender for FileSender {
    fn name(&self) -> &str {
        "file"
    }

    fn is_enabled(&self, level: Level) -> bool {
        level >= self.min_level
    }

    fn send(&self, n: &Notification) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", serde_json::to_string(n)?)?;
        Ok(())
    }
}
