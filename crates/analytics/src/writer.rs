use crate::event::{AnalyticsEvent, LOG_HEADER};
use crate::{AnalyticsError, Result};
use chrono::Local;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::sync::{mpsc, oneshot};
use tokio::time;

#[derive(Debug, Clone, Copy)]
pub struct AnalyticsConfig {
    /// Events per durable write.
    pub batch_size: usize,
    /// Longest a partial batch may sit in memory before flushing.
    pub flush_timeout: time::Duration,
    /// Queue capacity; overflow drops the newest event with a warning.
    pub queue_capacity: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            flush_timeout: time::Duration::from_secs(1),
            queue_capacity: 1000,
        }
    }
}

enum Command {
    Event(Box<AnalyticsEvent>),
    Shutdown(oneshot::Sender<()>),
}

/// Handle to the analytics log: a non-blocking write path backed by a
/// background drain task, plus file-scan queries (see `stats.rs`) and
/// export/backup copies. Cheap to clone; all clones feed one queue.
#[derive(Clone)]
pub struct Analytics {
    tx: mpsc::Sender<Command>,
    pub(crate) log_path: PathBuf,
    backups_dir: PathBuf,
}

impl Analytics {
    /// Create directories and the header row if needed, then start the
    /// drain task. Failing to prepare the data directory is a startup
    /// error; everything after this point fails soft.
    pub fn start(data_dir: impl AsRef<Path>, config: AnalyticsConfig) -> Result<Analytics> {
        let data_dir = data_dir.as_ref().to_path_buf();
        let log_path = data_dir.join("analytics.csv");
        let backups_dir = data_dir.join("backups");
        std::fs::create_dir_all(&data_dir)?;
        std::fs::create_dir_all(&backups_dir)?;
        ensure_log_file(&log_path)?;

        let (tx, rx) = mpsc::channel(config.queue_capacity.max(1));
        tokio::spawn(drain_loop(rx, log_path.clone(), config));

        Ok(Analytics {
            tx,
            log_path,
            backups_dir,
        })
    }

    /// Enqueue one event and return immediately. A full queue drops the
    /// event with a warning; this path never blocks and never fails the
    /// caller.
    pub fn log_event(&self, event: AnalyticsEvent) {
        match self.tx.try_send(Command::Event(Box::new(event))) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                log::warn!("Analytics queue full, event dropped");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                log::warn!("Analytics writer stopped, event dropped");
            }
        }
    }

    /// Stop the drain task after it has flushed every event already
    /// accepted into the queue.
    pub async fn shutdown(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(Command::Shutdown(ack_tx)).await.is_ok() {
            let _ = ack_rx.await;
        }
    }

    #[must_use]
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Copy the analytics log to a timestamped file; returns the copy's
    /// path. With no destination given, the copy lands in the backups
    /// directory.
    pub fn export(&self, dest: Option<PathBuf>) -> Result<PathBuf> {
        let dest = dest.unwrap_or_else(|| {
            self.backups_dir.join(format!(
                "analytics_export_{}.csv",
                Local::now().format("%Y%m%d_%H%M%S")
            ))
        });
        std::fs::copy(&self.log_path, &dest)?;
        Ok(dest)
    }

    /// Copy an arbitrary backing file (the term catalog, in practice)
    /// into the backups directory with a timestamped name.
    pub fn backup_file(&self, src: impl AsRef<Path>) -> Result<PathBuf> {
        let src = src.as_ref();
        let name = src
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| AnalyticsError::Other(format!("bad backup source: {src:?}")))?;
        let dest = self.backups_dir.join(format!(
            "{name}_backup_{}.csv",
            Local::now().format("%Y%m%d_%H%M%S")
        ));
        std::fs::copy(src, &dest)?;
        Ok(dest)
    }
}

fn ensure_log_file(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::write(path, format!("{LOG_HEADER}\n"))?;
    }
    Ok(())
}

async fn drain_loop(mut rx: mpsc::Receiver<Command>, path: PathBuf, config: AnalyticsConfig) {
    let mut batch: Vec<AnalyticsEvent> = Vec::new();
    loop {
        match time::timeout(config.flush_timeout, rx.recv()).await {
            // Bounded wait expired with a partial batch in memory.
            Err(_) => flush(&path, &mut batch),
            // All senders dropped; flush whatever is left and stop.
            Ok(None) => break,
            Ok(Some(Command::Event(event))) => {
                batch.push(*event);
                if batch.len() >= config.batch_size {
                    flush(&path, &mut batch);
                }
            }
            // Queue order guarantees every event accepted before the
            // stop signal has already been received at this point.
            Ok(Some(Command::Shutdown(ack))) => {
                flush(&path, &mut batch);
                let _ = ack.send(());
                return;
            }
        }
    }
    flush(&path, &mut batch);
}

/// Append a batch to the log. I/O failures are logged and swallowed;
/// they must never propagate back to the user-facing flow.
fn flush(path: &Path, batch: &mut Vec<AnalyticsEvent>) {
    if batch.is_empty() {
        return;
    }
    let mut body = String::new();
    for event in batch.iter() {
        body.push_str(&event.to_row());
        body.push('\n');
    }
    let result = std::fs::OpenOptions::new()
        .append(true)
        .open(path)
        .and_then(|mut file| file.write_all(body.as_bytes()));
    if let Err(e) = result {
        log::error!("Failed to append {} analytics events: {e}", batch.len());
    }
    batch.clear();
}
