use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::{
    persist::PersistError,
    pick::Pick,
    protocol::{
        editor::{EditError, Outcome, PickEditor, SaveJob, SessionSnapshot},
        event::EditEvent,
    },
    types::{TopName, Uwi},
};

use super::events::PickerEvent;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("event rejected: {0}")]
    Edit(#[from] EditError),
    #[error("persistence: {0}")]
    Persist(#[from] PersistError),
    #[error("runtime channel closed")]
    ChannelClosed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub command_queue_bound: usize,
    pub event_capacity: usize,
    pub save_queue_bound: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            command_queue_bound: 256,
            event_capacity: 1024,
            save_queue_bound: 16,
        }
    }
}

pub struct PickerHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<PickerEvent>,
}

impl Clone for PickerHandle {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
            events_tx: self.events_tx.clone(),
        }
    }
}

enum Command {
    Apply {
        event: EditEvent,
        resp: oneshot::Sender<Result<Outcome, RuntimeError>>,
    },
    Snapshot {
        resp: oneshot::Sender<SessionSnapshot>,
    },
    ForWell {
        uwi: Uwi,
        resp: oneshot::Sender<Vec<Pick>>,
    },
    TopNames {
        resp: oneshot::Sender<Vec<TopName>>,
    },
    Flush {
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
    Shutdown {
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
}

enum PersistMsg {
    Save(SaveJob),
    Flush {
        resp: oneshot::Sender<Result<(), PersistError>>,
    },
    Shutdown {
        resp: oneshot::Sender<()>,
    },
}

/// Spawns the editor loop and its save worker on the current tokio runtime.
///
/// Events are handled one at a time in arrival order; the editor is owned by
/// the loop and never shared.
pub fn spawn_picker(editor: PickEditor, config: RuntimeConfig) -> PickerHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.command_queue_bound);
    let (events_tx, _) = broadcast::channel::<PickerEvent>(config.event_capacity);
    let (persist_tx, persist_rx) = mpsc::channel::<PersistMsg>(config.save_queue_bound);

    spawn_persistence_worker(persist_rx, events_tx.clone());

    let events_tx_loop = events_tx.clone();
    tokio::spawn(async move {
        let mut editor = editor;
        info!(wells = editor.wells().len(), "picker runtime started");

        while let Some(cmd) = cmd_rx.recv().await {
            let done = handle_command(cmd, &mut editor, &events_tx_loop, &persist_tx).await;
            if done {
                break;
            }
        }
        info!("picker runtime stopped");
    });

    PickerHandle { cmd_tx, events_tx }
}

impl PickerHandle {
    pub fn subscribe(&self) -> broadcast::Receiver<PickerEvent> {
        self.events_tx.subscribe()
    }

    /// Applies one UI event. A save request resolves once queued; watch for
    /// [`PickerEvent::Saved`] / [`PickerEvent::SaveFailed`] or call
    /// [`PickerHandle::flush`].
    pub async fn apply(&self, event: EditEvent) -> Result<Outcome, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Apply { event, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Store and selection as of the last handled event.
    pub async fn snapshot(&self) -> Result<SessionSnapshot, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Snapshot { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    pub async fn for_well(&self, uwi: impl Into<Uwi>) -> Result<Vec<Pick>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::ForWell {
                uwi: uwi.into(),
                resp: tx,
            })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    pub async fn top_names(&self) -> Result<Vec<TopName>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::TopNames { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Waits for queued saves; fails if any of them failed since the last flush.
    pub async fn flush(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Flush { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Shutdown { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }
}

async fn handle_command(
    cmd: Command,
    editor: &mut PickEditor,
    events_tx: &broadcast::Sender<PickerEvent>,
    persist_tx: &mpsc::Sender<PersistMsg>,
) -> bool {
    match cmd {
        Command::Apply { event, resp } => {
            let selection_before = editor.selection().clone();
            let res = editor
                .apply(event)
                .map_err(RuntimeError::from)
                .and_then(|outcome| {
                    if let Outcome::SaveQueued(job) = &outcome {
                        enqueue_save(persist_tx, job.clone())?;
                    }
                    if outcome.mutated_store() {
                        let _ = events_tx.send(PickerEvent::PicksChanged {
                            version: editor.store().version(),
                        });
                    }
                    if editor.selection() != &selection_before {
                        let _ = events_tx.send(PickerEvent::SelectionChanged {
                            selection: editor.selection().clone(),
                        });
                    }
                    Ok(outcome)
                });
            let _ = resp.send(res);
        }
        Command::Snapshot { resp } => {
            let _ = resp.send(editor.snapshot());
        }
        Command::ForWell { uwi, resp } => {
            let _ = resp.send(editor.store().for_well(&uwi));
        }
        Command::TopNames { resp } => {
            let _ = resp.send(editor.store().top_names().into_iter().collect());
        }
        Command::Flush { resp } => {
            let (flush_tx, flush_rx) = oneshot::channel();
            let out = if persist_tx
                .send(PersistMsg::Flush { resp: flush_tx })
                .await
                .is_err()
            {
                Err(RuntimeError::ChannelClosed)
            } else {
                flush_rx
                    .await
                    .map_err(|_| RuntimeError::ChannelClosed)
                    .and_then(|r| r.map_err(RuntimeError::from))
            };
            let _ = resp.send(out);
        }
        Command::Shutdown { resp } => {
            let (done_tx, done_rx) = oneshot::channel();
            let out = if persist_tx
                .send(PersistMsg::Shutdown { resp: done_tx })
                .await
                .is_err()
            {
                Err(RuntimeError::ChannelClosed)
            } else {
                done_rx.await.map_err(|_| RuntimeError::ChannelClosed)
            };
            let _ = resp.send(out);
            return true;
        }
    }

    false
}

fn spawn_persistence_worker(
    mut rx: mpsc::Receiver<PersistMsg>,
    events_tx: broadcast::Sender<PickerEvent>,
) {
    tokio::spawn(async move {
        // Failures since the last flush, reported to the next flush caller.
        let mut failed: Vec<String> = Vec::new();

        while let Some(msg) = rx.recv().await {
            match msg {
                PersistMsg::Save(job) => {
                    if let Err(message) = write_job(&job, &events_tx).await {
                        failed.push(message);
                    }
                }
                PersistMsg::Flush { resp } => {
                    let result = if failed.is_empty() {
                        Ok(())
                    } else {
                        Err(PersistError::Message(std::mem::take(&mut failed).join("; ")))
                    };
                    let _ = resp.send(result);
                }
                PersistMsg::Shutdown { resp } => {
                    let _ = resp.send(());
                    break;
                }
            }
        }
    });
}

async fn write_job(job: &SaveJob, events_tx: &broadcast::Sender<PickerEvent>) -> Result<(), String> {
    let to_write = job.clone();
    let result = tokio::task::spawn_blocking(move || to_write.write())
        .await
        .map_err(|e| PersistError::Message(format!("join error: {e}")))
        .and_then(|r| r);

    match result {
        Ok(()) => {
            debug!(path = %job.path.display(), version = job.version, "save complete");
            let _ = events_tx.send(PickerEvent::Saved {
                path: job.path.clone(),
                version: job.version,
                rows: job.rows.len(),
            });
            Ok(())
        }
        Err(err) => {
            let message = format!("{}: {err}", job.path.display());
            warn!(path = %job.path.display(), error = %err, "save failed");
            let _ = events_tx.send(PickerEvent::SaveFailed {
                path: job.path.clone(),
                message: err.to_string(),
            });
            Err(message)
        }
    }
}

fn enqueue_save(tx: &mpsc::Sender<PersistMsg>, job: SaveJob) -> Result<(), RuntimeError> {
    tx.try_send(PersistMsg::Save(job))
        .map_err(|err| RuntimeError::Persist(PersistError::Message(format!("save queue error: {err}"))))
}
