//! Log sync engine.
//!
//! The engine is the only writer of the in-memory log. It runs as a single
//! task draining a command queue, so operations never interleave:
//! - Optimistic apply, publish, then the remote call (bounded by a timeout)
//! - On failure, the optimistic change is reverted and the error returned
//! - After an append, a full reload assigns the new row its position
//! - After a delete, a reload is scheduled because later rows have moved
//!
//! Observers read immutable [`LogSnapshot`]s from a watch channel.

use crate::config::EngineConfig;
use crate::error::{StoreError, StoreResult, SyncError, SyncResult};
use crate::store::RemoteLogStore;

use gymlog_model::aggregate::compute_set_number;
use gymlog_model::{
    Clock, Entry, EntryId, EntryPatch, Menu, ProvisionalId, RawRow, RemoteId, SetDraft,
};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

/// Read-only view of the engine state.
#[derive(Clone, Debug, Default)]
pub struct LogSnapshot {
    /// Newest first.
    pub entries: Arc<[Entry]>,
    pub menu: Arc<Menu>,
    /// Remote writes in flight.
    pub pending_writes: usize,
    /// Whether at least one load has succeeded.
    pub loaded: bool,
}

/// Result of a successful append.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AppendOutcome {
    /// Placeholder the entry carried until the reload.
    pub provisional: ProvisionalId,
    /// Row the entry was found at after the reload. `None` if that reload
    /// failed; the entry stays provisional until the next successful load.
    pub persisted: Option<RemoteId>,
    pub set_number: u32,
}

/// Commands accepted by the engine task.
#[derive(Debug)]
pub enum EngineCommand {
    Load {
        reply: oneshot::Sender<SyncResult<()>>,
    },
    Append {
        draft: SetDraft,
        reply: oneshot::Sender<SyncResult<AppendOutcome>>,
    },
    Update {
        id: EntryId,
        patch: EntryPatch,
        reply: oneshot::Sender<SyncResult<Entry>>,
    },
    Delete {
        id: EntryId,
        reply: oneshot::Sender<SyncResult<()>>,
    },
    /// Follow-up reload queued by a delete.
    ScheduledReload,
    Shutdown,
}

/// Handle for sending commands to the engine.
#[derive(Clone)]
pub struct LogHandle {
    command_tx: mpsc::Sender<EngineCommand>,
    state_rx: watch::Receiver<LogSnapshot>,
}

impl LogHandle {
    pub async fn load(&self) -> SyncResult<()> {
        self.request(|reply| EngineCommand::Load { reply }).await
    }

    pub async fn append(&self, draft: SetDraft) -> SyncResult<AppendOutcome> {
        self.request(|reply| EngineCommand::Append { draft, reply })
            .await
    }

    pub async fn update(&self, id: EntryId, patch: EntryPatch) -> SyncResult<Entry> {
        self.request(|reply| EngineCommand::Update { id, patch, reply })
            .await
    }

    pub async fn delete(&self, id: EntryId) -> SyncResult<()> {
        self.request(|reply| EngineCommand::Delete { id, reply })
            .await
    }

    pub async fn shutdown(&self) -> SyncResult<()> {
        self.command_tx
            .send(EngineCommand::Shutdown)
            .await
            .map_err(|_| SyncError::ChannelClosed)
    }

    /// Latest published state.
    pub fn snapshot(&self) -> LogSnapshot {
        self.state_rx.borrow().clone()
    }

    /// Receiver that wakes on every published state.
    pub fn subscribe(&self) -> watch::Receiver<LogSnapshot> {
        self.state_rx.clone()
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<SyncResult<T>>) -> EngineCommand,
    ) -> SyncResult<T> {
        let (reply, rx) = oneshot::channel();
        self.command_tx
            .send(command(reply))
            .await
            .map_err(|_| SyncError::ChannelClosed)?;
        rx.await.map_err(|_| SyncError::ChannelClosed)?
    }
}

/// Creates the engine and its command handle.
///
/// The engine does nothing until [`SyncEngine::run`] is spawned; its methods
/// can also be awaited directly when the caller owns it.
pub fn create_sync_engine(
    store: Arc<dyn RemoteLogStore>,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
) -> (LogHandle, SyncEngine) {
    let (command_tx, command_rx) = mpsc::channel(config.command_buffer.max(1));
    let (state_tx, state_rx) = watch::channel(LogSnapshot::default());

    let engine = SyncEngine {
        store,
        clock,
        config,
        log: Vec::new(),
        menu: None,
        pending_writes: 0,
        deleted_since_load: Vec::new(),
        state_tx,
        command_rx,
        reload_tx: command_tx.downgrade(),
    };
    let handle = LogHandle {
        command_tx,
        state_rx,
    };

    (handle, engine)
}

/// Owner of the in-memory log.
pub struct SyncEngine {
    store: Arc<dyn RemoteLogStore>,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
    /// Newest first.
    log: Vec<Entry>,
    /// Taken from the first successful load and kept for the session.
    menu: Option<Arc<Menu>>,
    pending_writes: usize,
    /// Rows removed since the last load. Any id past one of these no longer
    /// names the row it was read from.
    deleted_since_load: Vec<RemoteId>,
    state_tx: watch::Sender<LogSnapshot>,
    command_rx: mpsc::Receiver<EngineCommand>,
    /// Weak so a pending reload never keeps a stopped engine alive.
    reload_tx: mpsc::WeakSender<EngineCommand>,
}

impl SyncEngine {
    /// Runs the command loop until shutdown or until every handle is dropped.
    pub async fn run(mut self) {
        info!("log sync engine started");

        while let Some(command) = self.command_rx.recv().await {
            match command {
                EngineCommand::Load { reply } => {
                    let _ = reply.send(self.load().await);
                }
                EngineCommand::Append { draft, reply } => {
                    let _ = reply.send(self.append(draft).await);
                }
                EngineCommand::Update { id, patch, reply } => {
                    let _ = reply.send(self.update(id, patch).await);
                }
                EngineCommand::Delete { id, reply } => {
                    let _ = reply.send(self.delete(id).await);
                }
                EngineCommand::ScheduledReload => {
                    if let Err(e) = self.load().await {
                        warn!("reload after delete failed: {e}");
                    }
                }
                EngineCommand::Shutdown => {
                    info!("log sync engine stopping");
                    break;
                }
            }
        }

        info!("log sync engine stopped");
    }

    pub fn entries(&self) -> &[Entry] {
        &self.log
    }

    pub fn menu(&self) -> Option<&Menu> {
        self.menu.as_deref()
    }

    pub fn subscribe(&self) -> watch::Receiver<LogSnapshot> {
        self.state_tx.subscribe()
    }

    /// Replaces the log with a fresh remote snapshot.
    ///
    /// Either every row decodes and the log is swapped in one step, or the
    /// log is left exactly as it was.
    pub async fn load(&mut self) -> SyncResult<()> {
        let snapshot = self.remote("list", self.store.list_all()).await?;
        let entries = decode_rows(&snapshot.rows)?;

        debug!("loaded {} rows from remote log", entries.len());
        self.log = entries;
        if self.menu.is_none() {
            self.menu = Some(Arc::new(snapshot.menu));
        }
        self.deleted_since_load.clear();
        self.publish();
        Ok(())
    }

    /// Records a new set optimistically, then appends it remotely.
    pub async fn append(&mut self, draft: SetDraft) -> SyncResult<AppendOutcome> {
        let set = draft.validate()?;

        let timestamp = self.clock.now_timestamp();
        let day = self.clock.local_date(timestamp);
        let set_number =
            compute_set_number(&self.log, &set.exercise_name, day, self.clock.as_ref());
        let provisional = ProvisionalId::new();

        let entry = Entry {
            id: EntryId::Provisional(provisional),
            timestamp,
            exercise_name: set.exercise_name,
            set_number,
            load: set.load,
            reps: set.reps,
            effort: set.effort,
            rest_seconds: set.rest_seconds,
            note: set.note,
        };
        let row = RawRow::from(&entry);

        self.log.insert(0, entry.clone());
        self.pending_writes += 1;
        self.publish();
        debug!(
            "appending {} set {} as {provisional}",
            entry.exercise_name, entry.set_number
        );

        let result = self.remote("append", self.store.append(&row)).await;
        self.pending_writes -= 1;

        if let Err(e) = result {
            self.log
                .retain(|logged| logged.id != EntryId::Provisional(provisional));
            self.publish();
            warn!("append of {} failed, reverted: {e}", entry.exercise_name);
            return Err(e.into());
        }

        let persisted = match self.load().await {
            Ok(()) => self.locate(&entry),
            Err(e) => {
                warn!("reload after append failed, {provisional} stays provisional: {e}");
                self.publish();
                None
            }
        };
        info!(
            "logged {} set {set_number}{}",
            entry.exercise_name,
            persisted.map(|id| format!(" at {id}")).unwrap_or_default()
        );

        Ok(AppendOutcome {
            provisional,
            persisted,
            set_number,
        })
    }

    /// Patches a saved entry and writes its full row back.
    pub async fn update(&mut self, id: EntryId, patch: EntryPatch) -> SyncResult<Entry> {
        let (remote_id, index) = self.resolve(id)?;
        patch.validate()?;

        let previous = self.log[index].clone();
        let mut patched = previous.clone();
        patched.apply(&patch);
        let row = RawRow::from(&patched);

        self.log[index] = patched.clone();
        self.pending_writes += 1;
        self.publish();

        let result = self.remote("update", self.store.update(remote_id, &row)).await;
        self.pending_writes -= 1;

        match result {
            Ok(()) => {
                self.publish();
                debug!("updated row {remote_id}");
                Ok(patched)
            }
            Err(e) => {
                // Single writer: nothing else touched the log while we waited.
                self.log[index] = previous;
                self.publish();
                warn!("update of row {remote_id} failed, reverted: {e}");
                Err(e.into())
            }
        }
    }

    /// Removes a saved entry and deletes its row.
    pub async fn delete(&mut self, id: EntryId) -> SyncResult<()> {
        let (remote_id, index) = self.resolve(id)?;

        let removed = self.log.remove(index);
        self.pending_writes += 1;
        self.publish();

        let result = self.remote("delete", self.store.delete(remote_id)).await;
        self.pending_writes -= 1;

        match result {
            Ok(()) => {
                self.deleted_since_load.push(remote_id);
                self.publish();
                self.schedule_reload();
                info!("deleted row {remote_id}");
                Ok(())
            }
            Err(e) => {
                self.log.insert(index, removed);
                self.publish();
                warn!("delete of row {remote_id} failed, restored: {e}");
                Err(e.into())
            }
        }
    }

    /// Checks that `id` names a saved row that has not moved, and finds it.
    fn resolve(&self, id: EntryId) -> SyncResult<(RemoteId, usize)> {
        let remote_id = match id {
            EntryId::Provisional(p) => return Err(SyncError::NotYetPersisted(p)),
            EntryId::Remote(r) => r,
        };
        if self
            .deleted_since_load
            .iter()
            .any(|&deleted| remote_id.shifted_by(deleted))
        {
            return Err(SyncError::StaleId(remote_id));
        }
        let index = self
            .log
            .iter()
            .position(|e| e.id == id)
            .ok_or(SyncError::NotFound(id))?;
        Ok((remote_id, index))
    }

    /// Finds the row a just-appended entry landed on.
    fn locate(&self, appended: &Entry) -> Option<RemoteId> {
        self.log
            .iter()
            .find(|e| {
                e.timestamp == appended.timestamp
                    && e.exercise_name == appended.exercise_name
                    && e.set_number == appended.set_number
            })
            .and_then(|e| e.id.remote())
    }

    fn schedule_reload(&self) {
        let reload_tx = self.reload_tx.clone();
        let delay = self.config.reload_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(tx) = reload_tx.upgrade() {
                let _ = tx.send(EngineCommand::ScheduledReload).await;
            }
        });
    }

    async fn remote<T>(
        &self,
        op: &'static str,
        call: impl Future<Output = StoreResult<T>>,
    ) -> StoreResult<T> {
        match tokio::time::timeout(self.config.remote_timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    "remote {op} timed out after {:?}",
                    self.config.remote_timeout
                );
                Err(StoreError::Timeout(self.config.remote_timeout))
            }
        }
    }

    fn publish(&self) {
        self.state_tx.send_replace(LogSnapshot {
            entries: Arc::from(self.log.as_slice()),
            menu: self.menu.clone().unwrap_or_default(),
            pending_writes: self.pending_writes,
            loaded: self.menu.is_some(),
        });
    }
}

/// Decodes snapshot rows into a newest-first log addressed by position.
fn decode_rows(rows: &[RawRow]) -> StoreResult<Vec<Entry>> {
    let mut entries = rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let position = index + 1;
            let id = u32::try_from(position)
                .ok()
                .and_then(RemoteId::from_position)
                .ok_or_else(|| {
                    StoreError::InvalidResponse(format!("row {position} out of range"))
                })?;
            row.decode(id)
                .map_err(|source| StoreError::Malformed { position, source })
        })
        .collect::<StoreResult<Vec<_>>>()?;
    entries.reverse();
    Ok(entries)
}
