//! Shared test helpers: an in-memory position-addressed table with failure,
//! delay and hold injection.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use gymlog_model::{FixedClock, LoadUnit, Menu, RawRow, RemoteId, SetDraft};
use gymlog_sync::{
    create_sync_engine, EngineConfig, LogHandle, RemoteLogStore, Snapshot, StoreError,
    StoreResult, SyncEngine,
};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    List,
    Append,
    Update,
    Delete,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    List,
    Append(RawRow),
    Update(RemoteId, RawRow),
    Delete(RemoteId),
}

#[derive(Default)]
struct MockState {
    menu: Menu,
    rows: Vec<RawRow>,
    calls: Vec<Call>,
    failures: HashMap<Op, VecDeque<StoreError>>,
    delays: HashMap<Op, VecDeque<Duration>>,
    holds: HashMap<Op, VecDeque<oneshot::Receiver<()>>>,
}

/// Position-addressed table behaving like the sheet: appends go last,
/// deletes shift later rows up.
#[derive(Default)]
pub struct MockStore {
    state: Mutex<MockState>,
}

impl MockStore {
    pub fn new(menu: Menu, rows: Vec<RawRow>) -> Self {
        Self {
            state: Mutex::new(MockState {
                menu,
                rows,
                ..Default::default()
            }),
        }
    }

    pub fn rows(&self) -> Vec<RawRow> {
        self.state.lock().unwrap().rows.clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn write_calls(&self) -> Vec<Call> {
        self.calls().into_iter().filter(|c| *c != Call::List).collect()
    }

    pub fn set_menu(&self, menu: Menu) {
        self.state.lock().unwrap().menu = menu;
    }

    /// Appends a row behind the engine's back (another device, a hand edit).
    pub fn push_row(&self, row: RawRow) {
        self.state.lock().unwrap().rows.push(row);
    }

    pub fn fail_next(&self, op: Op, error: StoreError) {
        self.state.lock().unwrap().failures.entry(op).or_default().push_back(error);
    }

    pub fn delay_next(&self, op: Op, delay: Duration) {
        self.state.lock().unwrap().delays.entry(op).or_default().push_back(delay);
    }

    /// The next `op` waits until the returned sender fires (or is dropped).
    pub fn hold_next(&self, op: Op) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.state.lock().unwrap().holds.entry(op).or_default().push_back(rx);
        tx
    }

    async fn enter(&self, op: Op, call: Call) -> StoreResult<()> {
        let (hold, delay) = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(call);
            (
                state.holds.get_mut(&op).and_then(VecDeque::pop_front),
                state.delays.get_mut(&op).and_then(VecDeque::pop_front),
            )
        };
        if let Some(hold) = hold {
            let _ = hold.await;
        }
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let failure = {
            let mut state = self.state.lock().unwrap();
            state.failures.get_mut(&op).and_then(VecDeque::pop_front)
        };
        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RemoteLogStore for MockStore {
    async fn list_all(&self) -> StoreResult<Snapshot> {
        self.enter(Op::List, Call::List).await?;
        let state = self.state.lock().unwrap();
        Ok(Snapshot {
            menu: state.menu.clone(),
            rows: state.rows.clone(),
        })
    }

    async fn append(&self, row: &RawRow) -> StoreResult<()> {
        self.enter(Op::Append, Call::Append(row.clone())).await?;
        self.state.lock().unwrap().rows.push(row.clone());
        Ok(())
    }

    async fn update(&self, id: RemoteId, row: &RawRow) -> StoreResult<()> {
        self.enter(Op::Update, Call::Update(id, row.clone())).await?;
        let mut state = self.state.lock().unwrap();
        let slot = state
            .rows
            .get_mut(id.position() as usize - 1)
            .ok_or_else(|| StoreError::Status {
                status: 400,
                message: format!("no row {id}"),
            })?;
        *slot = row.clone();
        Ok(())
    }

    async fn delete(&self, id: RemoteId) -> StoreResult<()> {
        self.enter(Op::Delete, Call::Delete(id)).await?;
        let mut state = self.state.lock().unwrap();
        let index = id.position() as usize - 1;
        if index >= state.rows.len() {
            return Err(StoreError::Status {
                status: 400,
                message: format!("no row {id}"),
            });
        }
        state.rows.remove(index);
        Ok(())
    }
}

// ── Fixtures ────────────────────────────────────────────────────

/// Routes engine logs to the test harness. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("gymlog_sync=debug"))
        .with_test_writer()
        .try_init();
}

pub fn taipei() -> FixedOffset {
    FixedOffset::east_opt(8 * 3600).unwrap()
}

pub fn local(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    taipei()
        .with_ymd_and_hms(2026, 10, day, hour, minute, 0)
        .unwrap()
        .with_timezone(&Utc)
}

/// Clock at 2026-10-19 19:30 local.
pub fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(local(19, 19, 30), taipei()))
}

pub fn menu() -> Menu {
    Menu::new(
        ["incline", "paused"],
        ["bench press", "squat", "row", "plank"],
    )
}

pub fn row(at: DateTime<Utc>, exercise: &str, set: u32, load: &str, reps: u32) -> RawRow {
    RawRow::from_cells([
        at.timestamp().to_string(),
        exercise.to_string(),
        set.to_string(),
        load.to_string(),
        reps.to_string(),
        "2".to_string(),
        "120".to_string(),
        String::new(),
    ])
}

/// Three rows, oldest first: squat, row, bench.
pub fn three_rows() -> Vec<RawRow> {
    vec![
        row(local(18, 18, 0), "squat", 1, "100kg", 5),
        row(local(19, 18, 0), "row", 1, "50kg", 10),
        row(local(19, 18, 10), "bench press", 1, "70kg", 6),
    ]
}

pub fn draft(modifiers: &[&str], verbs: &[&str], kg: f64, reps: u32) -> SetDraft {
    SetDraft {
        modifiers: modifiers.iter().map(|s| s.to_string()).collect(),
        verbs: verbs.iter().map(|s| s.to_string()).collect(),
        load_value: Some(kg),
        load_unit: LoadUnit::Weight,
        reps: Some(reps),
        effort: Some(2.0),
        rest_seconds: Some(90),
        note: None,
    }
}

pub fn rid(position: u32) -> RemoteId {
    RemoteId::from_position(position).unwrap()
}

pub fn test_config() -> EngineConfig {
    EngineConfig {
        remote_timeout: Duration::from_secs(5),
        reload_delay: Duration::from_millis(200),
        command_buffer: 8,
    }
}

pub fn engine_with(store: Arc<MockStore>, clock: Arc<FixedClock>) -> (LogHandle, SyncEngine) {
    create_sync_engine(store, clock, test_config())
}

pub fn transport_error() -> StoreError {
    StoreError::Transport("connection reset".into())
}
