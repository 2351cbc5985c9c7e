//! JSON shapes exchanged with the sheet proxy.
//!
//! The proxy speaks in sheet rows: row 1 is the header, so the first log
//! row is sheet row 2. Cells come back as whatever the sheet holds, so every
//! cell accepts a string, a number or nothing.

use gymlog_model::{Menu, RawRow, RemoteId};
use gymlog_sync::{Snapshot, StoreError, StoreResult};
use serde::{Deserialize, Serialize};

/// Sheet row of the first log row.
pub const FIRST_DATA_ROW: u64 = 2;

/// Body of `GET /api/data`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataResponse {
    #[serde(default)]
    pub menu: MenuWire,
    /// Newest first.
    #[serde(default)]
    pub logs: Vec<LogWire>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuWire {
    #[serde(default)]
    pub adjs: Vec<String>,
    #[serde(default)]
    pub verbs: Vec<String>,
}

/// One log row as the proxy returns it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogWire {
    /// Sheet row, header included.
    pub id: u64,
    #[serde(default, deserialize_with = "deserialize_cell")]
    pub unix: String,
    #[serde(default, deserialize_with = "deserialize_cell")]
    pub exercise: String,
    #[serde(default, deserialize_with = "deserialize_cell")]
    pub set: String,
    #[serde(default, deserialize_with = "deserialize_cell")]
    pub weight: String,
    #[serde(default, deserialize_with = "deserialize_cell")]
    pub rep: String,
    #[serde(default, deserialize_with = "deserialize_cell")]
    pub feeling: String,
    #[serde(default, deserialize_with = "deserialize_cell")]
    pub rest: String,
    #[serde(default, deserialize_with = "deserialize_cell")]
    pub note: String,
}

impl From<LogWire> for RawRow {
    fn from(log: LogWire) -> Self {
        RawRow {
            timestamp: log.unix,
            exercise: log.exercise,
            set_number: log.set,
            load: log.weight,
            reps: log.rep,
            effort: log.feeling,
            rest_seconds: log.rest,
            note: log.note,
        }
    }
}

impl DataResponse {
    /// Orders the logs by sheet row and checks they form one contiguous
    /// block starting right under the header.
    pub fn into_snapshot(self) -> StoreResult<Snapshot> {
        let mut logs = self.logs;
        logs.sort_by_key(|log| log.id);

        for (offset, log) in logs.iter().enumerate() {
            let expected = FIRST_DATA_ROW + offset as u64;
            if log.id != expected {
                return Err(StoreError::InvalidResponse(format!(
                    "expected sheet row {expected}, got {}",
                    log.id
                )));
            }
        }

        Ok(Snapshot {
            menu: Menu::new(self.menu.adjs, self.menu.verbs),
            rows: logs.into_iter().map(RawRow::from).collect(),
        })
    }
}

/// Body of `POST /api/save` and `POST /api/update`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowBody {
    #[serde(rename = "rowId", skip_serializing_if = "Option::is_none")]
    pub row_id: Option<u64>,
    pub unix: String,
    pub exercise: String,
    pub set: String,
    pub weight: String,
    pub rep: String,
    pub feeling: String,
    pub rest: String,
    pub note: String,
}

impl RowBody {
    /// Body for appending `row`.
    pub fn append(row: &RawRow) -> Self {
        Self::with_row_id(None, row)
    }

    /// Body for overwriting the row at `id`.
    pub fn update(id: RemoteId, row: &RawRow) -> Self {
        Self::with_row_id(Some(sheet_row(id)), row)
    }

    fn with_row_id(row_id: Option<u64>, row: &RawRow) -> Self {
        let row = row.clone();
        Self {
            row_id,
            unix: row.timestamp,
            exercise: row.exercise,
            set: row.set_number,
            weight: row.load,
            rep: row.reps,
            feeling: row.effort,
            rest: row.rest_seconds,
            note: row.note,
        }
    }
}

/// Body of `POST /api/delete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeleteBody {
    #[serde(rename = "rowId")]
    pub row_id: u64,
}

impl DeleteBody {
    pub fn new(id: RemoteId) -> Self {
        Self {
            row_id: sheet_row(id),
        }
    }
}

/// Sheet row holding the log row at `id`.
pub fn sheet_row(id: RemoteId) -> u64 {
    u64::from(id.position()) + FIRST_DATA_ROW - 1
}

/// Accepts a string, a number, or null (an empty cell).
fn deserialize_cell<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de;

    struct CellVisitor;
    impl<'de> de::Visitor<'de> for CellVisitor {
        type Value = String;
        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            f.write_str("a string, a number or null")
        }
        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }
        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }
        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }
        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }
        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }
        fn visit_unit<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }
        fn visit_none<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }
    }
    deserializer.deserialize_any(CellVisitor)
}
