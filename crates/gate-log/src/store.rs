use std::cmp::Reverse;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::export::{export_file_name, write_csv, ExportRow};
use crate::kv::KeyValueStore;
use crate::query::{HistoryQuery, LogSummary};
use crate::record::{NewVisit, VisitRecord, VisitStatus};
use crate::{ExportError, StoreError, StoreResult};

/// Storage key holding the whole log as one JSON array.
pub const VISIT_LOG_KEY: &str = "vehicleLog";

/// Storage key that keeps the last log contents that failed to parse.
pub const UNREADABLE_LOG_KEY: &str = "vehicleLog_unreadable";

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Append, exit and query operations over the persisted visit log.
///
/// Every mutation reads the full log, changes it in memory and writes the
/// full log back. An absent, unreadable or corrupt log reads as empty.
#[derive(Debug)]
pub struct VisitLogStore<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl<S: KeyValueStore> VisitLogStore<S> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: KeyValueStore, C: Clock> VisitLogStore<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn record_entry(&self, visit: NewVisit) -> StoreResult<VisitRecord> {
        let mut log = self.load();
        let entry_time = self.clock.now();
        let record = VisitRecord {
            id: next_id(&log, entry_time),
            vehicle_number: visit.vehicle_number.to_uppercase(),
            names: visit.names,
            number_of_people: visit.number_of_people,
            purpose: visit.purpose,
            approved_by: visit.approved_by,
            entry_time,
            exit_time: None,
            status: VisitStatus::Inside,
        };

        log.push(record.clone());
        self.persist(&log)?;
        info!(
            id = %record.id,
            vehicle = %record.vehicle_number,
            approved_by = record.approved_by.as_deref().unwrap_or("-"),
            "entry recorded"
        );
        Ok(record)
    }

    /// Marks the inside record with `id` as exited. Returns `None` without
    /// touching storage when no such inside record exists.
    pub fn record_exit(&self, id: &str) -> StoreResult<Option<VisitRecord>> {
        let mut log = self.load();
        let Some(record) = log
            .iter_mut()
            .find(|record| record.id == id && record.is_inside())
        else {
            debug!(%id, "no inside record to exit");
            return Ok(None);
        };

        // A clock that stepped backwards must not put exit before entry.
        let exit_time = self.clock.now().max(record.entry_time);
        record.exit_time = Some(exit_time);
        record.status = VisitStatus::Exited;
        let updated = record.clone();

        self.persist(&log)?;
        info!(%id, vehicle = %updated.vehicle_number, "exit recorded");
        Ok(Some(updated))
    }

    /// Full log, most recent entry first. Entries sharing a timestamp keep
    /// the later-appended one first.
    pub fn list_all(&self) -> Vec<VisitRecord> {
        let mut log = self.load();
        log.reverse();
        log.sort_by_key(|record| Reverse(record.entry_time));
        log
    }

    pub fn active(&self) -> Vec<VisitRecord> {
        self.query(&HistoryQuery::inside())
    }

    pub fn query(&self, query: &HistoryQuery) -> Vec<VisitRecord> {
        query.apply(self.list_all())
    }

    pub fn summary(&self) -> LogSummary {
        LogSummary::from_records(&self.load())
    }

    /// Deletes the persisted log. Irreversible.
    pub fn clear_all(&self) -> StoreResult<()> {
        self.store.remove(VISIT_LOG_KEY)?;
        info!("visit history cleared");
        Ok(())
    }

    pub fn export_snapshot(&self) -> Vec<ExportRow> {
        self.list_all().iter().map(ExportRow::from_record).collect()
    }

    /// Writes `vehicle_log_<date>.csv` into `dir` and returns its path.
    pub fn export_to_dir(&self, dir: &Path, date: NaiveDate) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(dir).map_err(|e| {
            ExportError::Io(format!(
                "failed to create export directory {}: {e}",
                dir.display()
            ))
        })?;
        let path = dir.join(export_file_name(date));
        let file = fs::File::create(&path)
            .map_err(|e| ExportError::Io(format!("failed to create {}: {e}", path.display())))?;

        let rows = self.export_snapshot();
        write_csv(&rows, file)?;
        info!(path = %path.display(), rows = rows.len(), "visit log exported");
        Ok(path)
    }

    fn load(&self) -> Vec<VisitRecord> {
        let raw = match self.store.get(VISIT_LOG_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(error = %err, "visit log unavailable; treating as empty");
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(log) => log,
            Err(err) => {
                match self.store.set(UNREADABLE_LOG_KEY, &raw) {
                    Ok(()) => warn!(
                        error = %err,
                        backup = UNREADABLE_LOG_KEY,
                        "visit log is corrupt; treating as empty, original kept in backup"
                    ),
                    Err(backup_err) => warn!(
                        error = %err,
                        backup_error = %backup_err,
                        "visit log is corrupt and could not be backed up; treating as empty"
                    ),
                }
                Vec::new()
            }
        }
    }

    fn persist(&self, log: &[VisitRecord]) -> StoreResult<()> {
        let raw = serde_json::to_string(log).map_err(|e| StoreError::Serialize(e.to_string()))?;
        self.store.set(VISIT_LOG_KEY, &raw)
    }
}

/// Millisecond creation timestamp, bumped past any numeric id already in
/// the log so two entries in the same millisecond never collide.
fn next_id(log: &[VisitRecord], now: DateTime<Utc>) -> String {
    let candidate = now.timestamp_millis();
    let highest = log
        .iter()
        .filter_map(|record| record.id.parse::<i64>().ok())
        .max();
    match highest {
        Some(highest) if highest >= candidate => (highest + 1).to_string(),
        _ => candidate.to_string(),
    }
}
