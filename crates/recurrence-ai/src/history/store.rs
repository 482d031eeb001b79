use super::parser::{load_snapshot, SessionSnapshot};
use super::{HistoryError, HistoryLedger, HistoryRow, COLUMNS};
use chrono::NaiveDateTime;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

const FILE_PREFIX: &str = "session_";
const FILE_STAMP: &str = "%Y-%m-%d_%H-%M";

/// Writes the header and one CSV row per history entry.
pub fn write_csv<W: Write, R: HistoryRow>(writer: W, rows: &[R]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(COLUMNS)?;
    for row in rows {
        csv_writer.write_record(row.cells())?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Directory of per-session history files.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Bare file names are looked up inside the session directory.
    pub fn resolve(&self, name: &Path) -> PathBuf {
        if name.components().count() == 1 && !name.exists() {
            self.dir.join(name)
        } else {
            name.to_path_buf()
        }
    }

    /// Rewrites the ledger's session file in full. The first persist claims
    /// `session_<minute>.csv`, adding a numeric suffix when another session
    /// already owns that minute; later persists reuse the claimed file.
    pub fn persist(&self, ledger: &mut HistoryLedger) -> Result<Option<PathBuf>, HistoryError> {
        if ledger.is_empty() {
            return Ok(None);
        }

        fs::create_dir_all(&self.dir)?;
        let path = match ledger.session_file() {
            Some(path) => path.to_path_buf(),
            None => {
                let path = self.claim_path(ledger.started_at());
                ledger.set_session_file(path.clone());
                path
            }
        };

        let file = fs::File::create(&path)?;
        write_csv(file, ledger.records())?;
        info!(file = %path.display(), rows = ledger.len(), "session history persisted");
        Ok(Some(path))
    }

    fn claim_path(&self, started_at: NaiveDateTime) -> PathBuf {
        let stem = format!("{FILE_PREFIX}{}", started_at.format(FILE_STAMP));
        let mut attempt = 1;
        loop {
            let name = if attempt == 1 {
                format!("{stem}.csv")
            } else {
                format!("{stem}_{attempt}.csv")
            };
            let candidate = self.dir.join(name);
            if !candidate.exists() {
                return candidate;
            }
            attempt += 1;
        }
    }

    /// Persisted session files sorted by name, minus the active one.
    pub fn list_past_sessions(&self, active: Option<&Path>) -> Result<Vec<PathBuf>, HistoryError> {
        fs::create_dir_all(&self.dir)?;
        let active_name = active.and_then(Path::file_name);

        let mut sessions = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_csv = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if !is_csv || !path.is_file() {
                continue;
            }
            if active_name.is_some() && path.file_name() == active_name {
                continue;
            }
            sessions.push(path);
        }

        sessions.sort();
        Ok(sessions)
    }

    pub fn load(&self, path: &Path) -> Result<SessionSnapshot, HistoryError> {
        load_snapshot(&self.resolve(path))
    }
}
