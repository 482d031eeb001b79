use super::PredictionRecord;
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

/// Ordered, append-only list of the current session's predictions.
#[derive(Debug, Clone)]
pub struct HistoryLedger {
    started_at: NaiveDateTime,
    records: Vec<PredictionRecord>,
    session_file: Option<PathBuf>,
}

impl HistoryLedger {
    pub fn new(started_at: NaiveDateTime) -> Self {
        Self {
            started_at,
            records: Vec::new(),
            session_file: None,
        }
    }

    pub fn started_at(&self) -> NaiveDateTime {
        self.started_at
    }

    pub fn append(&mut self, record: PredictionRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[PredictionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The supplied name, or `Patient {n}` for the next row.
    pub fn display_name(&self, name: Option<&str>) -> String {
        match name.map(str::trim).filter(|name| !name.is_empty()) {
            Some(name) => name.to_string(),
            None => format!("Patient {}", self.records.len() + 1),
        }
    }

    /// File claimed by the first persist of this session, if any.
    pub fn session_file(&self) -> Option<&Path> {
        self.session_file.as_deref()
    }

    pub(crate) fn set_session_file(&mut self, path: PathBuf) {
        self.session_file = Some(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn unnamed_patients_are_numbered_by_position() {
        let started = NaiveDate::from_ymd_opt(2025, 1, 2)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let ledger = HistoryLedger::new(started);

        assert!(ledger.is_empty());
        assert_eq!(ledger.display_name(None), "Patient 1");
        assert_eq!(ledger.display_name(Some("  ")), "Patient 1");
        assert_eq!(ledger.display_name(Some(" Meera ")), "Meera");
    }
}
