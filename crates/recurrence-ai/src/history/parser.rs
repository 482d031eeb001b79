use super::{HistoryError, HistoryRow, COLUMN_COUNT};
use crate::decision::Outcome;
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A row from a persisted session file. Every column is optional so that
/// partial or older files still load.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LoadedRecord {
    #[serde(rename = "Session ID", default, deserialize_with = "empty_string_as_none")]
    pub session_id: Option<String>,
    #[serde(rename = "Timestamp", default, deserialize_with = "empty_string_as_none")]
    pub timestamp: Option<String>,
    #[serde(rename = "Name", default, deserialize_with = "empty_string_as_none")]
    pub name: Option<String>,
    #[serde(rename = "Confidence_No", default, deserialize_with = "lenient_number")]
    pub confidence_no: Option<f64>,
    #[serde(rename = "Confidence_Yes", default, deserialize_with = "lenient_number")]
    pub confidence_yes: Option<f64>,
    #[serde(rename = "Prediction", default, deserialize_with = "empty_string_as_none")]
    pub prediction: Option<String>,
    #[serde(rename = "Risk", default, deserialize_with = "empty_string_as_none")]
    pub risk: Option<String>,
    #[serde(rename = "HighRisk", default, deserialize_with = "lenient_flag")]
    pub high_risk: Option<bool>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = empty_string_as_none(deserializer)?;
    Ok(opt.and_then(|value| value.trim().parse::<f64>().ok().filter(|v| v.is_finite())))
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = empty_string_as_none(deserializer)?;
    Ok(opt.and_then(|value| match value.trim().to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" => Some(true),
        "0" | "0.0" | "false" => Some(false),
        _ => None,
    }))
}

impl HistoryRow for LoadedRecord {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn confidence_no(&self) -> Option<f64> {
        self.confidence_no
    }

    fn confidence_yes(&self) -> Option<f64> {
        self.confidence_yes
    }

    fn prediction(&self) -> Option<&str> {
        let raw = self.prediction.as_deref()?;
        match raw.parse::<Outcome>() {
            Ok(outcome) => Some(outcome.label()),
            Err(_) => Some(raw),
        }
    }

    fn risk(&self) -> Option<&str> {
        self.risk.as_deref()
    }

    fn cells(&self) -> [String; COLUMN_COUNT] {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        let number = |value: Option<f64>| value.map(|v| v.to_string()).unwrap_or_default();
        [
            text(&self.session_id),
            text(&self.timestamp),
            text(&self.name),
            number(self.confidence_no),
            number(self.confidence_yes),
            self.prediction().map(str::to_string).unwrap_or_default(),
            text(&self.risk),
            self.high_risk
                .map(|flag| u8::from(flag).to_string())
                .unwrap_or_default(),
        ]
    }
}

/// A past session reloaded for comparison.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub path: PathBuf,
    pub columns: Vec<String>,
    pub records: Vec<LoadedRecord>,
    pub skipped_rows: usize,
}

impl SessionSnapshot {
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|name| name == column)
    }

    /// Recurrence confidences present in the file; empty when the column is missing.
    pub fn confidence_yes(&self) -> Vec<f64> {
        self.records
            .iter()
            .filter_map(|record| record.confidence_yes)
            .collect()
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Only failing to open or read the header is an error; bad rows are
/// skipped and counted.
pub(crate) fn load_snapshot(path: &Path) -> Result<SessionSnapshot, HistoryError> {
    let file = std::fs::File::open(path)?;
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(file);

    let columns: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|name| name.trim_start_matches('\u{feff}').to_string())
        .collect();
    csv_reader.set_headers(csv::StringRecord::from(columns.clone()));

    if !columns.iter().any(|name| name == "Confidence_Yes") {
        debug!(file = %path.display(), "session file has no Confidence_Yes column");
    }

    let mut records = Vec::new();
    let mut skipped_rows = 0;
    for (index, row) in csv_reader.deserialize::<LoadedRecord>().enumerate() {
        match row {
            Ok(record) => records.push(record),
            Err(err) => {
                skipped_rows += 1;
                warn!(file = %path.display(), row = index + 1, error = %err, "skipping unreadable history row");
            }
        }
    }

    Ok(SessionSnapshot {
        path: path.to_path_buf(),
        columns,
        records,
        skipped_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).expect("seed session file");
        path
    }

    #[test]
    fn missing_columns_become_empty_series() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write(dir.path(), "old.csv", "Name,Prediction\nRavi,⚠️ Borderline\n");

        let snapshot = load_snapshot(&path).expect("loads");
        assert!(!snapshot.has_column("Confidence_Yes"));
        assert!(snapshot.confidence_yes().is_empty());
        assert_eq!(snapshot.records.len(), 1);
        assert_eq!(snapshot.records[0].prediction(), Some("Borderline"));
    }

    #[test]
    fn unparsable_cells_are_blank_not_fatal() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write(
            dir.path(),
            "mixed.csv",
            "Name,Confidence_Yes,HighRisk\nA,0.40,1\nB,n/a,maybe\nC,0.55\n",
        );

        let snapshot = load_snapshot(&path).expect("loads");
        assert_eq!(snapshot.records.len(), 3);
        assert_eq!(snapshot.confidence_yes(), vec![0.40, 0.55]);
        assert_eq!(snapshot.records[0].high_risk, Some(true));
        assert_eq!(snapshot.records[1].high_risk, None);
        assert_eq!(snapshot.records[2].high_risk, None);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let error = load_snapshot(Path::new("./no-such-session.csv")).expect_err("missing");
        assert!(matches!(error, HistoryError::Io(_)));
    }
}
