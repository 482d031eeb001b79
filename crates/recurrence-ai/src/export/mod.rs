//! Downloadable renderings of a session: a raw CSV dump and a fixed-width
//! text report.

mod table;

pub use table::{TextTableReport, DEFAULT_CELL_WIDTH, REPORT_TITLE};

use crate::history::{write_csv, HistoryRow};
use std::io::Write;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("there are no predictions to export")]
    EmptyHistory,
    #[error("report cell width must be at least 1")]
    InvalidCellWidth,
    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to write CSV export: {0}")]
    Csv(#[from] csv::Error),
}

/// Renders a set of history rows into a document.
pub trait ReportRenderer {
    fn render<R: HistoryRow, W: Write>(&self, rows: &[R], writer: W) -> Result<(), ExportError>;
}

/// Raw dump with the persisted session schema.
pub fn export_csv<R: HistoryRow, W: Write>(rows: &[R], writer: W) -> Result<(), ExportError> {
    if rows.is_empty() {
        return Err(ExportError::EmptyHistory);
    }
    write_csv(writer, rows)?;
    Ok(())
}
