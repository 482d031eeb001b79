use super::{ExportError, ReportRenderer};
use crate::history::{HistoryRow, COLUMNS};
use std::io::Write;

pub const REPORT_TITLE: &str = "Thyroid Cancer Prediction Report";
pub const DEFAULT_CELL_WIDTH: usize = 16;

/// Bordered table with one fixed width for every cell. Wider values are
/// cut, so long names and labels lose their tail.
#[derive(Debug, Clone, Copy)]
pub struct TextTableReport {
    cell_width: usize,
}

impl TextTableReport {
    pub fn new(cell_width: usize) -> Result<Self, ExportError> {
        if cell_width == 0 {
            return Err(ExportError::InvalidCellWidth);
        }
        Ok(Self { cell_width })
    }

    pub fn cell_width(&self) -> usize {
        self.cell_width
    }

    fn separator(&self) -> String {
        let mut line = String::from("+");
        for _ in COLUMNS {
            line.push_str(&"-".repeat(self.cell_width + 2));
            line.push('+');
        }
        line
    }

    fn row<'a, I>(&self, cells: I) -> String
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut line = String::from("|");
        for cell in cells {
            let clipped: String = cell.chars().take(self.cell_width).collect();
            let padding = self.cell_width - clipped.chars().count();
            line.push(' ');
            line.push_str(&clipped);
            line.push_str(&" ".repeat(padding));
            line.push_str(" |");
        }
        line
    }
}

impl Default for TextTableReport {
    fn default() -> Self {
        Self {
            cell_width: DEFAULT_CELL_WIDTH,
        }
    }
}

impl ReportRenderer for TextTableReport {
    fn render<R: HistoryRow, W: Write>(&self, rows: &[R], mut writer: W) -> Result<(), ExportError> {
        if rows.is_empty() {
            return Err(ExportError::EmptyHistory);
        }

        let separator = self.separator();
        let width = separator.chars().count();
        writeln!(writer, "{REPORT_TITLE:^width$}")?;
        writeln!(writer)?;
        writeln!(writer, "{separator}")?;
        writeln!(writer, "{}", self.row(COLUMNS))?;
        writeln!(writer, "{separator}")?;
        for record in rows {
            let cells = record.cells();
            writeln!(writer, "{}", self.row(cells.iter().map(String::as_str)))?;
        }
        writeln!(writer, "{separator}")?;
        writer.flush()?;
        Ok(())
    }
}
