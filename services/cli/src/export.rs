use crate::infra::session_store;
use crate::sessions::SessionDirArgs;
use clap::Args;
use recurrence_ai::error::AppError;
use recurrence_ai::export::{export_csv, ReportRenderer, TextTableReport, DEFAULT_CELL_WIDTH};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// Session file name or path
    #[arg(long)]
    pub(crate) session: PathBuf,
    /// Write the raw history CSV here
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Write the text report here (printed when no output is given)
    #[arg(long)]
    pub(crate) report: Option<PathBuf>,
    /// Fixed width of every report cell
    #[arg(long, default_value_t = DEFAULT_CELL_WIDTH)]
    pub(crate) cell_width: usize,
    #[command(flatten)]
    pub(crate) dir: SessionDirArgs,
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let config = crate::infra::load_config(&args.dir.runtime())?;
    let store = session_store(&config);
    let snapshot = store.load(&args.session)?;
    let report = TextTableReport::new(args.cell_width)?;

    if let Some(path) = &args.csv {
        export_csv(&snapshot.records, BufWriter::new(File::create(path)?))?;
        info!(file = %path.display(), rows = snapshot.records.len(), "history CSV exported");
    }

    match &args.report {
        Some(path) => {
            report.render(&snapshot.records, BufWriter::new(File::create(path)?))?;
            info!(file = %path.display(), "report exported");
        }
        None if args.csv.is_none() => {
            report.render(&snapshot.records, io::stdout().lock())?;
        }
        None => {}
    }
    Ok(())
}
