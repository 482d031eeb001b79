mod batch;
mod cli;
mod export;
mod infra;
mod predict;
mod render;
mod sessions;

use recurrence_ai::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
