mod cli;
mod infra;
mod registration;
mod voting;

use festival::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
