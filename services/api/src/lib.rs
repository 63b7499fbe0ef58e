mod cli;
mod commands;
mod infra;
mod routes;
mod server;

use stop_factor::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
