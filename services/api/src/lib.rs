mod cli;
mod infra;
mod routes;
mod server;
mod survey;

use health_profiler::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
