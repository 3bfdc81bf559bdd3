use crate::server;
use crate::survey::{run_profile, ProfileArgs};
use clap::{Args, Parser, Subcommand};
use health_profiler::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Health Profiler",
    about = "Score health survey submissions over HTTP or from local files",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Profile a single survey file and print the result as JSON
    Profile(ProfileArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Profile(args) => run_profile(args).await,
    }
}
