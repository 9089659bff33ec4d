use crate::report::{run_stats_report, StatsArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use job_portal::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Job Portal",
    about = "Track job applications over HTTP or inspect stored statistics from the command line",
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
    /// Print a user's application statistics from the store snapshot
    Stats(StatsArgs),
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
        Command::Stats(args) => run_stats_report(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["job-portal"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn stats_requires_a_user() {
        assert!(Cli::try_parse_from(["job-portal", "stats"]).is_err());
        let cli = Cli::try_parse_from(["job-portal", "stats", "--user", "u-1"]).expect("parses");
        match cli.command {
            Some(Command::Stats(args)) => assert_eq!(args.user, "u-1"),
            other => panic!("expected stats command, got {other:?}"),
        }
    }
}
