use crate::demo::{
    run_cost_summary, run_demo, run_load_search, CostSummaryArgs, DemoArgs, LoadSearchArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use haul_ai::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Haul AI Load Board",
    about = "Search freight loads and check them against a driver's operating costs",
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
    /// Filter a load export with a saved configuration and overrides
    Loads {
        #[command(subcommand)]
        command: LoadsCommand,
    },
    /// Evaluate a driver's cost model
    Costs {
        #[command(subcommand)]
        command: CostsCommand,
    },
    /// Run an end-to-end demo over a synthetic load board
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum LoadsCommand {
    /// Print the loads matching a configuration, ranked when cost settings are given
    Search(LoadSearchArgs),
}

#[derive(Subcommand, Debug)]
enum CostsCommand {
    /// Print RCPM, fixed cost totals, and the margin threshold
    Summary(CostSummaryArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Load export to serve instead of APP_LOADS_CSV
    #[arg(long)]
    pub(crate) loads_csv: Option<PathBuf>,
    /// Preset catalog JSON to serve instead of APP_PRESETS_PATH
    #[arg(long)]
    pub(crate) presets: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Loads {
            command: LoadsCommand::Search(args),
        } => run_load_search(args),
        Command::Costs {
            command: CostsCommand::Summary(args),
        } => run_cost_summary(args),
        Command::Demo(args) => run_demo(args),
    }
}
