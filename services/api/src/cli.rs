use crate::commands::{run_goals, run_kpis, run_stakeholders, run_vendors, InputArgs, KpiArgs};
use crate::demo::{run_demo, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use event_planner::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Event Planner",
    about = "Generate strategic event planning artifacts from the command line or over HTTP",
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
    /// Rank event goals into MoSCoW tiers with an execution roadmap
    Goals(InputArgs),
    /// Rank stakeholders, classify salience and split the engagement budget
    Stakeholders(InputArgs),
    /// Build a KPI health dashboard from JSON or a CSV export
    Kpis(KpiArgs),
    /// Score and rank vendor quotes
    Vendors(InputArgs),
    /// Run every planner against a sample event
    Demo(DemoArgs),
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
        Command::Goals(args) => run_goals(args),
        Command::Stakeholders(args) => run_stakeholders(args),
        Command::Kpis(args) => run_kpis(args),
        Command::Vendors(args) => run_vendors(args),
        Command::Demo(args) => run_demo(args),
    }
}
