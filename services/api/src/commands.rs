use crate::infra::{build_service, print_json, read_json};
use clap::{ArgGroup, Args};
use event_planner::config::AppConfig;
use event_planner::error::AppError;
use event_planner::import::KpiCsvImporter;
use event_planner::planning::{GoalsRequest, KpisRequest, StakeholdersRequest, VendorsRequest};
use event_planner::telemetry;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct InputArgs {
    /// JSON request body, as accepted by the matching HTTP endpoint
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Event the artifact is generated for
    #[arg(long, default_value = "cli-event")]
    pub(crate) event_id: String,
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["input", "csv"])))]
pub(crate) struct KpiArgs {
    /// JSON request body with a `kpis` array
    #[arg(long)]
    pub(crate) input: Option<PathBuf>,
    /// CSV export with `KPI ID, KPI Name, Target, Current` columns
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Event the artifact is generated for
    #[arg(long, default_value = "cli-event")]
    pub(crate) event_id: String,
}

fn prepare() -> Result<AppConfig, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    Ok(config)
}

pub(crate) fn run_goals(args: InputArgs) -> Result<(), AppError> {
    let config = prepare()?;
    let request: GoalsRequest = read_json(&args.input)?;
    let artifact = build_service(&config)?.prioritize_goals(&args.event_id, &request.goals)?;
    print_json(&artifact)
}

pub(crate) fn run_stakeholders(args: InputArgs) -> Result<(), AppError> {
    let config = prepare()?;
    let request: StakeholdersRequest = read_json(&args.input)?;
    let artifact = build_service(&config)?
        .prioritize_stakeholders(&args.event_id, &request.stakeholders)?;
    print_json(&artifact)
}

pub(crate) fn run_kpis(args: KpiArgs) -> Result<(), AppError> {
    let config = prepare()?;
    let kpis = match (args.input, args.csv) {
        (_, Some(csv)) => KpiCsvImporter::from_path(csv)?,
        (Some(input), None) => read_json::<KpisRequest>(&input)?.kpis,
        (None, None) => Vec::new(),
    };
    let artifact = build_service(&config)?.monitor_kpis(&args.event_id, &kpis)?;
    print_json(&artifact)
}

pub(crate) fn run_vendors(args: InputArgs) -> Result<(), AppError> {
    let config = prepare()?;
    let request: VendorsRequest = read_json(&args.input)?;
    let artifact = build_service(&config)?.evaluate_vendors(
        &args.event_id,
        &request.vendors,
        &request.requirements,
        request.evaluation_weights.as_ref(),
    )?;
    print_json(&artifact)
}
