use crate::demo::{run_demo, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use talent_pipeline::config::AppConfig;
use talent_pipeline::error::AppError;
use talent_pipeline::pipeline::StatusOverview;
use talent_pipeline::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "Talent Pipeline",
    about = "Serve and inspect the recruitment application pipeline",
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
    /// Print the stage, offered actions and style for a status value
    Status(StatusArgs),
    /// Walk one application through the recruiting lifecycle step by step
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

#[derive(Args, Debug)]
pub(crate) struct StatusArgs {
    /// Status value as stored upstream (unknown values render as submitted)
    pub(crate) status: String,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    execute(command).await
}

async fn execute(command: Command) -> Result<(), AppError> {
    match command {
        // The server applies its CLI overrides before installing telemetry.
        Command::Serve(args) => server::run(args).await,
        Command::Status(args) => {
            init_telemetry()?;
            print_status(&args.status);
            Ok(())
        }
        Command::Demo(args) => {
            init_telemetry()?;
            run_demo(args)
        }
    }
}

fn init_telemetry() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    Ok(())
}

fn print_status(raw: &str) {
    let overview = StatusOverview::for_raw(raw);
    match serde_json::to_string_pretty(&overview) {
        Ok(json) => println!("{json}"),
        Err(err) => println!("status overview unavailable: {err}"),
    }
}
