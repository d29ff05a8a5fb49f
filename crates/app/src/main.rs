//! apiprobe - Main Entry Point
//!
//! Loads the configuration, resolves the scenario plan and runs it against
//! the API, printing a human report (or JSON) on stdout. Logs go to stderr.

mod cli;

use std::error::Error;
use std::process::ExitCode;
use std::sync::Arc;

use apiprobe_application::{CheckInvoker, Reporter, RunSuite, ScenarioRunner, resolve_plan};
use apiprobe_domain::{RunSummary, ScenarioId, ScenarioPlan, SessionState};
use apiprobe_infrastructure::{
    ConsoleReporter, ProbeConfig, ReqwestHttpClient, SilentReporter, SystemClock,
};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;

/// Exit status for configuration problems detected before the run.
const EXIT_CONFIG_ERROR: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(&cli).await {
        Ok(code) => ExitCode::from(code),
        Err(error) => {
            tracing::error!(%error, "run aborted");
            eprintln!("apiprobe: {error}");
            ExitCode::from(EXIT_CONFIG_ERROR)
        }
    }
}

async fn run(cli: &Cli) -> Result<u8, Box<dyn Error>> {
    let mut config = ProbeConfig::load(cli.config.as_deref())?;
    config.apply_env()?;
    config.apply_overrides(cli.overrides());
    config.validate()?;

    let plan = resolve_plan(&cli.only, cli.pages)?;
    if cli.list {
        print_plan(&plan);
        return Ok(0);
    }

    tracing::info!(
        "Starting apiprobe v{} against {}",
        env!("CARGO_PKG_VERSION"),
        config.base_url
    );

    let summary = if cli.json {
        let summary = execute(&config, &plan, SilentReporter).await?;
        println!("{}", serde_json::to_string_pretty(&summary)?);
        summary
    } else {
        println!("Testing API at {}", config.base_url);
        execute(&config, &plan, ConsoleReporter::stdout()).await?
    };

    Ok(summary.exit_code())
}

async fn execute<R: Reporter>(
    config: &ProbeConfig,
    plan: &ScenarioPlan,
    reporter: R,
) -> Result<RunSummary, Box<dyn Error>> {
    let client = Arc::new(ReqwestHttpClient::new(&config.user_agent)?);
    let invoker = CheckInvoker::new(client, reporter).with_timeout(config.timeout());
    let runner = ScenarioRunner::new(invoker, SystemClock::new(), config.scenario_settings());
    let mut session = SessionState::new(config.base_url.as_str())?;

    Ok(RunSuite::new(runner).run(plan, &mut session).await)
}

fn print_plan(plan: &ScenarioPlan) {
    for id in plan.steps() {
        let prerequisites: Vec<&str> = id
            .prerequisites()
            .iter()
            .copied()
            .map(ScenarioId::as_str)
            .collect();
        if prerequisites.is_empty() {
            println!("{:<12} {}", id.as_str(), id.title());
        } else {
            println!(
                "{:<12} {} (after {})",
                id.as_str(),
                id.title(),
                prerequisites.join(", ")
            );
        }
    }
}
