use std::process::ExitCode;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use jobwatch::cli::{Cli, Command};
use jobwatch::config::JobwatchConfig;
use jobwatch::monitor::MonitorTarget;
use jobwatch::ui::MonitorProgress;
use jobwatch::{
    JobIdentity, JobMonitor, MonitorError, MonitorOutcome, MonitorReport,
    MonitorRequest, Phase, RestJobsClient,
};

const EXIT_NEGATIVE: u8 = 1;
const EXIT_ERROR: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "jobwatch=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = JobwatchConfig::load(cli.config.as_deref())?;
    let defaults = config.monitor.to_defaults()?;
    let mut client = RestJobsClient::new(&config.base_url)?;
    if let Some((user, password)) = config.credentials() {
        client = client.with_credentials(user, password);
    }

    match cli.command {
        Command::Status { job, phase, poll } => {
            let mut options = poll.to_options();
            options.phase = phase.map(Phase::from);
            let request = MonitorRequest::for_phase(
                JobIdentity::new(job.jobname, job.jobid)?,
                &options,
                &defaults,
            );
            Ok(watch(client, request, cli.json).await)
        }
        Command::Message {
            job,
            text,
            lines,
            poll,
        } => {
            let mut options = poll.to_options();
            options.line_limit = lines;
            let request = MonitorRequest::for_message(
                JobIdentity::new(job.jobname, job.jobid)?,
                text,
                &options,
                &defaults,
            )?;
            Ok(watch(client, request, cli.json).await)
        }
        Command::Running { job } => {
            let identity = JobIdentity::new(job.jobname, job.jobid)?;
            let progress = MonitorProgress::start(&format!("Checking {identity}"), !cli.json);
            let monitor = JobMonitor::new(client).with_defaults(defaults);
            match monitor.is_running(identity.name(), identity.id()).await {
                Ok(running) => {
                    if cli.json {
                        let body = serde_json::json!({ "job": identity, "running": running });
                        println!("{}", serde_json::to_string_pretty(&body)?);
                    } else {
                        progress.running(&identity, running);
                    }
                    Ok(exit_for(running))
                }
                Err(err) => {
                    progress.fail(&err);
                    Ok(ExitCode::from(EXIT_ERROR))
                }
            }
        }
    }
}

/// Runs one monitor request with a spinner, stopping early on Ctrl-C.
async fn watch(
    client: RestJobsClient,
    request: MonitorRequest,
    json: bool,
) -> ExitCode {
    let started_at = Utc::now();
    let progress = MonitorProgress::start(&describe(&request), !json);
    let monitor = JobMonitor::with_wait(client, &progress);

    let result = tokio::select! {
        result = monitor.run(&request) => result,
        _ = tokio::signal::ctrl_c() => Err(MonitorError::Interrupted),
    };

    match result {
        Ok(outcome) => {
            if json {
                progress.print_report(&MonitorReport::from_outcome(&request, &outcome, started_at));
            } else {
                progress.complete(&request.job, &outcome);
            }
            match outcome {
                MonitorOutcome::Reached(_) => ExitCode::SUCCESS,
                MonitorOutcome::Message(found) => exit_for(found),
            }
        }
        Err(err) => {
            progress.fail(&err);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn exit_for(positive: bool) -> ExitCode {
    if positive {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_NEGATIVE)
    }
}

fn describe(request: &MonitorRequest) -> String {
    match &request.target {
        MonitorTarget::Phase(phase) => format!("Waiting for {} to reach {phase}", request.job),
        MonitorTarget::Message(target) => {
            format!("Waiting for {:?} in {} output", target.needle, request.job)
        }
    }
}
