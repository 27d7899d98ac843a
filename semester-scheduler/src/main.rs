mod config;
mod display;
mod error;
mod parser;
mod report;
mod schedule;
mod web;

use std::process::ExitCode;

use anyhow::{bail, Context};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use config::Config;
use display::{render_schedule, write_schedule_to_file};
use error::ScheduleError;
use parser::load_course_lines;
use schedule::build_schedule;

const USAGE: &str = "usage: semester-scheduler <file> [output] | semester-scheduler web [port]";

fn init_tracing() {
    // Logs go to stderr, stdout carries the timetable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = Config::from_env();

    let result = if args.first().map(String::as_str) == Some("web") {
        run_web(config, args.get(1)).await
    } else {
        run_cli(&config, &args)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            let code = err
                .downcast_ref::<ScheduleError>()
                .map(ScheduleError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

/// Reads `<files_dir>/<file>`, prints the timetable and optionally saves it
fn run_cli(config: &Config, args: &[String]) -> anyhow::Result<()> {
    let Some(file) = args.first() else {
        bail!(USAGE);
    };

    let path = config.schedule_path(file);
    let lines = load_course_lines(&path)?;
    info!(path = %path.display(), lines = lines.len(), "loaded course lines");

    let schedule = build_schedule(&lines);
    info!(
        accepted = schedule.roster().len(),
        conflicts = schedule.conflict_log().len(),
        invalid = schedule.invalid_log().len(),
        credits = schedule.total_credits(),
        "schedule built"
    );

    let rendered = render_schedule(&schedule);
    println!("{}", rendered);

    if let Some(output) = args.get(1) {
        write_schedule_to_file(&rendered, output)
            .with_context(|| format!("failed to write schedule to {}", output))?;
        info!(output = %output, "schedule saved");
    }
    Ok(())
}

async fn run_web(mut config: Config, port: Option<&String>) -> anyhow::Result<()> {
    if let Some(port) = port {
        config.port = port
            .parse()
            .with_context(|| format!("invalid port '{}'", port))?;
    }
    web::start_server(config).await.context("web server failed")
}
