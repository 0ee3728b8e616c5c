//! `recurrence` — preview and export recurring meeting schedules from the
//! command line.
//!
//! The recurrence configuration is read as JSON (the same camelCase wire form
//! the scheduling form submits) from a file or stdin.

use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use clap::{Args, Parser, Subcommand};
use meeting_recurrence::{
    describe, parse_reference, parse_timezone, preview, to_rrule, RecurrenceConfig,
    EMPTY_PREVIEW_MESSAGE, SAFETY_CAP,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "recurrence", version, about = "Preview and export recurring meeting schedules")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the upcoming occurrences of a recurrence
    Preview(ScheduleArgs),
    /// Print a one-line description of a recurrence
    Describe(ConfigArgs),
    /// Print the recurrence as an RFC 5545 DTSTART + RRULE block
    Rrule(ScheduleArgs),
    /// Check a recurrence for missing or out-of-range fields
    Validate(ConfigArgs),
}

#[derive(Args)]
struct ConfigArgs {
    /// Recurrence config JSON file ("-" for stdin)
    #[arg(short, long, default_value = "-")]
    config: String,
}

#[derive(Args)]
struct ScheduleArgs {
    #[command(flatten)]
    input: ConfigArgs,

    /// Reference "now" (RFC 3339 or YYYY-MM-DD). Defaults to the system clock.
    #[arg(long)]
    now: Option<String>,

    /// IANA timezone the schedule is stepped and printed in
    #[arg(short = 'z', long, default_value = "UTC")]
    timezone: String,

    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    init_tracing();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Preview(args) => run_preview(&args),
        Command::Describe(args) => {
            let config = load_config(&args)?;
            println!("{}", describe(&config));
            Ok(())
        }
        Command::Rrule(args) => run_rrule(&args),
        Command::Validate(args) => {
            let config = load_config(&args)?;
            config.validate().context("invalid recurrence")?;
            println!("ok");
            Ok(())
        }
    }
}

fn run_preview(args: &ScheduleArgs) -> Result<()> {
    let config = load_config(&args.input)?;
    let now = reference_now(args)?;
    let preview = preview(&config, now);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&preview)?);
        return Ok(());
    }

    println!("{}", preview.summary);
    if preview.is_empty() {
        println!("{EMPTY_PREVIEW_MESSAGE}");
        return Ok(());
    }
    for (i, occurrence) in preview.occurrences.iter().enumerate() {
        println!("{:>3}. {}  {}", i + 1, occurrence.local, occurrence.label);
    }
    if preview.truncated {
        println!("(showing the first {SAFETY_CAP} occurrences)");
    }
    Ok(())
}

fn run_rrule(args: &ScheduleArgs) -> Result<()> {
    let config = load_config(&args.input)?;
    let now = reference_now(args)?;
    let rule = to_rrule(&config, now).context("cannot export recurrence")?;

    if args.json {
        println!("{}", serde_json::json!({ "rrule": rule }));
    } else {
        println!("{}", rule.as_deref().unwrap_or("Does not repeat"));
    }
    Ok(())
}

fn load_config(args: &ConfigArgs) -> Result<RecurrenceConfig> {
    let raw = if args.config == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read config from stdin")?;
        buf
    } else {
        fs::read_to_string(&args.config)
            .with_context(|| format!("failed to read config file '{}'", args.config))?
    };
    let config = RecurrenceConfig::from_json(&raw)?;
    debug!(source = %args.config, pattern = ?config.pattern_type, "loaded recurrence config");
    Ok(config)
}

fn reference_now(args: &ScheduleArgs) -> Result<DateTime<Tz>> {
    let tz = parse_timezone(&args.timezone)?;
    match &args.now {
        Some(now) => Ok(parse_reference(now, &tz)?),
        None => Ok(Utc::now().with_timezone(&tz)),
    }
}
