#![forbid(unsafe_code)]

use chrono::Local;
use clap::{Parser, Subcommand};
use residue_cli::{
    check_limits, generate_with_gate, ExitCode, GenerateError, GenerateOutcome, LimitStatus,
    SpendLimits, UnconfiguredGenerator, UsageLedger,
};
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode as ProcessExitCode;

#[derive(Parser)]
#[command(name = "residue")]
#[command(about = "Residue backend operations CLI")]
struct Cli {
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    #[arg(
        long,
        global = true,
        env = "RESIDUE_LEDGER_PATH",
        default_value = "data/imagen_usage.json"
    )]
    ledger: PathBuf,
    #[arg(long, global = true, env = "RESIDUE_DAILY_LIMIT_USD", default_value_t = 5.0)]
    daily_limit_usd: f64,
    #[arg(
        long,
        global = true,
        env = "RESIDUE_MONTHLY_LIMIT_USD",
        default_value_t = 50.0
    )]
    monthly_limit_usd: f64,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Spend-ledger bookkeeping.
    Usage {
        #[command(subcommand)]
        command: UsageCommand,
    },
    /// Generate images through the configured backend, gated on the ledger.
    Generate {
        prompt: String,
        #[arg(long, default_value = "output.png")]
        output: PathBuf,
        #[arg(long, default_value_t = 1)]
        count: u32,
        #[arg(long, default_value = "16:9")]
        aspect: String,
    },
}

#[derive(Subcommand)]
enum UsageCommand {
    /// Append one generation to the ledger without calling any backend.
    Record {
        prompt: String,
        #[arg(long, default_value_t = 1)]
        count: u32,
        #[arg(long, default_value = "1:1")]
        aspect: String,
        #[arg(long)]
        cost_override: Option<f64>,
    },
    /// Current spend against the daily and monthly limits.
    Status,
    /// Status plus all-time totals and the most recent entries.
    Report,
    /// Reinitialize the ledger.
    Reset,
}

fn local_windows() -> (String, String) {
    let now = Local::now();
    (
        now.format("%Y-%m-%d").to_string(),
        now.format("%Y-%m").to_string(),
    )
}

fn print_status(status: &LimitStatus, json_output: bool) {
    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(status).unwrap_or_else(|_| "{}".to_string())
        );
        return;
    }
    println!(
        "today:  {} images  ${:.2} / ${:.2}",
        status.daily_count, status.daily_cost, status.daily_limit
    );
    println!(
        "month:  {} images  ${:.2} / ${:.2}",
        status.monthly_count, status.monthly_cost, status.monthly_limit
    );
    for alert in &status.alerts {
        println!("warning: {alert}");
    }
    if status.alerts.is_empty() {
        println!("within limits");
    }
}

fn run_record(
    cli: &Cli,
    prompt: &str,
    count: u32,
    aspect: &str,
    cost_override: Option<f64>,
) -> Result<ExitCode, String> {
    let limits = limits_of(cli);
    let mut ledger = UsageLedger::load(&cli.ledger).map_err(|e| e.to_string())?;
    ledger.record(prompt, count, aspect, cost_override);
    ledger.save(&cli.ledger).map_err(|e| e.to_string())?;
    let (today, this_month) = local_windows();
    print_status(&check_limits(&ledger, limits, &today, &this_month), cli.json);
    Ok(ExitCode::Success)
}

fn run_status(cli: &Cli) -> Result<ExitCode, String> {
    let ledger = UsageLedger::load(&cli.ledger).map_err(|e| e.to_string())?;
    let (today, this_month) = local_windows();
    print_status(
        &check_limits(&ledger, limits_of(cli), &today, &this_month),
        cli.json,
    );
    Ok(ExitCode::Success)
}

fn run_report(cli: &Cli) -> Result<ExitCode, String> {
    let ledger = UsageLedger::load(&cli.ledger).map_err(|e| e.to_string())?;
    let (today, this_month) = local_windows();
    let status = check_limits(&ledger, limits_of(cli), &today, &this_month);
    if cli.json {
        let recent: Vec<_> = ledger.entries.iter().rev().take(5).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "status": status,
                "total_images": ledger.total_images,
                "total_cost_usd": ledger.total_cost_usd,
                "recent": recent,
            }))
            .unwrap_or_else(|_| "{}".to_string())
        );
        return Ok(ExitCode::Success);
    }
    print_status(&status, false);
    println!(
        "all-time: {} images  ${:.2}",
        ledger.total_images, ledger.total_cost_usd
    );
    if !ledger.entries.is_empty() {
        println!("recent generations:");
        for entry in ledger.entries.iter().rev().take(5) {
            println!(
                "  {} | {} images ${:.2} | {}",
                entry.timestamp.format("%Y-%m-%d %H:%M"),
                entry.num_images,
                entry.cost_usd,
                entry.prompt
            );
        }
    }
    Ok(ExitCode::Success)
}

fn run_reset(cli: &Cli) -> Result<ExitCode, String> {
    UsageLedger::default()
        .save(&cli.ledger)
        .map_err(|e| e.to_string())?;
    if cli.json {
        println!("{}", json!({"reset": true}));
    } else {
        println!("ledger reset");
    }
    Ok(ExitCode::Success)
}

fn run_generate(
    cli: &Cli,
    prompt: &str,
    output: &PathBuf,
    count: u32,
    aspect: &str,
) -> Result<ExitCode, String> {
    let outcome = generate_with_gate(
        &UnconfiguredGenerator,
        &cli.ledger,
        limits_of(cli),
        prompt,
        count,
        aspect,
        output,
    );
    match outcome {
        Ok(GenerateOutcome::Blocked(status)) => {
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({"blocked": true, "status": status}))
                        .unwrap_or_else(|_| "{}".to_string())
                );
            } else {
                println!("generation blocked: spend limit reached");
                print_status(&status, false);
            }
            Ok(ExitCode::LimitBlocked)
        }
        Ok(GenerateOutcome::Generated { saved, status }) => {
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({"saved": saved, "status": status}))
                        .unwrap_or_else(|_| "{}".to_string())
                );
            } else {
                for path in &saved {
                    println!("saved: {}", path.display());
                }
                print_status(&status, false);
            }
            Ok(ExitCode::Success)
        }
        Err(GenerateError::Backend(e)) => {
            eprintln!("image backend error: {e}");
            Ok(ExitCode::DependencyFailure)
        }
        Err(GenerateError::Ledger(e)) => Err(e.to_string()),
    }
}

fn limits_of(cli: &Cli) -> SpendLimits {
    SpendLimits {
        daily_usd: cli.daily_limit_usd,
        monthly_usd: cli.monthly_limit_usd,
    }
}

fn main() -> ProcessExitCode {
    let cli = Cli::parse();
    let result = match &cli.command {
        Commands::Usage { command } => match command {
            UsageCommand::Record {
                prompt,
                count,
                aspect,
                cost_override,
            } => run_record(&cli, prompt, *count, aspect, *cost_override),
            UsageCommand::Status => run_status(&cli),
            UsageCommand::Report => run_report(&cli),
            UsageCommand::Reset => run_reset(&cli),
        },
        Commands::Generate {
            prompt,
            output,
            count,
            aspect,
        } => run_generate(&cli, prompt, output, *count, aspect),
    };
    match result {
        Ok(code) => ProcessExitCode::from(code as u8),
        Err(message) => {
            eprintln!("error: {message}");
            ProcessExitCode::from(ExitCode::Internal as u8)
        }
    }
}
