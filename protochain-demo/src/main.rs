//! protochain demo driver
//!
//! Builds small prototype graphs and prints how lookups and delegated calls
//! resolve through them.
//!
//! Usage:
//!   protochain-demo --scenario control-point --json

use anyhow::{Context, Result};
use clap::Parser;
use protochain_demo::{run, Scenario};
use tracing::{debug, info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "protochain-demo")]
#[command(about = "Prints prototype chain resolution scenarios")]
struct Args {
    /// Scenario to run
    #[arg(short, long, value_enum, default_value_t = Scenario::All)]
    scenario: Scenario,

    /// Print a JSON snapshot of each scenario's graph
    #[arg(long)]
    json: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.as_str()));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    info!("protochain demo starting...");
    for report in run(args.scenario)? {
        debug!(entities = report.graph.len(), "scenario finished");

        println!("\n== {} ==", report.title);
        for line in &report.lines {
            println!("  {line}");
        }

        if args.json {
            let json = report
                .graph
                .snapshot()
                .to_json_pretty()
                .with_context(|| format!("failed to serialize {}", report.title))?;
            println!("{json}");
        }
    }
    Ok(())
}
