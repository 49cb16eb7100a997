use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use vehicle_shared::Scenario;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless steering and flocking simulation", long_about = None)]
struct Args {
    /// Scenario file (JSON); the built-in default scenario is used when omitted
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Override the number of ticks to run
    #[arg(short, long)]
    ticks: Option<u32>,

    /// Override the random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the number of agents
    #[arg(short, long)]
    agents: Option<usize>,

    /// Pretty-print the JSON report
    #[arg(short, long)]
    pretty: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let mut scenario = match &args.scenario {
        Some(path) => {
            log::info!("Loading scenario from {}", path.display());
            vehicle_sim::load(path)?
        }
        None => Scenario::default(),
    };
    if let Some(ticks) = args.ticks {
        scenario.ticks = ticks;
    }
    if let Some(seed) = args.seed {
        scenario.seed = seed;
    }
    if let Some(agents) = args.agents {
        scenario.agent_count = agents;
    }

    let report = vehicle_sim::run(&scenario).context("Simulation failed")?;
    log::info!(
        "Finished: centroid ({:.1}, {:.1}), quadtree {} nodes deep {}",
        report.centroid.x,
        report.centroid.y,
        report.quadtree_nodes,
        report.quadtree_depth
    );

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .context("Failed to serialize report")?;
    println!("{}", json);

    Ok(())
}
