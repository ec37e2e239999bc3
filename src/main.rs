use anyhow::{Context, Result};
use clap::Parser;
use pokemon_arena::{EngineConfig, EventBus, Scenario};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Run a scripted battle and print its event log.
#[derive(Parser)]
#[command(name = "pokemon-arena")]
#[command(about = "Run a scripted battle scenario", long_about = None)]
#[command(version)]
struct Cli {
    /// Scenario file (RON)
    scenario: PathBuf,

    /// Engine config (RON) replacing the scenario's own config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the events as JSON instead of battle messages
    #[arg(long)]
    json: bool,
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let options = Cli::parse();

    let mut scenario = Scenario::load(&options.scenario)
        .with_context(|| format!("loading scenario {}", options.scenario.display()))?;
    if let Some(path) = &options.config {
        scenario.config = EngineConfig::load(path)
            .with_context(|| format!("loading engine config {}", path.display()))?;
    }

    let outcome = scenario
        .run()
        .with_context(|| format!("running scenario '{}'", scenario.name))?;

    let mut bus = EventBus::new();
    for event in outcome.events {
        bus.push(event);
    }
    if options.json {
        println!("{}", bus.to_json().context("serializing events")?);
    } else {
        bus.print_formatted();
        println!(
            "Result: {:?} after {} turn(s)",
            outcome.game_state, outcome.turns_played
        );
    }
    Ok(())
}
