use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chase_core::{
    Behavior, DifficultyTable, Direction, EntityKind, Pos, RoundOutcome, Simulation, Tier,
};
use clap::{Parser, Subcommand};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use serde::Serialize;
use tracing::Level;
use tracing_subscriber::EnvFilter;

const DEMO_ARENA: [&str; 11] = [
    "###################",
    "#G.......#.......G#",
    "#.##.###.#.###.##.#",
    "#.................#",
    "#.##.#.#####.#.##.#",
    "#....#...P...#....#",
    "####.###.#.###.####",
    "#.................#",
    "#.##.###.#.###.##.#",
    "#G.......#.......G#",
    "###################",
];

#[derive(Parser)]
#[command(author, version, about = "Headless driver for the ghost behavior engine", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one round on the built-in arena and print a summary
    Run {
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value = "medium")]
        tier: Tier,
        #[arg(short, long, default_value_t = 500)]
        ticks: u32,
        /// TOML file overriding the built-in difficulty table
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Let the target drift randomly between ticks
        #[arg(long)]
        wander: bool,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print every difficulty tier with its tuning
    Tiers {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct RunSummary {
    seed: u64,
    tier: Tier,
    ticks: u64,
    caught_by: Option<u32>,
    caught_at: Option<Pos>,
    behavior_ticks: BTreeMap<Behavior, u32>,
    resets: u32,
    snapshot_hash: u64,
}

fn load_table(config: Option<&PathBuf>) -> Result<DifficultyTable> {
    match config {
        Some(path) => DifficultyTable::load(path)
            .with_context(|| format!("Failed to load difficulty table: {}", path.display())),
        None => Ok(DifficultyTable::default()),
    }
}

fn nudge_target(sim: &mut Simulation, rng: &mut ChaCha8Rng) -> Result<()> {
    let Some(target) = sim.arena().target() else {
        return Ok(());
    };
    let direction = Direction::ALL[rng.next_u64() as usize % Direction::ALL.len()];
    let next = target.step(direction, 1);
    if sim.arena().cell(next) == Some(EntityKind::Empty) {
        sim.place_target(next).context("Failed to move target")?;
    }
    Ok(())
}

fn run(seed: u64, tier: Tier, ticks: u32, table: DifficultyTable, wander: bool) -> Result<RunSummary> {
    let mut sim = Simulation::from_rows(seed, table, tier, &DEMO_ARENA)
        .context("Built-in arena failed to load")?;
    let mut target_rng = ChaCha8Rng::seed_from_u64(seed ^ 0x7A26_E7);
    let mut behavior_ticks = BTreeMap::new();
    let mut resets = 0;

    for _ in 0..ticks {
        for report in sim.step() {
            *behavior_ticks.entry(report.behavior).or_insert(0) += 1;
            resets += u32::from(report.reset.is_some());
        }
        if sim.outcome().is_some() {
            break;
        }
        if wander {
            nudge_target(&mut sim, &mut target_rng)?;
        }
    }

    let (caught_by, caught_at) = match sim.outcome() {
        Some(RoundOutcome::Caught { by, at }) => (Some(by.0), Some(at)),
        None => (None, None),
    };
    Ok(RunSummary {
        seed,
        tier,
        ticks: sim.current_tick(),
        caught_by,
        caught_at,
        behavior_ticks,
        resets,
        snapshot_hash: sim.snapshot_hash(),
    })
}

fn print_tiers(table: &DifficultyTable) {
    for tier in Tier::ALL {
        let profile = table.profile(tier);
        println!("{tier}");
        for line in tier.summary() {
            println!("  - {line}");
        }
        println!(
            "  vision {} / agent vision {} / target vision {} / cooperation {:.0}%",
            profile.vision_range,
            profile.agent_vision_range,
            profile.target_vision_range,
            profile.cooperation_chance * 100.0
        );
        let behaviors: Vec<String> =
            profile.enabled_behaviors.iter().map(|behavior| format!("{behavior:?}")).collect();
        println!("  behaviors: {}", behaviors.join(", "));
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(io::stderr)
        .init();

    match Args::parse().command {
        Command::Run { seed, tier, ticks, config, wander, json } => {
            let table = load_table(config.as_ref())?;
            let summary = run(seed, tier, ticks, table, wander)?;
            if json {
                let text = serde_json::to_string_pretty(&summary)
                    .context("Failed to serialize run summary")?;
                println!("{text}");
            } else {
                println!("Run complete.");
                println!("Seed: {} Tier: {}", summary.seed, summary.tier);
                println!("Ticks: {}", summary.ticks);
                match (summary.caught_by, summary.caught_at) {
                    (Some(ghost), Some(at)) => println!("Caught by ghost#{ghost} at {at:?}"),
                    _ => println!("Target escaped"),
                }
                for (behavior, count) in &summary.behavior_ticks {
                    println!("{behavior:?}: {count} ghost-ticks");
                }
                println!("Resets: {}", summary.resets);
                println!("Snapshot Hash: {}", summary.snapshot_hash);
            }
        }
        Command::Tiers { config } => {
            let table = load_table(config.as_ref())?;
            print_tiers(&table);
        }
    }

    Ok(())
}
