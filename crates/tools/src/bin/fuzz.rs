use std::collections::BTreeSet;

use anyhow::{Result, bail};
use chase_core::{DifficultyTable, Direction, EntityKind, Simulation, Tier, ghost::MOVE_HISTORY_CAPACITY};
use clap::Parser;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

const FUZZ_ARENA: [&str; 9] = [
    "###############",
    "#G.....#.....G#",
    "#.###..#..###.#",
    "#.............#",
    "#.#.###P###.#.#",
    "#.............#",
    "#.###..#..###.#",
    "#G.....#.....G#",
    "###############",
];

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Number of consecutive seeds to sweep, starting at `seed`
    #[arg(short, long, default_value_t = 16)]
    runs: u64,
    #[arg(short, long, default_value_t = 1000)]
    ticks: u32,
}

fn choose<T: Copy>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    slice[rng.next_u64() as usize % slice.len()]
}

fn check_invariants(sim: &Simulation, tier: Tier, seed: u64) -> Result<()> {
    let mut cells = BTreeSet::new();
    for ghost in sim.ghosts() {
        let pos = ghost.pos();
        if sim.arena().is_wall(pos) {
            bail!("Invariant failed: {} inside wall ({tier}, seed {seed})", ghost.id());
        }
        if !cells.insert(pos) {
            bail!("Invariant failed: ghosts overlap at {pos:?} ({tier}, seed {seed})");
        }
        if ghost.recent_moves().len() > MOVE_HISTORY_CAPACITY {
            bail!("Invariant failed: move history overflow ({tier}, seed {seed})");
        }
        if ghost.idle_count() > 5 || ghost.is_cycling() {
            bail!("Invariant failed: {} stuck without reset ({tier}, seed {seed})", ghost.id());
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let table = DifficultyTable::default();

    println!(
        "Starting fuzz harness on seeds {}..{} for max {} ticks...",
        args.seed,
        args.seed + args.runs,
        args.ticks
    );
    for seed in args.seed..args.seed + args.runs {
        for tier in Tier::ALL {
            let mut sim = Simulation::from_rows(seed, table.clone(), tier, &FUZZ_ARENA)?;
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut captures = 0;

            for _ in 0..args.ticks {
                sim.step();
                if sim.outcome().is_some() {
                    captures += 1;
                    sim.reset_round()?;
                    continue;
                }
                check_invariants(&sim, tier, seed)?;

                if let Some(target) = sim.arena().target() {
                    let next = target.step(choose(&mut rng, &Direction::ALL), 1);
                    if sim.arena().cell(next) == Some(EntityKind::Empty) {
                        sim.place_target(next)?;
                    }
                }
            }
            println!("seed {seed} {tier}: {captures} captures, hash {}", sim.snapshot_hash());
        }
    }

    println!("All invariants held.");
    Ok(())
}
