use std::collections::BTreeSet;

use chase_core::{
    Behavior, DifficultyTable, Direction, EntityKind, MoveOutcome, Pos, Simulation, Tier,
    ghost::MOVE_HISTORY_CAPACITY,
};
use proptest::{
    arbitrary::any,
    test_runner::{Config as ProptestConfig, TestCaseError, TestRunner},
};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

const LAYOUT: [&str; 9] = [
    "#############",
    "#G....#....G#",
    "#.##.###.##.#",
    "#...........#",
    "#.#.##.##.#.#",
    "#.....P.....#",
    "#.##.#.#.##.#",
    "#G....#....G#",
    "#############",
];

fn choose<T: Copy>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    slice[rng.next_u64() as usize % slice.len()]
}

fn run_fuzz_simulation(sim_seed: u64, host_seed: u64, max_ticks: u32) -> Result<(), String> {
    let mut host = ChaCha8Rng::seed_from_u64(host_seed);
    let tier = choose(&mut host, &Tier::ALL);
    let mut sim = Simulation::from_rows(sim_seed, DifficultyTable::default(), tier, &LAYOUT)
        .map_err(|err| err.to_string())?;
    let profile = sim.table().profile(tier).clone();

    for _ in 0..max_ticks {
        let reports = sim.step();
        if sim.outcome().is_some() {
            sim.reset_round().map_err(|err| err.to_string())?;
            if sim.ghosts().any(|ghost| ghost.hunt_cooldown() > 0 || !ghost.recent_moves().is_empty()) {
                return Err(format!("restarted round kept old ghost state on seed {sim_seed}"));
            }
            continue;
        }

        for report in &reports {
            if !profile.enables(report.behavior) && report.behavior != Behavior::Random {
                return Err(format!("{tier} ghost used disabled {:?} on seed {sim_seed}", report.behavior));
            }
            if matches!(report.outcome, MoveOutcome::Moved { .. }) && report.direction.is_none() {
                return Err(format!("move without a direction on seed {sim_seed}"));
            }
        }

        let mut cells = BTreeSet::new();
        for ghost in sim.ghosts() {
            let pos = ghost.pos();
            if sim.arena().is_wall(pos) {
                return Err(format!("{} inside wall at {pos:?} on seed {sim_seed}", ghost.id()));
            }
            if !cells.insert(pos) {
                return Err(format!("two ghosts share {pos:?} on seed {sim_seed}"));
            }
            if sim.arena().ghost_at(pos) != Some(ghost.id()) {
                return Err(format!("arena lost track of {} on seed {sim_seed}", ghost.id()));
            }
            if ghost.recent_moves().len() > MOVE_HISTORY_CAPACITY {
                return Err(format!("move history overflow on seed {sim_seed}"));
            }
            if ghost.hunt_cooldown() > 10 || ghost.blocking_remaining() > 5 {
                return Err(format!("timer out of range for {} on seed {sim_seed}", ghost.id()));
            }
            if ghost.idle_count() > 5 {
                return Err(format!("idle ghost {} was never reset on seed {sim_seed}", ghost.id()));
            }
            if ghost.is_cycling() {
                return Err(format!("cycling ghost {} was never reset on seed {sim_seed}", ghost.id()));
            }
        }

        // Host nudges the target now and then, as a fleeing player would.
        if host.next_u64() % 4 == 0
            && let Some(target) = sim.arena().target()
        {
            let direction = choose(&mut host, &Direction::ALL);
            let next = target.step(direction, 1);
            if sim.arena().cell(next) == Some(EntityKind::Empty) {
                sim.place_target(next).map_err(|err| err.to_string())?;
            }
        }
    }

    Ok(())
}

#[test]
fn test_fuzz_ghost_simulation() {
    let mut runner = TestRunner::new(ProptestConfig::with_cases(24));
    let seeds = (any::<u64>(), any::<u64>());

    runner
        .run(&seeds, |(sim_seed, host_seed)| {
            run_fuzz_simulation(sim_seed, host_seed, 400).map_err(TestCaseError::fail)?;
            Ok(())
        })
        .expect("semantic fuzz simulation should preserve invariants");
}

#[test]
fn test_target_never_ends_up_inside_a_wall() {
    let mut sim = Simulation::from_rows(1, DifficultyTable::default(), Tier::Easy, &LAYOUT)
        .expect("layout should parse");
    assert!(sim.place_target(Pos { y: 0, x: 0 }).is_err());
    assert_eq!(sim.arena().target(), Some(Pos { y: 5, x: 6 }));
}
