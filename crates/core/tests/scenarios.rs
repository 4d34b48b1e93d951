use chase_core::{
    AdvanceStopReason, Behavior, DifficultyTable, Direction, GhostId, LogEvent, MoveOutcome,
    Pos, ResetCause, RoundOutcome, Simulation, Tier, Trigger,
};

fn sim(seed: u64, tier: Tier, rows: &[&str]) -> Simulation {
    Simulation::from_rows(seed, DifficultyTable::default(), tier, rows).expect("scenario layout")
}

#[test]
fn medium_ghost_hunts_target_three_cells_east() {
    let mut sim = sim(7, Tier::Medium, &["#########", "#G..P...#", "#########"]);

    let reports = sim.step();

    let report = reports[0];
    assert_eq!(report.trigger, Some(Trigger::DirectSighting));
    assert_eq!(report.behavior, Behavior::Hunt);
    assert_eq!(report.direction, Some(Direction::Right));
    assert_eq!(report.outcome, MoveOutcome::Moved { from: Pos { y: 1, x: 1 }, to: Pos { y: 1, x: 2 } });

    let record = sim.blackboard().record(GhostId(1)).expect("sighting on the blackboard");
    assert_eq!(record.target, Pos { y: 1, x: 4 });
    assert_eq!(record.heading, Some(Direction::Right));
    assert_eq!(record.observed_at, 1);
    assert!(sim.log().contains(&LogEvent::SightingReported { ghost: GhostId(1), target: Pos { y: 1, x: 4 } }));
}

#[test]
fn hunting_ghost_catches_target_down_a_corridor() {
    let mut sim = sim(7, Tier::Medium, &["#########", "#G..P...#", "#########"]);

    let result = sim.advance(10);

    assert_eq!(result.simulated_ticks, 3);
    assert!(matches!(
        result.stop_reason,
        AdvanceStopReason::Finished(RoundOutcome::Caught { by: GhostId(1), at: Pos { y: 1, x: 4 } })
    ));
    let ghost = sim.ghost(GhostId(1)).expect("ghost");
    assert_eq!(ghost.pos(), Pos { y: 1, x: 3 }, "capturing ghost keeps its cell");
}

#[test]
fn blind_ghost_pursues_relayed_sighting() {
    let mut sim = sim(
        11,
        Tier::Medium,
        &["#########", "#G..P...#", "#.#####.#", "#......G#", "#########"],
    );

    let reports = sim.step();

    assert_eq!(reports[0].trigger, Some(Trigger::DirectSighting));
    let relayed = reports[1];
    assert_eq!(relayed.ghost, GhostId(2));
    assert_eq!(relayed.trigger, Some(Trigger::RelayedSighting));
    assert_eq!(relayed.behavior, Behavior::Hunt);
    assert_eq!(relayed.direction, Some(Direction::Left));

    let follower = sim.ghost(GhostId(2)).expect("ghost");
    assert_eq!(follower.hunt_cooldown(), 4);
    assert_eq!(follower.last_known_target().map(|r| r.target), Some(Pos { y: 1, x: 4 }));
}

#[test]
fn easy_ghosts_never_hunt_or_report() {
    let mut sim = sim(3, Tier::Easy, &["#########", "#G..P...#", "#.......#", "#G......#", "#########"]);

    for _ in 0..40 {
        for report in sim.step() {
            assert_ne!(report.behavior, Behavior::Hunt);
            assert_ne!(report.behavior, Behavior::Block);
            assert_ne!(report.trigger, Some(Trigger::DirectSighting));
        }
        assert!(sim.blackboard().is_empty());
    }
}

#[test]
fn boxed_in_ghost_resets_after_six_idle_ticks() {
    let mut sim = sim(5, Tier::Hard, &["#####", "#G#.#", "#####"]);

    for _ in 0..6 {
        sim.step();
    }
    assert!(!sim.log().iter().any(|event| matches!(event, LogEvent::BehaviorReset { .. })));

    sim.step();
    assert!(sim.log().contains(&LogEvent::BehaviorReset { ghost: GhostId(1), cause: ResetCause::Idle }));
    assert_eq!(sim.ghost(GhostId(1)).map(|g| g.idle_count()), Some(0));
}

#[test]
fn hunt_cooldown_only_drops_between_sightings() {
    let layout = [
        "###########",
        "#G.......G#",
        "#.###.###.#",
        "#....P....#",
        "#.###.###.#",
        "#G.......G#",
        "###########",
    ];
    for seed in 0..8 {
        let mut sim = sim(seed, Tier::Hard, &layout);
        let mut previous = vec![0_u32; 5];
        for _ in 0..60 {
            for report in sim.step() {
                let ghost = sim.ghost(report.ghost).expect("ghost");
                let now = ghost.hunt_cooldown();
                let prev = previous[report.ghost.0 as usize];
                match report.trigger {
                    _ if report.reset.is_some() => assert_eq!(now, 0),
                    Some(Trigger::DirectSighting) => assert_eq!(now, 9),
                    Some(Trigger::RelayedSighting) => assert_eq!(now, 4),
                    _ => assert_eq!(now, prev.saturating_sub(1), "seed {seed}"),
                }
                previous[report.ghost.0 as usize] = now;
            }
            if sim.outcome().is_some() {
                break;
            }
        }
    }
}

#[test]
fn hard_ghosts_cooperate_when_close() {
    let layout = ["#########", "#.......#", "#.G.G...#", "#.......#", "#########"];
    let cooperated = (0..32).any(|seed| {
        let mut sim = sim(seed, Tier::Hard, &layout);
        (0..20).any(|_| sim.step().iter().any(|report| report.trigger == Some(Trigger::Cooperation)))
    });
    assert!(cooperated, "a 60% cooperation roll never fired across 32 seeds");
}
