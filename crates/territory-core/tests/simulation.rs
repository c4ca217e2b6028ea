//! Multi-tick runs through the public API.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use territory_core::config::{SimulationBoundsConfig, SimulationConfig};
use territory_core::draws::{DrawSource, SeededDraws};
use territory_core::operator::{OperatorState, SimulationEndReason};
use territory_core::runner::{NoOpCallback, TickCallback, run_simulation};
use territory_core::setup::build_state;
use territory_core::tick::{SimulationState, TickSummary, run_tick};
use territory_core::transition::next_owner;
use territory_types::{Direction, InputEvent, Owner, Point};
use tokio::sync::mpsc;

fn small_config() -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.world.width = 24;
    config.world.height = 16;
    if let Some(enemy) = config.agents.get_mut(1) {
        enemy.start = Point::new(18, 12);
        enemy.random_seeds = 6;
    }
    if let Some(david) = config.agents.first_mut() {
        david.seed_cells = vec![Point::new(2, 2), Point::new(3, 2)];
        david.random_seeds = 4;
    }
    config
}

/// Recompute one tick by hand, visiting cells from the last index down.
fn reverse_order_tick(state: &SimulationState, draws: &dyn DrawSource) -> Vec<Owner> {
    let tick = state.clock.tick().checked_add(1).unwrap();
    let positions = state.roster.positions();
    let view = state.grid.view();
    let size = state.grid.size();
    let count = size.cell_count().unwrap();

    let mut next = vec![None; count];
    for index in (0..count).rev() {
        let cell = size.point_of(index).unwrap();
        let owner = next_owner(
            cell,
            &view,
            &positions,
            &state.influence,
            draws.draws(tick, index),
        );
        *next.get_mut(index).unwrap() = owner;
    }
    next
}

#[test]
fn visit_order_does_not_change_the_result() {
    let draws = SeededDraws::new(2024);
    let (mut state, _) = build_state(&small_config(), 11).unwrap();

    for _ in 0..20 {
        let expected = reverse_order_tick(&state, &draws);
        run_tick(&mut state, &draws).unwrap();
        assert_eq!(state.grid.view().cells(), expected.as_slice());
    }
}

#[test]
fn territory_always_partitions_the_grid() {
    let draws = SeededDraws::new(99);
    let (mut state, _) = build_state(&small_config(), 3).unwrap();
    let cell_count = state.grid.size().cell_count().unwrap();

    for _ in 0..50 {
        let summary = run_tick(&mut state, &draws).unwrap();
        let owned: usize = summary.territory.per_agent.iter().sum();
        assert_eq!(owned.checked_add(summary.territory.unowned), Some(cell_count));
        assert_eq!(summary.territory.per_agent.len(), 2);
        assert!(state.grid.next_view().cells().iter().all(Option::is_none));
        assert!(
            state
                .grid
                .view()
                .cells()
                .iter()
                .flatten()
                .all(|owner| owner.index() < 2)
        );
    }
}

#[test]
fn identical_seeds_replay_identically() {
    let draws = SeededDraws::new(5);
    let (mut first, _) = build_state(&small_config(), 8).unwrap();
    let (mut second, _) = build_state(&small_config(), 8).unwrap();
    for _ in 0..25 {
        assert_eq!(
            run_tick(&mut first, &draws).unwrap(),
            run_tick(&mut second, &draws).unwrap()
        );
    }
    assert_eq!(first.grid, second.grid);
}

#[tokio::test]
async fn keyboard_driven_run_keeps_avatar_in_bounds() {
    struct Bounds {
        violations: usize,
    }
    impl TickCallback for Bounds {
        fn on_tick(&mut self, _summary: &TickSummary, state: &SimulationState) {
            let size = state.roster.bounds();
            if state.roster.iter().any(|agent| !size.contains(agent.position())) {
                self.violations = self.violations.saturating_add(1);
            }
        }
    }

    let (mut state, _) = build_state(&small_config(), 1).unwrap();
    let bounds = SimulationBoundsConfig {
        max_ticks: 60,
        max_real_time_seconds: 0,
    };
    let operator = Arc::new(OperatorState::new(0, &bounds));
    let (tx, mut rx) = mpsc::unbounded_channel();
    for _ in 0..30 {
        tx.send(InputEvent::Move(Direction::Left)).unwrap();
        tx.send(InputEvent::Move(Direction::Up)).unwrap();
    }
    let mut cb = Bounds { violations: 0 };

    let result = run_simulation(&mut state, &SeededDraws::new(4), &operator, &mut rx, &mut cb)
        .await
        .unwrap();

    assert_eq!(result.end_reason, SimulationEndReason::MaxTicksReached);
    assert_eq!(result.total_ticks, 60);
    assert_eq!(cb.violations, 0);
    let david = state.roster.get(state.controlled).unwrap();
    assert_eq!(david.position(), Point::new(0, 0));
}

#[tokio::test]
async fn terminate_from_another_task_stops_the_run() {
    let (mut state, _) = build_state(&small_config(), 1).unwrap();
    let operator = Arc::new(OperatorState::new(1, &SimulationBoundsConfig::default()));
    let (tx, mut rx) = mpsc::unbounded_channel();

    let sender = tokio::spawn(async move {
        tokio::time::sleep(tokio::time::Duration::from_millis(20)).await;
        tx.send(InputEvent::Terminate).unwrap();
    });

    let result = run_simulation(
        &mut state,
        &SeededDraws::new(4),
        &operator,
        &mut rx,
        &mut NoOpCallback,
    )
    .await
    .unwrap();
    sender.await.unwrap();

    assert_eq!(result.end_reason, SimulationEndReason::TerminateRequested);
    assert_eq!(result.total_ticks, state.clock.tick());
}
