use std::collections::{BTreeSet, VecDeque};

use pathscape_core::{CellCoord, ConfigError, Grid, Metric, SearchConfig, SearchStatus, StartError};
use pathscape_system_pathfinder::Pathfinder;

fn grid(rows: &[&str]) -> Grid {
    Grid::from_rows(rows).expect("test grid parses")
}

fn chebyshev() -> SearchConfig {
    SearchConfig::default().with_metric(Metric::Chebyshev)
}

fn started(rows: &[&str], config: SearchConfig) -> Pathfinder {
    let mut pathfinder = Pathfinder::new();
    pathfinder.initialise(grid(rows)).expect("grid has endpoints");
    pathfinder.start(config).expect("search starts");
    pathfinder
}

fn coords(points: &[(u32, u32)]) -> Vec<CellCoord> {
    points.iter().map(|&(x, y)| CellCoord::new(x, y)).collect()
}

const OPEN_FIELD: [&str; 5] = ["S....", ".....", ".....", ".....", "....E"];

#[test]
fn open_field_chebyshev_path_is_the_diagonal() {
    let mut pathfinder = started(&OPEN_FIELD, chebyshev());

    assert_eq!(pathfinder.run_to_completion(), SearchStatus::Found);
    assert_eq!(
        pathfinder.current_path(),
        coords(&[(0, 0), (1, 1), (2, 2), (3, 3), (4, 4)]).as_slice()
    );
    assert_eq!(pathfinder.path_cost(), Some(4.0));
    assert_eq!(pathfinder.steps(), 5);
}

#[test]
fn euclidean_path_cost_counts_diagonals_as_root_two() {
    let mut pathfinder = started(&OPEN_FIELD, SearchConfig::default());

    assert_eq!(pathfinder.run_to_completion(), SearchStatus::Found);
    let cost = pathfinder.path_cost().expect("found path has a cost");
    assert!((cost - 4.0 * 2_f64.sqrt()).abs() < 1e-9, "cost was {cost}");
}

#[test]
fn thick_diagonal_wall_proves_unreachability() {
    let rows = [
        "S..##.", //
        "..##..", //
        ".##...", //
        "##....", //
        "#.....", //
        ".....E",
    ];
    let mut pathfinder = started(&rows, chebyshev());

    assert_eq!(pathfinder.run_to_completion(), SearchStatus::NotFound);

    let closed: BTreeSet<CellCoord> = pathfinder.closed_cells().into_iter().collect();
    let reachable = reachable_from(&grid(&rows), CellCoord::new(0, 0));
    assert_eq!(closed, reachable);
    assert_eq!(closed.len(), 6);
    assert!(pathfinder.open_cells().is_empty());
    assert_eq!(pathfinder.path_cost(), None);
}

#[test]
fn tie_break_prefers_candidates_closer_to_the_goal() {
    let rows = [".....", ".....", ".....", ".....", "S...E"];

    let mut plain = started(&rows, chebyshev());
    let mut biased = started(&rows, chebyshev().with_tie_break(true));
    assert_eq!(plain.run_to_completion(), SearchStatus::Found);
    assert_eq!(biased.run_to_completion(), SearchStatus::Found);

    assert_eq!(
        plain.expansion_order(),
        coords(&[
            (0, 4),
            (1, 3),
            (2, 2),
            (2, 3),
            (3, 3),
            (1, 4),
            (2, 4),
            (3, 4),
            (4, 4)
        ])
        .as_slice()
    );
    assert_eq!(
        biased.expansion_order(),
        coords(&[(0, 4), (1, 3), (2, 2), (3, 3), (4, 4)]).as_slice()
    );

    assert_eq!(plain.path_cost(), biased.path_cost());
    let goal = CellCoord::new(4, 4);
    assert!(
        cumulative_heuristic(biased.current_path(), goal)
            <= cumulative_heuristic(plain.current_path(), goal)
    );
}

#[test]
fn cancelling_after_k_steps_freezes_the_partial_path() {
    let mut pathfinder = started(&OPEN_FIELD, chebyshev());

    assert_eq!(pathfinder.step(), SearchStatus::Running);
    assert_eq!(pathfinder.step(), SearchStatus::Running);
    assert!(pathfinder.cancel());

    let frozen = coords(&[(0, 0), (1, 1)]);
    assert_eq!(pathfinder.status(), SearchStatus::Cancelled);
    assert_eq!(pathfinder.current_path(), frozen.as_slice());

    assert_eq!(pathfinder.step(), SearchStatus::Cancelled);
    assert_eq!(pathfinder.run_to_completion(), SearchStatus::Cancelled);
    assert_eq!(pathfinder.steps(), 2);
    assert_eq!(pathfinder.current_path(), frozen.as_slice());
    assert!(!pathfinder.cancel(), "a finished run cannot be cancelled again");
}

#[test]
fn difficulty_penalty_raises_cost_when_difficult_cells_are_unavoidable() {
    let rows = ["S.~..", "..~..", "..~..", "..~..", "..~.E"];

    let cost_for = |multiplier: f64| {
        let mut pathfinder = started(&rows, chebyshev().with_difficulty(multiplier));
        assert_eq!(pathfinder.run_to_completion(), SearchStatus::Found);
        pathfinder.path_cost().expect("found path has a cost")
    };

    assert_eq!(cost_for(0.0), 4.0);
    assert_eq!(cost_for(1.0), 5.0);
    assert_eq!(cost_for(3.5), 7.5);
}

#[test]
fn difficulty_penalty_off_the_shortest_route_leaves_the_path_alone() {
    let rows = ["S...~", ".....", ".....", ".....", "~...E"];

    let run = |multiplier: f64| {
        let mut pathfinder = started(&rows, chebyshev().with_difficulty(multiplier));
        assert_eq!(pathfinder.run_to_completion(), SearchStatus::Found);
        (
            pathfinder.current_path().to_vec(),
            pathfinder.path_cost().expect("found path has a cost"),
        )
    };

    let (cheap_path, cheap_cost) = run(0.0);
    let (dear_path, dear_cost) = run(10.0);
    assert_eq!(cheap_path, dear_path);
    assert_eq!(cheap_cost, dear_cost);
}

#[test]
fn invalid_endpoint_layouts_are_configuration_errors() {
    let mut pathfinder = Pathfinder::new();

    assert_eq!(
        pathfinder.initialise(grid(&["S.S", "...", "..E"])),
        Err(ConfigError::MultipleStarts { count: 2 })
    );
    assert_eq!(
        pathfinder.initialise(grid(&["S..", "...", "..."])),
        Err(ConfigError::NoEnd)
    );
    assert_eq!(
        pathfinder.initialise(grid(&["...", "...", "..E"])),
        Err(ConfigError::NoStart)
    );

    assert!(pathfinder.grid().is_none());
    assert_eq!(pathfinder.status(), SearchStatus::Idle);
    assert_eq!(
        pathfinder.start(chebyshev()),
        Err(StartError::NotInitialised)
    );
    assert_eq!(pathfinder.steps(), 0);
}

#[test]
fn failed_initialise_keeps_the_previous_grid() {
    let mut pathfinder = Pathfinder::new();
    pathfinder
        .initialise(grid(&OPEN_FIELD))
        .expect("grid has endpoints");

    assert_eq!(
        pathfinder.initialise(grid(&["S..", "...", "..."])),
        Err(ConfigError::NoEnd)
    );
    assert_eq!(pathfinder.grid().map(|grid| grid.size()), Some(5));
    pathfinder.start(chebyshev()).expect("search starts");
    assert_eq!(pathfinder.run_to_completion(), SearchStatus::Found);
}

#[test]
fn second_start_while_running_is_rejected_without_side_effects() {
    let mut pathfinder = started(&OPEN_FIELD, chebyshev());
    assert_eq!(pathfinder.step(), SearchStatus::Running);
    let before = pathfinder.report();

    assert_eq!(
        pathfinder.start(SearchConfig::default().with_tie_break(true)),
        Err(StartError::AlreadyRunning)
    );
    assert_eq!(pathfinder.report(), before);
    assert_eq!(pathfinder.config().metric, Metric::Chebyshev);

    assert_eq!(
        pathfinder.initialise(grid(&OPEN_FIELD)),
        Err(ConfigError::SearchInProgress)
    );
    assert_eq!(pathfinder.report(), before);
}

#[test]
fn restarting_from_a_terminal_state_replays_the_same_run() {
    let mut pathfinder = started(&OPEN_FIELD, SearchConfig::default());
    assert_eq!(pathfinder.run_to_completion(), SearchStatus::Found);
    let first_order = pathfinder.expansion_order().to_vec();
    let first_path = pathfinder.current_path().to_vec();

    pathfinder
        .start(SearchConfig::default())
        .expect("restart from found succeeds");
    assert_eq!(pathfinder.steps(), 0);
    assert!(pathfinder.current_path().is_empty());
    assert_eq!(pathfinder.run_to_completion(), SearchStatus::Found);

    assert_eq!(pathfinder.expansion_order(), first_order.as_slice());
    assert_eq!(pathfinder.current_path(), first_path.as_slice());
}

#[test]
fn partial_path_tracks_the_last_selected_node() {
    let mut pathfinder = started(&OPEN_FIELD, chebyshev());

    while pathfinder.step() == SearchStatus::Running {
        let last = *pathfinder
            .expansion_order()
            .last()
            .expect("a running step selects a node");
        let path = pathfinder.current_path();
        assert_eq!(path.first(), Some(&CellCoord::new(0, 0)));
        assert_eq!(path.last(), Some(&last));
        assert_eq!(pathfinder.construct_path(last), path);
        assert!(path.windows(2).all(|pair| pair[0].is_adjacent(pair[1])));
    }
}

#[test]
fn manhattan_metric_still_finds_a_route() {
    let rows = ["S.#..", "..#..", "..#..", ".....", "....E"];
    let mut pathfinder = started(&rows, SearchConfig::default().with_metric(Metric::Manhattan));

    assert_eq!(pathfinder.run_to_completion(), SearchStatus::Found);
    let path = pathfinder.current_path();
    assert_eq!(path.first(), Some(&CellCoord::new(0, 0)));
    assert_eq!(path.last(), Some(&CellCoord::new(4, 4)));
    assert!(path.windows(2).all(|pair| pair[0].is_adjacent(pair[1])));
}

#[test]
fn construct_path_is_empty_for_unreached_cells() {
    let mut pathfinder = started(&OPEN_FIELD, chebyshev());
    assert_eq!(pathfinder.step(), SearchStatus::Running);

    assert!(pathfinder.construct_path(CellCoord::new(4, 0)).is_empty());
    assert!(pathfinder.construct_path(CellCoord::new(9, 9)).is_empty());
    assert_eq!(
        pathfinder.construct_path(CellCoord::new(1, 0)),
        coords(&[(0, 0), (1, 0)])
    );
}

fn reachable_from(grid: &Grid, start: CellCoord) -> BTreeSet<CellCoord> {
    let mut seen = BTreeSet::new();
    let mut queue = VecDeque::from([start]);
    let _ = seen.insert(start);

    while let Some(cell) = queue.pop_front() {
        for neighbor in grid.neighbors(cell) {
            let walkable = grid.terrain(neighbor).is_some_and(|terrain| terrain.is_walkable());
            if walkable && seen.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }
    seen
}

fn cumulative_heuristic(path: &[CellCoord], goal: CellCoord) -> f64 {
    path.iter()
        .map(|&cell| Metric::Chebyshev.distance(cell, goal))
        .sum()
}
