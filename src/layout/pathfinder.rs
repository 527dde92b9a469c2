//! A* search over the occupancy grid
//!
//! The search graph is the 4-connected grid with a uniform step cost. Cost is
//! compared lexicographically as `(steps, turns)`: the number of cells is the
//! primary cost, so returned paths are always shortest, and among shortest
//! paths the one with the fewest direction changes wins. The heuristic is the
//! Manhattan distance to the goal (with zero turns), which is consistent for
//! this cost, so the first time the goal is popped its path is optimal.
//!
//! A departure heading can be given for the start cell and an arrival heading
//! for the goal; leaving or arriving any other way then counts as a turn, and
//! among paths with equal turns the ones that leave and arrive as requested
//! win.
//!
//! Each `(cell, heading)` state is expanded at most once, which bounds the
//! work to five times the grid's cell count. Per state the search keeps its
//! best cost and a `u32` back-link, 16 bytes in all, so a grid of `n` cells
//! needs about `80 * n` bytes besides the open set.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::grid::{GridCell, Heading, OccupancyGrid};

/// Heading slots per cell: the four headings plus "no heading yet" for the start
const SLOTS: usize = 5;
const START_SLOT: usize = 4;

/// Back-link of a state that was reached from nowhere
const NO_STATE: u32 = u32::MAX;

/// Largest grid whose states can all be addressed by a `u32`
pub const MAX_SEARCH_CELLS: usize = (NO_STATE as usize) / SLOTS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Cost {
    steps: u32,
    turns: u32,
    /// Departures and arrivals against the requested headings
    skew: u32,
}

impl Cost {
    const ZERO: Cost = Cost {
        steps: 0,
        turns: 0,
        skew: 0,
    };

    /// Cost of a state not reached yet; above every real cost
    const UNSEEN: Cost = Cost {
        steps: u32::MAX,
        turns: u32::MAX,
        skew: u32::MAX,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    estimate: Cost,
    cost: Cost,
    seq: u64,
    state: u32,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: lowest estimate first, then newest entry
        other
            .estimate
            .cmp(&self.estimate)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Find a shortest, minimal-turn orthogonal path from `start` to `goal`
///
/// Blocked cells are never entered, except that `start` and `goal`
/// themselves are always traversable (they sit on the endpoint nodes'
/// boundaries and may be covered by a neighbour's padding). Returns `None`
/// when the goal cannot be reached.
pub fn find_path(grid: &OccupancyGrid, start: GridCell, goal: GridCell) -> Option<Vec<GridCell>> {
    find_path_directed(grid, start, goal, None, None)
}

/// [`find_path`] with a preferred heading out of `start` and into `goal`
///
/// The headings only influence which of the shortest paths is returned,
/// never the path length.
pub fn find_path_directed(
    grid: &OccupancyGrid,
    start: GridCell,
    goal: GridCell,
    depart: Option<Heading>,
    arrive: Option<Heading>,
) -> Option<Vec<GridCell>> {
    if start == goal {
        return Some(vec![start]);
    }
    if grid.cell_count() > MAX_SEARCH_CELLS {
        tracing::warn!(cells = grid.cell_count(), "grid too large to search");
        return None;
    }

    let states = grid.cell_count() * SLOTS;
    let mut best: Vec<Cost> = vec![Cost::UNSEEN; states];
    let mut came_from: Vec<u32> = vec![NO_STATE; states];
    let mut heap = BinaryHeap::new();
    let mut seq: u64 = 0;

    let start_state = state_of(grid, start, depart.map_or(START_SLOT, Heading::slot));
    best[start_state as usize] = Cost::ZERO;
    heap.push(Entry {
        estimate: Cost {
            steps: start.manhattan(goal) as u32,
            ..Cost::ZERO
        },
        cost: Cost::ZERO,
        seq,
        state: start_state,
    });

    while let Some(entry) = heap.pop() {
        if best[entry.state as usize] != entry.cost {
            continue;
        }
        let (cell, entry_slot) = cell_of(grid, entry.state);
        if cell == goal {
            return Some(reconstruct(grid, &came_from, entry.state));
        }

        for (heading, next) in grid.neighbors(cell) {
            if next != goal && next != start && grid.is_blocked(next) {
                continue;
            }
            let slot = heading.slot();
            let turned = entry_slot != START_SLOT && entry_slot != slot;
            let sideways_out = turned && entry.cost.steps == 0;
            let sideways_in = next == goal && arrive.is_some_and(|h| h.slot() != slot);
            let cost = Cost {
                steps: entry.cost.steps + 1,
                turns: entry.cost.turns + u32::from(turned) + u32::from(sideways_in),
                skew: entry.cost.skew + u32::from(sideways_out) + u32::from(sideways_in),
            };
            let next_state = state_of(grid, next, slot);
            if best[next_state as usize] <= cost {
                continue;
            }
            best[next_state as usize] = cost;
            came_from[next_state as usize] = entry.state;
            seq += 1;
            heap.push(Entry {
                estimate: Cost {
                    steps: cost.steps + next.manhattan(goal) as u32,
                    ..cost
                },
                cost,
                seq,
                state: next_state,
            });
        }
    }

    None
}

fn state_of(grid: &OccupancyGrid, cell: GridCell, slot: usize) -> u32 {
    // Fits: the cell count is at most MAX_SEARCH_CELLS
    (grid.index(cell) * SLOTS + slot) as u32
}

fn cell_of(grid: &OccupancyGrid, state: u32) -> (GridCell, usize) {
    let state = state as usize;
    let index = state / SLOTS;
    (
        GridCell::new(index % grid.cols(), index / grid.cols()),
        state % SLOTS,
    )
}

fn reconstruct(grid: &OccupancyGrid, came_from: &[u32], goal_state: u32) -> Vec<GridCell> {
    let mut path = vec![cell_of(grid, goal_state).0];
    let mut current = goal_state;
    while came_from[current as usize] != NO_STATE {
        current = came_from[current as usize];
        path.push(cell_of(grid, current).0);
    }
    path.reverse();
    path
}

/// Number of direction changes along a cell path
pub fn count_turns(path: &[GridCell]) -> usize {
    let steps: Vec<(isize, isize)> = path
        .windows(2)
        .map(|w| {
            (
                w[1].col as isize - w[0].col as isize,
                w[1].row as isize - w[0].row as isize,
            )
        })
        .collect();
    steps.windows(2).filter(|s| s[0] != s[1]).count()
}
