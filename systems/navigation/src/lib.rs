#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Movement pricing and cost-aware path planning over the building topology.

mod cost;

pub use cost::{MovementCostModel, WallCrossing};

use std::{cmp::Reverse, collections::BinaryHeap};

use fire_rescue_core::{BreachPolicy, CellCoord, GridError, Rules};
use fire_rescue_world::Topology;
use log::debug;

/// Total action-point price of a route.
///
/// `Finite` orders before `Unreachable`, so the cheaper of two costs is
/// always the smaller value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathCost {
    /// The goal is reachable for this many action points.
    Finite(u32),
    /// No route reaches the goal.
    Unreachable,
}

impl PathCost {
    /// Finite cost, if any.
    #[must_use]
    pub const fn finite(self) -> Option<u32> {
        match self {
            Self::Finite(cost) => Some(cost),
            Self::Unreachable => None,
        }
    }

    /// Reports whether a route exists.
    #[must_use]
    pub const fn is_reachable(self) -> bool {
        matches!(self, Self::Finite(_))
    }
}

/// Route from a start cell to a goal cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathPlan {
    path: Vec<CellCoord>,
    cost: PathCost,
}

impl PathPlan {
    fn unreachable() -> Self {
        Self {
            path: Vec::new(),
            cost: PathCost::Unreachable,
        }
    }

    /// Cells of the route including the start and the goal. Empty when the
    /// goal is unreachable.
    #[must_use]
    pub fn path(&self) -> &[CellCoord] {
        &self.path
    }

    /// Total price of the route.
    #[must_use]
    pub const fn cost(&self) -> PathCost {
        self.cost
    }

    /// First cell to step onto, if the route leaves the start cell.
    #[must_use]
    pub fn next_step(&self) -> Option<CellCoord> {
        self.path.get(1).copied()
    }
}

/// A* search over [`MovementCostModel`] edge prices.
///
/// The heuristic is the Manhattan distance multiplied by the cheapest step
/// price, which never overestimates because door and breach surcharges are
/// never negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathPlanner {
    model: MovementCostModel,
    breach_policy: BreachPolicy,
}

impl PathPlanner {
    /// Creates a planner pricing moves with the provided rules.
    #[must_use]
    pub fn new(rules: &Rules) -> Self {
        Self {
            model: MovementCostModel::new(rules),
            breach_policy: rules.breach_policy,
        }
    }

    /// Cost model used for edge prices.
    #[must_use]
    pub const fn model(&self) -> &MovementCostModel {
        &self.model
    }

    /// Finds the cheapest route between two cells.
    ///
    /// Closed doors are always crossable at their opening surcharge. Walls
    /// follow the planner's breach policy: with
    /// [`BreachPolicy::WhenNoAlternative`] a breaching route is only returned
    /// when no route avoids walls entirely.
    pub fn find_path(
        &self,
        topology: &Topology,
        start: CellCoord,
        goal: CellCoord,
        carrying_victim: bool,
    ) -> Result<PathPlan, GridError> {
        let plan = match self.breach_policy {
            BreachPolicy::Never => {
                self.search(topology, start, goal, carrying_victim, WallCrossing::Impassable)?
            }
            BreachPolicy::Always => {
                self.search(topology, start, goal, carrying_victim, WallCrossing::Breachable)?
            }
            BreachPolicy::WhenNoAlternative => {
                let plan =
                    self.search(topology, start, goal, carrying_victim, WallCrossing::Impassable)?;
                if plan.cost.is_reachable() {
                    plan
                } else {
                    self.search(topology, start, goal, carrying_victim, WallCrossing::Breachable)?
                }
            }
        };

        debug!(
            "path {start} -> {goal}: {:?} over {} cells",
            plan.cost,
            plan.path.len()
        );
        Ok(plan)
    }

    /// Price of the cheapest route, without the route itself.
    pub fn path_cost(
        &self,
        topology: &Topology,
        start: CellCoord,
        goal: CellCoord,
        carrying_victim: bool,
    ) -> Result<PathCost, GridError> {
        self.find_path(topology, start, goal, carrying_victim)
            .map(|plan| plan.cost)
    }

    fn search(
        &self,
        topology: &Topology,
        start: CellCoord,
        goal: CellCoord,
        carrying_victim: bool,
        walls: WallCrossing,
    ) -> Result<PathPlan, GridError> {
        if !topology.contains(start) {
            return Err(out_of_bounds(topology, start));
        }
        if !topology.contains(goal) {
            return Err(out_of_bounds(topology, goal));
        }
        let width = topology.width();
        let start_index = index(width, start);
        let goal_index = index(width, goal);

        let cell_count = usize::try_from(u64::from(width) * u64::from(topology.height()))
            .unwrap_or(0);
        let mut best = vec![u32::MAX; cell_count];
        let mut came_from: Vec<Option<CellCoord>> = vec![None; cell_count];
        let mut frontier = BinaryHeap::new();
        let step_floor = u32::from(self.model.step_cost(carrying_victim));
        let heuristic = |cell: CellCoord| cell.manhattan_distance(goal) * step_floor;

        best[start_index] = 0;
        frontier.push(Reverse((heuristic(start), 0_u32, start)));

        while let Some(Reverse((_, cost, cell))) = frontier.pop() {
            let current = index(width, cell);
            if cost > best[current] {
                continue;
            }
            if current == goal_index {
                return Ok(PathPlan {
                    path: reconstruct(&came_from, width, start, goal),
                    cost: PathCost::Finite(cost),
                });
            }

            for neighbor in topology.neighbors(cell)? {
                let Some(edge_cost) =
                    self.model
                        .edge_cost(topology, cell, neighbor, carrying_victim, walls)?
                else {
                    continue;
                };
                let next_cost = cost.saturating_add(u32::from(edge_cost));
                let next = index(width, neighbor);
                if next_cost < best[next] {
                    best[next] = next_cost;
                    came_from[next] = Some(cell);
                    let estimate = next_cost.saturating_add(heuristic(neighbor));
                    frontier.push(Reverse((estimate, next_cost, neighbor)));
                }
            }
        }

        Ok(PathPlan::unreachable())
    }
}

fn index(width: u32, cell: CellCoord) -> usize {
    let row = usize::try_from(cell.row()).unwrap_or(usize::MAX);
    let column = usize::try_from(cell.column()).unwrap_or(usize::MAX);
    let width = usize::try_from(width).unwrap_or(0);
    row.saturating_mul(width).saturating_add(column)
}

fn out_of_bounds(topology: &Topology, cell: CellCoord) -> GridError {
    GridError::OutOfBounds {
        cell,
        width: topology.width(),
        height: topology.height(),
    }
}

fn reconstruct(
    came_from: &[Option<CellCoord>],
    width: u32,
    start: CellCoord,
    goal: CellCoord,
) -> Vec<CellCoord> {
    let mut path = vec![goal];
    let mut cell = goal;
    while cell != start {
        let Some(previous) = came_from.get(index(width, cell)).copied().flatten() else {
            break;
        };
        path.push(previous);
        cell = previous;
    }
    path.reverse();
    path
}
