//! Action-point price of crossing a single edge.

use fire_rescue_core::{CellCoord, DoorState, GridError, Rules};
use fire_rescue_world::{Edge, Topology};

/// Whether a wall may be crossed by breaching it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WallCrossing {
    /// Walls are obstacles.
    Impassable,
    /// Walls are crossable at the breach surcharge.
    Breachable,
}

/// Prices edges from the rule set.
///
/// The base price is one step, doubled by the carry rule. A closed door adds
/// the opening surcharge and a wall adds the breach surcharge. An edge is
/// never both, so the surcharges never stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MovementCostModel {
    move_cost: u8,
    carry_move_cost: u8,
    breach_cost: u8,
    open_door_cost: u8,
}

impl MovementCostModel {
    /// Extracts the movement prices from a rule set.
    #[must_use]
    pub const fn new(rules: &Rules) -> Self {
        Self {
            move_cost: rules.move_cost,
            carry_move_cost: rules.carry_move_cost,
            breach_cost: rules.breach_cost,
            open_door_cost: rules.open_door_cost,
        }
    }

    /// Price of a step across open space.
    #[must_use]
    pub const fn step_cost(&self, carrying_victim: bool) -> u8 {
        if carrying_victim {
            self.carry_move_cost
        } else {
            self.move_cost
        }
    }

    /// Price of crossing from `from` to `to`, or `None` when the edge cannot
    /// be crossed: the cells are not neighbors, the edge is the grid boundary,
    /// or it is a wall and walls are impassable.
    pub fn edge_cost(
        &self,
        topology: &Topology,
        from: CellCoord,
        to: CellCoord,
        carrying_victim: bool,
        walls: WallCrossing,
    ) -> Result<Option<u8>, GridError> {
        let Some(edge) = topology.edge_between(from, to)? else {
            return Ok(None);
        };
        Ok(self.price(edge, carrying_victim, walls))
    }

    /// Price of crossing an already classified edge.
    #[must_use]
    pub fn price(&self, edge: Edge, carrying_victim: bool, walls: WallCrossing) -> Option<u8> {
        let step = self.step_cost(carrying_victim);
        let surcharge = match edge {
            Edge::Open | Edge::Door(DoorState::Open | DoorState::Destroyed) => 0,
            Edge::Door(DoorState::Closed) => self.open_door_cost,
            Edge::Wall => match walls {
                WallCrossing::Breachable => self.breach_cost,
                WallCrossing::Impassable => return None,
            },
            Edge::Boundary => return None,
        };
        Some(step.saturating_add(surcharge))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> MovementCostModel {
        MovementCostModel::new(&Rules::default())
    }

    #[test]
    fn surcharges_add_to_the_step_price() {
        let model = model();
        assert_eq!(model.price(Edge::Open, false, WallCrossing::Impassable), Some(1));
        assert_eq!(model.price(Edge::Open, true, WallCrossing::Impassable), Some(2));
        assert_eq!(
            model.price(Edge::Door(DoorState::Closed), false, WallCrossing::Impassable),
            Some(2)
        );
        assert_eq!(
            model.price(Edge::Door(DoorState::Destroyed), true, WallCrossing::Impassable),
            Some(2)
        );
        assert_eq!(model.price(Edge::Wall, false, WallCrossing::Breachable), Some(3));
        assert_eq!(model.price(Edge::Wall, true, WallCrossing::Breachable), Some(4));
    }

    #[test]
    fn walls_and_boundaries_can_be_impassable() {
        let model = model();
        assert_eq!(model.price(Edge::Wall, false, WallCrossing::Impassable), None);
        assert_eq!(model.price(Edge::Boundary, false, WallCrossing::Breachable), None);
    }
}
