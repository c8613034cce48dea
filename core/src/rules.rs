//! Tunable rule constants shared by the world and the systems.

use serde::{Deserialize, Serialize};

/// Whether agents may chop through walls while travelling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreachPolicy {
    /// Walls are always obstacles.
    Never,
    /// Walls are crossable only when no route avoids them.
    #[default]
    WhenNoAlternative,
    /// Walls are always crossable at the breach surcharge.
    Always,
}

/// Order in which agents take their turns within a round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnOrder {
    /// Ascending agent identifier every round.
    #[default]
    Fixed,
    /// Reshuffled with the seeded generator at the start of every round.
    Shuffled,
}

/// Complete rule set of a simulation.
///
/// Defaults reproduce the board game: 4 AP per turn banked up to 8, a wall
/// falls after two hits, and the game ends at 24 damage, 4 lost victims or 7
/// rescued ones.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Action points granted at the start of every turn.
    pub ap_per_turn: u8,
    /// Ceiling on banked action points; overflow is discarded.
    pub max_ap: u8,
    /// Action points an agent holds when it enters the board.
    pub starting_ap: u8,
    /// An agent keeps acting while it holds at least this many points.
    pub turn_threshold: u8,
    /// Price of a plain step.
    pub move_cost: u8,
    /// Price of a step while carrying a victim.
    pub carry_move_cost: u8,
    /// Price of clearing smoke.
    pub extinguish_smoke_cost: u8,
    /// Price of clearing fire.
    pub extinguish_fire_cost: u8,
    /// Surcharge of chopping at a wall.
    pub breach_cost: u8,
    /// Surcharge of opening a closed door.
    pub open_door_cost: u8,
    /// Price of closing an open door.
    pub close_door_cost: u8,
    /// Price of turning a point of interest over.
    pub reveal_cost: u8,
    /// Structural damage that collapses the building.
    pub damage_limit: u32,
    /// Lost victims that end the game.
    pub lost_limit: u32,
    /// Rescued victims that win the game.
    pub rescue_target: u32,
    /// Outstanding points of interest kept on the board by replenishment.
    pub min_outstanding_pois: u32,
    /// Victims available to replenishment.
    pub victim_pool: u32,
    /// False alarms available to replenishment.
    pub false_alarm_pool: u32,
    /// Wall crossing policy used by path planning.
    pub breach_policy: BreachPolicy,
    /// Turn order policy used by the round controller.
    pub turn_order: TurnOrder,
}

impl Rules {
    /// Price of a single step for an agent with the provided carry state.
    #[must_use]
    pub const fn step_cost(&self, carrying_victim: bool) -> u8 {
        if carrying_victim {
            self.carry_move_cost
        } else {
            self.move_cost
        }
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            ap_per_turn: 4,
            max_ap: 8,
            starting_ap: 4,
            turn_threshold: 4,
            move_cost: 1,
            carry_move_cost: 2,
            extinguish_smoke_cost: 1,
            extinguish_fire_cost: 2,
            breach_cost: 2,
            open_door_cost: 1,
            close_door_cost: 1,
            reveal_cost: 1,
            damage_limit: 24,
            lost_limit: 4,
            rescue_target: 7,
            min_outstanding_pois: 3,
            victim_pool: 8,
            false_alarm_pool: 4,
            breach_policy: BreachPolicy::WhenNoAlternative,
            turn_order: TurnOrder::Fixed,
        }
    }
}
