//! Per-round grouping of world events for external renderers and transports.

use serde::{Deserialize, Serialize};

use crate::{
    AgentAction, AgentId, CellCoord, Counters, DamageCounter, DoorKey, DoorState, Event,
    HazardLevel, Outcome, Poi, WallMask,
};

/// New value of a cell-addressed property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellChange<T> {
    /// Affected cell.
    pub position: CellCoord,
    /// Value after the change.
    pub new_value: T,
}

/// New state of a door.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorChange {
    /// Affected door.
    pub position: DoorKey,
    /// State after the change.
    pub new_value: DoorState,
}

/// Action performed by an agent during the round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionEntry {
    /// Acting agent.
    pub agent: AgentId,
    /// What the agent did.
    pub action: AgentAction,
    /// Action points left afterwards.
    pub ap_remaining: u8,
}

/// Everything a round changed, grouped by kind, in the order it happened.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changelog {
    /// Round the entries belong to.
    pub round: u32,
    /// Wall mask changes.
    pub walls: Vec<CellChange<WallMask>>,
    /// Damage counter changes.
    pub damage: Vec<CellChange<DamageCounter>>,
    /// Hazard level changes.
    pub hazards: Vec<CellChange<HazardLevel>>,
    /// Point of interest changes.
    pub points_of_interest: Vec<CellChange<Option<Poi>>>,
    /// Door state changes.
    pub doors: Vec<DoorChange>,
    /// Explosion epicentres and shockwave continuation cells.
    pub explosions: Vec<CellCoord>,
    /// Agent actions.
    pub actions: Vec<ActionEntry>,
    /// Global counters at the end of the round.
    pub counters: Counters,
    /// Terminal result reached by the round, if any.
    pub outcome: Option<Outcome>,
}

impl Changelog {
    /// Creates an empty changelog for the provided round.
    #[must_use]
    pub fn new(round: u32) -> Self {
        Self {
            round,
            ..Self::default()
        }
    }

    /// Folds world events into the grouped entries.
    ///
    /// When a cell turns to fire, an earlier smoke entry of the same round for
    /// that cell is dropped so consumers only see the final transition.
    pub fn record(&mut self, events: &[Event]) {
        for event in events {
            match *event {
                Event::WallChanged { cell, mask } => self.walls.push(CellChange {
                    position: cell,
                    new_value: mask,
                }),
                Event::DamageChanged { cell, counter } => self.damage.push(CellChange {
                    position: cell,
                    new_value: counter,
                }),
                Event::HazardChanged { cell, level } => {
                    if level == HazardLevel::Fire {
                        self.hazards.retain(|change| {
                            change.position != cell || change.new_value != HazardLevel::Smoke
                        });
                    }
                    self.hazards.push(CellChange {
                        position: cell,
                        new_value: level,
                    });
                }
                Event::PoiChanged { cell, poi } => self.points_of_interest.push(CellChange {
                    position: cell,
                    new_value: poi,
                }),
                Event::DoorChanged { door, state } => self.doors.push(DoorChange {
                    position: door,
                    new_value: state,
                }),
                Event::Explosion { cell } => self.explosions.push(cell),
                Event::AgentActed {
                    agent,
                    action,
                    ap_remaining,
                    ..
                } => self.actions.push(ActionEntry {
                    agent,
                    action,
                    ap_remaining,
                }),
                _ => {}
            }
        }
    }

    /// Stamps the counters and terminal result observed after the round.
    pub fn close(&mut self, counters: Counters, outcome: Option<Outcome>) {
        self.counters = counters;
        self.outcome = outcome;
    }

    /// Reports whether the round changed nothing observable.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
            && self.damage.is_empty()
            && self.hazards.is_empty()
            && self.points_of_interest.is_empty()
            && self.doors.is_empty()
            && self.explosions.is_empty()
            && self.actions.is_empty()
    }
}
