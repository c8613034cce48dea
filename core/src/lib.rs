#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Fire Rescue engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Systems submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then reports [`Event`] values describing exactly
//! what changed. The per-round [`Changelog`] is folded from those events so
//! that transports never need to re-derive the effects of a round.

mod changelog;
mod layout;
mod rules;

pub use changelog::{ActionEntry, CellChange, Changelog, DoorChange};
pub use layout::{Layout, LayoutError, PoiPlacement};
pub use rules::{BreachPolicy, Rules, TurnOrder};

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of damage increments that bring a wall down.
pub const MAX_WALL_DAMAGE: u8 = 2;

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Row zero is the northern edge of the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Cell one step away in the provided direction, if it stays within the grid.
    #[must_use]
    pub fn neighbor(self, direction: Direction, width: u32, height: u32) -> Option<CellCoord> {
        let (column, row) = match direction {
            Direction::North => (self.column, self.row.checked_sub(1)?),
            Direction::West => (self.column.checked_sub(1)?, self.row),
            Direction::South => (self.column, self.row.checked_add(1)?),
            Direction::East => (self.column.checked_add(1)?, self.row),
        };

        if column < width && row < height {
            Some(CellCoord::new(column, row))
        } else {
            None
        }
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Cardinal directions, listed in wall-mask bit order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing row indices.
    North,
    /// Toward decreasing column indices.
    West,
    /// Toward increasing row indices.
    South,
    /// Toward increasing column indices.
    East,
}

impl Direction {
    /// All directions in the order used for masks, counters and neighbor scans.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::West,
        Direction::South,
        Direction::East,
    ];

    /// Direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::West => Self::East,
            Self::South => Self::North,
            Self::East => Self::West,
        }
    }

    /// Slot used by [`DamageCounter`] for this direction.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::North => 0,
            Self::West => 1,
            Self::South => 2,
            Self::East => 3,
        }
    }

    /// Bit carried by [`WallMask`] for this direction.
    #[must_use]
    pub const fn wall_bit(self) -> u8 {
        0b1000 >> self.index()
    }

    /// Direction of travel between two orthogonally adjacent cells.
    #[must_use]
    pub fn between(from: CellCoord, to: CellCoord) -> Option<Direction> {
        let column_diff = from.column().abs_diff(to.column());
        let row_diff = from.row().abs_diff(to.row());

        if column_diff + row_diff != 1 {
            return None;
        }

        if column_diff == 1 {
            if to.column() > from.column() {
                Some(Direction::East)
            } else {
                Some(Direction::West)
            }
        } else if to.row() > from.row() {
            Some(Direction::South)
        } else {
            Some(Direction::North)
        }
    }
}

/// Four-bit wall presence mask of a single cell (north, west, south, east).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WallMask(u8);

impl WallMask {
    /// Mask without any walls.
    pub const EMPTY: WallMask = WallMask(0);

    /// Builds a mask from its raw bits, rejecting values wider than four bits.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        if bits <= 0b1111 {
            Some(Self(bits))
        } else {
            None
        }
    }

    /// Raw four-bit representation.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Reports whether a wall stands on the provided side.
    #[must_use]
    pub const fn has(self, direction: Direction) -> bool {
        self.0 & direction.wall_bit() != 0
    }

    /// Copy of the mask with a wall on the provided side.
    #[must_use]
    pub const fn with(self, direction: Direction) -> Self {
        Self(self.0 | direction.wall_bit())
    }

    /// Copy of the mask with the wall on the provided side removed.
    #[must_use]
    pub const fn without(self, direction: Direction) -> Self {
        Self(self.0 & !direction.wall_bit())
    }
}

/// Per-side wall damage of a single cell, each slot within `0..=MAX_WALL_DAMAGE`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DamageCounter([u8; 4]);

impl DamageCounter {
    /// Damage recorded on the provided side.
    #[must_use]
    pub const fn get(self, direction: Direction) -> u8 {
        self.0[direction.index()]
    }

    /// Copy of the counter with one more increment on the provided side.
    ///
    /// Saturates at [`MAX_WALL_DAMAGE`].
    #[must_use]
    pub fn incremented(self, direction: Direction) -> Self {
        let mut slots = self.0;
        let slot = &mut slots[direction.index()];
        *slot = (*slot + 1).min(MAX_WALL_DAMAGE);
        Self(slots)
    }

    /// Reports whether the provided side reached the destruction threshold.
    #[must_use]
    pub const fn is_broken(self, direction: Direction) -> bool {
        self.get(direction) >= MAX_WALL_DAMAGE
    }

    /// Raw slots in north, west, south, east order.
    #[must_use]
    pub const fn slots(self) -> [u8; 4] {
        self.0
    }
}

/// Canonical key of a door: the unordered pair of cells it separates.
///
/// The smaller coordinate is always stored first so the key serialises stably.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DoorKey {
    first: CellCoord,
    second: CellCoord,
}

impl DoorKey {
    /// Creates the canonical key for the door between two cells.
    #[must_use]
    pub fn new(a: CellCoord, b: CellCoord) -> Self {
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    /// Smaller of the two cells.
    #[must_use]
    pub const fn first(&self) -> CellCoord {
        self.first
    }

    /// Larger of the two cells.
    #[must_use]
    pub const fn second(&self) -> CellCoord {
        self.second
    }

    /// Reports whether the door touches the provided cell.
    #[must_use]
    pub fn touches(&self, cell: CellCoord) -> bool {
        self.first == cell || self.second == cell
    }
}

/// Lifecycle of a door. `Destroyed` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorState {
    /// Blocks hazards; agents may open it at a cost.
    Closed,
    /// Transmits hazards and agents like open space.
    Open,
    /// Blown out by an explosion; behaves like an open door forever.
    Destroyed,
}

impl DoorState {
    /// Reports whether fire, smoke and shockwaves pass through the doorway.
    #[must_use]
    pub const fn transmits(self) -> bool {
        matches!(self, Self::Open | Self::Destroyed)
    }
}

/// Hazard present in a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardLevel {
    /// No hazard.
    #[default]
    Clear,
    /// Smoke that turns into fire when it touches fire.
    Smoke,
    /// Burning cell.
    Fire,
}

impl HazardLevel {
    /// Reports whether the level is smoke or fire.
    #[must_use]
    pub const fn is_hazard(self) -> bool {
        !matches!(self, Self::Clear)
    }
}

/// Identity hidden behind a point of interest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoiKind {
    /// A person waiting to be carried out.
    Victim,
    /// Nothing there.
    FalseAlarm,
}

/// Point of interest lying on a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Poi {
    /// What the marker hides.
    pub kind: PoiKind,
    /// Whether a rescuer has already turned the marker over.
    pub revealed: bool,
}

impl Poi {
    /// Creates a face-down marker.
    #[must_use]
    pub const fn hidden(kind: PoiKind) -> Self {
        Self {
            kind,
            revealed: false,
        }
    }
}

/// Unique identifier assigned to an agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(u32);

impl AgentId {
    /// Creates a new agent identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Specialisation of an agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Reveals points of interest and carries victims to the exits.
    Rescuer,
    /// Hunts hazards through the shared target registry.
    Suppressor,
}

/// Immutable representation of a single agent used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    /// Unique identifier of the agent.
    pub id: AgentId,
    /// Specialisation of the agent.
    pub role: Role,
    /// Cell currently occupied.
    pub cell: CellCoord,
    /// Action points banked for spending.
    pub stored_ap: u8,
    /// Whether the agent carries a victim.
    pub carrying_victim: bool,
    /// Cell the agent is currently heading for.
    pub target: Option<CellCoord>,
}

/// Terminal result of a simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Enough victims were carried out.
    Victory,
    /// The building accumulated too much structural damage.
    StructuralCollapse,
    /// Too many victims perished.
    VictimsLost,
}

impl Outcome {
    /// Reports whether the outcome is a win.
    #[must_use]
    pub const fn is_victory(self) -> bool {
        matches!(self, Self::Victory)
    }
}

/// Monotonic global counters that decide the end of the game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    /// Structural damage accumulated by the building.
    pub damage_points: u32,
    /// Victims carried out through an exit.
    pub people_rescued: u32,
    /// Victims that perished.
    pub people_lost: u32,
}

/// Accounting of every victim that entered the board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VictimLedger {
    /// Victims placed on the board so far, by the scenario or by replenishment.
    pub placed: u32,
    /// Victims carried out.
    pub rescued: u32,
    /// Victims that perished.
    pub lost: u32,
    /// Victims still lying on the board, revealed or not.
    pub on_board: u32,
    /// Victims currently carried by an agent.
    pub carried: u32,
}

impl VictimLedger {
    /// Victims still in play.
    #[must_use]
    pub const fn outstanding(&self) -> u32 {
        self.on_board + self.carried
    }

    /// Reports whether every placed victim is accounted for exactly once.
    #[must_use]
    pub const fn is_balanced(&self) -> bool {
        self.rescued + self.lost + self.outstanding() == self.placed
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Places a new agent on the provided cell.
    SpawnAgent {
        /// Specialisation of the agent.
        role: Role,
        /// Cell the agent starts on.
        cell: CellCoord,
    },
    /// Grants the per-turn action points to an agent.
    BeginTurn {
        /// Agent whose turn starts.
        agent: AgentId,
    },
    /// Records the cell an agent is heading for.
    AssignTarget {
        /// Agent being assigned.
        agent: AgentId,
        /// Destination, or `None` to clear it.
        target: Option<CellCoord>,
    },
    /// Clears smoke or fire on the agent's cell or a reachable neighbor.
    Extinguish {
        /// Acting agent.
        agent: AgentId,
        /// Cell to clear.
        cell: CellCoord,
    },
    /// Opens the closed door between the agent's cell and a neighbor.
    OpenDoor {
        /// Acting agent.
        agent: AgentId,
        /// Neighbor on the other side of the door.
        toward: CellCoord,
    },
    /// Closes the open door between the agent's cell and a neighbor.
    CloseDoor {
        /// Acting agent.
        agent: AgentId,
        /// Neighbor on the other side of the door.
        toward: CellCoord,
    },
    /// Chops at the wall between the agent's cell and a neighbor.
    BreachWall {
        /// Acting agent.
        agent: AgentId,
        /// Neighbor on the other side of the wall.
        toward: CellCoord,
    },
    /// Steps onto an adjacent cell through an open edge.
    Move {
        /// Acting agent.
        agent: AgentId,
        /// Destination cell.
        to: CellCoord,
    },
    /// Turns over the point of interest on the agent's cell.
    RevealPoi {
        /// Acting agent.
        agent: AgentId,
    },
    /// Lifts the revealed victim on the agent's cell.
    PickUpVictim {
        /// Acting agent.
        agent: AgentId,
    },
    /// Hands the carried victim over at an exit.
    DeliverVictim {
        /// Acting agent.
        agent: AgentId,
    },
    /// Moves a knocked-down agent to an exit without spending action points.
    Escape {
        /// Agent being relocated.
        agent: AgentId,
        /// Exit the agent lands on.
        to: CellCoord,
    },
    /// Advances the hazard on a cell, exploding it if it already burns.
    Ignite {
        /// Cell struck by the ignition event.
        cell: CellCoord,
    },
    /// Turns every smoke cell touching fire into fire.
    ResolveSmoke,
    /// Draws a point of interest from the pools onto a cell.
    PlacePoi {
        /// Cell receiving the marker.
        cell: CellCoord,
        /// Pool the marker is drawn from.
        kind: PoiKind,
    },
}

/// Action an agent performed, reported through [`Event::AgentActed`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "action")]
pub enum AgentAction {
    /// Cleared a hazard.
    Extinguish {
        /// Cell that was cleared.
        cell: CellCoord,
        /// Hazard that was removed.
        cleared: HazardLevel,
    },
    /// Opened a door.
    OpenDoor {
        /// Door that was opened.
        door: DoorKey,
    },
    /// Closed a door.
    CloseDoor {
        /// Door that was closed.
        door: DoorKey,
    },
    /// Chopped at a wall.
    BreachWall {
        /// Cell on the agent's side of the wall.
        cell: CellCoord,
        /// Side of the cell that was struck.
        direction: Direction,
    },
    /// Stepped to a neighbor.
    Move {
        /// Cell left behind.
        from: CellCoord,
        /// Cell entered.
        to: CellCoord,
    },
    /// Turned a point of interest over.
    RevealPoi {
        /// Cell of the marker.
        cell: CellCoord,
        /// What the marker turned out to be.
        kind: PoiKind,
    },
    /// Lifted a victim.
    PickUpVictim {
        /// Cell the victim was lying on.
        cell: CellCoord,
    },
    /// Carried a victim out.
    DeliverVictim {
        /// Exit used.
        cell: CellCoord,
    },
    /// Was knocked down and relocated to an exit.
    Escape {
        /// Cell that caught fire.
        from: CellCoord,
        /// Exit reached.
        to: CellCoord,
    },
}

/// Events reported by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that an agent entered the board.
    AgentSpawned {
        /// Identifier allocated to the agent.
        agent: AgentId,
        /// Specialisation of the agent.
        role: Role,
        /// Starting cell.
        cell: CellCoord,
    },
    /// Announces the start of an agent's turn.
    TurnStarted {
        /// Agent whose turn started.
        agent: AgentId,
        /// Action points available after the per-turn grant.
        stored_ap: u8,
    },
    /// Confirms a target change for an agent.
    TargetAssigned {
        /// Agent that was assigned.
        agent: AgentId,
        /// New destination.
        target: Option<CellCoord>,
    },
    /// Confirms an agent action and its price.
    AgentActed {
        /// Acting agent.
        agent: AgentId,
        /// What the agent did.
        action: AgentAction,
        /// Action points spent.
        ap_spent: u8,
        /// Action points left afterwards.
        ap_remaining: u8,
    },
    /// Reports that a command was refused without side effects.
    CommandRejected {
        /// Agent that issued the command, if any.
        agent: Option<AgentId>,
        /// Why the command was refused.
        reason: ActionError,
    },
    /// A cell's wall mask changed.
    WallChanged {
        /// Affected cell.
        cell: CellCoord,
        /// Mask after the change.
        mask: WallMask,
    },
    /// A cell's damage counter changed.
    DamageChanged {
        /// Affected cell.
        cell: CellCoord,
        /// Counter after the change.
        counter: DamageCounter,
    },
    /// A cell's hazard level changed.
    HazardChanged {
        /// Affected cell.
        cell: CellCoord,
        /// Level after the change.
        level: HazardLevel,
    },
    /// A cell's point of interest changed.
    PoiChanged {
        /// Affected cell.
        cell: CellCoord,
        /// Marker after the change.
        poi: Option<Poi>,
    },
    /// A door changed state.
    DoorChanged {
        /// Affected door.
        door: DoorKey,
        /// State after the change.
        state: DoorState,
    },
    /// A shockwave passed through a cell.
    Explosion {
        /// Epicentre or continuation cell.
        cell: CellCoord,
    },
    /// A victim perished.
    VictimLost {
        /// Where the victim was.
        cell: CellCoord,
    },
    /// A victim was carried out.
    VictimRescued {
        /// Exit used.
        cell: CellCoord,
    },
    /// An agent stands on a cell that just caught fire.
    AgentCaughtInFire {
        /// Agent in danger.
        agent: AgentId,
        /// Burning cell.
        cell: CellCoord,
    },
}

/// Reasons a command may be refused by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionError {
    /// The referenced agent does not exist.
    #[error("unknown agent")]
    UnknownAgent,
    /// The agent cannot afford the action.
    #[error("action costs {required} AP but only {available} AP are stored")]
    InsufficientAp {
        /// Price of the action.
        required: u8,
        /// Points the agent holds.
        available: u8,
    },
    /// A referenced cell lies outside the grid.
    #[error("cell lies outside the grid")]
    OutOfBounds,
    /// The referenced cell is neither the agent's cell nor adjacent to it.
    #[error("cell is not adjacent to the agent")]
    NotAdjacent,
    /// A wall or closed door stands in the way.
    #[error("edge is blocked")]
    Blocked,
    /// The cell holds neither smoke nor fire.
    #[error("nothing to extinguish")]
    NothingToExtinguish,
    /// No door separates the cells.
    #[error("no door on that edge")]
    NoDoor,
    /// The door is already in the requested state.
    #[error("door is already in that state")]
    DoorUnchanged,
    /// The door was blown out and can no longer change state.
    #[error("door was destroyed")]
    DoorDestroyed,
    /// No wall separates the cells.
    #[error("no wall on that edge")]
    NoWall,
    /// No point of interest lies on the cell.
    #[error("no point of interest here")]
    NoPoi,
    /// No revealed victim lies on the cell.
    #[error("no revealed victim here")]
    NoVictim,
    /// The agent may not perform the action with its role.
    #[error("role cannot perform this action")]
    WrongRole,
    /// The agent already carries a victim.
    #[error("agent already carries a victim")]
    AlreadyCarrying,
    /// The agent carries nobody.
    #[error("agent carries no victim")]
    NotCarrying,
    /// The cell is not an entry point.
    #[error("cell is not an exit")]
    NotAtExit,
    /// The cell already holds a point of interest.
    #[error("cell already holds a point of interest")]
    CellOccupied,
    /// The requested pool has no markers left.
    #[error("pool is exhausted")]
    PoolExhausted,
}

/// Errors raised by cell-addressed queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The cell lies outside the grid.
    #[error("cell {cell} lies outside the {width}x{height} grid")]
    OutOfBounds {
        /// Offending cell.
        cell: CellCoord,
        /// Grid width.
        width: u32,
        /// Grid height.
        height: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::{
        ActionError, AgentId, CellCoord, DamageCounter, Direction, DoorKey, DoorState,
        HazardLevel, Poi, PoiKind, WallMask, MAX_WALL_DAMAGE,
    };
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn neighbor_respects_grid_bounds() {
        let corner = CellCoord::new(0, 0);
        assert_eq!(corner.neighbor(Direction::North, 10, 8), None);
        assert_eq!(corner.neighbor(Direction::West, 10, 8), None);
        assert_eq!(
            corner.neighbor(Direction::East, 10, 8),
            Some(CellCoord::new(1, 0))
        );
        assert_eq!(CellCoord::new(9, 7).neighbor(Direction::South, 10, 8), None);
    }

    #[test]
    fn direction_between_neighbors() {
        let origin = CellCoord::new(3, 3);
        assert_eq!(
            Direction::between(origin, CellCoord::new(3, 2)),
            Some(Direction::North)
        );
        assert_eq!(
            Direction::between(origin, CellCoord::new(2, 3)),
            Some(Direction::West)
        );
        assert_eq!(
            Direction::between(origin, CellCoord::new(3, 4)),
            Some(Direction::South)
        );
        assert_eq!(
            Direction::between(origin, CellCoord::new(4, 3)),
            Some(Direction::East)
        );
        assert_eq!(Direction::between(origin, CellCoord::new(4, 4)), None);
        assert_eq!(Direction::between(origin, origin), None);
    }

    #[test]
    fn wall_mask_bits_follow_north_west_south_east_order() {
        let mask = WallMask::from_bits(0b1001).expect("four bits");
        assert!(mask.has(Direction::North));
        assert!(!mask.has(Direction::West));
        assert!(!mask.has(Direction::South));
        assert!(mask.has(Direction::East));
        assert_eq!(mask.without(Direction::North).bits(), 0b0001);
        assert_eq!(mask.with(Direction::South).bits(), 0b1011);
        assert!(WallMask::from_bits(0b1_0000).is_none());
    }

    #[test]
    fn damage_counter_saturates_at_maximum() {
        let counter = DamageCounter::default()
            .incremented(Direction::West)
            .incremented(Direction::West)
            .incremented(Direction::West);
        assert_eq!(counter.get(Direction::West), MAX_WALL_DAMAGE);
        assert!(counter.is_broken(Direction::West));
        assert_eq!(counter.get(Direction::East), 0);
    }

    #[test]
    fn door_key_is_order_independent() {
        let a = CellCoord::new(2, 3);
        let b = CellCoord::new(2, 4);
        assert_eq!(DoorKey::new(a, b), DoorKey::new(b, a));
        assert_eq!(DoorKey::new(b, a).first(), a);
        assert!(DoorKey::new(a, b).touches(b));
    }

    #[test]
    fn door_transmission_matches_state() {
        assert!(!DoorState::Closed.transmits());
        assert!(DoorState::Open.transmits());
        assert!(DoorState::Destroyed.transmits());
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn door_key_round_trips_through_bincode() {
        assert_round_trip(&DoorKey::new(CellCoord::new(5, 1), CellCoord::new(4, 1)));
    }

    #[test]
    fn poi_round_trips_through_bincode() {
        assert_round_trip(&Poi::hidden(PoiKind::Victim));
    }

    #[test]
    fn action_error_round_trips_through_bincode() {
        assert_round_trip(&ActionError::InsufficientAp {
            required: 2,
            available: 1,
        });
    }

    #[test]
    fn hazard_levels_are_ordered_by_severity() {
        assert!(HazardLevel::Clear < HazardLevel::Smoke);
        assert!(HazardLevel::Smoke < HazardLevel::Fire);
        assert!(!HazardLevel::Clear.is_hazard());
        assert_eq!(AgentId::new(3).get(), 3);
    }
}
