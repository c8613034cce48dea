//! Wall and door graph of the building.

use std::collections::BTreeMap;

use fire_rescue_core::{
    CellCoord, Direction, DoorKey, DoorState, GridError, Layout, LayoutError, WallMask,
};

use crate::grid::GridShape;

/// Classification of the boundary between a cell and one of its neighbors.
///
/// Door classification takes precedence over wall bits, so an edge is never
/// both a wall and a door.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Nothing separates the cells.
    Open,
    /// An intact wall separates the cells.
    Wall,
    /// A door in the provided state separates the cells.
    Door(DoorState),
    /// The neighbor would lie outside the grid.
    Boundary,
}

impl Edge {
    /// Reports whether fire, smoke and shockwaves cross the edge.
    #[must_use]
    pub const fn transmits(self) -> bool {
        match self {
            Self::Open => true,
            Self::Door(state) => state.transmits(),
            Self::Wall | Self::Boundary => false,
        }
    }

    /// Reports whether the edge can be crossed under the provided door policy.
    #[must_use]
    pub const fn is_passable(self, policy: DoorPolicy) -> bool {
        match self {
            Self::Door(DoorState::Closed) => matches!(policy, DoorPolicy::ClosedDoorCrossable),
            other => other.transmits(),
        }
    }
}

/// How closed doors are treated by [`Topology::passable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DoorPolicy {
    /// Closed doors behave like walls. Used for hazard transmission.
    ClosedDoorBlocks,
    /// Closed doors are crossable once opened. Used for path planning.
    ClosedDoorCrossable,
}

/// Per-cell wall masks together with the door registry.
#[derive(Clone, Debug)]
pub struct Topology {
    shape: GridShape,
    walls: Vec<WallMask>,
    doors: BTreeMap<DoorKey, DoorState>,
}

impl Topology {
    /// Builds the topology described by a layout. Every door starts closed.
    pub fn from_layout(layout: &Layout) -> Result<Self, LayoutError> {
        layout.validate()?;
        let doors = layout
            .doors
            .iter()
            .map(|door| (*door, DoorState::Closed))
            .collect();
        Ok(Self {
            shape: GridShape::new(layout.width, layout.height),
            walls: layout.walls.clone(),
            doors,
        })
    }

    /// Number of grid columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.shape.width()
    }

    /// Number of grid rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.shape.height()
    }

    /// Reports whether the cell lies on the grid.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.shape.contains(cell)
    }

    /// Wall mask stored for the cell.
    pub fn wall_mask(&self, cell: CellCoord) -> Result<WallMask, GridError> {
        let index = self.shape.checked_index(cell)?;
        Ok(self.walls[index])
    }

    /// State of the door between two cells, if one was ever registered there.
    #[must_use]
    pub fn door(&self, a: CellCoord, b: CellCoord) -> Option<DoorState> {
        self.doors.get(&DoorKey::new(a, b)).copied()
    }

    /// Every registered door in canonical key order.
    pub fn doors(&self) -> impl Iterator<Item = (DoorKey, DoorState)> + '_ {
        self.doors.iter().map(|(key, state)| (*key, *state))
    }

    /// Classifies the edge on the provided side of a cell.
    ///
    /// A wall bit on either side of the edge counts as a wall.
    pub fn edge(&self, cell: CellCoord, direction: Direction) -> Result<Edge, GridError> {
        let mask = self.wall_mask(cell)?;
        let Some(neighbor) = self.shape.neighbor(cell, direction) else {
            return Ok(Edge::Boundary);
        };

        if let Some(state) = self.door(cell, neighbor) {
            return Ok(Edge::Door(state));
        }

        let facing = self.wall_mask(neighbor)?;
        if mask.has(direction) || facing.has(direction.opposite()) {
            Ok(Edge::Wall)
        } else {
            Ok(Edge::Open)
        }
    }

    /// Classifies the edge between two cells, or `None` when they are not
    /// orthogonal neighbors.
    pub fn edge_between(
        &self,
        from: CellCoord,
        to: CellCoord,
    ) -> Result<Option<Edge>, GridError> {
        let _ = self.shape.checked_index(to)?;
        match Direction::between(from, to) {
            Some(direction) => self.edge(from, direction).map(Some),
            None => {
                let _ = self.shape.checked_index(from)?;
                Ok(None)
            }
        }
    }

    /// Strict wall check: doors, open edges and non-neighbors report `false`.
    pub fn walls_between(&self, a: CellCoord, b: CellCoord) -> Result<bool, GridError> {
        Ok(matches!(self.edge_between(a, b)?, Some(Edge::Wall)))
    }

    /// Reports whether an agent or hazard may cross from `a` to `b`.
    pub fn passable(
        &self,
        a: CellCoord,
        b: CellCoord,
        policy: DoorPolicy,
    ) -> Result<bool, GridError> {
        Ok(self
            .edge_between(a, b)?
            .is_some_and(|edge| edge.is_passable(policy)))
    }

    /// Cardinal neighbors of the cell that lie on the grid, in
    /// north, west, south, east order.
    pub fn neighbors(&self, cell: CellCoord) -> Result<Neighbors, GridError> {
        let _ = self.shape.checked_index(cell)?;
        let mut neighbors = Neighbors::default();
        for direction in Direction::ALL {
            if let Some(neighbor) = self.shape.neighbor(cell, direction) {
                neighbors.push(neighbor);
            }
        }
        Ok(neighbors)
    }

    pub(crate) fn set_door(&mut self, door: DoorKey, state: DoorState) {
        let _ = self.doors.insert(door, state);
    }

    /// Removes the wall on the provided side of a cell from both masks and
    /// returns the cells whose mask changed.
    pub(crate) fn remove_wall(
        &mut self,
        cell: CellCoord,
        direction: Direction,
    ) -> Vec<(CellCoord, WallMask)> {
        let mut changed = Vec::new();
        let facing_side = self
            .shape
            .neighbor(cell, direction)
            .map(|neighbor| (neighbor, direction.opposite()));
        let sides = [Some((cell, direction)), facing_side];
        for (side, facing) in sides.into_iter().flatten() {
            let Some(index) = self.shape.index(side) else {
                continue;
            };
            let mask = self.walls[index];
            if mask.has(facing) {
                let cleared = mask.without(facing);
                self.walls[index] = cleared;
                changed.push((side, cleared));
            }
        }
        changed
    }

    pub(crate) fn shape(&self) -> GridShape {
        self.shape
    }

    pub(crate) fn masks(&self) -> &[WallMask] {
        &self.walls
    }
}

/// Fixed-capacity iterator over the cardinal neighbors of a cell.
#[derive(Clone, Debug, Default)]
pub struct Neighbors {
    buffer: [Option<CellCoord>; 4],
    len: usize,
    cursor: usize,
}

impl Neighbors {
    fn push(&mut self, cell: CellCoord) {
        if self.len < self.buffer.len() {
            self.buffer[self.len] = Some(cell);
            self.len += 1;
        }
    }
}

impl Iterator for Neighbors {
    type Item = CellCoord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.len {
            return None;
        }

        let value = self.buffer[self.cursor];
        self.cursor += 1;
        value
    }
}
