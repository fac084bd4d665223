//! Cell module - a single grid position and its connector set
//!
//! A cell starts `Empty` and is promoted to a playable kind (bulb, power,
//! link) at most once. Rotation mutates the connector set for the rest of
//! the cell's life; the powered flag is transient and recomputed by the
//! grid on every propagation pass.

use arrayvec::ArrayVec;

use crate::error::ConfigError;
use crate::types::{Direction, NodeKind, Position, TURNS_PER_CYCLE};

/// A set of connector directions, at most one per side
///
/// Stored in canonical order and deduplicated so derived equality is
/// set equality. Fixed capacity: never allocates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConnectorSet {
    dirs: ArrayVec<Direction, 4>,
}

impl ConnectorSet {
    /// Create an empty connector set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a slice, ignoring duplicates
    pub fn from_slice(dirs: &[Direction]) -> Self {
        let mut set = Self::new();
        for &d in dirs {
            set.insert(d);
        }
        set
    }

    /// Insert a direction; returns false if it was already present
    pub fn insert(&mut self, direction: Direction) -> bool {
        if self.contains(direction) {
            return false;
        }
        self.dirs.push(direction);
        self.dirs.sort_unstable();
        true
    }

    /// Whether the set has a connector facing the given side
    pub fn contains(&self, direction: Direction) -> bool {
        self.dirs.contains(&direction)
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Direction> + '_ {
        self.dirs.iter().copied()
    }

    /// Rotate every member one step clockwise
    pub fn rotate_cw(&mut self) {
        for d in self.dirs.iter_mut() {
            *d = d.rotate_cw();
        }
        self.dirs.sort_unstable();
    }
}

impl FromIterator<Direction> for ConnectorSet {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        let mut set = Self::new();
        for d in iter {
            set.insert(d);
        }
        set
    }
}

/// A single grid position: kind tag, connector set, transient powered flag
///
/// The turn counter tracks orientation relative to the level definition
/// (mod 4); it is what the snapshot store persists across sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    position: Position,
    kind: NodeKind,
    connectors: ConnectorSet,
    powered: bool,
    turns: u8,
}

impl Cell {
    /// Create an empty cell at the given position
    pub fn empty(position: Position) -> Self {
        Self {
            position,
            kind: NodeKind::Empty,
            connectors: ConnectorSet::new(),
            powered: false,
            turns: 0,
        }
    }

    /// One-way transition from `Empty` to a playable kind
    ///
    /// Rejected if the cell was already promoted or the connector set
    /// violates the kind's connector-count rule. The cell is unchanged on
    /// failure.
    pub fn promote(&mut self, kind: NodeKind, connectors: ConnectorSet) -> Result<(), ConfigError> {
        if self.kind != NodeKind::Empty {
            return Err(ConfigError::AlreadyPromoted {
                position: self.position,
                kind: self.kind,
            });
        }

        let (min, max) = (kind.min_connectors(), kind.max_connectors());
        if connectors.len() < min || connectors.len() > max {
            return Err(ConfigError::ConnectorCount {
                kind,
                min,
                max,
                got: connectors.len(),
            });
        }

        self.kind = kind;
        self.connectors = connectors;
        Ok(())
    }

    /// Rotate every connector one step clockwise
    ///
    /// Always succeeds. Global consistency (re-propagation, observer
    /// notification) is the owning grid's job; the cell only mutates its
    /// local state.
    pub fn turn(&mut self) {
        self.connectors.rotate_cw();
        self.turns = (self.turns + 1) % TURNS_PER_CYCLE;
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn connectors(&self) -> &ConnectorSet {
        &self.connectors
    }

    /// Whether this cell has a connector facing the given side
    pub fn has_connector(&self, direction: Direction) -> bool {
        self.connectors.contains(direction)
    }

    /// Transient propagation flag; meaningless before the first `init()`
    pub fn is_powered(&self) -> bool {
        self.powered
    }

    /// Clockwise turns applied since creation, mod 4
    pub fn turns(&self) -> u8 {
        self.turns
    }

    pub fn is_empty(&self) -> bool {
        self.kind == NodeKind::Empty
    }

    pub fn is_bulb(&self) -> bool {
        self.kind == NodeKind::Bulb
    }

    pub fn is_power(&self) -> bool {
        self.kind == NodeKind::Power
    }

    pub fn is_link(&self) -> bool {
        self.kind == NodeKind::Link
    }

    /// Playable cells are those promoted past `Empty`
    pub fn is_playable(&self) -> bool {
        self.kind != NodeKind::Empty
    }

    pub(crate) fn set_powered(&mut self, powered: bool) {
        self.powered = powered;
    }

    pub(crate) fn set_turns(&mut self, turns: u8) {
        self.turns = turns % TURNS_PER_CYCLE;
    }
}
