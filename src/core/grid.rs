//! Grid module - the puzzle environment and power propagation engine
//!
//! The grid owns a dense rows x cols matrix of cells (flat storage,
//! row-major) plus a sparse list of playable positions. Coordinates are
//! 1-indexed: (row, col) with row in 1..=rows and col in 1..=cols.
//!
//! Propagation is recomputed from scratch after every rotation: a
//! breadth-first traversal from the single power source over the
//! connector-adjacency relation, where a neighbor is reached iff both
//! sides carry connectors facing each other.

use std::collections::VecDeque;
use std::fmt;

use crate::core::cell::{Cell, ConnectorSet};
use crate::core::observer::{CellChange, CellEvent, ObserverFn, ObserverId, ObserverRegistry};
use crate::error::ConfigError;
use crate::types::{Direction, NodeKind, Position};

/// The puzzle grid
pub struct Grid {
    rows: u8,
    cols: u8,
    /// Flat array of cells, row-major order ((row-1) * cols + (col-1))
    cells: Vec<Cell>,
    /// Positions promoted to a playable kind, in promotion order
    playable: Vec<Position>,
    /// Single-power-source flag: position of the power cell, if any
    power_pos: Option<Position>,
    bulb_count: usize,
    observers: ObserverRegistry,
}

impl Grid {
    /// Create a grid of the given dimensions, every cell empty
    pub fn new(rows: u8, cols: u8) -> Result<Self, ConfigError> {
        if rows == 0 || cols == 0 {
            return Err(ConfigError::ZeroDimension { rows, cols });
        }

        let mut cells = Vec::with_capacity(rows as usize * cols as usize);
        for row in 1..=rows {
            for col in 1..=cols {
                cells.push(Cell::empty(Position::new(row, col)));
            }
        }

        Ok(Self {
            rows,
            cols,
            cells,
            playable: Vec::new(),
            power_pos: None,
            bulb_count: 0,
            observers: ObserverRegistry::default(),
        })
    }

    /// Calculate flat index from a 1-indexed position
    #[inline(always)]
    fn index(&self, position: Position) -> Option<usize> {
        if position.row == 0
            || position.col == 0
            || position.row > self.rows
            || position.col > self.cols
        {
            return None;
        }
        Some((position.row as usize - 1) * self.cols as usize + (position.col as usize - 1))
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    /// Bounds-checked cell lookup
    ///
    /// Returns None outside [1, rows] x [1, cols] rather than failing.
    pub fn cell_at(&self, position: Position) -> Option<&Cell> {
        self.index(position).map(|idx| &self.cells[idx])
    }

    /// Bounds-checked playable-node lookup
    ///
    /// Like `cell_at`, but empty cells answer None as well: only promoted
    /// nodes count.
    pub fn node_at(&self, row: u8, col: u8) -> Option<&Cell> {
        self.cell_at(Position::new(row, col))
            .filter(|cell| cell.is_playable())
    }

    /// Positions promoted to a playable kind, in promotion order
    pub fn playable_positions(&self) -> &[Position] {
        &self.playable
    }

    /// Positions of all bulb cells
    pub fn bulb_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.playable
            .iter()
            .copied()
            .filter(|&pos| self.cell_at(pos).is_some_and(Cell::is_bulb))
    }

    /// Position of the power source, if one was created
    pub fn power_position(&self) -> Option<Position> {
        self.power_pos
    }

    /// Promote the cell at `position` to the power source
    ///
    /// Rejected if the position is out of bounds, a power source already
    /// exists, the cell was already promoted, or the connector count is
    /// invalid. The grid is unchanged on failure.
    pub fn create_power_node(
        &mut self,
        position: Position,
        connectors: &[Direction],
    ) -> Result<(), ConfigError> {
        if let Some(existing) = self.power_pos {
            return Err(ConfigError::DuplicatePowerSource { existing });
        }
        self.create_node(position, NodeKind::Power, ConnectorSet::from_slice(connectors))?;
        self.power_pos = Some(position);
        Ok(())
    }

    /// Promote the cell at `position` to a bulb with a single connector
    pub fn create_bulb_node(
        &mut self,
        position: Position,
        connector: Direction,
    ) -> Result<(), ConfigError> {
        self.create_node(position, NodeKind::Bulb, ConnectorSet::from_slice(&[connector]))?;
        self.bulb_count += 1;
        Ok(())
    }

    /// Promote the cell at `position` to a conductive link
    pub fn create_link_node(
        &mut self,
        position: Position,
        connectors: &[Direction],
    ) -> Result<(), ConfigError> {
        self.create_node(position, NodeKind::Link, ConnectorSet::from_slice(connectors))
    }

    fn create_node(
        &mut self,
        position: Position,
        kind: NodeKind,
        connectors: ConnectorSet,
    ) -> Result<(), ConfigError> {
        let idx = self.index(position).ok_or(ConfigError::OutOfBounds {
            position,
            rows: self.rows,
            cols: self.cols,
        })?;

        self.cells[idx].promote(kind, connectors)?;
        self.playable.push(position);
        Ok(())
    }

    /// Rotate the cell at `position` one step clockwise and re-propagate
    ///
    /// Out-of-bounds positions and empty cells are an invisible no-op
    /// (Ok(false)): clicks outside valid cells are expected input. A grid
    /// with no power source or no bulbs is a configuration error and fails
    /// fatally, exactly as `init()` does.
    pub fn rotate(&mut self, position: Position) -> Result<bool, ConfigError> {
        let Some(idx) = self.index(position) else {
            return Ok(false);
        };
        if !self.cells[idx].is_playable() {
            return Ok(false);
        }

        self.cells[idx].turn();
        self.observers.notify(&CellEvent {
            position,
            change: CellChange::Rotated,
        });

        self.init()?;
        Ok(true)
    }

    /// Recompute the powered flag of every cell from the power source
    ///
    /// Fails fatally if the grid has no power source or no bulbs: a valid
    /// puzzle always has both, so this is a content error, not a runtime
    /// condition to recover from. Idempotent: re-running without a rotation
    /// in between produces identical flags.
    pub fn init(&mut self) -> Result<(), ConfigError> {
        let power_pos = self.power_pos.ok_or(ConfigError::NoPowerSource)?;
        if self.bulb_count == 0 {
            return Err(ConfigError::NoBulbs);
        }

        // Remember previous flags so observers only hear actual transitions.
        let previous: Vec<(Position, bool)> = if self.observers.is_empty() {
            Vec::new()
        } else {
            self.playable
                .iter()
                .map(|&pos| (pos, self.cell_at(pos).is_some_and(Cell::is_powered)))
                .collect()
        };

        for cell in &mut self.cells {
            cell.set_powered(false);
        }

        // Breadth-first traversal over the connector-adjacency relation.
        let mut queue = VecDeque::new();
        if let Some(idx) = self.index(power_pos) {
            self.cells[idx].set_powered(true);
            queue.push_back(power_pos);
        }

        while let Some(pos) = queue.pop_front() {
            for direction in Direction::ALL {
                let Some(cell) = self.cell_at(pos) else {
                    continue;
                };
                if !cell.has_connector(direction) {
                    continue;
                }
                let Some(neighbor_pos) = pos.step(direction) else {
                    continue;
                };
                let Some(neighbor_idx) = self.index(neighbor_pos) else {
                    continue;
                };

                let neighbor = &self.cells[neighbor_idx];
                if neighbor.is_powered() || !neighbor.has_connector(direction.opposite()) {
                    continue;
                }

                self.cells[neighbor_idx].set_powered(true);
                queue.push_back(neighbor_pos);
            }
        }

        // Side channel only: state is final before anything is delivered.
        for (pos, was_powered) in previous {
            let now_powered = self
                .cell_at(pos)
                .map(Cell::is_powered)
                .unwrap_or(false);
            if now_powered != was_powered {
                self.observers.notify(&CellEvent {
                    position: pos,
                    change: CellChange::Powered(now_powered),
                });
            }
        }

        Ok(())
    }

    /// True iff at least one bulb is powered
    ///
    /// The scramble loop uses this as its unsolved-state check.
    pub fn any_bulb_lit(&self) -> bool {
        self.bulb_positions()
            .any(|pos| self.cell_at(pos).is_some_and(Cell::is_powered))
    }

    /// True iff every bulb is powered (the completion predicate)
    pub fn all_bulbs_lit(&self) -> bool {
        self.bulb_count > 0
            && self
                .bulb_positions()
                .all(|pos| self.cell_at(pos).is_some_and(Cell::is_powered))
    }

    /// Number of currently powered bulbs
    pub fn lit_bulb_count(&self) -> usize {
        self.bulb_positions()
            .filter(|&pos| self.cell_at(pos).is_some_and(Cell::is_powered))
            .count()
    }

    /// Construct an independent grid equivalent to this one
    ///
    /// Replays every playable node's kind and current (possibly rotated)
    /// connector set into fresh cells, preserves turn counters, and re-runs
    /// `init()` on the copy. Observers are not copied. Used as the replay
    /// baseline and as the solved reference for hint computation.
    pub fn deep_copy(&self) -> Result<Grid, ConfigError> {
        let mut copy = Grid::new(self.rows, self.cols)?;

        for &pos in &self.playable {
            let cell = match self.cell_at(pos) {
                Some(cell) => cell,
                None => continue,
            };
            let connectors = cell.connectors().clone();
            let turns = cell.turns();

            copy.create_node(pos, cell.kind(), connectors)?;
            if cell.is_power() {
                copy.power_pos = Some(pos);
            }
            if cell.is_bulb() {
                copy.bulb_count += 1;
            }
            if let Some(idx) = copy.index(pos) {
                copy.cells[idx].set_turns(turns);
            }
        }

        copy.init()?;
        Ok(copy)
    }

    /// Subscribe to change events for the cell at `position`
    ///
    /// Fires on rotation and on powered-flag transitions.
    pub fn subscribe(&mut self, position: Position, callback: ObserverFn) -> ObserverId {
        self.observers.subscribe(position, callback)
    }

    /// Remove a subscription; returns false if the id was unknown
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("playable", &self.playable.len())
            .field("power_pos", &self.power_pos)
            .field("bulbs", &self.bulb_count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::types::Direction::{East, North, South, West};

    /// Power(1,1){South} -> Link(2,1){North,South} -> Bulb(3,1){North}
    fn straight_line_grid() -> Grid {
        let mut grid = Grid::new(3, 1).unwrap();
        grid.create_power_node(Position::new(1, 1), &[South]).unwrap();
        grid.create_link_node(Position::new(2, 1), &[North, South])
            .unwrap();
        grid.create_bulb_node(Position::new(3, 1), North).unwrap();
        grid
    }

    #[test]
    fn test_new_rejects_zero_dimensions() {
        assert!(matches!(
            Grid::new(0, 5),
            Err(ConfigError::ZeroDimension { .. })
        ));
        assert!(matches!(
            Grid::new(5, 0),
            Err(ConfigError::ZeroDimension { .. })
        ));
    }

    #[test]
    fn test_cell_lookup_bounds() {
        let grid = Grid::new(2, 3).unwrap();
        assert!(grid.cell_at(Position::new(1, 1)).is_some());
        assert!(grid.cell_at(Position::new(2, 3)).is_some());
        assert!(grid.cell_at(Position::new(0, 1)).is_none());
        assert!(grid.cell_at(Position::new(3, 1)).is_none());
        assert!(grid.cell_at(Position::new(1, 4)).is_none());
    }

    #[test]
    fn test_node_at_sees_only_playable_cells() {
        let grid = straight_line_grid();
        assert!(grid.node_at(1, 1).is_some());
        // In-bounds but empty: no node.
        let grid = Grid::new(2, 2).unwrap();
        assert!(grid.node_at(1, 1).is_none());
    }

    #[test]
    fn test_create_node_out_of_bounds_rejected() {
        let mut grid = Grid::new(2, 2).unwrap();
        let err = grid
            .create_link_node(Position::new(3, 1), &[North, South])
            .unwrap_err();
        assert!(matches!(err, ConfigError::OutOfBounds { .. }));
        assert!(grid.playable_positions().is_empty());
    }

    #[test]
    fn test_second_power_source_rejected_without_state_change() {
        let mut grid = straight_line_grid();
        let before = grid.playable_positions().len();

        let err = grid
            .create_power_node(Position::new(3, 1), &[North])
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::DuplicatePowerSource {
                existing: Position { row: 1, col: 1 }
            }
        ));
        assert_eq!(grid.playable_positions().len(), before);
        assert_eq!(grid.power_position(), Some(Position::new(1, 1)));
    }

    #[test]
    fn test_init_requires_power_and_bulb() {
        // No power source.
        let mut grid = Grid::new(2, 2).unwrap();
        grid.create_bulb_node(Position::new(1, 1), South).unwrap();
        assert!(matches!(grid.init(), Err(ConfigError::NoPowerSource)));

        // Power but no bulbs.
        let mut grid = Grid::new(2, 2).unwrap();
        grid.create_power_node(Position::new(1, 1), &[South]).unwrap();
        assert!(matches!(grid.init(), Err(ConfigError::NoBulbs)));
    }

    #[test]
    fn test_propagation_lights_connected_chain() {
        let mut grid = straight_line_grid();
        grid.init().unwrap();

        assert!(grid.cell_at(Position::new(1, 1)).unwrap().is_powered());
        assert!(grid.cell_at(Position::new(2, 1)).unwrap().is_powered());
        assert!(grid.cell_at(Position::new(3, 1)).unwrap().is_powered());
        assert!(grid.any_bulb_lit());
        assert!(grid.all_bulbs_lit());
    }

    #[test]
    fn test_propagation_stops_at_mismatched_connectors() {
        let mut grid = straight_line_grid();
        grid.init().unwrap();
        assert!(grid.any_bulb_lit());

        // Rotating the middle link breaks the chain: {N,S} becomes {E,W}.
        assert!(grid.rotate(Position::new(2, 1)).unwrap());
        assert!(!grid.cell_at(Position::new(2, 1)).unwrap().is_powered());
        assert!(!grid.cell_at(Position::new(3, 1)).unwrap().is_powered());
        assert!(!grid.any_bulb_lit());

        // And one more rotation restores it ({E,W} back to {N,S}).
        assert!(grid.rotate(Position::new(2, 1)).unwrap());
        assert!(grid.any_bulb_lit());
    }

    #[test]
    fn test_init_is_idempotent() {
        let mut grid = straight_line_grid();
        grid.init().unwrap();

        let flags: Vec<bool> = grid
            .playable_positions()
            .iter()
            .map(|&pos| grid.cell_at(pos).unwrap().is_powered())
            .collect();

        grid.init().unwrap();
        let flags_again: Vec<bool> = grid
            .playable_positions()
            .iter()
            .map(|&pos| grid.cell_at(pos).unwrap().is_powered())
            .collect();

        assert_eq!(flags, flags_again);
    }

    #[test]
    fn test_rotate_out_of_bounds_is_noop() {
        let mut grid = straight_line_grid();
        grid.init().unwrap();

        assert!(!grid.rotate(Position::new(9, 9)).unwrap());
        assert!(!grid.rotate(Position::new(0, 1)).unwrap());
        assert!(grid.any_bulb_lit());
    }

    #[test]
    fn test_rotate_empty_cell_is_noop() {
        let mut grid = Grid::new(3, 2).unwrap();
        grid.create_power_node(Position::new(1, 1), &[South]).unwrap();
        grid.create_bulb_node(Position::new(2, 1), North).unwrap();
        grid.init().unwrap();

        assert!(!grid.rotate(Position::new(3, 2)).unwrap());
        assert!(grid.any_bulb_lit());
    }

    #[test]
    fn test_power_does_not_leak_through_one_sided_connector() {
        // Power faces South, but the cell below faces East/West: no match.
        let mut grid = Grid::new(2, 1).unwrap();
        grid.create_power_node(Position::new(1, 1), &[South]).unwrap();
        grid.create_bulb_node(Position::new(2, 1), South).unwrap();
        grid.init().unwrap();

        assert!(grid.cell_at(Position::new(1, 1)).unwrap().is_powered());
        assert!(!grid.cell_at(Position::new(2, 1)).unwrap().is_powered());
        assert!(!grid.any_bulb_lit());
    }

    #[test]
    fn test_deep_copy_fidelity() {
        let mut grid = straight_line_grid();
        grid.init().unwrap();
        // Rotate twice so the copy must carry rotated connector state.
        grid.rotate(Position::new(2, 1)).unwrap();
        grid.rotate(Position::new(2, 1)).unwrap();

        let copy = grid.deep_copy().unwrap();
        assert_eq!(copy.rows(), grid.rows());
        assert_eq!(copy.cols(), grid.cols());

        for &pos in grid.playable_positions() {
            let original = grid.cell_at(pos).unwrap();
            let copied = copy.cell_at(pos).unwrap();
            assert_eq!(copied.kind(), original.kind());
            assert_eq!(copied.connectors(), original.connectors());
            assert_eq!(copied.turns(), original.turns());
            assert_eq!(copied.is_powered(), original.is_powered());
        }

        assert_eq!(copy.any_bulb_lit(), grid.any_bulb_lit());
    }

    #[test]
    fn test_deep_copy_is_independent() {
        let mut grid = straight_line_grid();
        grid.init().unwrap();

        let mut copy = grid.deep_copy().unwrap();
        copy.rotate(Position::new(2, 1)).unwrap();

        // Mutating the copy leaves the original lit.
        assert!(grid.any_bulb_lit());
        assert!(!copy.any_bulb_lit());
    }

    #[test]
    fn test_observers_hear_rotation_and_power_transitions() {
        let mut grid = straight_line_grid();
        grid.init().unwrap();

        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        grid.subscribe(
            Position::new(3, 1),
            Box::new(move |event| sink.borrow_mut().push(event.change)),
        );

        // Rotating the link darkens the bulb: one Powered(false) for (3,1).
        grid.rotate(Position::new(2, 1)).unwrap();
        assert_eq!(events.borrow().as_slice(), &[CellChange::Powered(false)]);

        // Rotating it back relights the bulb.
        grid.rotate(Position::new(2, 1)).unwrap();
        assert_eq!(
            events.borrow().as_slice(),
            &[CellChange::Powered(false), CellChange::Powered(true)]
        );
    }

    #[test]
    fn test_observer_unsubscribe() {
        let mut grid = straight_line_grid();
        grid.init().unwrap();

        let count = Rc::new(RefCell::new(0u32));
        let sink = Rc::clone(&count);
        let id = grid.subscribe(
            Position::new(2, 1),
            Box::new(move |_| *sink.borrow_mut() += 1),
        );

        grid.rotate(Position::new(2, 1)).unwrap();
        let after_first = *count.borrow();
        assert!(after_first > 0);

        assert!(grid.unsubscribe(id));
        grid.rotate(Position::new(2, 1)).unwrap();
        assert_eq!(*count.borrow(), after_first);
    }

    #[test]
    fn test_branching_layout_lights_multiple_bulbs() {
        // Power in the middle feeding two arms.
        let mut grid = Grid::new(3, 3).unwrap();
        grid.create_power_node(Position::new(2, 2), &[North, South])
            .unwrap();
        grid.create_link_node(Position::new(1, 2), &[South, East])
            .unwrap();
        grid.create_bulb_node(Position::new(1, 3), West).unwrap();
        grid.create_bulb_node(Position::new(3, 2), North).unwrap();
        grid.init().unwrap();

        assert_eq!(grid.lit_bulb_count(), 2);
        assert!(grid.all_bulbs_lit());
    }
}
