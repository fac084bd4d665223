//! Store module - per-puzzle node-state snapshots for resume-after-exit
//!
//! Persists each playable cell's turn count (mod 4) and connector set,
//! keyed by puzzle identity (difficulty + level). Not part of the live
//! algorithm: the store is consulted at level load and level exit only.
//!
//! Persistence failures never corrupt in-memory grid state: an unreadable
//! or malformed backing file is logged and treated as "no saved state".

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::grid::Grid;
use crate::error::StoreError;
use crate::types::{Direction, Position, PuzzleId, TURNS_PER_CYCLE};

/// Saved rotation state of one playable cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeState {
    pub row: u8,
    pub col: u8,
    /// Clockwise turns applied since the level definition, mod 4.
    pub turns: u8,
    /// Connector set at save time, for integrity checking on load.
    pub connectors: Vec<Direction>,
}

/// Saved state of one puzzle instance
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PuzzleSnapshot {
    pub nodes: Vec<NodeState>,
}

/// The external progress tracker, reduced to the one question the store
/// asks: is this puzzle already completed?
///
/// Completed puzzles refuse both save and load, so a solved snapshot is
/// never overwritten by a scrambled one.
pub trait CompletionTracker {
    fn is_completed(&self, id: PuzzleId) -> bool;
}

/// Tracker for contexts with no progress data (everything incomplete)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCompletions;

impl CompletionTracker for NoCompletions {
    fn is_completed(&self, _id: PuzzleId) -> bool {
        false
    }
}

/// Keyed snapshot store, optionally backed by a JSON file
pub struct SnapshotStore {
    path: Option<PathBuf>,
    entries: HashMap<PuzzleId, PuzzleSnapshot>,
}

impl SnapshotStore {
    /// Create a store with no file backing
    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: HashMap::new(),
        }
    }

    /// Open a file-backed store
    ///
    /// Never fails: a missing file starts empty, and an unreadable or
    /// malformed file is logged and treated as empty rather than blocking
    /// level load.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match Self::read_entries(&path) {
            Ok(entries) => entries,
            Err(StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "snapshot store unreadable, starting empty");
                HashMap::new()
            }
        };
        Self {
            path: Some(path),
            entries,
        }
    }

    fn read_entries(path: &Path) -> Result<HashMap<PuzzleId, PuzzleSnapshot>, StoreError> {
        let data = fs::read_to_string(path)?;
        let listed: Vec<(PuzzleId, PuzzleSnapshot)> = serde_json::from_str(&data)?;
        Ok(listed.into_iter().collect())
    }

    /// Write all entries to the backing file
    ///
    /// A no-op for in-memory stores.
    pub fn flush(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let mut listed: Vec<(&PuzzleId, &PuzzleSnapshot)> = self.entries.iter().collect();
        listed.sort_by_key(|(id, _)| (id.difficulty as u8, id.level));
        let data = serde_json::to_string_pretty(&listed)?;
        fs::write(path, data)?;
        Ok(())
    }

    /// Record the grid's current rotation state under the given identity
    ///
    /// Refused when the tracker marks the puzzle completed.
    pub fn save(
        &mut self,
        id: PuzzleId,
        grid: &Grid,
        tracker: &dyn CompletionTracker,
    ) -> Result<(), StoreError> {
        if tracker.is_completed(id) {
            return Err(StoreError::Completed(id));
        }

        let nodes = grid
            .playable_positions()
            .iter()
            .filter_map(|&pos| grid.cell_at(pos))
            .map(|cell| NodeState {
                row: cell.position().row,
                col: cell.position().col,
                turns: cell.turns() % TURNS_PER_CYCLE,
                connectors: cell.connectors().iter().collect(),
            })
            .collect();

        self.entries.insert(id, PuzzleSnapshot { nodes });
        Ok(())
    }

    /// Apply a saved snapshot to the grid by replaying rotations
    ///
    /// Returns false when there is nothing saved for this identity, or
    /// when the saved data does not match the grid (stale or corrupt
    /// entries are dropped with a warning; the grid is untouched either
    /// way). Refused when the tracker marks the puzzle completed.
    pub fn load(
        &mut self,
        id: PuzzleId,
        grid: &mut Grid,
        tracker: &dyn CompletionTracker,
    ) -> Result<bool, StoreError> {
        if tracker.is_completed(id) {
            return Err(StoreError::Completed(id));
        }

        let Some(snapshot) = self.entries.get(&id).cloned() else {
            return Ok(false);
        };

        // Validate the whole snapshot before touching the grid: every saved
        // node must exist and its saved connector set must equal the node's
        // current set rotated by the saved turn count.
        for node in &snapshot.nodes {
            let pos = Position::new(node.row, node.col);
            let Some(cell) = grid.cell_at(pos).filter(|cell| cell.is_playable()) else {
                warn!(%id, %pos, "saved node missing from grid, dropping snapshot");
                self.entries.remove(&id);
                return Ok(false);
            };

            let mut expected = cell.connectors().clone();
            for _ in 0..(node.turns % TURNS_PER_CYCLE) {
                expected.rotate_cw();
            }
            let saved: Vec<Direction> = {
                let mut v = node.connectors.clone();
                v.sort_unstable();
                v.dedup();
                v
            };
            let expected: Vec<Direction> = expected.iter().collect();
            if saved != expected {
                warn!(%id, %pos, "saved connectors disagree with grid, dropping snapshot");
                self.entries.remove(&id);
                return Ok(false);
            }
        }

        for node in &snapshot.nodes {
            let pos = Position::new(node.row, node.col);
            for _ in 0..(node.turns % TURNS_PER_CYCLE) {
                grid.rotate(pos)?;
            }
        }

        Ok(true)
    }

    /// Whether a snapshot exists for this identity
    pub fn has_saved_state(&self, id: PuzzleId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Remove a snapshot; returns false if none existed
    pub fn clear(&mut self, id: PuzzleId) -> bool {
        self.entries.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
