//! Replay module - move log with undo/redo and time-travel stepping
//!
//! One unified component covers recording, rewind, and replay. Rewinding
//! never applies inverse rotations: `step_backward` and `jump_to` rebuild
//! the current grid by deep-copying the baseline and re-applying the
//! logged prefix in order. That costs O(cursor) per step, which is
//! acceptable at puzzle move counts, and makes the consistency invariant
//! trivial: the displayed grid always equals baseline + moves[0..=cursor].
//!
//! Recording a move while rewound truncates the orphaned future first, so
//! "undo then make a new move" permanently discards the undone branch.

use crate::core::grid::Grid;
use crate::error::ReplayError;
use crate::types::Position;

/// An immutable record of one rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    /// Cell that was rotated.
    pub position: Position,
    /// Logical timestamp, monotonic across the session.
    pub seq: u32,
}

/// Operating state of the move log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayMode {
    /// New rotations are recorded and applied immediately.
    Live,
    /// Cursor-driven re-application of historical moves.
    Replay,
}

/// Move log, replay cursor, and the grid they control
pub struct Replayer {
    /// Pristine template the log replays against.
    baseline: Grid,
    /// Grid currently displayed; always equals baseline + moves[0..=cursor].
    current: Grid,
    log: Vec<Move>,
    /// Index of the last applied move; -1 means the initial state.
    cursor: isize,
    mode: ReplayMode,
    next_seq: u32,
}

impl Replayer {
    /// Capture a baseline from the given grid and start an empty log
    ///
    /// The baseline is an independent deep copy: later mutation of the
    /// source grid does not affect replay.
    pub fn new(grid: &Grid) -> Result<Self, ReplayError> {
        Ok(Self {
            baseline: grid.deep_copy()?,
            current: grid.deep_copy()?,
            log: Vec::new(),
            cursor: -1,
            mode: ReplayMode::Live,
            next_seq: 0,
        })
    }

    /// Record a rotation and apply it to the current grid
    ///
    /// If the cursor is not at the end of the log (a rewind happened),
    /// moves after the cursor are discarded first; there is no
    /// redo-after-new-move. Rotations that land on empty cells or outside
    /// the grid are invisible no-ops and are not recorded.
    pub fn record_and_apply(&mut self, position: Position) -> Result<(), ReplayError> {
        let applied = self.current.rotate(position)?;
        if !applied {
            return Ok(());
        }

        // Discard the orphaned future before extending the log.
        self.log.truncate((self.cursor + 1) as usize);
        self.log.push(Move {
            position,
            seq: self.next_seq,
        });
        self.next_seq = self.next_seq.wrapping_add(1);
        self.cursor += 1;
        self.mode = ReplayMode::Live;
        Ok(())
    }

    /// Apply the next logged move, if any
    ///
    /// Returns false (no-op) when the cursor is already at the end.
    pub fn step_forward(&mut self) -> Result<bool, ReplayError> {
        self.mode = ReplayMode::Replay;
        let next = self.cursor + 1;
        if next >= self.log.len() as isize {
            return Ok(false);
        }

        let position = self.log[next as usize].position;
        self.current.rotate(position)?;
        self.cursor = next;
        Ok(true)
    }

    /// Rewind one move by rebuilding from the baseline
    ///
    /// Returns false (no-op) when already at the initial state.
    pub fn step_backward(&mut self) -> Result<bool, ReplayError> {
        self.mode = ReplayMode::Replay;
        if self.cursor < 0 {
            return Ok(false);
        }
        self.rebuild_to(self.cursor - 1)?;
        Ok(true)
    }

    /// Move the cursor to an arbitrary log index (-1 = initial state)
    ///
    /// Fails with `IndexOutOfRange` outside [-1, log length - 1]; the
    /// current grid is untouched on failure.
    pub fn jump_to(&mut self, index: isize) -> Result<(), ReplayError> {
        if index < -1 || index >= self.log.len() as isize {
            return Err(ReplayError::IndexOutOfRange {
                index,
                len: self.log.len(),
            });
        }
        self.mode = ReplayMode::Replay;
        self.rebuild_to(index)
    }

    /// Truncate moves after the cursor and resume live recording
    pub fn switch_to_live(&mut self) {
        self.log.truncate((self.cursor + 1) as usize);
        self.mode = ReplayMode::Live;
    }

    /// Full rebuild: deep-copy the baseline, replay moves [0..=index]
    fn rebuild_to(&mut self, index: isize) -> Result<(), ReplayError> {
        let mut rebuilt = self.baseline.deep_copy()?;
        for m in &self.log[..(index + 1) as usize] {
            rebuilt.rotate(m.position)?;
        }
        self.current = rebuilt;
        self.cursor = index;
        Ok(())
    }

    /// The grid the player currently sees
    pub fn current(&self) -> &Grid {
        &self.current
    }

    /// Index of the last applied move; -1 at the initial state
    pub fn cursor(&self) -> isize {
        self.cursor
    }

    pub fn mode(&self) -> ReplayMode {
        self.mode
    }

    /// The recorded moves, oldest first
    pub fn moves(&self) -> &[Move] {
        &self.log
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }
}
