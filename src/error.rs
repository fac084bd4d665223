//! Error types for the puzzle engine
//!
//! Three families, matching how callers recover:
//!
//! - [`ConfigError`]: the grid's configuration is wrong for this operation.
//!   Construction errors are rejected locally so the caller can retry with
//!   corrected data; missing power/bulb at propagation time is fatal for the
//!   grid instance and should abort level load.
//! - [`ReplayError`]: a replay cursor operation was given an index outside
//!   the log.
//! - [`StoreError`]: snapshot persistence failed or was refused.
//!
//! Bounds/lookup misses during play (rotating outside the grid, querying a
//! non-existent cell) are deliberately NOT errors: user input routinely
//! lands outside valid cells and must stay an invisible no-op.

use thiserror::Error;

use crate::types::{NodeKind, Position, PuzzleId};

/// Grid configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Propagation was requested on a grid with no power source.
    #[error("grid has no power source")]
    NoPowerSource,

    /// Propagation was requested on a grid with no bulbs.
    #[error("grid has no bulbs")]
    NoBulbs,

    /// A grid dimension was zero.
    #[error("grid dimensions must be non-zero (got {rows}x{cols})")]
    ZeroDimension { rows: u8, cols: u8 },

    /// A node-creation call targeted a position outside the grid.
    #[error("position {position} is outside the {rows}x{cols} grid")]
    OutOfBounds {
        position: Position,
        rows: u8,
        cols: u8,
    },

    /// A second power source was requested.
    #[error("a power source already exists at {existing}")]
    DuplicatePowerSource { existing: Position },

    /// The cell at this position was already promoted to a playable kind.
    #[error("cell at {position} is already a {kind:?} node")]
    AlreadyPromoted { position: Position, kind: NodeKind },

    /// The connector set violates the kind's connector-count rule.
    #[error("{kind:?} node requires {min}..={max} connectors, got {got}")]
    ConnectorCount {
        kind: NodeKind,
        min: usize,
        max: usize,
        got: usize,
    },

    /// The scramble loop hit its round cap without reaching an unsolved state.
    #[error("scramble failed to reach an unsolved state after {rounds} rounds")]
    ScrambleExhausted { rounds: u32 },
}

/// Move-log / replay errors
#[derive(Debug, Error)]
pub enum ReplayError {
    /// `jump_to` was given an index outside `[-1, log length - 1]`.
    #[error("replay index {index} is outside [-1, {len} - 1]")]
    IndexOutOfRange { index: isize, len: usize },

    /// Rebuilding the current grid from the baseline failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Snapshot-store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Save/load was refused because the puzzle is already completed.
    #[error("puzzle {0} is completed; snapshot refused")]
    Completed(PuzzleId),

    /// Reading or writing the backing file failed.
    #[error("snapshot store i/o error")]
    Io(#[from] std::io::Error),

    /// The backing file held malformed snapshot data.
    #[error("snapshot store format error")]
    Format(#[from] serde_json::Error),

    /// Replaying saved rotations onto the grid failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
