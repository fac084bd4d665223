//! Tile-rotation electrical puzzle engine
//!
//! A rectangular grid of typed cells (power source, conductive links,
//! bulbs), each with directional connectors. Players rotate cells 90 deg
//! at a time; the puzzle is solved when every bulb receives power through
//! an unbroken chain of matching connectors back to the source.
//!
//! The engine is pure, deterministic, and synchronous:
//!
//! - **Deterministic**: propagation is a pure function of the current
//!   connector configuration; scrambles are seeded.
//! - **Testable**: no singletons — external collaborators (the progress
//!   tracker, the rendering adapter) are injected or subscribe in.
//! - **Single-threaded**: `&mut` access is the write lock; there is no
//!   internal concurrency to reason about.
//!
//! # Module Structure
//!
//! - [`types`]: directions, positions, node kinds, puzzle identities
//! - [`core`]: cells, the grid, power propagation, scrambling
//! - [`replay`]: move log with live/replay modes and time-travel stepping
//! - [`store`]: per-puzzle rotation snapshots for resume-after-exit
//! - [`level`]: static level definitions and grid construction
//! - [`error`]: the engine's error taxonomy
//!
//! # Example
//!
//! ```
//! use lightbulb_engine::core::Grid;
//! use lightbulb_engine::types::{Direction, Position};
//!
//! // Power feeding a bulb through one link.
//! let mut grid = Grid::new(3, 1)?;
//! grid.create_power_node(Position::new(1, 1), &[Direction::South])?;
//! grid.create_link_node(Position::new(2, 1), &[Direction::North, Direction::South])?;
//! grid.create_bulb_node(Position::new(3, 1), Direction::North)?;
//! grid.init()?;
//! assert!(grid.all_bulbs_lit());
//!
//! // Rotating the link breaks the chain.
//! grid.rotate(Position::new(2, 1))?;
//! assert!(!grid.any_bulb_lit());
//! # Ok::<(), lightbulb_engine::error::ConfigError>(())
//! ```

pub mod core;
pub mod error;
pub mod level;
pub mod replay;
pub mod store;
pub mod types;

// Re-export the main entry points at the crate root
pub use crate::core::{Cell, ConnectorSet, Grid, SimpleRng};
pub use crate::error::{ConfigError, ReplayError, StoreError};
pub use crate::level::LevelSpec;
pub use crate::replay::{Move, ReplayMode, Replayer};
pub use crate::store::{CompletionTracker, SnapshotStore};
pub use crate::types::{Difficulty, Direction, NodeKind, Position, PuzzleId};
