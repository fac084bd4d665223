//! Core module - pure puzzle logic with no I/O dependencies
//!
//! This module contains the grid data model, connector rotation, power
//! propagation, and the scramble routine. It has zero dependencies on
//! rendering, persistence, or timers.

pub mod cell;
pub mod grid;
pub mod observer;
pub mod rng;
pub mod scramble;

// Re-export commonly used types
pub use cell::{Cell, ConnectorSet};
pub use grid::Grid;
pub use observer::{CellChange, CellEvent, ObserverFn, ObserverId};
pub use rng::SimpleRng;
pub use scramble::scramble;
