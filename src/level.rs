//! Level module - static level definitions and grid construction
//!
//! The level catalog hands the engine a list of {kind, row, col,
//! connectors} tuples; this module turns one into a validated, propagated
//! grid. Authoring and storage of the catalog itself live outside the
//! engine.

use serde::{Deserialize, Serialize};

use crate::core::grid::Grid;
use crate::error::ConfigError;
use crate::types::{Direction, NodeKind, Position};

/// One node of a level definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub kind: NodeKind,
    pub row: u8,
    pub col: u8,
    pub connectors: Vec<Direction>,
}

/// A complete level definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSpec {
    pub rows: u8,
    pub cols: u8,
    pub nodes: Vec<NodeSpec>,
}

impl LevelSpec {
    /// Parse a level definition from JSON
    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }

    /// Build and propagate a grid from this definition
    ///
    /// Runs the full construction sequence and the first `init()`, so a
    /// returned grid is always a valid, lit-state-consistent puzzle.
    /// Malformed definitions (bad positions, connector-count violations,
    /// duplicate or missing power source, no bulbs) abort with a
    /// diagnostic instead of producing a broken puzzle.
    pub fn build(&self) -> Result<Grid, ConfigError> {
        let mut grid = Grid::new(self.rows, self.cols)?;

        for node in &self.nodes {
            let position = Position::new(node.row, node.col);
            match node.kind {
                NodeKind::Power => grid.create_power_node(position, &node.connectors)?,
                NodeKind::Link => grid.create_link_node(position, &node.connectors)?,
                NodeKind::Bulb => {
                    // The bulb rule (exactly one connector) is enforced by
                    // promotion; reject the malformed spec shape here.
                    let &connector = node.connectors.first().ok_or(ConfigError::ConnectorCount {
                        kind: NodeKind::Bulb,
                        min: 1,
                        max: 1,
                        got: 0,
                    })?;
                    if node.connectors.len() > 1 {
                        return Err(ConfigError::ConnectorCount {
                            kind: NodeKind::Bulb,
                            min: 1,
                            max: 1,
                            got: node.connectors.len(),
                        });
                    }
                    grid.create_bulb_node(position, connector)?;
                }
                NodeKind::Empty => continue,
            }
        }

        grid.init()?;
        Ok(grid)
    }
}
