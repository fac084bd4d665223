//! Core types shared across the engine
//! This module contains pure data types with no dependency on grid state

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum number of connectors a cell can carry (one per side)
pub const MAX_CONNECTORS: usize = 4;

/// Number of clockwise turns that returns a cell to its original orientation
pub const TURNS_PER_CYCLE: u8 = 4;

/// Default cap on scramble rounds before giving up on a level definition
pub const DEFAULT_SCRAMBLE_ROUNDS: u32 = 64;

/// Connector directions (grid sides a wire stub can face)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// All four directions, in canonical order
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Rotate clockwise (North -> East -> South -> West -> North)
    pub fn rotate_cw(self) -> Self {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
        }
    }

    /// Rotate counter-clockwise
    pub fn rotate_ccw(self) -> Self {
        match self {
            Direction::North => Direction::West,
            Direction::West => Direction::South,
            Direction::South => Direction::East,
            Direction::East => Direction::North,
        }
    }

    /// The side facing back at this one (North matches South, East matches West)
    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "north" | "n" => Some(Direction::North),
            "east" | "e" => Some(Direction::East),
            "south" | "s" => Some(Direction::South),
            "west" | "w" => Some(Direction::West),
            _ => None,
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
        }
    }
}

/// A 1-indexed (row, col) grid coordinate
///
/// Pure value type: equality and hashing by value, used as a map key
/// throughout the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Coordinate of the neighbor on the given side
    ///
    /// Returns None when stepping off the 1-indexed coordinate space
    /// (row/col 0). Bounds on the far side are the grid's concern.
    pub fn step(self, direction: Direction) -> Option<Position> {
        let (row, col) = match direction {
            Direction::North => (self.row.checked_sub(1)?, self.col),
            Direction::South => (self.row.checked_add(1)?, self.col),
            Direction::East => (self.row, self.col.checked_add(1)?),
            Direction::West => (self.row, self.col.checked_sub(1)?),
        };
        if row == 0 || col == 0 {
            return None;
        }
        Some(Position { row, col })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Cell kinds
///
/// Every grid position starts `Empty` and is promoted to a playable kind
/// at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Empty,
    Bulb,
    Power,
    Link,
}

impl NodeKind {
    /// Minimum connector count a cell of this kind must carry
    pub fn min_connectors(&self) -> usize {
        match self {
            NodeKind::Empty => 0,
            NodeKind::Bulb => 1,
            NodeKind::Power => 1,
            // A link with fewer than two connectors cannot conduct anywhere.
            NodeKind::Link => 2,
        }
    }

    /// Maximum connector count a cell of this kind may carry
    pub fn max_connectors(&self) -> usize {
        match self {
            NodeKind::Empty => 0,
            NodeKind::Bulb => 1,
            NodeKind::Power | NodeKind::Link => MAX_CONNECTORS,
        }
    }

    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "empty" => Some(NodeKind::Empty),
            "bulb" => Some(NodeKind::Bulb),
            "power" => Some(NodeKind::Power),
            "link" => Some(NodeKind::Link),
            _ => None,
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Empty => "empty",
            NodeKind::Bulb => "bulb",
            NodeKind::Power => "power",
            NodeKind::Link => "link",
        }
    }
}

/// Puzzle difficulty tiers (one axis of the snapshot-store key)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// Identity of a puzzle across sessions: difficulty tier plus level number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PuzzleId {
    pub difficulty: Difficulty,
    pub level: u32,
}

impl PuzzleId {
    pub fn new(difficulty: Difficulty, level: u32) -> Self {
        Self { difficulty, level }
    }
}

impl fmt::Display for PuzzleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.difficulty.as_str(), self.level)
    }
}
