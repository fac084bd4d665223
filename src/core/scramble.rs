//! Scramble module - randomized unsolved-start rotation
//!
//! Level-start logic rotates playable cells at random until no bulb is
//! lit, so every generated puzzle instance starts unsolved. The loop is
//! capped: a connector configuration that stays lit past the cap is a
//! content error and is reported instead of retried forever.

use tracing::debug;

use crate::core::grid::Grid;
use crate::core::rng::SimpleRng;
use crate::error::ConfigError;
use crate::types::{Position, TURNS_PER_CYCLE};

/// Rotate playable cells at random until `any_bulb_lit()` is false
///
/// Each round visits every playable cell in shuffled order and applies a
/// random number of turns (0..4). Returns the number of rounds used (zero
/// when the grid already starts unsolved). Fails with `ScrambleExhausted`
/// once `max_rounds` rounds have passed with a bulb still lit, and with
/// the usual configuration errors if the grid is not a valid puzzle.
pub fn scramble(
    grid: &mut Grid,
    rng: &mut SimpleRng,
    max_rounds: u32,
) -> Result<u32, ConfigError> {
    // Establish lit state before the first check.
    grid.init()?;

    let mut positions: Vec<Position> = grid.playable_positions().to_vec();
    let mut round = 0u32;

    while grid.any_bulb_lit() {
        if round >= max_rounds {
            return Err(ConfigError::ScrambleExhausted { rounds: max_rounds });
        }
        round += 1;

        rng.shuffle(&mut positions);
        for &pos in &positions {
            let turns = rng.next_range(TURNS_PER_CYCLE as u32);
            for _ in 0..turns {
                grid.rotate(pos)?;
            }
        }
        debug!(round, lit = grid.any_bulb_lit(), "scramble round applied");
    }

    Ok(round)
}
