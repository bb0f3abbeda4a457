//! Random playouts (rollouts).
//!
//! A rollout plays uniformly random directions from a position until the
//! board is terminal. Null moves are retried without spawning a tile. A move
//! that changes the board counts as one step of survival and is followed by
//! a random spawn.

use fastrand::Rng;

use crate::board::Board;
use crate::error::EvalError;
use crate::moves::Direction;

/// Outcome of one rollout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rollout {
    /// Merge score earned during the rollout.
    pub score: u64,
    /// Moves that changed the board.
    pub steps: u64,
}

/// Pick one of the four moves uniformly.
#[inline]
pub fn random_direction(rng: &mut Rng) -> Direction {
    Direction::MOVES[rng.usize(..Direction::MOVES.len())]
}

/// Play random moves from `start` until the game ends.
///
/// Fails with [`EvalError::InternalInvariantViolation`] after `max_plies`
/// move attempts; a real game cannot last that long, so hitting the bound
/// means terminal detection disagrees with the move engine.
pub fn rollout(start: Board, rng: &mut Rng, max_plies: u64) -> Result<Rollout, EvalError> {
    let mut board = start;
    let mut result = Rollout::default();
    let mut plies = 0u64;

    while !board.has_ended() {
        if plies >= max_plies {
            return Err(EvalError::InternalInvariantViolation {
                board: start.raw(),
                plies,
            });
        }
        plies += 1;

        if let Some((moved, gained)) = board.try_shift(random_direction(rng)) {
            result.score += u64::from(gained);
            result.steps += 1;
            board = moved.with_random_tile(rng);
        }
    }

    Ok(result)
}
