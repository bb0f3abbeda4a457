//! Random tile placement.
//!
//! Empty cells are located with the same nibble-zero test as terminal
//! detection, counted with a population count, and the chosen one is
//! extracted with a select-nth-set-bit instead of scanning the board.

use fastrand::Rng;

use crate::bits::{popcount, select};
use crate::board::Board;
use crate::constants::{SPAWN_FOUR, SPAWN_FOUR_ODDS, SPAWN_TWO};

/// Exponent of a new tile: a 2 nine times out of ten, otherwise a 4.
#[inline]
pub fn random_exponent(rng: &mut Rng) -> u64 {
    if rng.u32(..SPAWN_FOUR_ODDS) == 0 {
        SPAWN_FOUR
    } else {
        SPAWN_TWO
    }
}

impl Board {
    /// Place a 2 (90%) or 4 (10%) in a uniformly chosen empty cell.
    ///
    /// A full board is returned unchanged.
    #[inline]
    pub fn with_random_tile(self, rng: &mut Rng) -> Board {
        let empty = self.empty_nibbles();
        let count = popcount(empty);
        if count == 0 {
            return self;
        }
        let exponent = random_exponent(rng);
        // `select` lands on the LSB of the chosen nibble, i.e. bit 4 * cell.
        let shift = select(empty, rng.u32(..count));
        Board::from_raw(self.raw() | exponent << shift)
    }
}
