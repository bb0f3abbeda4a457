//! Constants for board geometry, bit masks, and search parameters.
//!
//! The board is a 4x4 grid packed into a `u64`: cell `i` (row-major) lives in
//! the nibble at bits `[4i, 4i + 4)`, so row `r` occupies bits `[16r, 16r + 16)`
//! and cell 0 is the least significant nibble.

// =============================================================================
// Board Geometry
// =============================================================================

/// Cells per row/column.
pub const SIDE: usize = 4;

/// Total number of cells on the board.
pub const CELL_COUNT: usize = SIDE * SIDE;

/// Bits per packed cell.
pub const CELL_BITS: u32 = 4;

/// Bits per packed row.
pub const ROW_BITS: u32 = 16;

/// Largest exponent a nibble can hold (tile 32768).
pub const MAX_EXPONENT: u8 = 15;

/// Number of distinct 16-bit row patterns (row table size).
pub const ROW_PATTERNS: usize = 1 << ROW_BITS;

// =============================================================================
// Bit Masks
// =============================================================================

/// Low 16 bits: one packed row.
pub const ROW_MASK: u64 = 0xFFFF;

/// Low 4 bits: one packed cell.
pub const CELL_MASK: u64 = 0xF;

/// Least significant bit of every nibble.
pub const NIBBLE_LSB: u64 = 0x1111_1111_1111_1111;

/// Upper two bits of every nibble.
pub const NIBBLE_HI2: u64 = 0xCCCC_CCCC_CCCC_CCCC;

/// Nibble LSBs of columns 0..3 in every row (cells with a right neighbour).
pub const HAS_RIGHT_NEIGHBOUR: u64 = 0x0111_0111_0111_0111;

/// Nibble LSBs of rows 0..3 (cells with a neighbour below).
pub const HAS_LOWER_NEIGHBOUR: u64 = 0x0000_1111_1111_1111;

// =============================================================================
// Tile Spawning
// =============================================================================

/// Exponent of a freshly spawned "2".
pub const SPAWN_TWO: u64 = 1;

/// Exponent of a freshly spawned "4".
pub const SPAWN_FOUR: u64 = 2;

/// A spawn is a 4 one time in `SPAWN_FOUR_ODDS`.
pub const SPAWN_FOUR_ODDS: u32 = 10;

// =============================================================================
// Monte-Carlo Parameters
// =============================================================================

/// Default number of rollouts per candidate direction.
pub const N_ROLLOUTS: usize = 200_000;

/// Default weight of the normalised average score.
pub const SCORE_WEIGHT: f64 = 0.5;

/// Default weight of the normalised average survival length.
pub const STEPS_WEIGHT: f64 = 2.0;

/// Move attempts after which a rollout is considered runaway.
pub const MAX_ROLLOUT_PLIES: u64 = 100_000;

// =============================================================================
// Dispatcher Tiers
// =============================================================================

/// Boards with fewer filled cells than this go to Monte-Carlo (occupancy < 0.25).
pub const SPARSE_FILLED_LIMIT: u32 = 4;

/// Boards with at most this many filled cells go to tree search (occupancy <= 0.75).
pub const DENSE_FILLED_LIMIT: u32 = 12;
