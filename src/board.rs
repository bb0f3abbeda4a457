//! Packed 4x4 board: codec, geometric transforms, and terminal detection.
//!
//! A [`Board`] is a plain `u64` value. Each cell stores a tile exponent `e`
//! (0 = empty, otherwise the tile shows `2^e`) in one nibble, row-major, with
//! cell 0 in the least significant nibble. Every operation returns a new board.

use std::fmt;

use crate::bits::{pext, popcount};
use crate::constants::{
    CELL_BITS, CELL_COUNT, CELL_MASK, HAS_LOWER_NEIGHBOUR, HAS_RIGHT_NEIGHBOUR, MAX_EXPONENT,
    NIBBLE_HI2, NIBBLE_LSB, ROW_BITS, ROW_MASK, SIDE,
};
use crate::error::BoardError;

/// A 2048 position packed as 16 exponent nibbles.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board(u64);

impl Board {
    /// The board with no tiles.
    pub const EMPTY: Board = Board(0);

    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Board(raw)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Pack 16 exponents. Only the low nibble of each value is kept.
    pub fn from_exponents(exponents: [u8; CELL_COUNT]) -> Self {
        let raw = exponents
            .iter()
            .enumerate()
            .fold(0u64, |acc, (i, &e)| acc | (u64::from(e) & CELL_MASK) << (i as u32 * CELL_BITS));
        Board(raw)
    }

    /// Unpack into 16 exponents, cell 0 first.
    pub fn exponents(self) -> [u8; CELL_COUNT] {
        std::array::from_fn(|i| self.exponent(i))
    }

    /// Pack a snapshot of displayed tile values (0 or powers of two).
    ///
    /// Each value becomes its base-2 logarithm via a trailing-zero count.
    pub fn from_cells(cells: &[u32]) -> Result<Self, BoardError> {
        if cells.len() != CELL_COUNT {
            return Err(BoardError::CellCount(cells.len()));
        }
        let mut exponents = [0u8; CELL_COUNT];
        for (index, &value) in cells.iter().enumerate() {
            if value == 0 {
                continue;
            }
            if value == 1 || !value.is_power_of_two() {
                return Err(BoardError::NotATile { index, value });
            }
            let e = value.trailing_zeros();
            if e > u32::from(MAX_EXPONENT) {
                return Err(BoardError::TileTooLarge { index, value });
            }
            exponents[index] = e as u8;
        }
        Ok(Board::from_exponents(exponents))
    }

    /// Displayed tile values, 0 for empty cells.
    pub fn cells(self) -> [u32; CELL_COUNT] {
        self.exponents().map(|e| if e == 0 { 0 } else { 1u32 << e })
    }

    /// Exponent stored at cell `idx` (row-major, 0..16).
    #[inline]
    pub fn exponent(self, idx: usize) -> u8 {
        debug_assert!(idx < CELL_COUNT);
        ((self.0 >> (idx as u32 * CELL_BITS)) & CELL_MASK) as u8
    }

    /// Packed bits of row `r`.
    #[inline]
    pub fn row(self, r: usize) -> u16 {
        debug_assert!(r < SIDE);
        ((self.0 >> (r as u32 * ROW_BITS)) & ROW_MASK) as u16
    }

    /// Largest exponent on the board.
    pub fn max_exponent(self) -> u8 {
        self.exponents().into_iter().max().unwrap_or(0)
    }

    /// One bit per empty cell, at the LSB of that cell's nibble.
    #[inline]
    pub(crate) fn empty_nibbles(self) -> u64 {
        zero_nibbles(self.0)
    }

    /// 16-bit mask with bit `i` set when cell `i` is empty.
    #[inline]
    pub fn empty_mask(self) -> u16 {
        pext(self.empty_nibbles(), NIBBLE_LSB) as u16
    }

    #[inline]
    pub fn count_empty(self) -> u32 {
        popcount(self.empty_nibbles())
    }

    #[inline]
    pub fn count_filled(self) -> u32 {
        CELL_COUNT as u32 - self.count_empty()
    }

    /// Mirror every row left-to-right.
    ///
    /// Swaps the two bytes of each 16-bit row, then the two nibbles of each byte.
    #[inline]
    pub fn reverse_rows(self) -> Self {
        let x = self.0;
        let t = (x ^ (x >> 8)) & 0x00FF_00FF_00FF_00FF;
        let x = x ^ t ^ (t << 8);
        let t = (x ^ (x >> 4)) & 0x0F0F_0F0F_0F0F_0F0F;
        Board(x ^ t ^ (t << 4))
    }

    /// Swap rows and columns.
    ///
    /// First exchanges the off-diagonal 2x2 blocks (24-bit distance), then the
    /// off-diagonal cells inside every 2x2 block (12-bit distance).
    #[inline]
    pub fn transpose(self) -> Self {
        let x = self.0;
        let t = (x ^ (x >> 24)) & 0x0000_0000_FF00_FF00;
        let x = x ^ t ^ (t << 24);
        let t = (x ^ (x >> 12)) & 0x0000_F0F0_0000_F0F0;
        Board(x ^ t ^ (t << 12))
    }

    /// True when the board is full and no two neighbouring cells can merge.
    ///
    /// The empty-cell test runs first: it settles almost every call, and the
    /// adjacency masks below are only meaningful on a full board. A pair of
    /// exponent-15 tiles is not a merge (the row table never combines them).
    #[inline]
    pub fn has_ended(self) -> bool {
        let x = self.0;
        if zero_nibbles(x) != 0 {
            return false;
        }
        let mergeable = !full_nibbles(x);
        let horizontal = zero_nibbles(x ^ (x >> CELL_BITS)) & mergeable & HAS_RIGHT_NEIGHBOUR;
        let vertical = zero_nibbles(x ^ (x >> ROW_BITS)) & mergeable & HAS_LOWER_NEIGHBOUR;
        (horizontal | vertical) == 0
    }
}

/// Set the LSB of every nibble of `x` that is zero.
#[inline(always)]
fn zero_nibbles(x: u64) -> u64 {
    let x = x | ((x & NIBBLE_HI2) >> 2);
    !(x | (x >> 1)) & NIBBLE_LSB
}

/// Set the LSB of every nibble of `x` that holds the maximum exponent.
#[inline(always)]
fn full_nibbles(x: u64) -> u64 {
    x & (x >> 1) & (x >> 2) & (x >> 3) & NIBBLE_LSB
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({:#018x})", self.0)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells = self.cells();
        for row in cells.chunks(SIDE) {
            for &value in row {
                if value == 0 {
                    write!(f, "{:>6}", ".")?;
                } else {
                    write!(f, "{value:>6}")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl From<u64> for Board {
    fn from(raw: u64) -> Self {
        Board::from_raw(raw)
    }
}

impl From<Board> for u64 {
    fn from(board: Board) -> Self {
        board.raw()
    }
}

impl TryFrom<&[u32]> for Board {
    type Error = BoardError;

    fn try_from(cells: &[u32]) -> Result<Self, Self::Error> {
        Board::from_cells(cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_transpose(b: Board) -> Board {
        let e = b.exponents();
        Board::from_exponents(std::array::from_fn(|i| e[(i % SIDE) * SIDE + i / SIDE]))
    }

    fn naive_reverse(b: Board) -> Board {
        let e = b.exponents();
        Board::from_exponents(std::array::from_fn(|i| e[(i / SIDE) * SIDE + (SIDE - 1 - i % SIDE)]))
    }

    fn single_tile_boards() -> impl Iterator<Item = Board> {
        (0..CELL_COUNT).flat_map(|idx| {
            (1..=u64::from(MAX_EXPONENT)).map(move |e| Board::from_raw(e << (idx as u32 * CELL_BITS)))
        })
    }

    #[test]
    fn test_exponent_layout() {
        let b = Board::from_raw(0xFEDC_BA98_7654_3210);
        for i in 0..CELL_COUNT {
            assert_eq!(b.exponent(i), i as u8);
        }
        assert_eq!(b.row(0), 0x3210);
        assert_eq!(b.row(3), 0xFEDC);
    }

    #[test]
    fn test_codec_roundtrip() {
        let mut rng = fastrand::Rng::with_seed(11);
        for _ in 0..10_000 {
            let b = Board::from_raw(rng.u64(..));
            assert_eq!(Board::from_exponents(b.exponents()), b);
            assert_eq!(Board::from_cells(&b.cells()), Ok(b));
        }
    }

    #[test]
    fn test_from_cells() {
        let mut cells = [0u32; CELL_COUNT];
        cells[0] = 2;
        cells[5] = 1024;
        cells[15] = 32768;
        let b = Board::from_cells(&cells).unwrap();
        assert_eq!(b.exponent(0), 1);
        assert_eq!(b.exponent(5), 10);
        assert_eq!(b.exponent(15), 15);
        assert_eq!(b.count_empty(), 13);
    }

    #[test]
    fn test_from_cells_rejects_malformed() {
        assert_eq!(Board::from_cells(&[0; 15]), Err(BoardError::CellCount(15)));
        let mut cells = [0u32; CELL_COUNT];
        cells[3] = 6;
        assert_eq!(
            Board::from_cells(&cells),
            Err(BoardError::NotATile { index: 3, value: 6 })
        );
        cells[3] = 1;
        assert_eq!(
            Board::from_cells(&cells),
            Err(BoardError::NotATile { index: 3, value: 1 })
        );
        cells[3] = 65536;
        assert_eq!(
            Board::from_cells(&cells),
            Err(BoardError::TileTooLarge { index: 3, value: 65536 })
        );
    }

    #[test]
    fn test_transforms_are_involutions() {
        let mut rng = fastrand::Rng::with_seed(3);
        for _ in 0..10_000 {
            let b = Board::from_raw(rng.u64(..));
            assert_eq!(b.reverse_rows().reverse_rows(), b);
            assert_eq!(b.transpose().transpose(), b);
        }
    }

    #[test]
    fn test_transforms_match_naive_on_single_tiles() {
        for b in single_tile_boards() {
            assert_eq!(b.transpose(), naive_transpose(b), "{b:?}");
            assert_eq!(b.reverse_rows(), naive_reverse(b), "{b:?}");
        }
    }

    #[test]
    fn test_transforms_match_naive_on_random_boards() {
        let mut rng = fastrand::Rng::with_seed(5);
        for _ in 0..10_000 {
            let b = Board::from_raw(rng.u64(..));
            assert_eq!(b.transpose(), naive_transpose(b), "{b:?}");
            assert_eq!(b.reverse_rows(), naive_reverse(b), "{b:?}");
        }
    }

    #[test]
    fn test_empty_mask_and_counts() {
        assert_eq!(Board::EMPTY.empty_mask(), 0xFFFF);
        assert_eq!(Board::EMPTY.count_empty(), 16);
        let b = Board::from_raw(0x1000_0000_0000_0021);
        assert_eq!(b.empty_mask(), 0b0111_1111_1111_1100);
        assert_eq!(b.count_empty(), 13);
        assert_eq!(b.count_filled(), 3);
        assert_eq!(b.max_exponent(), 2);
    }

    #[test]
    fn test_has_ended_checkerboard() {
        let b = Board::from_exponents([1, 2, 1, 2, 2, 1, 2, 1, 1, 2, 1, 2, 2, 1, 2, 1]);
        assert!(b.has_ended());
    }

    #[test]
    fn test_has_ended_ignores_row_wraparound() {
        // (0,3) and (1,0) share an exponent but are not neighbours.
        let b = Board::from_exponents([1, 2, 3, 4, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15]);
        assert!(b.has_ended());
    }

    #[test]
    fn test_has_ended_with_adjacent_pair() {
        let horizontal = Board::from_exponents([1, 2, 1, 2, 2, 1, 2, 1, 1, 2, 1, 2, 3, 4, 4, 5]);
        assert!(!horizontal.has_ended());
        let vertical = Board::from_exponents([1, 2, 1, 2, 2, 1, 2, 1, 1, 2, 1, 2, 1, 3, 4, 5]);
        assert!(!vertical.has_ended());
    }

    #[test]
    fn test_has_ended_with_only_max_tile_pairs() {
        // Two 32768s never merge, so neither pair keeps the game alive.
        let horizontal =
            Board::from_exponents([15, 15, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 1, 12, 13, 14]);
        assert!(horizontal.has_ended());
        let vertical =
            Board::from_exponents([15, 1, 2, 3, 15, 4, 5, 6, 7, 8, 9, 10, 1, 12, 13, 14]);
        assert!(vertical.has_ended());
        // A 14 pair next to them still merges.
        let live = Board::from_exponents([15, 15, 14, 14, 3, 4, 5, 6, 7, 8, 9, 10, 1, 12, 13, 2]);
        assert!(!live.has_ended());
    }

    #[test]
    fn test_has_ended_false_with_empty_cell() {
        let b = Board::from_exponents([1, 2, 1, 2, 2, 1, 2, 1, 1, 2, 1, 2, 2, 1, 2, 0]);
        assert!(!b.has_ended());
        assert!(!Board::EMPTY.has_ended());
    }

    #[test]
    fn test_display() {
        let b = Board::from_exponents([1, 0, 0, 0, 0, 11, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2]);
        let s = b.to_string();
        let lines: Vec<&str> = s.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "     2     .     .     .");
        assert_eq!(lines[1], "     .  2048     .     .");
        assert_eq!(lines[3], "     .     .     .     4");
    }
}
