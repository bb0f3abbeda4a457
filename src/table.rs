//! Row transition table.
//!
//! For every 16-bit row pattern the table stores the row produced by pushing
//! it toward cell 0 (slide, merge once, slide) and the score that push earns.
//! All four move directions are derived from this single table by the move
//! engine. The table is built once per process behind a [`OnceLock`] and is
//! read-only afterwards, so any number of threads may share it.

use std::sync::OnceLock;

use log::trace;

use crate::constants::{CELL_BITS, CELL_MASK, MAX_EXPONENT, ROW_PATTERNS, SIDE};

/// Result of pushing one row toward cell 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowEntry {
    /// Sum of the displayed values of every tile created by a merge.
    pub score: u32,
    /// Packed row after the push.
    pub row: u16,
}

/// Lookup table indexed by packed row bits.
pub struct RowTable {
    entries: Box<[RowEntry]>,
}

impl RowTable {
    fn build() -> Self {
        let entries: Vec<RowEntry> = (0..ROW_PATTERNS).map(|r| push_row(r as u16)).collect();
        trace!("built row transition table with {} entries", entries.len());
        RowTable {
            entries: entries.into_boxed_slice(),
        }
    }

    #[inline(always)]
    pub fn lookup(&self, row: u16) -> RowEntry {
        // `entries` has exactly 2^16 slots, so any u16 is in bounds.
        self.entries[row as usize]
    }
}

static ROW_TABLE: OnceLock<RowTable> = OnceLock::new();

/// Build the table if no thread has yet. Safe to call any number of times.
pub fn init() {
    row_table();
}

/// The process-wide table, built on first use.
#[inline(always)]
pub fn row_table() -> &'static RowTable {
    ROW_TABLE.get_or_init(RowTable::build)
}

/// Slide, merge, slide one packed row toward cell 0.
///
/// Equal non-zero neighbours merge left to right, each cell at most once per
/// push: the earlier cell's exponent goes up by one and the later cell empties.
/// Two 32768 tiles stay apart since their merge does not fit in a nibble.
pub fn push_row(row: u16) -> RowEntry {
    let mut cells: [u8; SIDE] =
        std::array::from_fn(|i| ((u64::from(row) >> (i as u32 * CELL_BITS)) & CELL_MASK) as u8);

    slide(&mut cells);
    let mut score = 0u32;
    for i in 1..SIDE {
        let e = cells[i];
        if e != 0 && e == cells[i - 1] && e < MAX_EXPONENT {
            cells[i - 1] = e + 1;
            cells[i] = 0;
            score += 1 << (e + 1);
        }
    }
    slide(&mut cells);

    let packed = cells
        .iter()
        .enumerate()
        .fold(0u16, |acc, (i, &e)| acc | u16::from(e) << (i as u32 * CELL_BITS));
    RowEntry { score, row: packed }
}

/// Stable compaction of non-zero cells toward index 0.
fn slide(cells: &mut [u8; SIDE]) {
    let mut write = 0;
    for read in 0..SIDE {
        if cells[read] != 0 {
            cells.swap(write, read);
            write += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: [u16; 4]) -> u16 {
        cells[0] | cells[1] << 4 | cells[2] << 8 | cells[3] << 12
    }

    /// Reference push on a Vec, written independently of `push_row`.
    fn naive_push(cells: [u16; 4]) -> (Vec<u16>, u32) {
        let tiles: Vec<u16> = cells.iter().copied().filter(|&e| e != 0).collect();
        let mut out = Vec::new();
        let mut score = 0;
        let mut i = 0;
        while i < tiles.len() {
            if i + 1 < tiles.len() && tiles[i] == tiles[i + 1] && tiles[i] < 15 {
                out.push(tiles[i] + 1);
                score += 1u32 << (tiles[i] + 1);
                i += 2;
            } else {
                out.push(tiles[i]);
                i += 1;
            }
        }
        out.resize(4, 0);
        (out, score)
    }

    #[test]
    fn test_pair_merges() {
        // [2, 2, _, _] -> [4, _, _, _]
        let e = push_row(row([1, 1, 0, 0]));
        assert_eq!(e.row, row([2, 0, 0, 0]));
        assert_eq!(e.score, 4);
    }

    #[test]
    fn test_merged_tile_does_not_merge_again() {
        // [_, 2, 2, 4] -> [4, 4, _, _]
        let e = push_row(row([0, 1, 1, 2]));
        assert_eq!(e.row, row([2, 2, 0, 0]));
        assert_eq!(e.score, 4);
    }

    #[test]
    fn test_four_equal_tiles_merge_in_pairs() {
        let e = push_row(row([3, 3, 3, 3]));
        assert_eq!(e.row, row([4, 4, 0, 0]));
        assert_eq!(e.score, 32);
    }

    #[test]
    fn test_no_merge_across_gap_of_different_tile() {
        let e = push_row(row([1, 2, 1, 0]));
        assert_eq!(e.row, row([1, 2, 1, 0]));
        assert_eq!(e.score, 0);
    }

    #[test]
    fn test_slide_across_gaps() {
        let e = push_row(row([0, 0, 0, 5]));
        assert_eq!(e.row, row([5, 0, 0, 0]));
        let e = push_row(row([4, 0, 0, 4]));
        assert_eq!(e.row, row([5, 0, 0, 0]));
        assert_eq!(e.score, 32);
    }

    #[test]
    fn test_max_exponent_does_not_merge() {
        let e = push_row(row([15, 15, 0, 0]));
        assert_eq!(e.row, row([15, 15, 0, 0]));
        assert_eq!(e.score, 0);
    }

    #[test]
    fn test_score_can_exceed_u16() {
        let e = push_row(row([14, 14, 14, 14]));
        assert_eq!(e.row, row([15, 15, 0, 0]));
        assert_eq!(e.score, 65_536);
    }

    #[test]
    fn test_table_matches_reference_for_every_row() {
        let table = row_table();
        assert_eq!(table.entries.len(), ROW_PATTERNS);
        for r in 0..ROW_PATTERNS {
            let r = r as u16;
            let cells = [r & 0xF, (r >> 4) & 0xF, (r >> 8) & 0xF, r >> 12];
            let (expected, score) = naive_push(cells);
            let entry = table.lookup(r);
            assert_eq!(
                entry.row,
                row([expected[0], expected[1], expected[2], expected[3]]),
                "row {r:#06x}"
            );
            assert_eq!(entry.score, score, "row {r:#06x}");
        }
    }

    #[test]
    fn test_init_is_idempotent() {
        init();
        let a = row_table() as *const RowTable;
        init();
        let b = row_table() as *const RowTable;
        assert_eq!(a, b);
    }
}
