//! Move directions and the move engine.
//!
//! Every direction reduces to the LEFT primitive (a row-table lookup per row):
//! RIGHT mirrors the rows around it, UP transposes around it, and DOWN does both.

use std::fmt;
use std::str::FromStr;

use crate::board::Board;
use crate::constants::{ROW_BITS, SIDE};
use crate::error::EvalError;
use crate::table::row_table;

/// A move direction. The discriminants are the stable codes used across
/// language boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
    /// No move. Returned when the board has nothing left to play.
    None = 4,
}

impl Direction {
    /// The four real moves, in code order.
    pub const MOVES: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Direction {
    type Error = EvalError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Direction::Up),
            1 => Ok(Direction::Down),
            2 => Ok(Direction::Left),
            3 => Ok(Direction::Right),
            4 => Ok(Direction::None),
            _ => Err(EvalError::UnknownCode {
                kind: "direction",
                code,
            }),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
            Direction::None => "NONE",
        };
        f.write_str(name)
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" | "u" => Ok(Direction::Up),
            "down" | "d" => Ok(Direction::Down),
            "left" | "l" => Ok(Direction::Left),
            "right" | "r" => Ok(Direction::Right),
            "none" => Ok(Direction::None),
            other => Err(format!("unknown direction: {other}")),
        }
    }
}

impl Board {
    /// Slide and merge in `dir`, returning the new board and the merge score.
    ///
    /// No tile is spawned. `Direction::None` returns the board unchanged with
    /// zero score. A result equal to `self` is a null move.
    #[inline]
    pub fn shift(self, dir: Direction) -> (Board, u32) {
        match dir {
            Direction::Left => push_left(self),
            Direction::Right => {
                let (b, score) = push_left(self.reverse_rows());
                (b.reverse_rows(), score)
            }
            Direction::Up => {
                let (b, score) = push_left(self.transpose());
                (b.transpose(), score)
            }
            Direction::Down => {
                let (b, score) = push_left(self.transpose().reverse_rows());
                (b.reverse_rows().transpose(), score)
            }
            Direction::None => (self, 0),
        }
    }

    /// Like [`Board::shift`], but `None` for a null move.
    #[inline]
    pub fn try_shift(self, dir: Direction) -> Option<(Board, u32)> {
        let (moved, score) = self.shift(dir);
        (moved != self).then_some((moved, score))
    }

    /// Directions that change the board, in code order.
    pub fn legal_moves(self) -> Vec<Direction> {
        Direction::MOVES
            .into_iter()
            .filter(|&d| self.try_shift(d).is_some())
            .collect()
    }
}

#[inline(always)]
fn push_left(board: Board) -> (Board, u32) {
    let table = row_table();
    let mut raw = 0u64;
    let mut score = 0u32;
    for r in 0..SIDE {
        let entry = table.lookup(board.row(r));
        raw |= u64::from(entry.row) << (r as u32 * ROW_BITS);
        score += entry.score;
    }
    (Board::from_raw(raw), score)
}
