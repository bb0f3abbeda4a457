//! Evaluation dispatcher: the single entry point for callers.
//!
//! [`Evaluator`] owns one strategy per concrete [`EvaluationMode`]. In AUTO
//! mode the board's occupancy picks the tier: sparse boards go to
//! Monte-Carlo, mid-game boards to tree search, and dense boards to the
//! exhaustive search.

use std::fmt;
use std::str::FromStr;

use log::{debug, warn};

use crate::board::Board;
use crate::constants::{DENSE_FILLED_LIMIT, SPARSE_FILLED_LIMIT};
use crate::error::EvalError;
use crate::montecarlo::{MonteCarlo, MonteCarloConfig};
use crate::moves::Direction;
use crate::strategy::{Expectimax, SearchStrategy, TreeSearch};
use crate::table;

/// How to search. The discriminants are the stable codes used across
/// language boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum EvaluationMode {
    /// Pick a concrete mode from the board's occupancy.
    #[default]
    Auto = 0,
    MonteCarlo = 1,
    TreeSearch = 2,
    Expectimax = 3,
}

impl EvaluationMode {
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Concrete mode for `board`; non-AUTO modes are returned as is.
    pub fn resolve(self, board: Board) -> EvaluationMode {
        match self {
            EvaluationMode::Auto => tier(board),
            concrete => concrete,
        }
    }
}

/// Occupancy tiering: fewer than 4 tiles (occupancy below 0.25) is
/// Monte-Carlo, up to 12 tiles (0.75) is tree search, anything denser is
/// exhaustive search.
pub fn tier(board: Board) -> EvaluationMode {
    let filled = board.count_filled();
    if filled < SPARSE_FILLED_LIMIT {
        EvaluationMode::MonteCarlo
    } else if filled <= DENSE_FILLED_LIMIT {
        EvaluationMode::TreeSearch
    } else {
        EvaluationMode::Expectimax
    }
}

impl TryFrom<u8> for EvaluationMode {
    type Error = EvalError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(EvaluationMode::Auto),
            1 => Ok(EvaluationMode::MonteCarlo),
            2 => Ok(EvaluationMode::TreeSearch),
            3 => Ok(EvaluationMode::Expectimax),
            _ => Err(EvalError::UnknownCode {
                kind: "evaluation mode",
                code,
            }),
        }
    }
}

impl fmt::Display for EvaluationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EvaluationMode::Auto => "auto",
            EvaluationMode::MonteCarlo => "mc",
            EvaluationMode::TreeSearch => "mcts",
            EvaluationMode::Expectimax => "expectimax",
        };
        f.write_str(name)
    }
}

impl FromStr for EvaluationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(EvaluationMode::Auto),
            "mc" | "monte-carlo" | "montecarlo" => Ok(EvaluationMode::MonteCarlo),
            "mcts" | "tree" | "tree-search" => Ok(EvaluationMode::TreeSearch),
            "expectimax" | "expmax" => Ok(EvaluationMode::Expectimax),
            other => Err(format!("unknown evaluation mode: {other}")),
        }
    }
}

/// A chosen move together with the position it leads to (before any spawn).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recommendation {
    pub direction: Direction,
    pub board: Board,
    /// Merge score earned by the move.
    pub score: u32,
}

/// Dispatches boards to the strategy for their evaluation mode.
pub struct Evaluator {
    monte_carlo: Box<dyn SearchStrategy>,
    tree_search: Box<dyn SearchStrategy>,
    expectimax: Box<dyn SearchStrategy>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(MonteCarloConfig::default())
    }
}

impl Evaluator {
    /// Monte-Carlo with `config`; tree and exhaustive search are placeholders.
    pub fn new(config: MonteCarloConfig) -> Self {
        Self::with_strategies(
            Box::new(MonteCarlo::new(config)),
            Box::new(TreeSearch),
            Box::new(Expectimax),
        )
    }

    /// Build from explicit strategies, one per concrete mode.
    pub fn with_strategies(
        monte_carlo: Box<dyn SearchStrategy>,
        tree_search: Box<dyn SearchStrategy>,
        expectimax: Box<dyn SearchStrategy>,
    ) -> Self {
        // Build the row table before any worker can race to it.
        table::init();
        Self {
            monte_carlo,
            tree_search,
            expectimax,
        }
    }

    fn strategy(&self, mode: EvaluationMode) -> &dyn SearchStrategy {
        match mode {
            EvaluationMode::Auto | EvaluationMode::MonteCarlo => self.monte_carlo.as_ref(),
            EvaluationMode::TreeSearch => self.tree_search.as_ref(),
            EvaluationMode::Expectimax => self.expectimax.as_ref(),
        }
    }

    /// Choose a move for a packed board.
    ///
    /// An explicit TreeSearch/Expectimax request fails if that strategy is
    /// unsupported. In AUTO mode an unsupported tier falls back to Monte-Carlo.
    pub fn evaluate_board(&self, board: Board, mode: EvaluationMode) -> Result<Direction, EvalError> {
        let concrete = mode.resolve(board);
        debug!(
            "evaluating {board:?} ({} filled) with {concrete} (requested {mode})",
            board.count_filled()
        );

        match self.strategy(concrete).select_move(board) {
            Err(EvalError::UnsupportedMode(unsupported))
                if mode == EvaluationMode::Auto && concrete != EvaluationMode::MonteCarlo =>
            {
                warn!("{unsupported} is not available, falling back to Monte-Carlo");
                self.monte_carlo.select_move(board)
            }
            other => other,
        }
    }

    /// Choose a move for a snapshot of 16 displayed tile values.
    pub fn evaluate(&self, cells: &[u32], mode: EvaluationMode) -> Result<Direction, EvalError> {
        let board = Board::from_cells(cells)?;
        self.evaluate_board(board, mode)
    }

    /// Like [`Evaluator::evaluate`], also returning the resulting position.
    pub fn recommend(&self, cells: &[u32], mode: EvaluationMode) -> Result<Recommendation, EvalError> {
        let board = Board::from_cells(cells)?;
        let direction = self.evaluate_board(board, mode)?;
        let (next, score) = board.shift(direction);
        Ok(Recommendation {
            direction,
            board: next,
            score,
        })
    }
}

/// Evaluate a tile snapshot with the default configuration.
pub fn evaluate(cells: &[u32], mode: EvaluationMode) -> Result<Direction, EvalError> {
    Evaluator::default().evaluate(cells, mode)
}
