//! Search strategies behind the move-selection contract.
//!
//! The dispatcher holds one [`SearchStrategy`] per concrete evaluation mode.
//! Monte-Carlo lives in [`crate::montecarlo`]; tree search and exhaustive
//! (expectimax) search are placeholders that report themselves unsupported.

use crate::board::Board;
use crate::dispatch::EvaluationMode;
use crate::error::EvalError;
use crate::moves::Direction;

/// Pick a move for a board.
///
/// Implementations must be shareable across threads and must return
/// [`Direction::None`] for a terminal board.
pub trait SearchStrategy: Send + Sync {
    /// The mode this strategy serves.
    fn mode(&self) -> EvaluationMode;

    fn select_move(&self, board: Board) -> Result<Direction, EvalError>;
}

/// Placeholder for tree-structured Monte-Carlo search.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeSearch;

impl SearchStrategy for TreeSearch {
    fn mode(&self) -> EvaluationMode {
        EvaluationMode::TreeSearch
    }

    fn select_move(&self, _board: Board) -> Result<Direction, EvalError> {
        Err(EvalError::UnsupportedMode(self.mode()))
    }
}

/// Placeholder for exhaustive expectation-maximisation search.
#[derive(Debug, Clone, Copy, Default)]
pub struct Expectimax;

impl SearchStrategy for Expectimax {
    fn mode(&self) -> EvaluationMode {
        EvaluationMode::Expectimax
    }

    fn select_move(&self, _board: Board) -> Result<Direction, EvalError> {
        Err(EvalError::UnsupportedMode(self.mode()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_are_unsupported() {
        let b = Board::from_raw(0x1);
        assert_eq!(
            TreeSearch.select_move(b),
            Err(EvalError::UnsupportedMode(EvaluationMode::TreeSearch))
        );
        assert_eq!(
            Expectimax.select_move(b),
            Err(EvalError::UnsupportedMode(EvaluationMode::Expectimax))
        );
    }
}
