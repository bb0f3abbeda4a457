//! Error types for board decoding and move evaluation.

use thiserror::Error;

use crate::dispatch::EvaluationMode;

/// Why a raw tile snapshot could not be packed into a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("expected 16 cells, got {0}")]
    CellCount(usize),
    #[error("cell {index} holds {value}, which is neither 0 nor a tile (2, 4, 8, ...)")]
    NotATile { index: usize, value: u32 },
    #[error("cell {index} holds {value}, larger than the biggest representable tile")]
    TileTooLarge { index: usize, value: u32 },
}

/// Errors surfaced by the evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("invalid board: {0}")]
    InvalidBoard(#[from] BoardError),

    /// A rollout ran past the ply bound; terminal detection is broken.
    #[error("internal invariant violated: rollout from {board:#018x} exceeded {plies} plies")]
    InternalInvariantViolation { board: u64, plies: u64 },

    #[error("evaluation mode {0:?} is not implemented")]
    UnsupportedMode(EvaluationMode),

    #[error("unknown {kind} code {code}")]
    UnknownCode { kind: &'static str, code: u8 },
}
