//! eval2048: a bitboard 2048 engine with a Monte-Carlo move evaluator.
//!
//! A position is a 4x4 grid packed into a `u64`, one exponent nibble per
//! cell. Moves are driven by a precomputed row transition table; the four
//! directions are derived from the LEFT push by mirroring and transposing.
//!
//! ## Modules
//!
//! - [`constants`] - Geometry, bit masks, and search defaults
//! - [`bits`] - `pext` / select / popcount with portable fallbacks
//! - [`board`] - Packed board codec, transforms, terminal detection
//! - [`table`] - Row transition table (built once per process)
//! - [`moves`] - Directions and the move engine
//! - [`spawn`] - Random tile placement
//! - [`playout`] - Random rollouts
//! - [`montecarlo`] - Parallel Monte-Carlo move evaluation
//! - [`strategy`] - The `SearchStrategy` trait and placeholder strategies
//! - [`dispatch`] - Mode selection and the `evaluate` entry point
//! - [`error`] - Error types
//!
//! ## Example
//!
//! ```
//! use eval2048::dispatch::{EvaluationMode, Evaluator};
//! use eval2048::montecarlo::MonteCarloConfig;
//! use eval2048::moves::Direction;
//!
//! let cells = [
//!     2, 2, 0, 0,
//!     0, 4, 0, 0,
//!     0, 0, 0, 0,
//!     0, 0, 0, 0,
//! ];
//! let evaluator = Evaluator::new(MonteCarloConfig::default().with_rollouts(100).with_seed(7));
//! let dir = evaluator.evaluate(&cells, EvaluationMode::MonteCarlo).unwrap();
//! assert_ne!(dir, Direction::None);
//! ```

pub mod bits;
pub mod board;
pub mod constants;
pub mod dispatch;
pub mod error;
pub mod montecarlo;
pub mod moves;
pub mod playout;
pub mod spawn;
pub mod strategy;
pub mod table;

pub use board::Board;
pub use dispatch::{EvaluationMode, Evaluator, Recommendation, evaluate};
pub use error::{BoardError, EvalError};
pub use moves::Direction;
