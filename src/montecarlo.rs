//! Flat Monte-Carlo move evaluation.
//!
//! For each direction that changes the board, a worker runs many rollouts
//! from the post-move position (each with its own random spawn) and sums the
//! score and survival length they reach. Directions are then compared on a
//! weighted mix of their average score and average survival, each normalised
//! by its total over the eligible directions.
//!
//! The (at most four) workers run as rayon tasks. Each owns its generator
//! and writes into its own result slot; the slots are read only after the
//! scope has joined every task.

use fastrand::Rng;
use log::debug;

use crate::board::Board;
use crate::constants::{MAX_ROLLOUT_PLIES, N_ROLLOUTS, SCORE_WEIGHT, STEPS_WEIGHT};
use crate::dispatch::EvaluationMode;
use crate::error::EvalError;
use crate::moves::Direction;
use crate::playout::rollout;
use crate::strategy::SearchStrategy;

/// Odd constant used to spread a base seed across the four workers.
const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Configurable knobs for the Monte-Carlo evaluator.
///
/// - `rollouts`: rollouts per eligible direction.
/// - `score_weight` / `steps_weight`: weights of the normalised averages.
/// - `seed`: base seed for reproducible runs; `None` seeds every worker
///   independently.
/// - `max_plies`: move attempts after which a rollout is treated as runaway.
#[derive(Debug, Clone, PartialEq)]
pub struct MonteCarloConfig {
    pub rollouts: usize,
    pub score_weight: f64,
    pub steps_weight: f64,
    pub seed: Option<u64>,
    pub max_plies: u64,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            rollouts: N_ROLLOUTS,
            score_weight: SCORE_WEIGHT,
            steps_weight: STEPS_WEIGHT,
            seed: None,
            max_plies: MAX_ROLLOUT_PLIES,
        }
    }
}

impl MonteCarloConfig {
    pub fn with_rollouts(mut self, rollouts: usize) -> Self {
        self.rollouts = rollouts;
        self
    }

    pub fn with_weights(mut self, score_weight: f64, steps_weight: f64) -> Self {
        self.score_weight = score_weight;
        self.steps_weight = steps_weight;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_plies(mut self, max_plies: u64) -> Self {
        self.max_plies = max_plies;
        self
    }
}

/// Aggregate rollout results for one initial direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionStats {
    pub direction: Direction,
    pub rollouts: u64,
    /// Score of the initial move plus everything earned in the rollout, summed.
    pub total_score: u64,
    pub total_steps: u64,
}

impl DirectionStats {
    pub fn avg_score(&self) -> f64 {
        if self.rollouts == 0 {
            return 0.0;
        }
        self.total_score as f64 / self.rollouts as f64
    }

    pub fn avg_steps(&self) -> f64 {
        if self.rollouts == 0 {
            return 0.0;
        }
        self.total_steps as f64 / self.rollouts as f64
    }
}

/// Per-direction statistics, indexed by direction code. `None` marks a null move.
pub type Analysis = [Option<DirectionStats>; 4];

/// The Monte-Carlo strategy.
#[derive(Debug, Clone, Default)]
pub struct MonteCarlo {
    config: MonteCarloConfig,
}

impl MonteCarlo {
    pub fn new(config: MonteCarloConfig) -> Self {
        Self { config }
    }

    /// Run the rollouts for every eligible direction of `board`.
    pub fn analyse(&self, board: Board) -> Result<Analysis, EvalError> {
        let mut slots: [Option<Result<DirectionStats, EvalError>>; 4] = [None, None, None, None];
        let config = &self.config;

        rayon::scope(|s| {
            for (slot, dir) in slots.iter_mut().zip(Direction::MOVES) {
                let Some((moved, gained)) = board.try_shift(dir) else {
                    continue;
                };
                let mut rng = self.worker_rng(dir);
                s.spawn(move |_| {
                    *slot = Some(run_direction(dir, moved, gained, config, &mut rng));
                });
            }
        });

        let mut analysis: Analysis = [None; 4];
        for (out, slot) in analysis.iter_mut().zip(slots) {
            if let Some(result) = slot {
                *out = Some(result?);
            }
        }
        Ok(analysis)
    }

    fn worker_rng(&self, dir: Direction) -> Rng {
        match self.config.seed {
            Some(seed) => Rng::with_seed(seed ^ SEED_STRIDE.wrapping_mul(u64::from(dir.code()) + 1)),
            None => Rng::new(),
        }
    }
}

/// Rollouts for a single initial direction. Runs on a worker.
fn run_direction(
    direction: Direction,
    moved: Board,
    gained: u32,
    config: &MonteCarloConfig,
    rng: &mut Rng,
) -> Result<DirectionStats, EvalError> {
    let mut stats = DirectionStats {
        direction,
        rollouts: 0,
        total_score: 0,
        total_steps: 0,
    };
    for _ in 0..config.rollouts {
        let start = moved.with_random_tile(rng);
        let r = rollout(start, rng, config.max_plies)?;
        stats.rollouts += 1;
        stats.total_score += u64::from(gained) + r.score;
        stats.total_steps += r.steps;
    }
    Ok(stats)
}

/// Combined figure per direction code; null moves get negative infinity.
pub fn combine(analysis: Analysis, score_weight: f64, steps_weight: f64) -> [f64; 4] {
    let (score_sum, steps_sum) = analysis
        .iter()
        .flatten()
        .fold((0.0, 0.0), |(sc, st), s| (sc + s.avg_score(), st + s.avg_steps()));

    analysis.map(|stats| match stats {
        Some(s) => {
            score_weight * share(s.avg_score(), score_sum)
                + steps_weight * share(s.avg_steps(), steps_sum)
        }
        None => f64::NEG_INFINITY,
    })
}

fn share(value: f64, total: f64) -> f64 {
    if total > 0.0 { value / total } else { 0.0 }
}

/// Highest combined figure, first direction winning ties; `None` if every
/// direction is ineligible.
pub fn best_direction(figures: [f64; 4]) -> Direction {
    let mut best: Option<(Direction, f64)> = None;
    for (dir, figure) in Direction::MOVES.into_iter().zip(figures) {
        if figure == f64::NEG_INFINITY {
            continue;
        }
        if best.is_none_or(|(_, top)| figure > top) {
            best = Some((dir, figure));
        }
    }
    best.map_or(Direction::None, |(dir, _)| dir)
}

impl SearchStrategy for MonteCarlo {
    fn mode(&self) -> EvaluationMode {
        EvaluationMode::MonteCarlo
    }

    fn select_move(&self, board: Board) -> Result<Direction, EvalError> {
        if board.has_ended() {
            return Ok(Direction::None);
        }

        let analysis = self.analyse(board)?;
        let figures = combine(analysis, self.config.score_weight, self.config.steps_weight);
        for (stats, figure) in analysis.iter().zip(figures) {
            let Some(stats) = stats else { continue };
            debug!(
                "{}: {} rollouts, avg score {:.1}, avg steps {:.1}, figure {:.4}",
                stats.direction,
                stats.rollouts,
                stats.avg_score(),
                stats.avg_steps(),
                figure
            );
        }
        Ok(best_direction(figures))
    }
}
