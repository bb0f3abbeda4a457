//! eval2048: recommend a 2048 move from the command line.
//!
//! ## Usage
//!
//! - `eval2048 eval --cells 2,2,0,0,...` - Recommend a move for 16 tile values
//! - `eval2048 table --row 0x0112` - Show the row table entry for a packed row

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flexi_logger::Logger;
use log::info;

use eval2048::constants::{MAX_ROLLOUT_PLIES, N_ROLLOUTS, SCORE_WEIGHT, STEPS_WEIGHT};
use eval2048::dispatch::{EvaluationMode, Evaluator};
use eval2048::montecarlo::MonteCarloConfig;
use eval2048::table;

/// eval2048: Monte-Carlo move evaluation for 2048
#[derive(Parser)]
#[command(name = "eval2048")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend a move for a board given as 16 tile values, row by row
    Eval {
        /// Tile values (0 for empty), comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        cells: Vec<u32>,
        /// auto, mc, mcts or expectimax
        #[arg(long, default_value_t = EvaluationMode::Auto)]
        mode: EvaluationMode,
        /// Rollouts per candidate direction
        #[arg(long, default_value_t = N_ROLLOUTS)]
        rollouts: usize,
        /// Seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value_t = SCORE_WEIGHT)]
        score_weight: f64,
        #[arg(long, default_value_t = STEPS_WEIGHT)]
        steps_weight: f64,
        /// Move attempts before a rollout is treated as runaway
        #[arg(long, default_value_t = MAX_ROLLOUT_PLIES)]
        max_plies: u64,
    },
    /// Print the row transition table entry for a packed 16-bit row
    Table {
        /// Packed row, hex (e.g. 0x0112, cell 0 in the low nibble)
        #[arg(long)]
        row: String,
    },
}

fn main() -> Result<()> {
    let _logger = Logger::try_with_env_or_str("info")
        .context("invalid log specification")?
        .start()
        .context("failed to start logger")?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Eval {
            cells,
            mode,
            rollouts,
            seed,
            score_weight,
            steps_weight,
            max_plies,
        } => {
            let mut config = MonteCarloConfig::default()
                .with_rollouts(rollouts)
                .with_weights(score_weight, steps_weight)
                .with_max_plies(max_plies);
            if let Some(seed) = seed {
                config = config.with_seed(seed);
            }

            let evaluator = Evaluator::new(config);
            let rec = evaluator
                .recommend(&cells, mode)
                .context("evaluation failed")?;
            info!(
                "recommended {} (+{} points, largest tile {})",
                rec.direction,
                rec.score,
                1u32 << rec.board.max_exponent()
            );
            println!("{}", rec.direction);
            print!("{}", rec.board);
        }
        Commands::Table { row } => {
            let digits = row.trim_start_matches("0x").trim_start_matches("0X");
            let packed = u16::from_str_radix(digits, 16)
                .with_context(|| format!("invalid row: {row}"))?;
            let entry = table::row_table().lookup(packed);
            println!("{packed:#06x} -> {:#06x} (+{})", entry.row, entry.score);
        }
    }

    Ok(())
}
