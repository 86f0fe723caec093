use std::sync::Arc;

use log::info;

use crate::env::{Direction, BOARD_SIZE, WIN_VALUE};
use crate::game::Board;
use crate::search::{best_action, Heuristic, MAX_PLAYOUT_DEPTH, SIMULATIONS};

/// Soft scale for the score term, chosen around the score of a mid game.
const SCORE_SCALE: f64 = 4096.0;

/// Weighted playout evaluation over normalized terms, so the result stays
/// within the sum of the weights. Boards with more room to continue and a
/// higher score evaluate higher.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MonteHeuristic {
    max_tile: f64,
    score: f64,
    empty: f64,
}

impl Default for MonteHeuristic {
    fn default() -> Self {
        Self {
            max_tile: 1.0,
            score: 0.5,
            empty: 1.0,
        }
    }
}

impl Heuristic for MonteHeuristic {
    fn eval(&self, board: &Board) -> f64 {
        let max_tile = board.tiles.iter().map(|t| t.value).max().unwrap_or(0) as f64
            / WIN_VALUE as f64;
        let score = board.score as f64 / (board.score as f64 + SCORE_SCALE);
        let empty = board.count_empty() as f64 / (BOARD_SIZE * BOARD_SIZE) as f64;

        self.max_tile * max_tile + self.score * score + self.empty * empty
    }
}

/// The Monte-Carlo move selector.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MonteAgent {
    pub simulations: usize,
    pub max_depth: usize,
    pub heuristic: MonteHeuristic,
}

impl Default for MonteAgent {
    fn default() -> Self {
        Self {
            simulations: SIMULATIONS,
            max_depth: MAX_PLAYOUT_DEPTH,
            heuristic: MonteHeuristic::default(),
        }
    }
}

impl MonteAgent {
    pub async fn step(&self, board: &Board) -> Direction {
        let heuristic: Arc<dyn Heuristic> = Arc::new(self.heuristic.clone());
        match best_action(board, self.simulations, self.max_depth, heuristic).await {
            Some(dir) => dir,
            None => {
                info!("no legal move left");
                Direction::Up
            }
        }
    }
}
