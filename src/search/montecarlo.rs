//! # Flat Monte-Carlo action selection
//!
//! Every candidate direction is judged by the mean heuristic value of many
//! random playouts starting from the moved board.

use std::sync::Arc;

use log::info;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use super::{playout, Heuristic};
use crate::env::Direction;
use crate::game::Board;
use crate::util::argmax;

/// Default number of playouts per candidate direction.
pub const SIMULATIONS: usize = 400;

/// Runs `simulations` playouts for each direction and returns the one with
/// the highest mean score. Ties break in fixed order: up, right, down, left.
///
/// Directions whose move would not change the board are never chosen.
/// `None` means no direction is legal, which implies the board is lost.
///
/// The per-direction batches are independent and run on their own blocking
/// tasks, each playout with its own board copy and rng.
pub async fn best_action(
    board: &Board,
    simulations: usize,
    max_depth: usize,
    heuristic: Arc<dyn Heuristic>,
) -> Option<Direction> {
    let mut batches = [None, None, None, None];

    for dir in Direction::iter() {
        let mut rng = SmallRng::from_entropy();
        let moved = board.step(dir, &mut rng);
        if !moved.changed {
            continue;
        }

        let heuristic = heuristic.clone();
        batches[dir as u8 as usize] = Some(tokio::task::spawn_blocking(move || {
            let mut rng = SmallRng::from_entropy();
            let mut total = 0.0;
            for _ in 0..simulations {
                total += playout(&moved, max_depth, &*heuristic, &mut rng);
            }
            total / simulations.max(1) as f64
        }));
    }

    let mut means = [f64::NEG_INFINITY; 4];
    for (dir, batch) in Direction::iter().zip(batches) {
        let Some(task) = batch else {
            continue;
        };
        if let Ok(mean) = task.await {
            info!("{dir:?}: mean {mean:.4}");
            means[dir as u8 as usize] = mean;
        }
    }

    if !means.iter().any(|m| m.is_finite()) {
        return None;
    }
    argmax(means.iter()).and_then(|i| Direction::iter().nth(i))
}
