use rand::{rngs::SmallRng, seq::IteratorRandom, SeedableRng};

use crate::env::Direction;
use crate::game::Board;

/// Baseline agent playing a uniformly random legal move.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct RandomAgent;

impl RandomAgent {
    pub async fn step(&self, board: &Board) -> Direction {
        let mut rng = SmallRng::from_entropy();
        Direction::iter()
            .filter(|&d| board.slide(d).changed)
            .choose(&mut rng)
            .unwrap_or(Direction::Up)
    }
}
