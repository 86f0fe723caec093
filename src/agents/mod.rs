use std::fmt;
use std::str::FromStr;

mod monte;
pub use monte::*;
mod random;
pub use random::*;

use crate::env::Direction;
use crate::game::Board;

/// The available move selectors with their configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum Agent {
    Monte(MonteAgent),
    Random(RandomAgent),
}

impl Default for Agent {
    fn default() -> Self {
        Self::Monte(MonteAgent::default())
    }
}

impl Agent {
    pub async fn step(&self, board: &Board) -> Direction {
        match self {
            Agent::Monte(agent) => agent.step(board).await,
            Agent::Random(agent) => agent.step(board).await,
        }
    }
}

impl FromStr for Agent {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s)
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&serde_json::to_string(self).unwrap_or_default())
    }
}
