mod playout;
pub use playout::*;
mod montecarlo;
pub use montecarlo::*;

use std::fmt::Debug;

use crate::game::Board;

/// Scores a board at the leafs of the random playouts.
///
/// Implementations must be pure and bounded, and should grow with the board
/// score and the number of empty cells to give the search a useful signal.
pub trait Heuristic: Debug + Send + Sync + 'static {
    fn eval(&self, board: &Board) -> f64;
}
