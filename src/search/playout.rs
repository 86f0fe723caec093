use rand::seq::IteratorRandom;
use rand::Rng;

use super::Heuristic;
use crate::env::Direction;
use crate::game::Board;

/// Default depth limit for a single playout.
pub const MAX_PLAYOUT_DEPTH: usize = 64;

/// Plays uniformly random legal moves from `board` until the game is won or
/// lost or `max_depth` moves were made, and returns the heuristic value of
/// the final board.
///
/// Deterministic for a given rng, so seeded playouts are reproducible.
pub fn playout<H: Heuristic + ?Sized>(
    board: &Board,
    max_depth: usize,
    heuristic: &H,
    rng: &mut impl Rng,
) -> f64 {
    let mut board = board.clone();
    for _ in 0..max_depth {
        if board.has_won() || board.has_lost() {
            break;
        }

        // choosing among the changed boards keeps the draw unbiased over the
        // legal directions
        let next = Direction::iter()
            .map(|d| board.slide(d))
            .filter(|b| b.changed)
            .choose(rng);
        match next {
            Some(mut next) => {
                next.settle(rng);
                board = next;
            }
            None => break,
        }
    }
    heuristic.eval(&board)
}
