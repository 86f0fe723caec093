mod board;
pub use board::*;
mod tile;
pub use tile::*;
