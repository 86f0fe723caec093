use serde::{Deserialize, Serialize};

/// Width and height of the board.
pub const BOARD_SIZE: usize = 4;
/// Tile value at which the game is won.
pub const WIN_VALUE: u32 = 2048;

/// The four directions tiles can be moved in, with their wire ordinals.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Hash, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub fn iter() -> impl Iterator<Item = Direction> {
        [
            Direction::Up,
            Direction::Right,
            Direction::Down,
            Direction::Left,
        ]
        .iter()
        .copied()
    }
}

/// Raw ordinals come from the outside world and are checked before they
/// touch any game state.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid direction ordinal {0}")]
pub struct InvalidDirection(pub u8);

impl TryFrom<u8> for Direction {
    type Error = InvalidDirection;

    fn try_from(v: u8) -> Result<Direction, InvalidDirection> {
        match v {
            0 => Ok(Direction::Up),
            1 => Ok(Direction::Right),
            2 => Ok(Direction::Down),
            3 => Ok(Direction::Left),
            v => Err(InvalidDirection(v)),
        }
    }
}

/// Board snapshot exchanged with the callers of the move endpoint.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BoardRequest {
    /// Tile values row by row, 0 for empty cells.
    pub grid: [[u32; BOARD_SIZE]; BOARD_SIZE],
    #[serde(default)]
    pub score: u32,
}

#[derive(Serialize, Debug)]
pub struct IndexResponse {
    pub name: &'static str,
    pub version: &'static str,
}

impl IndexResponse {
    pub fn new(name: &'static str, version: &'static str) -> IndexResponse {
        IndexResponse { name, version }
    }
}

#[derive(Serialize, Debug)]
pub struct MoveResponse {
    pub r#move: Direction,
}

impl MoveResponse {
    pub fn new(r#move: Direction) -> MoveResponse {
        MoveResponse { r#move }
    }
}

impl Default for MoveResponse {
    fn default() -> MoveResponse {
        MoveResponse::new(Direction::Up)
    }
}
