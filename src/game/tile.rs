/// A single numbered piece on the board.
///
/// Tiles that survive a move unmerged keep their id, merge results and
/// spawned tiles get a fresh one. The per-turn annotations (`previous`,
/// `merged_from`, `spawned`) describe what happened during the most recent
/// move and are reset by the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub id: u32,
    /// Power of two >= 2.
    pub value: u32,
    pub row: usize,
    pub col: usize,
    /// Position before the current move, if the tile moved.
    pub previous: Option<(usize, usize)>,
    /// The two tiles consumed into this one, empty for non-merge tiles.
    pub merged_from: Vec<Tile>,
    /// Whether this tile was spawned by the current move.
    pub spawned: bool,
}

impl Tile {
    pub fn new(id: u32, value: u32, row: usize, col: usize) -> Tile {
        Tile {
            id,
            value,
            row,
            col,
            previous: None,
            merged_from: Vec::new(),
            spawned: false,
        }
    }

    pub fn has_moved(&self) -> bool {
        self.previous.is_some()
    }

    pub fn is_merge(&self) -> bool {
        !self.merged_from.is_empty()
    }

    /// Copy for the next board state, with the per-turn annotations reset.
    pub(crate) fn carried(&self) -> Tile {
        Tile::new(self.id, self.value, self.row, self.col)
    }
}
