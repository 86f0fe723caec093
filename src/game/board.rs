use std::fmt::{self, Debug};

use owo_colors::{OwoColorize, Style};
use rand::seq::IteratorRandom;
use rand::Rng;

use super::Tile;
use crate::env::{BoardRequest, Direction, BOARD_SIZE, WIN_VALUE};

/// Probability that a spawned tile is a 4 instead of a 2.
pub const SPAWN_FOUR_CHANCE: f64 = 0.1;

/// One game state of the 4x4 merge game.
///
/// Boards are immutable snapshots: [`Board::step`] returns the successor
/// state and never touches the receiver, so the same board can back many
/// concurrent playouts without copy races. `cells` holds the index of the
/// occupying tile in `tiles` and is kept in bijection with it.
#[derive(Clone)]
pub struct Board {
    cells: [[Option<u8>; BOARD_SIZE]; BOARD_SIZE],
    pub tiles: Vec<Tile>,
    pub score: u32,
    /// Whether the most recent move altered the occupancy.
    pub changed: bool,
    won: bool,
    lost: bool,
    next_id: u32,
}

impl Board {
    /// A board without any tiles.
    pub fn empty() -> Board {
        Board {
            cells: [[None; BOARD_SIZE]; BOARD_SIZE],
            tiles: Vec::new(),
            score: 0,
            changed: false,
            won: false,
            lost: false,
            next_id: 0,
        }
    }

    /// Fresh game with two randomly spawned tiles.
    pub fn new(rng: &mut impl Rng) -> Board {
        let mut board = Board::empty();
        board.spawn_tile(rng);
        board.spawn_tile(rng);
        board.update_outcome();
        board
    }

    /// Loads a board from the snapshot exchanged with callers.
    pub fn from_request(request: &BoardRequest) -> Board {
        let mut board = Board::empty();
        board.score = request.score;
        for (row, line) in request.grid.iter().enumerate() {
            for (col, &value) in line.iter().enumerate() {
                if value != 0 {
                    board.place(value, row, col, false);
                }
            }
        }
        board.update_outcome();
        board
    }

    pub fn has_won(&self) -> bool {
        self.won
    }

    pub fn has_lost(&self) -> bool {
        self.lost
    }

    pub fn count_empty(&self) -> usize {
        BOARD_SIZE * BOARD_SIZE - self.tiles.len()
    }

    pub fn value_at(&self, row: usize, col: usize) -> Option<u32> {
        self.cells[row][col].map(|i| self.tiles[i as usize].value)
    }

    /// Tile values row by row, 0 for empty cells.
    pub fn grid(&self) -> [[u32; BOARD_SIZE]; BOARD_SIZE] {
        let mut grid = [[0; BOARD_SIZE]; BOARD_SIZE];
        for tile in &self.tiles {
            grid[tile.row][tile.col] = tile.value;
        }
        grid
    }

    /// Applies a move: slides and merges towards `dir`, spawns a tile if
    /// anything moved, and recomputes the terminal flags.
    ///
    /// A no-op move returns an equal board with `changed = false`, without
    /// spawn or score change.
    pub fn step(&self, dir: Direction, rng: &mut impl Rng) -> Board {
        let mut next = self.slide(dir);
        next.settle(rng);
        next
    }

    /// The deterministic half of a move: slides and merges without spawning.
    ///
    /// Each of the four lines is processed from the destination edge inwards,
    /// so merge results are reproducible. A merge keeps the destination slot,
    /// gets a fresh id, and cannot merge again within the same move.
    pub fn slide(&self, dir: Direction) -> Board {
        let mut out: Vec<Tile> = Vec::with_capacity(self.tiles.len());
        let mut score = self.score;
        let mut changed = false;
        let mut next_id = self.next_id;

        for line in 0..BOARD_SIZE {
            let start = out.len();
            for i in 0..BOARD_SIZE {
                let (row, col) = line_cell(dir, line, i);
                let Some(idx) = self.cells[row][col] else {
                    continue;
                };
                let src = &self.tiles[idx as usize];

                let mergeable = out.len() > start
                    && out
                        .last()
                        .is_some_and(|t| t.value == src.value && !t.is_merge());
                if mergeable {
                    let absorbed = out.pop().unwrap();
                    let (row_to, col_to) = (absorbed.row, absorbed.col);

                    let mut consumed = src.carried();
                    consumed.previous = Some((src.row, src.col));
                    consumed.row = row_to;
                    consumed.col = col_to;

                    let mut merged = Tile::new(next_id, absorbed.value + src.value, row_to, col_to);
                    next_id += 1;
                    merged.merged_from = vec![absorbed, consumed];

                    score += merged.value;
                    out.push(merged);
                    changed = true;
                } else {
                    let slot = out.len() - start;
                    let (row_to, col_to) = line_cell(dir, line, slot);

                    let mut tile = src.carried();
                    if (row_to, col_to) != (src.row, src.col) {
                        tile.previous = Some((src.row, src.col));
                        tile.row = row_to;
                        tile.col = col_to;
                        changed = true;
                    }
                    out.push(tile);
                }
            }
        }

        let mut next = Board {
            cells: [[None; BOARD_SIZE]; BOARD_SIZE],
            tiles: out,
            score,
            changed,
            won: self.won,
            lost: self.lost,
            next_id,
        };
        for (i, tile) in next.tiles.iter().enumerate() {
            next.cells[tile.row][tile.col] = Some(i as u8);
        }
        next
    }

    /// Finishes a slid board: spawns the post-move tile if the slide changed
    /// anything and recomputes the terminal flags.
    pub(crate) fn settle(&mut self, rng: &mut impl Rng) {
        if self.changed {
            self.spawn_tile(rng);
        }
        self.update_outcome();
    }

    /// Spawns a 2 or 4 tile in a uniformly random empty cell.
    fn spawn_tile(&mut self, rng: &mut impl Rng) {
        let empty = (0..BOARD_SIZE * BOARD_SIZE)
            .map(|i| (i / BOARD_SIZE, i % BOARD_SIZE))
            .filter(|&(row, col)| self.cells[row][col].is_none());
        if let Some((row, col)) = empty.choose(rng) {
            let value = if rng.gen::<f64>() < SPAWN_FOUR_CHANCE {
                4
            } else {
                2
            };
            self.place(value, row, col, true);
        }
    }

    fn place(&mut self, value: u32, row: usize, col: usize, spawned: bool) {
        let mut tile = Tile::new(self.next_id, value, row, col);
        tile.spawned = spawned;
        self.next_id += 1;
        self.cells[row][col] = Some(self.tiles.len() as u8);
        self.tiles.push(tile);
    }

    fn update_outcome(&mut self) {
        self.won = self.won || self.tiles.iter().any(|t| t.value >= WIN_VALUE);
        self.lost = self.no_move_left();
    }

    /// True iff the grid is full and no two adjacent cells hold equal values.
    fn no_move_left(&self) -> bool {
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let Some(value) = self.value_at(row, col) else {
                    return false;
                };
                if row + 1 < BOARD_SIZE && self.value_at(row + 1, col) == Some(value) {
                    return false;
                }
                if col + 1 < BOARD_SIZE && self.value_at(row, col + 1) == Some(value) {
                    return false;
                }
            }
        }
        true
    }
}

/// Cell at offset `i` from the destination edge of `line`.
fn line_cell(dir: Direction, line: usize, i: usize) -> (usize, usize) {
    match dir {
        Direction::Up => (i, line),
        Direction::Right => (line, BOARD_SIZE - 1 - i),
        Direction::Down => (BOARD_SIZE - 1 - i, line),
        Direction::Left => (line, i),
    }
}

impl Board {
    /// Parses the textual board representation used in tests.
    /// Tokens are tile values or `.` for empty cells, row by row.
    pub fn parse(txt: &str) -> Option<Board> {
        let mut values = Vec::with_capacity(BOARD_SIZE * BOARD_SIZE);
        for token in txt.split_whitespace() {
            if token == "." {
                values.push(0);
            } else {
                values.push(token.parse().ok()?);
            }
        }
        if values.len() != BOARD_SIZE * BOARD_SIZE {
            return None;
        }

        let mut board = Board::empty();
        for (i, &value) in values.iter().enumerate() {
            if value != 0 {
                board.place(value, i / BOARD_SIZE, i % BOARD_SIZE, false);
            }
        }
        board.update_outcome();
        Some(board)
    }
}

fn tile_style(value: u32) -> Style {
    match value {
        2 | 4 => Style::new().bright_black(),
        8 | 16 => Style::new().yellow(),
        32 | 64 => Style::new().red(),
        128 | 256 | 512 => Style::new().magenta(),
        _ => Style::new().cyan(),
    }
}

impl Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board {{")?;
        for row in 0..BOARD_SIZE {
            write!(f, "  ")?;
            for col in 0..BOARD_SIZE {
                match self.value_at(row, col) {
                    Some(v) => write!(f, "{:>4} ", v.style(tile_style(v)))?,
                    None => write!(f, "   . ")?,
                }
            }
            writeln!(f)?;
        }
        writeln!(
            f,
            "  score: {}, won: {}, lost: {}",
            self.score, self.won, self.lost
        )?;
        write!(f, "}}")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    /// Every occupied cell maps to exactly one live tile and vice versa.
    fn assert_bijection(board: &Board) {
        let mut seen = 0;
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                if let Some(idx) = board.cells[row][col] {
                    let tile = &board.tiles[idx as usize];
                    assert_eq!((tile.row, tile.col), (row, col));
                    seen += 1;
                }
            }
        }
        assert_eq!(seen, board.tiles.len());
        assert_eq!(board.count_empty(), BOARD_SIZE * BOARD_SIZE - seen);
    }

    #[test]
    fn board_parse() {
        let board = Board::parse(
            r#"
            2 2 4 .
            . . . .
            . . . .
            . . . ."#,
        )
        .unwrap();

        assert_eq!(board.value_at(0, 0), Some(2));
        assert_eq!(board.value_at(0, 2), Some(4));
        assert_eq!(board.value_at(0, 3), None);
        assert_eq!(board.tiles.len(), 3);
        assert!(!board.has_won());
        assert!(!board.has_lost());
        assert_bijection(&board);

        assert!(Board::parse("2 2").is_none());
        assert!(Board::parse("x . . . . . . . . . . . . . . .").is_none());
    }

    #[test]
    fn slide_merges_once() {
        // [2, 2, 4, .] -> [4, 4, ., .] and 4 points for the merge
        let board = Board::parse(
            r#"
            2 2 4 .
            . . . .
            . . . .
            . . . ."#,
        )
        .unwrap();

        let next = board.slide(Direction::Left);
        assert!(next.changed);
        assert_eq!(next.grid()[0], [4, 4, 0, 0]);
        assert_eq!(next.score, 4);
        assert_bijection(&next);

        // the merge result must not merge again within the same move
        let merged = &next.tiles[next.cells[0][0].unwrap() as usize];
        assert!(merged.is_merge());
        assert_eq!(merged.merged_from.len(), 2);
        assert_eq!(merged.value, 4);
    }

    #[test]
    fn slide_no_triple_merge() {
        // three equal tiles merge exactly one adjacent pair, at the far edge
        let board = Board::parse(
            r#"
            2 2 2 .
            . . . .
            . . . .
            . . . ."#,
        )
        .unwrap();

        let next = board.slide(Direction::Left);
        assert_eq!(next.grid()[0], [4, 2, 0, 0]);
        assert_eq!(next.score, 4);

        let board = Board::parse(
            r#"
            2 2 2 2
            . . . .
            . . . .
            . . . ."#,
        )
        .unwrap();

        let next = board.slide(Direction::Left);
        assert_eq!(next.grid()[0], [4, 4, 0, 0]);
        assert_eq!(next.score, 8);
    }

    #[test]
    fn slide_directions() {
        let board = Board::parse(
            r#"
            2 . . 2
            . . . .
            . 4 . .
            2 . . 4"#,
        )
        .unwrap();

        let up = board.slide(Direction::Up);
        assert_eq!(up.grid(), [[4, 4, 0, 2], [0, 0, 0, 4], [0; 4], [0; 4]]);
        assert_eq!(up.score, 4);

        let right = board.slide(Direction::Right);
        assert_eq!(right.grid(), [[0, 0, 0, 4], [0; 4], [0, 0, 0, 4], [0, 0, 2, 4]]);
        assert_eq!(right.score, 4);

        let down = board.slide(Direction::Down);
        assert_eq!(down.grid(), [[0; 4], [0; 4], [0, 0, 0, 2], [4, 4, 0, 4]]);
        assert_eq!(down.score, 4);

        let left = board.slide(Direction::Left);
        assert_eq!(left.grid(), [[4, 0, 0, 0], [0; 4], [4, 0, 0, 0], [2, 4, 0, 0]]);
        assert_eq!(left.score, 4);
    }

    #[test]
    fn merge_processing_order() {
        // towards the far edge first: up merges the upper pair of a triple
        let board = Board::parse(
            r#"
            2 . . .
            2 . . .
            2 . . .
            4 . . ."#,
        )
        .unwrap();

        let next = board.slide(Direction::Up);
        assert_eq!(next.grid(), [[4, 0, 0, 0], [2, 0, 0, 0], [4, 0, 0, 0], [0; 4]]);
    }

    #[test]
    fn tile_ids_stable() {
        let board = Board::parse(
            r#"
            2 2 4 .
            . . . .
            . . . .
            . . . ."#,
        )
        .unwrap();
        let four = board.tiles[board.cells[0][2].unwrap() as usize].id;

        let next = board.slide(Direction::Left);
        // the surviving 4 keeps its id and records where it came from
        let moved = &next.tiles[next.cells[0][1].unwrap() as usize];
        assert_eq!(moved.id, four);
        assert_eq!(moved.previous, Some((0, 2)));
        // the merge result gets a fresh id
        let merged = &next.tiles[next.cells[0][0].unwrap() as usize];
        assert!(board.tiles.iter().all(|t| t.id != merged.id));
    }

    #[test]
    fn noop_move_unchanged() {
        let board = Board::parse(
            r#"
            2 4 8 16
            . . . .
            . . . .
            . . . ."#,
        )
        .unwrap();

        // everything is already packed against the top edge
        let mut rng = SmallRng::seed_from_u64(7);
        let next = board.step(Direction::Up, &mut rng);
        assert!(!next.changed);
        assert_eq!(next.grid(), board.grid());
        assert_eq!(next.score, board.score);
        assert_eq!(next.tiles.len(), board.tiles.len());

        // a no-op stays a no-op when repeated
        let again = next.step(Direction::Up, &mut rng);
        assert!(!again.changed);
        assert_eq!(again.grid(), next.grid());
    }

    #[test]
    fn step_spawns_once() {
        let board = Board::parse(
            r#"
            2 2 . .
            . . . .
            . . . .
            . . . ."#,
        )
        .unwrap();

        let mut rng = SmallRng::seed_from_u64(0);
        let next = board.step(Direction::Left, &mut rng);
        assert!(next.changed);
        // one merge result plus exactly one spawned tile
        assert_eq!(next.tiles.len(), 2);
        let spawned = next.tiles.iter().find(|t| t.spawned).unwrap();
        assert!(spawned.value == 2 || spawned.value == 4);
        assert_bijection(&next);
    }

    #[test]
    fn won_is_sticky() {
        let board = Board::parse(
            r#"
            1024 1024 . .
            . . . .
            . . . .
            . . . ."#,
        )
        .unwrap();
        assert!(!board.has_won());

        let mut rng = SmallRng::seed_from_u64(3);
        let won = board.step(Direction::Left, &mut rng);
        assert!(won.has_won());
        assert_eq!(won.score, 2048);

        let still_won = won.step(Direction::Down, &mut rng);
        assert!(still_won.has_won());
    }

    #[test]
    fn lost_detection() {
        // full board, no equal neighbors in any direction
        let board = Board::parse(
            r#"
            2 4 2 4
            4 2 4 2
            2 4 2 4
            4 2 4 2"#,
        )
        .unwrap();
        assert!(board.has_lost());
        for dir in Direction::iter() {
            assert!(!board.slide(dir).changed);
        }

        // a single equal pair keeps the game alive
        let board = Board::parse(
            r#"
            2 4 2 4
            4 2 4 2
            2 4 2 4
            4 2 4 4"#,
        )
        .unwrap();
        assert!(!board.has_lost());
    }

    #[test]
    fn score_monotonic() {
        let mut rng = SmallRng::seed_from_u64(1234);
        let mut board = Board::new(&mut rng);
        let mut score = board.score;

        for _ in 0..200 {
            if board.has_lost() {
                break;
            }
            let Some(next) = Direction::iter()
                .map(|d| board.step(d, &mut rng))
                .find(|b| b.changed)
            else {
                break;
            };
            assert!(next.score >= score);
            assert_bijection(&next);
            assert!(next.tiles.iter().all(|t| t.value.is_power_of_two()));
            score = next.score;
            board = next;
        }
    }

    #[test]
    fn new_board() {
        let mut rng = SmallRng::seed_from_u64(99);
        let board = Board::new(&mut rng);
        assert_eq!(board.tiles.len(), 2);
        assert_eq!(board.score, 0);
        assert!(!board.has_won());
        assert!(!board.has_lost());
        assert!(board.tiles.iter().all(|t| t.value == 2 || t.value == 4));
        assert_bijection(&board);
    }
}
