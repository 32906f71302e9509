//! Grid and tile model.
//!
//! A [`Board`] is a fixed-size rectangular grid of [`Tile`]s addressed by
//! [`Position`]. Cells are always either empty or hold a stone; the board edge
//! is never stored; see [`crate::resolver::ResolvedTile::Wall`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity of a chat participant.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A (row, column) pair, 0-indexed from the top-left corner.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// State of one board cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Empty,
    Stone { owner: PlayerId },
}

impl Tile {
    pub fn is_empty(self) -> bool {
        matches!(self, Tile::Empty)
    }

    pub fn is_stone(self) -> bool {
        matches!(self, Tile::Stone { .. })
    }

    /// Owner of the stone, or `None` for an empty cell.
    pub fn owner(self) -> Option<PlayerId> {
        match self {
            Tile::Stone { owner } => Some(owner),
            Tile::Empty => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Tile>,
}

impl Board {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Tile::Empty; rows * cols],
        }
    }

    pub fn square(size: usize) -> Self {
        Self::new(size, size)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    fn idx(&self, pos: Position) -> usize {
        debug_assert!(
            self.contains(pos),
            "{pos} is outside the {}x{} board",
            self.rows,
            self.cols
        );
        pos.row * self.cols + pos.col
    }

    pub fn get(&self, pos: Position) -> Tile {
        self.cells[self.idx(pos)]
    }

    /// Overwrite a cell. Only the ruleset places and removes stones.
    pub(crate) fn set(&mut self, pos: Position, tile: Tile) {
        let i = self.idx(pos);
        self.cells[i] = tile;
    }

    /// All positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| Position::new(row, col)))
    }

    /// Number of stones owned by `owner`.
    pub fn stone_count(&self, owner: PlayerId) -> usize {
        self.cells
            .iter()
            .filter(|t| t.owner() == Some(owner))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|t| t.is_empty())
    }
}
