//! Liberty and group resolution.
//!
//! Pure functions over a [`Board`]. Adjacency is orthogonal only: the four
//! directions examined are up, right, down, left, in that order. Lookups that
//! fall off the grid produce a synthetic [`ResolvedTile::Wall`], which is never
//! a liberty and never capturable.

use std::collections::BTreeSet;

use crate::board::{Board, PlayerId, Position, Tile};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

    /// The adjacent position in this direction, or `None` past the board edge.
    pub fn step(self, board: &Board, pos: Position) -> Option<Position> {
        let next = match self {
            Direction::Up => Position::new(pos.row.checked_sub(1)?, pos.col),
            Direction::Right => Position::new(pos.row, pos.col + 1),
            Direction::Down => Position::new(pos.row + 1, pos.col),
            Direction::Left => Position::new(pos.row, pos.col.checked_sub(1)?),
        };
        board.contains(next).then_some(next)
    }
}

/// Result of a boundary-aware neighbor lookup.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ResolvedTile {
    Cell { position: Position, tile: Tile },
    Wall,
}

impl ResolvedTile {
    /// True only for an empty cell on the board.
    pub fn is_liberty(self) -> bool {
        matches!(self, ResolvedTile::Cell { tile: Tile::Empty, .. })
    }

    /// Position of a stone owned by `owner`, if this is one.
    pub fn stone_of(self, owner: PlayerId) -> Option<Position> {
        match self {
            ResolvedTile::Cell {
                position,
                tile: Tile::Stone { owner: o },
            } if o == owner => Some(position),
            _ => None,
        }
    }
}

pub fn neighbor(board: &Board, pos: Position, direction: Direction) -> ResolvedTile {
    match direction.step(board, pos) {
        Some(position) => ResolvedTile::Cell {
            position,
            tile: board.get(position),
        },
        None => ResolvedTile::Wall,
    }
}

/// The four neighbor results of `pos`, unfiltered.
pub fn liberties(board: &Board, pos: Position) -> [ResolvedTile; 4] {
    Direction::ALL.map(|d| neighbor(board, pos, d))
}

/// Collect the group of `owner` stones connected to `seed`.
///
/// Uses an explicit stack so depth does not grow with group size.
/// Returns an empty set if `seed` is not a stone of `owner`.
pub fn find_group(board: &Board, owner: PlayerId, seed: Position) -> BTreeSet<Position> {
    let mut group = BTreeSet::new();
    if board.get(seed).owner() != Some(owner) {
        return group;
    }
    let mut stack = vec![seed];
    group.insert(seed);

    while let Some(pt) = stack.pop() {
        for n in liberties(board, pt) {
            if let Some(next) = n.stone_of(owner) {
                if group.insert(next) {
                    stack.push(next);
                }
            }
        }
    }
    group
}

/// True iff at least one stone in `group` touches an empty cell.
pub fn group_has_liberty(board: &Board, group: &BTreeSet<Position>) -> bool {
    group
        .iter()
        .any(|&pt| liberties(board, pt).iter().any(|n| n.is_liberty()))
}

/// Count the distinct empty cells adjacent to `group`.
pub fn liberty_count(board: &Board, group: &BTreeSet<Position>) -> usize {
    let mut seen = BTreeSet::new();
    for &pt in group {
        for n in liberties(board, pt) {
            if let ResolvedTile::Cell {
                position,
                tile: Tile::Empty,
            } = n
            {
                seen.insert(position);
            }
        }
    }
    seen.len()
}
