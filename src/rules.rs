//! Placement rules: occupancy, immediate repetition, capture and suicide.
//!
//! [`attempt_placement`] is the only code that puts stones on a [`Board`] or
//! takes them off. A rejected placement always leaves the board as it was.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::{Board, PlayerId, Position, Tile};
use crate::resolver::{ResolvedTile, find_group, group_has_liberty, liberties};

/// Why a placement was refused.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlacementRejected {
    /// Point already holds a stone
    Occupied,
    /// Point was played or vacated by the immediately preceding move
    Repetition,
    /// Placed group would have no liberties and nothing was captured
    Suicide,
}

impl fmt::Display for PlacementRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementRejected::Occupied => write!(f, "Illegal placement: point is occupied"),
            PlacementRejected::Repetition => write!(f, "Illegal placement: repeats the last move"),
            PlacementRejected::Suicide => write!(f, "Illegal placement: suicide"),
        }
    }
}

impl std::error::Error for PlacementRejected {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlacementOutcome {
    Accepted { captured: BTreeSet<Position> },
    Rejected(PlacementRejected),
}

impl PlacementOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, PlacementOutcome::Accepted { .. })
    }

    pub fn rejection(&self) -> Option<PlacementRejected> {
        match self {
            PlacementOutcome::Rejected(reason) => Some(*reason),
            PlacementOutcome::Accepted { .. } => None,
        }
    }
}

/// The most recently accepted placement.
///
/// `vacated` is the single point emptied by that placement's capture, if it
/// captured exactly one stone. Neither point may be replayed on the next move.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastMove {
    pub player: PlayerId,
    pub position: Position,
    pub vacated: Option<Position>,
}

impl LastMove {
    pub fn forbids(&self, pos: Position) -> bool {
        self.position == pos || self.vacated == Some(pos)
    }
}

/// Try to place a stone for `actor` at `position`.
///
/// The caller guarantees `actor` holds the turn; turn order is not checked
/// here. `position` must lie on the board.
pub fn attempt_placement(
    board: &mut Board,
    last_move: &mut Option<LastMove>,
    actor: PlayerId,
    position: Position,
) -> PlacementOutcome {
    assert!(
        board.contains(position),
        "placement at {position} is outside the {}x{} board",
        board.rows(),
        board.cols()
    );

    if board.get(position).is_stone() {
        debug!(player = %actor, row = position.row, col = position.col, "Rejected: occupied");
        return PlacementOutcome::Rejected(PlacementRejected::Occupied);
    }

    if last_move.as_ref().is_some_and(|last| last.forbids(position)) {
        debug!(player = %actor, row = position.row, col = position.col, "Rejected: repetition");
        return PlacementOutcome::Rejected(PlacementRejected::Repetition);
    }

    let previous = board.get(position);
    board.set(position, Tile::Stone { owner: actor });

    let captured = find_captures(board, actor, position);
    for &pt in &captured {
        board.set(pt, Tile::Empty);
    }

    // A capturing move always has a liberty where the captured stones were.
    if captured.is_empty() {
        let own = find_group(board, actor, position);
        if !group_has_liberty(board, &own) {
            board.set(position, previous);
            debug!(player = %actor, row = position.row, col = position.col, "Rejected: suicide");
            return PlacementOutcome::Rejected(PlacementRejected::Suicide);
        }
    }

    let vacated = if captured.len() == 1 {
        captured.first().copied()
    } else {
        None
    };
    *last_move = Some(LastMove {
        player: actor,
        position,
        vacated,
    });
    debug!(
        player = %actor,
        row = position.row,
        col = position.col,
        captured = captured.len(),
        "Accepted placement"
    );
    PlacementOutcome::Accepted { captured }
}

/// Opponent stones adjacent to `placed` whose groups have no liberty left.
///
/// Groups reached from several sides are merged, so each stone appears once.
fn find_captures(board: &Board, actor: PlayerId, placed: Position) -> BTreeSet<Position> {
    let mut captured = BTreeSet::new();
    for n in liberties(board, placed) {
        let ResolvedTile::Cell {
            position,
            tile: Tile::Stone { owner },
        } = n
        else {
            continue;
        };
        if owner == actor || captured.contains(&position) {
            continue;
        }
        let group = find_group(board, owner, position);
        if !group_has_liberty(board, &group) {
            captured.extend(group);
        }
    }
    captured
}
