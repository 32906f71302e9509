//! A live Go match and its move-input state machine.
//!
//! A player picks a row on one message and a column on another, in either
//! order. Once both halves are known the match enters the resolving phase,
//! runs the ruleset, and stays busy until the caller has finished publishing
//! the result and calls [`Match::settle`]. Selections that arrive while busy
//! are dropped, not queued.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::board::{Board, PlayerId, Position};
use crate::reactions::Axis;
use crate::registry::{MessageId, SessionId};
use crate::rules::{LastMove, PlacementOutcome, attempt_placement};

/// Where the two-step input currently stands.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputPhase {
    /// No row chosen yet (a column may already be pending)
    AwaitingRow,
    /// Row chosen, column pending
    AwaitingColumn,
    /// Placement attempt in progress
    Resolving,
}

/// Why a selection event had no effect.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Ignored {
    Busy,
    NotYourTurn,
    Completed,
    OutOfRange,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionOutcome {
    Ignored(Ignored),
    /// One half recorded, waiting for the other
    Pending {
        row: Option<usize>,
        col: Option<usize>,
    },
    /// Both halves were known and a placement was attempted.
    /// The match stays busy until [`Match::settle`].
    Resolved {
        position: Position,
        outcome: PlacementOutcome,
    },
}

/// Read-only view of a match for renderers and replays.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub board: Board,
    pub primary: PlayerId,
    pub tertiary: PlayerId,
    pub current_player: PlayerId,
    pub last_move: Option<LastMove>,
    pub winner: Option<PlayerId>,
}

/// Everything a completion hook gets when a match is torn down.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MatchSummary {
    pub session: SessionId,
    pub primary: PlayerId,
    pub tertiary: PlayerId,
    pub winner: Option<PlayerId>,
    pub has_moved: bool,
    pub frames: Vec<Snapshot>,
}

#[derive(Clone, Debug)]
pub struct Match {
    id: SessionId,
    /// The challenger
    primary: PlayerId,
    /// The challenged
    tertiary: PlayerId,
    first_mover: PlayerId,
    current_player: PlayerId,
    pending_row: Option<usize>,
    pending_col: Option<usize>,
    last_move: Option<LastMove>,
    board: Board,
    busy: bool,
    winner: Option<PlayerId>,
    has_moved: bool,
    row_message: Option<MessageId>,
    column_message: Option<MessageId>,
    frames: Vec<Snapshot>,
}

impl Match {
    pub fn new(
        id: SessionId,
        primary: PlayerId,
        tertiary: PlayerId,
        first_mover: PlayerId,
        board: Board,
    ) -> Self {
        assert!(
            first_mover == primary || first_mover == tertiary,
            "first mover {first_mover} is not in the match"
        );
        let mut game = Self {
            id,
            primary,
            tertiary,
            first_mover,
            current_player: first_mover,
            pending_row: None,
            pending_col: None,
            last_move: None,
            board,
            busy: false,
            winner: None,
            has_moved: false,
            row_message: None,
            column_message: None,
            frames: Vec::new(),
        };
        game.frames.push(game.snapshot());
        game
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn primary(&self) -> PlayerId {
        self.primary
    }

    pub fn tertiary(&self) -> PlayerId {
        self.tertiary
    }

    /// The player who placed (or will place) the first stone.
    pub fn first_mover(&self) -> PlayerId {
        self.first_mover
    }

    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    pub fn other_player(&self) -> PlayerId {
        if self.current_player == self.primary {
            self.tertiary
        } else {
            self.primary
        }
    }

    pub fn is_current(&self, player: PlayerId) -> bool {
        self.current_player == player
    }

    pub fn includes(&self, player: PlayerId) -> bool {
        self.primary == player || self.tertiary == player
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn last_move(&self) -> Option<LastMove> {
        self.last_move
    }

    pub fn pending(&self) -> (Option<usize>, Option<usize>) {
        (self.pending_row, self.pending_col)
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    pub fn is_completed(&self) -> bool {
        self.winner.is_some()
    }

    pub fn has_moved(&self) -> bool {
        self.has_moved
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn phase(&self) -> InputPhase {
        if self.busy {
            InputPhase::Resolving
        } else if self.pending_row.is_some() {
            InputPhase::AwaitingColumn
        } else {
            InputPhase::AwaitingRow
        }
    }

    /// Bind `message` to `axis`, returning the message it replaces there.
    ///
    /// A message carries one axis only, so it is unbound from the other.
    pub(crate) fn bind_message(&mut self, axis: Axis, message: MessageId) -> Option<MessageId> {
        let (slot, other) = match axis {
            Axis::Row => (&mut self.row_message, &mut self.column_message),
            Axis::Column => (&mut self.column_message, &mut self.row_message),
        };
        if *other == Some(message) {
            *other = None;
        }
        slot.replace(message).filter(|&previous| previous != message)
    }

    /// Which half of the coordinate reactions on `message` select.
    pub fn axis_for(&self, message: MessageId) -> Option<Axis> {
        if self.row_message == Some(message) {
            Some(Axis::Row)
        } else if self.column_message == Some(message) {
            Some(Axis::Column)
        } else {
            None
        }
    }

    pub fn messages(&self) -> impl Iterator<Item = MessageId> + '_ {
        self.row_message.iter().chain(self.column_message.iter()).copied()
    }

    /// Feed one selection event from `actor` into the state machine.
    pub fn select(&mut self, actor: PlayerId, axis: Axis, index: usize) -> SelectionOutcome {
        if self.busy {
            trace!(session_id = %self.id, player = %actor, "Dropping selection while busy");
            return SelectionOutcome::Ignored(Ignored::Busy);
        }
        if self.is_completed() {
            return SelectionOutcome::Ignored(Ignored::Completed);
        }
        if !self.is_current(actor) {
            trace!(session_id = %self.id, player = %actor, "Dropping selection out of turn");
            return SelectionOutcome::Ignored(Ignored::NotYourTurn);
        }
        let limit = match axis {
            Axis::Row => self.board.rows(),
            Axis::Column => self.board.cols(),
        };
        if index >= limit {
            return SelectionOutcome::Ignored(Ignored::OutOfRange);
        }

        match axis {
            Axis::Row => self.pending_row = Some(index),
            Axis::Column => self.pending_col = Some(index),
        }

        let (Some(row), Some(col)) = (self.pending_row, self.pending_col) else {
            return SelectionOutcome::Pending {
                row: self.pending_row,
                col: self.pending_col,
            };
        };

        self.busy = true;
        let position = Position::new(row, col);
        let outcome = self.place(position);
        SelectionOutcome::Resolved { position, outcome }
    }

    /// Leave the resolving phase. Call once the result has been published.
    pub fn settle(&mut self) {
        self.busy = false;
    }

    /// Attempt a placement for the current player and flip the turn on success.
    ///
    /// Any partial selection is discarded whatever the outcome.
    pub(crate) fn place(&mut self, position: Position) -> PlacementOutcome {
        let actor = self.current_player;
        let outcome = attempt_placement(&mut self.board, &mut self.last_move, actor, position);
        self.pending_row = None;
        self.pending_col = None;
        if outcome.is_accepted() {
            self.has_moved = true;
            self.current_player = self.other_player();
            self.frames.push(self.snapshot());
            debug!(session_id = %self.id, next = %self.current_player, "Turn passes");
        }
        outcome
    }

    /// `player` gives up; the other participant wins.
    pub fn resign(&mut self, player: PlayerId) {
        debug_assert!(self.includes(player), "{player} is not in the match");
        let winner = if player == self.primary {
            self.tertiary
        } else {
            self.primary
        };
        info!(session_id = %self.id, loser = %player, winner = %winner, "Resigned");
        self.winner = Some(winner);
        self.pending_row = None;
        self.pending_col = None;
        self.frames.push(self.snapshot());
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.clone(),
            primary: self.primary,
            tertiary: self.tertiary,
            current_player: self.current_player,
            last_move: self.last_move,
            winner: self.winner,
        }
    }

    /// Snapshots taken at creation and after every accepted placement.
    pub fn frames(&self) -> &[Snapshot] {
        &self.frames
    }

    pub fn summary(&self) -> MatchSummary {
        MatchSummary {
            session: self.id,
            primary: self.primary,
            tertiary: self.tertiary,
            winner: self.winner,
            has_moved: self.has_moved,
            frames: self.frames.clone(),
        }
    }
}
