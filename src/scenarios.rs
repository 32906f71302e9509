//! Scripted move lists for demonstrations and regression checks.
//!
//! Each scenario is replayed through the selection state machine with the
//! challenger moving first. Every move is made by whoever holds the turn, so a
//! rejected move leaves the next entry to the same player.

use crate::board::{PlayerId, Position};
use crate::game::{Match, SelectionOutcome};
use crate::reactions::Axis;
use crate::rules::PlacementOutcome;

pub struct Scenario {
    pub name: &'static str,
    pub moves: &'static [(usize, usize)],
}

pub const SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "capture",
        moves: &[
            (0, 3), (0, 2), (1, 3), (1, 2), (2, 4),
            (0, 4), (4, 3), (1, 4), (2, 2), (2, 3),
        ],
    },
    Scenario {
        name: "sacrifice",
        moves: &[
            (0, 0), (0, 3), (0, 1), (1, 2), (0, 2),
            (1, 4), (0, 3), (2, 3), (1, 3),
        ],
    },
    Scenario {
        name: "occupied",
        moves: &[(5, 5), (5, 5), (5, 3), (3, 3), (5, 5)],
    },
    Scenario {
        name: "nested_capture",
        moves: &[
            (2, 4), (4, 5), (6, 4), (5, 4), (4, 2), (4, 3),
            (4, 6), (3, 4), (3, 3), (2, 2), (3, 5), (2, 6),
            (5, 5), (6, 6), (5, 3), (6, 2), (4, 4),
        ],
    },
];

pub fn find(name: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|s| s.name == name)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub player: PlayerId,
    pub position: Position,
    pub outcome: PlacementOutcome,
}

/// Play `scenario` on `game`, one row and one column selection per move.
pub fn replay(scenario: &Scenario, game: &mut Match) -> anyhow::Result<Vec<Step>> {
    let mut steps = Vec::with_capacity(scenario.moves.len());
    for &(row, col) in scenario.moves {
        let player = game.current_player();
        game.select(player, Axis::Row, row);
        let SelectionOutcome::Resolved { position, outcome } = game.select(player, Axis::Column, col)
        else {
            anyhow::bail!("move ({row}, {col}) in '{}' did not resolve", scenario.name);
        };
        game.settle();
        steps.push(Step {
            player,
            position,
            outcome,
        });
    }
    Ok(steps)
}
