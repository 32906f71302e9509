//! Integration tests for goban-bot
//!
//! These drive the public API the way the transport does: matches come from
//! the registry, moves arrive as row and column selections.

use std::collections::BTreeSet;

use quickcheck::{Arbitrary, Gen, quickcheck};

use goban_bot::board::{Board, PlayerId, Position, Tile};
use goban_bot::config::{EngineConfig, FirstMove};
use goban_bot::console::ConsoleBot;
use goban_bot::game::{InputPhase, Match, SelectionOutcome};
use goban_bot::reactions::Axis;
use goban_bot::registry::{SessionId, SessionRegistry, session_id};
use goban_bot::resolver::{ResolvedTile, find_group, group_has_liberty, liberties};
use goban_bot::rules::{PlacementOutcome, PlacementRejected};

// =============================================================================
// Helper functions
// =============================================================================

const BLACK: PlayerId = PlayerId(1);
const WHITE: PlayerId = PlayerId(2);

fn p(row: usize, col: usize) -> Position {
    Position::new(row, col)
}

fn new_match() -> Match {
    Match::new(SessionId::new(BLACK, WHITE), BLACK, WHITE, BLACK, Board::square(9))
}

/// Play a move for whoever holds the turn, through the selection events.
fn play(game: &mut Match, row: usize, col: usize) -> PlacementOutcome {
    let actor = game.current_player();
    game.select(actor, Axis::Row, row);
    let SelectionOutcome::Resolved { outcome, .. } = game.select(actor, Axis::Column, col) else {
        panic!("({row}, {col}) did not resolve");
    };
    game.settle();
    outcome
}

/// Play moves alternately, panicking if any is rejected.
fn setup(moves: &[(usize, usize)]) -> Match {
    let mut game = new_match();
    for &(row, col) in moves {
        let outcome = play(&mut game, row, col);
        assert!(outcome.is_accepted(), "setup move ({row}, {col}) was {outcome:?}");
    }
    game
}

fn captured(points: &[(usize, usize)]) -> PlacementOutcome {
    PlacementOutcome::Accepted {
        captured: points.iter().map(|&pt| Position::from(pt)).collect(),
    }
}

fn no_captures() -> PlacementOutcome {
    PlacementOutcome::Accepted {
        captured: BTreeSet::new(),
    }
}

// =============================================================================
// Placement scenarios
// =============================================================================

#[test]
fn test_center_then_occupied() {
    let mut game = new_match();
    assert_eq!(play(&mut game, 4, 4), no_captures());
    assert_eq!(game.current_player(), WHITE);
    assert_eq!(
        play(&mut game, 4, 4).rejection(),
        Some(PlacementRejected::Occupied)
    );
    assert_eq!(game.current_player(), WHITE);
    assert_eq!(game.board().get(p(4, 4)), Tile::Stone { owner: BLACK });
}

#[test]
fn test_surround_capture() {
    // Black (1,1), (0,2), (2,2), then (1,3) closes around White (1,2).
    let mut game = setup(&[(1, 1), (1, 2), (0, 2), (8, 8), (2, 2), (8, 7)]);
    assert_eq!(play(&mut game, 1, 3), captured(&[(1, 2)]));
    assert_eq!(game.board().get(p(1, 2)), Tile::Empty);
    assert_eq!(game.board().stone_count(WHITE), 2);
}

#[test]
fn test_repetition_after_capture() {
    let mut game = setup(&[(1, 1), (1, 2), (0, 2), (8, 8), (2, 2), (8, 7), (1, 3)]);
    assert_eq!(game.current_player(), WHITE);

    // White may not immediately replay the captured point.
    assert_eq!(
        play(&mut game, 1, 2).rejection(),
        Some(PlacementRejected::Repetition)
    );
    assert_eq!(game.current_player(), WHITE);

    // Elsewhere is fine, and it moves the last move on.
    assert_eq!(play(&mut game, 8, 6), no_captures());
    assert_eq!(game.last_move().map(|m| m.position), Some(p(8, 6)));
    assert_eq!(game.last_move().and_then(|m| m.vacated), None);

    // Now the point is open again, for Black.
    assert!(play(&mut game, 1, 2).is_accepted());
}

#[test]
fn test_corner_suicide_leaves_board_unchanged() {
    let mut game = setup(&[(0, 1), (8, 8), (1, 0)]);
    let before = game.board().clone();
    assert_eq!(
        play(&mut game, 0, 0).rejection(),
        Some(PlacementRejected::Suicide)
    );
    assert_eq!(game.board().get(p(0, 0)), Tile::Empty);
    assert_eq!(game.board(), &before);
    assert_eq!(game.current_player(), WHITE);
    assert_eq!(game.pending(), (None, None));
}

#[test]
fn test_capture_takes_precedence_over_suicide() {
    let mut game = setup(&[
        (0, 1),
        (0, 2),
        (1, 0),
        (2, 2),
        (2, 1),
        (1, 3),
        (1, 2),
    ]);
    // White (1,1) has no liberty of its own but takes Black (1,2).
    assert_eq!(play(&mut game, 1, 1), captured(&[(1, 2)]));
    assert_eq!(game.board().get(p(1, 1)), Tile::Stone { owner: WHITE });

    // Black cannot recapture at once.
    assert_eq!(
        play(&mut game, 1, 2).rejection(),
        Some(PlacementRejected::Repetition)
    );
}

#[test]
fn test_multi_stone_capture_allows_immediate_refill() {
    // White pair (0,0),(0,1) is captured by Black (1,1).
    let mut game = setup(&[(1, 0), (0, 0), (0, 2), (0, 1), (1, 1)]);
    assert_eq!(game.board().stone_count(WHITE), 0);
    // Only a single-stone capture forbids its point, so White may play back in.
    assert!(play(&mut game, 0, 1).is_accepted());
}

#[test]
fn test_edge_group_capture() {
    // White edge pair (0,3),(0,4) with Black around it.
    let mut game = setup(&[(0, 2), (0, 3), (1, 3), (0, 4), (1, 4), (8, 8)]);
    assert_eq!(play(&mut game, 0, 5), captured(&[(0, 3), (0, 4)]));
}

// =============================================================================
// State machine through the registry
// =============================================================================

#[test]
fn test_selection_order_is_symmetric() {
    let mut registry = SessionRegistry::new(EngineConfig {
        first_move: FirstMove::Challenger,
        ..EngineConfig::default()
    });
    let id = registry.create(BLACK, WHITE).unwrap().id();
    registry.bind_message(id, 10, Axis::Row).unwrap();
    registry.bind_message(id, 11, Axis::Column).unwrap();

    let game = registry.route_event(11).unwrap();
    let axis = game.axis_for(11).unwrap();
    assert_eq!(axis, Axis::Column);
    game.select(BLACK, axis, 3);
    assert_eq!(game.phase(), InputPhase::AwaitingRow);

    let game = registry.route_event(10).unwrap();
    let outcome = game.select(BLACK, Axis::Row, 6);
    assert_eq!(
        outcome,
        SelectionOutcome::Resolved {
            position: p(6, 3),
            outcome: no_captures()
        }
    );
    assert_eq!(game.phase(), InputPhase::Resolving);
    game.settle();
    assert_eq!(game.current_player(), WHITE);
}

#[test]
fn test_selection_during_resolution_is_dropped() {
    let mut game = new_match();
    game.select(BLACK, Axis::Row, 2);
    game.select(BLACK, Axis::Column, 2);
    assert!(game.is_busy());
    for axis in [Axis::Row, Axis::Column] {
        assert!(matches!(
            game.select(WHITE, axis, 5),
            SelectionOutcome::Ignored(_)
        ));
    }
    game.settle();
    // Nothing was queued: White starts from scratch.
    assert_eq!(game.pending(), (None, None));
    assert_eq!(game.phase(), InputPhase::AwaitingRow);
}

#[test]
fn test_counter_challenge_hits_same_session() {
    let mut registry = SessionRegistry::new(EngineConfig::default());
    registry.create(BLACK, WHITE).unwrap();
    assert!(registry.create(WHITE, BLACK).is_err());
    assert!(registry.get(WHITE, BLACK).is_some());
    let game = registry.destroy(WHITE, BLACK).unwrap();
    assert!(!game.has_moved());
    assert!(registry.destroy(BLACK, WHITE).is_err());
}

// =============================================================================
// Console driver
// =============================================================================

#[test]
fn test_console_game_with_replay() {
    let dir = tempfile::tempdir().unwrap();
    let mut bot = ConsoleBot::new(EngineConfig {
        first_move: FirstMove::Challenger,
        replay_dir: Some(dir.path().to_path_buf()),
        ..EngineConfig::default()
    })
    .unwrap();

    let script = "\
challenge alice bob
react 1 alice 5
react 2 alice e
react 2 bob c
react 1 bob 3
resign alice bob
quit
";
    let mut output = Vec::new();
    bot.run(script.as_bytes(), &mut output).unwrap();
    let output = String::from_utf8(output).unwrap();

    assert!(output.contains("It's your move, bob."));
    assert!(output.contains("Your opponent chose: 3 C"));
    assert!(output.contains("Congratulations, bob"));
    assert!(!output.contains("\n? "));
    assert!(bot.registry().is_empty());

    let files: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(files.len(), 1);
}

// =============================================================================
// Properties
// =============================================================================

/// A point on the 9x9 board.
#[derive(Copy, Clone, Debug)]
struct Placement {
    row: usize,
    col: usize,
}

impl Arbitrary for Placement {
    fn arbitrary(g: &mut Gen) -> Self {
        Self {
            row: usize::from(u8::arbitrary(g) % 9),
            col: usize::from(u8::arbitrary(g) % 9),
        }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let Placement { row, col } = *self;
        Box::new(
            (row, col)
                .shrink()
                .map(|(row, col)| Placement { row, col }),
        )
    }
}

/// Play every placement in turn, rejected or not.
fn play_all(placements: &[Placement]) -> Match {
    let mut game = new_match();
    for placement in placements {
        play(&mut game, placement.row, placement.col);
    }
    game
}

fn groups_all_breathe(board: &Board) -> bool {
    board.positions().all(|pos| match board.get(pos).owner() {
        Some(owner) => group_has_liberty(board, &find_group(board, owner, pos)),
        None => true,
    })
}

quickcheck! {
    fn prop_session_id_symmetric(a: u64, b: u64) -> bool {
        session_id(PlayerId(a), PlayerId(b)) == session_id(PlayerId(b), PlayerId(a))
    }

    fn prop_open_point_without_opponents_is_accepted(placements: Vec<Placement>) -> bool {
        let game = play_all(&placements);
        let board = game.board();
        let mover = game.current_player();
        let accepted = board.positions().filter(|&pos| board.get(pos).is_empty()).all(|pos| {
            let around = liberties(board, pos);
            let touches_opponent = around
                .iter()
                .any(|tile| matches!(tile, ResolvedTile::Cell { tile: Tile::Stone { owner }, .. } if *owner != mover));
            let breathes = around.iter().any(|tile| tile.is_liberty());
            if touches_opponent || !breathes {
                return true;
            }
            let mut attempt = game.clone();
            play(&mut attempt, pos.row, pos.col) == no_captures()
        });
        accepted
    }

    fn prop_random_play_keeps_invariants(placements: Vec<Placement>) -> bool {
        let mut game = new_match();
        for Placement { row, col } in placements {
            let before = game.board().clone();
            let mover = game.current_player();
            let outcome = play(&mut game, row, col);

            if game.pending() != (None, None) || game.is_busy() {
                return false;
            }
            let consistent = match outcome {
                PlacementOutcome::Accepted { captured } => {
                    game.current_player() != mover
                        && game.board().get(p(row, col)) == Tile::Stone { owner: mover }
                        && captured.iter().all(|&pt| game.board().get(pt) == Tile::Empty)
                }
                PlacementOutcome::Rejected(_) => {
                    game.current_player() == mover && game.board() == &before
                }
            };
            // No group is ever left on the board without a liberty.
            if !consistent || !groups_all_breathe(game.board()) {
                return false;
            }
        }
        true
    }

    fn prop_last_point_cannot_be_replayed(placements: Vec<Placement>) -> bool {
        let mut game = play_all(&placements);
        let Some(last) = game.last_move() else { return true };
        let outcome = play(&mut game, last.position.row, last.position.col);
        let vacated_ok = match last.vacated {
            Some(v) => play(&mut game, v.row, v.col).rejection() == Some(PlacementRejected::Repetition),
            None => true,
        };
        outcome.rejection().is_some() && vacated_ok
    }
}
