//! Goban-Bot: Go matches hosted in chat channels, played with reactions.
//!
//! A player picks a row by reacting to the board message and a column by
//! reacting to the prompt message. Once both are known the placement is checked
//! against a liberty-and-capture ruleset with a simplified repetition rule.
//!
//! ## Modules
//!
//! - [`constants`] - Board limits, reaction symbols, default skins
//! - [`board`] - Grid and tile model
//! - [`resolver`] - Neighbor lookup, groups and liberties
//! - [`rules`] - Placement validation and capture resolution
//! - [`game`] - A live match and its move-input state machine
//! - [`registry`] - Sessions keyed by player pair and by message
//! - [`reactions`] - Reaction vocabulary
//! - [`config`] - Engine configuration
//! - [`cosmetics`] - Player stone symbols and colors
//! - [`render`] - Text rendering and prompts
//! - [`replay`] - Completion hooks and replay files
//! - [`scenarios`] - Scripted move lists
//! - [`console`] - Line-oriented driver standing in for the chat transport
//!
//! ## Example
//!
//! ```
//! use goban_bot::board::PlayerId;
//! use goban_bot::config::{EngineConfig, FirstMove};
//! use goban_bot::game::SelectionOutcome;
//! use goban_bot::reactions::Axis;
//! use goban_bot::registry::SessionRegistry;
//!
//! let mut registry = SessionRegistry::new(EngineConfig {
//!     first_move: FirstMove::Challenger,
//!     ..EngineConfig::default()
//! });
//! let (alice, bob) = (PlayerId(1), PlayerId(2));
//! let game = registry.create(alice, bob).unwrap();
//!
//! game.select(alice, Axis::Row, 4);
//! let result = game.select(alice, Axis::Column, 4);
//! assert!(matches!(result, SelectionOutcome::Resolved { ref outcome, .. } if outcome.is_accepted()));
//!
//! // The caller publishes the result, then lets the next selection in.
//! game.settle();
//! assert_eq!(game.current_player(), bob);
//! ```

pub mod board;
pub mod config;
pub mod console;
pub mod constants;
pub mod cosmetics;
pub mod game;
pub mod reactions;
pub mod registry;
pub mod render;
pub mod replay;
pub mod resolver;
pub mod rules;
pub mod scenarios;
