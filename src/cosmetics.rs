//! Player cosmetic preferences: stone symbol and accent color.
//!
//! Preferences only affect rendering. A player without a stored preference
//! gets the default skin for their side of the board.

use std::collections::HashMap;

use crate::board::PlayerId;
use crate::constants::{BLACK_COLOR, BLACK_TILE, WHITE_COLOR, WHITE_TILE};
use crate::game::Match;

pub type Rgb = (u8, u8, u8);

/// Stored preferences for one player; `None` fields fall back to defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cosmetics {
    pub tile: Option<String>,
    pub color: Option<Rgb>,
}

pub trait PlayerStore {
    fn get_player(&self, player: PlayerId) -> Cosmetics;
    fn set_tile(&mut self, player: PlayerId, tile: Option<String>);
    fn set_color(&mut self, player: PlayerId, color: Option<Rgb>);
}

/// In-process preference store.
#[derive(Default)]
pub struct MemoryPlayerStore {
    players: HashMap<PlayerId, Cosmetics>,
}

impl MemoryPlayerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlayerStore for MemoryPlayerStore {
    fn get_player(&self, player: PlayerId) -> Cosmetics {
        self.players.get(&player).cloned().unwrap_or_default()
    }

    fn set_tile(&mut self, player: PlayerId, tile: Option<String>) {
        self.players.entry(player).or_default().tile = tile;
    }

    fn set_color(&mut self, player: PlayerId, color: Option<Rgb>) {
        self.players.entry(player).or_default().color = color;
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Skin {
    pub tile: String,
    pub color: Rgb,
}

/// Resolved skins for both sides of one match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Skins {
    entries: Vec<(PlayerId, Skin)>,
}

impl Skins {
    pub fn resolve(store: &dyn PlayerStore, game: &Match) -> Self {
        let first = game.first_mover();
        let second = if first == game.primary() {
            game.tertiary()
        } else {
            game.primary()
        };
        let entries = [(first, BLACK_TILE, BLACK_COLOR), (second, WHITE_TILE, WHITE_COLOR)]
            .into_iter()
            .map(|(player, tile, color)| {
                let stored = store.get_player(player);
                let skin = Skin {
                    tile: stored.tile.unwrap_or_else(|| tile.to_string()),
                    color: stored.color.unwrap_or(color),
                };
                (player, skin)
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, player: PlayerId) -> Option<&Skin> {
        self.entries
            .iter()
            .find(|(p, _)| *p == player)
            .map(|(_, skin)| skin)
    }
}

pub fn hex_color((r, g, b): Rgb) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}
