//! Board rendering and selection prompts.
//!
//! The [`Renderer`] trait is the seam to an image backend; [`TextRenderer`]
//! draws the board as an emoji grid and returns it as the handle.

use std::fmt::Write;

use crate::board::Tile;
use crate::cosmetics::Skins;
use crate::constants::{BLANK_TILE, PROMPT_OPPONENT};
use crate::game::Snapshot;
use crate::reactions::{col_label, label, row_label};
use crate::rules::LastMove;

pub trait Renderer {
    /// Render `snapshot`, returning a URL or other handle to the result.
    fn render(&mut self, snapshot: &Snapshot, skins: &Skins) -> anyhow::Result<String>;
}

#[derive(Default)]
pub struct TextRenderer;

impl Renderer for TextRenderer {
    fn render(&mut self, snapshot: &Snapshot, skins: &Skins) -> anyhow::Result<String> {
        let board = &snapshot.board;
        let mut out = String::new();
        write!(out, "   ")?;
        for col in 0..board.cols() {
            write!(out, " {}", col_label(col))?;
        }
        writeln!(out)?;
        for row in 0..board.rows() {
            write!(out, "{:>2} ", row_label(row))?;
            for col in 0..board.cols() {
                let tile = match board.get((row, col).into()) {
                    Tile::Empty => BLANK_TILE,
                    Tile::Stone { owner } => skins
                        .get(owner)
                        .map(|skin| skin.tile.as_str())
                        .unwrap_or(BLANK_TILE),
                };
                write!(out, "{tile}")?;
            }
            writeln!(out)?;
        }
        Ok(out)
    }
}

/// Embed title above the board.
pub fn header(current: &str, winner: Option<&str>) -> String {
    match winner {
        Some(winner) => format!("Congratulations, {winner}"),
        None => format!("It's your move, {current}."),
    }
}

/// Prompt message showing the partial selection and the opponent's last move.
pub fn selection_prompt(
    heading: &str,
    pending: (Option<usize>, Option<usize>),
    last_move: Option<LastMove>,
) -> String {
    let (row, col) = pending;
    let mut selection = String::from(heading);
    if let Some(row) = row {
        selection.push(' ');
        selection.push_str(&row_label(row));
    }
    if let Some(col) = col {
        selection.push(' ');
        selection.push_str(&col_label(col));
    }
    match last_move {
        Some(last) => format!("`{selection}`\n`{PROMPT_OPPONENT} {}`", label(last.position)),
        None => format!("`{selection}`"),
    }
}
