//! Line-oriented console driver.
//!
//! Stands in for the chat transport: each command line is one platform event
//! and each response is what the bot would post or edit. Responses start with
//! `=` on success and `?` on failure.
//!
//! ## Supported Commands
//!
//! - `challenge <player> <opponent>` - Start a match; prints the two message ids
//! - `react <message_id> <player> <symbol>` - A reaction added to a message
//! - `resign <player> <opponent>` - Resign and tear the match down
//! - `tile <player> <symbol|none>` - Set or clear a player's stone symbol
//! - `show <player> <opponent>` - Print the board of a live match
//! - `list` - List live sessions
//! - `help` - Command summary
//! - `quit` - Exit
//!
//! Reaction symbols are the emoji buttons or the shorthand `1`..`9` (rows)
//! and `a`..`i` (columns).

use std::collections::HashMap;
use std::io::{BufRead, Write};

use anyhow::{Context, anyhow, bail};
use tracing::trace;

use crate::board::PlayerId;
use crate::config::EngineConfig;
use crate::constants::{PROMPT_INVALID, PROMPT_PLACEMENT};
use crate::cosmetics::{MemoryPlayerStore, PlayerStore, Skins, hex_color};
use crate::game::{Match, SelectionOutcome};
use crate::reactions::{Axis, parse_reaction};
use crate::registry::{MessageId, RegistryError, SessionId, SessionRegistry};
use crate::render::{Renderer, TextRenderer, header, selection_prompt};
use crate::replay::{CompletionHook, NoReplay, ReplayWriter};
use crate::rules::PlacementOutcome;

const HELP: &str = "\
challenge <player> <opponent>       | challenge opponent to Go
react <message> <player> <symbol>   | react to a board or prompt message
resign <player> <opponent>          | end game with opponent
tile <player> <symbol|none>         | change or clear your stone symbol
show <player> <opponent>            | print a live board
list                                | list live sessions
quit                                | exit";

/// Display names of players seen on the console.
#[derive(Default)]
pub struct PlayerDirectory {
    ids: HashMap<String, PlayerId>,
    names: HashMap<PlayerId, String>,
}

impl PlayerDirectory {
    /// Id for `name`, registering it on first sight.
    pub fn id_for(&mut self, name: &str) -> PlayerId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = PlayerId(self.ids.len() as u64 + 1);
        self.ids.insert(name.to_string(), id);
        self.names.insert(id, name.to_string());
        id
    }

    pub fn lookup(&self, name: &str) -> Option<PlayerId> {
        self.ids.get(name).copied()
    }

    pub fn name_of(&self, id: PlayerId) -> String {
        self.names.get(&id).cloned().unwrap_or_else(|| id.to_string())
    }
}

pub struct ConsoleBot {
    registry: SessionRegistry,
    store: MemoryPlayerStore,
    renderer: TextRenderer,
    names: PlayerDirectory,
    next_message: MessageId,
}

impl ConsoleBot {
    /// Build a bot from `config`, writing replays if a directory is configured.
    pub fn new(config: EngineConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let hook: Box<dyn CompletionHook> = match &config.replay_dir {
            Some(dir) => Box::new(ReplayWriter::new(dir.clone())?),
            None => Box::new(NoReplay),
        };
        Ok(Self::with_hook(config, hook))
    }

    pub fn with_hook(config: EngineConfig, hook: Box<dyn CompletionHook>) -> Self {
        Self {
            registry: SessionRegistry::with_hook(config, hook),
            store: MemoryPlayerStore::new(),
            renderer: TextRenderer,
            names: PlayerDirectory::default(),
            next_message: 1,
        }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn names(&self) -> &PlayerDirectory {
        &self.names
    }

    /// Run the command loop until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> anyhow::Result<()> {
        for line in input.lines() {
            let line = line?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            let command = parts[0].to_lowercase();
            let (success, message) = self.execute(&command, &parts[1..]);

            let prefix = if success { '=' } else { '?' };
            writeln!(output, "{prefix} {message}\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Execute one command and return (success, response).
    pub fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        let result = match command {
            "challenge" => self.challenge(args),
            "react" => self.react(args),
            "resign" => self.resign(args),
            "tile" => self.tile(args),
            "show" => self.show(args),
            "list" => Ok(self.list()),
            "help" => Ok(HELP.to_string()),
            "quit" => Ok(String::new()),
            _ => Err(anyhow!("unknown command: {command}")),
        };
        match result {
            Ok(message) => (true, message),
            Err(err) => (false, format!("{err:#}")),
        }
    }

    fn allocate_message(&mut self) -> MessageId {
        let id = self.next_message;
        self.next_message += 1;
        id
    }

    fn challenge(&mut self, args: &[&str]) -> anyhow::Result<String> {
        let &[a, b] = args else {
            bail!("usage: challenge <player> <opponent>");
        };
        let primary = self.names.id_for(a);
        let tertiary = self.names.id_for(b);
        let id = match self.registry.create(primary, tertiary) {
            Ok(game) => game.id(),
            Err(RegistryError::AlreadyExists(_)) => {
                bail!("there is already a session between {a} and {b}")
            }
            Err(err) => return Err(err.into()),
        };

        let row_message = self.allocate_message();
        let column_message = self.allocate_message();
        self.registry.bind_message(id, row_message, Axis::Row)?;
        self.registry.bind_message(id, column_message, Axis::Column)?;

        let game = self.registry.get_mut(id).context("session missing after create")?;
        let board = publish(&mut self.renderer, &self.store, &self.names, game, PROMPT_PLACEMENT)?;
        Ok(format!(
            "session {id}: row message {row_message}, column message {column_message}\n{board}"
        ))
    }

    fn react(&mut self, args: &[&str]) -> anyhow::Result<String> {
        let &[message, player, symbol] = args else {
            bail!("usage: react <message_id> <player> <symbol>");
        };
        let message: MessageId = message
            .parse()
            .with_context(|| format!("invalid message id '{message}'"))?;
        let verbose = self.registry.config().verbose;

        let Some(actor) = self.names.lookup(player) else {
            trace!(player, "Reaction from a player with no sessions");
            return Ok(String::new());
        };
        let Some(game) = self.registry.route_event(message) else {
            trace!(message, "Reaction on a message no session owns");
            return Ok(String::new());
        };
        if game.is_completed() {
            let (a, b) = (game.primary(), game.tertiary());
            return self.teardown(a, b);
        }
        let Some(axis) = game.axis_for(message) else {
            return Ok(String::new());
        };
        let limit = match axis {
            Axis::Row => game.board().rows(),
            Axis::Column => game.board().cols(),
        };
        let Some(index) = parse_reaction(axis, symbol, limit) else {
            trace!(message, symbol, "Reaction outside the vocabulary");
            return Ok(String::new());
        };

        match game.select(actor, axis, index) {
            SelectionOutcome::Ignored(reason) => {
                trace!(session_id = %game.id(), ?reason, "Selection ignored");
                if verbose {
                    publish(&mut self.renderer, &self.store, &self.names, game, PROMPT_PLACEMENT)
                } else {
                    Ok(String::new())
                }
            }
            SelectionOutcome::Pending { .. } => {
                if verbose {
                    publish(&mut self.renderer, &self.store, &self.names, game, PROMPT_PLACEMENT)
                } else {
                    Ok(selection_prompt(PROMPT_PLACEMENT, game.pending(), game.last_move()))
                }
            }
            SelectionOutcome::Resolved { outcome, .. } => {
                let published = match &outcome {
                    PlacementOutcome::Accepted { captured } => {
                        publish(&mut self.renderer, &self.store, &self.names, game, PROMPT_PLACEMENT)
                            .map(|board| match captured.len() {
                                0 => board,
                                n => format!("captured {n}\n{board}"),
                            })
                    }
                    PlacementOutcome::Rejected(reason) if verbose => {
                        publish(&mut self.renderer, &self.store, &self.names, game, PROMPT_INVALID)
                            .map(|board| format!("{reason}\n{board}"))
                    }
                    PlacementOutcome::Rejected(reason) => Ok(format!(
                        "{reason}\n{}",
                        selection_prompt(PROMPT_INVALID, game.pending(), game.last_move())
                    )),
                };
                // Publishing is done, successful or not; let the next selection in.
                game.settle();
                published
            }
        }
    }

    fn resign(&mut self, args: &[&str]) -> anyhow::Result<String> {
        let &[a, b] = args else {
            bail!("usage: resign <player> <opponent>");
        };
        let not_found = || anyhow!("no active session found between {a} and {b}");
        let player = self.names.lookup(a).ok_or_else(not_found)?;
        let opponent = self.names.lookup(b).ok_or_else(not_found)?;
        let game = self
            .registry
            .get_mut(SessionId::new(player, opponent))
            .ok_or_else(not_found)?;
        game.resign(player);
        let board = publish(&mut self.renderer, &self.store, &self.names, game, PROMPT_PLACEMENT)?;
        let ended = self.teardown(player, opponent)?;
        Ok(format!("{board}\n{ended}"))
    }

    /// Destroy a match; the registry hands its summary to the completion hook.
    fn teardown(&mut self, a: PlayerId, b: PlayerId) -> anyhow::Result<String> {
        let game = self.registry.destroy(a, b)?;
        let (primary, tertiary) = (self.names.name_of(game.primary()), self.names.name_of(game.tertiary()));
        Ok(format!("{primary} ended session between {primary} and {tertiary}"))
    }

    fn tile(&mut self, args: &[&str]) -> anyhow::Result<String> {
        let &[player, symbol] = args else {
            bail!("usage: tile <player> <symbol|none>");
        };
        let id = self.names.id_for(player);
        let mut out = vec![if symbol.eq_ignore_ascii_case("none") {
            self.store.set_tile(id, None);
            "unset emoji".to_string()
        } else if symbol.is_ascii() {
            bail!("invalid emoji");
        } else {
            self.store.set_tile(id, Some(symbol.to_string()));
            "set emoji".to_string()
        }];

        for session in self.registry.sessions_for_player(id) {
            if let Some(game) = self.registry.get_mut(session) {
                out.push(publish(&mut self.renderer, &self.store, &self.names, game, PROMPT_PLACEMENT)?);
            }
        }
        Ok(out.join("\n"))
    }

    fn show(&mut self, args: &[&str]) -> anyhow::Result<String> {
        let &[a, b] = args else {
            bail!("usage: show <player> <opponent>");
        };
        let not_found = || anyhow!("no active session found between {a} and {b}");
        let player = self.names.lookup(a).ok_or_else(not_found)?;
        let opponent = self.names.lookup(b).ok_or_else(not_found)?;
        let game = self
            .registry
            .get_mut(SessionId::new(player, opponent))
            .ok_or_else(not_found)?;
        publish(&mut self.renderer, &self.store, &self.names, game, PROMPT_PLACEMENT)
    }

    fn list(&self) -> String {
        let lines: Vec<String> = self
            .registry
            .session_ids()
            .into_iter()
            .filter_map(|id| {
                let (a, b) = id.players();
                let game = self.registry.get(a, b)?;
                Some(format!(
                    "{id}: {} vs {}, {} to move",
                    self.names.name_of(game.primary()),
                    self.names.name_of(game.tertiary()),
                    self.names.name_of(game.current_player())
                ))
            })
            .collect();
        if lines.is_empty() {
            "no active sessions".to_string()
        } else {
            lines.join("\n")
        }
    }
}

/// Render the board message and the prompt message of `game`.
fn publish(
    renderer: &mut impl Renderer,
    store: &dyn PlayerStore,
    names: &PlayerDirectory,
    game: &Match,
    heading: &str,
) -> anyhow::Result<String> {
    let skins = Skins::resolve(store, game);
    let board = renderer.render(&game.snapshot(), &skins)?;
    let current = names.name_of(game.current_player());
    let winner = game.winner().map(|w| names.name_of(w));
    let title = header(&current, winner.as_deref());
    let color = skins
        .get(game.current_player())
        .map(|skin| hex_color(skin.color))
        .unwrap_or_default();
    let prompt = selection_prompt(heading, game.pending(), game.last_move());
    Ok(format!("{title} [{color}]\n{board}{prompt}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FirstMove;

    fn bot() -> ConsoleBot {
        ConsoleBot::new(EngineConfig {
            first_move: FirstMove::Challenger,
            ..EngineConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_challenge_allocates_messages() {
        let mut bot = bot();
        let (success, response) = bot.execute("challenge", &["alice", "bob"]);
        assert!(success);
        assert!(response.starts_with("session 1-2: row message 1, column message 2"));
        assert!(response.contains("It's your move, alice."));
    }

    #[test]
    fn test_counter_challenge_fails() {
        let mut bot = bot();
        bot.execute("challenge", &["alice", "bob"]);
        let (success, response) = bot.execute("challenge", &["bob", "alice"]);
        assert!(!success);
        assert_eq!(response, "there is already a session between bob and alice");
    }

    #[test]
    fn test_react_places_stone() {
        let mut bot = bot();
        bot.execute("challenge", &["alice", "bob"]);
        let (success, response) = bot.execute("react", &["1", "alice", "5"]);
        assert!(success);
        assert_eq!(response, "`Make your placement: 5`");
        let (success, response) = bot.execute("react", &["2", "alice", "e"]);
        assert!(success);
        assert!(response.contains("It's your move, bob."));
        assert!(response.contains("Your opponent chose: 5 E"));
        let game = bot.registry().get(PlayerId(1), PlayerId(2)).unwrap();
        assert!(!game.is_busy());
        assert_eq!(game.current_player(), PlayerId(2));
    }

    #[test]
    fn test_rejection_is_reported() {
        let mut bot = bot();
        bot.execute("challenge", &["alice", "bob"]);
        bot.execute("react", &["1", "alice", "5"]);
        bot.execute("react", &["2", "alice", "e"]);
        bot.execute("react", &["1", "bob", "5"]);
        let (success, response) = bot.execute("react", &["2", "bob", "e"]);
        assert!(success);
        assert!(response.starts_with("Illegal placement: point is occupied"));
        assert!(response.contains("Invalid Placement:"));
    }

    #[test]
    fn test_stale_events_are_silent() {
        let mut bot = bot();
        bot.execute("challenge", &["alice", "bob"]);
        assert_eq!(bot.execute("react", &["99", "alice", "5"]), (true, String::new()));
        assert_eq!(bot.execute("react", &["1", "carol", "5"]), (true, String::new()));
        assert_eq!(bot.execute("react", &["1", "bob", "5"]), (true, String::new()));
        assert_eq!(bot.execute("react", &["1", "alice", "x"]), (true, String::new()));
        assert!(!bot.execute("react", &["one", "alice", "5"]).0);
    }

    #[test]
    fn test_resign_tears_down() {
        let mut bot = bot();
        bot.execute("challenge", &["alice", "bob"]);
        let (success, response) = bot.execute("resign", &["alice", "bob"]);
        assert!(success);
        assert!(response.contains("Congratulations, bob"));
        assert!(response.ends_with("alice ended session between alice and bob"));
        assert!(bot.registry().is_empty());
        let (success, response) = bot.execute("resign", &["alice", "bob"]);
        assert!(!success);
        assert_eq!(response, "no active session found between alice and bob");
    }

    #[test]
    fn test_tile_rerenders_sessions() {
        let mut bot = bot();
        bot.execute("challenge", &["alice", "bob"]);
        bot.execute("react", &["1", "alice", "1"]);
        bot.execute("react", &["2", "alice", "a"]);
        let (success, response) = bot.execute("tile", &["alice", "\u{1F34E}"]);
        assert!(success);
        assert!(response.starts_with("set emoji"));
        assert!(response.contains(" 1 \u{1F34E}"));
        assert!(!bot.execute("tile", &["alice", "x"]).0);
        let (_, response) = bot.execute("tile", &["alice", "none"]);
        assert!(response.starts_with("unset emoji"));
    }

    #[test]
    fn test_run_loop() {
        let mut bot = bot();
        let input = b"# comment\nchallenge alice bob\nlist\nbogus\nquit\nlist\n";
        let mut output = Vec::new();
        bot.run(&input[..], &mut output).unwrap();
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("= 1-2: alice vs bob, alice to move"));
        assert!(output.contains("? unknown command: bogus"));
        // Nothing after quit is executed.
        assert_eq!(output.matches("alice vs bob").count(), 1);
    }
}
