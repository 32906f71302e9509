//! Session registry: one live match per unordered pair of players.
//!
//! Owned by whatever dispatches transport events. Matches are looked up by
//! their player pair or by any message bound to them. Each message routes to
//! at most one match, and destroying a match hands its summary to the
//! registry's completion hook.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::Serialize;
use tracing::{info, warn};

use crate::board::{Board, PlayerId};
use crate::config::{EngineConfig, FirstMove};
use crate::game::Match;
use crate::reactions::Axis;
use crate::replay::{CompletionHook, NoReplay};

/// Transport-level message identity.
pub type MessageId = u64;

/// Symmetric identity of a player pair: `new(a, b) == new(b, a)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SessionId {
    low: PlayerId,
    high: PlayerId,
}

impl SessionId {
    pub fn new(a: PlayerId, b: PlayerId) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    pub fn players(&self) -> (PlayerId, PlayerId) {
        (self.low, self.high)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

pub fn session_id(a: PlayerId, b: PlayerId) -> SessionId {
    SessionId::new(a, b)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    AlreadyExists(SessionId),
    NotFound(SessionId),
    MessageTaken { message: MessageId, owner: SessionId },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::AlreadyExists(id) => write!(f, "session {id} already exists"),
            RegistryError::NotFound(id) => write!(f, "no active session {id}"),
            RegistryError::MessageTaken { message, owner } => {
                write!(f, "message {message} already belongs to session {owner}")
            }
        }
    }
}

impl std::error::Error for RegistryError {}

pub struct SessionRegistry {
    config: EngineConfig,
    rng: fastrand::Rng,
    sessions: HashMap<SessionId, Match>,
    messages: HashMap<MessageId, SessionId>,
    players: HashMap<PlayerId, BTreeSet<SessionId>>,
    hook: Box<dyn CompletionHook>,
}

impl SessionRegistry {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_hook(config, Box::new(NoReplay))
    }

    pub fn with_hook(config: EngineConfig, hook: Box<dyn CompletionHook>) -> Self {
        let rng = match config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        Self {
            config,
            rng,
            sessions: HashMap::new(),
            messages: HashMap::new(),
            players: HashMap::new(),
            hook,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Start a match between `primary` (the challenger) and `tertiary`.
    pub fn create(
        &mut self,
        primary: PlayerId,
        tertiary: PlayerId,
    ) -> Result<&mut Match, RegistryError> {
        let id = SessionId::new(primary, tertiary);
        if self.sessions.contains_key(&id) {
            return Err(RegistryError::AlreadyExists(id));
        }
        let first_mover = match self.config.first_move {
            FirstMove::Challenger => primary,
            FirstMove::Random if self.rng.bool() => tertiary,
            FirstMove::Random => primary,
        };
        let board = Board::square(self.config.board_size);
        info!(session_id = %id, primary = %primary, tertiary = %tertiary, first = %first_mover, "Creating session");

        self.players.entry(primary).or_default().insert(id);
        self.players.entry(tertiary).or_default().insert(id);
        Ok(self
            .sessions
            .entry(id)
            .or_insert(Match::new(id, primary, tertiary, first_mover, board)))
    }

    /// Route reactions on `message` to `session` as selections on `axis`.
    ///
    /// The message previously bound to that axis stops routing. A message
    /// already routed to another session is refused.
    pub fn bind_message(
        &mut self,
        session: SessionId,
        message: MessageId,
        axis: Axis,
    ) -> Result<(), RegistryError> {
        if let Some(owner) = self
            .messages
            .get(&message)
            .copied()
            .filter(|&owner| owner != session)
        {
            return Err(RegistryError::MessageTaken { message, owner });
        }
        let game = self
            .sessions
            .get_mut(&session)
            .ok_or(RegistryError::NotFound(session))?;
        if let Some(previous) = game.bind_message(axis, message) {
            self.messages.remove(&previous);
        }
        self.messages.insert(message, session);
        Ok(())
    }

    pub fn get(&self, a: PlayerId, b: PlayerId) -> Option<&Match> {
        self.sessions.get(&SessionId::new(a, b))
    }

    pub fn get_mut(&mut self, id: SessionId) -> Option<&mut Match> {
        self.sessions.get_mut(&id)
    }

    /// The match that owns `message`, if it is still live.
    pub fn route_event(&mut self, message: MessageId) -> Option<&mut Match> {
        let id = self.messages.get(&message)?;
        self.sessions.get_mut(id)
    }

    pub fn sessions_for_player(&self, player: PlayerId) -> Vec<SessionId> {
        self.players
            .get(&player)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn session_ids(&self) -> Vec<SessionId> {
        let mut ids: Vec<SessionId> = self.sessions.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Tear down the match between `a` and `b`.
    ///
    /// The completion hook sees the match summary once; a hook failure is
    /// logged and does not keep the match alive.
    pub fn destroy(&mut self, a: PlayerId, b: PlayerId) -> Result<Match, RegistryError> {
        let id = SessionId::new(a, b);
        let game = self.sessions.remove(&id).ok_or(RegistryError::NotFound(id))?;
        for message in game.messages() {
            self.messages.remove(&message);
        }
        for player in [game.primary(), game.tertiary()] {
            if let Some(ids) = self.players.get_mut(&player) {
                ids.remove(&id);
                if ids.is_empty() {
                    self.players.remove(&player);
                }
            }
        }
        info!(session_id = %id, has_moved = game.has_moved(), "Destroyed session");
        if let Err(err) = self.hook.on_complete(&game.summary()) {
            warn!(session_id = %id, "Could not complete session: {err:#}");
        }
        Ok(game)
    }
}
