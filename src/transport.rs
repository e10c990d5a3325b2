//! Requests the game model hands to the network layer, and the replies
//! it accepts back
//!
//! The model never talks to the network itself. It pushes [`Request`]s
//! into a channel; the host performs them in whatever order and at
//! whatever time it likes and feeds each [`Response`] back through
//! `Game::handle_response` together with the request's [`Ticket`].

use crate::game::moves::Move;
use crate::game::snapshot::{ChatMessage, Snapshot};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Identifies the game instance and board generation a request was
/// issued from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    /// Random id of the `Game` value that issued the request
    pub instance: u64,
    /// Bumped on every server update
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    /// Submit a move: placement tokens, `pass`, `chall`, `exch=..` or `rsgn`
    SubmitMove {
        ticket: Ticket,
        uuid: String,
        moves: Vec<String>,
        /// Length of the move history the move was made against
        mcount: usize,
    },
    /// Resign on behalf of an opponent who has run out of overtime
    ForceResign {
        ticket: Ticket,
        uuid: String,
        mcount: usize,
    },
    /// Check the words formed by the pending move
    CheckWords {
        ticket: Ticket,
        locale: String,
        word: String,
        words: Vec<String>,
    },
    LoadMessages { ticket: Ticket, channel: String },
    /// Best moves available at a 1-based point in the history
    BestMoves {
        ticket: Ticket,
        uuid: String,
        move_index: usize,
    },
    /// Fetch a fresh snapshot after `delay`
    Refresh {
        ticket: Ticket,
        uuid: String,
        delay: Duration,
    },
}

impl Request {
    pub fn ticket(&self) -> Ticket {
        match self {
            Request::SubmitMove { ticket, .. }
            | Request::ForceResign { ticket, .. }
            | Request::CheckWords { ticket, .. }
            | Request::LoadMessages { ticket, .. }
            | Request::BestMoves { ticket, .. }
            | Request::Refresh { ticket, .. } => *ticket,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Response {
    /// Reply to `SubmitMove` or `ForceResign`
    MoveResult(Result<Snapshot, TransportError>),
    Refreshed(Result<Snapshot, TransportError>),
    WordCheck(Result<WordCheck, TransportError>),
    Messages(Result<Vec<ChatMessage>, TransportError>),
    BestMoves(Result<Vec<Move>, TransportError>),
}

/// Verdict on the word formed by a pending move
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WordCheck {
    pub word: String,
    pub ok: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned status {0}")]
    Status(u16),
    #[error("malformed reply: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for TransportError {
    fn from(e: serde_json::Error) -> Self {
        TransportError::Malformed(e.to_string())
    }
}
