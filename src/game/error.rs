//! Error kinds reported by the server and invariant errors in the model

use crate::board::Square;
use thiserror::Error;

/// Result code of a snapshot that ends the game. It is not an error.
pub const GAME_OVER_CODE: i32 = 99;

/// User-visible error kinds, keyed by the server's result code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NullMove,
    FirstMoveNotInCenter,
    Disjoint,
    NotAdjacent,
    SquareAlreadyOccupied,
    HasGap,
    WordNotInDictionary,
    CrossWordNotInDictionary,
    TooManyTilesPlaced,
    TileNotInRack,
    ExchangeNotAllowed,
    TooManyTilesExchanged,
    OutOfSync,
    LoginRequired,
    WrongUser,
    GameNotFound,
    GameNotOverdue,
    ServerError,
    NotManualWordcheck,
    MoveNotChallengeable,
    OnlyPassOrChallenge,
    UserMustBeFriend,
    GameOver,
    /// The request never reached the server or its reply was unusable
    Server,
    Unknown(i32),
}

impl ErrorKind {
    pub fn from_code(code: i32) -> ErrorKind {
        match code {
            1 => ErrorKind::NullMove,
            2 => ErrorKind::FirstMoveNotInCenter,
            3 => ErrorKind::Disjoint,
            4 => ErrorKind::NotAdjacent,
            5 => ErrorKind::SquareAlreadyOccupied,
            6 => ErrorKind::HasGap,
            7 => ErrorKind::WordNotInDictionary,
            8 => ErrorKind::CrossWordNotInDictionary,
            9 => ErrorKind::TooManyTilesPlaced,
            10 => ErrorKind::TileNotInRack,
            11 => ErrorKind::ExchangeNotAllowed,
            12 => ErrorKind::TooManyTilesExchanged,
            13 => ErrorKind::OutOfSync,
            14 => ErrorKind::LoginRequired,
            15 => ErrorKind::WrongUser,
            16 => ErrorKind::GameNotFound,
            17 => ErrorKind::GameNotOverdue,
            18 => ErrorKind::ServerError,
            19 => ErrorKind::NotManualWordcheck,
            20 => ErrorKind::MoveNotChallengeable,
            21 => ErrorKind::OnlyPassOrChallenge,
            22 => ErrorKind::UserMustBeFriend,
            GAME_OVER_CODE => ErrorKind::GameOver,
            other => ErrorKind::Unknown(other),
        }
    }

    /// Returns a user-friendly error message
    pub fn message(&self) -> &'static str {
        match self {
            ErrorKind::NullMove => "No tiles have been placed",
            ErrorKind::FirstMoveNotInCenter => "The first word must cover the start square",
            ErrorKind::Disjoint => "The tiles must form a single line",
            ErrorKind::NotAdjacent => "The word must connect to tiles already on the board",
            ErrorKind::SquareAlreadyOccupied => "That square is already occupied",
            ErrorKind::HasGap => "The word has a gap in it",
            ErrorKind::WordNotInDictionary => "Word not found",
            ErrorKind::CrossWordNotInDictionary => "Cross word not found",
            ErrorKind::TooManyTilesPlaced => "Too many tiles placed",
            ErrorKind::TileNotInRack => "That tile is not in your rack",
            ErrorKind::ExchangeNotAllowed => "Not enough tiles left in the bag to exchange",
            ErrorKind::TooManyTilesExchanged => "Too many tiles exchanged",
            ErrorKind::OutOfSync => "The game has changed; please reload",
            ErrorKind::LoginRequired => "You must log in to play",
            ErrorKind::WrongUser => "It is not your turn",
            ErrorKind::GameNotFound => "Game not found",
            ErrorKind::GameNotOverdue => "The opponent still has time left",
            ErrorKind::ServerError => "The server could not process the move",
            ErrorKind::NotManualWordcheck => "Challenges are only allowed in manual games",
            ErrorKind::MoveNotChallengeable => "The last move cannot be challenged",
            ErrorKind::OnlyPassOrChallenge => "You can only pass or challenge now",
            ErrorKind::UserMustBeFriend => "This feature is only available to friends",
            ErrorKind::GameOver => "The game is over",
            ErrorKind::Server => "Could not reach the server; please try again",
            ErrorKind::Unknown(_) => "Unknown error",
        }
    }
}

/// Invariant violations: the client's view of the game has diverged from
/// what the caller assumed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("no tile at {0}")]
    EmptySquare(Square),
    #[error("square {0} is occupied")]
    SquareOccupied(Square),
    #[error("tile at {0} is fixed on the board")]
    TileFixed(Square),
    #[error("no room in rack")]
    RackFull,
    #[error("tile from last move not on the board at {0}")]
    LastMoveMissing(String),
    #[error("no blank tile is waiting for a letter")]
    NoPendingBlank,
}
