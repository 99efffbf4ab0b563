use rusqlite::ErrorCode;
use spades_api::{GameError, GameId, UserId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{0} is already seated in game {1}")]
    AlreadySeated(UserId, GameId),
    #[error("game {0} has already started")]
    GameHasStarted(GameId),
    #[error("{0} does not have enough coins for the buy in")]
    InsufficientFunds(UserId),
    #[error("{0} is not a member of game {1}")]
    InvalidPlayer(UserId, GameId),
    #[error("games need 4 seated players to start")]
    NotEnoughPlayers,
    #[error("unexpected rules error")]
    Rules {
        #[from]
        source: GameError,
    },
    #[error("unexpected serde error")]
    Serde {
        #[from]
        source: serde_json::Error,
    },
    #[error("unexpected sqlite error")]
    Sqlite {
        #[from]
        source: rusqlite::Error,
    },
    #[error("{0} is not a known game id")]
    UnknownGame(GameId),
}

impl ServerError {
    pub fn is_retriable(&self) -> bool {
        matches!(self, ServerError::Sqlite {
                source: rusqlite::Error::SqliteFailure(e, _),
                ..
            } if e.code == ErrorCode::DatabaseBusy || e.code == ErrorCode::DatabaseLocked)
    }
}
