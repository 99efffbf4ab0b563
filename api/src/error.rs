use crate::{Bid, Card, GamePhase, Seat, UserId};
use thiserror::Error;

/// Every engine operation validates fully before mutating, so any of these
/// leaves the game exactly as it was.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("{0} has already bid this hand")]
    AlreadyBid(Seat),
    #[error("your hand does not contain {0}")]
    CardNotInHand(Card),
    #[error("{0} is not a legal play")]
    IllegalCard(Card),
    #[error("{0} is not a valid bid")]
    InvalidBid(Bid),
    #[error("cannot {0}, game is {1:?}")]
    InvalidGameState(&'static str, GamePhase),
    #[error("no occupied seat to deal to")]
    NoPlayers,
    #[error("{0} is not occupied by a bot")]
    NotABot(Seat),
    #[error("{0} acts next")]
    NotYourTurn(Seat),
    #[error("{0} may not change the occupant of {1}")]
    PermissionDenied(UserId, Seat),
    #[error("{0} is already occupied")]
    SeatOccupied(Seat),
    #[error("{0} is not a seat position")]
    SeatOutOfRange(usize),
}
