use crate::Seat;
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    fmt::{Debug, Display, Formatter},
    str::FromStr,
};
use uuid::Uuid;

/// PARTNERS scores seats 0+2 and 1+3 as two teams; SOLO scores every seat
/// independently.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    Partners,
    Solo,
}

impl GameMode {
    /// Number of independently scored units.
    pub fn units(self) -> usize {
        match self {
            GameMode::Partners => 2,
            GameMode::Solo => 4,
        }
    }

    /// The scoring unit a seat belongs to.
    pub fn unit(self, seat: Seat) -> usize {
        match self {
            GameMode::Partners => seat.idx() % 2,
            GameMode::Solo => seat.idx(),
        }
    }
}

impl Display for GameMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        Debug::fmt(&self, f)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct GameOptions {
    pub mode: GameMode,
    /// Coins debited from every human seat when the game starts.
    pub buy_in: i64,
    /// The game ends the moment a unit's total reaches this score.
    pub win_threshold: i32,
    /// The game ends the moment a unit's total falls to or below this score.
    pub loss_threshold: i32,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            mode: GameMode::Partners,
            buy_in: 100,
            win_threshold: 500,
            loss_threshold: -200,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct GameId(Uuid);

impl GameId {
    pub fn new() -> GameId {
        GameId(Uuid::new_v4())
    }
}

impl Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        Display::fmt(&self.0, f)
    }
}

impl FromStr for GameId {
    type Err = <Uuid as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(GameId(s.parse()?))
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    pub fn null() -> UserId {
        UserId(Uuid::nil())
    }

    pub fn new() -> UserId {
        UserId(Uuid::new_v4())
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        Display::fmt(&self.0, f)
    }
}

impl FromStr for UserId {
    type Err = <Uuid as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(UserId(s.parse()?))
    }
}
