use crate::{Cards, Seat};
use serde::{Deserialize, Serialize};

#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BotStrategy {
    Heuristic,
    Random,
}

/// Everything a bot is allowed to see about itself.
pub struct BotState {
    pub seat: Seat,
    pub hand: Cards,
}

impl BotState {
    pub fn new(seat: Seat) -> Self {
        Self {
            seat,
            hand: Cards::NONE,
        }
    }
}
