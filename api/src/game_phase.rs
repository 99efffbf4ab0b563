use serde::{Deserialize, Serialize};

#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Roster forming, or the instant between one hand's scoring and the
    /// next deal.
    Waiting,
    Bidding,
    Playing,
    Complete,
}

impl GamePhase {
    pub fn is_waiting(&self) -> bool {
        *self == GamePhase::Waiting
    }

    pub fn is_bidding(&self) -> bool {
        *self == GamePhase::Bidding
    }

    pub fn is_playing(&self) -> bool {
        *self == GamePhase::Playing
    }

    pub fn is_complete(&self) -> bool {
        *self == GamePhase::Complete
    }
}
