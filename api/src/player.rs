use crate::{BotStrategy, UserId};
use serde::{Deserialize, Serialize};

/// Identity shown at the table for a human or bot occupant.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: UserId,
    pub name: String,
    pub avatar: Option<String>,
}

impl Profile {
    pub fn new(user_id: UserId, name: impl Into<String>) -> Self {
        Self {
            user_id,
            name: name.into(),
            avatar: None,
        }
    }
}

/// What a seat holds. Modeled as a sum type so every phase of the engine has
/// to handle all three cases.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Occupant {
    Empty,
    Human {
        profile: Profile,
    },
    Bot {
        profile: Profile,
        strategy: BotStrategy,
    },
}

impl Occupant {
    pub fn is_empty(&self) -> bool {
        matches!(self, Occupant::Empty)
    }

    pub fn is_human(&self) -> bool {
        matches!(self, Occupant::Human { .. })
    }

    pub fn is_bot(&self) -> bool {
        matches!(self, Occupant::Bot { .. })
    }

    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Occupant::Empty => None,
            Occupant::Human { profile } | Occupant::Bot { profile, .. } => Some(profile.user_id),
        }
    }

    pub fn strategy(&self) -> Option<BotStrategy> {
        match self {
            Occupant::Bot { strategy, .. } => Some(*strategy),
            _ => None,
        }
    }
}
