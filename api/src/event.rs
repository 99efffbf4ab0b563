use crate::{Bid, BotStrategy, Card, Cards, GameOptions, Profile, Seat, Seed, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Everything that happens in a game. Action events (`Create` through
/// `Play`) are persisted and replayed; the rest are derived while applying
/// them and exist only on the wire.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    Ping,
    EndReplay {
        subscribers: HashSet<UserId>,
    },
    JoinGame {
        user_id: UserId,
    },
    LeaveGame {
        user_id: UserId,
    },
    Create {
        options: GameOptions,
        seed: Seed,
    },
    SeatHuman {
        seat: Seat,
        profile: Profile,
    },
    SeatBot {
        seat: Seat,
        profile: Profile,
        strategy: BotStrategy,
    },
    RemoveBot {
        seat: Seat,
    },
    VacateSeat {
        seat: Seat,
    },
    Deal {
        dealer: Seat,
        north: Cards,
        east: Cards,
        south: Cards,
        west: Cards,
    },
    StartBidding {
        first_bidder: Seat,
    },
    Bid {
        seat: Seat,
        bid: Bid,
    },
    BidStatus {
        next_bidder: Seat,
    },
    StartTrick {
        leader: Seat,
    },
    Play {
        seat: Seat,
        card: Card,
    },
    PlayStatus {
        next_player: Seat,
        legal_plays: Cards,
    },
    EndTrick {
        winner: Seat,
    },
    HandComplete {
        scores: [i32; 4],
        bags: [u32; 4],
    },
    GameComplete {
        winning_unit: usize,
        seed: Seed,
    },
}

impl GameEvent {
    pub fn is_ping(&self) -> bool {
        matches!(self, GameEvent::Ping)
    }

    /// Stable events get event ids and survive reconnects; the rest are
    /// connection chatter.
    pub fn is_stable(&self) -> bool {
        use GameEvent::*;
        !matches!(self, Ping | EndReplay { .. } | JoinGame { .. } | LeaveGame { .. })
    }

    /// What `seat` is allowed to see of this event. Spectators (`None`) see
    /// everything except the live seed.
    pub fn redact(&self, seat: Option<Seat>) -> GameEvent {
        match self {
            GameEvent::Create { options, seed } => GameEvent::Create {
                options: *options,
                seed: seed.redact(),
            },
            GameEvent::Deal {
                dealer,
                north,
                east,
                south,
                west,
            } => match seat {
                Some(s) => {
                    let mut hands = [Cards::NONE; 4];
                    hands[s.idx()] = match s {
                        Seat::North => *north,
                        Seat::East => *east,
                        Seat::South => *south,
                        Seat::West => *west,
                    };
                    GameEvent::Deal {
                        dealer: *dealer,
                        north: hands[0],
                        east: hands[1],
                        south: hands[2],
                        west: hands[3],
                    }
                }
                None => self.clone(),
            },
            GameEvent::PlayStatus {
                next_player,
                legal_plays: _,
            } => match seat {
                Some(s) if s != *next_player => GameEvent::PlayStatus {
                    next_player: *next_player,
                    legal_plays: Cards::NONE,
                },
                _ => self.clone(),
            },
            _ => self.clone(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_deal_redacts_other_hands() {
        let deal = GameEvent::Deal {
            dealer: Seat::North,
            north: Cards::CLUBS,
            east: Cards::DIAMONDS,
            south: Cards::HEARTS,
            west: Cards::SPADES,
        };
        assert_eq!(
            deal.redact(Some(Seat::East)),
            GameEvent::Deal {
                dealer: Seat::North,
                north: Cards::NONE,
                east: Cards::DIAMONDS,
                south: Cards::NONE,
                west: Cards::NONE,
            }
        );
        assert_eq!(deal.redact(None), deal);
    }

    #[test]
    fn test_play_status_redacts_legal_plays() {
        let status = GameEvent::PlayStatus {
            next_player: Seat::South,
            legal_plays: Cards::HEARTS,
        };
        assert_eq!(status.redact(Some(Seat::South)), status);
        assert_eq!(
            status.redact(Some(Seat::West)),
            GameEvent::PlayStatus {
                next_player: Seat::South,
                legal_plays: Cards::NONE,
            }
        );
    }

    #[test]
    fn test_create_redacts_random_seed() {
        let create = GameEvent::Create {
            options: GameOptions::default(),
            seed: Seed::random(),
        };
        match create.redact(Some(Seat::North)) {
            GameEvent::Create { seed, .. } => assert_eq!(seed, Seed::Redacted),
            _ => panic!("redaction changed the event type"),
        }
    }

    #[test]
    fn test_round_trips_through_json() {
        let event = GameEvent::Bid {
            seat: Seat::West,
            bid: Bid::Tricks { count: 4 },
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"type":"bid","seat":"west","bid":{"type":"tricks","count":4}}"#);
        assert_eq!(serde_json::from_str::<GameEvent>(&json).unwrap(), event);
    }
}
