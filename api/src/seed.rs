use crate::{Cards, GameEvent, Seat};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// The entropy for every deal in a game. Random seeds are redacted from
/// broadcasts until the game completes so clients cannot precompute deals.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Seed {
    Chosen { value: String },
    Random { value: String },
    Redacted,
}

impl Seed {
    pub fn random() -> Self {
        Seed::Random {
            value: Uuid::new_v4().to_string(),
        }
    }

    pub fn redact(&self) -> Self {
        match self {
            Seed::Random { .. } => Seed::Redacted,
            _ => self.clone(),
        }
    }

    pub fn as_bytes(&self) -> [u8; 32] {
        Sha256::digest(match self {
            Seed::Chosen { value } => value.as_bytes(),
            Seed::Random { value } => value.as_bytes(),
            Seed::Redacted => panic!("cannot convert redacted seed to bytes"),
        })
        .into()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct HashedSeed {
    bytes: [u8; 32],
}

impl HashedSeed {
    pub fn new() -> Self {
        Self { bytes: [0; 32] }
    }

    /// Deals the `hand_index`th hand of the game: a seeded uniform shuffle
    /// distributed round-robin starting left of the dealer.
    pub fn deal(&self, dealer: Seat, hand_index: u32) -> GameEvent {
        let mut hasher = Sha256::new();
        hasher.update(&self.bytes);
        hasher.update(&hand_index.to_le_bytes());
        let mut rng = ChaCha20Rng::from_seed(hasher.finalize().into());
        let mut deck = Cards::ALL.into_iter().collect::<Vec<_>>();
        deck.shuffle(&mut rng);
        let mut hands = [Cards::NONE; 4];
        let mut seat = dealer.left();
        for card in deck {
            hands[seat.idx()] |= card;
            seat = seat.left();
        }
        GameEvent::Deal {
            dealer,
            north: hands[0],
            east: hands[1],
            south: hands[2],
            west: hands[3],
        }
    }
}

impl From<&Seed> for HashedSeed {
    fn from(seed: &Seed) -> Self {
        Self {
            bytes: seed.as_bytes(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn hands(event: GameEvent) -> [Cards; 4] {
        match event {
            GameEvent::Deal {
                north,
                east,
                south,
                west,
                ..
            } => [north, east, south, west],
            _ => panic!("not a deal"),
        }
    }

    #[test]
    fn test_deal_partitions_the_deck() {
        let seed = HashedSeed::from(&Seed::random());
        let hands = hands(seed.deal(Seat::North, 0));
        assert_eq!(hands[0] | hands[1] | hands[2] | hands[3], Cards::ALL);
        for hand in &hands {
            assert_eq!(hand.len(), 13);
        }
    }

    #[test]
    fn test_deal_is_deterministic() {
        let seed = Seed::Chosen {
            value: "fixture".to_string(),
        };
        let first = hands(HashedSeed::from(&seed).deal(Seat::East, 3));
        let second = hands(HashedSeed::from(&seed).deal(Seat::East, 3));
        assert_eq!(first, second);
    }

    #[test]
    fn test_hands_vary_by_index() {
        let seed = HashedSeed::from(&Seed::random());
        assert_ne!(
            hands(seed.deal(Seat::North, 0)),
            hands(seed.deal(Seat::North, 1))
        );
    }

    #[test]
    fn test_redaction() {
        assert_eq!(Seed::random().redact(), Seed::Redacted);
        let chosen = Seed::Chosen {
            value: "open".to_string(),
        };
        assert_eq!(chosen.redact(), chosen);
    }
}
