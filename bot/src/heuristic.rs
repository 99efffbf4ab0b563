use crate::Algorithm;
use spades_api::{Bid, BotState, Card, Cards, GameEvent, GameState, Rank, Suit, Trick};

pub struct HeuristicBot;

impl HeuristicBot {
    pub fn new() -> Self {
        Self
    }

    /// Rough trick count: high spades, long spades, side-suit aces, and
    /// guarded kings.
    fn estimate(hand: Cards) -> u8 {
        let mut winners = 0u8;
        for card in hand {
            if card.suit() == Suit::Spades {
                if card.rank() >= Rank::Jack {
                    winners += 1;
                }
            } else if card.rank() == Rank::Ace {
                winners += 1;
            } else if card.rank() == Rank::King && hand.in_suit(card.suit()).len() >= 2 {
                winners += 1;
            }
        }
        winners + hand.in_suit(Suit::Spades).len().saturating_sub(4) as u8
    }

    fn currently_winning(trick: Trick) -> Card {
        let led = trick.suit();
        let mut iter = trick.into_iter();
        let mut best = iter.next().unwrap();
        for card in iter {
            if card.beats(best, led) {
                best = card;
            }
        }
        best
    }

    fn lead(legal: Cards) -> Card {
        for &suit in &Suit::VALUES {
            if suit == Suit::Spades {
                continue;
            }
            let cards = legal.in_suit(suit);
            if !cards.is_empty() && cards.max().rank() == Rank::Ace {
                return cards.max();
            }
        }
        legal.min()
    }
}

impl Algorithm for HeuristicBot {
    fn bid(&mut self, state: &BotState, _: &GameState) -> Bid {
        match Self::estimate(state.hand) {
            0 => Bid::Nil,
            winners => Bid::Tricks {
                count: winners.min(13),
            },
        }
    }

    fn play(&mut self, state: &BotState, game: &GameState) -> Card {
        let legal = game.legal_plays(state.hand);
        let play = match &game.play {
            Some(play) => play,
            None => return legal.max(),
        };
        let nil = play.bids[state.seat.idx()].is_nil();
        if play.current_trick.is_empty() {
            return if nil { legal.min() } else { Self::lead(legal) };
        }
        let led = play.current_trick.suit();
        let best = Self::currently_winning(play.current_trick);
        let beaters = legal
            .into_iter()
            .filter(|card| card.beats(best, led))
            .collect::<Cards>();
        if nil {
            let ducks = legal - beaters;
            return if ducks.is_empty() {
                beaters.min()
            } else {
                ducks.max()
            };
        }
        if beaters.is_empty() {
            legal.min()
        } else {
            beaters.min()
        }
    }

    fn on_event(&mut self, _: &BotState, _: &GameState, _: &GameEvent) {}
}

#[cfg(test)]
mod test {
    use super::*;
    use spades_api::{GamePhase, PlayState, Seat};

    macro_rules! c {
        ($($cards:tt)*) => {
            stringify!($($cards)*).parse::<Cards>().unwrap()
        };
    }

    fn playing(bids: [Bid; 4], plays: &[Card]) -> GameState {
        let mut state = GameState::new();
        let mut play = PlayState::new(Seat::North, bids);
        for &card in plays {
            play.play(card);
        }
        state.play = Some(play);
        state.phase = GamePhase::Playing;
        state
    }

    #[test]
    fn test_estimate_counts_high_cards() {
        assert_eq!(HeuristicBot::estimate(c!(AKQS A32H 5432D 432C)), 4);
        assert_eq!(HeuristicBot::estimate(c!(65432S 432H 432D 32C)), 1);
        assert_eq!(HeuristicBot::estimate(c!(432H 5432D 765432C)), 0);
    }

    #[test]
    fn test_bids_nil_with_nothing() {
        let mut bot = HeuristicBot::new();
        let mut state = BotState::new(Seat::East);
        state.hand = c!(432H 5432D 65432C);
        assert_eq!(bot.bid(&state, &GameState::new()), Bid::Nil);
    }

    #[test]
    fn test_wins_cheaply() {
        let mut bot = HeuristicBot::new();
        let mut state = BotState::new(Seat::South);
        state.hand = c!(AQ2H 32C);
        let game = playing([Bid::Tricks { count: 3 }; 4], &[Card::TenHearts]);
        // The queen beats the ten; don't waste the ace.
        assert_eq!(bot.play(&state, &game), Card::QueenHearts);
    }

    #[test]
    fn test_nil_ducks_under_winner() {
        let mut bot = HeuristicBot::new();
        let mut state = BotState::new(Seat::South);
        state.hand = c!(J82H 32C);
        let game = playing(
            [
                Bid::Tricks { count: 4 },
                Bid::Tricks { count: 3 },
                Bid::Nil,
                Bid::Tricks { count: 3 },
            ],
            &[Card::TenHearts],
        );
        assert_eq!(bot.play(&state, &game), Card::EightHearts);
    }
}
