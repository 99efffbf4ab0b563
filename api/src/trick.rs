use crate::{Card, Cards, Seat, Suit};
use std::{fmt, fmt::Formatter};

const EMPTY: u32 = 0x80_80_80_80;

/// The cards played to the current trick, packed one byte per play with
/// 0x80 sentinels in the unused slots.
#[derive(Clone, Copy)]
pub struct Trick {
    state: u32,
}

impl Trick {
    pub fn new() -> Self {
        Self { state: EMPTY }
    }

    pub fn is_empty(self) -> bool {
        self.state == EMPTY
    }

    pub fn len(self) -> usize {
        (4 - (self.state ^ EMPTY).leading_zeros() / 8) as usize
    }

    pub fn is_complete(self) -> bool {
        self.state & EMPTY == 0
    }

    /// The suit led, undefined on an empty trick.
    pub fn suit(self) -> Suit {
        let shift = 28 - (self.state ^ EMPTY).leading_zeros();
        Suit::from(((self.state >> shift) & 3) as u8)
    }

    pub fn cards(self) -> Cards {
        let mut cards = Cards::NONE;
        for card in self {
            cards |= card;
        }
        cards
    }

    #[must_use]
    pub fn push(self, card: Card) -> Trick {
        Self {
            state: (self.state << 8) | (card as u8 as u32),
        }
    }

    /// Index in play order of the card currently winning: the highest spade
    /// if any spade was played, otherwise the highest card of the suit led.
    pub fn winning_index(self) -> usize {
        let led = self.suit();
        let mut best_key = 0;
        let mut best = 0;
        for (index, card) in self.into_iter().enumerate() {
            let key = if card.suit() == Suit::Spades {
                15 + card.rank().idx() as u8
            } else if card.suit() == led {
                1 + card.rank().idx() as u8
            } else {
                0
            };
            if key > best_key {
                best_key = key;
                best = index;
            }
        }
        best
    }

    /// The seat currently winning, given the seat that led the trick.
    pub fn winning_seat(self, leader: Seat) -> Seat {
        let mut seat = leader;
        for _ in 0..self.winning_index() {
            seat = seat.left();
        }
        seat
    }
}

impl fmt::Debug for Trick {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        let mut list = f.debug_list();
        for card in *self {
            list.entry(&card);
        }
        list.finish()
    }
}

impl IntoIterator for Trick {
    type Item = Card;
    type IntoIter = TrickIter;

    /// Iterates in play order, oldest card first.
    fn into_iter(self) -> Self::IntoIter {
        TrickIter {
            state: self.state,
            len: self.len(),
        }
    }
}

pub struct TrickIter {
    state: u32,
    len: usize,
}

impl Iterator for TrickIter {
    type Item = Card;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        Some(Card::from((self.state >> (8 * self.len)) as u8))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl ExactSizeIterator for TrickIter {}

/// An append-only record of a resolved trick.
#[derive(Clone, Copy, Debug)]
pub struct CompletedTrick {
    pub leader: Seat,
    pub trick: Trick,
    pub winner: Seat,
}

impl CompletedTrick {
    pub fn cards(&self) -> Cards {
        self.trick.cards()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_is_empty() {
        let trick = Trick::new();
        assert!(trick.is_empty());
        assert!(!trick.push(Card::FiveClubs).is_empty());
    }

    #[test]
    fn test_suit() {
        let mut trick = Trick::new().push(Card::FiveClubs);
        assert_eq!(trick.suit(), Suit::Clubs);
        trick = trick.push(Card::ThreeHearts);
        assert_eq!(trick.suit(), Suit::Clubs);
    }

    #[test]
    fn test_is_complete() {
        let mut trick = Trick::new();
        assert!(!trick.is_complete());
        trick = trick.push(Card::FiveClubs);
        assert!(!trick.is_complete());
        trick = trick.push(Card::NineDiamonds);
        assert!(!trick.is_complete());
        trick = trick.push(Card::TenClubs);
        assert!(!trick.is_complete());
        trick = trick.push(Card::FourClubs);
        assert!(trick.is_complete());
    }

    #[test]
    fn test_iterates_in_play_order() {
        let trick = Trick::new()
            .push(Card::FiveClubs)
            .push(Card::NineDiamonds)
            .push(Card::TenClubs);
        let cards = trick.into_iter().collect::<Vec<_>>();
        assert_eq!(
            cards,
            vec![Card::FiveClubs, Card::NineDiamonds, Card::TenClubs]
        );
    }

    #[test]
    fn test_spade_beats_led_suit() {
        let trick = Trick::new()
            .push(Card::FourClubs)
            .push(Card::NineClubs)
            .push(Card::KingSpades)
            .push(Card::TwoClubs);
        assert_eq!(trick.winning_index(), 2);
        assert_eq!(trick.winning_seat(Seat::North), Seat::South);
    }

    #[test]
    fn test_highest_of_led_suit_wins() {
        let trick = Trick::new()
            .push(Card::TenDiamonds)
            .push(Card::ThreeDiamonds)
            .push(Card::JackDiamonds)
            .push(Card::TwoDiamonds);
        assert_eq!(trick.winning_index(), 2);
        assert_eq!(trick.winning_seat(Seat::East), Seat::North);
    }

    #[test]
    fn test_discard_never_wins() {
        let trick = Trick::new()
            .push(Card::TwoHearts)
            .push(Card::AceDiamonds)
            .push(Card::KingClubs)
            .push(Card::ThreeHearts);
        assert_eq!(trick.winning_index(), 3);
        assert_eq!(trick.winning_seat(Seat::West), Seat::South);
    }

    #[test]
    fn test_higher_spade_wins() {
        let trick = Trick::new()
            .push(Card::FourSpades)
            .push(Card::TwoSpades)
            .push(Card::AceSpades)
            .push(Card::QueenHearts);
        assert_eq!(trick.winning_index(), 2);
    }

    #[test]
    fn test_cards() {
        let trick = Trick::new()
            .push(Card::FiveClubs)
            .push(Card::NineDiamonds)
            .push(Card::NineClubs);
        assert_eq!(trick.cards(), "9D 95C".parse().unwrap());
    }
}
