use crate::{Bid, Card, Cards, CompletedTrick, Seat, Trick};

/// One hand's trick play, from the first lead through the thirteenth trick.
#[derive(Clone, Debug)]
pub struct PlayState {
    /// The bids the hand was played under, carried over from the bidding
    /// round for scoring.
    pub bids: [Bid; 4],
    pub current_player: Seat,
    pub trick_leader: Seat,
    pub current_trick: Trick,
    pub completed: Vec<CompletedTrick>,
    /// Cards from completed tricks only; the current trick does not break
    /// spades until it resolves.
    pub played: Cards,
}

impl PlayState {
    pub fn new(dealer: Seat, bids: [Bid; 4]) -> Self {
        Self {
            bids,
            current_player: dealer.left(),
            trick_leader: dealer.left(),
            current_trick: Trick::new(),
            completed: Vec::with_capacity(13),
            played: Cards::NONE,
        }
    }

    pub fn trick_number(&self) -> usize {
        self.completed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.completed.len() == 13
    }

    pub fn spades_broken(&self) -> bool {
        self.played.contains_any(Cards::SPADES)
    }

    /// The cards `hand` may legally play right now. Leading excludes spades
    /// until they are broken, unless the hand is nothing but spades;
    /// following requires the led suit when the hand holds it.
    pub fn legal_plays(&self, hand: Cards) -> Cards {
        if self.current_trick.is_empty() {
            if !self.spades_broken() && !Cards::SPADES.contains_all(hand) {
                hand - Cards::SPADES
            } else {
                hand
            }
        } else {
            let follows = hand.in_suit(self.current_trick.suit());
            if follows.is_empty() {
                hand
            } else {
                follows
            }
        }
    }

    /// Applies an already validated play. Returns the resolved trick when
    /// this play was the fourth; the winner leads the next trick.
    pub fn play(&mut self, card: Card) -> Option<CompletedTrick> {
        self.current_trick = self.current_trick.push(card);
        if self.current_trick.is_complete() {
            let completed = CompletedTrick {
                leader: self.trick_leader,
                trick: self.current_trick,
                winner: self.current_trick.winning_seat(self.trick_leader),
            };
            self.completed.push(completed);
            self.played |= completed.cards();
            self.current_trick = Trick::new();
            self.trick_leader = completed.winner;
            self.current_player = completed.winner;
            Some(completed)
        } else {
            self.current_player = self.current_player.left();
            None
        }
    }

    pub fn tricks_won(&self) -> [u8; 4] {
        let mut won = [0; 4];
        for trick in &self.completed {
            won[trick.winner.idx()] += 1;
        }
        won
    }
}
