use crate::Seat;
use serde::{Deserialize, Serialize};
use std::{fmt, fmt::Display};

/// A seat's declared trick target for the hand. Nil and blind nil both
/// commit to zero tricks but score at different magnitudes.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Bid {
    Tricks { count: u8 },
    Nil,
    BlindNil,
}

impl Bid {
    /// Tricks this bid contributes to its unit's contract.
    pub fn count(self) -> u8 {
        match self {
            Bid::Tricks { count } => count,
            Bid::Nil | Bid::BlindNil => 0,
        }
    }

    pub fn is_nil(self) -> bool {
        matches!(self, Bid::Nil | Bid::BlindNil)
    }

    pub fn is_valid(self) -> bool {
        match self {
            Bid::Tricks { count } => count >= 1 && count <= 13,
            Bid::Nil | Bid::BlindNil => true,
        }
    }
}

impl Display for Bid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bid::Tricks { count } => write!(f, "{}", count),
            Bid::Nil => write!(f, "nil"),
            Bid::BlindNil => write!(f, "blind nil"),
        }
    }
}

/// One hand's bidding round. Rotation starts left of the dealer and visits
/// every seat exactly once.
#[derive(Clone, Debug)]
pub struct BiddingState {
    pub dealer: Seat,
    pub bids: [Option<Bid>; 4],
    pub current_bidder: Seat,
}

impl BiddingState {
    pub fn new(dealer: Seat) -> Self {
        Self {
            dealer,
            bids: [None; 4],
            current_bidder: dealer.left(),
        }
    }

    pub fn has_bid(&self, seat: Seat) -> bool {
        self.bids[seat.idx()].is_some()
    }

    pub fn is_complete(&self) -> bool {
        Seat::all(|seat| self.has_bid(seat))
    }

    /// Records an already validated bid and advances the rotation to the
    /// next seat still owing one.
    pub fn bid(&mut self, seat: Seat, bid: Bid) {
        self.bids[seat.idx()] = Some(bid);
        let mut next = seat.left();
        for _ in 0..3 {
            if !self.has_bid(next) {
                self.current_bidder = next;
                return;
            }
            next = next.left();
        }
    }

    /// The final bids, available once the round is complete.
    pub fn resolved(&self) -> [Bid; 4] {
        [
            self.bids[0].unwrap(),
            self.bids[1].unwrap(),
            self.bids[2].unwrap(),
            self.bids[3].unwrap(),
        ]
    }
}
