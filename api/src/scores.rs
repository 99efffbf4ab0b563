use crate::{Bid, GameMode, GameOptions, Seat};
use serde::{Deserialize, Serialize};

/// One hand's score and bag deltas, indexed by scoring unit. Only the first
/// `mode.units()` slots are meaningful.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct HandScore {
    pub scores: [i32; 4],
    pub bags: [u32; 4],
}

/// Scores a completed hand. Pure function of the bids, the per-seat trick
/// counts, and the mode.
///
/// A unit whose every bid is nil has no trick contract; its bags come only
/// from failed nils.
pub fn score_hand(bids: [Bid; 4], tricks: [u8; 4], mode: GameMode) -> HandScore {
    let mut scores = [0; 4];
    let mut bags = [0; 4];
    for unit in 0..mode.units() {
        let mut bid_total = 0u32;
        let mut trick_total = 0u32;
        for &seat in &Seat::VALUES {
            if mode.unit(seat) == unit {
                bid_total += bids[seat.idx()].count() as u32;
                trick_total += tricks[seat.idx()] as u32;
            }
        }
        if bid_total > 0 {
            if trick_total >= bid_total {
                let overtricks = trick_total - bid_total;
                scores[unit] += (bid_total * 10 + overtricks) as i32;
                bags[unit] += overtricks;
            } else {
                scores[unit] -= (bid_total * 10) as i32;
            }
        }
    }
    for &seat in &Seat::VALUES {
        let unit = mode.unit(seat);
        let reward = match bids[seat.idx()] {
            Bid::Nil => 100,
            Bid::BlindNil => 200,
            Bid::Tricks { .. } => continue,
        };
        if tricks[seat.idx()] == 0 {
            scores[unit] += reward;
        } else {
            scores[unit] -= reward;
            bags[unit] += tricks[seat.idx()] as u32;
        }
    }
    HandScore { scores, bags }
}

/// Cumulative totals across hands, indexed by scoring unit.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scoreboard {
    pub mode: GameMode,
    pub scores: [i32; 4],
    pub bags: [u32; 4],
}

impl Scoreboard {
    pub fn new(mode: GameMode) -> Self {
        Self {
            mode,
            scores: [0; 4],
            bags: [0; 4],
        }
    }

    /// Folds a hand's deltas into the totals, applying the bag penalty every
    /// time a unit's cumulative bags reach ten.
    pub fn apply(&mut self, hand: &HandScore) {
        for unit in 0..self.mode.units() {
            self.scores[unit] += hand.scores[unit];
            self.bags[unit] += hand.bags[unit];
            while self.bags[unit] >= 10 {
                self.scores[unit] -= 100;
                self.bags[unit] -= 10;
            }
        }
    }

    /// Whether any unit has crossed a completion threshold.
    pub fn is_complete(&self, options: &GameOptions) -> bool {
        self.scores[..self.mode.units()]
            .iter()
            .any(|&score| score >= options.win_threshold || score <= options.loss_threshold)
    }

    /// The unit with the highest total, lowest index on a tie.
    pub fn winning_unit(&self) -> usize {
        let mut best = 0;
        for unit in 1..self.mode.units() {
            if self.scores[unit] > self.scores[best] {
                best = unit;
            }
        }
        best
    }

    pub fn score(&self, seat: Seat) -> i32 {
        self.scores[self.mode.unit(seat)]
    }
}
