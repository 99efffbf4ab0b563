use crate::{GameError, Occupant, Seat, UserId};
use rand::seq::SliceRandom;

/// The four seats of one table and who occupies them.
#[derive(Clone, Debug)]
pub struct Roster {
    seats: [Occupant; 4],
}

impl Roster {
    pub fn new() -> Self {
        Self {
            seats: [
                Occupant::Empty,
                Occupant::Empty,
                Occupant::Empty,
                Occupant::Empty,
            ],
        }
    }

    pub fn get(&self, seat: Seat) -> &Occupant {
        &self.seats[seat.idx()]
    }

    pub fn place(&mut self, seat: Seat, occupant: Occupant) {
        self.seats[seat.idx()] = occupant;
    }

    pub fn clear(&mut self, seat: Seat) {
        self.seats[seat.idx()] = Occupant::Empty;
    }

    pub fn occupied(&self) -> impl Iterator<Item = Seat> + '_ {
        Seat::VALUES
            .iter()
            .copied()
            .filter(move |seat| !self.get(*seat).is_empty())
    }

    pub fn is_full(&self) -> bool {
        Seat::all(|seat| !self.get(seat).is_empty())
    }

    pub fn has_human(&self) -> bool {
        self.seats.iter().any(Occupant::is_human)
    }

    pub fn seat_of(&self, user_id: UserId) -> Option<Seat> {
        Seat::VALUES
            .iter()
            .copied()
            .find(|seat| self.get(*seat).user_id() == Some(user_id))
    }

    pub fn humans(&self) -> impl Iterator<Item = UserId> + '_ {
        self.seats.iter().filter_map(|occupant| match occupant {
            Occupant::Human { profile } => Some(profile.user_id),
            _ => None,
        })
    }

    /// Picks the dealer for the next hand. With no previous dealer the pick
    /// is uniform over occupied seats; otherwise the deal rotates clockwise,
    /// falling back to the lowest occupied seat when the rotation lands on
    /// an empty one.
    pub fn assign_dealer(&self, previous: Option<Seat>) -> Result<Seat, GameError> {
        let occupied = self.occupied().collect::<Vec<_>>();
        if occupied.is_empty() {
            return Err(GameError::NoPlayers);
        }
        Ok(match previous {
            None => *occupied.choose(&mut rand::thread_rng()).unwrap(),
            Some(previous) => {
                let next = previous.left();
                if occupied.contains(&next) {
                    next
                } else {
                    occupied[0]
                }
            }
        })
    }
}
