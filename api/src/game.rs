use crate::{
    Bid, Card, Cards, GameError, GameEvent, GamePhase, GameState, HashedSeed, Occupant, Roster,
    Seat, Seed, UserId,
};
use log::debug;

/// The root aggregate: the event log, the roster, the live hands, and the
/// derived rules state, plus the channels listening to it. Callers must
/// serialize mutating calls per game.
#[derive(Clone, Debug)]
pub struct Game<S> {
    pub events: Vec<GameEvent>,
    pub subscribers: Vec<(UserId, S)>,
    pub bots: Vec<(Seat, S)>,
    pub roster: Roster,
    pub hands: [Cards; 4],
    pub state: GameState,
    pub seed: HashedSeed,
}

impl<S> Game<S> {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            subscribers: Vec::new(),
            bots: Vec::new(),
            roster: Roster::new(),
            hands: [Cards::NONE; 4],
            state: GameState::new(),
            seed: HashedSeed::new(),
        }
    }

    pub fn seat(&self, user_id: UserId) -> Option<Seat> {
        self.roster.seat_of(user_id)
    }

    fn play_status_event(&self, next_player: Seat) -> GameEvent {
        GameEvent::PlayStatus {
            next_player,
            legal_plays: self.state.legal_plays(self.hands[next_player.idx()]),
        }
    }

    /// Folds an event into the aggregate. Every event, and every status
    /// event it derives, is handed to `broadcast` synchronously before this
    /// returns, which is what keeps bot seats from stalling.
    pub fn apply<F>(&mut self, event: &GameEvent, mut broadcast: F)
    where
        F: FnMut(&mut Game<S>, &GameEvent),
    {
        debug!("apply: phase={:?}, event={:?}", self.state.phase, event);
        broadcast(self, event);
        self.state.apply(event);
        self.events.push(event.clone());
        match event {
            GameEvent::Create { seed, .. } => {
                self.seed = HashedSeed::from(seed);
            }
            GameEvent::SeatHuman { seat, profile } => {
                self.roster.place(
                    *seat,
                    Occupant::Human {
                        profile: profile.clone(),
                    },
                );
            }
            GameEvent::SeatBot {
                seat,
                profile,
                strategy,
            } => {
                self.roster.place(
                    *seat,
                    Occupant::Bot {
                        profile: profile.clone(),
                        strategy: *strategy,
                    },
                );
            }
            GameEvent::RemoveBot { seat } | GameEvent::VacateSeat { seat } => {
                self.roster.clear(*seat);
            }
            GameEvent::Deal {
                dealer,
                north,
                east,
                south,
                west,
            } => {
                debug_assert_eq!(Cards::ALL, *north | *east | *south | *west);
                self.hands = [*north, *east, *south, *west];
                let first_bidder = dealer.left();
                broadcast(self, &GameEvent::StartBidding { first_bidder });
                broadcast(self, &GameEvent::BidStatus { next_bidder: first_bidder });
            }
            GameEvent::Bid { .. } => {
                if self.state.phase.is_bidding() {
                    if let Some(next_bidder) = self.state.next_actor() {
                        broadcast(self, &GameEvent::BidStatus { next_bidder });
                    }
                } else if let Some(leader) = self.state.next_actor() {
                    broadcast(self, &GameEvent::StartTrick { leader });
                    let status = self.play_status_event(leader);
                    broadcast(self, &status);
                }
            }
            GameEvent::Play { seat, card } => {
                self.hands[seat.idx()] -= *card;
                if self.state.phase.is_playing() {
                    let winner = self.state.play.as_ref().and_then(|play| {
                        if play.current_trick.is_empty() {
                            play.completed.last().map(|trick| trick.winner)
                        } else {
                            None
                        }
                    });
                    if let Some(winner) = winner {
                        broadcast(self, &GameEvent::EndTrick { winner });
                        broadcast(self, &GameEvent::StartTrick { leader: winner });
                    }
                    if let Some(next_player) = self.state.next_actor() {
                        let status = self.play_status_event(next_player);
                        broadcast(self, &status);
                    }
                } else {
                    self.finish_hand(broadcast);
                }
            }
            _ => {}
        }
    }

    fn finish_hand<F>(&mut self, mut broadcast: F)
    where
        F: FnMut(&mut Game<S>, &GameEvent),
    {
        let winner = self
            .state
            .history
            .last()
            .and_then(|play| play.completed.last())
            .map(|trick| trick.winner);
        if let Some(winner) = winner {
            broadcast(self, &GameEvent::EndTrick { winner });
        }
        if let Some(hand) = self.state.hand_scores.last().copied() {
            broadcast(
                self,
                &GameEvent::HandComplete {
                    scores: hand.scores,
                    bags: hand.bags,
                },
            );
        }
        if self.state.phase.is_complete() {
            let seed = match self.events.first() {
                Some(GameEvent::Create { seed, .. }) => seed.clone(),
                _ => Seed::Redacted,
            };
            let complete = GameEvent::GameComplete {
                winning_unit: self.state.scoreboard.winning_unit(),
                seed,
            };
            broadcast(self, &complete);
        }
    }

    /// The deal that starts the next hand, rotating the dealer.
    pub fn next_deal_event(&self) -> Result<GameEvent, GameError> {
        let dealer = self.roster.assign_dealer(self.state.dealer)?;
        Ok(self.seed.deal(dealer, self.state.history.len() as u32))
    }

    fn verify_roster_permission(&self, requester: UserId, seat: Seat) -> Result<(), GameError> {
        let gate = match self.state.phase {
            GamePhase::Waiting => Seat::North,
            GamePhase::Bidding | GamePhase::Playing => seat.across(),
            GamePhase::Complete => {
                return Err(GameError::InvalidGameState("manage bots", self.state.phase));
            }
        };
        if self.roster.get(gate).user_id() == Some(requester) {
            Ok(())
        } else {
            Err(GameError::PermissionDenied(requester, seat))
        }
    }

    pub fn verify_seat_human(&self, seat: Seat) -> Result<(), GameError> {
        if !self.state.phase.is_waiting() {
            return Err(GameError::InvalidGameState("join", self.state.phase));
        }
        if !self.roster.get(seat).is_empty() {
            return Err(GameError::SeatOccupied(seat));
        }
        Ok(())
    }

    pub fn verify_seat_bot(&self, requester: UserId, seat: Seat) -> Result<(), GameError> {
        self.verify_roster_permission(requester, seat)?;
        if !self.roster.get(seat).is_empty() {
            return Err(GameError::SeatOccupied(seat));
        }
        Ok(())
    }

    pub fn verify_remove_bot(&self, requester: UserId, seat: Seat) -> Result<(), GameError> {
        self.verify_roster_permission(requester, seat)?;
        if !self.roster.get(seat).is_bot() {
            return Err(GameError::NotABot(seat));
        }
        Ok(())
    }

    pub fn verify_bid(&self, seat: Seat, bid: Bid) -> Result<(), GameError> {
        if !self.state.phase.is_bidding() {
            return Err(GameError::InvalidGameState("bid", self.state.phase));
        }
        let bidding = match &self.state.bidding {
            Some(bidding) => bidding,
            None => return Err(GameError::InvalidGameState("bid", self.state.phase)),
        };
        if bidding.has_bid(seat) {
            return Err(GameError::AlreadyBid(seat));
        }
        if seat != bidding.current_bidder {
            return Err(GameError::NotYourTurn(bidding.current_bidder));
        }
        if !bid.is_valid() {
            return Err(GameError::InvalidBid(bid));
        }
        Ok(())
    }

    pub fn verify_play(&self, seat: Seat, card: Card) -> Result<(), GameError> {
        if !self.state.phase.is_playing() {
            return Err(GameError::InvalidGameState("play", self.state.phase));
        }
        let play = match &self.state.play {
            Some(play) => play,
            None => return Err(GameError::InvalidGameState("play", self.state.phase)),
        };
        if !self.hands[seat.idx()].contains(card) {
            return Err(GameError::CardNotInHand(card));
        }
        if seat != play.current_player {
            return Err(GameError::NotYourTurn(play.current_player));
        }
        if !play.legal_plays(self.hands[seat.idx()]).contains(card) {
            return Err(GameError::IllegalCard(card));
        }
        Ok(())
    }
}
