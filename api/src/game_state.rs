use crate::{
    score_hand, BiddingState, Cards, GameEvent, GameMode, GameOptions, GamePhase, HandScore,
    PlayState, Scoreboard, Seat,
};

/// The rules-visible state of one game, rebuilt by folding events. Exactly
/// one of the bidding and play sub-objects is present in its phase and
/// neither exists outside it.
#[derive(Clone, Debug)]
pub struct GameState {
    pub phase: GamePhase,
    pub options: GameOptions,
    pub dealer: Option<Seat>,
    pub bidding: Option<BiddingState>,
    pub play: Option<PlayState>,
    pub scoreboard: Scoreboard,
    pub hand_scores: Vec<HandScore>,
    /// Completed hands, archived for stats and the final trick record.
    pub history: Vec<PlayState>,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            phase: GamePhase::Waiting,
            options: GameOptions::default(),
            dealer: None,
            bidding: None,
            play: None,
            scoreboard: Scoreboard::new(GameMode::Partners),
            hand_scores: Vec::new(),
            history: Vec::new(),
        }
    }

    /// The seat that must act next, if the game is waiting on one.
    pub fn next_actor(&self) -> Option<Seat> {
        match self.phase {
            GamePhase::Bidding => self.bidding.as_ref().map(|bidding| bidding.current_bidder),
            GamePhase::Playing => self.play.as_ref().map(|play| play.current_player),
            _ => None,
        }
    }

    pub fn legal_plays(&self, hand: Cards) -> Cards {
        match &self.play {
            Some(play) => play.legal_plays(hand),
            None => Cards::NONE,
        }
    }

    pub fn apply(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Create { options, .. } => {
                self.options = *options;
                self.scoreboard = Scoreboard::new(options.mode);
            }
            GameEvent::Deal { dealer, .. } => {
                self.phase = GamePhase::Bidding;
                self.dealer = Some(*dealer);
                self.bidding = Some(BiddingState::new(*dealer));
                self.play = None;
            }
            GameEvent::Bid { seat, bid } => {
                if let Some(bidding) = &mut self.bidding {
                    bidding.bid(*seat, *bid);
                    if bidding.is_complete() {
                        let play = PlayState::new(bidding.dealer, bidding.resolved());
                        self.bidding = None;
                        self.play = Some(play);
                        self.phase = GamePhase::Playing;
                    }
                }
            }
            GameEvent::Play { card, .. } => {
                let finished = match &mut self.play {
                    Some(play) => {
                        play.play(*card);
                        play.is_complete()
                    }
                    None => false,
                };
                if finished {
                    if let Some(play) = self.play.take() {
                        let hand = score_hand(play.bids, play.tricks_won(), self.options.mode);
                        self.scoreboard.apply(&hand);
                        self.hand_scores.push(hand);
                        self.history.push(play);
                        self.phase = if self.scoreboard.is_complete(&self.options) {
                            GamePhase::Complete
                        } else {
                            GamePhase::Waiting
                        };
                    }
                }
            }
            _ => {}
        }
    }
}
