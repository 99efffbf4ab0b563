use crate::{Games, ServerError};
use futures_util::FutureExt;
use log::debug;
use rand::distributions::Distribution;
use rand_distr::Gamma;
use spades_api::{BotState, BotStrategy, GameEvent, GameId, GameState, Seat, UserId};
use spades_bot::{Algorithm, Bot, HeuristicBot, RandomBot};
use std::time::Instant;
use tokio::{sync::mpsc::UnboundedReceiver, time, time::Duration};

/// Drives one bot seat. The runner folds the redacted event stream into its
/// own view of the game and calls back into `Games` whenever the status
/// events put its seat on turn.
pub struct BotRunner {
    game_id: GameId,
    user_id: UserId,
    bot_state: BotState,
    game_state: GameState,
    bot: Bot,
}

impl BotRunner {
    pub fn new(game_id: GameId, seat: Seat, user_id: UserId, strategy: BotStrategy) -> Self {
        let bot = match strategy {
            BotStrategy::Heuristic => Bot::Heuristic(HeuristicBot::new()),
            BotStrategy::Random => Bot::Random(RandomBot::new()),
        };
        Self {
            game_id,
            user_id,
            bot_state: BotState::new(seat),
            game_state: GameState::new(),
            bot,
        }
    }

    pub async fn run(
        mut self,
        games: Games,
        mut rx: UnboundedReceiver<(GameEvent, usize)>,
        delay: Option<Gamma<f32>>,
    ) -> Result<(), ServerError> {
        let mut action = None;
        loop {
            let now = Instant::now();
            loop {
                match rx.recv().now_or_never() {
                    Some(Some((event, _))) => {
                        action = self.handle(event);
                    }
                    Some(None) => return Ok(()),
                    None => break,
                }
            }
            let delay =
                delay.map(|delay| Duration::from_secs_f32(delay.sample(&mut rand::thread_rng())));
            match action {
                Some(Action::Bid) => {
                    let bid = self.bot.bid(&self.bot_state, &self.game_state);
                    BotRunner::delay(delay, now).await;
                    let _ = games.bid(self.game_id, self.user_id, bid).await;
                }
                Some(Action::Play) => {
                    let card = self.bot.play(&self.bot_state, &self.game_state);
                    BotRunner::delay(delay, now).await;
                    if let Ok(true) = games.play_card(self.game_id, self.user_id, card).await {
                        return Ok(());
                    }
                }
                None => {}
            }
            match rx.recv().await {
                Some((event, _)) => {
                    action = self.handle(event);
                }
                None => return Ok(()),
            }
        }
    }

    async fn delay(delay: Option<Duration>, start: Instant) {
        let delay = delay.and_then(|delay| delay.checked_sub(start.elapsed()));
        if let Some(delay) = delay {
            time::sleep(delay).await;
        }
    }

    fn handle(&mut self, event: GameEvent) -> Option<Action> {
        debug!(
            "handle: game_id={}, user_id={}, event={:?}",
            self.game_id, self.user_id, event
        );
        self.bot.on_event(&self.bot_state, &self.game_state, &event);
        self.game_state.apply(&event);
        match &event {
            GameEvent::SeatBot { seat, profile, .. } if profile.user_id == self.user_id => {
                self.bot_state.seat = *seat;
            }
            GameEvent::Deal {
                north,
                east,
                south,
                west,
                ..
            } => {
                // the stream is redacted, only our own hand is populated
                self.bot_state.hand = *north | *east | *south | *west;
            }
            GameEvent::Play { seat, card } if *seat == self.bot_state.seat => {
                self.bot_state.hand -= *card;
            }
            _ => {}
        }
        match self.game_state.next_actor() {
            Some(seat) if seat == self.bot_state.seat => {
                if self.game_state.phase.is_bidding() {
                    Some(Action::Bid)
                } else {
                    Some(Action::Play)
                }
            }
            _ => None,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Action {
    Bid,
    Play,
}
