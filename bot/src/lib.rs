use spades_api::{Bid, BotState, Card, GameEvent, GameState};

mod heuristic;
mod random;

pub use heuristic::*;
pub use random::*;

pub trait Algorithm {
    fn bid(&mut self, state: &BotState, game: &GameState) -> Bid;
    fn play(&mut self, state: &BotState, game: &GameState) -> Card;

    fn on_event(&mut self, state: &BotState, game: &GameState, event: &GameEvent);
}

pub enum Bot {
    Heuristic(HeuristicBot),
    Random(RandomBot),
}

impl Algorithm for Bot {
    fn bid(&mut self, state: &BotState, game: &GameState) -> Bid {
        match self {
            Bot::Heuristic(bot) => bot.bid(state, game),
            Bot::Random(bot) => bot.bid(state, game),
        }
    }

    fn play(&mut self, state: &BotState, game: &GameState) -> Card {
        match self {
            Bot::Heuristic(bot) => bot.play(state, game),
            Bot::Random(bot) => bot.play(state, game),
        }
    }

    fn on_event(&mut self, state: &BotState, game: &GameState, event: &GameEvent) {
        match self {
            Bot::Heuristic(bot) => bot.on_event(state, game, event),
            Bot::Random(bot) => bot.on_event(state, game, event),
        }
    }
}
