use crate::Algorithm;
use rand::Rng;
use spades_api::{Bid, BotState, Card, GameEvent, GameState};

pub struct RandomBot;

impl RandomBot {
    pub fn new() -> Self {
        Self
    }
}

impl Algorithm for RandomBot {
    fn bid(&mut self, _: &BotState, _: &GameState) -> Bid {
        Bid::Tricks {
            count: rand::thread_rng().gen_range(1..=4),
        }
    }

    fn play(&mut self, state: &BotState, game: &GameState) -> Card {
        let cards = game.legal_plays(state.hand);
        let index = rand::thread_rng().gen_range(0..cards.len());
        cards.into_iter().nth(index).unwrap()
    }

    fn on_event(&mut self, _: &BotState, _: &GameState, _: &GameEvent) {}
}
