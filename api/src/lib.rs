mod bid_state;
mod bot;
mod card;
mod cards;
mod error;
mod event;
mod game;
mod game_phase;
mod game_state;
mod play_state;
mod player;
mod rank;
mod roster;
mod scores;
mod seat;
mod seed;
mod suit;
mod trick;
mod types;

pub use bid_state::*;
pub use bot::*;
pub use card::*;
pub use cards::*;
pub use error::*;
pub use event::*;
pub use game::*;
pub use game_phase::*;
pub use game_state::*;
pub use play_state::*;
pub use player::*;
pub use rank::*;
pub use roster::*;
pub use scores::*;
pub use seat::*;
pub use seed::*;
pub use suit::*;
pub use trick::*;
pub use types::*;
