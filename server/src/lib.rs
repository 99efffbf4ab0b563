mod bot;
mod db;
mod error;
mod game;
pub mod ledger;
mod sender;
mod util;

pub use bot::*;
pub use db::*;
pub use error::*;
pub use game::*;
pub use sender::*;
