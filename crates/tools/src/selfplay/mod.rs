pub mod config;
pub mod game;

pub use config::{MatchConfig, SideConfig};
pub use game::{run_game, GameResult, MoveEvent};
