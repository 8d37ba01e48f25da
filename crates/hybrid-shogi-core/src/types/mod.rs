//! 基本型

mod moves;
mod piece;
mod player;
mod square;

pub use moves::{Move, MoveInput, Promotion};
pub use piece::{Piece, PieceFamily, PieceKind};
pub use player::Player;
pub use square::Square;
