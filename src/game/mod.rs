//! Implementation of Connect Four: the board, its rules and the packed
//! encoding used at the engine boundary.

pub mod bitboard;
pub mod core;
pub mod state;

pub use state::{GameState, Moves};
