//! Connect Four engine picking moves with Monte Carlo Tree Search.
//!
//! - [`game`] holds the board, its rules and the packed bitboard encoding.
//! - [`search`] grows a bounded search tree over random playouts and picks
//!   the most explored move.
//! - [`interface::ai_move`] turns a packed position and a node budget into a
//!   column.
//! - [`Engine`] drives all of the above through a line-based text protocol.

pub mod game;
pub mod interface;
pub mod search;
pub mod stack;

mod engine;
pub use engine::{bench, Engine};
use shadow_rs::shadow;

shadow!(build);

/// Target, profile and debug assertions. Produced by `build.rs`.
const FEATURES: &str = include_str!(concat!(env!("OUT_DIR"), "/features"));

/// Returns the full engine version that can be used to identify how it was
/// built in the first place.
fn engine_version() -> String {
    format!(
        "{} (commit {}, branch {})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BRANCH
    )
}

/// Prints the engine name and version on startup.
pub fn print_engine_info() {
    println!("Connect Four MCTS engine {}", engine_version());
}

/// Prints the build type, features and whether the build is clean on engine
/// startup.
pub fn print_binary_info() {
    println!("Release build: {}", !shadow_rs::is_debug());
    println!("Features: {FEATURES}");
    if !shadow_rs::git_clean() {
        println!("Warning: built with uncommitted changes");
    }
    println!();
}
