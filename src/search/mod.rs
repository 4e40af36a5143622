//! Implements [Monte Carlo Tree Search] (MCTS) algorithm with random playouts
//! and UCB1 selection.
//!
//! [Monte Carlo Tree Search]: https://en.wikipedia.org/wiki/Monte_Carlo_tree_search

use std::collections::TryReserveError;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::game::core::{BoardError, Column};
use crate::game::GameState;
use crate::stack::StackError;

mod mcts;
mod policy;
mod rollout;
mod tree;

pub use mcts::Search;
pub use rollout::{random_move, rollout};
pub use tree::{MoveStats, Node, NodeIndex, Tree, ROOT};

/// Tree size used when none is requested.
pub const DEFAULT_NODES: u32 = 32_768;

/// Weight of the exploration term in UCB1.
pub const DEFAULT_EXPLORATION: f64 = 1.25;

/// Parameters of a single search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Maximum number of tree nodes, root included.
    pub nodes: u32,
    /// Weight of the exploration term in UCB1.
    pub exploration: f64,
    /// Fixed seed for reproducible searches. Seeded from the OS if unset.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            nodes: DEFAULT_NODES,
            exploration: DEFAULT_EXPLORATION,
            seed: None,
        }
    }
}

impl Config {
    /// Random source for a search with this configuration.
    #[must_use]
    pub fn rng(&self) -> StdRng {
        self.seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
    }
}

/// Reasons a search could not produce a move.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    /// The node budget does not even cover the root.
    #[error("node budget must be at least 1")]
    EmptyBudget,
    /// Storage for the tree could not be reserved.
    #[error("failed to allocate {budget} tree nodes")]
    Allocation {
        #[allow(missing_docs)]
        budget: u32,
        #[allow(missing_docs)]
        #[source]
        source: TryReserveError,
    },
    /// A round tried to add a node beyond the budget.
    #[error("tree is full ({0} nodes)")]
    TreeFull(usize),
    /// The root position has no legal moves.
    #[error("no legal moves in the root position")]
    NoLegalMove,
    /// Playing or taking back a move failed during a round.
    #[error(transparent)]
    Board(#[from] BoardError),
    /// The descended path overflowed or was popped while empty.
    #[error("search path: {0}")]
    Path(#[from] StackError),
    /// Moves were left on the board after walking the path back to the root.
    #[error("{0} moves left on the board after backpropagation")]
    Unbalanced(usize),
}

/// Searches `state` with a tree of at most `budget` nodes and returns the
/// most explored legal move. `state` is left as it was.
///
/// ```
/// use connect4_mcts::game::GameState;
/// use connect4_mcts::search::monte_carlo_best_move;
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// // Yellow completes four in column 6.
/// let mut state = GameState::from_moves("6 0 6 0 6 1").unwrap();
/// let best = monte_carlo_best_move(&mut state, 2000, &mut StdRng::seed_from_u64(1));
/// assert_eq!(best, Ok(6));
/// ```
///
/// # Errors
///
/// See [`SearchError`].
pub fn monte_carlo_best_move<R: Rng + ?Sized>(
    state: &mut GameState,
    budget: u32,
    rng: &mut R,
) -> Result<Column, SearchError> {
    let config = Config {
        nodes: budget,
        ..Config::default()
    };
    best_move(state, &config, rng)
}

/// Same as [`monte_carlo_best_move`] with every parameter taken from `config`
/// except the random source.
///
/// # Errors
///
/// See [`SearchError`].
pub fn best_move<R: Rng + ?Sized>(
    state: &mut GameState,
    config: &Config,
    rng: &mut R,
) -> Result<Column, SearchError> {
    let search = Search::run(state, config.nodes, config.exploration, rng)?;
    let best = search.best_move().ok_or(SearchError::NoLegalMove)?;
    if log::log_enabled!(log::Level::Debug) {
        let visits: Vec<u32> = search
            .tree()
            .root()
            .moves()
            .map(|(_, stats)| stats.visits)
            .collect();
        log::debug!(
            "budget {}: {} rounds, {} nodes, root visits {visits:?}, best move {best}",
            config.nodes,
            search.rounds(),
            search.tree().len()
        );
    }
    Ok(best)
}
