//! Tree policy: which move to follow out of an already expanded node.
//!
//! Moves are scored with [UCB1] and the best one is followed. Moves that were
//! never tried outrank every tried move, and near-equal scores are treated as
//! a tie broken uniformly at random.
//!
//! [UCB1]: https://www.chessprogramming.org/UCT

use arrayvec::ArrayVec;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::game::core::{Column, COLUMNS};
use crate::search::tree::Node;

/// Score of a move that has no visits yet. Above any reachable UCB1 value for
/// the default exploration constant.
pub(super) const UNVISITED_SCORE: f64 = 20.0;

/// Scores closer than this are equal.
pub(super) const TOLERANCE: f64 = 0.0001;

/// Upper confidence bound of a move with `wins` out of `visits` from a node
/// visited `parent_visits` times.
pub(super) fn ucb1(wins: u32, visits: u32, parent_visits: u32, exploration: f64) -> f64 {
    let visits = f64::from(visits);
    let mean = f64::from(wins) / visits;
    exploration.mul_add((f64::from(parent_visits).ln() / visits).sqrt(), mean)
}

/// Picks the move to follow out of `node`, [`None`] if it has no legal moves.
pub(super) fn select<R: Rng + ?Sized>(node: &Node, exploration: f64, rng: &mut R) -> Option<Column> {
    let mut highest = -1.0;
    let mut tied = ArrayVec::<Column, COLUMNS>::new();
    for (column, stats) in node.moves() {
        let score = if stats.visits == 0 {
            UNVISITED_SCORE
        } else {
            ucb1(stats.wins, stats.visits, node.visits(), exploration)
        };
        if (score - highest).abs() < TOLERANCE {
            tied.push(column);
        } else if score > highest {
            highest = score;
            tied.clear();
            tied.push(column);
        }
    }
    tied.choose(rng).copied()
}
