//! The search loop: rounds of selection, expansion, simulation and
//! backpropagation over a [`Tree`] of bounded size.

use rand::Rng;

use crate::game::core::Column;
use crate::game::GameState;
use crate::search::rollout::{self, Line};
use crate::search::tree::{Edge, NodeIndex, Tree, ROOT};
use crate::search::{policy, SearchError};

/// Runs Monte Carlo Tree Search rounds over a fixed node budget.
///
/// Every round after the root was created adds at most one node:
///
/// 1. Selection: starting at the root, follow the [UCB1] move out of each node
///    until reaching a move that has no child yet or a node without legal
///    moves.
/// 2. Expansion: play the unexpanded move and create a node for the position.
/// 3. Simulation: finish the game with random moves from that position.
/// 4. Backpropagation: walk the descended path back to the root, crediting
///    each move with the result from the view of the player who made it.
///
/// [UCB1]: https://www.chessprogramming.org/UCT
#[derive(Debug)]
pub struct Search {
    tree: Tree,
    exploration: f64,
    rounds: u32,
}

impl Search {
    /// Builds a tree of up to `budget` nodes for `state`: the root and
    /// `budget - 1` rounds. `state` is used as the scratch board and is
    /// restored before returning, including on errors.
    ///
    /// # Errors
    ///
    /// Fails on an empty budget, if the tree can not be allocated, or if a
    /// round breaks the board or path invariants.
    pub fn run<R: Rng + ?Sized>(
        state: &mut GameState,
        budget: u32,
        exploration: f64,
        rng: &mut R,
    ) -> Result<Self, SearchError> {
        let mut search = Self {
            tree: Tree::new(budget, state)?,
            exploration,
            rounds: 0,
        };
        for _ in 1..budget {
            search.round(state, rng)?;
            search.rounds += 1;
        }
        Ok(search)
    }

    /// The legal root move that was explored the most, lowest column on ties.
    /// [`None`] if the root position has no legal moves.
    #[must_use]
    pub fn best_move(&self) -> Option<Column> {
        self.tree.root().most_visited()
    }

    /// Nodes and statistics gathered by the search.
    #[must_use]
    pub const fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Number of completed rounds.
    #[must_use]
    pub const fn rounds(&self) -> u32 {
        self.rounds
    }

    fn round<R: Rng + ?Sized>(
        &mut self,
        state: &mut GameState,
        rng: &mut R,
    ) -> Result<(), SearchError> {
        self.tree.path.clear();
        let mut line = Line::new(state);

        let mut current = ROOT;
        let mut expand = None;
        while let Some(column) = policy::select(self.tree.node(current), self.exploration, rng) {
            self.descend(&mut line, current, column)?;
            match self.tree.node(current).child(column) {
                Some(child) => current = child,
                None => {
                    expand = Some(column);
                    break;
                },
            }
        }
        if let Some(column) = expand {
            let child = self.tree.expand(current, column, line.state())?;
            log::trace!(
                "round {}: node {child} via column {column} at depth {}",
                self.rounds + 1,
                line.played()
            );
        }

        let result = rollout::simulate(&mut line, rng)?;
        self.backpropagate(&mut line, result)
    }

    fn descend(
        &mut self,
        line: &mut Line<'_>,
        node: NodeIndex,
        column: Column,
    ) -> Result<(), SearchError> {
        line.play(column)?;
        self.tree.path.push(Edge { node, column })?;
        Ok(())
    }

    /// `result` is from the view of the side to move at the end of the path.
    fn backpropagate(&mut self, line: &mut Line<'_>, mut result: u32) -> Result<(), SearchError> {
        while let Ok(edge) = self.tree.path.pop() {
            result = 1 - result;
            self.tree.node_mut(edge.node).record(edge.column, result);
            line.undo()?;
        }
        match line.played() {
            0 => Ok(()),
            left => Err(SearchError::Unbalanced(left)),
        }
    }
}
