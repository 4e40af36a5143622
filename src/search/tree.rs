//! Flat, append-only storage for the search tree. Nodes refer to each other by
//! index into a single pre-allocated vector, so the tree never allocates
//! after construction.

use std::cmp::Reverse;

use crate::game::core::{Column, BOARD_WIDTH, COLUMNS, MAX_PLIES};
use crate::game::GameState;
use crate::search::SearchError;
use crate::stack::Stack;

/// Position of a node in [`Tree`].
pub type NodeIndex = u32;

/// The root node is created together with the tree.
pub const ROOT: NodeIndex = 0;

/// Statistics of one move out of a node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveStats {
    /// Number of rounds that played this move.
    pub visits: u32,
    /// Rounds won by the player to move in the node this move starts from.
    pub wins: u32,
}

/// One position visited by the search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    visits: u32,
    /// [`None`] for moves that are illegal in this position. Fixed at creation.
    moves: [Option<MoveStats>; COLUMNS],
    /// [`None`] until the move has been expanded.
    children: [Option<NodeIndex>; COLUMNS],
}

impl Node {
    fn new(state: &GameState) -> Self {
        let mut moves = [None; COLUMNS];
        for column in state.legal_moves() {
            moves[usize::from(column)] = Some(MoveStats::default());
        }
        Self {
            visits: 0,
            moves,
            children: [None; COLUMNS],
        }
    }

    /// Number of rounds that passed through this node.
    #[must_use]
    pub const fn visits(&self) -> u32 {
        self.visits
    }

    /// Statistics of `column`, [`None`] if the move is illegal here.
    ///
    /// # Panics
    ///
    /// `column` has to be within the board.
    #[must_use]
    pub fn stats(&self, column: Column) -> Option<MoveStats> {
        self.moves[usize::from(column)]
    }

    /// # Panics
    ///
    /// `column` has to be within the board.
    #[must_use]
    pub fn child(&self, column: Column) -> Option<NodeIndex> {
        self.children[usize::from(column)]
    }

    /// Legal moves with their statistics in column order.
    pub fn moves(&self) -> impl Iterator<Item = (Column, MoveStats)> {
        (0..BOARD_WIDTH)
            .zip(self.moves)
            .filter_map(|(column, stats)| stats.map(|stats| (column, stats)))
    }

    /// The legal move played most often. Ties go to the lowest column.
    #[must_use]
    pub fn most_visited(&self) -> Option<Column> {
        self.moves()
            .min_by_key(|&(column, stats)| (Reverse(stats.visits), column))
            .map(|(column, _)| column)
    }

    pub(super) fn record(&mut self, column: Column, reward: u32) {
        self.visits += 1;
        match &mut self.moves[usize::from(column)] {
            Some(stats) => {
                stats.visits += 1;
                stats.wins += reward;
            },
            None => debug_assert!(false, "recorded illegal move {column}"),
        }
    }

    fn link(&mut self, column: Column, child: NodeIndex) {
        debug_assert!(self.children[usize::from(column)].is_none());
        self.children[usize::from(column)] = Some(child);
    }
}

/// Move from `node` into `column`: one step of the path descended in the
/// current round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct Edge {
    pub(super) node: NodeIndex,
    pub(super) column: Column,
}

/// Search tree with a fixed node budget.
#[derive(Debug)]
pub struct Tree {
    nodes: Vec<Node>,
    budget: usize,
    /// Edges descended in the current round, most recent on top.
    pub(super) path: Stack<Edge, MAX_PLIES>,
}

impl Tree {
    /// Allocates room for `budget` nodes and creates the root for `root`.
    pub(super) fn new(budget: u32, root: &GameState) -> Result<Self, SearchError> {
        if budget == 0 {
            return Err(SearchError::EmptyBudget);
        }
        let capacity = usize::try_from(budget).unwrap_or(usize::MAX);
        let mut nodes = Vec::new();
        nodes
            .try_reserve_exact(capacity)
            .map_err(|source| SearchError::Allocation { budget, source })?;
        nodes.push(Node::new(root));
        Ok(Self {
            nodes,
            budget: capacity,
            path: Stack::new(),
        })
    }

    /// Appends a node for `state` as a child of `parent` reached by `column`.
    pub(super) fn expand(
        &mut self,
        parent: NodeIndex,
        column: Column,
        state: &GameState,
    ) -> Result<NodeIndex, SearchError> {
        if self.nodes.len() >= self.budget {
            return Err(SearchError::TreeFull(self.budget));
        }
        let child =
            NodeIndex::try_from(self.nodes.len()).map_err(|_| SearchError::TreeFull(self.budget))?;
        self.nodes.push(Node::new(state));
        self.node_mut(parent).link(column, child);
        Ok(child)
    }

    /// The node of the searched position.
    #[must_use]
    pub fn root(&self) -> &Node {
        self.node(ROOT)
    }

    /// # Panics
    ///
    /// `index` has to refer to an existing node.
    #[must_use]
    pub fn node(&self, index: NodeIndex) -> &Node {
        &self.nodes[index as usize]
    }

    pub(super) fn node_mut(&mut self, index: NodeIndex) -> &mut Node {
        &mut self.nodes[index as usize]
    }

    /// Number of nodes created so far, including the root, which always
    /// exists.
    #[allow(clippy::len_without_is_empty)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Maximum number of nodes.
    #[must_use]
    pub const fn budget(&self) -> usize {
        self.budget
    }
}
