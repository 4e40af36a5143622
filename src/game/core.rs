//! Connect Four primitives commonly used within [`crate::game`].

use std::fmt;
use std::ops::Not;

use thiserror::Error;

use crate::stack::StackError;

/// Number of columns on the board.
pub const BOARD_WIDTH: u8 = 7;
/// Number of rows on the board.
pub const BOARD_HEIGHT: u8 = 6;
/// Number of cells on the board, which is also the maximum number of plies in
/// a game.
pub const BOARD_SIZE: u8 = BOARD_WIDTH * BOARD_HEIGHT;
/// [`BOARD_SIZE`] as a `usize` for sizing arrays and stacks.
pub const MAX_PLIES: usize = BOARD_SIZE as usize;
/// [`BOARD_WIDTH`] as a `usize` for sizing per-column arrays.
pub const COLUMNS: usize = BOARD_WIDTH as usize;

/// Index of a column, `0..BOARD_WIDTH` from left to right.
pub type Column = u8;

/// Index of a board cell: `column * BOARD_HEIGHT + row`, where row 0 is the
/// bottom of the board.
///
/// ```
/// use connect4_mcts::game::core::{cell, column_of, row_of};
///
/// assert_eq!(cell(0, 0), 0);
/// assert_eq!(cell(3, 2), 20);
/// assert_eq!(column_of(20), 3);
/// assert_eq!(row_of(20), 2);
/// assert_eq!(cell(6, 5), 41);
/// ```
pub type Cell = u8;

/// Connects column and row to form a cell index.
#[must_use]
pub const fn cell(column: Column, row: u8) -> Cell {
    column * BOARD_HEIGHT + row
}

/// Column holding `cell`.
#[must_use]
pub const fn column_of(cell: Cell) -> Column {
    cell / BOARD_HEIGHT
}

/// Row of `cell`, 0 at the bottom.
#[must_use]
pub const fn row_of(cell: Cell) -> u8 {
    cell % BOARD_HEIGHT
}

/// Yellow always moves first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Player {
    Yellow,
    Blue,
}

impl Not for Player {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Self::Yellow => Self::Blue,
            Self::Blue => Self::Yellow,
        }
    }
}

/// Contents of a single board cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Color {
    #[default]
    Empty,
    Blue,
    Yellow,
}

impl From<Player> for Color {
    fn from(player: Player) -> Self {
        match player {
            Player::Yellow => Self::Yellow,
            Player::Blue => Self::Blue,
        }
    }
}

impl Color {
    /// Owner of the piece, [`None`] for an empty cell.
    #[must_use]
    pub const fn player(self) -> Option<Player> {
        match self {
            Self::Empty => None,
            Self::Blue => Some(Player::Blue),
            Self::Yellow => Some(Player::Yellow),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match &self {
                Self::Empty => '.',
                Self::Blue => 'B',
                Self::Yellow => 'Y',
            }
        )
    }
}

/// Whose turn it is or how the game ended.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum GameStatus {
    #[default]
    YellowToPlay,
    BlueToPlay,
    YellowWon,
    BlueWon,
    Tied,
}

impl GameStatus {
    /// The status in which `player` is the one to move.
    #[must_use]
    pub const fn to_play(player: Player) -> Self {
        match player {
            Player::Yellow => Self::YellowToPlay,
            Player::Blue => Self::BlueToPlay,
        }
    }

    /// The status in which `player` has connected four.
    #[must_use]
    pub const fn won(player: Player) -> Self {
        match player {
            Player::Yellow => Self::YellowWon,
            Player::Blue => Self::BlueWon,
        }
    }

    /// Player to move, [`None`] once the game is over.
    #[must_use]
    pub const fn player_to_move(self) -> Option<Player> {
        match self {
            Self::YellowToPlay => Some(Player::Yellow),
            Self::BlueToPlay => Some(Player::Blue),
            Self::YellowWon | Self::BlueWon | Self::Tied => None,
        }
    }

    /// True for a won or tied game.
    #[must_use]
    pub const fn is_finished(self) -> bool {
        self.player_to_move().is_none()
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::YellowToPlay => "yellow to play",
            Self::BlueToPlay => "blue to play",
            Self::YellowWon => "yellow won",
            Self::BlueWon => "blue won",
            Self::Tied => "tied",
        })
    }
}

/// Rejected operations on [`crate::game::GameState`]. None of them modify the
/// state.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    /// A move was attempted after the game ended.
    #[error("the game is over")]
    GameOver,
    /// A move was attempted in a column with no empty cells.
    #[error("column {0} is full")]
    ColumnFull(Column),
    /// The column index is not within `0..BOARD_WIDTH`.
    #[error("column {0} is out of range")]
    ColumnOutOfRange(Column),
    /// There is no move to undo or inspect.
    #[error("no moves have been played")]
    GameEmpty,
    /// Move history ran out of space.
    #[error("move history: {0}")]
    History(#[from] StackError),
}
