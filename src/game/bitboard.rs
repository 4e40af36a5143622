//! Packed two-[`Bitboard`] encoding of a position, used to hand positions
//! across the engine boundary.
//!
//! Each color gets one `u64`. Bit `e` for `e` in `0..42` is set when that
//! color occupies cell `e` (`column * 6 + row`, row 0 at the bottom). Bit 42
//! of the Yellow mask selects the side to move: set means Yellow is to play,
//! clear means Blue is.

use thiserror::Error;

use crate::game::core::{cell, Color, Column, GameStatus, BOARD_HEIGHT, BOARD_WIDTH, MAX_PLIES};
use crate::game::state::GameState;

/// One bit for each of the 42 cells.
const BOARD_MASK: u64 = (1 << MAX_PLIES) - 1;

/// Bit following the 42 board bits.
pub const TURN_INDICATOR: u64 = 1 << MAX_PLIES;

/// Set of board cells, one bit per cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Bitboard {
    bits: u64,
}

impl Bitboard {
    /// Constructs Bitboard from pre-calculated bits.
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self { bits }
    }

    /// Returns raw bits.
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.bits
    }

    /// Returns true if this bitboard contains the cell.
    #[must_use]
    pub const fn is_set(self, column: Column, row: u8) -> bool {
        (self.bits & (1 << cell(column, row))) != 0
    }

    fn set(&mut self, column: Column, row: u8) {
        self.bits |= 1 << cell(column, row);
    }
}

/// Reasons a pair of masks does not describe a reachable board.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum EncodingError {
    /// Both colors claim the same cell.
    #[error("cell ({column}, {row}) is occupied by both players")]
    Overlap {
        #[allow(missing_docs)]
        column: Column,
        #[allow(missing_docs)]
        row: u8,
    },
    /// A piece sits above an empty cell.
    #[error("piece at ({column}, {row}) is floating above an empty cell")]
    Floating {
        #[allow(missing_docs)]
        column: Column,
        #[allow(missing_docs)]
        row: u8,
    },
}

impl GameState {
    /// Decodes a position from the packed masks. The resulting state has an
    /// empty history: only moves played after decoding can be taken back.
    ///
    /// The status is taken from the turn bit as is; a board that already
    /// contains four connected pieces is not detected.
    ///
    /// ```
    /// use connect4_mcts::game::bitboard::TURN_INDICATOR;
    /// use connect4_mcts::game::core::{Color, GameStatus};
    /// use connect4_mcts::game::GameState;
    ///
    /// // Yellow in the bottom cell of column 0, Blue on top of it.
    /// let state = GameState::from_bitboards(0b01 | TURN_INDICATOR, 0b10).unwrap();
    /// assert_eq!(state.color_at(0, 0), Color::Yellow);
    /// assert_eq!(state.color_at(0, 1), Color::Blue);
    /// assert_eq!(state.status(), GameStatus::YellowToPlay);
    /// ```
    ///
    /// # Errors
    ///
    /// Fails if the masks overlap or a column is not filled from the bottom.
    pub fn from_bitboards(yellow: u64, blue: u64) -> Result<Self, EncodingError> {
        let status = if yellow & TURN_INDICATOR == 0 {
            GameStatus::BlueToPlay
        } else {
            GameStatus::YellowToPlay
        };
        let yellow = Bitboard::from_bits(yellow & BOARD_MASK);
        let blue = Bitboard::from_bits(blue & BOARD_MASK);

        let mut board = [Color::Empty; MAX_PLIES];
        for column in 0..BOARD_WIDTH {
            let mut reached_top = false;
            for row in 0..BOARD_HEIGHT {
                let color = match (yellow.is_set(column, row), blue.is_set(column, row)) {
                    (true, true) => return Err(EncodingError::Overlap { column, row }),
                    (true, false) => Color::Yellow,
                    (false, true) => Color::Blue,
                    (false, false) => Color::Empty,
                };
                if color == Color::Empty {
                    reached_top = true;
                } else if reached_top {
                    return Err(EncodingError::Floating { column, row });
                }
                board[usize::from(cell(column, row))] = color;
            }
        }
        Ok(Self::with_board(board, status))
    }

    /// Encodes the position as `(yellow, blue)` masks, the inverse of
    /// [`GameState::from_bitboards`] for positions where a player is to move.
    /// A finished game is encoded with Blue to move.
    #[must_use]
    pub fn to_bitboards(&self) -> (u64, u64) {
        let mut yellow = Bitboard::default();
        let mut blue = Bitboard::default();
        for column in 0..BOARD_WIDTH {
            for row in 0..BOARD_HEIGHT {
                match self.color_at(column, row) {
                    Color::Yellow => yellow.set(column, row),
                    Color::Blue => blue.set(column, row),
                    Color::Empty => {},
                }
            }
        }
        let turn = if self.status() == GameStatus::YellowToPlay {
            TURN_INDICATOR
        } else {
            0
        };
        (yellow.bits() | turn, blue.bits())
    }
}
