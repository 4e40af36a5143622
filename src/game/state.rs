//! Provides [`GameState`]: the board, the side to move or the final outcome,
//! and the history of played cells that makes every move reversible.
//!
//! The search plays and takes back moves on a single [`GameState`] instead of
//! copying it, so [`GameState::undo_move`] has to restore the exact previous
//! state, including the status of a finished game.

use std::fmt;

use anyhow::Context;
use arrayvec::ArrayVec;
use itertools::Itertools;

use crate::game::core::{
    cell,
    column_of,
    row_of,
    BoardError,
    Cell,
    Color,
    Column,
    GameStatus,
    BOARD_HEIGHT,
    BOARD_WIDTH,
    COLUMNS,
    MAX_PLIES,
};
use crate::stack::Stack;

/// Legal columns in increasing order.
pub type Moves = ArrayVec<Column, COLUMNS>;

/// Axes checked for a connected line through the last played cell: rising
/// diagonal to the left, vertical, rising diagonal to the right and
/// horizontal.
const AXES: [(i16, i16); 4] = [(-1, 1), (0, 1), (1, 1), (1, 0)];

/// Walking both directions of an axis counts the origin cell twice, so four
/// connected pieces add up to five.
const CONNECTED_RUN: u8 = 5;

/// Connect Four position together with the sequence of cells that led to it
/// from the moment it was created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    /// Column-major: `board[column * BOARD_HEIGHT + row]`, row 0 is the bottom.
    board: [Color; MAX_PLIES],
    status: GameStatus,
    history: Stack<Cell, MAX_PLIES>,
}

impl GameState {
    /// Creates an empty board with Yellow to move.
    ///
    /// ```
    /// use connect4_mcts::game::core::GameStatus;
    /// use connect4_mcts::game::GameState;
    ///
    /// let state = GameState::new();
    /// assert_eq!(state.status(), GameStatus::YellowToPlay);
    /// assert_eq!(state.plies(), 0);
    /// assert_eq!(state.legal_moves().as_slice(), &[0, 1, 2, 3, 4, 5, 6]);
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Self {
            board: [Color::Empty; MAX_PLIES],
            status: GameStatus::YellowToPlay,
            history: Stack::new(),
        }
    }

    /// Position with the given pieces and status and an empty history.
    pub(super) const fn with_board(board: [Color; MAX_PLIES], status: GameStatus) -> Self {
        Self {
            board,
            status,
            history: Stack::new(),
        }
    }

    /// Plays out a whitespace-separated list of column indices from the empty
    /// board.
    ///
    /// # Errors
    ///
    /// Fails on the first token that is not a number or names a move that
    /// can not be played.
    pub fn from_moves(moves: &str) -> anyhow::Result<Self> {
        let mut state = Self::new();
        state.play_moves(moves)?;
        Ok(state)
    }

    /// Plays whitespace-separated column indices on top of the current
    /// position.
    ///
    /// # Errors
    ///
    /// Stops at the first invalid token or rejected move. Moves before it
    /// remain played.
    pub fn play_moves(&mut self, moves: &str) -> anyhow::Result<()> {
        for token in moves.split_whitespace() {
            let column: Column = token
                .parse()
                .with_context(|| format!("expected column index, got '{token}'"))?;
            self.play_move(column)
                .with_context(|| format!("can not play column {column}"))?;
        }
        Ok(())
    }

    /// Drops a piece of the player to move into `column` and updates the
    /// status.
    ///
    /// # Errors
    ///
    /// Rejected moves leave the state untouched:
    ///
    /// - [`BoardError::ColumnOutOfRange`] if `column` is not on the board.
    /// - [`BoardError::GameOver`] if the game has already finished.
    /// - [`BoardError::ColumnFull`] if `column` has no empty cell.
    pub fn play_move(&mut self, column: Column) -> Result<(), BoardError> {
        if column >= BOARD_WIDTH {
            return Err(BoardError::ColumnOutOfRange(column));
        }
        let Some(mover) = self.status.player_to_move() else {
            return Err(BoardError::GameOver);
        };
        let Some(row) = self.lowest_empty_row(column) else {
            return Err(BoardError::ColumnFull(column));
        };
        let target = cell(column, row);
        self.history.push(target)?;
        self.status = GameStatus::to_play(!mover);
        self.board[usize::from(target)] = mover.into();
        self.update_status()
    }

    /// Recomputes the status from the most recently played cell: a connected
    /// line of four through it wins the game for its owner, a full board ties
    /// it. Otherwise the status is left as is.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::GameEmpty`] without changing anything if no move
    /// has been played.
    pub fn update_status(&mut self) -> Result<(), BoardError> {
        let origin = *self.history.peek().map_err(|_| BoardError::GameEmpty)?;
        let color = self.board[usize::from(origin)];
        debug_assert_ne!(color, Color::Empty, "played cell {origin} is empty");
        let Some(owner) = color.player() else {
            return Ok(());
        };

        let column = i16::from(column_of(origin));
        let row = i16::from(row_of(origin));
        for (column_step, row_step) in AXES {
            let run = self.run_length(column, row, column_step, row_step, color)
                + self.run_length(column, row, -column_step, -row_step, color);
            if run >= CONNECTED_RUN {
                self.status = GameStatus::won(owner);
                return Ok(());
            }
        }

        if (0..BOARD_WIDTH).all(|column| self.color_at(column, BOARD_HEIGHT - 1) != Color::Empty) {
            self.status = GameStatus::Tied;
        }
        Ok(())
    }

    /// Number of consecutive `color` cells starting at (and including) the
    /// origin and walking in one direction.
    fn run_length(
        &self,
        column: i16,
        row: i16,
        column_step: i16,
        row_step: i16,
        color: Color,
    ) -> u8 {
        let mut run = 0;
        let (mut x, mut y) = (column, row);
        while let Some(index) = board_index(x, y) {
            if self.board[index] != color {
                break;
            }
            run += 1;
            x += column_step;
            y += row_step;
        }
        run
    }

    /// Side to move, or the outcome once the game is over.
    #[must_use]
    pub const fn status(&self) -> GameStatus {
        self.status
    }

    /// Returns true if a piece can be dropped into `column` right now. This
    /// agrees with [`GameState::play_move`] accepting the move.
    #[must_use]
    pub fn is_move_legal(&self, column: Column) -> bool {
        column < BOARD_WIDTH
            && !self.game_finished()
            && self.color_at(column, BOARD_HEIGHT - 1) == Color::Empty
    }

    /// Takes back the most recently played move. The status goes back to the
    /// player who made it, which also reopens a finished game.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::GameEmpty`] if there is no move to take back.
    pub fn undo_move(&mut self) -> Result<(), BoardError> {
        let last = self.history.pop().map_err(|_| BoardError::GameEmpty)?;
        let index = usize::from(last);
        if let Some(mover) = self.board[index].player() {
            self.status = GameStatus::to_play(mover);
        }
        self.board[index] = Color::Empty;
        Ok(())
    }

    /// True once a player has won or the board is full.
    #[must_use]
    pub const fn game_finished(&self) -> bool {
        self.status.is_finished()
    }

    /// Columns [`GameState::is_move_legal`] accepts, in increasing order.
    #[must_use]
    pub fn legal_moves(&self) -> Moves {
        (0..BOARD_WIDTH)
            .filter(|&column| self.is_move_legal(column))
            .collect()
    }

    /// # Panics
    ///
    /// `column` and `row` have to be within the board.
    #[must_use]
    pub fn color_at(&self, column: Column, row: u8) -> Color {
        assert!(column < BOARD_WIDTH && row < BOARD_HEIGHT);
        self.board[usize::from(cell(column, row))]
    }

    /// Cells played since the state was created, oldest first.
    #[must_use]
    pub fn history(&self) -> &[Cell] {
        self.history.as_slice()
    }

    /// Number of moves played since the state was created.
    #[must_use]
    pub fn plies(&self) -> usize {
        self.history.len()
    }

    fn lowest_empty_row(&self, column: Column) -> Option<u8> {
        (0..BOARD_HEIGHT).find(|&row| self.color_at(column, row) == Color::Empty)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

fn board_index(column: i16, row: i16) -> Option<usize> {
    let column = u8::try_from(column).ok().filter(|&c| c < BOARD_WIDTH)?;
    let row = u8::try_from(row).ok().filter(|&r| r < BOARD_HEIGHT)?;
    Some(usize::from(cell(column, row)))
}

impl fmt::Display for GameState {
    /// Draws the board from the top row down, followed by column indices.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..BOARD_HEIGHT).rev() {
            writeln!(
                f,
                "{}",
                (0..BOARD_WIDTH)
                    .map(|column| self.color_at(column, row))
                    .join(" ")
            )?;
        }
        write!(f, "{}", (0..BOARD_WIDTH).join(" "))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::game::core::Player;

    fn setup(moves: &str) -> GameState {
        GameState::from_moves(moves).expect("test games consist of legal moves")
    }

    /// Fills two columns, the first starting with Yellow and the second with
    /// Blue, without leaving Yellow to move in a Blue-starting column.
    fn fill_pair(yellow_column: Column, blue_column: Column) -> String {
        [
            yellow_column,
            blue_column,
            blue_column,
            yellow_column,
        ]
        .repeat(3)
        .iter()
        .join(" ")
    }

    /// A move order filling the whole board without four connected pieces.
    fn tied_game() -> String {
        format!(
            "{} {} 5 5 5 5 5 5 {}",
            fill_pair(0, 2),
            fill_pair(1, 3),
            fill_pair(4, 6)
        )
    }

    #[test]
    fn empty_board() {
        let state = GameState::new();
        for column in 0..BOARD_WIDTH {
            for row in 0..BOARD_HEIGHT {
                assert_eq!(state.color_at(column, row), Color::Empty);
            }
            assert!(state.is_move_legal(column));
        }
        assert_eq!(state.status(), GameStatus::YellowToPlay);
        assert!(!state.game_finished());
        assert!(state.history().is_empty());
    }

    #[test]
    #[should_panic]
    fn out_of_bounds_column() {
        let _ = GameState::new().color_at(7, 0);
    }

    #[test]
    #[should_panic]
    fn out_of_bounds_row() {
        let _ = GameState::new().color_at(0, 6);
    }

    #[test]
    fn example_game() {
        let mut state = GameState::new();
        state.play_move(2).unwrap();
        assert_eq!(state.status(), GameStatus::BlueToPlay);
        assert_eq!(state.color_at(2, 0), Color::Yellow);
        assert_eq!(state.color_at(3, 0), Color::Empty);
        state.play_move(3).unwrap();
        assert_eq!(state.status(), GameStatus::YellowToPlay);
        assert_eq!(state.color_at(3, 0), Color::Blue);
        state.play_move(2).unwrap();
        assert_eq!(state.color_at(2, 1), Color::Yellow);
        assert_eq!(state.history(), &[cell(2, 0), cell(3, 0), cell(2, 1)]);
        assert_eq!(state.plies(), 3);
    }

    #[test]
    fn vertical_three_is_not_a_win() {
        // Yellow has three pieces stacked in column 3, Blue is to move.
        let mut state = setup("3 0 3 1 3");
        assert_eq!(state.status(), GameStatus::BlueToPlay);

        state.play_move(3).unwrap();
        assert_eq!(state.status(), GameStatus::YellowToPlay);
        state.undo_move().unwrap();

        state.play_move(5).unwrap();
        state.play_move(3).unwrap();
        assert_eq!(state.status(), GameStatus::YellowWon);
        assert!(state.game_finished());
    }

    #[test]
    fn vertical_win() {
        let state = setup("0 1 0 1 0 1 2 1");
        assert_eq!(state.status(), GameStatus::BlueWon);
    }

    #[test]
    fn horizontal_win() {
        let state = setup("0 0 1 1 2 2 3");
        assert_eq!(state.status(), GameStatus::YellowWon);
    }

    #[test]
    fn diagonal_wins() {
        let mut rising = setup("0 1 1 2 3 2 2 3 4 3");
        assert_eq!(rising.status(), GameStatus::YellowToPlay);
        rising.play_move(3).unwrap();
        assert_eq!(rising.status(), GameStatus::YellowWon);

        let mut falling = setup("6 5 5 4 3 4 4 3 2 3");
        assert_eq!(falling.status(), GameStatus::YellowToPlay);
        falling.play_move(3).unwrap();
        assert_eq!(falling.status(), GameStatus::YellowWon);
    }

    #[test]
    fn win_in_the_middle_of_a_line() {
        // Yellow fills the gap between (1, 0), (2, 0) and (4, 0).
        let state = setup("1 1 2 2 4 4 3");
        assert_eq!(state.status(), GameStatus::YellowWon);
    }

    #[test]
    fn finished_game_rejects_moves() {
        let mut state = setup("0 0 1 1 2 2 3");
        let finished = state.clone();
        for column in 0..BOARD_WIDTH {
            assert!(!state.is_move_legal(column));
            assert_eq!(state.play_move(column), Err(BoardError::GameOver));
        }
        assert_eq!(state, finished);
        assert!(state.legal_moves().is_empty());
    }

    #[test]
    fn full_column() {
        let mut state = setup("0 0 0 0 0 0");
        let before = state.clone();
        assert!(!state.is_move_legal(0));
        assert_eq!(state.play_move(0), Err(BoardError::ColumnFull(0)));
        assert_eq!(state, before);
        assert_eq!(state.legal_moves().as_slice(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn column_out_of_range() {
        let mut state = GameState::new();
        assert!(!state.is_move_legal(7));
        assert_eq!(state.play_move(7), Err(BoardError::ColumnOutOfRange(7)));
        assert_eq!(state, GameState::new());
    }

    #[test]
    fn tie() {
        let moves = tied_game();
        let mut state = GameState::new();
        let tokens = moves.split_whitespace().collect_vec();
        assert_eq!(tokens.len(), MAX_PLIES);
        for (ply, token) in tokens.iter().enumerate() {
            assert!(!state.game_finished(), "game finished early at ply {ply}");
            state.play_move(token.parse().unwrap()).unwrap();
        }
        assert_eq!(state.status(), GameStatus::Tied);
        assert_eq!(state.plies(), MAX_PLIES);
        assert!(state.legal_moves().is_empty());

        state.undo_move().unwrap();
        assert_eq!(state.status(), GameStatus::BlueToPlay);
        assert_eq!(state.legal_moves().as_slice(), &[4]);
    }

    #[test]
    fn undo_restores_state() {
        let mut state = GameState::new();
        for column in [3, 3, 4, 2, 5, 1] {
            for candidate in 0..BOARD_WIDTH {
                let before = state.clone();
                if state.play_move(candidate).is_ok() {
                    state.undo_move().unwrap();
                }
                assert_eq!(state, before);
            }
            state.play_move(column).unwrap();
        }
    }

    #[test]
    fn undo_reopens_finished_game() {
        let mut state = setup("0 0 1 1 2 2");
        let before = state.clone();
        state.play_move(3).unwrap();
        assert_eq!(state.status(), GameStatus::YellowWon);
        state.undo_move().unwrap();
        assert_eq!(state, before);
        assert_eq!(state.status().player_to_move(), Some(Player::Yellow));
    }

    #[test]
    fn empty_history() {
        let mut state = GameState::new();
        assert_eq!(state.undo_move(), Err(BoardError::GameEmpty));
        assert_eq!(state.update_status(), Err(BoardError::GameEmpty));
        assert_eq!(state, GameState::new());
    }

    #[test]
    fn legality_matches_play_move() {
        let mut state = setup("3 3 3 3 3 3 2 2 2 2 2");
        for column in 0..=BOARD_WIDTH + 1 {
            let legal = state.is_move_legal(column);
            let result = state.play_move(column);
            assert_eq!(legal, result.is_ok(), "column {column}: {result:?}");
            if result.is_ok() {
                state.undo_move().unwrap();
            }
        }
    }

    #[test]
    fn parse_moves() {
        assert!(GameState::from_moves("").is_ok());
        assert!(GameState::from_moves("3 x").is_err());
        assert!(GameState::from_moves("0 0 0 0 0 0 0").is_err());
        assert!(GameState::from_moves("9").is_err());
        assert_eq!(setup(" 1  2\n3 ").plies(), 3);
    }

    #[test]
    fn display() {
        let state = setup("3 3 4");
        assert_eq!(
            state.to_string(),
            ". . . . . . .\n\
             . . . . . . .\n\
             . . . . . . .\n\
             . . . . . . .\n\
             . . . B . . .\n\
             . . . Y Y . .\n\
             0 1 2 3 4 5 6"
        );
    }
}
