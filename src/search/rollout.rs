//! Random playouts and the [`Line`] guard that takes their moves back.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::game::core::{BoardError, Column, GameStatus};
use crate::game::GameState;

/// Sequence of moves played on top of a borrowed [`GameState`].
///
/// Whatever is still played when the line goes out of scope is undone, so the
/// borrowed state is handed back exactly as it was received even when a
/// search round bails out early.
#[derive(Debug)]
pub(super) struct Line<'s> {
    state: &'s mut GameState,
    played: usize,
}

impl<'s> Line<'s> {
    pub(super) fn new(state: &'s mut GameState) -> Self {
        Self { state, played: 0 }
    }

    pub(super) fn state(&self) -> &GameState {
        self.state
    }

    pub(super) const fn played(&self) -> usize {
        self.played
    }

    pub(super) fn play(&mut self, column: Column) -> Result<(), BoardError> {
        self.state.play_move(column)?;
        self.played += 1;
        Ok(())
    }

    /// Takes back the last move of this line. Moves played before the line
    /// was started are out of reach.
    pub(super) fn undo(&mut self) -> Result<(), BoardError> {
        if self.played == 0 {
            return Err(BoardError::GameEmpty);
        }
        self.state.undo_move()?;
        self.played -= 1;
        Ok(())
    }

    /// Takes back every move of this line.
    pub(super) fn unwind(&mut self) -> Result<(), BoardError> {
        while self.played > 0 {
            self.undo()?;
        }
        Ok(())
    }

    /// Starts a nested line on the current position. Its moves are taken back
    /// when it is dropped, before this line can be used again.
    pub(super) fn branch(&mut self) -> Line<'_> {
        Line::new(self.state)
    }
}

impl Drop for Line<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.unwind() {
            log::error!("failed to take back {} moves: {e}", self.played);
        }
    }
}

/// Picks a legal move uniformly at random, [`None`] if there are none.
pub fn random_move<R: Rng + ?Sized>(state: &GameState, rng: &mut R) -> Option<Column> {
    state.legal_moves().choose(rng).copied()
}

/// Plays random moves from `state` until the game ends and scores the result
/// for the side to move in `state`: 1 is a win and 0 is a loss. A tie is
/// scored by a fair coin toss.
///
/// The state is restored before returning.
///
/// # Errors
///
/// Propagates [`BoardError`] if the position can not be played on or the
/// moves can not be taken back.
pub fn rollout<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) -> Result<u32, BoardError> {
    simulate(&mut Line::new(state), rng)
}

pub(super) fn simulate<R: Rng + ?Sized>(
    parent: &mut Line<'_>,
    rng: &mut R,
) -> Result<u32, BoardError> {
    let mut line = parent.branch();
    let mut result = 0;
    while let Some(column) = random_move(line.state(), rng) {
        line.play(column)?;
        result = 1 - result;
    }
    if line.state().status() == GameStatus::Tied {
        result = u32::from(rng.gen_bool(0.5));
    }
    line.unwind()?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn line_takes_moves_back() {
        let mut state = GameState::from_moves("3").unwrap();
        let before = state.clone();
        {
            let mut line = Line::new(&mut state);
            line.play(2).unwrap();
            line.play(2).unwrap();
            assert_eq!(line.played(), 2);
            assert_eq!(line.state().plies(), 3);
            line.undo().unwrap();
            assert_eq!(line.played(), 1);
        }
        assert_eq!(state, before);
    }

    #[test]
    fn line_does_not_undo_earlier_moves() {
        let mut state = GameState::from_moves("0 1").unwrap();
        let mut line = Line::new(&mut state);
        assert_eq!(line.undo(), Err(BoardError::GameEmpty));
        assert_eq!(line.play(7), Err(BoardError::ColumnOutOfRange(7)));
        assert_eq!(line.played(), 0);
        drop(line);
        assert_eq!(state.plies(), 2);
    }

    #[test]
    fn branch_unwinds_before_parent() {
        let mut state = GameState::new();
        let mut line = Line::new(&mut state);
        line.play(4).unwrap();
        {
            let mut branch = line.branch();
            branch.play(4).unwrap();
            branch.play(5).unwrap();
            assert_eq!(branch.state().plies(), 3);
        }
        assert_eq!(line.state().plies(), 1);
        line.undo().unwrap();
        drop(line);
        assert_eq!(state, GameState::new());
    }

    #[test]
    fn rollout_restores_state() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = GameState::from_moves("3 3 4").unwrap();
        let before = state.clone();
        for _ in 0..100 {
            let result = rollout(&mut state, &mut rng).unwrap();
            assert!(result <= 1);
            assert_eq!(state, before);
        }
    }

    #[test]
    fn rollout_of_finished_game() {
        let mut rng = StdRng::seed_from_u64(5);
        // Yellow just won, so Blue is scored a loss without playing.
        let mut won = GameState::from_moves("0 1 0 1 0 1 0").unwrap();
        assert_eq!(rollout(&mut won, &mut rng), Ok(0));
    }

    #[test]
    fn tie_is_a_coin_toss() {
        // Blue fills the last cell of column 4 without connecting four.
        let mut state = GameState::from_moves(
            "0 2 2 0 0 2 2 0 0 2 2 0 \
             1 3 3 1 1 3 3 1 1 3 3 1 \
             5 5 5 5 5 5 \
             4 6 6 4 4 6 6 4 4 6 6",
        )
        .unwrap();
        assert_eq!(state.legal_moves().as_slice(), &[4]);
        let before = state.clone();

        let mut rng = StdRng::seed_from_u64(13);
        let mut wins = 0;
        for _ in 0..400 {
            wins += rollout(&mut state, &mut rng).unwrap();
            assert_eq!(state, before);
        }
        assert!((100..300).contains(&wins), "{wins} wins out of 400");
    }

    #[test]
    fn forced_move() {
        let mut rng = StdRng::seed_from_u64(9);
        let state = GameState::from_moves("0 0 0 0 0 0 1 1 1 1 1 1").unwrap();
        for _ in 0..20 {
            let column = random_move(&state, &mut rng).unwrap();
            assert!((2..7).contains(&column));
        }
        let finished = GameState::from_moves("0 1 0 1 0 1 0").unwrap();
        assert_eq!(random_move(&finished, &mut rng), None);
    }
}
