//! Entry point for callers that exchange positions as packed bitboards (see
//! [`crate::game::bitboard`]) and want a single column back.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game::GameState;
use crate::search;

/// Returned instead of a column when no move can be produced.
pub const NO_MOVE: u8 = 7;

/// Decodes the position and searches it with a tree of `budget` nodes.
///
/// Returns the chosen column in `0..7` or [`NO_MOVE`] when the masks do not
/// describe a valid board, the budget is empty or the game is already over.
///
/// Decoding is strict: a cell claimed by both masks or a piece above an empty
/// cell is rejected with [`NO_MOVE`] rather than repaired. See
/// [`GameState::from_bitboards`](crate::game::GameState::from_bitboards).
#[must_use]
pub fn ai_move(yellow: u64, blue: u64, budget: u32) -> u8 {
    ai_move_with_rng(yellow, blue, budget, &mut StdRng::from_entropy())
}

/// [`ai_move`] with an explicit random source.
///
/// ```
/// use connect4_mcts::game::bitboard::TURN_INDICATOR;
/// use connect4_mcts::interface::{ai_move_with_rng, NO_MOVE};
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let mut rng = StdRng::seed_from_u64(0);
/// assert_eq!(ai_move_with_rng(TURN_INDICATOR, 0, 1, &mut rng), 0);
/// // Both players claim the bottom cell of column 0.
/// assert_eq!(ai_move_with_rng(1, 1, 100, &mut rng), NO_MOVE);
/// ```
#[must_use]
pub fn ai_move_with_rng<R: Rng + ?Sized>(yellow: u64, blue: u64, budget: u32, rng: &mut R) -> u8 {
    let mut state = match GameState::from_bitboards(yellow, blue) {
        Ok(state) => state,
        Err(e) => {
            log::warn!("rejected position {yellow:#x} {blue:#x}: {e}");
            return NO_MOVE;
        },
    };
    match search::monte_carlo_best_move(&mut state, budget, rng) {
        Ok(column) => column,
        Err(e) => {
            log::warn!("search with budget {budget} failed: {e}");
            NO_MOVE
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::bitboard::TURN_INDICATOR;
    use crate::game::core::cell;

    fn seeded() -> StdRng {
        StdRng::seed_from_u64(2024)
    }

    #[test]
    fn empty_board() {
        assert_eq!(ai_move_with_rng(TURN_INDICATOR, 0, 1, &mut seeded()), 0);
        assert!(ai_move(TURN_INDICATOR, 0, 200) < NO_MOVE);
    }

    #[test]
    fn single_legal_column() {
        let state = GameState::from_moves(
            "0 2 2 0 0 2 2 0 0 2 2 0 \
             1 3 3 1 1 3 3 1 1 3 3 1 \
             5 5 5 5 5 5 4 4 4 4 4 4",
        )
        .unwrap();
        assert_eq!(state.legal_moves().as_slice(), &[6]);
        let (yellow, blue) = state.to_bitboards();
        for budget in [1, 2, 50, 1000] {
            assert_eq!(ai_move_with_rng(yellow, blue, budget, &mut seeded()), 6);
        }
    }

    #[test]
    fn finds_winning_move_for_blue() {
        // Blue has three in the bottom row at columns 1..=3, column 0 is taken.
        let yellow = (1 << cell(0, 0)) | (1 << cell(1, 1)) | (1 << cell(2, 1));
        let blue = (1 << cell(1, 0)) | (1 << cell(2, 0)) | (1 << cell(3, 0));
        assert_eq!(ai_move_with_rng(yellow, blue, 4000, &mut seeded()), 4);
    }

    #[test]
    fn rejected_inputs() {
        let floating = 1 << cell(3, 4);
        assert_eq!(ai_move_with_rng(floating, 0, 100, &mut seeded()), NO_MOVE);
        assert_eq!(ai_move_with_rng(TURN_INDICATOR, 0, 0, &mut seeded()), NO_MOVE);

        // Existing wins are not detected: the board decodes with Blue to move.
        let won = GameState::from_moves("0 1 0 1 0 1 0").unwrap();
        let (yellow, blue) = won.to_bitboards();
        assert!(ai_move_with_rng(yellow, blue, 100, &mut seeded()) < NO_MOVE);
    }
}
