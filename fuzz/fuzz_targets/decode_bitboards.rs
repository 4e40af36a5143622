#![no_main]
use connect4_mcts::game::GameState;
use connect4_mcts::interface::{ai_move_with_rng, NO_MOVE};
use libfuzzer_sys::fuzz_target;
use rand::rngs::StdRng;
use rand::SeedableRng;

fuzz_target!(|data: [u64; 2]| {
    let [yellow, blue] = data;
    let column = ai_move_with_rng(yellow, blue, 64, &mut StdRng::seed_from_u64(0));
    match GameState::from_bitboards(yellow, blue) {
        Ok(state) if !state.legal_moves().is_empty() => {
            assert!(state.is_move_legal(column));
        },
        _ => assert_eq!(column, NO_MOVE),
    }
});
