#![no_main]
use connect4_mcts::game::GameState;
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;

// Every byte is a column, most of them out of range or illegal.
fuzz_target!(|data: &[u8]| {
    let mut state = GameState::new();
    let mut played = vec![state.clone()];
    for &column in data {
        let legal = state.is_move_legal(column);
        let before = state.clone();
        match state.play_move(column) {
            Ok(()) => {
                assert!(legal);
                played.push(state.clone());
            },
            Err(_) => {
                assert!(!legal);
                assert_eq!(state, before);
            },
        }
    }
    assert_eq!(state.plies() + 1, played.len());
    while played.pop().is_some() {
        if let Some(previous) = played.last() {
            state.undo_move().expect("every played move can be taken back");
            assert_eq!(&state, previous);
        }
    }
    assert!(state.undo_move().is_err());
});
