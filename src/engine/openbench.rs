//! Implementing [`bench`] command is a [requirement for OpenBench], which
//! compares engine builds by searching a fixed workload and reading the
//! node count and speed back.
//!
//! [requirement for OpenBench]: https://github.com/AndyGrant/OpenBench/wiki/Requirements-For-Public-Engines#basic-requirements

use std::io::Write;
use std::time::Instant;

use anyhow::Context;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::game::GameState;
use crate::search::{Search, DEFAULT_EXPLORATION};

/// Openings, middlegames and a nearly full board, as move lists from the
/// empty board.
const POSITIONS: [&str; 6] = [
    "",
    "3 3 3 3",
    "3 2 4 5 3 3 2 4",
    "0 1 2 3 4 5 6 6 5 4 3 2 1 0",
    "3 3 3 4 4 2 2 4 5 1 5 5 6",
    "0 2 2 0 0 2 2 0 0 2 2 0 1 3 3 1 1 3 3 1 1 3 3 1 5 5 5 5 5 5",
];

/// Tree size for every position.
const NODES: u32 = 20_000;

const SEED: u64 = 0x00C0_FFEE;

/// Searches [`POSITIONS`] with a fixed budget and seed and reports the total
/// number of tree nodes and the speed as `<nodes> nodes <nps> nps`.
///
/// NOTE: This function **has to run less than 60 seconds**.
///
/// # Errors
///
/// Fails if a position can not be set up or searched, or the report can not
/// be written.
pub fn bench(output: &mut impl Write) -> anyhow::Result<()> {
    let start = Instant::now();
    let mut nodes: u64 = 0;
    for moves in POSITIONS {
        let mut state = GameState::from_moves(moves)?;
        let mut rng = StdRng::seed_from_u64(SEED);
        let search = Search::run(&mut state, NODES, DEFAULT_EXPLORATION, &mut rng)
            .with_context(|| format!("searching position \"{moves}\""))?;
        nodes += u64::try_from(search.tree().len())?;
    }
    let micros = start.elapsed().as_micros().max(1);
    let nps = u128::from(nodes) * 1_000_000 / micros;
    writeln!(output, "{nodes} nodes {nps} nps")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_playable() {
        for moves in POSITIONS {
            let state = GameState::from_moves(moves).unwrap();
            assert!(!state.game_finished(), "{moves}");
        }
    }
}
