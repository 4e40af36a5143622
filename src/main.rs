use std::io;

use anyhow::bail;
use flexi_logger::Logger;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr, stdout is reserved for the protocol.
    let _logger = Logger::try_with_env_or_str("warn")?
        .format(flexi_logger::colored_default_format)
        .start()?;

    match std::env::args().nth(1).as_deref() {
        Some("bench") => connect4_mcts::bench(&mut io::stdout().lock()),
        Some(argument) => bail!("unknown argument: {argument}, expected `bench` or nothing"),
        None => {
            connect4_mcts::print_engine_info();
            connect4_mcts::print_binary_info();
            let mut engine = connect4_mcts::Engine::new();
            engine.protocol_loop(&mut io::stdin().lock(), &mut io::stdout().lock())
        },
    }
}
