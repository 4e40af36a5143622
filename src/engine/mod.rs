//! The engine puts all pieces together: it keeps the current position and
//! search settings and speaks a small text protocol modelled on the
//! [Universal Chess Interface] (UCI), so that a game runner or a person at a
//! terminal can drive it.
//!
//! [`Engine::protocol_loop`] is the "main loop" of the engine which
//! communicates with the environment and executes commands from the input
//! stream.
//!
//! [Universal Chess Interface]: https://www.chessprogramming.org/UCI

use std::io::{BufRead, Write};
use std::time::Instant;

use anyhow::Context;
use itertools::Itertools;

use crate::engine::uci::{Command, EngineOption};
use crate::game::core::column_of;
use crate::game::GameState;
use crate::search::{Config, Search};

mod openbench;
mod uci;

pub use openbench::bench;

/// The Engine connects everything together and handles commands sent by the
/// client, including I/O.
#[derive(Debug, Default)]
pub struct Engine {
    state: GameState,
    config: Config,
}

impl Engine {
    /// Creates a new instance of the engine with the empty board and default
    /// search settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current position.
    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// Settings for the next `go`.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Continuously reads the input stream and executes sent commands until
    /// "quit" is sent or the input ends.
    ///
    /// Malformed or unsupported commands are answered with an
    /// `info string` line and otherwise ignored; the previous position and
    /// settings stay in effect.
    ///
    /// # Errors
    ///
    /// Fails only when reading the input or writing the output fails.
    pub fn protocol_loop(
        &mut self,
        input: &mut impl BufRead,
        output: &mut impl Write,
    ) -> anyhow::Result<()> {
        for line in input.lines() {
            let line = line.context("reading command")?;
            match Command::parse(&line) {
                Command::Uci => self.handle_uci(output)?,
                Command::IsReady => writeln!(output, "readyok")?,
                Command::SetOption(option) => self.handle_setoption(option),
                Command::SetPosition { bitboards, moves } => {
                    match Self::setup_position(bitboards, &moves) {
                        Ok(state) => self.state = state,
                        Err(e) => writeln!(output, "info string Invalid position: {e:#}")?,
                    }
                },
                Command::NewGame => self.state = GameState::new(),
                Command::Go { nodes, seed } => self.handle_go(nodes, seed, output)?,
                Command::Display => self.handle_display(output)?,
                Command::Quit => break,
                Command::Unknown(command) if command.is_empty() => {},
                Command::Unknown(command) => {
                    writeln!(output, "info string Unsupported command: {command}")?;
                },
            }
            output.flush()?;
        }
        Ok(())
    }

    /// Responds to the `uci` handshake command by identifying the engine and
    /// listing its options.
    fn handle_uci(&self, output: &mut impl Write) -> anyhow::Result<()> {
        writeln!(
            output,
            "id name {} {}",
            env!("CARGO_PKG_NAME"),
            crate::engine_version()
        )?;
        writeln!(output, "id author {}", env!("CARGO_PKG_AUTHORS"))?;
        writeln!(
            output,
            "option name Nodes type spin default {} min 1 max {}",
            self.config.nodes,
            u32::MAX
        )?;
        writeln!(
            output,
            "option name Exploration type string default {}",
            self.config.exploration
        )?;
        writeln!(output, "option name Seed type string default none")?;
        writeln!(output, "uciok")?;
        Ok(())
    }

    fn handle_setoption(&mut self, option: EngineOption) {
        match option {
            EngineOption::Nodes(nodes) => self.config.nodes = nodes,
            EngineOption::Exploration(exploration) => self.config.exploration = exploration,
            EngineOption::Seed(seed) => self.config.seed = seed,
        }
        log::debug!("search settings: {:?}", self.config);
    }

    fn setup_position(bitboards: Option<(u64, u64)>, moves: &[String]) -> anyhow::Result<GameState> {
        let mut state = match bitboards {
            None => GameState::new(),
            Some((yellow, blue)) => GameState::from_bitboards(yellow, blue)
                .with_context(|| format!("bitboards {yellow:#x} {blue:#x}"))?,
        };
        if !moves.is_empty() {
            state.play_moves(&moves.join(" "))?;
        }
        Ok(state)
    }

    /// Searches the current position and reports the chosen column. The
    /// position itself does not change.
    fn handle_go(
        &mut self,
        nodes: Option<u32>,
        seed: Option<u64>,
        output: &mut impl Write,
    ) -> anyhow::Result<()> {
        let config = Config {
            nodes: nodes.unwrap_or(self.config.nodes),
            seed: seed.or(self.config.seed),
            ..self.config
        };
        let mut rng = config.rng();
        let start = Instant::now();
        let search = match Search::run(&mut self.state, config.nodes, config.exploration, &mut rng) {
            Ok(search) => search,
            Err(e) => {
                log::warn!("search failed: {e}");
                writeln!(output, "info string Search failed: {e}")?;
                writeln!(output, "bestmove none")?;
                return Ok(());
            },
        };
        let elapsed = start.elapsed();

        let visits = search
            .tree()
            .root()
            .moves()
            .map(|(column, stats)| format!("{column}:{}", stats.visits))
            .join(" ");
        writeln!(
            output,
            "info nodes {} rounds {} visits {visits} time {}",
            search.tree().len(),
            search.rounds(),
            elapsed.as_millis()
        )?;
        match search.best_move() {
            Some(column) => writeln!(output, "bestmove {column}")?,
            None => writeln!(output, "bestmove none")?,
        }
        Ok(())
    }

    fn handle_display(&self, output: &mut impl Write) -> anyhow::Result<()> {
        let (yellow, blue) = self.state.to_bitboards();
        writeln!(output, "{}", self.state)?;
        writeln!(output, "status: {}", self.state.status())?;
        writeln!(output, "bitboards: {yellow:#x} {blue:#x}")?;
        if self.state.plies() > 0 {
            writeln!(
                output,
                "moves: {}",
                self.state
                    .history()
                    .iter()
                    .map(|&cell| column_of(cell))
                    .join(" ")
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn send(engine: &mut Engine, input: &str) -> String {
        let mut output = Vec::new();
        engine
            .protocol_loop(&mut input.as_bytes(), &mut output)
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn handshake() {
        let output = send(&mut Engine::new(), "uci\nisready\nquit\nisready\n");
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[0].starts_with("id name connect4-mcts "));
        assert!(lines[1].starts_with("id author "));
        assert_eq!(lines[lines.len() - 2], "uciok");
        assert_eq!(lines[lines.len() - 1], "readyok");
    }

    #[test]
    fn options() {
        let mut engine = Engine::new();
        let output = send(
            &mut engine,
            "setoption name Nodes value 100\nsetoption name Seed value 5\n\
             setoption name Exploration value 2.5\nsetoption name Hash value 1\n",
        );
        assert_eq!(
            output,
            "info string Unsupported command: setoption name Hash value 1\n"
        );
        assert_eq!(engine.config().nodes, 100);
        assert_eq!(engine.config().seed, Some(5));
        assert!((engine.config().exploration - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn position_and_display() {
        let mut engine = Engine::new();
        let output = send(&mut engine, "position startpos moves 3 3 4\nd\n");
        assert_eq!(engine.state(), &GameState::from_moves("3 3 4").unwrap());
        assert!(output.contains("status: blue to play\n"));
        assert!(output.ends_with("moves: 3 3 4\n"));

        let output = send(&mut engine, "position startpos moves 3 9\n");
        assert!(output.starts_with("info string Invalid position: "));
        assert_eq!(engine.state(), &GameState::from_moves("3 3 4").unwrap());

        let _ = send(&mut engine, "ucinewgame\n");
        assert_eq!(engine.state(), &GameState::new());

        let (yellow, blue) = GameState::from_moves("0 1").unwrap().to_bitboards();
        let _ = send(
            &mut engine,
            &format!("position bitboards {yellow} {blue} moves 2\n"),
        );
        assert_eq!(engine.state().status(), crate::game::core::GameStatus::BlueToPlay);
        assert_eq!(engine.state().plies(), 1);

        let output = send(&mut engine, "position bitboards 1 1\n");
        assert!(output.starts_with("info string Invalid position: bitboards 0x1 0x1: "));
    }

    #[test]
    fn go() {
        let mut engine = Engine::new();
        let output = send(&mut engine, "go nodes 1\n");
        assert!(output.starts_with("info nodes 1 rounds 0 visits 0:0 1:0 2:0 3:0 4:0 5:0 6:0 time "));
        assert!(output.ends_with("bestmove 0\n"));

        let first = send(&mut engine, "position startpos moves 3\ngo nodes 2000 seed 11\n");
        let second = send(&mut engine, "go nodes 2000 seed 11\n");
        let strip = |s: &str| s.split(" time ").next().unwrap_or_default().to_string();
        assert_eq!(strip(&first), strip(&second));
        assert_eq!(
            first.lines().last().unwrap_or_default(),
            second.lines().last().unwrap_or_default()
        );
        assert_eq!(engine.state(), &GameState::from_moves("3").unwrap());
    }

    #[test]
    fn go_without_moves() {
        let mut engine = Engine::new();
        let output = send(
            &mut engine,
            "position startpos moves 0 1 0 1 0 1 0\ngo nodes 50\ngo nodes 0\n",
        );
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[0].starts_with("info nodes 1 rounds 49 visits  time "));
        assert_eq!(lines[1], "bestmove none");
        assert_eq!(lines[2], "info string Search failed: node budget must be at least 1");
        assert_eq!(lines[3], "bestmove none");
    }
}
