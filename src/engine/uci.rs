//! Parsing of the UCI-like text commands understood by
//! [`crate::Engine::protocol_loop`].

#[derive(Debug, PartialEq)]
pub(super) enum Command {
    Uci,
    IsReady,
    SetOption(EngineOption),
    SetPosition {
        /// Packed `(yellow, blue)` masks, [`None`] for the empty board.
        bitboards: Option<(u64, u64)>,
        moves: Vec<String>,
    },
    NewGame,
    Go {
        nodes: Option<u32>,
        seed: Option<u64>,
    },
    Display,
    Quit,
    Unknown(String),
}

#[derive(Debug, PartialEq)]
pub(super) enum EngineOption {
    Nodes(u32),
    Exploration(f64),
    /// [`None`] seeds every search from the OS.
    Seed(Option<u64>),
}

/// Accepts decimal and `0x`-prefixed hexadecimal masks.
fn parse_mask(token: &str) -> Option<u64> {
    token.strip_prefix("0x").map_or_else(
        || token.parse().ok(),
        |hex| u64::from_str_radix(hex, 16).ok(),
    )
}

fn parse_go(parts: &[&str]) -> Command {
    let mut nodes = None;
    let mut seed = None;

    let mut i = 1;
    while i < parts.len() {
        match parts[i] {
            "nodes" if i + 1 < parts.len() => nodes = parts[i + 1].parse().ok(),
            "seed" if i + 1 < parts.len() => seed = parts[i + 1].parse().ok(),
            _ => {},
        }
        i += 2;
    }

    Command::Go { nodes, seed }
}

fn parse_setoption(parts: &[&str]) -> Option<Command> {
    let (&"name", rest) = parts.get(1..)?.split_first()? else {
        return None;
    };
    let value_index = rest.iter().position(|&x| x == "value")?;
    let name = rest[..value_index].join(" ");
    let value = rest.get(value_index + 1)?;
    let option = match name.as_str() {
        "Nodes" => EngineOption::Nodes(value.parse().ok().filter(|&nodes| nodes > 0)?),
        "Exploration" => {
            EngineOption::Exploration(value.parse().ok().filter(|c: &f64| c.is_finite() && *c >= 0.0)?)
        },
        "Seed" if *value == "none" => EngineOption::Seed(None),
        "Seed" => EngineOption::Seed(Some(value.parse().ok()?)),
        _ => return None,
    };
    Some(Command::SetOption(option))
}

fn parse_setposition(parts: &[&str]) -> Option<Command> {
    let moves_index = parts.iter().position(|&x| x == "moves");
    let setup = &parts[1..moves_index.unwrap_or(parts.len())];
    let bitboards = match setup {
        ["startpos"] => None,
        ["bitboards", yellow, blue] => Some((parse_mask(yellow)?, parse_mask(blue)?)),
        _ => return None,
    };
    let moves = moves_index.map_or_else(Vec::new, |index| {
        parts[index + 1..].iter().map(|s| (*s).to_string()).collect()
    });
    Some(Command::SetPosition { bitboards, moves })
}

impl Command {
    pub(super) fn parse(input: &str) -> Self {
        let parts: Vec<&str> = input.split_whitespace().collect();

        let command = match parts.first() {
            Some(&"uci") => Some(Self::Uci),
            Some(&"isready") => Some(Self::IsReady),
            Some(&"setoption") => parse_setoption(&parts),
            Some(&"position") => parse_setposition(&parts),
            Some(&"ucinewgame") => Some(Self::NewGame),
            Some(&"go") => Some(parse_go(&parts)),
            Some(&"d") => Some(Self::Display),
            Some(&"quit") => Some(Self::Quit),
            _ => None,
        };
        command.unwrap_or_else(|| Self::Unknown(input.trim().to_string()))
    }
}
