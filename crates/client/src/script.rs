//! Command scripts for the headless driver.
//!
//! A script is a whitespace-separated list of steps. `#` starts a
//! comment that runs to the end of the line.
//!
//! ```text
//! roll right right up-right   # climb
//! die:b left look:3,4 show
//! ```

use std::str::FromStr;

use game_core::{Command, DieSlot, Direction, Position};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScriptStep {
    Run(Command),
    /// Print the current map and status line.
    Show,
    /// Print the inspection hint of a cell.
    Look(Position),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("line {line}: unknown step `{token}`")]
    UnknownStep { line: usize, token: String },

    #[error("line {line}: bad argument in `{token}`")]
    BadArgument { line: usize, token: String },
}

pub fn parse_script(script: &str) -> Result<Vec<ScriptStep>, ScriptError> {
    let mut steps = Vec::new();
    for (index, raw_line) in script.lines().enumerate() {
        let line = raw_line.split('#').next().unwrap_or_default();
        for token in line.split_whitespace() {
            steps.push(parse_step(token, index + 1)?);
        }
    }
    Ok(steps)
}

fn parse_step(token: &str, line: usize) -> Result<ScriptStep, ScriptError> {
    let lower = token.to_ascii_lowercase();
    let (head, arg) = match lower.split_once(':') {
        Some((head, arg)) => (head, Some(arg)),
        None => (lower.as_str(), None),
    };
    let bad_argument = || ScriptError::BadArgument {
        line,
        token: token.to_owned(),
    };

    let step = match (head, arg) {
        ("roll", None) => ScriptStep::Run(Command::Roll),
        ("tick", None) => ScriptStep::Run(Command::Tick),
        ("show", None) => ScriptStep::Show,
        ("die", Some(slot)) => {
            let slot = DieSlot::from_str(slot).map_err(|_| bad_argument())?;
            ScriptStep::Run(Command::SelectDie(slot))
        }
        ("look", Some(at)) => ScriptStep::Look(parse_position(at).ok_or_else(bad_argument)?),
        (name, None) => match Direction::from_str(name) {
            Ok(direction) => ScriptStep::Run(Command::Move(direction)),
            Err(_) => {
                return Err(ScriptError::UnknownStep {
                    line,
                    token: token.to_owned(),
                });
            }
        },
        _ => {
            return Err(ScriptError::UnknownStep {
                line,
                token: token.to_owned(),
            });
        }
    };
    Ok(step)
}

fn parse_position(raw: &str) -> Option<Position> {
    let (x, y) = raw.split_once(',')?;
    Some(Position::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
}
