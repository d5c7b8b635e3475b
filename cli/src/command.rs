use std::str::FromStr;
use sweeper_core::{Coord, Coord2, Difficulty};
use thiserror::Error;

pub const HELP: &str = "\
Commands:
  r <row> <col>   reveal a cell
  f <row> <col>   toggle a flag
  n               new game
  d <level>       change difficulty (easy, medium, hard)
  h               show this help
  q               quit";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Reveal(Coord2),
    Flag(Coord2),
    NewGame,
    Difficulty(Difficulty),
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command, type `h` for help")]
    Empty,
    #[error("Unknown command `{0}`, type `h` for help")]
    Unknown(String),
    #[error("Expected `{0} <row> <col>`")]
    MissingCoords(&'static str),
    #[error("Invalid coordinate `{0}`")]
    InvalidCoord(String),
    #[error("Unknown difficulty `{0}`, expected easy, medium or hard")]
    UnknownDifficulty(String),
    #[error("Unexpected argument `{0}`")]
    TrailingArgument(String),
}

pub fn parse_difficulty(name: &str) -> Result<Difficulty, CommandError> {
    Difficulty::ALL
        .into_iter()
        .find(|difficulty| difficulty.name().eq_ignore_ascii_case(name))
        .ok_or_else(|| CommandError::UnknownDifficulty(name.to_owned()))
}

fn parse_coord(word: &str) -> Result<Coord, CommandError> {
    word.parse()
        .map_err(|_| CommandError::InvalidCoord(word.to_owned()))
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(CommandError::Empty)?;

        let command = match name.to_ascii_lowercase().as_str() {
            "r" | "reveal" => {
                let (Some(row), Some(col)) = (words.next(), words.next()) else {
                    return Err(CommandError::MissingCoords("r"));
                };
                Command::Reveal((parse_coord(row)?, parse_coord(col)?))
            }
            "f" | "flag" => {
                let (Some(row), Some(col)) = (words.next(), words.next()) else {
                    return Err(CommandError::MissingCoords("f"));
                };
                Command::Flag((parse_coord(row)?, parse_coord(col)?))
            }
            "n" | "new" => Command::NewGame,
            "d" | "difficulty" => {
                let level = words
                    .next()
                    .ok_or_else(|| CommandError::UnknownDifficulty(String::new()))?;
                Command::Difficulty(parse_difficulty(level)?)
            }
            "h" | "help" | "?" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            _ => return Err(CommandError::Unknown(name.to_owned())),
        };

        match words.next() {
            Some(extra) => Err(CommandError::TrailingArgument(extra.to_owned())),
            None => Ok(command),
        }
    }
}
