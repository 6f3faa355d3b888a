//! Line command parsing

use anyhow::{anyhow, bail, Context, Result};
use cellflow::Position;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Set(Position, String),
    Get(Position),
    Clear(Position),
    Size,
    Values,
    Texts,
    Refs(Position),
}

impl Command {
    /// Parse one script line; blank lines and `#` comments yield `None`
    ///
    /// Everything after the position of a `set` (one separating space
    /// removed) is the cell text, verbatim.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let trimmed = line.trim_start();
        if trimmed.trim_end().is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }

        let (keyword, rest) = trimmed.split_once(' ').unwrap_or((trimmed, ""));
        let command = match keyword {
            "set" => {
                let rest = rest.trim_start();
                let (cell, text) = rest.split_once(' ').unwrap_or((rest, ""));
                Command::Set(position(cell)?, text.to_string())
            }
            "get" => Command::Get(single_position(keyword, rest)?),
            "clear" => Command::Clear(single_position(keyword, rest)?),
            "refs" => Command::Refs(single_position(keyword, rest)?),
            "size" | "values" | "texts" => {
                if !rest.trim().is_empty() {
                    bail!("'{}' takes no arguments", keyword);
                }
                match keyword {
                    "size" => Command::Size,
                    "values" => Command::Values,
                    _ => Command::Texts,
                }
            }
            other => bail!("unknown command '{}'", other),
        };
        Ok(Some(command))
    }
}

fn single_position(keyword: &str, rest: &str) -> Result<Position> {
    let mut args = rest.split_whitespace();
    let cell = args
        .next()
        .ok_or_else(|| anyhow!("'{}' needs a cell position", keyword))?;
    if args.next().is_some() {
        bail!("'{}' takes a single cell position", keyword);
    }
    position(cell)
}

fn position(text: &str) -> Result<Position> {
    if text.is_empty() {
        bail!("missing cell position");
    }
    Position::parse(text).with_context(|| format!("bad cell position '{}'", text))
}
