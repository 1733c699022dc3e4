use std::{fmt, str::FromStr};

use serde::Serialize;

/// A single line of a command script.
///
/// ```text
/// # comments and blank lines are ignored
/// left
/// rotate
/// wait 300
/// soft-on
/// drop
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "command", content = "ms")]
pub enum ScriptCommand {
    Left,
    Right,
    Rotate,
    Drop,
    SoftOn,
    SoftOff,
    Pause,
    Wait(u64),
}

impl fmt::Display for ScriptCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptCommand::Left => f.write_str("left"),
            ScriptCommand::Right => f.write_str("right"),
            ScriptCommand::Rotate => f.write_str("rotate"),
            ScriptCommand::Drop => f.write_str("drop"),
            ScriptCommand::SoftOn => f.write_str("soft-on"),
            ScriptCommand::SoftOff => f.write_str("soft-off"),
            ScriptCommand::Pause => f.write_str("pause"),
            ScriptCommand::Wait(ms) => write!(f, "wait {ms}"),
        }
    }
}

impl FromStr for ScriptCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let name = words.next().ok_or("empty command")?;
        let command = match name.to_ascii_lowercase().as_str() {
            "left" => ScriptCommand::Left,
            "right" => ScriptCommand::Right,
            "rotate" => ScriptCommand::Rotate,
            "drop" => ScriptCommand::Drop,
            "soft-on" => ScriptCommand::SoftOn,
            "soft-off" => ScriptCommand::SoftOff,
            "pause" => ScriptCommand::Pause,
            "wait" => {
                let ms = words.next().ok_or("`wait` needs a duration in milliseconds")?;
                let ms = ms
                    .parse()
                    .map_err(|e| format!("invalid wait duration `{ms}`: {e}"))?;
                ScriptCommand::Wait(ms)
            }
            _ => return Err(format!("unknown command `{name}`")),
        };
        if let Some(extra) = words.next() {
            return Err(format!("unexpected argument `{extra}` after `{name}`"));
        }
        Ok(command)
    }
}

/// Parses a whole script, skipping blank lines and `#` comments.
///
/// Returns each command with its 1-based line number.
pub fn parse_script(text: &str) -> Result<Vec<(usize, ScriptCommand)>, String> {
    text.lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let line = line.split('#').next().unwrap_or_default().trim();
            (!line.is_empty()).then_some((index + 1, line))
        })
        .map(|(line_no, line)| {
            line.parse()
                .map(|command| (line_no, command))
                .map_err(|e| format!("line {line_no}: {e}"))
        })
        .collect()
}
