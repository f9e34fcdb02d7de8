//! Textual carousel actions and timed event scripts.
//!
//! Script lines look like `1500ms dot 2`: a humantime offset from the start
//! of the run followed by an action. Blank lines and `#` comments are skipped.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use slidekit_core::{Command, InputEvent};

/// One thing a driver can do to a carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Input(InputEvent),
    Command(Command),
    Destroy,
    Quit,
}

impl FromStr for Action {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let mut parts = trimmed.split_whitespace();
        let head = parts.next().unwrap_or_default().to_ascii_lowercase();
        let arg = parts.next();

        let action = match (head.as_str(), arg) {
            ("goto", Some(index)) => Action::Command(Command::GoTo(
                index
                    .parse()
                    .with_context(|| format!("invalid slide index '{index}'"))?,
            )),
            ("pause", None) => Action::Command(Command::Pause),
            ("play", None) => Action::Command(Command::StartAutoplay),
            ("destroy", None) => Action::Destroy,
            ("quit" | "q", None) => Action::Quit,
            _ => {
                return trimmed
                    .parse::<InputEvent>()
                    .map(Action::Input)
                    .map_err(|err| anyhow!("{err}"));
            }
        };
        if parts.next().is_some() {
            bail!("unexpected trailing input in '{trimmed}'");
        }
        Ok(action)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Input(event) => write!(f, "{event}"),
            Action::Command(Command::GoTo(index)) => write!(f, "goto {index}"),
            Action::Command(Command::Pause) => f.write_str("pause"),
            Action::Command(Command::StartAutoplay) => f.write_str("play"),
            Action::Destroy => f.write_str("destroy"),
            Action::Quit => f.write_str("quit"),
        }
    }
}

/// An action due at a virtual time offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptedEvent {
    pub at: Duration,
    pub action: Action,
}

/// `--event` form: `<offset>:<action>`, e.g. `1500ms:dot 2`.
impl FromStr for ScriptedEvent {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (at, action) = s
            .split_once(':')
            .ok_or_else(|| anyhow!("expected <offset>:<action>, got '{s}'"))?;
        Ok(Self {
            at: parse_offset(at)?,
            action: action.parse()?,
        })
    }
}

fn parse_offset(raw: &str) -> Result<Duration> {
    humantime::parse_duration(raw.trim())
        .with_context(|| format!("invalid time offset '{}'", raw.trim()))
}

/// Parse a whole script. Events are returned ordered by offset; lines with
/// the same offset keep their file order.
pub fn parse_script(contents: &str) -> Result<Vec<ScriptedEvent>> {
    let mut events = Vec::new();
    for (idx, raw) in contents.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (offset, action) = line
            .split_once(char::is_whitespace)
            .ok_or_else(|| anyhow!("line {}: missing action", idx + 1))?;
        let event = ScriptedEvent {
            at: parse_offset(offset)
                .with_context(|| format!("line {}", idx + 1))?,
            action: action
                .parse()
                .with_context(|| format!("line {}", idx + 1))?,
        };
        events.push(event);
    }
    events.sort_by_key(|event| event.at);
    Ok(events)
}

pub fn load_script(path: &Path) -> Result<Vec<ScriptedEvent>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    parse_script(&contents)
        .with_context(|| format!("invalid script {}", path.display()))
}
