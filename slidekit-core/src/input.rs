//! Discrete user actions forwarded by an input source

use std::fmt;
use std::str::FromStr;

/// User action delivered to `CarouselController::handle_input`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    PrevClicked,
    NextClicked,
    /// A pagination dot was clicked; carries the dot slot, not the slide.
    DotClicked(usize),
    PointerEntered,
    PointerLeft,
}

impl fmt::Display for InputEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PrevClicked => write!(f, "prev"),
            Self::NextClicked => write!(f, "next"),
            Self::DotClicked(slot) => write!(f, "dot {slot}"),
            Self::PointerEntered => write!(f, "enter"),
            Self::PointerLeft => write!(f, "leave"),
        }
    }
}

/// Programmatic operation, as opposed to a wired user control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Jump to a slide; out-of-range indices wrap.
    GoTo(i64),
    Pause,
    StartAutoplay,
}

/// Parse failure for the textual input form (`next`, `dot 3`, ...).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized input '{0}'")]
pub struct ParseInputError(pub String);

impl FromStr for InputEvent {
    type Err = ParseInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let head = parts.next().unwrap_or_default().to_ascii_lowercase();
        let arg = parts.next();
        let event = match (head.as_str(), arg) {
            ("prev" | "left", None) => Self::PrevClicked,
            ("next" | "right", None) => Self::NextClicked,
            ("dot", Some(slot)) => Self::DotClicked(
                slot.parse().map_err(|_| ParseInputError(s.to_string()))?,
            ),
            ("enter" | "hover", None) => Self::PointerEntered,
            ("leave", None) => Self::PointerLeft,
            _ => return Err(ParseInputError(s.to_string())),
        };
        if parts.next().is_some() {
            return Err(ParseInputError(s.to_string()));
        }
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_textual_form() {
        assert_eq!("next".parse(), Ok(InputEvent::NextClicked));
        assert_eq!(" Prev ".parse(), Ok(InputEvent::PrevClicked));
        assert_eq!("dot 4".parse(), Ok(InputEvent::DotClicked(4)));
        assert_eq!("hover".parse(), Ok(InputEvent::PointerEntered));
        assert!("dot".parse::<InputEvent>().is_err());
        assert!("dot x".parse::<InputEvent>().is_err());
        assert!("next 2".parse::<InputEvent>().is_err());
    }

    #[test]
    fn display_round_trips_through_parse() {
        let event = InputEvent::DotClicked(7);
        assert_eq!(event.to_string().parse(), Ok(event));
    }
}
