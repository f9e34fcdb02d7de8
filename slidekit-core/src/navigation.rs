//! Circular index arithmetic and transition origins

/// Direction of a single-step advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub const fn step(self) -> i64 {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }

    pub const fn reverse(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

/// What caused a transition.
///
/// Only `UserAction` resets the interaction quiet period; autoplay ticks
/// must never suppress themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// The autoplay clock advancing the carousel.
    Tick,
    /// A person touching a control (arrow, dot, programmatic user call).
    UserAction,
}

impl Origin {
    pub const fn is_user(self) -> bool {
        matches!(self, Self::UserAction)
    }
}

/// Normalize any integer onto `[0, total)` with modular wraparound.
///
/// `total` must be non-zero; decks are never empty.
pub fn wrap_index(index: i64, total: usize) -> usize {
    debug_assert!(total > 0, "wrap_index on an empty deck");
    index.rem_euclid(total as i64) as usize
}

/// Index reached by stepping once from `current`.
pub fn step_index(current: usize, direction: Direction, total: usize) -> usize {
    wrap_index(current as i64 + direction.step(), total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_in_both_directions() {
        assert_eq!(step_index(4, Direction::Forward, 5), 0);
        assert_eq!(step_index(0, Direction::Backward, 5), 4);
        assert_eq!(step_index(0, Direction::Forward, 1), 0);
        assert_eq!(step_index(0, Direction::Backward, 1), 0);
    }

    #[test]
    fn arbitrary_integers_normalize() {
        for total in 1..=7usize {
            for k in -30i64..30 {
                let expected =
                    (((k % total as i64) + total as i64) % total as i64) as usize;
                assert_eq!(wrap_index(k, total), expected, "k={k} n={total}");
            }
        }
    }

    #[test]
    fn forward_then_backward_is_identity() {
        for total in 2..=6usize {
            for start in 0..total {
                let there = step_index(start, Direction::Forward, total);
                let back = step_index(there, Direction::Backward, total);
                assert_eq!(back, start);
            }
        }
    }
}
