use serde::{Deserialize, Serialize};

use crate::Position;

/// Effect carried by a board square, applied once when a move ends on it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Square {
    #[default]
    Plain,
    Lucky(u8),
    Unlucky(u8),
}

impl Square {
    pub const fn is_special(self) -> bool {
        !matches!(self, Self::Plain)
    }

    /// Position reached after landing on this square at `position`.
    pub fn apply(self, position: Position) -> Position {
        match self {
            Self::Plain => position,
            Self::Lucky(amount) => position.saturating_add(amount),
            Self::Unlucky(amount) => position.saturating_sub(amount),
        }
    }

    /// Signed change in position, for display.
    pub const fn delta(self) -> i16 {
        match self {
            Self::Plain => 0,
            Self::Lucky(amount) => amount as i16,
            Self::Unlucky(amount) => -(amount as i16),
        }
    }
}
