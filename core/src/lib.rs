#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use board::*;
pub use dice::*;
pub use engine::*;
pub use error::*;
pub use player::*;
pub use power::*;
pub use square::*;
pub use stats::*;
pub use types::*;

mod board;
mod dice;
mod engine;
mod error;
mod player;
mod power;
mod square;
pub mod stats;
mod types;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ruleset {
    /// Straight race, no powers.
    Classic,
    /// Menu and power selection before the race, one power per player.
    #[default]
    Powers,
}

impl Ruleset {
    pub const fn has_powers(self) -> bool {
        matches!(self, Self::Powers)
    }

    pub fn board(self) -> Board {
        match self {
            Self::Classic => Board::classic(),
            Self::Powers => Board::powers(),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub ruleset: Ruleset,
    /// Upper bound on squares moved in one turn. `None` moves by the full dice sum.
    pub max_step: Option<Pips>,
}

impl GameConfig {
    pub const fn new(ruleset: Ruleset) -> Self {
        Self {
            ruleset,
            max_step: None,
        }
    }

    pub const fn with_max_step(self, max_step: Option<Pips>) -> Self {
        Self { max_step, ..self }
    }

    /// Squares moved for a throw worth `sum`, before any landing effect.
    pub fn movement(&self, sum: Pips) -> Pips {
        match self.max_step {
            Some(cap) => sum.min(cap),
            None => sum,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnEnd {
    /// Control moved to the other player.
    Passed,
    /// A pending extra turn kept control with the same player.
    Repeated,
    /// The mover reached the goal.
    Won,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RollOutcome {
    pub player: PlayerId,
    pub roll: DiceRoll,
    pub doubled: bool,
    pub movement: Pips,
    /// Square the move ended on before its effect was applied.
    pub landed: Position,
    pub landmark: Option<Landmark>,
    pub position: Position,
    pub turn_end: TurnEnd,
}

impl RollOutcome {
    pub fn is_win(&self) -> bool {
        self.turn_end == TurnEnd::Won
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PowerOutcome {
    pub player: PlayerId,
    pub power: Power,
    pub positions: PlayerPair<Position>,
}
