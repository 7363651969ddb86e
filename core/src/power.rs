use serde::{Deserialize, Serialize};

use crate::*;

/// One-shot ability picked before the race starts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Power {
    DoubleDice,
    PushBack,
    SwapPositions,
    ExtraTurn,
}

impl Power {
    /// Selection order on the power screen.
    pub const CATALOGUE: [Power; 4] = [
        Power::DoubleDice,
        Power::PushBack,
        Power::SwapPositions,
        Power::ExtraTurn,
    ];

    /// How far `PushBack` moves the opponent.
    pub const PUSH_BACK_SQUARES: u8 = 3;

    pub fn from_index(index: usize) -> Result<Self> {
        Self::CATALOGUE
            .get(index)
            .copied()
            .ok_or(GameError::UnknownPower(index))
    }

    pub const fn name(self) -> &'static str {
        use Power::*;
        match self {
            DoubleDice => "Double Dice",
            PushBack => "Push Back",
            SwapPositions => "Swap Places",
            ExtraTurn => "Play Again",
        }
    }

    pub const fn description(self) -> &'static str {
        use Power::*;
        match self {
            DoubleDice => "Your next roll moves twice as far",
            PushBack => "Opponent goes back 3 squares",
            SwapPositions => "Trade places with your opponent",
            ExtraTurn => "Roll again after this turn",
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerSlot {
    #[default]
    Unassigned,
    Ready(Power),
    Spent(Power),
}

impl PowerSlot {
    pub const fn power(self) -> Option<Power> {
        match self {
            Self::Unassigned => None,
            Self::Ready(power) | Self::Spent(power) => Some(power),
        }
    }

    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Marks the power as used and returns it. There is no way back to `Ready`.
    pub fn spend(&mut self) -> Result<Power> {
        match *self {
            Self::Ready(power) => {
                *self = Self::Spent(power);
                Ok(power)
            }
            Self::Unassigned | Self::Spent(_) => Err(GameError::PowerUnavailable),
        }
    }
}
