use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    position: Position,
    rolls: Vec<DiceRoll>,
    power: PowerSlot,
}

impl Player {
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            position: 0,
            rolls: Vec::new(),
            power: PowerSlot::Unassigned,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn power(&self) -> PowerSlot {
        self.power
    }

    /// Every throw so far, oldest first.
    pub fn rolls(&self) -> &[DiceRoll] {
        &self.rolls
    }

    pub fn last_roll(&self) -> Option<DiceRoll> {
        self.rolls.last().copied()
    }

    pub fn sums(&self) -> Vec<Pips> {
        self.rolls.iter().map(|roll| roll.sum()).collect()
    }

    pub fn summary(&self) -> Option<Summary> {
        Summary::from_sums(&self.sums())
    }

    pub fn distribution(&self) -> Option<Distribution> {
        Distribution::from_sums(&self.sums())
    }

    pub fn running_means(&self) -> Vec<f64> {
        running_means(&self.sums())
    }

    pub(crate) fn record(&mut self, roll: DiceRoll) {
        self.rolls.push(roll);
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub(crate) fn power_mut(&mut self) -> &mut PowerSlot {
        &mut self.power
    }
}
