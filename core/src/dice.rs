use alloc::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::Pips;

/// Outcome of throwing the two dice.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    pub first: Pips,
    pub second: Pips,
}

impl DiceRoll {
    pub const FACES: Pips = 6;

    /// Returns `None` unless both values are valid faces.
    pub fn new(first: Pips, second: Pips) -> Option<Self> {
        let valid = |pips| (1..=Self::FACES).contains(&pips);
        (valid(first) && valid(second)).then_some(Self { first, second })
    }

    pub const fn sum(self) -> Pips {
        self.first + self.second
    }
}

pub trait DiceSource {
    fn roll(&mut self) -> DiceRoll;
}

/// Two independent fair dice driven by a seeded `SmallRng`.
#[derive(Clone, Debug)]
pub struct RandomDice {
    rng: rand::rngs::SmallRng,
}

impl RandomDice {
    pub fn new(seed: u64) -> Self {
        use rand::prelude::*;
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl DiceSource for RandomDice {
    fn roll(&mut self) -> DiceRoll {
        use rand::prelude::*;
        let first = self.rng.random_range(1..=DiceRoll::FACES);
        let second = self.rng.random_range(1..=DiceRoll::FACES);
        DiceRoll { first, second }
    }
}

/// Replays a fixed list of throws, then falls back to double ones.
#[derive(Clone, Debug, Default)]
pub struct ScriptedDice {
    queue: VecDeque<DiceRoll>,
}

impl ScriptedDice {
    /// Pairs that are not valid faces are skipped.
    pub fn new(rolls: impl IntoIterator<Item = (Pips, Pips)>) -> Self {
        let queue = rolls
            .into_iter()
            .filter_map(|(first, second)| {
                let roll = DiceRoll::new(first, second);
                if roll.is_none() {
                    log::warn!("ignoring scripted roll ({}, {})", first, second);
                }
                roll
            })
            .collect();
        Self { queue }
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl DiceSource for ScriptedDice {
    fn roll(&mut self) -> DiceRoll {
        self.queue.pop_front().unwrap_or(DiceRoll {
            first: 1,
            second: 1,
        })
    }
}
