use core::ops::{Index, IndexMut};
use serde::{Deserialize, Serialize};

/// Index of a square on the board, starting at 0.
pub type Position = u8;

/// Face value of a single die, or the sum of a pair of them.
pub type Pips = u8;

#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum PlayerId {
    #[default]
    One,
    Two,
}

impl PlayerId {
    pub const ALL: [PlayerId; 2] = [PlayerId::One, PlayerId::Two];

    pub const fn other(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }

    /// 1-based number, as shown to the players.
    pub const fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }

    const fn slot(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }
}

/// Exactly one value per player, addressed by [`PlayerId`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerPair<T> {
    slots: [T; 2],
}

impl<T> PlayerPair<T> {
    pub const fn new(one: T, two: T) -> Self {
        Self { slots: [one, two] }
    }

    pub fn from_fn(mut f: impl FnMut(PlayerId) -> T) -> Self {
        Self::new(f(PlayerId::One), f(PlayerId::Two))
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        PlayerId::ALL.into_iter().zip(self.slots.iter())
    }

    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> PlayerPair<U> {
        PlayerPair::new(f(&self.slots[0]), f(&self.slots[1]))
    }

    /// Mutable access to both values at once, acting player first.
    pub fn split_mut(&mut self, first: PlayerId) -> (&mut T, &mut T) {
        let [one, two] = &mut self.slots;
        match first {
            PlayerId::One => (one, two),
            PlayerId::Two => (two, one),
        }
    }
}

impl<T> Index<PlayerId> for PlayerPair<T> {
    type Output = T;

    fn index(&self, id: PlayerId) -> &Self::Output {
        &self.slots[id.slot()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerPair<T> {
    fn index_mut(&mut self, id: PlayerId) -> &mut Self::Output {
        &mut self.slots[id.slot()]
    }
}
