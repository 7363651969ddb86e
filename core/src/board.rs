use alloc::{string::String, vec, vec::Vec};
use serde::{Deserialize, Serialize};

use crate::*;

/// A special square together with the short name shown on it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub position: Position,
    pub square: Square,
    pub label: String,
}

/// Linear race track of `goal` squares. The last square is the goal and never carries an effect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    squares: Vec<Square>,
    labels: Vec<Option<String>>,
}

impl Board {
    pub const DEFAULT_GOAL: Position = 30;

    pub fn new(goal: Position, landmarks: &[(Position, Square, &str)]) -> Result<Self> {
        if goal < 2 {
            return Err(GameError::InvalidBoardLength);
        }

        let mut squares = vec![Square::Plain; goal.into()];
        let mut labels = vec![None; goal.into()];
        for &(position, square, label) in landmarks {
            if position >= goal - 1 {
                return Err(GameError::InvalidSquare(position));
            }
            squares[usize::from(position)] = square;
            labels[usize::from(position)] = Some(label.into());
        }

        Ok(Self { squares, labels })
    }

    /// Board used by the rules with powers.
    pub fn powers() -> Self {
        use Square::*;
        Self::new(
            Self::DEFAULT_GOAL,
            &[
                (3, Lucky(2), "Shortcut"),
                (8, Lucky(3), "Tailwind"),
                (12, Lucky(1), "Step"),
                (18, Lucky(2), "Ladder"),
                (22, Lucky(4), "Jet"),
                (28, Lucky(1), "Almost"),
                (4, Unlucky(2), "Fall"),
                (7, Unlucky(3), "Pit"),
                (11, Unlucky(1), "Oops"),
                (14, Unlucky(2), "Back"),
                (17, Unlucky(4), "Crisis"),
                (21, Unlucky(2), "Retreat"),
                (26, Unlucky(3), "Monster"),
            ],
        )
        .expect("built-in board is valid")
    }

    /// Board used by the classic rules, without powers.
    pub fn classic() -> Self {
        use Square::*;
        Self::new(
            Self::DEFAULT_GOAL,
            &[
                (5, Lucky(3), "Shortcut"),
                (10, Lucky(2), "Ladder"),
                (15, Lucky(3), "Tailwind"),
                (20, Lucky(2), "Step"),
                (24, Lucky(4), "Jet"),
                (9, Unlucky(3), "Pit"),
                (13, Unlucky(2), "Fall"),
                (19, Unlucky(4), "Crisis"),
                (23, Unlucky(2), "Retreat"),
                (27, Unlucky(5), "Monster"),
            ],
        )
        .expect("built-in board is valid")
    }

    /// Number of squares; reaching square `goal - 1` wins.
    pub fn goal(&self) -> Position {
        // `new` only accepts a `Position` length
        self.squares.len() as Position
    }

    pub fn last_square(&self) -> Position {
        self.goal() - 1
    }

    pub fn square_at(&self, position: Position) -> Square {
        self.squares
            .get(usize::from(position))
            .copied()
            .unwrap_or_default()
    }

    pub fn label_at(&self, position: Position) -> Option<&str> {
        self.labels
            .get(usize::from(position))
            .and_then(|label| label.as_deref())
    }

    pub fn landmark_at(&self, position: Position) -> Option<Landmark> {
        let square = self.square_at(position);
        square.is_special().then(|| Landmark {
            position,
            square,
            label: self.label_at(position).unwrap_or_default().into(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, Square)> + '_ {
        (0..self.goal()).map(|position| (position, self.square_at(position)))
    }
}
