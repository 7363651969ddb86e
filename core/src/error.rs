use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("Game is not in the playing phase")]
    NotPlaying,
    #[error("Game can only be started from the menu")]
    NotInMenu,
    #[error("No power is being selected right now")]
    NotSelecting,
    #[error("Power is not available to the acting player")]
    PowerUnavailable,
    #[error("Unknown power index {0}")]
    UnknownPower(usize),
    #[error("Special square {0} lies outside the playable board")]
    InvalidSquare(u8),
    #[error("Board is too short to race on")]
    InvalidBoardLength,
}

pub type Result<T> = core::result::Result<T, GameError>;
