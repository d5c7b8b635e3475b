use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid board configuration")]
    InvalidConfiguration,
    #[error("Coordinates out of bounds")]
    OutOfBounds,
}

pub type Result<T> = core::result::Result<T, GameError>;
