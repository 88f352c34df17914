use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Grid needs at least one row and one column")]
    InvalidSize,
    #[error("Too many mines")]
    TooManyMines,
}

pub type Result<T> = core::result::Result<T, GameError>;

/// Reasons a saved game can be rejected. Line numbers are 1-based.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum SaveError {
    #[error("line {line}: unexpected end of save data")]
    UnexpectedEnd { line: usize },
    #[error("line {line}: expected a non-negative integer")]
    InvalidInteger { line: usize },
    #[error("line {line}: coordinate out of range")]
    CoordsOutOfRange { line: usize },
    #[error("line {line}: mine listed twice")]
    DuplicateMine { line: usize },
    #[error("line {line}: invalid cell state {value}")]
    InvalidVisibility { line: usize, value: u32 },
    #[error("line {line}: unexpected data after the cell states")]
    TrailingData { line: usize },
    #[error(transparent)]
    Config(#[from] GameError),
}
