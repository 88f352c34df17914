use serde::{Deserialize, Serialize};

/// What the player has done to a cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    #[default]
    Hidden,
    Revealed,
    Flagged,
}

impl Visibility {
    /// Code used for this state in save files.
    pub const fn save_code(self) -> u8 {
        match self {
            Self::Hidden => 0,
            Self::Revealed => 1,
            Self::Flagged => 2,
        }
    }

    pub const fn from_save_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Hidden),
            1 => Some(Self::Revealed),
            2 => Some(Self::Flagged),
            _ => None,
        }
    }
}

/// Content of a cell as it should be drawn.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisibleValue {
    Hidden,
    Flag,
    Mine,
    Count(u8),
}
