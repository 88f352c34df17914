#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use generator::*;
pub use tile::*;
pub use types::*;

mod engine;
mod error;
mod generator;
mod save;
mod tile;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// `(rows, cols)`
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    /// Both sides must be non-zero and at least one cell must stay free of mines.
    pub fn new(size: Coord2, mines: CellCount) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::InvalidSize);
        }
        if mines >= mult(size.0, size.1) {
            return Err(GameError::TooManyMines);
        }
        Ok(Self { size, mines })
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

/// Serialized as its size and mine list; adjacency is rebuilt and checked on load.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LayoutRepr", into = "LayoutRepr")]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    adjacent: Array2<u8>,
    mine_count: CellCount,
}

impl MineLayout {
    fn from_mine_mask(size: Coord2, mine_mask: Array2<bool>) -> Result<Self> {
        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count();
        let mine_count = CellCount::try_from(mine_count).map_err(|_| GameError::TooManyMines)?;
        GameConfig::new(size, mine_count)?;

        let mut adjacent: Array2<u8> = Array2::default(size.to_nd_index());
        for coords in iter_coords(size).filter(|&pos| mine_mask[pos.to_nd_index()]) {
            for pos in mine_mask.iter_neighbors(coords) {
                if !mine_mask[pos.to_nd_index()] {
                    adjacent[pos.to_nd_index()] += 1;
                }
            }
        }

        Ok(Self {
            mine_mask,
            adjacent,
            mine_count,
        })
    }

    /// Builds a layout from explicit mine positions, repeated positions count once.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::InvalidSize);
        }
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Self::from_mine_mask(size, mine_mask)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.mine_mask.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    /// Mines among the 8 surrounding cells. Always 0 on a mine.
    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.adjacent[coords.to_nd_index()]
    }

    /// Mine positions in row-major order.
    pub fn mine_coords(&self) -> Vec<Coord2> {
        iter_coords(self.size())
            .filter(|&pos| self[pos])
            .collect()
    }

    pub(crate) fn iter_orthogonal(&self, coords: Coord2) -> NeighborIter {
        self.mine_mask.iter_orthogonal(coords)
    }
}

#[derive(Serialize, Deserialize)]
struct LayoutRepr {
    size: Coord2,
    mines: Vec<Coord2>,
}

impl From<MineLayout> for LayoutRepr {
    fn from(layout: MineLayout) -> Self {
        Self {
            size: layout.size(),
            mines: layout.mine_coords(),
        }
    }
}

impl TryFrom<LayoutRepr> for MineLayout {
    type Error = GameError;

    fn try_from(repr: LayoutRepr) -> Result<Self> {
        Self::from_mine_coords(repr.size, &repr.mines)
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mine_mask[coords.to_nd_index()]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    /// The cell held a mine, the grid is left untouched.
    Exploded,
    Opened,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    Won,
    Pending,
}

impl FlagOutcome {
    pub const fn is_won(self) -> bool {
        matches!(self, Self::Won)
    }
}
