//! Line-oriented save format, one integer per line:
//!
//! ```text
//! rows
//! cols
//! mines
//! row, col        (one pair per mine, row-major order)
//! 0 | 1 | 2       (rows * cols cell states, row-major: hidden, revealed, flagged)
//! ```

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::iter::Enumerate;
use core::str::{FromStr, Lines};
use ndarray::Array2;

use crate::*;

type SaveResult<T> = core::result::Result<T, SaveError>;

impl GameGrid {
    /// Text form accepted back by [`GameGrid::from_save`].
    pub fn to_save(&self) -> String {
        self.to_string()
    }

    pub fn from_save(data: &str) -> SaveResult<Self> {
        let mut reader = SaveReader::new(data);

        let (rows, _) = reader.next_int()?;
        let (cols, _) = reader.next_int()?;
        let (mines, _) = reader.next_int()?;

        let rows = Coord::try_from(rows).map_err(|_| GameError::InvalidSize)?;
        let cols = Coord::try_from(cols).map_err(|_| GameError::InvalidSize)?;
        let mines = CellCount::try_from(mines).map_err(|_| GameError::TooManyMines)?;
        let config = GameConfig::new((rows, cols), mines)?;

        let mut mine_mask: Array2<bool> = Array2::default(config.size.to_nd_index());
        let mut mine_coords = Vec::with_capacity(mines.into());
        for _ in 0..mines {
            let (row, line) = reader.next_coord(rows)?;
            let (col, _) = reader.next_coord(cols)?;
            let coords = (row, col);

            if mine_mask[coords.to_nd_index()] {
                return Err(SaveError::DuplicateMine { line });
            }
            mine_mask[coords.to_nd_index()] = true;
            mine_coords.push(coords);
        }
        let mine_layout = MineLayout::from_mine_coords(config.size, &mine_coords)?;

        let mut board: Array2<Visibility> = Array2::default(config.size.to_nd_index());
        for coords in iter_coords(config.size) {
            let (value, line) = reader.next_int()?;
            board[coords.to_nd_index()] = Visibility::from_save_code(value)
                .ok_or(SaveError::InvalidVisibility { line, value })?;
        }
        reader.finish()?;

        let grid = GameGrid::with_board(mine_layout, board)?;
        log::debug!(
            "Loaded {}x{} grid, {} mines, {} flags",
            rows,
            cols,
            mines,
            grid.total_flags()
        );
        Ok(grid)
    }
}

impl fmt::Display for GameGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (rows, cols) = self.size();
        writeln!(f, "{}", rows)?;
        writeln!(f, "{}", cols)?;
        writeln!(f, "{}", self.total_mines())?;

        for (row, col) in self.mine_layout().mine_coords() {
            writeln!(f, "{}", row)?;
            writeln!(f, "{}", col)?;
        }

        for visibility in self.board().iter() {
            writeln!(f, "{}", visibility.save_code())?;
        }
        Ok(())
    }
}

impl FromStr for GameGrid {
    type Err = SaveError;

    fn from_str(s: &str) -> SaveResult<Self> {
        Self::from_save(s)
    }
}

struct SaveReader<'a> {
    lines: Enumerate<Lines<'a>>,
    last_line: usize,
}

impl<'a> SaveReader<'a> {
    fn new(data: &'a str) -> Self {
        Self {
            lines: data.lines().enumerate(),
            last_line: 0,
        }
    }

    /// Next value together with its 1-based line number.
    fn next_int(&mut self) -> SaveResult<(u32, usize)> {
        let Some((index, text)) = self.lines.next() else {
            return Err(SaveError::UnexpectedEnd {
                line: self.last_line + 1,
            });
        };
        let line = index + 1;
        self.last_line = line;

        let value = text
            .trim()
            .parse()
            .map_err(|_| SaveError::InvalidInteger { line })?;
        Ok((value, line))
    }

    fn next_coord(&mut self, bound: Coord) -> SaveResult<(Coord, usize)> {
        let (value, line) = self.next_int()?;
        match Coord::try_from(value) {
            Ok(coord) if coord < bound => Ok((coord, line)),
            _ => Err(SaveError::CoordsOutOfRange { line }),
        }
    }

    /// Only blank lines may follow the cell states.
    fn finish(mut self) -> SaveResult<()> {
        match self.lines.find(|(_, text)| !text.trim().is_empty()) {
            Some((index, _)) => Err(SaveError::TrailingData { line: index + 1 }),
            None => Ok(()),
        }
    }
}
