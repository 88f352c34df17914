use std::fmt;

use tripwire_core::{GameGrid, VisibleValue};

use crate::command::column_letter;

/// Text picture of a grid: a lettered header, then one numbered line per row.
pub struct BoardView<'a> {
    grid: &'a GameGrid,
    reveal_all: bool,
}

impl<'a> BoardView<'a> {
    pub fn new(grid: &'a GameGrid, reveal_all: bool) -> Self {
        Self { grid, reveal_all }
    }
}

fn glyph(value: VisibleValue) -> char {
    match value {
        VisibleValue::Hidden => 'X',
        VisibleValue::Flag => 'F',
        VisibleValue::Mine => '*',
        VisibleValue::Count(count) => char::from(b'0' + count),
    }
}

impl fmt::Display for BoardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (rows, cols) = self.grid.size();

        write!(f, "    | ")?;
        for col in 0..cols {
            write!(f, "{} ", column_letter(col))?;
        }
        writeln!(f)?;
        writeln!(f, "{}", "-".repeat(usize::from(cols) * 2 + 5))?;

        for row in 0..rows {
            write!(f, "{:>3} | ", u16::from(row) + 1)?;
            for col in 0..cols {
                let value = self
                    .grid
                    .visible_value((row, col), self.reveal_all)
                    .map_err(|_| fmt::Error)?;
                write!(f, "{} ", glyph(value))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
