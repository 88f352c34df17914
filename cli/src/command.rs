use std::str::FromStr;

use thiserror::Error;
use tripwire_core::{CellCount, Coord, Coord2, mult};

pub const MIN_SIDE: Coord = 3;
/// One letter per column.
pub const MAX_SIDE: Coord = 26;
pub const MIN_MINES: CellCount = 2;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("expected `<row> <column> open|flag`, `save` or `menu`")]
    Malformed,
    #[error("expected one row number and one column letter")]
    BadCoordinates,
    #[error("row {0} is outside the grid")]
    RowOutOfRange(u32),
    #[error("column {0} is outside the grid")]
    ColumnOutOfRange(char),
    #[error("unknown action {0:?}")]
    UnknownAction(String),
    #[error("sides must be two numbers between {min} and {max}", min = MIN_SIDE, max = MAX_SIDE)]
    BadSize,
    #[error("mine count must be a number between {min} and {0}", min = MIN_MINES)]
    BadMineCount(CellCount),
    #[error("unknown menu option")]
    UnknownOption,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MenuChoice {
    NewGame,
    Load,
    Rules,
    Exit,
}

impl FromStr for MenuChoice {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Self::NewGame),
            "2" => Ok(Self::Load),
            "3" => Ok(Self::Rules),
            "0" => Ok(Self::Exit),
            _ => Err(CommandError::UnknownOption),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Open,
    Flag,
}

impl FromStr for Action {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "flag" => Ok(Self::Flag),
            _ => Err(CommandError::UnknownAction(s.to_owned())),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Move { coords: Coord2, action: Action },
    Save,
    Menu,
}

impl Command {
    /// Parses an in-game line for a grid of `size`. The row number and column letter may come in either order.
    pub fn parse(input: &str, size: Coord2) -> Result<Self, CommandError> {
        let tokens: Vec<&str> = input.split_whitespace().collect();

        match tokens.as_slice() {
            [word] if word.eq_ignore_ascii_case("save") => Ok(Self::Save),
            [word] if word.eq_ignore_ascii_case("menu") => Ok(Self::Menu),
            [first, second, action] => {
                let (row, column) = if is_number(first) {
                    (*first, *second)
                } else {
                    (*second, *first)
                };
                if !is_number(row) || is_number(column) {
                    return Err(CommandError::BadCoordinates);
                }

                let coords = (parse_row(row, size.0)?, parse_column(column, size.1)?);
                let action = action.parse()?;
                Ok(Self::Move { coords, action })
            }
            _ => Err(CommandError::Malformed),
        }
    }
}

fn is_number(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

/// Rows are shown 1-based.
fn parse_row(token: &str, rows: Coord) -> Result<Coord, CommandError> {
    let number: u32 = token.parse().unwrap_or(u32::MAX);
    if (1..=u32::from(rows)).contains(&number) {
        Ok((number - 1) as Coord)
    } else {
        Err(CommandError::RowOutOfRange(number))
    }
}

fn parse_column(token: &str, cols: Coord) -> Result<Coord, CommandError> {
    let mut chars = token.chars();
    let (Some(letter), None) = (chars.next(), chars.next()) else {
        return Err(CommandError::BadCoordinates);
    };
    if !letter.is_ascii_alphabetic() {
        return Err(CommandError::BadCoordinates);
    }

    let index = letter.to_ascii_uppercase() as u8 - b'A';
    if index < cols {
        Ok(index)
    } else {
        Err(CommandError::ColumnOutOfRange(letter))
    }
}

pub fn column_letter(col: Coord) -> char {
    char::from(b'A' + col)
}

/// Two side lengths on one line.
pub fn parse_size(input: &str) -> Result<Coord2, CommandError> {
    let sides: Vec<&str> = input.split_whitespace().collect();
    let [rows, cols] = sides.as_slice() else {
        return Err(CommandError::BadSize);
    };

    let parse_side = |token: &str| match token.parse::<Coord>() {
        Ok(side) if (MIN_SIDE..=MAX_SIDE).contains(&side) => Ok(side),
        _ => Err(CommandError::BadSize),
    };
    Ok((parse_side(*rows)?, parse_side(*cols)?))
}

/// At most a third of the grid may be mined.
pub fn max_mines(size: Coord2) -> CellCount {
    mult(size.0, size.1) / 3
}

pub fn parse_mines(input: &str, size: Coord2) -> Result<CellCount, CommandError> {
    let max = max_mines(size);
    match input.trim().parse::<CellCount>() {
        Ok(mines) if (MIN_MINES..=max).contains(&mines) => Ok(mines),
        _ => Err(CommandError::BadMineCount(max)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: Coord2 = (10, 5);

    fn parse(input: &str) -> Result<Command, CommandError> {
        Command::parse(input, SIZE)
    }

    #[test]
    fn accepts_either_coordinate_order() {
        let expected = Command::Move {
            coords: (1, 0),
            action: Action::Open,
        };
        assert_eq!(parse("2 A open"), Ok(expected));
        assert_eq!(parse("a 2 OPEN"), Ok(expected));
        assert_eq!(
            parse("  E   10  Flag "),
            Ok(Command::Move {
                coords: (9, 4),
                action: Action::Flag,
            })
        );
    }

    #[test]
    fn single_word_commands() {
        assert_eq!(parse("save"), Ok(Command::Save));
        assert_eq!(parse("Save"), Ok(Command::Save));
        assert_eq!(parse(" MENU "), Ok(Command::Menu));
        assert_eq!(parse("quit"), Err(CommandError::Malformed));
    }

    #[test]
    fn rejects_malformed_moves() {
        assert_eq!(parse(""), Err(CommandError::Malformed));
        assert_eq!(parse("2 A"), Err(CommandError::Malformed));
        assert_eq!(parse("2 A open now"), Err(CommandError::Malformed));
        assert_eq!(parse("2 3 open"), Err(CommandError::BadCoordinates));
        assert_eq!(parse("A B open"), Err(CommandError::BadCoordinates));
        assert_eq!(parse("2 AB open"), Err(CommandError::BadCoordinates));
        assert_eq!(parse("2 ? open"), Err(CommandError::BadCoordinates));
        assert_eq!(
            parse("2 A dig"),
            Err(CommandError::UnknownAction("dig".to_owned()))
        );
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert_eq!(parse("0 A open"), Err(CommandError::RowOutOfRange(0)));
        assert_eq!(parse("11 A open"), Err(CommandError::RowOutOfRange(11)));
        assert_eq!(parse("3 F flag"), Err(CommandError::ColumnOutOfRange('F')));
        assert_eq!(
            parse("99999999999 A open"),
            Err(CommandError::RowOutOfRange(u32::MAX))
        );
    }

    #[test]
    fn menu_choices() {
        assert_eq!(" 1 ".parse::<MenuChoice>(), Ok(MenuChoice::NewGame));
        assert_eq!("2".parse::<MenuChoice>(), Ok(MenuChoice::Load));
        assert_eq!("3".parse::<MenuChoice>(), Ok(MenuChoice::Rules));
        assert_eq!("0".parse::<MenuChoice>(), Ok(MenuChoice::Exit));
        assert_eq!("4".parse::<MenuChoice>(), Err(CommandError::UnknownOption));
    }

    #[test]
    fn size_bounds() {
        assert_eq!(parse_size("3 26"), Ok((3, 26)));
        assert_eq!(parse_size("2 10"), Err(CommandError::BadSize));
        assert_eq!(parse_size("10 27"), Err(CommandError::BadSize));
        assert_eq!(parse_size("10"), Err(CommandError::BadSize));
        assert_eq!(parse_size("ten 10"), Err(CommandError::BadSize));
    }

    #[test]
    fn mine_bounds() {
        assert_eq!(max_mines((5, 5)), 8);
        assert_eq!(parse_mines("8", (5, 5)), Ok(8));
        assert_eq!(parse_mines(" 2 ", (3, 3)), Ok(2));
        assert_eq!(parse_mines("1", (5, 5)), Err(CommandError::BadMineCount(8)));
        assert_eq!(parse_mines("9", (5, 5)), Err(CommandError::BadMineCount(8)));
    }

    #[test]
    fn column_letters() {
        assert_eq!(column_letter(0), 'A');
        assert_eq!(column_letter(25), 'Z');
    }
}
