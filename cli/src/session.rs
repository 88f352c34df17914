use std::io::{BufRead, Write};

use anyhow::Result;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tripwire_core::{GameConfig, GameGrid, RevealOutcome};

use crate::command::{
    Action, Command, MAX_SIDE, MIN_MINES, MIN_SIDE, MenuChoice, max_mines, parse_mines, parse_size,
};
use crate::render::BoardView;
use crate::storage::{SaveStore, StorageError};

const RULES: &[&str] = &[
    "Welcome to console minesweeper - the classic game in your terminal!",
    "Find every mine and mark it with a flag.",
    "Open any cell: if it is safe you will see how many mines touch it, diagonals included.",
    "A cell with no mines around it opens its whole empty neighbourhood at once.",
    "Open a mine and you are blown up.",
    "To open a cell type a command like: 2 A open (row and column may come in any order).",
    "To mark a cell with a flag type: 2 A flag. The same command removes the flag again.",
    "You win once every mine is flagged and no other cell is.",
    "Type 'save' at any moment to store the game under a name, and load it later from the menu.",
    "Type 'menu' to go back to the main menu.",
    "Good luck!",
];

const INCORRECT_INPUT: &str = "Incorrect input! Try again.";

/// Whether the session can keep going after a step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    /// Input is exhausted.
    Quit,
}

/// Text front end: main menu, prompts, and the move loop of a single game.
pub struct Session<R, W> {
    input: R,
    output: W,
    store: SaveStore,
    seeds: SmallRng,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W, store: SaveStore, seed: u64) -> Self {
        Self {
            input,
            output,
            store,
            seeds: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "Hello, player! Welcome to minesweeper!")?;
        writeln!(self.output, "Choose an option: ")?;
        self.print_menu()?;
        writeln!(self.output)?;

        loop {
            let Some(line) = self.prompt()? else {
                return Ok(());
            };

            let flow = match line.parse::<MenuChoice>() {
                Ok(MenuChoice::Exit) => {
                    writeln!(self.output, "See you soon!")?;
                    return Ok(());
                }
                Ok(MenuChoice::NewGame) => match self.new_grid()? {
                    Some(grid) => self.play(grid, false)?,
                    None => Flow::Quit,
                },
                Ok(MenuChoice::Load) => self.load()?,
                Ok(MenuChoice::Rules) => {
                    for line in RULES {
                        writeln!(self.output, "{line}")?;
                    }
                    writeln!(self.output)?;
                    Flow::Continue
                }
                Err(_) => {
                    writeln!(self.output, "{INCORRECT_INPUT}")?;
                    continue;
                }
            };

            if flow == Flow::Quit {
                return Ok(());
            }
            self.print_menu()?;
        }
    }

    fn print_menu(&mut self) -> Result<()> {
        writeln!(self.output, "1. Start a game")?;
        writeln!(self.output, "2. Load a game")?;
        writeln!(self.output, "3. Open instructions")?;
        writeln!(self.output, "0. Exit")?;
        Ok(())
    }

    /// Next input line, `None` at end of input.
    fn prompt(&mut self) -> Result<Option<String>> {
        write!(self.output, ">>> ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            log::debug!("End of input");
            return Ok(None);
        }
        Ok(Some(line.trim().to_owned()))
    }

    fn new_grid(&mut self) -> Result<Option<GameGrid>> {
        let size = loop {
            writeln!(
                self.output,
                "Enter the lengths of the field's sides (two numbers between {MIN_SIDE} and {MAX_SIDE} in one line)"
            )?;
            let Some(line) = self.prompt()? else {
                return Ok(None);
            };
            match parse_size(&line) {
                Ok(size) => break size,
                Err(err) => {
                    log::warn!("Rejected size {:?}: {}", line, err);
                    writeln!(self.output, "{INCORRECT_INPUT}")?;
                }
            }
        };

        let mines = loop {
            writeln!(
                self.output,
                "Enter the amount of mines (a number between {MIN_MINES} and {})",
                max_mines(size)
            )?;
            let Some(line) = self.prompt()? else {
                return Ok(None);
            };
            match parse_mines(&line, size) {
                Ok(mines) => break mines,
                Err(err) => {
                    log::warn!("Rejected mine count {:?}: {}", line, err);
                    writeln!(self.output, "{INCORRECT_INPUT}")?;
                }
            }
        };

        let seed = self.seeds.random();
        log::debug!("New {}x{} game, {} mines, seed {}", size.0, size.1, mines, seed);
        let grid = GameGrid::generate(GameConfig::new(size, mines)?, seed)?;
        Ok(Some(grid))
    }

    fn load(&mut self) -> Result<Flow> {
        writeln!(self.output, "Enter the name of the save")?;
        let Some(name) = self.prompt()? else {
            return Ok(Flow::Quit);
        };

        match self.store.load(&name) {
            Ok(grid) if grid.size().1 > MAX_SIDE => {
                log::error!("Save {:?} has {} columns", name, grid.size().1);
                writeln!(
                    self.output,
                    "This save has more than {MAX_SIDE} columns and cannot be played here."
                )?;
                Ok(Flow::Continue)
            }
            Ok(grid) => self.play(grid, true),
            Err(StorageError::NotFound(path)) => {
                log::debug!("No save at {}", path.display());
                writeln!(self.output, "There's no such save. Try another one.")?;
                Ok(Flow::Continue)
            }
            Err(err) => {
                log::error!("Could not load {:?}: {}", name, err);
                writeln!(self.output, "Could not load the save: {err}")?;
                Ok(Flow::Continue)
            }
        }
    }

    fn play(&mut self, mut grid: GameGrid, loaded: bool) -> Result<Flow> {
        writeln!(
            self.output,
            "Enter your steps like [X Y Action], where X, Y - coords, Action = 'Open' or 'Flag'"
        )?;
        writeln!(self.output, "Example: 2 A Open or B 10 Flag")?;
        writeln!(self.output, "You can save the game. Just type in 'Save'")?;
        writeln!(self.output, "Type 'Menu' to return to main menu")?;
        if loaded {
            writeln!(self.output, "Total mines: {}", grid.total_mines())?;
        }
        writeln!(self.output)?;

        loop {
            write!(self.output, "{}", BoardView::new(&grid, false))?;
            let Some(line) = self.prompt()? else {
                return Ok(Flow::Quit);
            };

            let (coords, action) = match Command::parse(&line, grid.size()) {
                Ok(Command::Move { coords, action }) => (coords, action),
                Ok(Command::Menu) => return Ok(Flow::Continue),
                Ok(Command::Save) => {
                    if self.save(&grid)? == Flow::Quit {
                        return Ok(Flow::Quit);
                    }
                    continue;
                }
                Err(err) => {
                    log::warn!("Rejected command {:?}: {}", line, err);
                    writeln!(self.output, "{INCORRECT_INPUT}")?;
                    continue;
                }
            };

            if grid.is_opened(coords)? {
                writeln!(self.output, "This point was already opened")?;
            }

            match action {
                Action::Open => {
                    if grid.reveal(coords)? == RevealOutcome::Exploded {
                        write!(self.output, "{}", BoardView::new(&grid, true))?;
                        writeln!(self.output, "You have picked a mine! Game over!")?;
                        return Ok(Flow::Continue);
                    }
                }
                Action::Flag => {
                    if grid.toggle_flag(coords)?.is_won() {
                        write!(self.output, "{}", BoardView::new(&grid, false))?;
                        writeln!(self.output, "You have found all mines! Congratulations!")?;
                        return Ok(Flow::Continue);
                    }
                }
            }
        }
    }

    fn save(&mut self, grid: &GameGrid) -> Result<Flow> {
        writeln!(self.output, "Enter the name for this save")?;
        let Some(name) = self.prompt()? else {
            return Ok(Flow::Quit);
        };

        match self.store.save(&name, grid) {
            Ok(_) => writeln!(self.output, "Game saved!")?,
            Err(err) => {
                log::error!("Could not save game as {:?}: {}", name, err);
                writeln!(self.output, "Could not save the game: {err}")?;
            }
        }
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tripwire_core::{MineLayout, iter_coords};

    fn run_script(store: SaveStore, seed: u64, script: &str) -> String {
        let mut output = Vec::new();
        Session::new(Cursor::new(script.to_owned()), &mut output, store, seed)
            .run()
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    fn play_script(grid: GameGrid, script: &str) -> (Flow, String) {
        let mut output = Vec::new();
        let store = SaveStore::new(".");
        let flow = Session::new(Cursor::new(script.to_owned()), &mut output, store, 0)
            .play(grid, false)
            .unwrap();
        (flow, String::from_utf8(output).unwrap())
    }

    fn small_grid() -> GameGrid {
        GameGrid::new(MineLayout::from_mine_coords((3, 3), &[(0, 0), (2, 2)]).unwrap())
    }

    /// Grid the session will generate for its first new game.
    fn first_generated(seed: u64, size: (u8, u8), mines: u16) -> GameGrid {
        let game_seed = SmallRng::seed_from_u64(seed).random();
        GameGrid::generate(GameConfig::new(size, mines).unwrap(), game_seed).unwrap()
    }

    fn command_for((row, col): (u8, u8), action: &str) -> String {
        format!("{} {} {action}\n", row + 1, char::from(b'A' + col))
    }

    #[test]
    fn exit_from_menu() {
        let out = run_script(SaveStore::new("."), 1, "0\n");

        assert!(out.starts_with("Hello, player! Welcome to minesweeper!\n"));
        assert!(out.contains("1. Start a game\n2. Load a game\n3. Open instructions\n0. Exit\n"));
        assert!(out.ends_with("See you soon!\n"));
    }

    #[test]
    fn end_of_input_stops_quietly() {
        let out = run_script(SaveStore::new("."), 1, "1\n4 4\n");
        assert!(out.contains("Enter the amount of mines (a number between 2 and 5)"));
    }

    #[test]
    fn bad_menu_option_and_rules() {
        let out = run_script(SaveStore::new("."), 1, "7\n3\n0\n");

        assert!(out.contains(INCORRECT_INPUT));
        assert!(out.contains(RULES[0]));
        assert!(out.ends_with("See you soon!\n"));
    }

    #[test]
    fn new_game_reprompts_bad_parameters() {
        let out = run_script(SaveStore::new("."), 5, "1\n2 2\n5 5\n20\n3\nmenu\n0\n");

        assert_eq!(out.matches(INCORRECT_INPUT).count(), 2);
        assert!(out.contains("    | A B C D E \n"));
        assert!(out.contains("  5 | X X X X X \n"));
        assert!(out.ends_with("See you soon!\n"));
    }

    #[test]
    fn generated_game_can_be_lost() {
        let grid = first_generated(9, (5, 6), 4);
        let mine = iter_coords(grid.size())
            .find(|&pos| grid.has_mine_at(pos).unwrap())
            .unwrap();
        let script = format!("1\n5 6\n4\n{}0\n", command_for(mine, "open"));

        let out = run_script(SaveStore::new("."), 9, &script);

        assert!(out.contains("You have picked a mine! Game over!"));
        assert!(out.contains('*'));
        assert!(out.ends_with("See you soon!\n"));
    }

    #[test]
    fn flagging_all_mines_wins() {
        let (flow, out) = play_script(small_grid(), "1 A flag\nC 3 FLAG\n");

        assert_eq!(flow, Flow::Continue);
        assert!(out.contains("  1 | F X X \n"));
        assert!(out.ends_with("You have found all mines! Congratulations!\n"));
    }

    #[test]
    fn opening_a_mine_shows_everything() {
        let (flow, out) = play_script(small_grid(), "2 B open\n1 a open\n");

        assert_eq!(flow, Flow::Continue);
        assert!(out.contains("  2 | X 2 X \n"));
        assert!(out.contains("  1 | * 1 0 \n  2 | 1 2 1 \n  3 | 0 1 * \n"));
        assert!(out.ends_with("You have picked a mine! Game over!\n"));
    }

    #[test]
    fn repeated_open_is_reported() {
        let (flow, out) = play_script(small_grid(), "2 B open\n2 B open\nwhat\n");

        assert_eq!(flow, Flow::Quit);
        assert_eq!(out.matches("This point was already opened").count(), 1);
        assert!(out.contains(INCORRECT_INPUT));
    }

    #[test]
    fn save_load_and_resume() {
        let dir = tempfile::tempdir().unwrap();
        let grid = first_generated(3, (4, 4), 2);
        let safe = iter_coords(grid.size())
            .find(|&pos| !grid.has_mine_at(pos).unwrap())
            .unwrap();
        let script = format!(
            "1\n4 4\n2\n{}save\nmine\nmenu\n2\nmine\nmenu\n0\n",
            command_for(safe, "flag")
        );

        let out = run_script(SaveStore::new(dir.path()), 3, &script);

        assert!(out.contains("Game saved!"));
        assert!(out.contains("Total mines: 2"));
        let saved = std::fs::read_to_string(dir.path().join("mine.ms")).unwrap();
        let loaded = GameGrid::from_save(&saved).unwrap();
        assert_eq!(loaded.visibility_at(safe).unwrap(), tripwire_core::Visibility::Flagged);
        assert_eq!(loaded.mine_layout(), grid.mine_layout());
    }

    #[test]
    fn missing_and_damaged_saves() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.ms"), "3\n3\n").unwrap();

        let out = run_script(SaveStore::new(dir.path()), 1, "2\nghost\n2\nbad\n0\n");

        assert!(out.contains("There's no such save. Try another one."));
        assert!(out.contains("Could not load the save:"));
        assert!(out.ends_with("See you soon!\n"));
    }
}
