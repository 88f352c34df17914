use alloc::collections::VecDeque;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Live state of one game: the mine layout plus everything the player has done to it.
///
/// Only the layout and the board are serialized, deserializing goes through [`GameGrid::with_board`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridRepr", into = "GridRepr")]
pub struct GameGrid {
    mine_layout: MineLayout,
    board: Array2<Visibility>,
    total_flags: CellCount,
    mines_left: CellCount,
}

#[derive(Serialize, Deserialize)]
struct GridRepr {
    mine_layout: MineLayout,
    board: Array2<Visibility>,
}

impl From<GameGrid> for GridRepr {
    fn from(grid: GameGrid) -> Self {
        Self {
            mine_layout: grid.mine_layout,
            board: grid.board,
        }
    }
}

impl TryFrom<GridRepr> for GameGrid {
    type Error = GameError;

    fn try_from(repr: GridRepr) -> Result<Self> {
        Self::with_board(repr.mine_layout, repr.board)
    }
}

impl GameGrid {
    pub fn new(mine_layout: MineLayout) -> Self {
        let size = mine_layout.size();
        let mines_left = mine_layout.mine_count();
        Self {
            mine_layout,
            board: Array2::default(size.to_nd_index()),
            total_flags: 0,
            mines_left,
        }
    }

    /// Places mines at random, see [`RandomMinefieldGenerator`].
    pub fn generate(config: GameConfig, seed: u64) -> Result<Self> {
        RandomMinefieldGenerator::new(seed)
            .generate(config)
            .map(Self::new)
    }

    /// Rebuilds a grid from a layout and a full visibility matrix, recounting flags.
    pub fn with_board(mine_layout: MineLayout, board: Array2<Visibility>) -> Result<Self> {
        let (rows, cols) = mine_layout.size();
        if board.dim() != (usize::from(rows), usize::from(cols)) {
            return Err(GameError::InvalidSize);
        }

        let mut grid = Self::new(mine_layout);
        grid.board = board;
        (grid.total_flags, grid.mines_left) = grid.recount();
        Ok(grid)
    }

    pub fn size(&self) -> Coord2 {
        self.mine_layout.size()
    }

    pub fn mine_layout(&self) -> &MineLayout {
        &self.mine_layout
    }

    pub fn total_mines(&self) -> CellCount {
        self.mine_layout.mine_count()
    }

    /// Cells currently carrying a flag, correct or not.
    pub fn total_flags(&self) -> CellCount {
        self.total_flags
    }

    /// Mines not yet covered by a flag.
    pub fn mines_left(&self) -> CellCount {
        self.mines_left
    }

    pub fn is_won(&self) -> bool {
        self.mines_left == 0 && self.total_flags == self.total_mines()
    }

    pub fn visibility_at(&self, coords: Coord2) -> Result<Visibility> {
        let coords = self.mine_layout.validate_coords(coords)?;
        Ok(self.board[coords.to_nd_index()])
    }

    pub fn has_mine_at(&self, coords: Coord2) -> Result<bool> {
        let coords = self.mine_layout.validate_coords(coords)?;
        Ok(self.mine_layout.contains_mine(coords))
    }

    pub fn adjacent_count(&self, coords: Coord2) -> Result<u8> {
        let coords = self.mine_layout.validate_coords(coords)?;
        Ok(self.mine_layout.adjacent_mine_count(coords))
    }

    pub fn is_opened(&self, coords: Coord2) -> Result<bool> {
        Ok(self.visibility_at(coords)? == Visibility::Revealed)
    }

    /// What a renderer should draw at `coords`. With `reveal_all` every cell shows its real content.
    pub fn visible_value(&self, coords: Coord2, reveal_all: bool) -> Result<VisibleValue> {
        let visibility = self.visibility_at(coords)?;

        Ok(match visibility {
            Visibility::Hidden if !reveal_all => VisibleValue::Hidden,
            Visibility::Flagged if !reveal_all => VisibleValue::Flag,
            _ if self.mine_layout.contains_mine(coords) => VisibleValue::Mine,
            _ => VisibleValue::Count(self.mine_layout.adjacent_mine_count(coords)),
        })
    }

    /// Full recount of `(total_flags, mines_left)` from the board.
    pub fn recount(&self) -> (CellCount, CellCount) {
        let mut total_flags = 0;
        let mut mines_left = self.total_mines();

        for coords in iter_coords(self.size()) {
            if self.board[coords.to_nd_index()] == Visibility::Flagged {
                total_flags += 1;
                if self.mine_layout.contains_mine(coords) {
                    mines_left -= 1;
                }
            }
        }

        (total_flags, mines_left)
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        use Visibility::*;

        let coords = self.mine_layout.validate_coords(coords)?;
        let has_mine = self.mine_layout.contains_mine(coords);

        match self.board[coords.to_nd_index()] {
            Flagged => {
                self.board[coords.to_nd_index()] = Hidden;
                self.total_flags -= 1;
                if has_mine {
                    self.mines_left += 1;
                }
            }
            Hidden => {
                self.board[coords.to_nd_index()] = Flagged;
                self.total_flags += 1;
                if has_mine {
                    self.mines_left -= 1;
                }
            }
            Revealed => {
                log::debug!("Ignoring flag on opened cell {:?}", coords);
            }
        }
        self.debug_check_counters();

        Ok(if self.is_won() {
            log::debug!("All {} mines flagged", self.total_mines());
            FlagOutcome::Won
        } else {
            FlagOutcome::Pending
        })
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.mine_layout.validate_coords(coords)?;

        if self.mine_layout.contains_mine(coords) {
            log::debug!("Mine hit at {:?}", coords);
            return Ok(RevealOutcome::Exploded);
        }

        if self.board[coords.to_nd_index()] == Visibility::Revealed {
            return Ok(RevealOutcome::Opened);
        }

        self.open_cell(coords);
        let count = self.mine_layout.adjacent_mine_count(coords);
        log::debug!("Open cell at {:?}, mine count: {}", coords, count);

        if count == 0 {
            self.flood_reveal(coords);
        }
        self.debug_check_counters();

        Ok(RevealOutcome::Opened)
    }

    /// Breadth-first over edge-sharing cells, continuing only through cells with no adjacent mines.
    fn flood_reveal(&mut self, start: Coord2) {
        let mut visited: Array2<bool> = Array2::default(self.size().to_nd_index());
        visited[start.to_nd_index()] = true;
        let mut to_visit = VecDeque::from([start]);

        while let Some(current) = to_visit.pop_front() {
            for pos in self.mine_layout.iter_orthogonal(current) {
                if visited[pos.to_nd_index()] || self.mine_layout.contains_mine(pos) {
                    continue;
                }
                visited[pos.to_nd_index()] = true;
                self.open_cell(pos);

                let count = self.mine_layout.adjacent_mine_count(pos);
                log::trace!("Flood opened cell at {:?}, mine count: {}", pos, count);
                if count == 0 {
                    to_visit.push_back(pos);
                }
            }
        }
    }

    /// Opening a flagged cell takes its flag away.
    fn open_cell(&mut self, coords: Coord2) {
        let cell = &mut self.board[coords.to_nd_index()];
        if *cell == Visibility::Flagged {
            self.total_flags -= 1;
        }
        *cell = Visibility::Revealed;
    }

    fn debug_check_counters(&self) {
        debug_assert_eq!(
            (self.total_flags, self.mines_left),
            self.recount(),
            "flag counters drifted from the board"
        );
    }

    pub(crate) fn board(&self) -> &Array2<Visibility> {
        &self.board
    }
}
