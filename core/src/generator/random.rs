use super::*;
use ndarray::Array2;

/// Purely random placement: every cell is equally likely to hold a mine.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMinefieldGenerator {
    seed: u64,
}

impl RandomMinefieldGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(self, config: GameConfig) -> Result<MineLayout> {
        use rand::prelude::*;

        // fields are public, so re-check before sampling: a full grid would never finish
        let config = GameConfig::new(config.size, config.mines)?;
        let (rows, cols) = config.size;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut mines: Array2<bool> = Array2::default(config.size.to_nd_index());
        let mut mine_coords = alloc::vec::Vec::with_capacity(config.mines.into());

        while mine_coords.len() < usize::from(config.mines) {
            let coords: Coord2 = (rng.random_range(0..rows), rng.random_range(0..cols));
            if mines[coords.to_nd_index()] {
                continue;
            }
            mines[coords.to_nd_index()] = true;
            mine_coords.push(coords);
        }

        log::debug!(
            "Generated {}x{} minefield with {} mines from seed {}",
            rows,
            cols,
            config.mines,
            self.seed
        );
        log::trace!("Mine positions: {:?}", mine_coords);

        MineLayout::from_mine_coords(config.size, &mine_coords)
    }
}
