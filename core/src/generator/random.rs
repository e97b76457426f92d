use ndarray::Array2;
use rand::prelude::*;
use rand::rngs::SmallRng;

use super::*;

/// Uniformly random placement that never puts a mine on the starting cell.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMinefieldGenerator {
    seed: u64,
    start: Coord2,
}

impl RandomMinefieldGenerator {
    pub fn new(seed: u64, start: Coord2) -> Self {
        Self { seed, start }
    }

    /// Seed to use for the placement after one seeded with `seed`.
    pub fn next_seed(seed: u64) -> u64 {
        SmallRng::seed_from_u64(seed ^ 0x9e37_79b9_7f4a_7c15).random()
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(self, config: GameConfig) -> MineLayout {
        let total_cells = config.total_cells();
        let mut mines: Array2<bool> = Array2::default(config.size.to_nd_index());

        let start_in_bounds = config.contains(self.start);
        if !start_in_bounds {
            log::warn!(
                "Start cell {:?} is outside a {:?} board, no cell is kept safe",
                self.start,
                config.size
            );
        }

        // the start cell is occupied while placing, then cleared again
        let mut free_cells = if start_in_bounds {
            mines[self.start.to_nd_index()] = true;
            total_cells - 1
        } else {
            total_cells
        };

        if config.mines > free_cells {
            log::warn!(
                "Minefield cannot fit all mines, requested {} but only {} cells are free",
                config.mines,
                free_cells
            );
        }

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut mines_placed: CellCount = 0;
        if let Some(cells) = mines.as_slice_mut() {
            while mines_placed < config.mines && free_cells > 0 {
                // index among the free cells, shifted past every occupied one
                let mut place: CellCount = rng.random_range(0..free_cells);
                for (i, cell) in cells.iter_mut().enumerate() {
                    let i = i as CellCount;
                    if *cell {
                        place += 1;
                    }
                    if i == place {
                        *cell = true;
                        mines_placed += 1;
                        free_cells -= 1;
                        break;
                    }
                }
            }
        }

        if start_in_bounds {
            mines[self.start.to_nd_index()] = false;
        }

        let layout = MineLayout::from_mine_mask(mines);
        if layout.mine_count() != config.mines {
            log::warn!(
                "Generated minefield count mismatch, actual: {}, requested: {}",
                layout.mine_count(),
                config.mines
            );
        }
        log::debug!(
            "Placed {} mines on a {:?} board, start {:?} kept safe",
            layout.mine_count(),
            config.size,
            self.start
        );
        layout
    }
}
