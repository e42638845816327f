use crate::config::SimConfig;
use crate::grid::{Cell, Grid};
use crate::rng::RandomSource;

/// Cycles a tree stays alight before it is burned out.
pub(crate) const BURN_STAGES: u8 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Strike {
    pub(crate) row: usize,
    pub(crate) col: usize,
    /// False when the bolt landed on anything but a standing tree.
    pub(crate) ignited: bool,
}

/// One synchronous cycle: every cell of `next` is derived from `current`
/// alone. Returns how many cells changed (burning cells count every cycle).
pub(crate) fn step(
    current: &Grid<Cell>,
    next: &mut Grid<Cell>,
    burn: &mut Grid<u8>,
    config: &SimConfig,
    rng: &mut impl RandomSource,
) -> usize {
    debug_assert_eq!(current.size(), next.size());
    let size = current.size();
    let mut changes = 0;

    for r in 0..size {
        for c in 0..size {
            let cell = match current.get(r, c) {
                Cell::Burning => {
                    let stage = burn.get(r, c).saturating_add(1);
                    burn.set(r, c, stage);
                    changes += 1;
                    if stage >= BURN_STAGES {
                        Cell::Burned
                    } else {
                        Cell::Burning
                    }
                }
                Cell::Tree => {
                    if catches_fire(current, r, c, config, rng) {
                        burn.set(r, c, 0);
                        changes += 1;
                        Cell::Burning
                    } else {
                        Cell::Tree
                    }
                }
                settled => settled,
            };
            next.set(r, c, cell);
        }
    }
    changes
}

fn catches_fire(
    grid: &Grid<Cell>,
    row: usize,
    col: usize,
    config: &SimConfig,
    rng: &mut impl RandomSource,
) -> bool {
    let n = grid.neighbor_counts(row, col);
    if n.fuel == 0 || n.burning == 0 {
        return false;
    }
    // burning / fuel >= neighbor_effect / 100, kept in integers
    if n.burning * 100 < config.neighbor_effect as usize * n.fuel {
        return false;
    }
    rng.below(100) < config.catch_fire_percent as usize
}

/// At most one lightning strike on `grid`, applied before the cycle's
/// transition. Returns where it landed, if it came down at all.
pub(crate) fn strike(
    grid: &mut Grid<Cell>,
    burn: &mut Grid<u8>,
    config: &SimConfig,
    rng: &mut impl RandomSource,
) -> Option<Strike> {
    if !config.lightning_enabled || rng.fraction() >= config.lightning_chance {
        return None;
    }
    let size = grid.size();
    let row = rng.below(size);
    let col = rng.below(size);
    let ignited = grid.get(row, col) == Cell::Tree;
    if ignited {
        grid.set(row, col, Cell::Burning);
        burn.set(row, col, 0);
    }
    Some(Strike { row, col, ignited })
}
