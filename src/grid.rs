use crate::rng::RandomSource;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub(crate) enum Cell {
    #[default]
    Empty,
    Tree,
    Burning,
    Burned,
}

impl Cell {
    pub(crate) fn glyph(self) -> char {
        match self {
            Cell::Empty => ' ',
            Cell::Tree => 'Y',
            Cell::Burning => '*',
            Cell::Burned => '.',
        }
    }

    /// Fuel that can carry fire: a standing tree or one already alight.
    pub(crate) fn is_fuel(self) -> bool {
        matches!(self, Cell::Tree | Cell::Burning)
    }
}

/// Square, row-major, heap-owned grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Grid<T> {
    data: Vec<T>,
    size: usize,
}

impl<T: Copy + Default> Grid<T> {
    pub(crate) fn new(size: usize) -> Self {
        Self {
            data: vec![T::default(); size * size],
            size,
        }
    }

    pub(crate) fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn idx(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.size && col < self.size);
        row * self.size + col
    }

    #[inline]
    pub(crate) fn get(&self, row: usize, col: usize) -> T {
        self.data[self.idx(row, col)]
    }

    #[inline]
    pub(crate) fn set(&mut self, row: usize, col: usize, v: T) {
        let i = self.idx(row, col);
        self.data[i] = v;
    }

    pub(crate) fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        self.data.chunks(self.size)
    }
}

impl<T: Copy + Default + PartialEq> Grid<T> {
    pub(crate) fn count(&self, v: T) -> usize {
        self.data.iter().filter(|&&c| c == v).count()
    }

    pub(crate) fn contains(&self, v: T) -> bool {
        self.data.contains(&v)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct NeighborCounts {
    pub(crate) burning: usize,
    /// Trees and burning trees alike.
    pub(crate) fuel: usize,
}

impl Grid<Cell> {
    /// Moore neighborhood, clipped at the edges (no wraparound).
    pub(crate) fn neighbor_counts(&self, row: usize, col: usize) -> NeighborCounts {
        let mut counts = NeighborCounts::default();
        let r0 = row.saturating_sub(1);
        let c0 = col.saturating_sub(1);
        let r1 = (row + 1).min(self.size - 1);
        let c1 = (col + 1).min(self.size - 1);
        for r in r0..=r1 {
            for c in c0..=c1 {
                if r == row && c == col {
                    continue;
                }
                let cell = self.get(r, c);
                if cell == Cell::Burning {
                    counts.burning += 1;
                }
                if cell.is_fuel() {
                    counts.fuel += 1;
                }
            }
        }
        counts
    }
}

/// Scatter `density`% trees over an empty grid by rejection sampling, the
/// first `burning_percent`% of them already alight.
pub(crate) fn plant(
    size: usize,
    density: u32,
    burning_percent: u32,
    rng: &mut impl RandomSource,
) -> Grid<Cell> {
    let mut grid = Grid::new(size);
    let total = size * size;
    let mut trees = density as usize * total / 100;
    let mut burning = burning_percent as usize * trees / 100;

    while trees > 0 {
        let row = rng.below(size);
        let col = rng.below(size);
        if grid.get(row, col) != Cell::Empty {
            continue;
        }
        if burning > 0 {
            grid.set(row, col, Cell::Burning);
            burning -= 1;
        } else {
            grid.set(row, col, Cell::Tree);
        }
        trees -= 1;
    }
    grid
}

#[cfg(test)]
pub(crate) fn parse(rows: &[&str]) -> Grid<Cell> {
    let size = rows.len();
    let mut grid = Grid::new(size);
    for (r, line) in rows.iter().enumerate() {
        assert_eq!(line.chars().count(), size, "row {r} is not {size} wide");
        for (c, ch) in line.chars().enumerate() {
            let cell = match ch {
                ' ' => Cell::Empty,
                'Y' => Cell::Tree,
                '*' => Cell::Burning,
                '.' => Cell::Burned,
                other => panic!("unknown glyph {other:?}"),
            };
            grid.set(r, c, cell);
        }
    }
    grid
}
