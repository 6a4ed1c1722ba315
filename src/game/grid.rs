use std::fmt;

/// A cell on the board, relative to the top-left corner
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub(crate) struct Cell {
    pub(crate) x: u16,
    pub(crate) y: u16,
}

impl Cell {
    pub(crate) const fn new(x: u16, y: u16) -> Cell {
        Cell { x, y }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Dimensions of the board.  Both are nonzero once a `GameConfig` has been
/// validated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct GridSize {
    pub(crate) width: u16,
    pub(crate) height: u16,
}

impl GridSize {
    pub(crate) const fn new(width: u16, height: u16) -> GridSize {
        GridSize { width, height }
    }

    pub(crate) fn area(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// Iterate over every cell of the board in row-major order
    pub(crate) fn cells(self) -> impl Iterator<Item = Cell> {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Cell::new(x, y)))
    }

    /// The center cell, used as the default starting position of the head
    pub(crate) fn center(self) -> Cell {
        Cell::new(self.width / 2, self.height / 2)
    }
}

/// Which cells of the board are covered by the snake's body.
///
/// Only [`BodyChain`][super::snake::BodyChain] writes to the grid; everything
/// else reads it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct OccupancyGrid {
    size: GridSize,
    cells: Vec<bool>,
    occupied: usize,
}

impl OccupancyGrid {
    pub(crate) fn new(size: GridSize) -> OccupancyGrid {
        OccupancyGrid {
            size,
            cells: vec![false; size.area()],
            occupied: 0,
        }
    }

    pub(crate) fn size(&self) -> GridSize {
        self.size
    }

    pub(crate) fn is_occupied(&self, cell: Cell) -> bool {
        self.index(cell)
            .and_then(|i| self.cells.get(i))
            .copied()
            .unwrap_or(false)
    }

    pub(crate) fn set(&mut self, cell: Cell, occupied: bool) {
        let Some(i) = self.index(cell) else {
            return;
        };
        if let Some(slot) = self.cells.get_mut(i) {
            match (*slot, occupied) {
                (false, true) => self.occupied += 1,
                (true, false) => self.occupied -= 1,
                _ => (),
            }
            *slot = occupied;
        }
    }

    /// Number of cells currently marked occupied
    pub(crate) fn occupied_count(&self) -> usize {
        self.occupied
    }

    pub(crate) fn is_full(&self) -> bool {
        self.occupied == self.cells.len()
    }

    /// Iterate over the occupied cells in row-major order
    pub(crate) fn occupied_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.size.cells().filter(|&c| self.is_occupied(c))
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        (cell.x < self.size.width && cell.y < self.size.height)
            .then(|| usize::from(cell.y) * usize::from(self.size.width) + usize::from(cell.x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_clear() {
        let mut grid = OccupancyGrid::new(GridSize::new(4, 3));
        assert!(!grid.is_occupied(Cell::new(3, 2)));
        grid.set(Cell::new(3, 2), true);
        grid.set(Cell::new(0, 1), true);
        assert!(grid.is_occupied(Cell::new(3, 2)));
        assert!(grid.is_occupied(Cell::new(0, 1)));
        assert!(!grid.is_occupied(Cell::new(1, 0)));
        assert_eq!(grid.occupied_count(), 2);
        grid.set(Cell::new(3, 2), false);
        assert!(!grid.is_occupied(Cell::new(3, 2)));
        assert_eq!(grid.occupied_count(), 1);
    }

    #[test]
    fn repeated_set_counts_once() {
        let mut grid = OccupancyGrid::new(GridSize::new(4, 3));
        grid.set(Cell::new(1, 1), true);
        grid.set(Cell::new(1, 1), true);
        assert_eq!(grid.occupied_count(), 1);
        grid.set(Cell::new(1, 1), false);
        grid.set(Cell::new(1, 1), false);
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn out_of_bounds_is_ignored() {
        let mut grid = OccupancyGrid::new(GridSize::new(4, 3));
        grid.set(Cell::new(4, 0), true);
        grid.set(Cell::new(0, 3), true);
        assert_eq!(grid.occupied_count(), 0);
        assert!(!grid.is_occupied(Cell::new(4, 0)));
        assert!(!grid.is_occupied(Cell::new(0, 1)));
    }

    #[test]
    fn full_grid() {
        let size = GridSize::new(2, 2);
        let mut grid = OccupancyGrid::new(size);
        for c in size.cells() {
            assert!(!grid.is_full());
            grid.set(c, true);
        }
        assert!(grid.is_full());
        assert_eq!(
            grid.occupied_cells().collect::<Vec<_>>(),
            [
                Cell::new(0, 0),
                Cell::new(1, 0),
                Cell::new(0, 1),
                Cell::new(1, 1)
            ]
        );
    }
}
