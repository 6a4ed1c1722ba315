use super::grid::{Cell, GridSize};
use enum_map::Enum;

#[derive(Clone, Copy, Debug, Enum, Eq, Hash, PartialEq)]
pub(crate) enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Return the cell one step from `cell` in this direction, wrapping
    /// around the edges of a board of the given size
    pub(crate) fn advance(self, cell: Cell, size: GridSize) -> Cell {
        let Cell { mut x, mut y } = cell;
        match self {
            Direction::Up => y = decrement_wrapping(y, size.height),
            Direction::Down => y = increment_wrapping(y, size.height),
            Direction::Left => x = decrement_wrapping(x, size.width),
            Direction::Right => x = increment_wrapping(x, size.width),
        }
        Cell { x, y }
    }

    pub(crate) fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

fn decrement_wrapping(v: u16, max: u16) -> u16 {
    v.checked_sub(1).unwrap_or_else(|| max.saturating_sub(1))
}

fn increment_wrapping(v: u16, max: u16) -> u16 {
    v.checked_add(1).filter(|&vv| vv < max).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Direction::Up, Cell::new(2, 7), Cell::new(2, 6))]
    #[case(Direction::Down, Cell::new(2, 7), Cell::new(2, 8))]
    #[case(Direction::Left, Cell::new(2, 7), Cell::new(1, 7))]
    #[case(Direction::Right, Cell::new(2, 7), Cell::new(3, 7))]
    #[case(Direction::Up, Cell::new(2, 0), Cell::new(2, 14))]
    #[case(Direction::Down, Cell::new(2, 14), Cell::new(2, 0))]
    #[case(Direction::Left, Cell::new(0, 7), Cell::new(9, 7))]
    #[case(Direction::Right, Cell::new(9, 7), Cell::new(0, 7))]
    fn test_advance(#[case] d: Direction, #[case] cell: Cell, #[case] r: Cell) {
        assert_eq!(d.advance(cell, GridSize::new(10, 15)), r);
    }

    #[test]
    fn advance_on_maximal_board() {
        let size = GridSize::new(u16::MAX, 1);
        assert_eq!(
            Direction::Right.advance(Cell::new(u16::MAX - 1, 0), size),
            Cell::new(0, 0)
        );
        assert_eq!(
            Direction::Down.advance(Cell::new(5, 0), size),
            Cell::new(5, 0)
        );
    }

    #[rstest]
    #[case(Direction::Up, Direction::Down)]
    #[case(Direction::Down, Direction::Up)]
    #[case(Direction::Left, Direction::Right)]
    #[case(Direction::Right, Direction::Left)]
    fn test_opposite(#[case] d: Direction, #[case] r: Direction) {
        assert_eq!(d.opposite(), r);
        assert_eq!(r.opposite(), d);
    }
}
