use super::grid::{Cell, OccupancyGrid};
use rand::{seq::IteratorRandom, Rng};
use std::collections::VecDeque;

/// Cells where food has been eaten and which the snake's body is still
/// passing over, oldest first.  Each one is drawn as a bulge in the snake
/// until the tail has moved past it.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct FoodQueue {
    markers: VecDeque<Cell>,
}

impl FoodQueue {
    pub(crate) fn new() -> FoodQueue {
        FoodQueue::default()
    }

    pub(crate) fn enqueue(&mut self, cell: Cell) {
        self.markers.push_back(cell);
    }

    /// Drop the oldest marker if the snake no longer covers its cell.  At most
    /// one marker is removed per call.
    pub(crate) fn evict_oldest_if_vacated(&mut self, grid: &OccupancyGrid) -> Option<Cell> {
        let &oldest = self.markers.front()?;
        if grid.is_occupied(oldest) {
            None
        } else {
            self.markers.pop_front()
        }
    }

    /// Iterate over the markers from oldest to newest
    pub(crate) fn iter(&self) -> impl Iterator<Item = Cell> + Clone + '_ {
        self.markers.iter().copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.markers.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

/// Choose a random unoccupied cell for the next food item, or `None` if the
/// snake covers the whole board.
///
/// Cells are normally chosen by drawing random cells until a free one turns
/// up.  If `full_scan_percent` is set and the snake covers at least that
/// percentage of the board, the free cells are enumerated and one is picked
/// from among them instead, so that the search does not drag on when only a
/// few free cells remain.
pub(crate) fn pick_new_food<R: Rng + ?Sized>(
    rng: &mut R,
    grid: &OccupancyGrid,
    full_scan_percent: Option<u8>,
) -> Option<Cell> {
    if grid.is_full() {
        return None;
    }
    let size = grid.size();
    if let Some(pct) = full_scan_percent {
        if grid.occupied_count() * 100 >= size.area() * usize::from(pct) {
            return size.cells().filter(|&c| !grid.is_occupied(c)).choose(rng);
        }
    }
    loop {
        let cell = Cell::new(
            rng.random_range(0..size.width),
            rng.random_range(0..size.height),
        );
        if !grid.is_occupied(cell) {
            return Some(cell);
        }
    }
}
