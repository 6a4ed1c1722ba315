use super::direction::Direction;
use super::grid::{Cell, OccupancyGrid};
use crate::config::GameConfig;
use std::collections::VecDeque;
use std::time::Duration;

/// The snake's body and speed.
///
/// The body is kept as a ring buffer of cells: the head is stored on its own
/// and `body` runs from the tail (front) up to the segment right behind the
/// head (back), so moving and growing are both O(1) pushes & pops at the
/// ends.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct BodyChain {
    head: Cell,
    body: VecDeque<Cell>,
    direction: Direction,
    tick_interval_ms: u64,
    min_interval_ms: u64,
    interval_step_ms: u64,
}

impl BodyChain {
    /// Create a two-segment snake with its head at `head`, facing right, with
    /// its tail on the cell to the left of the head.  Both cells are marked in
    /// `grid`.
    pub(crate) fn new(head: Cell, grid: &mut OccupancyGrid, config: &GameConfig) -> BodyChain {
        let direction = Direction::Right;
        let tail = direction.opposite().advance(head, grid.size());
        grid.set(tail, true);
        grid.set(head, true);
        BodyChain {
            head,
            body: VecDeque::from([tail]),
            direction,
            tick_interval_ms: config.start_interval_ms(),
            min_interval_ms: config.min_interval_ms(),
            interval_step_ms: config.interval_step_ms(),
        }
    }

    /// Build a snake from explicit segments listed head first
    #[cfg(test)]
    pub(crate) fn from_segments<I: IntoIterator<Item = Cell>>(
        segments: I,
        direction: Direction,
        grid: &mut OccupancyGrid,
        config: &GameConfig,
    ) -> BodyChain {
        let mut segments = segments.into_iter();
        let head = segments.next().unwrap_or_default();
        let mut body = VecDeque::new();
        grid.set(head, true);
        for cell in segments {
            grid.set(cell, true);
            body.push_front(cell);
        }
        BodyChain {
            head,
            body,
            direction,
            tick_interval_ms: config.start_interval_ms(),
            min_interval_ms: config.min_interval_ms(),
            interval_step_ms: config.interval_step_ms(),
        }
    }

    pub(crate) fn head(&self) -> Cell {
        self.head
    }

    pub(crate) fn tail(&self) -> Cell {
        self.body.front().copied().unwrap_or(self.head)
    }

    /// Number of segments, head included
    pub(crate) fn len(&self) -> usize {
        self.body.len() + 1
    }

    pub(crate) fn direction(&self) -> Direction {
        self.direction
    }

    pub(crate) fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms
    }

    /// Time the tick task should wait between steps at the current speed
    pub(crate) fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Iterate over the segments from head to tail
    #[cfg(test)]
    pub(crate) fn segments(&self) -> impl Iterator<Item = Cell> + '_ {
        std::iter::once(self.head).chain(self.body.iter().rev().copied())
    }

    /// Point the snake in `requested` unless that would reverse it onto
    /// itself.  Returns `true` if the direction changed.
    pub(crate) fn set_direction(&mut self, requested: Direction) -> bool {
        if requested == self.direction || requested == self.direction.opposite() {
            return false;
        }
        self.direction = requested;
        true
    }

    /// Move the snake forwards one cell, wrapping around the board.
    ///
    /// The tail leaves its cell before the new head cell is checked, so the
    /// head may move into the cell the tail is vacating.  On a collision
    /// neither the snake nor `grid` is modified.
    pub(crate) fn step(&mut self, grid: &mut OccupancyGrid) -> Step {
        let next = self.direction.advance(self.head, grid.size());
        let tail = self.tail();
        // After growing, the last two segments share a cell, and the cell
        // stays covered when the tail retracts.
        let before_tail = self.body.get(1).copied().unwrap_or(self.head);
        let vacates = before_tail != tail;
        if grid.is_occupied(next) && !(vacates && next == tail) {
            return Step::Collided(next);
        }
        let _ = self.body.pop_front();
        if vacates {
            grid.set(tail, false);
        }
        self.body.push_back(self.head);
        self.head = next;
        grid.set(next, true);
        Step::Moved
    }

    /// Lengthen the snake by one segment in response to eating food, and
    /// speed it up.
    ///
    /// The new segment sits on top of the current tail until the next step,
    /// when the old tail moves on and the new one stays put.
    pub(crate) fn grow(&mut self) {
        self.body.push_front(self.tail());
        self.tick_interval_ms = self
            .tick_interval_ms
            .saturating_sub(self.interval_step_ms)
            .max(self.min_interval_ms);
    }
}

/// Result of [`BodyChain::step()`]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Step {
    Moved,
    /// The head ran into the body at the given cell
    Collided(Cell),
}
