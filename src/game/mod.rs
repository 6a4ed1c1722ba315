mod direction;
mod food;
mod grid;
mod resolver;
mod snake;
pub(crate) use self::direction::Direction;
use self::food::{pick_new_food, FoodQueue};
pub(crate) use self::grid::{Cell, GridSize};
use self::grid::OccupancyGrid;
pub(crate) use self::resolver::{HeldKeys, InputResolver};
use self::snake::{BodyChain, Step};
use crate::config::GameConfig;
use rand::Rng;
use std::time::Duration;
use tracing::debug;

/// The game-state engine.  Each call to [`GameEngine::tick()`] advances the
/// simulation by one step; pacing the calls is up to the caller.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct GameEngine<R = rand::rngs::ThreadRng> {
    rng: R,
    config: GameConfig,
    grid: OccupancyGrid,
    snake: BodyChain,
    eaten: FoodQueue,
    /// The food the snake is currently heading for.  This is only `None` once
    /// the board is full.
    target: Option<Cell>,
    state: GameState,
    ticks: u64,
}

impl GameEngine<rand::rngs::ThreadRng> {
    /// Start a new game with the snake's head in the middle of the board
    pub(crate) fn new(config: GameConfig) -> Self {
        GameEngine::new_with_rng(config, config.grid_size().center(), rand::rng())
    }
}

impl<R: Rng> GameEngine<R> {
    pub(crate) fn new_with_rng(config: GameConfig, head: Cell, mut rng: R) -> GameEngine<R> {
        let mut grid = OccupancyGrid::new(config.grid_size());
        let snake = BodyChain::new(head, &mut grid, &config);
        let target = pick_new_food(&mut rng, &grid, config.full_scan_percent());
        let state = if target.is_some() {
            GameState::Running
        } else {
            GameState::BoardFull
        };
        GameEngine {
            rng,
            config,
            grid,
            snake,
            eaten: FoodQueue::new(),
            target,
            state,
            ticks: 0,
        }
    }

    /// Advance the game by one tick, first turning the snake towards
    /// `direction` if given.  Does nothing once the game has ended.
    pub(crate) fn tick(&mut self, direction: Option<Direction>) -> Tick {
        if !self.running() {
            return Tick::Ended;
        }
        self.ticks += 1;
        if let Some(d) = direction {
            if self.snake.set_direction(d) {
                debug!(tick = self.ticks, direction = ?d, "Snake turned");
            }
        }
        if let Step::Collided(cell) = self.snake.step(&mut self.grid) {
            debug!(
                tick = self.ticks,
                length = self.snake.len(),
                "Snake ran into itself at {cell}"
            );
            self.state = GameState::GameOver { collision: cell };
            return Tick::Collided(cell);
        }
        let mut outcome = Tick::Moved;
        let head = self.snake.head();
        if self.target == Some(head) {
            self.snake.grow();
            self.eaten.enqueue(head);
            self.target = pick_new_food(&mut self.rng, &self.grid, self.config.full_scan_percent());
            debug!(
                tick = self.ticks,
                length = self.snake.len(),
                interval_ms = self.snake.tick_interval_ms(),
                swallowed = self.eaten.len(),
                "Snake ate food at {head}"
            );
            outcome = Tick::Ate;
            if self.target.is_none() {
                debug!(
                    tick = self.ticks,
                    length = self.snake.len(),
                    "No room left for food"
                );
                self.state = GameState::BoardFull;
                outcome = Tick::BoardFull;
            }
        }
        let _ = self.eaten.evict_oldest_if_vacated(&self.grid);
        outcome
    }
}

impl<R> GameEngine<R> {
    pub(crate) fn running(&self) -> bool {
        self.state == GameState::Running
    }

    /// Time to wait before the next tick at the snake's current speed
    pub(crate) fn tick_interval(&self) -> Duration {
        self.snake.tick_interval()
    }

    /// Everything a renderer needs in order to draw the current state of the
    /// game
    pub(crate) fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            size: self.grid.size(),
            grid: &self.grid,
            eaten: &self.eaten,
            food: self.target,
            head: self.snake.head(),
            direction: self.snake.direction(),
            length: self.snake.len(),
            tick_interval_ms: self.snake.tick_interval_ms(),
            state: self.state,
        }
    }
}

#[cfg(test)]
impl GameEngine<rand_chacha::ChaCha12Rng> {
    /// Set up a game in progress with the snake occupying `segments` (head
    /// first) and the food at `target`
    pub(crate) fn with_snake<I: IntoIterator<Item = Cell>>(
        config: GameConfig,
        segments: I,
        direction: Direction,
        target: Cell,
    ) -> Self {
        use rand::SeedableRng;
        let mut grid = OccupancyGrid::new(config.grid_size());
        let snake = BodyChain::from_segments(segments, direction, &mut grid, &config);
        GameEngine {
            rng: rand_chacha::ChaCha12Rng::seed_from_u64(0x0123456789ABCDEF),
            config,
            grid,
            snake,
            eaten: FoodQueue::new(),
            target: Some(target),
            state: GameState::Running,
            ticks: 0,
        }
    }

    pub(crate) fn set_food(&mut self, cell: Cell) {
        self.target = Some(cell);
    }
}

/// What happened during a call to [`GameEngine::tick()`]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Tick {
    Moved,
    Ate,
    Collided(Cell),
    /// The snake ate the last food there was room for
    BoardFull,
    /// The game had already ended; nothing changed
    Ended,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum GameState {
    Running,
    /// The snake ran into itself; `collision` is the cell the head tried to
    /// move into
    GameOver { collision: Cell },
    /// The snake covers the whole board and there are no more spaces to place
    /// food in
    BoardFull,
}

/// A read-only view of the game for rendering
#[derive(Clone, Copy, Debug)]
pub(crate) struct Snapshot<'a> {
    pub(crate) size: GridSize,
    pub(crate) grid: &'a OccupancyGrid,
    pub(crate) eaten: &'a FoodQueue,
    pub(crate) food: Option<Cell>,
    pub(crate) head: Cell,
    pub(crate) direction: Direction,
    pub(crate) length: usize,
    pub(crate) tick_interval_ms: u64,
    pub(crate) state: GameState,
}
