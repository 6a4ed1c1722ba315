use crate::command::Command;
use crate::consts;
use crate::game::{GameEngine, InputResolver, Tick};
use crate::keys::{sample_keys, KeySource};
use ratatui::{backend::Backend, Terminal};
use rand::Rng;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError};
use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;

#[derive(Clone, Debug)]
pub(crate) struct App<R> {
    engine: GameEngine<R>,
}

impl<R: Rng> App<R> {
    pub(crate) fn new(engine: GameEngine<R>) -> App<R> {
        App { engine }
    }

    /// Run the game until the user quits.  Key sampling happens on a
    /// separate thread while this one advances the game and redraws the
    /// screen.  Once the game ends, the final frame stays up until the user
    /// quits.
    pub(crate) fn run<B: Backend, K: KeySource + Send>(
        &mut self,
        mut terminal: Terminal<B>,
        keys: K,
    ) -> io::Result<()> {
        let resolver = Mutex::new(InputResolver::new());
        let stop = AtomicBool::new(false);
        let (sender, receiver) = channel();
        thread::scope(|s| {
            let sampler = s.spawn(|| sample_keys(keys, &resolver, &stop, sender));
            let r = self.main_loop(&mut terminal, &resolver, &receiver);
            stop.store(true, Ordering::Relaxed);
            let sampled = match sampler.join() {
                Ok(sampled) => sampled,
                Err(panic) => std::panic::resume_unwind(panic),
            };
            r.and(sampled)
        })
    }

    fn main_loop<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        resolver: &Mutex<InputResolver>,
        commands: &Receiver<Command>,
    ) -> io::Result<()> {
        let start = Instant::now();
        let mut schedule = TickSchedule::new(start, self.engine.tick_interval());
        let mut next_frame = start;
        loop {
            let now = Instant::now();
            if self.engine.running() && schedule.due(now) {
                let direction = resolver
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .resolve();
                match self.engine.tick(direction) {
                    Tick::Collided(cell) => info!(
                        length = self.engine.snapshot().length,
                        "Game over: snake crashed into itself at {cell}"
                    ),
                    Tick::BoardFull => info!(
                        length = self.engine.snapshot().length,
                        "Game over: the snake fills the board"
                    ),
                    Tick::Moved | Tick::Ate | Tick::Ended => (),
                }
                schedule.advance(now, self.engine.tick_interval());
            }
            if now >= next_frame {
                terminal.draw(|frame| frame.render_widget(self.engine.snapshot(), frame.area()))?;
                next_frame = now + consts::FRAME_PERIOD;
            }
            let wake = if self.engine.running() {
                next_frame.min(schedule.deadline())
            } else {
                next_frame
            };
            match commands.recv_timeout(wake.saturating_duration_since(Instant::now())) {
                Ok(Command::Quit) | Err(RecvTimeoutError::Disconnected) => return Ok(()),
                Ok(_) | Err(RecvTimeoutError::Timeout) => (),
            }
        }
    }
}

/// Keeps track of when the next tick is due.  Each tick is scheduled one
/// interval after the previous deadline, so that time spent drawing does not
/// slow the game down; if the game falls a whole interval behind, the
/// schedule restarts from the present instead of firing a burst of ticks.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct TickSchedule {
    next: Instant,
}

impl TickSchedule {
    fn new(start: Instant, interval: Duration) -> TickSchedule {
        TickSchedule {
            next: start + interval,
        }
    }

    fn due(&self, now: Instant) -> bool {
        now >= self.next
    }

    fn deadline(&self) -> Instant {
        self.next
    }

    fn advance(&mut self, now: Instant, interval: Duration) {
        self.next += interval;
        if self.next <= now {
            self.next = now + interval;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GameConfig, RawGameConfig};
    use crate::game::{Cell, Direction, GameState, HeldKeys};
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;
    use ratatui::backend::TestBackend;

    const RNG_SEED: u64 = 0x0123456789ABCDEF;

    #[test]
    fn schedule_keeps_pace() {
        let start = Instant::now();
        let interval = Duration::from_millis(100);
        let mut schedule = TickSchedule::new(start, interval);
        assert!(!schedule.due(start));
        assert!(!schedule.due(start + Duration::from_millis(99)));
        let late = start + Duration::from_millis(130);
        assert!(schedule.due(late));
        schedule.advance(late, interval);
        // Lateness is absorbed rather than carried over
        assert_eq!(schedule.deadline(), start + Duration::from_millis(200));
        // A faster interval applies from the next deadline on
        schedule.advance(start + Duration::from_millis(200), Duration::from_millis(50));
        assert_eq!(schedule.deadline(), start + Duration::from_millis(250));
    }

    #[test]
    fn schedule_resets_when_far_behind() {
        let start = Instant::now();
        let interval = Duration::from_millis(100);
        let mut schedule = TickSchedule::new(start, interval);
        let stalled = start + Duration::from_millis(450);
        schedule.advance(stalled, interval);
        assert_eq!(schedule.deadline(), stalled + interval);
    }

    /// Holds a single direction key down for a fixed number of samples, then
    /// asks to quit
    #[derive(Clone, Debug)]
    struct HoldThenQuit {
        held: HeldKeys,
        samples_left: u32,
    }

    impl KeySource for HoldThenQuit {
        fn held_directions(&mut self) -> io::Result<HeldKeys> {
            thread::sleep(Duration::from_millis(1));
            self.samples_left = self.samples_left.saturating_sub(1);
            Ok(self.held)
        }

        fn quit_requested(&self) -> bool {
            self.samples_left == 0
        }
    }

    #[test]
    fn run_until_quit() {
        let config = GameConfig::try_from(RawGameConfig {
            grid_width: 40,
            grid_height: 10,
            start_interval_ms: 5,
            min_interval_ms: 5,
            ..RawGameConfig::default()
        })
        .unwrap();
        let engine = GameEngine::new_with_rng(
            config,
            Cell::new(20, 5),
            ChaCha12Rng::seed_from_u64(RNG_SEED),
        );
        let mut held = HeldKeys::default();
        held[Direction::Up] = true;
        let keys = HoldThenQuit {
            held,
            samples_left: 100,
        };
        let terminal = Terminal::new(TestBackend::new(44, 14)).unwrap();
        let mut app = App::new(engine);
        app.run(terminal, keys).unwrap();
        // A vertical loop of height 10 cannot collide with a short snake
        assert_eq!(app.engine.snapshot().state, GameState::Running);
        assert_eq!(app.engine.snapshot().direction, Direction::Up);
    }

    #[test]
    fn sampler_error_is_reported() {
        #[derive(Clone, Copy, Debug)]
        struct Broken;

        impl KeySource for Broken {
            fn held_directions(&mut self) -> io::Result<HeldKeys> {
                Err(io::Error::other("no tty"))
            }
        }

        let engine = GameEngine::new_with_rng(
            GameConfig::default(),
            Cell::new(3, 3),
            ChaCha12Rng::seed_from_u64(RNG_SEED),
        );
        let terminal = Terminal::new(TestBackend::new(40, 30)).unwrap();
        let e = App::new(engine).run(terminal, Broken).unwrap_err();
        assert_eq!(e.to_string(), "no tty");
    }
}
