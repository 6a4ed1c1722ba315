use crate::command::Command;
use crate::consts;
use crate::game::{Direction, HeldKeys, InputResolver};
use crossterm::{
    event::{
        poll, read, Event, KeyEvent, KeyEventKind, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::supports_keyboard_enhancement,
};
use enum_map::EnumMap;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc::Sender, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// A source of keyboard state
pub(crate) trait KeySource {
    /// Report which direction keys are currently held down.  Implementations
    /// may block briefly while waiting for input.
    fn held_directions(&mut self) -> io::Result<HeldKeys>;

    /// Has the user asked to quit?
    fn quit_requested(&self) -> bool {
        false
    }
}

/// Reads key state from the terminal.
///
/// Terminals that support the kitty keyboard protocol report key releases,
/// which gives exact held-key tracking.  Elsewhere a key is considered held
/// until a different direction is pressed or [`consts::KEY_HOLD_TIMEOUT`]
/// passes without a press or auto-repeat.
#[derive(Clone, Debug)]
pub(crate) struct TerminalKeys {
    held: HeldKeys,
    last_seen: EnumMap<Direction, Option<Instant>>,
    release_events: bool,
    quit: bool,
}

impl TerminalKeys {
    pub(crate) fn new(release_events: bool) -> TerminalKeys {
        TerminalKeys {
            held: HeldKeys::default(),
            last_seen: EnumMap::default(),
            release_events,
            quit: false,
        }
    }

    fn handle_event(&mut self, event: Event, now: Instant) {
        match event {
            Event::Key(ev) => self.handle_key(ev, now),
            Event::FocusLost => self.held = HeldKeys::default(),
            _ => (),
        }
    }

    fn handle_key(&mut self, ev: KeyEvent, now: Instant) {
        let Some(cmd) = Command::from_key_event(ev) else {
            return;
        };
        match (cmd.direction(), ev.kind) {
            (Some(d), KeyEventKind::Release) => self.held[d] = false,
            (Some(d), _) => {
                if !self.release_events {
                    // Without release events, pressing a new direction is
                    // the only sign that the others have been let go
                    for (other, held) in &mut self.held {
                        if other != d {
                            *held = false;
                        }
                    }
                }
                self.held[d] = true;
                self.last_seen[d] = Some(now);
            }
            (None, KeyEventKind::Release) => (),
            (None, _) => self.quit = true,
        }
    }

    fn expire(&mut self, now: Instant) {
        if self.release_events {
            return;
        }
        for (d, held) in &mut self.held {
            if *held
                && self.last_seen[d]
                    .is_none_or(|seen| now.saturating_duration_since(seen) >= consts::KEY_HOLD_TIMEOUT)
            {
                *held = false;
            }
        }
    }
}

impl KeySource for TerminalKeys {
    fn held_directions(&mut self) -> io::Result<HeldKeys> {
        let mut wait = consts::KEY_POLL_PERIOD;
        while poll(wait)? {
            self.handle_event(read()?, Instant::now());
            wait = Duration::ZERO;
        }
        self.expire(Instant::now());
        Ok(self.held)
    }

    fn quit_requested(&self) -> bool {
        self.quit
    }
}

/// Ask the terminal to report key releases.  Returns `false` if the terminal
/// does not support this.
///
/// Must be called while the terminal is in raw mode.
pub(crate) fn request_release_events() -> io::Result<bool> {
    if !supports_keyboard_enhancement()? {
        return Ok(false);
    }
    execute!(
        io::stdout(),
        PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
    )?;
    Ok(true)
}

/// Undo [`request_release_events()`]
pub(crate) fn restore_key_events() -> io::Result<()> {
    execute!(io::stdout(), PopKeyboardEnhancementFlags)
}

/// A monotonic clock measuring nanoseconds since its creation.  Readings are
/// never zero.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Clock {
    epoch: Instant,
}

impl Clock {
    pub(crate) fn new() -> Clock {
        Clock {
            epoch: Instant::now(),
        }
    }

    pub(crate) fn now(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_nanos())
            .unwrap_or(u64::MAX)
            .saturating_add(1)
    }
}

/// Body of the input thread: repeatedly sample `keys` and feed the results to
/// `resolver` until `stop` is set or the user asks to quit, in which case
/// [`Command::Quit`] is sent on `commands`.
///
/// If reading from the terminal fails, the error is returned and `commands`
/// is dropped so that the receiver sees a disconnect.
pub(crate) fn sample_keys<K: KeySource>(
    mut keys: K,
    resolver: &Mutex<InputResolver>,
    stop: &AtomicBool,
    commands: Sender<Command>,
) -> io::Result<()> {
    let clock = Clock::new();
    while !stop.load(Ordering::Relaxed) {
        let held = match keys.held_directions() {
            Ok(held) => held,
            Err(e) => {
                warn!("Failed to read keyboard input: {e}");
                return Err(e);
            }
        };
        resolver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .observe(&held, clock.now());
        if keys.quit_requested() {
            debug!("Quit requested");
            let _ = commands.send(Command::Quit);
            break;
        }
    }
    Ok(())
}
