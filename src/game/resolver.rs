use super::direction::Direction;
use enum_map::EnumMap;

/// The set of direction keys held down at a given moment
pub(crate) type HeldKeys = EnumMap<Direction, bool>;

/// Tracks when each direction key was pressed and decides which direction the
/// player currently wants: the most recently pressed key that is still held
/// wins, regardless of the order in which other keys are released.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct InputResolver {
    keys: EnumMap<Direction, KeyState>,
}

impl InputResolver {
    pub(crate) fn new() -> InputResolver {
        InputResolver::default()
    }

    /// Update the key states from a sample of the held keys taken at time
    /// `now` (in nanoseconds on a monotonic clock).  A key that is still held
    /// keeps the timestamp of its original press.
    pub(crate) fn observe(&mut self, held: &HeldKeys, now: u64) {
        for (direction, state) in &mut self.keys {
            *state = match (*state, held[direction]) {
                (KeyState::Idle, true) => KeyState::Held { since: now },
                (st @ KeyState::Held { .. }, true) => st,
                (_, false) => KeyState::Idle,
            };
        }
    }

    /// Return the held direction that was pressed most recently, or `None` if
    /// no direction key is held.  On equal timestamps the direction declared
    /// first in [`Direction`] wins.
    pub(crate) fn resolve(&self) -> Option<Direction> {
        let mut best: Option<(Direction, u64)> = None;
        for (direction, &state) in &self.keys {
            if let KeyState::Held { since } = state {
                if best.is_none_or(|(_, t)| since > t) {
                    best = Some((direction, since));
                }
            }
        }
        best.map(|(direction, _)| direction)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
enum KeyState {
    #[default]
    Idle,
    Held {
        since: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use enum_map::enum_map;

    fn held(directions: &[Direction]) -> HeldKeys {
        let mut keys = HeldKeys::default();
        for &d in directions {
            keys[d] = true;
        }
        keys
    }

    #[test]
    fn nothing_held() {
        let mut resolver = InputResolver::new();
        assert_eq!(resolver.resolve(), None);
        resolver.observe(&HeldKeys::default(), 50);
        assert_eq!(resolver.resolve(), None);
    }

    #[test]
    fn most_recent_press_wins() {
        let mut resolver = InputResolver::new();
        resolver.observe(&held(&[Direction::Up]), 100);
        assert_eq!(resolver.resolve(), Some(Direction::Up));
        resolver.observe(&held(&[Direction::Up, Direction::Right]), 200);
        assert_eq!(resolver.resolve(), Some(Direction::Right));
        // Still held: the original press times are kept
        resolver.observe(&held(&[Direction::Up, Direction::Right]), 300);
        assert_eq!(resolver.resolve(), Some(Direction::Right));
        resolver.observe(&held(&[Direction::Up]), 400);
        assert_eq!(resolver.resolve(), Some(Direction::Up));
        resolver.observe(&held(&[]), 500);
        assert_eq!(resolver.resolve(), None);
    }

    #[test]
    fn older_key_loses_even_when_released_later() {
        let mut resolver = InputResolver::new();
        resolver.observe(&held(&[Direction::Left]), 10);
        resolver.observe(&held(&[Direction::Left, Direction::Down]), 20);
        resolver.observe(&held(&[Direction::Left, Direction::Down]), 30);
        assert_eq!(resolver.resolve(), Some(Direction::Down));
    }

    #[test]
    fn repress_refreshes_timestamp() {
        let mut resolver = InputResolver::new();
        resolver.observe(&held(&[Direction::Up]), 100);
        resolver.observe(&held(&[Direction::Up, Direction::Right]), 200);
        resolver.observe(&held(&[Direction::Right]), 300);
        resolver.observe(&held(&[Direction::Up, Direction::Right]), 400);
        assert_eq!(resolver.resolve(), Some(Direction::Up));
    }

    #[test]
    fn simultaneous_presses() {
        let mut resolver = InputResolver::new();
        resolver.observe(
            &enum_map! {
                Direction::Up => false,
                Direction::Down => true,
                Direction::Left => true,
                Direction::Right => true,
            },
            100,
        );
        assert_eq!(resolver.resolve(), Some(Direction::Down));
    }
}
