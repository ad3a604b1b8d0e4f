//! Input sources for the player behaviour.
//!
//! The player samples one [`Direction`] per tick from an [`InputSource`].
//! Keyboard capture itself lives outside this crate; [`KeyboardState`] only
//! records which keys the host reports as held.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use tilechase_common::Direction;

/// Pull-based direction accessor, sampled once per tick.
pub trait InputSource {
    /// Current movement direction.
    fn direction(&mut self) -> Direction;
}

impl<F> InputSource for F
where
    F: FnMut() -> Direction,
{
    fn direction(&mut self) -> Direction {
        self()
    }
}

/// Movement keys recognised by [`KeyboardState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Left arrow
    ArrowLeft,
    /// Right arrow
    ArrowRight,
    /// Up arrow
    ArrowUp,
    /// Down arrow
    ArrowDown,
    /// W
    KeyW,
    /// A
    KeyA,
    /// S
    KeyS,
    /// D
    KeyD,
}

/// Set of currently held movement keys.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    pressed: AHashSet<Key>,
}

impl KeyboardState {
    /// Creates a state with no keys held.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a key as held.
    pub fn press(&mut self, key: Key) {
        self.pressed.insert(key);
    }

    /// Marks a key as released.
    pub fn release(&mut self, key: Key) {
        self.pressed.remove(&key);
    }

    /// Releases every key.
    pub fn clear(&mut self) {
        self.pressed.clear();
    }

    /// Check if a key is held.
    #[must_use]
    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    /// Direction implied by the held keys.
    ///
    /// Left wins over right and up wins over down when both are held.
    #[must_use]
    pub fn current_direction(&self) -> Direction {
        let held = |a, b| self.is_pressed(a) || self.is_pressed(b);

        let x = if held(Key::ArrowLeft, Key::KeyA) {
            -1
        } else if held(Key::ArrowRight, Key::KeyD) {
            1
        } else {
            0
        };
        let y = if held(Key::ArrowUp, Key::KeyW) {
            -1
        } else if held(Key::ArrowDown, Key::KeyS) {
            1
        } else {
            0
        };

        Direction::new(x, y)
    }
}

impl InputSource for KeyboardState {
    fn direction(&mut self) -> Direction {
        self.current_direction()
    }
}

/// Input that never moves.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl InputSource for NoInput {
    fn direction(&mut self) -> Direction {
        Direction::ZERO
    }
}

/// Replays a fixed list of `(direction, ticks)` segments, looping forever.
#[derive(Debug, Clone)]
pub struct ScriptedInput {
    segments: Vec<(Direction, u32)>,
    cursor: usize,
    elapsed: u32,
}

impl ScriptedInput {
    /// Creates a script. Segments with zero ticks are skipped.
    #[must_use]
    pub fn new(segments: Vec<(Direction, u32)>) -> Self {
        Self {
            segments: segments.into_iter().filter(|(_, n)| *n > 0).collect(),
            cursor: 0,
            elapsed: 0,
        }
    }

    /// A square patrol: right, down, left, up, `leg` ticks each.
    #[must_use]
    pub fn patrol(leg: u32) -> Self {
        Self::new(vec![
            (Direction::new(1, 0), leg),
            (Direction::new(0, 1), leg),
            (Direction::new(-1, 0), leg),
            (Direction::new(0, -1), leg),
        ])
    }
}

impl InputSource for ScriptedInput {
    fn direction(&mut self) -> Direction {
        let Some(&(direction, ticks)) = self.segments.get(self.cursor) else {
            return Direction::ZERO;
        };
        self.elapsed += 1;
        if self.elapsed >= ticks {
            self.elapsed = 0;
            self.cursor = (self.cursor + 1) % self.segments.len();
        }
        direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_directions() {
        let mut keys = KeyboardState::new();
        assert_eq!(keys.direction(), Direction::ZERO);

        keys.press(Key::KeyD);
        keys.press(Key::ArrowDown);
        assert_eq!(keys.direction(), Direction::new(1, 1));

        keys.release(Key::KeyD);
        keys.press(Key::ArrowUp);
        assert_eq!(keys.direction(), Direction::new(0, -1));
    }

    #[test]
    fn test_keyboard_left_and_up_take_priority() {
        let mut keys = KeyboardState::new();
        keys.press(Key::ArrowRight);
        keys.press(Key::KeyA);
        keys.press(Key::KeyS);
        keys.press(Key::KeyW);
        assert_eq!(keys.direction(), Direction::new(-1, -1));

        keys.clear();
        assert!(!keys.is_pressed(Key::KeyA));
    }

    #[test]
    fn test_scripted_input_loops() {
        let mut script = ScriptedInput::new(vec![
            (Direction::new(1, 0), 2),
            (Direction::ZERO, 0),
            (Direction::new(0, -1), 1),
        ]);
        let seen: Vec<_> = (0..5).map(|_| script.direction()).collect();
        assert_eq!(
            seen,
            vec![
                Direction::new(1, 0),
                Direction::new(1, 0),
                Direction::new(0, -1),
                Direction::new(1, 0),
                Direction::new(1, 0),
            ]
        );
    }

    #[test]
    fn test_empty_script_and_closure_sources() {
        let mut empty = ScriptedInput::new(Vec::new());
        assert_eq!(empty.direction(), Direction::ZERO);

        let mut closure = || Direction::new(-1, 1);
        assert_eq!(InputSource::direction(&mut closure), Direction::new(-1, 1));
        assert_eq!(NoInput.direction(), Direction::ZERO);
    }
}
