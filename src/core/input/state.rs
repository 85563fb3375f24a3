//=========================================================================
// Device State
//
// The current "what is held down" snapshot the input synthesizer reads
// once per tick.
//
// Backends differ in how they learn key state: winit only delivers
// events, SDL can be polled. Both end up filling a `KeyboardState`,
// which is the one device snapshot type the rest of the engine sees.
//
// Responsibilities:
// - Track held keys and mouse buttons (presence in a set = held)
// - Accumulate relative mouse motion between ticks
// - Answer `DeviceState` queries for bindings
//
//=========================================================================

//=== Standard Library Imports ============================================
use std::collections::HashSet;
use std::fmt;

//=== Internal Modules ====================================================
use super::key::{Key, MouseButton};

//=== DeviceState =========================================================

/// Read-only view of held keys and buttons.
///
/// Implemented by every device snapshot a backend can offer. Queries
/// for `Unknown` always return `false`.
pub trait DeviceState {
    fn is_key_down(&self, key: Key) -> bool;
    fn is_button_down(&self, button: MouseButton) -> bool;
}

//=== MouseMotion =========================================================

/// Relative pointer movement accumulated since the last tick, in pixels.
///
/// Kept fractional: some platforms report sub-pixel deltas, and the
/// synthesizer rounds once after scaling.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MouseMotion {
    pub dx: f64,
    pub dy: f64,
}

impl MouseMotion {
    pub fn is_zero(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }
}

//=== KeyboardState =======================================================
//
// Held keys and buttons plus pending mouse motion. Unknown keys are never
// stored, so a flood of unmapped native codes cannot grow the sets.
//
pub struct KeyboardState {
    keys: HashSet<Key>,
    buttons: HashSet<MouseButton>,
    motion: MouseMotion,
}

impl KeyboardState {
    //--- Constructor ------------------------------------------------------
    pub fn new() -> Self {
        const KEY_BASE: usize = 16;
        Self {
            keys: HashSet::with_capacity(KEY_BASE),
            buttons: HashSet::new(),
            motion: MouseMotion::default(),
        }
    }

    //--- Discrete Inputs --------------------------------------------------
    //
    // Each mutator returns `true` if the held set actually changed.
    //

    pub fn press_key(&mut self, key: Key) -> bool {
        key != Key::Unknown && self.keys.insert(key)
    }

    pub fn release_key(&mut self, key: Key) -> bool {
        self.keys.remove(&key)
    }

    pub fn press_button(&mut self, button: MouseButton) -> bool {
        button != MouseButton::Unknown && self.buttons.insert(button)
    }

    pub fn release_button(&mut self, button: MouseButton) -> bool {
        self.buttons.remove(&button)
    }

    /// Releases every key and button (focus loss, reset).
    pub fn release_all(&mut self) {
        self.keys.clear();
        self.buttons.clear();
        self.motion = MouseMotion::default();
    }

    /// Replaces the held key set wholesale (polling backends).
    pub fn set_keys<I: IntoIterator<Item = Key>>(&mut self, keys: I) {
        self.keys.clear();
        self.keys.extend(keys.into_iter().filter(|k| *k != Key::Unknown));
    }

    /// Replaces the held button set wholesale (polling backends).
    pub fn set_buttons<I: IntoIterator<Item = MouseButton>>(&mut self, buttons: I) {
        self.buttons.clear();
        self.buttons
            .extend(buttons.into_iter().filter(|b| *b != MouseButton::Unknown));
    }

    //--- Continuous Inputs ------------------------------------------------

    /// Adds relative motion, fractions included.
    pub fn add_motion(&mut self, dx: f64, dy: f64) {
        self.motion.dx += dx;
        self.motion.dy += dy;
    }

    /// Returns and clears the motion accumulated since the last call.
    pub fn take_motion(&mut self) -> MouseMotion {
        std::mem::take(&mut self.motion)
    }

    pub fn held_key_count(&self) -> usize {
        self.keys.len()
    }
}

impl Default for KeyboardState {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceState for KeyboardState {
    fn is_key_down(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons.contains(&button)
    }
}

//=== Debug Trait =========================================================
//
// Prints held inputs sorted, so log lines are comparable across ticks.
//
// ```text
// KeyboardState { keys: [W, LShift], buttons: [Mouse1], motion: (3, 0) }
// ```
//
impl fmt::Debug for KeyboardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.keys.iter().collect();
        keys.sort();
        let mut buttons: Vec<_> = self.buttons.iter().collect();
        buttons.sort();

        f.debug_struct("KeyboardState")
            .field("keys", &keys)
            .field("buttons", &buttons)
            .field("motion", &(self.motion.dx, self.motion.dy))
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release_key() {
        let mut state = KeyboardState::new();

        assert!(state.press_key(Key::A));
        assert!(state.is_key_down(Key::A));

        assert!(!state.press_key(Key::A), "second press is not a change");

        assert!(state.release_key(Key::A));
        assert!(!state.is_key_down(Key::A));
        assert!(!state.release_key(Key::A));
    }

    #[test]
    fn unknown_inputs_are_never_held() {
        let mut state = KeyboardState::new();

        assert!(!state.press_key(Key::Unknown));
        assert!(!state.press_button(MouseButton::Unknown));
        assert!(!state.is_key_down(Key::Unknown));
        assert_eq!(state.held_key_count(), 0);
    }

    #[test]
    fn button_press_and_release() {
        let mut state = KeyboardState::new();

        state.press_button(MouseButton::Mouse2);
        assert!(state.is_button_down(MouseButton::Mouse2));
        assert!(!state.is_button_down(MouseButton::Mouse1));

        state.release_button(MouseButton::Mouse2);
        assert!(!state.is_button_down(MouseButton::Mouse2));
    }

    #[test]
    fn motion_accumulates_until_taken() {
        let mut state = KeyboardState::new();

        state.add_motion(3.0, -1.0);
        state.add_motion(2.0, 4.0);
        assert_eq!(state.take_motion(), MouseMotion { dx: 5.0, dy: 3.0 });
        assert!(state.take_motion().is_zero());
    }

    #[test]
    fn sub_pixel_motion_is_kept() {
        let mut state = KeyboardState::new();

        state.add_motion(0.25, -0.5);
        state.add_motion(0.25, -0.25);
        assert_eq!(state.take_motion(), MouseMotion { dx: 0.5, dy: -0.75 });
    }

    #[test]
    fn release_all_clears_everything() {
        let mut state = KeyboardState::new();
        state.press_key(Key::W);
        state.press_button(MouseButton::Mouse1);
        state.add_motion(1.0, 1.0);

        state.release_all();

        assert!(!state.is_key_down(Key::W));
        assert!(!state.is_button_down(MouseButton::Mouse1));
        assert!(state.take_motion().is_zero());
    }

    #[test]
    fn set_keys_replaces_held_set() {
        let mut state = KeyboardState::new();
        state.press_key(Key::W);

        state.set_keys([Key::S, Key::Unknown]);

        assert!(!state.is_key_down(Key::W));
        assert!(state.is_key_down(Key::S));
        assert_eq!(state.held_key_count(), 1);
    }

    #[test]
    fn debug_output_is_sorted() {
        let mut state = KeyboardState::new();
        state.press_key(Key::W);
        state.press_key(Key::A);

        let text = format!("{:?}", state);
        assert!(text.find("A").unwrap() < text.find("W").unwrap());
    }
}
