//=========================================================================
// Key Binding
//=========================================================================
//
// A binding is "any of these keys, or any of these mouse buttons".
//
// Text form:
//   lcontrol, rcontrol, mouse1      (keys first, then buttons)
//   none                            (empty binding)
//
// Parsing is lenient: `,` and `+` both separate names, whitespace is
// trimmed and names that do not resolve are dropped. An empty binding
// is legal and never matches.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

//=== Internal Dependencies ===============================================

use super::key::{Key, MouseButton};
use super::state::DeviceState;

//=== KeyBinding ==========================================================

/// Immutable set of keys and mouse buttons bound to one logical action.
///
/// Equality is set equality; the sets are ordered so the serialised form
/// is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyBinding {
    keys: BTreeSet<Key>,
    mouse_buttons: BTreeSet<MouseButton>,
}

impl KeyBinding {
    /// Binding that never matches.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a binding from keys only.
    pub fn from_keys(keys: &[Key]) -> Self {
        Self::new(keys, &[])
    }

    /// Builds a binding from keys and mouse buttons. `Unknown` entries
    /// are discarded.
    pub fn new(keys: &[Key], mouse_buttons: &[MouseButton]) -> Self {
        Self {
            keys: keys.iter().copied().filter(|k| *k != Key::Unknown).collect(),
            mouse_buttons: mouse_buttons
                .iter()
                .copied()
                .filter(|b| *b != MouseButton::Unknown)
                .collect(),
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.keys.iter().copied()
    }

    pub fn mouse_buttons(&self) -> impl Iterator<Item = MouseButton> + '_ {
        self.mouse_buttons.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty() && self.mouse_buttons.is_empty()
    }

    /// Returns `true` if any bound key or button is currently down.
    pub fn is_pressed<D: DeviceState + ?Sized>(&self, device: &D) -> bool {
        self.keys.iter().any(|&key| device.is_key_down(key))
            || self
                .mouse_buttons
                .iter()
                .any(|&button| device.is_button_down(button))
    }

    //--- Text Form --------------------------------------------------------

    /// Lenient parse. Never fails; unknown names are dropped.
    pub fn parse(text: &str) -> Self {
        let mut binding = Self::empty();

        for name in text.split([',', '+']).map(str::trim) {
            if name.is_empty() || name.eq_ignore_ascii_case("none") {
                continue;
            }

            let key = Key::from_name(name);
            if key != Key::Unknown {
                binding.keys.insert(key);
                continue;
            }

            let button = MouseButton::from_name(name);
            if button != MouseButton::Unknown {
                binding.mouse_buttons.insert(button);
            }
        }

        binding
    }
}

//--- Trait Implementations -----------------------------------------------

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }

        let names: Vec<&str> = self
            .keys
            .iter()
            .map(|k| k.name())
            .chain(self.mouse_buttons.iter().map(|b| b.name()))
            .collect();

        f.write_str(&names.join(", "))
    }
}

impl FromStr for KeyBinding {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::state::KeyboardState;
    use proptest::prelude::*;

    //--- Test Helpers -----------------------------------------------------

    fn state_with(keys: &[Key], buttons: &[MouseButton]) -> KeyboardState {
        let mut state = KeyboardState::new();
        for &key in keys {
            state.press_key(key);
        }
        for &button in buttons {
            state.press_button(button);
        }
        state
    }

    //=====================================================================
    // Matching
    //=====================================================================

    #[test]
    fn matches_any_bound_key() {
        let binding = KeyBinding::from_keys(&[Key::Up, Key::W]);

        assert!(binding.is_pressed(&state_with(&[Key::W], &[])));
        assert!(binding.is_pressed(&state_with(&[Key::Up], &[])));
        assert!(!binding.is_pressed(&state_with(&[Key::S], &[])));
    }

    #[test]
    fn matches_bound_mouse_button() {
        let binding = KeyBinding::new(&[Key::LControl], &[MouseButton::Mouse1]);

        assert!(binding.is_pressed(&state_with(&[], &[MouseButton::Mouse1])));
        assert!(!binding.is_pressed(&state_with(&[], &[MouseButton::Mouse2])));
    }

    #[test]
    fn empty_binding_never_matches() {
        let binding = KeyBinding::empty();
        let everything = state_with(Key::ALL, MouseButton::ALL);

        assert!(!binding.is_pressed(&everything));
    }

    #[test]
    fn unknown_entries_are_discarded() {
        let binding = KeyBinding::new(&[Key::Unknown], &[MouseButton::Unknown]);
        assert!(binding.is_empty());
    }

    //=====================================================================
    // Text Form
    //=====================================================================

    #[test]
    fn display_lists_keys_then_buttons() {
        let binding = KeyBinding::new(
            &[Key::RControl, Key::LControl],
            &[MouseButton::Mouse1],
        );
        assert_eq!(binding.to_string(), "lcontrol, rcontrol, mouse1");
    }

    #[test]
    fn empty_binding_displays_none() {
        assert_eq!(KeyBinding::empty().to_string(), "none");
        assert!(KeyBinding::parse("none").is_empty());
    }

    #[test]
    fn parse_accepts_plus_and_comma() {
        let binding = KeyBinding::parse("lshift+rshift, mouse3");

        assert_eq!(
            binding,
            KeyBinding::new(&[Key::LShift, Key::RShift], &[MouseButton::Mouse3])
        );
    }

    #[test]
    fn parse_drops_unknown_names() {
        let binding = KeyBinding::parse("w, banana, , mouse7, up");
        assert_eq!(binding, KeyBinding::from_keys(&[Key::W, Key::Up]));
    }

    #[test]
    fn parse_of_garbage_is_empty() {
        assert!(KeyBinding::parse("!!!").is_empty());
        assert!(KeyBinding::parse("").is_empty());
    }

    #[test]
    fn from_str_is_infallible() {
        let binding: KeyBinding = "space, mouse2".parse().unwrap();
        assert_eq!(
            binding,
            KeyBinding::new(&[Key::Space], &[MouseButton::Mouse2])
        );
    }

    //=====================================================================
    // Round Trip Property
    //=====================================================================

    fn any_binding() -> impl Strategy<Value = KeyBinding> {
        (
            proptest::sample::subsequence(Key::ALL.to_vec(), 0..8),
            proptest::sample::subsequence(MouseButton::ALL.to_vec(), 0..3),
        )
            .prop_map(|(keys, buttons)| KeyBinding::new(&keys, &buttons))
    }

    proptest! {
        #[test]
        fn parse_of_display_is_the_same_set(binding in any_binding()) {
            let text = binding.to_string();
            prop_assert_eq!(KeyBinding::parse(&text), binding);
        }
    }
}
