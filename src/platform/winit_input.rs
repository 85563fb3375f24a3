//=========================================================================
// Winit Input
//
// Feeds winit window and device events into an `InputSynthesizer`.
//
// Architecture:
//   WindowEvent::KeyboardInput ─► winit_keys ─► KeyboardState + EventForwarder
//   WindowEvent::MouseInput    ─► winit_keys ─► KeyboardState
//   DeviceEvent::MouseMotion   ─────────────► KeyboardState (motion)
//   WindowEvent::Focused(false) ────────────► release everything
//
// Held-state is tracked from events, so a lost key-up (focus change
// mid-press) is covered by the focus handler.
//
//=========================================================================

//=== Standard Library Imports ============================================
use std::sync::Arc;

//=== External Crates =====================================================
use log::{debug, trace, warn};
use winit::event::{ElementState, MouseButton as WinitMouseButton};
use winit::keyboard::PhysicalKey;
use winit::window::{CursorGrabMode, Window};

//=== Internal Imports ====================================================
use super::winit_keys::{to_engine_button, to_engine_key};
use crate::core::input::{CursorGrab, EventForwarder, InputEvent, InputSynthesizer, Key, UserInput};

//=== WindowCursor ========================================================

/// Pointer capture through the winit window.
pub(crate) struct WindowCursor {
    window: Arc<Window>,
}

impl WindowCursor {
    pub(crate) fn new(window: Arc<Window>) -> Self {
        Self { window }
    }
}

impl CursorGrab for WindowCursor {
    fn grab(&mut self) -> bool {
        // Locked is unsupported on some platforms (X11, Windows); Confined
        // still delivers raw device motion.
        let result = self
            .window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined));

        match result {
            Ok(()) => {
                self.window.set_cursor_visible(false);
                true
            }
            Err(e) => {
                warn!(target: "platform::input", "Cursor grab refused: {}", e);
                false
            }
        }
    }

    fn release(&mut self) {
        if let Err(e) = self.window.set_cursor_grab(CursorGrabMode::None) {
            debug!(target: "platform::input", "Cursor release failed: {}", e);
        }
        self.window.set_cursor_visible(true);
    }
}

//=== Event Application ===================================================

pub(crate) type WinitInput = InputSynthesizer<WindowCursor>;

/// Applies a key transition. Repeats are forwarded as further key-downs.
///
/// Synthetic transitions (keys already held when focus changes) update
/// the held set but are never forwarded as events.
pub(crate) fn apply_key<G: CursorGrab>(
    input: &mut InputSynthesizer<G>,
    forwarder: &EventForwarder,
    physical: PhysicalKey,
    state: ElementState,
    synthetic: bool,
) {
    let key = to_engine_key(physical);
    if key == Key::Unknown {
        trace!(target: "platform::input", "Unmapped key {:?}", physical);
        return;
    }

    let event = match state {
        ElementState::Pressed => {
            input.state_mut().press_key(key);
            InputEvent::KeyDown(key)
        }
        ElementState::Released => {
            input.state_mut().release_key(key);
            InputEvent::KeyUp(key)
        }
    };
    if synthetic {
        trace!(target: "platform::input", "Synthetic {:?} not forwarded", event);
        return;
    }
    forwarder.forward(event);
}

pub(crate) fn apply_mouse_button<G: CursorGrab>(
    input: &mut InputSynthesizer<G>,
    button: WinitMouseButton,
    state: ElementState,
) {
    let button = to_engine_button(button);
    match state {
        ElementState::Pressed => input.state_mut().press_button(button),
        ElementState::Released => input.state_mut().release_button(button),
    };
}

/// Accumulates raw pointer motion until the next sample.
pub(crate) fn apply_motion<G: CursorGrab>(input: &mut InputSynthesizer<G>, delta: (f64, f64)) {
    input.state_mut().add_motion(delta.0, delta.1);
}

/// Focus loss releases every held key and hands the pointer back.
pub(crate) fn apply_focus<G: CursorGrab>(input: &mut InputSynthesizer<G>, focused: bool) {
    if focused {
        return;
    }
    debug!(target: "platform::input", "Focus lost, releasing input");
    input.state_mut().release_all();
    input.release_mouse();
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::core::input::{event_channel, DeviceState, MouseButton, NoCursor};
    use winit::keyboard::KeyCode;

    fn synthesizer() -> InputSynthesizer<NoCursor> {
        InputSynthesizer::new(Config::default().into_shared(), NoCursor)
    }

    #[test]
    fn key_press_updates_state_and_forwards() {
        let mut input = synthesizer();
        let (forwarder, queue) = event_channel(8);

        apply_key(&mut input, &forwarder, PhysicalKey::Code(KeyCode::KeyW), ElementState::Pressed, false);

        assert!(input.state().is_key_down(Key::W));
        let mut seen = Vec::new();
        queue.drain_into(|event| seen.push(event));
        assert_eq!(seen, vec![InputEvent::KeyDown(Key::W)]);
    }

    #[test]
    fn key_release_forwards_key_up() {
        let mut input = synthesizer();
        let (forwarder, queue) = event_channel(8);
        let w = PhysicalKey::Code(KeyCode::KeyW);

        apply_key(&mut input, &forwarder, w, ElementState::Pressed, false);
        apply_key(&mut input, &forwarder, w, ElementState::Released, false);

        assert!(!input.state().is_key_down(Key::W));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        let mut input = synthesizer();
        let (forwarder, queue) = event_channel(8);

        apply_key(&mut input, &forwarder, PhysicalKey::Code(KeyCode::F24), ElementState::Pressed, false);

        assert_eq!(input.state().held_key_count(), 0);
        assert!(queue.is_empty());
    }

    #[test]
    fn mouse_buttons_track_held_state() {
        let mut input = synthesizer();

        apply_mouse_button(&mut input, WinitMouseButton::Left, ElementState::Pressed);
        assert!(input.state().is_button_down(MouseButton::Mouse1));

        apply_mouse_button(&mut input, WinitMouseButton::Left, ElementState::Released);
        assert!(!input.state().is_button_down(MouseButton::Mouse1));
    }

    #[test]
    fn focus_loss_releases_keys_and_mouse() {
        let mut input = synthesizer();
        let (forwarder, _queue) = event_channel(8);

        input.grab_mouse();
        apply_key(&mut input, &forwarder, PhysicalKey::Code(KeyCode::KeyW), ElementState::Pressed, false);
        apply_focus(&mut input, false);

        assert_eq!(input.state().held_key_count(), 0);
        assert!(!input.is_mouse_grabbed());
    }

    #[test]
    fn focus_gain_changes_nothing() {
        let mut input = synthesizer();
        let (forwarder, _queue) = event_channel(8);

        apply_key(&mut input, &forwarder, PhysicalKey::Code(KeyCode::KeyW), ElementState::Pressed, false);
        apply_focus(&mut input, true);

        assert!(input.state().is_key_down(Key::W));
    }

    #[test]
    fn motion_turns_while_grabbed() {
        let mut input = synthesizer();
        input.grab_mouse();

        apply_motion(&mut input, (1.4, 0.0));
        let cmd = input.sample();

        // sensitivity 3: round(1.4 * 1.5) = 2, angle -= 8 * 2
        assert_eq!(cmd.angle_turn, -16);
    }

    #[test]
    fn synthetic_keys_are_held_but_not_forwarded() {
        let mut input = synthesizer();
        let (forwarder, queue) = event_channel(8);

        apply_key(&mut input, &forwarder, PhysicalKey::Code(KeyCode::KeyW), ElementState::Pressed, true);

        assert!(input.state().is_key_down(Key::W));
        assert!(queue.is_empty());
    }

    #[test]
    fn small_deltas_are_not_lost() {
        let mut input = synthesizer();
        input.grab_mouse();

        for _ in 0..10 {
            apply_motion(&mut input, (0.4, 0.0));
        }

        // 4 px at sensitivity 3: round(4 * 1.5) = 6, angle -= 8 * 6
        assert_eq!(input.sample().angle_turn, -48);
    }
}
