//=========================================================================
// Winit Key Table
//
// Maps winit physical key codes to engine keys. Physical codes are
// layout-independent, so `W` means "the key where W sits on QWERTY".
//
//=========================================================================

//=== Standard Library Imports ============================================
use std::sync::LazyLock;

//=== External Crates =====================================================
use winit::event::MouseButton as WinitMouseButton;
use winit::keyboard::{KeyCode, NativeKeyCode, PhysicalKey};

//=== Internal Imports ====================================================
use crate::core::input::{Key, KeyTranslator, MouseButton};

//=== Table ===============================================================

const KEY_TABLE: &[(Key, KeyCode)] = &[
    (Key::A, KeyCode::KeyA),
    (Key::B, KeyCode::KeyB),
    (Key::C, KeyCode::KeyC),
    (Key::D, KeyCode::KeyD),
    (Key::E, KeyCode::KeyE),
    (Key::F, KeyCode::KeyF),
    (Key::G, KeyCode::KeyG),
    (Key::H, KeyCode::KeyH),
    (Key::I, KeyCode::KeyI),
    (Key::J, KeyCode::KeyJ),
    (Key::K, KeyCode::KeyK),
    (Key::L, KeyCode::KeyL),
    (Key::M, KeyCode::KeyM),
    (Key::N, KeyCode::KeyN),
    (Key::O, KeyCode::KeyO),
    (Key::P, KeyCode::KeyP),
    (Key::Q, KeyCode::KeyQ),
    (Key::R, KeyCode::KeyR),
    (Key::S, KeyCode::KeyS),
    (Key::T, KeyCode::KeyT),
    (Key::U, KeyCode::KeyU),
    (Key::V, KeyCode::KeyV),
    (Key::W, KeyCode::KeyW),
    (Key::X, KeyCode::KeyX),
    (Key::Y, KeyCode::KeyY),
    (Key::Z, KeyCode::KeyZ),
    (Key::Num0, KeyCode::Digit0),
    (Key::Num1, KeyCode::Digit1),
    (Key::Num2, KeyCode::Digit2),
    (Key::Num3, KeyCode::Digit3),
    (Key::Num4, KeyCode::Digit4),
    (Key::Num5, KeyCode::Digit5),
    (Key::Num6, KeyCode::Digit6),
    (Key::Num7, KeyCode::Digit7),
    (Key::Num8, KeyCode::Digit8),
    (Key::Num9, KeyCode::Digit9),
    (Key::Escape, KeyCode::Escape),
    (Key::LControl, KeyCode::ControlLeft),
    (Key::LShift, KeyCode::ShiftLeft),
    (Key::LAlt, KeyCode::AltLeft),
    (Key::LSystem, KeyCode::SuperLeft),
    (Key::RControl, KeyCode::ControlRight),
    (Key::RShift, KeyCode::ShiftRight),
    (Key::RAlt, KeyCode::AltRight),
    (Key::RSystem, KeyCode::SuperRight),
    (Key::Menu, KeyCode::ContextMenu),
    (Key::LBracket, KeyCode::BracketLeft),
    (Key::RBracket, KeyCode::BracketRight),
    (Key::Semicolon, KeyCode::Semicolon),
    (Key::Comma, KeyCode::Comma),
    (Key::Period, KeyCode::Period),
    (Key::Quote, KeyCode::Quote),
    (Key::Slash, KeyCode::Slash),
    (Key::Backslash, KeyCode::Backslash),
    (Key::Tilde, KeyCode::Backquote),
    (Key::Equal, KeyCode::Equal),
    (Key::Hyphen, KeyCode::Minus),
    (Key::Space, KeyCode::Space),
    (Key::Enter, KeyCode::Enter),
    (Key::Backspace, KeyCode::Backspace),
    (Key::Tab, KeyCode::Tab),
    (Key::PageUp, KeyCode::PageUp),
    (Key::PageDown, KeyCode::PageDown),
    (Key::End, KeyCode::End),
    (Key::Home, KeyCode::Home),
    (Key::Insert, KeyCode::Insert),
    (Key::Delete, KeyCode::Delete),
    (Key::Add, KeyCode::NumpadAdd),
    (Key::Subtract, KeyCode::NumpadSubtract),
    (Key::Multiply, KeyCode::NumpadMultiply),
    (Key::Divide, KeyCode::NumpadDivide),
    (Key::Left, KeyCode::ArrowLeft),
    (Key::Right, KeyCode::ArrowRight),
    (Key::Up, KeyCode::ArrowUp),
    (Key::Down, KeyCode::ArrowDown),
    (Key::Numpad0, KeyCode::Numpad0),
    (Key::Numpad1, KeyCode::Numpad1),
    (Key::Numpad2, KeyCode::Numpad2),
    (Key::Numpad3, KeyCode::Numpad3),
    (Key::Numpad4, KeyCode::Numpad4),
    (Key::Numpad5, KeyCode::Numpad5),
    (Key::Numpad6, KeyCode::Numpad6),
    (Key::Numpad7, KeyCode::Numpad7),
    (Key::Numpad8, KeyCode::Numpad8),
    (Key::Numpad9, KeyCode::Numpad9),
    (Key::F1, KeyCode::F1),
    (Key::F2, KeyCode::F2),
    (Key::F3, KeyCode::F3),
    (Key::F4, KeyCode::F4),
    (Key::F5, KeyCode::F5),
    (Key::F6, KeyCode::F6),
    (Key::F7, KeyCode::F7),
    (Key::F8, KeyCode::F8),
    (Key::F9, KeyCode::F9),
    (Key::F10, KeyCode::F10),
    (Key::F11, KeyCode::F11),
    (Key::F12, KeyCode::F12),
    (Key::F13, KeyCode::F13),
    (Key::F14, KeyCode::F14),
    (Key::F15, KeyCode::F15),
    (Key::Pause, KeyCode::Pause),
];

pub(crate) const UNKNOWN: PhysicalKey = PhysicalKey::Unidentified(NativeKeyCode::Unidentified);

pub(crate) static TRANSLATOR: LazyLock<KeyTranslator<PhysicalKey>> = LazyLock::new(|| {
    let rows: Vec<(Key, PhysicalKey)> = KEY_TABLE
        .iter()
        .map(|&(key, code)| (key, PhysicalKey::Code(code)))
        .collect();
    KeyTranslator::new(&rows, UNKNOWN)
});

//=== Lookups =============================================================

pub(crate) fn to_engine_key(key: PhysicalKey) -> Key {
    TRANSLATOR.to_engine(key)
}

#[cfg(test)]
pub(crate) fn to_winit_key(key: Key) -> PhysicalKey {
    TRANSLATOR.to_native(key)
}

pub(crate) fn to_engine_button(button: WinitMouseButton) -> MouseButton {
    match button {
        WinitMouseButton::Left => MouseButton::Mouse1,
        WinitMouseButton::Right => MouseButton::Mouse2,
        WinitMouseButton::Middle => MouseButton::Mouse3,
        WinitMouseButton::Back => MouseButton::Mouse4,
        WinitMouseButton::Forward => MouseButton::Mouse5,
        WinitMouseButton::Other(_) => MouseButton::Unknown,
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
