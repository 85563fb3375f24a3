//=========================================================================
// SDL Key Table
//
// Scancode rows for the SDL backend. SDL reports `Option<Scancode>`;
// `None` is the native "unknown".
//
//=========================================================================

use std::sync::LazyLock;

use sdl2::keyboard::Scancode;
use sdl2::mouse::MouseButton as SdlMouseButton;

use crate::core::input::{Key, KeyTranslator, MouseButton};

const KEY_TABLE: &[(Key, Scancode)] = &[
    (Key::A, Scancode::A),
    (Key::B, Scancode::B),
    (Key::C, Scancode::C),
    (Key::D, Scancode::D),
    (Key::E, Scancode::E),
    (Key::F, Scancode::F),
    (Key::G, Scancode::G),
    (Key::H, Scancode::H),
    (Key::I, Scancode::I),
    (Key::J, Scancode::J),
    (Key::K, Scancode::K),
    (Key::L, Scancode::L),
    (Key::M, Scancode::M),
    (Key::N, Scancode::N),
    (Key::O, Scancode::O),
    (Key::P, Scancode::P),
    (Key::Q, Scancode::Q),
    (Key::R, Scancode::R),
    (Key::S, Scancode::S),
    (Key::T, Scancode::T),
    (Key::U, Scancode::U),
    (Key::V, Scancode::V),
    (Key::W, Scancode::W),
    (Key::X, Scancode::X),
    (Key::Y, Scancode::Y),
    (Key::Z, Scancode::Z),
    (Key::Num0, Scancode::Num0),
    (Key::Num1, Scancode::Num1),
    (Key::Num2, Scancode::Num2),
    (Key::Num3, Scancode::Num3),
    (Key::Num4, Scancode::Num4),
    (Key::Num5, Scancode::Num5),
    (Key::Num6, Scancode::Num6),
    (Key::Num7, Scancode::Num7),
    (Key::Num8, Scancode::Num8),
    (Key::Num9, Scancode::Num9),
    (Key::Escape, Scancode::Escape),
    (Key::LControl, Scancode::LCtrl),
    (Key::LShift, Scancode::LShift),
    (Key::LAlt, Scancode::LAlt),
    (Key::LSystem, Scancode::LGui),
    (Key::RControl, Scancode::RCtrl),
    (Key::RShift, Scancode::RShift),
    (Key::RAlt, Scancode::RAlt),
    (Key::RSystem, Scancode::RGui),
    (Key::Menu, Scancode::Application),
    (Key::LBracket, Scancode::LeftBracket),
    (Key::RBracket, Scancode::RightBracket),
    (Key::Semicolon, Scancode::Semicolon),
    (Key::Comma, Scancode::Comma),
    (Key::Period, Scancode::Period),
    (Key::Quote, Scancode::Apostrophe),
    (Key::Slash, Scancode::Slash),
    (Key::Backslash, Scancode::Backslash),
    (Key::Tilde, Scancode::Grave),
    (Key::Equal, Scancode::Equals),
    (Key::Hyphen, Scancode::Minus),
    (Key::Space, Scancode::Space),
    (Key::Enter, Scancode::Return),
    (Key::Backspace, Scancode::Backspace),
    (Key::Tab, Scancode::Tab),
    (Key::PageUp, Scancode::PageUp),
    (Key::PageDown, Scancode::PageDown),
    (Key::End, Scancode::End),
    (Key::Home, Scancode::Home),
    (Key::Insert, Scancode::Insert),
    (Key::Delete, Scancode::Delete),
    (Key::Add, Scancode::KpPlus),
    (Key::Subtract, Scancode::KpMinus),
    (Key::Multiply, Scancode::KpMultiply),
    (Key::Divide, Scancode::KpDivide),
    (Key::Left, Scancode::Left),
    (Key::Right, Scancode::Right),
    (Key::Up, Scancode::Up),
    (Key::Down, Scancode::Down),
    (Key::Numpad0, Scancode::Kp0),
    (Key::Numpad1, Scancode::Kp1),
    (Key::Numpad2, Scancode::Kp2),
    (Key::Numpad3, Scancode::Kp3),
    (Key::Numpad4, Scancode::Kp4),
    (Key::Numpad5, Scancode::Kp5),
    (Key::Numpad6, Scancode::Kp6),
    (Key::Numpad7, Scancode::Kp7),
    (Key::Numpad8, Scancode::Kp8),
    (Key::Numpad9, Scancode::Kp9),
    (Key::F1, Scancode::F1),
    (Key::F2, Scancode::F2),
    (Key::F3, Scancode::F3),
    (Key::F4, Scancode::F4),
    (Key::F5, Scancode::F5),
    (Key::F6, Scancode::F6),
    (Key::F7, Scancode::F7),
    (Key::F8, Scancode::F8),
    (Key::F9, Scancode::F9),
    (Key::F10, Scancode::F10),
    (Key::F11, Scancode::F11),
    (Key::F12, Scancode::F12),
    (Key::F13, Scancode::F13),
    (Key::F14, Scancode::F14),
    (Key::F15, Scancode::F15),
    (Key::Pause, Scancode::Pause),
];

static TRANSLATOR: LazyLock<KeyTranslator<Option<Scancode>>> = LazyLock::new(|| {
    let rows: Vec<(Key, Option<Scancode>)> = KEY_TABLE
        .iter()
        .map(|&(key, scancode)| (key, Some(scancode)))
        .collect();
    KeyTranslator::new(&rows, None)
});

pub(super) fn to_engine_key(scancode: Option<Scancode>) -> Key {
    TRANSLATOR.to_engine(scancode)
}

pub(super) fn to_engine_button(button: SdlMouseButton) -> MouseButton {
    match button {
        SdlMouseButton::Left => MouseButton::Mouse1,
        SdlMouseButton::Right => MouseButton::Mouse2,
        SdlMouseButton::Middle => MouseButton::Mouse3,
        SdlMouseButton::X1 => MouseButton::Mouse4,
        SdlMouseButton::X2 => MouseButton::Mouse5,
        SdlMouseButton::Unknown => MouseButton::Unknown,
    }
}
