//=========================================================================
// Engine Keys
//
// Platform-neutral identifiers for physical keys and mouse buttons.
//
// Every backend translates its native codes into these enums before
// anything else in the engine sees them. Bindings in the config file
// refer to keys by the lowercase names defined here.
//
// Responsibilities:
// - Enumerate every key the engine can bind or forward
// - Provide stable config names (`"lcontrol"`, `"num1"`, `"mouse2"`)
// - Parse names back, case-insensitively, with an `Unknown` fallback
//
//=========================================================================

//=== Key Table Macro =====================================================
//
// Declares `Key` together with its name table so the two can never drift
// apart. `Unknown` is appended by the macro and is never part of `ALL`.
//
macro_rules! engine_keys {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// Physical keyboard key, independent of any backend.
        ///
        /// Ordering follows declaration order and is only used to give
        /// bindings a stable textual form.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum Key {
            $($variant,)*

            /// Sentinel for native codes with no engine counterpart.
            Unknown,
        }

        impl Key {
            /// Every bindable key, in declaration order.
            pub const ALL: &'static [Key] = &[$(Key::$variant),*];

            /// Config name of this key.
            pub fn name(self) -> &'static str {
                match self {
                    $(Key::$variant => $name,)*
                    Key::Unknown => "unknown",
                }
            }

            /// Parses a config name. Case-insensitive; unrecognised names
            /// yield `Key::Unknown`.
            pub fn from_name(name: &str) -> Key {
                match name.trim().to_ascii_lowercase().as_str() {
                    $($name => Key::$variant,)*
                    _ => Key::Unknown,
                }
            }
        }
    };
}

engine_keys! {
    //--- Letters ----------------------------------------------------------
    A => "a", B => "b", C => "c", D => "d", E => "e", F => "f", G => "g",
    H => "h", I => "i", J => "j", K => "k", L => "l", M => "m", N => "n",
    O => "o", P => "p", Q => "q", R => "r", S => "s", T => "t", U => "u",
    V => "v", W => "w", X => "x", Y => "y", Z => "z",

    //--- Number row -------------------------------------------------------
    Num0 => "num0", Num1 => "num1", Num2 => "num2", Num3 => "num3",
    Num4 => "num4", Num5 => "num5", Num6 => "num6", Num7 => "num7",
    Num8 => "num8", Num9 => "num9",

    //--- Modifiers --------------------------------------------------------
    Escape => "escape",
    LControl => "lcontrol", LShift => "lshift", LAlt => "lalt", LSystem => "lsystem",
    RControl => "rcontrol", RShift => "rshift", RAlt => "ralt", RSystem => "rsystem",
    Menu => "menu",

    //--- Punctuation ------------------------------------------------------
    LBracket => "lbracket", RBracket => "rbracket",
    Semicolon => "semicolon", Comma => "comma", Period => "period",
    Quote => "quote", Slash => "slash", Backslash => "backslash",
    Tilde => "tilde", Equal => "equal", Hyphen => "hyphen",

    //--- Editing / navigation ---------------------------------------------
    Space => "space", Enter => "enter", Backspace => "backspace", Tab => "tab",
    PageUp => "pageup", PageDown => "pagedown", End => "end", Home => "home",
    Insert => "insert", Delete => "delete",

    //--- Numpad operators -------------------------------------------------
    Add => "add", Subtract => "subtract", Multiply => "multiply", Divide => "divide",

    //--- Arrows -----------------------------------------------------------
    Left => "left", Right => "right", Up => "up", Down => "down",

    //--- Numpad digits ----------------------------------------------------
    Numpad0 => "numpad0", Numpad1 => "numpad1", Numpad2 => "numpad2",
    Numpad3 => "numpad3", Numpad4 => "numpad4", Numpad5 => "numpad5",
    Numpad6 => "numpad6", Numpad7 => "numpad7", Numpad8 => "numpad8",
    Numpad9 => "numpad9",

    //--- Function keys ----------------------------------------------------
    F1 => "f1", F2 => "f2", F3 => "f3", F4 => "f4", F5 => "f5",
    F6 => "f6", F7 => "f7", F8 => "f8", F9 => "f9", F10 => "f10",
    F11 => "f11", F12 => "f12", F13 => "f13", F14 => "f14", F15 => "f15",

    Pause => "pause",
}

//=== MouseButton =========================================================

/// Physical mouse button identifier.
///
/// Buttons are numbered the way the config file names them: `Mouse1` is
/// the primary (left) button, `Mouse2` the secondary (right), `Mouse3`
/// the wheel click and `Mouse4`/`Mouse5` the side buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MouseButton {
    Mouse1,
    Mouse2,
    Mouse3,
    Mouse4,
    Mouse5,

    /// Any button the engine does not track.
    Unknown,
}

impl MouseButton {
    /// Every bindable button, in declaration order.
    pub const ALL: &'static [MouseButton] = &[
        MouseButton::Mouse1,
        MouseButton::Mouse2,
        MouseButton::Mouse3,
        MouseButton::Mouse4,
        MouseButton::Mouse5,
    ];

    /// Config name of this button.
    pub fn name(self) -> &'static str {
        match self {
            MouseButton::Mouse1 => "mouse1",
            MouseButton::Mouse2 => "mouse2",
            MouseButton::Mouse3 => "mouse3",
            MouseButton::Mouse4 => "mouse4",
            MouseButton::Mouse5 => "mouse5",
            MouseButton::Unknown => "unknown",
        }
    }

    /// Parses a config name; unrecognised names yield `Unknown`.
    pub fn from_name(name: &str) -> MouseButton {
        match name.trim().to_ascii_lowercase().as_str() {
            "mouse1" => MouseButton::Mouse1,
            "mouse2" => MouseButton::Mouse2,
            "mouse3" => MouseButton::Mouse3,
            "mouse4" => MouseButton::Mouse4,
            "mouse5" => MouseButton::Mouse5,
            _ => MouseButton::Unknown,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
