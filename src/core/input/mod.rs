//=========================================================================
// Input
//
// Platform-neutral half of the input boundary.
//
// Layering (leaves first):
// ```text
//   key          Key / MouseButton enums and their config names
//   binding      KeyBinding: "any of these keys or buttons"
//   state        KeyboardState: what is held right now
//   tic_cmd      TicCmd: one tick of player intent
//   synthesizer  TicCmdBuilder + UserInput: state → TicCmd
//   translate    KeyTranslator: native codes ⇄ Key
//   event        InputEvent forwarding to the simulation
// ```
//
// Backends only ever touch `KeyTranslator`, `KeyboardState` and
// `EventForwarder`; the simulation only sees `UserInput` and
// `InputEvent`.
//
//=========================================================================

//=== Submodules ==========================================================
pub mod binding;
pub mod event;
pub mod key;
pub mod state;
pub mod synthesizer;
pub mod tic_cmd;
pub mod translate;

//=== Re-exports ==========================================================
pub use binding::KeyBinding;
pub use event::{event_channel, EventForwarder, EventQueue, InputEvent};
pub use key::{Key, MouseButton};
pub use state::{DeviceState, KeyboardState, MouseMotion};
pub use synthesizer::{
    CursorGrab, InputSynthesizer, NoCursor, TicCmdBuilder, UserInput, MAX_MOUSE_SENSITIVITY,
    WEAPON_KEYS,
};
pub use tic_cmd::{TicCmd, TicCmdButtons};
pub use translate::KeyTranslator;
