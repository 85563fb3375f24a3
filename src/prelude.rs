//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use doom_platform::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine facade
pub use crate::engine::{Backend, Engine, EngineBuilder};
pub use crate::platform::PlatformError;

// Configuration
pub use crate::core::config::{Config, SharedConfig};

// Input
pub use crate::core::input::{InputEvent, Key, KeyBinding, MouseButton, TicCmd, TicCmdButtons, UserInput};

// Video
pub use crate::core::video::{
    DisplaySettings, FrameBuffer, FrameFormat, FrameLayout, FramePresenter, FrameSize,
    SharedDisplay, StoredDisplaySettings, VideoError,
};

// Simulation
pub use crate::core::simulation::{Simulation, UpdateResult, TICS_PER_SECOND};
