//=========================================================================
// Platform Subsystem
//
// Native backends behind the core contracts.
//
// Architecture:
// ```text
//  Engine::run()
//     │
//     ├─ Backend::OpenGl ──┐
//     ├─ Backend::Wgpu ────┴─► winit_host  (winit event loop)
//     │                          ├─ gl::GlPresenter     (glow + glutin)
//     │                          ├─ wgpu_backend::WgpuPresenter
//     │                          └─ winit_input         (keys, cursor)
//     ├─ Backend::Sdl ─────────► sdl        (SDL2 event pump + canvas)
//     └─ Backend::Headless ────► headless   (no window, N ticks)
// ```
//
// Every host does the same thing per iteration: translate native input
// into the `KeyboardState` and the event queue, run the ticks that are
// due, render and present. Only the native plumbing differs.
//
// Responsibilities:
// - Select and drive the native backend
// - Own the window, the presenter and the input synthesizer
// - Report fatal startup failures as `PlatformError`
//
//=========================================================================

//=== Submodules ==========================================================

pub(crate) mod headless;
mod winit_host;
mod winit_input;
mod winit_keys;

#[cfg(feature = "gl")]
mod gl;

#[cfg(feature = "wgpu")]
mod wgpu_backend;

#[cfg(feature = "sdl")]
mod sdl;

//=== External Crates =====================================================

use thiserror::Error;

//=== Internal Imports ====================================================

use crate::core::config::SharedConfig;
use crate::core::input::{EventForwarder, EventQueue};
use crate::core::simulation::Simulation;
use crate::core::video::{FrameLayout, SharedDisplay, VideoError};

pub(crate) use winit_host::WindowBackend;

//=== PlatformError =======================================================

/// Platform initialization and runtime errors.
///
/// These are fatal: the engine stops and `Engine::run` returns the error.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Failed to create event loop (rare, indicates OS-level issue).
    #[error("event loop creation failed: {0}")]
    EventLoopCreation(#[source] winit::error::EventLoopError),

    /// Event loop execution error.
    #[error("event loop error: {0}")]
    EventLoopExecution(#[source] winit::error::EventLoopError),

    #[error("window creation failed: {0}")]
    WindowCreation(String),

    #[error("SDL error: {0}")]
    Sdl(String),

    /// The presenter could not be built or failed mid-run.
    #[error(transparent)]
    Video(#[from] VideoError),

    /// The crate was built without the requested backend feature.
    #[error("backend `{0}` is not compiled in")]
    BackendUnavailable(&'static str),
}

//=== HostContext =========================================================

/// Everything a host needs from the engine, bundled for hand-off.
pub(crate) struct HostContext<'a> {
    pub simulation: &'a mut dyn Simulation,
    pub config: SharedConfig,
    pub display: SharedDisplay,
    pub forwarder: EventForwarder,
    pub events: EventQueue,
    pub tics_per_second: f64,
    pub layout: FrameLayout,
}

//=== Entry Points ========================================================

pub(crate) fn run_windowed(
    backend: WindowBackend,
    context: HostContext<'_>,
) -> Result<(), PlatformError> {
    winit_host::run(backend, context)
}

#[cfg(feature = "sdl")]
pub(crate) fn run_sdl(context: HostContext<'_>) -> Result<(), PlatformError> {
    sdl::run(context)
}

#[cfg(not(feature = "sdl"))]
pub(crate) fn run_sdl(_context: HostContext<'_>) -> Result<(), PlatformError> {
    Err(PlatformError::BackendUnavailable("sdl"))
}

pub(crate) fn run_headless(context: HostContext<'_>, ticks: u64) -> Result<(), PlatformError> {
    headless::run(context, ticks)
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::video::{FrameFormat, FrameSize};

    #[test]
    fn platform_error_is_error_trait() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<PlatformError>();
    }

    #[test]
    fn video_errors_convert_transparently() {
        let format = FrameFormat::new(FrameSize::new(320, 200), FrameLayout::RowMajor);
        let err: PlatformError = VideoError::FrameMismatch {
            expected: format,
            actual: format,
        }
        .into();

        assert!(matches!(err, PlatformError::Video(_)));
        assert!(err.to_string().contains("does not match"));
    }

    #[test]
    fn unavailable_backend_names_itself() {
        let err = PlatformError::BackendUnavailable("sdl");
        assert_eq!(err.to_string(), "backend `sdl` is not compiled in");
    }
}
