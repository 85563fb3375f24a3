//=========================================================================
// Engine
//
// Main entry point: loads the config, wires the event channel, hands
// everything to the selected host and saves the config when it returns.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run(sim, display)──>  host
//         │                          │
//         ├─ with_backend()          ├─ Config::load()
//         ├─ with_config_path()      ├─ event_channel()
//         ├─ with_tps()              ├─ platform::run_*()   (blocks)
//         ├─ with_channel_capacity() └─ Config::save()
//         └─ with_frame_layout()
// ```
//
//=========================================================================

//=== Standard Library Imports ============================================
use std::fmt;
use std::path::{Path, PathBuf};

//=== External Dependencies ===============================================
use log::{error, info};

//=== Internal Dependencies ===============================================
use crate::core::config::Config;
use crate::core::input::event_channel;
use crate::core::simulation::{Simulation, TICS_PER_SECOND};
use crate::core::video::{FrameLayout, SharedDisplay};
use crate::platform::{self, HostContext, PlatformError, WindowBackend};

//=== Constants ===========================================================

pub const DEFAULT_CONFIG_PATH: &str = "doom_platform.cfg";
pub const DEFAULT_CHANNEL_CAPACITY: usize = 128;

//=== Backend =============================================================

/// Which native host drives the simulation.
///
/// Every variant exists regardless of cargo features; choosing one that
/// was not compiled in makes [`Engine::run`] return
/// [`PlatformError::BackendUnavailable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// OpenGL 3.3 on a winit window (`gl` feature).
    OpenGl,
    /// wgpu on a winit window (`wgpu` feature).
    Wgpu,
    /// SDL2 window and renderer (`sdl` feature).
    Sdl,
    /// No window; runs `ticks` ticks as fast as possible.
    Headless { ticks: u64 },
}

impl Default for Backend {
    fn default() -> Self {
        if cfg!(feature = "gl") {
            Self::OpenGl
        } else if cfg!(feature = "wgpu") {
            Self::Wgpu
        } else {
            Self::Sdl
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenGl => write!(f, "gl"),
            Self::Wgpu => write!(f, "wgpu"),
            Self::Sdl => write!(f, "sdl"),
            Self::Headless { ticks } => write!(f, "headless ({} ticks)", ticks),
        }
    }
}

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **Backend**: `gl` if compiled in, else `wgpu`, else `sdl`
/// - **Config path**: `doom_platform.cfg`
/// - **TPS**: 35.0
/// - **Channel capacity**: 128 events
/// - **Frame layout**: row-major
///
/// # Examples
///
/// ```no_run
/// use doom_platform::prelude::*;
///
/// # fn demo(game: &mut dyn Simulation, display: SharedDisplay) -> Result<(), PlatformError> {
/// EngineBuilder::new()
///     .with_backend(Backend::Wgpu)
///     .with_frame_layout(FrameLayout::Transposed)
///     .build()
///     .run(game, display)
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct EngineBuilder {
    backend: Backend,
    config_path: PathBuf,
    tps: f64,
    channel_capacity: usize,
    layout: FrameLayout,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            backend: Backend::default(),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            tps: TICS_PER_SECOND,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            layout: FrameLayout::RowMajor,
        }
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Sets where the config is loaded from and saved to.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = path.into();
        self
    }

    /// Sets the simulation tick rate.
    ///
    /// Default: 35.0
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Sets the capacity of the platform → simulation key-event queue.
    ///
    /// Default: 128
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Sets how the simulation lays out its frame buffer.
    pub fn with_frame_layout(mut self, layout: FrameLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn build(self) -> Engine {
        info!(
            target: "engine",
            "Building engine (backend: {}, TPS: {}, channel: {})",
            self.backend,
            self.tps,
            self.channel_capacity
        );

        Engine {
            backend: self.backend,
            config_path: self.config_path,
            tps: self.tps,
            channel_capacity: self.channel_capacity,
            layout: self.layout,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Runtime facade. Create via [`EngineBuilder`].
#[derive(Debug)]
pub struct Engine {
    backend: Backend,
    config_path: PathBuf,
    tps: f64,
    channel_capacity: usize,
    layout: FrameLayout,
}

impl Engine {
    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Runs `simulation` on the selected host and blocks until it exits.
    ///
    /// The config is saved on the way out, including after a failed
    /// startup, so clamped values are persisted either way.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the host or the presenter could not be
    /// created, or if presenting a frame failed.
    pub fn run(
        self,
        simulation: &mut dyn Simulation,
        display: SharedDisplay,
    ) -> Result<(), PlatformError> {
        info!(target: "engine", "Starting engine runtime (TPS: {})", self.tps);

        //--- 1. Settings ---------------------------------------------------
        let config = Config::load(&self.config_path).into_shared();

        //--- 2. Event channel ----------------------------------------------
        let (forwarder, events) = event_channel(self.channel_capacity);

        //--- 3. Host --------------------------------------------------------
        let context = HostContext {
            simulation,
            config: config.clone(),
            display,
            forwarder,
            events,
            tics_per_second: self.tps,
            layout: self.layout,
        };

        let result = match self.backend {
            Backend::OpenGl => platform::run_windowed(WindowBackend::OpenGl, context),
            Backend::Wgpu => platform::run_windowed(WindowBackend::Wgpu, context),
            Backend::Sdl => platform::run_sdl(context),
            Backend::Headless { ticks } => platform::run_headless(context, ticks),
        };

        if let Err(e) = &result {
            error!(target: "engine", "Platform error: {}", e);
        }

        //--- 4. Persist ----------------------------------------------------
        config.borrow().save(&self.config_path);

        info!(target: "engine", "Engine shutdown complete");
        result
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{InputEvent, UserInput};
    use crate::core::simulation::UpdateResult;
    use crate::core::video::{FrameBuffer, FramePresenter, FrameSize, StoredDisplaySettings};

    struct Idle {
        updates: u32,
        sensitivity_seen: i32,
    }

    impl Simulation for Idle {
        fn post_event(&mut self, _event: InputEvent) -> bool {
            false
        }

        fn update(&mut self, input: &mut dyn UserInput) -> UpdateResult {
            self.updates += 1;
            self.sensitivity_seen = input.mouse_sensitivity();
            input.set_mouse_sensitivity(8);
            UpdateResult::None
        }

        fn render(&mut self, _frame: &mut FrameBuffer, _presenter: &mut dyn FramePresenter) {}
    }

    fn display() -> SharedDisplay {
        StoredDisplaySettings::new(FrameSize::new(640, 400)).into_shared()
    }

    //=====================================================================
    // EngineBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = EngineBuilder::new();
        assert_eq!(builder.tps, 35.0);
        assert_eq!(builder.channel_capacity, 128);
        assert_eq!(builder.layout, FrameLayout::RowMajor);
        assert_eq!(builder.config_path, PathBuf::from(DEFAULT_CONFIG_PATH));
    }

    #[test]
    fn builder_with_tps() {
        let builder = EngineBuilder::new().with_tps(70.0);
        assert_eq!(builder.tps, 70.0);
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn builder_with_tps_panics_on_zero() {
        EngineBuilder::new().with_tps(0.0);
    }

    #[test]
    #[should_panic(expected = "Channel capacity must be positive")]
    fn builder_with_channel_capacity_panics_on_zero() {
        EngineBuilder::new().with_channel_capacity(0);
    }

    #[test]
    fn build_carries_settings() {
        let engine = EngineBuilder::new()
            .with_backend(Backend::Headless { ticks: 5 })
            .with_config_path("elsewhere.cfg")
            .build();

        assert_eq!(engine.backend(), Backend::Headless { ticks: 5 });
        assert_eq!(engine.config_path(), Path::new("elsewhere.cfg"));
    }

    #[test]
    fn backend_display_names() {
        assert_eq!(Backend::OpenGl.to_string(), "gl");
        assert_eq!(Backend::Headless { ticks: 3 }.to_string(), "headless (3 ticks)");
    }

    //=====================================================================
    // Engine Run Tests
    //=====================================================================

    #[test]
    fn headless_run_saves_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.cfg");
        let mut sim = Idle {
            updates: 0,
            sensitivity_seen: 0,
        };

        EngineBuilder::new()
            .with_backend(Backend::Headless { ticks: 4 })
            .with_config_path(&path)
            .build()
            .run(&mut sim, display())
            .unwrap();

        assert_eq!(sim.updates, 4);
        assert_eq!(sim.sensitivity_seen, 8);

        let saved = std::fs::read_to_string(&path).unwrap();
        assert!(saved.contains("mouse_sensitivity = 8"));
    }

    #[test]
    fn headless_run_restores_saved_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.cfg");
        std::fs::write(&path, "mouse_sensitivity = 6\n").unwrap();
        let mut sim = Idle {
            updates: 0,
            sensitivity_seen: 0,
        };

        EngineBuilder::new()
            .with_backend(Backend::Headless { ticks: 1 })
            .with_config_path(&path)
            .build()
            .run(&mut sim, display())
            .unwrap();

        assert_eq!(sim.sensitivity_seen, 6);
    }

    #[cfg(not(feature = "sdl"))]
    #[test]
    fn missing_backend_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut sim = Idle {
            updates: 0,
            sensitivity_seen: 0,
        };

        let result = EngineBuilder::new()
            .with_backend(Backend::Sdl)
            .with_config_path(dir.path().join("engine.cfg"))
            .build()
            .run(&mut sim, display());

        assert!(matches!(result, Err(PlatformError::BackendUnavailable("sdl"))));
        assert_eq!(sim.updates, 0);
    }
}
