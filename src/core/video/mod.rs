//=========================================================================
// Video
//
// Platform-neutral half of the presentation boundary.
//
// ```text
//   Simulation ──render──► FrameBuffer ──present──► FramePresenter
//                                                     ├─ GlPresenter
//                                                     ├─ WgpuPresenter
//                                                     ├─ SdlPresenter
//                                                     └─ HeadlessPresenter
// ```
//
// Presenters own their GPU objects exclusively. Wipe, window-size,
// message and gamma state belong to the external renderer and are only
// forwarded through `DisplaySettings`.
//
// Responsibilities:
// - The `FramePresenter` contract and its forwarding defaults
// - Presenter construction rules (config clamping, init logging)
// - `VideoError`, shared by every backend
//
//=========================================================================

//=== Submodules ==========================================================
pub mod frame;
pub mod geometry;
pub mod headless;

//=== Standard Library Imports ============================================
use std::cell::RefCell;
use std::rc::Rc;

//=== External Crates =====================================================
use log::{error, info};
use thiserror::Error;

//=== Internal Modules ====================================================
use crate::core::config::SharedConfig;
pub use frame::{FrameBuffer, FrameFormat, FrameLayout, FrameSize};
pub use headless::HeadlessPresenter;

//=== VideoError ==========================================================

#[derive(Debug, Error)]
pub enum VideoError {
    #[error("graphics context creation failed: {0}")]
    Context(String),

    #[error("surface creation failed: {0}")]
    Surface(String),

    #[error("no suitable graphics adapter")]
    Adapter,

    #[error("device request failed: {0}")]
    Device(String),

    #[error("texture allocation failed: {0}")]
    Texture(String),

    #[error("buffer allocation failed: {0}")]
    Buffer(String),

    #[error("{stage} shader failed to compile: {log}")]
    ShaderCompile { stage: &'static str, log: String },

    #[error("shader program failed to link: {0}")]
    ProgramLink(String),

    #[error("frame {actual} does not match presenter format {expected}")]
    FrameMismatch {
        expected: FrameFormat,
        actual: FrameFormat,
    },

    #[error("presentation failed: {0}")]
    Present(String),
}

//=== DisplaySettings =====================================================

/// Renderer-owned display state the presenter forwards.
pub trait DisplaySettings {
    fn initialize_wipe(&mut self);
    fn wipe_band_count(&self) -> i32;
    fn wipe_height(&self) -> i32;

    fn max_window_size(&self) -> i32;
    fn window_size(&self) -> i32;
    fn set_window_size(&mut self, value: i32);

    fn display_message(&self) -> bool;
    fn set_display_message(&mut self, value: bool);

    fn max_gamma_correction_level(&self) -> i32;
    fn gamma_correction_level(&self) -> i32;
    fn set_gamma_correction_level(&mut self, value: i32);
}

pub type SharedDisplay = Rc<RefCell<dyn DisplaySettings>>;

//=== StoredDisplaySettings ===============================================
//
// Plain stored values, for hosts that run without a full renderer (the
// demo binary, tests, headless runs).
//

pub const MAX_WINDOW_SIZE: i32 = 11;
pub const MAX_GAMMA_CORRECTION_LEVEL: i32 = 10;

#[derive(Debug, Clone)]
pub struct StoredDisplaySettings {
    window_size: i32,
    display_message: bool,
    gamma_correction_level: i32,
    wipe_band_count: i32,
    wipe_height: i32,
    wipes_started: u32,
}

impl StoredDisplaySettings {
    pub fn new(size: FrameSize) -> Self {
        let scale = (size.width / frame::SCREEN_WIDTH).max(1) as i32;
        Self {
            window_size: 7,
            display_message: true,
            gamma_correction_level: 2,
            wipe_band_count: size.width as i32 / (2 * scale),
            wipe_height: size.height as i32 / scale,
            wipes_started: 0,
        }
    }

    pub fn into_shared(self) -> SharedDisplay {
        Rc::new(RefCell::new(self))
    }

    pub fn wipes_started(&self) -> u32 {
        self.wipes_started
    }
}

impl DisplaySettings for StoredDisplaySettings {
    fn initialize_wipe(&mut self) {
        self.wipes_started += 1;
    }

    fn wipe_band_count(&self) -> i32 {
        self.wipe_band_count
    }

    fn wipe_height(&self) -> i32 {
        self.wipe_height
    }

    fn max_window_size(&self) -> i32 {
        MAX_WINDOW_SIZE
    }

    fn window_size(&self) -> i32 {
        self.window_size
    }

    fn set_window_size(&mut self, value: i32) {
        self.window_size = value;
    }

    fn display_message(&self) -> bool {
        self.display_message
    }

    fn set_display_message(&mut self, value: bool) {
        self.display_message = value;
    }

    fn max_gamma_correction_level(&self) -> i32 {
        MAX_GAMMA_CORRECTION_LEVEL
    }

    fn gamma_correction_level(&self) -> i32 {
        self.gamma_correction_level
    }

    fn set_gamma_correction_level(&mut self, value: i32) {
        self.gamma_correction_level = value;
    }
}

//=== FramePresenter ======================================================

/// Per-backend presentation contract.
///
/// Only `present`, `format` and `display` are backend-specific; the rest
/// forward to the renderer's [`DisplaySettings`].
pub trait FramePresenter {
    /// Uploads `frame` and draws it. Rejects frames whose format differs
    /// from [`FramePresenter::format`] without touching GPU state.
    fn present(&mut self, frame: &FrameBuffer) -> Result<(), VideoError>;

    /// The frame format this presenter was built for.
    fn format(&self) -> FrameFormat;

    fn display(&self) -> &SharedDisplay;

    /// Notifies the presenter that the drawable area changed size.
    fn resize(&mut self, _width: u32, _height: u32) {}

    //--- Forwarded Settings -----------------------------------------------

    fn initialize_wipe(&mut self) {
        self.display().borrow_mut().initialize_wipe();
    }

    fn wipe_band_count(&self) -> i32 {
        self.display().borrow().wipe_band_count()
    }

    fn wipe_height(&self) -> i32 {
        self.display().borrow().wipe_height()
    }

    fn max_window_size(&self) -> i32 {
        self.display().borrow().max_window_size()
    }

    fn window_size(&self) -> i32 {
        self.display().borrow().window_size()
    }

    fn set_window_size(&mut self, value: i32) {
        self.display().borrow_mut().set_window_size(value);
    }

    fn display_message(&self) -> bool {
        self.display().borrow().display_message()
    }

    fn set_display_message(&mut self, value: bool) {
        self.display().borrow_mut().set_display_message(value);
    }

    fn max_gamma_correction_level(&self) -> i32 {
        self.display().borrow().max_gamma_correction_level()
    }

    fn gamma_correction_level(&self) -> i32 {
        self.display().borrow().gamma_correction_level()
    }

    fn set_gamma_correction_level(&mut self, value: i32) {
        self.display().borrow_mut().set_gamma_correction_level(value);
    }
}

//=== Construction Helpers ================================================

/// Checks `frame` against the presenter's format.
pub fn check_frame(expected: FrameFormat, frame: &FrameBuffer) -> Result<(), VideoError> {
    let actual = frame.format();
    if actual != expected {
        return Err(VideoError::FrameMismatch { expected, actual });
    }
    Ok(())
}

/// Clamps the screen-size and gamma settings to the renderer's limits and
/// pushes them into the renderer. Returns the frame format to build for.
pub fn prepare_display(
    config: &SharedConfig,
    display: &SharedDisplay,
    layout: FrameLayout,
) -> FrameFormat {
    let mut config = config.borrow_mut();
    let mut display = display.borrow_mut();

    config.video_gamescreensize = config
        .video_gamescreensize
        .clamp(0, display.max_window_size());
    config.video_gammacorrection = config
        .video_gammacorrection
        .clamp(0, display.max_gamma_correction_level());

    display.set_window_size(config.video_gamescreensize);
    display.set_gamma_correction_level(config.video_gammacorrection);
    display.set_display_message(config.video_displaymessage);

    FrameFormat::new(FrameSize::for_resolution(config.video_highresolution), layout)
}

/// Copies the renderer's current display values back into the config,
/// so they are persisted on shutdown.
pub fn store_display(config: &SharedConfig, display: &SharedDisplay) {
    let mut config = config.borrow_mut();
    let display = display.borrow();

    config.video_gamescreensize = display.window_size();
    config.video_gammacorrection = display.gamma_correction_level();
    config.video_displaymessage = display.display_message();
}

/// Logs the outcome of presenter construction.
pub fn log_initialization<T>(backend: &str, result: Result<T, VideoError>) -> Result<T, VideoError> {
    match &result {
        Ok(_) => info!(target: "video", "Initialize video ({}): OK", backend),
        Err(e) => error!(target: "video", "Initialize video ({}): Failed: {}", backend, e),
    }
    result
}

//=========================================================================
// Unit Tests
//=========================================================================
