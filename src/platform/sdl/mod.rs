//=========================================================================
// SDL Host
//
// Alternative host built on SDL2: one window, a hardware canvas and a
// polled event pump.
//
// Loop:
// ```text
//   poll events ─► forward key transitions, accumulate motion
//   snapshot keyboard/mouse ─► KeyboardState::set_keys / set_buttons
//   due ticks ─► run_tick × n ─► render ─► present ─► sleep to deadline
// ```
//
// Unlike the winit host, held keys come from SDL's own keyboard state
// each iteration, so nothing can stick down after a focus change.
//
//=========================================================================

mod keys;

//=== Standard Library Imports ============================================
use std::thread;
use std::time::Instant;

//=== External Crates =====================================================
use log::{debug, info, warn};
use sdl2::event::{Event, WindowEvent};
use sdl2::mouse::MouseUtil;
use sdl2::pixels::{Color, PixelFormatEnum};
use sdl2::rect::Rect;
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};

//=== Internal Imports ====================================================
use super::winit_host::WINDOW_TITLE;
use super::{HostContext, PlatformError};
use crate::core::config::SharedConfig;
use crate::core::input::{CursorGrab, InputEvent, InputSynthesizer, UserInput};
use crate::core::simulation::{run_tick, TickClock, UpdateResult};
use crate::core::video::frame::BYTES_PER_PIXEL;
use crate::core::video::geometry::texture_size_for;
use crate::core::video::{
    check_frame, log_initialization, prepare_display, store_display, FrameBuffer, FrameFormat,
    FrameLayout, FramePresenter, SharedDisplay, VideoError,
};
use keys::{to_engine_button, to_engine_key};

//=== run() ===============================================================

pub(super) fn run(context: HostContext<'_>) -> Result<(), PlatformError> {
    let HostContext {
        simulation,
        config,
        display,
        forwarder,
        events,
        tics_per_second,
        layout,
    } = context;

    let sdl = sdl2::init().map_err(PlatformError::Sdl)?;
    let video = sdl.video().map_err(PlatformError::Sdl)?;

    let window = create_window(&video, &config)?;
    let mut presenter = SdlPresenter::new(window, &config, display.clone(), layout)?;
    let mut input = InputSynthesizer::new(config.clone(), RelativeMouse(sdl.mouse()));
    let mut pump = sdl.event_pump().map_err(PlatformError::Sdl)?;

    let mut frame = FrameBuffer::new(presenter.format());
    let mut clock = TickClock::new(tics_per_second, Instant::now());

    'running: loop {
        //--- Events ---------------------------------------------------------
        for event in pump.poll_iter() {
            match event {
                Event::Quit { .. } => {
                    info!(target: "platform", "Quit requested");
                    break 'running;
                }
                Event::KeyDown { scancode, .. } => {
                    forwarder.forward(InputEvent::KeyDown(to_engine_key(scancode)));
                }
                Event::KeyUp { scancode, .. } => {
                    forwarder.forward(InputEvent::KeyUp(to_engine_key(scancode)));
                }
                Event::MouseMotion { xrel, yrel, .. } => {
                    input.state_mut().add_motion(f64::from(xrel), f64::from(yrel));
                }
                Event::Window {
                    win_event: WindowEvent::FocusLost,
                    ..
                } => {
                    debug!(target: "platform::input", "Focus lost, releasing mouse");
                    input.release_mouse();
                }
                Event::Window {
                    win_event: WindowEvent::SizeChanged(w, h),
                    ..
                } => presenter.resize(w.max(0) as u32, h.max(0) as u32),
                _ => {}
            }
        }

        //--- Device snapshot ----------------------------------------------
        let held_keys: Vec<_> = pump
            .keyboard_state()
            .pressed_scancodes()
            .map(|scancode| to_engine_key(Some(scancode)))
            .collect();
        let held_buttons: Vec<_> = pump
            .mouse_state()
            .pressed_mouse_buttons()
            .map(to_engine_button)
            .collect();
        input.state_mut().set_keys(held_keys);
        input.state_mut().set_buttons(held_buttons);

        //--- Ticks and frame ----------------------------------------------
        let due = clock.due_ticks(Instant::now());
        for _ in 0..due {
            if run_tick(&mut *simulation, &events, &mut input) == UpdateResult::Completed {
                info!(target: "engine", "Simulation completed");
                break 'running;
            }
        }

        if due > 0 {
            simulation.render(&mut frame, &mut presenter);
            presenter.present(&frame)?;
        }

        let now = Instant::now();
        if clock.deadline() > now {
            thread::sleep(clock.deadline() - now);
        }
    }

    store_display(&config, &display);
    Ok(())
}

fn create_window(video: &sdl2::VideoSubsystem, config: &SharedConfig) -> Result<Window, PlatformError> {
    let mut config = config.borrow_mut();
    match video.desktop_display_mode(0) {
        Ok(mode) => config.adopt_display_size(mode.w.max(0) as u32, mode.h.max(0) as u32),
        Err(e) => warn!(target: "platform", "Display mode unavailable: {}", e),
    }
    config.clamp_window_dimensions();

    let mut builder = video.window(
        WINDOW_TITLE,
        config.video_screenwidth as u32,
        config.video_screenheight as u32,
    );
    builder.position_centered().resizable();
    if config.video_fullscreen {
        builder.fullscreen_desktop();
    }

    let window = builder
        .build()
        .map_err(|e| PlatformError::WindowCreation(e.to_string()))?;
    info!(
        target: "platform",
        "Window created: {}x{}",
        config.video_screenwidth,
        config.video_screenheight
    );
    Ok(window)
}

//=== RelativeMouse =======================================================

struct RelativeMouse(MouseUtil);

impl CursorGrab for RelativeMouse {
    fn grab(&mut self) -> bool {
        self.0.set_relative_mouse_mode(true);
        self.0.relative_mouse_mode()
    }

    fn release(&mut self) {
        self.0.set_relative_mouse_mode(false);
    }
}

//=== SdlPresenter ========================================================

/// Streaming texture handle. Built with `unsafe_textures`, so the texture
/// must be destroyed explicitly and before its renderer.
struct ScreenTexture(Option<Texture>);

impl Drop for ScreenTexture {
    fn drop(&mut self) {
        if let Some(texture) = self.0.take() {
            unsafe { texture.destroy() };
        }
    }
}

struct SdlPresenter {
    format: FrameFormat,
    display: SharedDisplay,
    texture: ScreenTexture,
    _creator: TextureCreator<WindowContext>,
    canvas: Canvas<Window>,
}

impl SdlPresenter {
    fn new(
        window: Window,
        config: &SharedConfig,
        display: SharedDisplay,
        layout: FrameLayout,
    ) -> Result<Self, VideoError> {
        let format = prepare_display(config, &display, layout);
        log_initialization("sdl", Self::build(window, format, display))
    }

    fn build(window: Window, format: FrameFormat, display: SharedDisplay) -> Result<Self, VideoError> {
        sdl2::hint::set("SDL_RENDER_SCALE_QUALITY", "0");

        let canvas = window
            .into_canvas()
            .accelerated()
            .present_vsync()
            .build()
            .map_err(|e| VideoError::Context(e.to_string()))?;
        let creator = canvas.texture_creator();

        let texture_size = texture_size_for(format);
        let texture = creator
            .create_texture_streaming(PixelFormatEnum::RGBA32, texture_size.width, texture_size.height)
            .map_err(|e| VideoError::Texture(e.to_string()))?;
        debug!(target: "video", "SDL texture {} for {}", texture_size, format);

        Ok(Self {
            format,
            display,
            texture: ScreenTexture(Some(texture)),
            _creator: creator,
            canvas,
        })
    }
}

impl FramePresenter for SdlPresenter {
    fn present(&mut self, frame: &FrameBuffer) -> Result<(), VideoError> {
        check_frame(self.format, frame)?;
        let Some(texture) = self.texture.0.as_mut() else {
            return Err(VideoError::Texture("texture released".to_string()));
        };

        let stored = frame.stored_size();
        let source = Rect::new(0, 0, stored.width, stored.height);
        texture
            .update(source, frame.data(), stored.width as usize * BYTES_PER_PIXEL)
            .map_err(|e| VideoError::Texture(e.to_string()))?;

        self.canvas.set_draw_color(Color::BLACK);
        self.canvas.clear();

        let copied = match self.format.layout {
            FrameLayout::RowMajor => self.canvas.copy(texture, source, None),
            FrameLayout::Transposed => {
                // Rotating counter-clockwise after a horizontal flip is a
                // transpose. The destination is given pre-rotation, so
                // its axes are swapped around the window centre.
                let (width, height) = self
                    .canvas
                    .output_size()
                    .map_err(VideoError::Present)?;
                let target = Rect::from_center(
                    ((width / 2) as i32, (height / 2) as i32),
                    height,
                    width,
                );
                self.canvas
                    .copy_ex(texture, source, target, -90.0, None, true, false)
            }
        };
        copied.map_err(VideoError::Present)?;

        self.canvas.present();
        Ok(())
    }

    fn format(&self) -> FrameFormat {
        self.format
    }

    fn display(&self) -> &SharedDisplay {
        &self.display
    }
}
