//=========================================================================
// Winit Host
//
// Drives the simulation from a winit event loop, presenting through the
// OpenGL or wgpu backend.
//
// Lifecycle:
// ```text
//   run() ─► EventLoop::run_app(&mut WinitHost)
//              resumed()        window + presenter + input   (once)
//              window_event()   keys, buttons, focus, resize, redraw, close
//              device_event()   raw mouse motion
//              about_to_wait()  due ticks ─► request_redraw ─► WaitUntil
//              exiting()        display settings back into config
// ```
//
// Everything lives on the main thread (winit requirement on macOS). A
// startup failure is parked in `failure` and returned once the loop has
// shut down.
//
//=========================================================================

//=== Standard Library Imports ============================================
use std::sync::Arc;
use std::time::Instant;

//=== External Crates =====================================================
use log::{debug, error, info, trace};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Fullscreen, Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================
use super::winit_input::{apply_focus, apply_key, apply_motion, apply_mouse_button, WindowCursor, WinitInput};
use super::{HostContext, PlatformError};
use crate::core::config::SharedConfig;
use crate::core::simulation::{run_tick, TickClock, UpdateResult};
use crate::core::video::{store_display, FrameBuffer, FramePresenter};

pub(crate) const WINDOW_TITLE: &str = "Doom";

//=== WindowBackend =======================================================

/// Presenters that render into a winit window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WindowBackend {
    OpenGl,
    Wgpu,
}

impl WindowBackend {
    fn name(self) -> &'static str {
        match self {
            Self::OpenGl => "gl",
            Self::Wgpu => "wgpu",
        }
    }
}

//=== Session =============================================================

/// State that exists once the window is up. Field order is drop order:
/// the presenter goes before the window it draws into.
struct Session {
    presenter: Box<dyn FramePresenter>,
    input: WinitInput,
    frame: FrameBuffer,
    clock: TickClock,
    window: Arc<Window>,
}

//=== WinitHost ===========================================================

struct WinitHost<'a> {
    backend: WindowBackend,
    context: HostContext<'a>,
    session: Option<Session>,
    failure: Option<PlatformError>,
}

pub(super) fn run(backend: WindowBackend, context: HostContext<'_>) -> Result<(), PlatformError> {
    debug!(target: "platform", "Starting winit event loop ({})", backend.name());

    let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;
    let mut host = WinitHost {
        backend,
        context,
        session: None,
        failure: None,
    };

    event_loop
        .run_app(&mut host)
        .map_err(PlatformError::EventLoopExecution)?;

    match host.failure.take() {
        Some(failure) => Err(failure),
        None => Ok(()),
    }
}

impl WinitHost<'_> {
    //--- Startup ----------------------------------------------------------

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<Session, PlatformError> {
        let attributes = window_attributes(&self.context.config, event_loop);
        let (window, presenter) = create_presenter(self.backend, event_loop, attributes, &self.context)?;

        let size = window.inner_size();
        info!(
            target: "platform",
            "Window created: {}x{} @ {}x DPI",
            size.width,
            size.height,
            window.scale_factor()
        );

        let input = WinitInput::new(self.context.config.clone(), WindowCursor::new(window.clone()));
        let frame = FrameBuffer::new(presenter.format());
        let clock = TickClock::new(self.context.tics_per_second, Instant::now());

        window.request_redraw();
        Ok(Session {
            presenter,
            input,
            frame,
            clock,
            window,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, failure: PlatformError) {
        error!(target: "platform", "{}", failure);
        self.failure = Some(failure);
        event_loop.exit();
    }

    //--- Per-frame --------------------------------------------------------

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        self.context
            .simulation
            .render(&mut session.frame, session.presenter.as_mut());

        if let Err(e) = session.presenter.present(&session.frame) {
            self.fail(event_loop, e.into());
        }
    }

    fn tick(&mut self, event_loop: &ActiveEventLoop) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let due = session.clock.due_ticks(Instant::now());
        for _ in 0..due {
            let result = run_tick(
                &mut *self.context.simulation,
                &self.context.events,
                &mut session.input,
            );
            if result == UpdateResult::Completed {
                info!(target: "engine", "Simulation completed");
                event_loop.exit();
                return;
            }
        }

        if due > 0 {
            trace!(target: "engine", "{} tick(s)", due);
            session.window.request_redraw();
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(session.clock.deadline()));
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for WinitHost<'_> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.session.is_some() || self.failure.is_some() {
            debug!(target: "platform", "Window already exists (resume)");
            return;
        }

        match self.start(event_loop) {
            Ok(session) => self.session = Some(session),
            Err(failure) => self.fail(event_loop, failure),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                event_loop.exit();
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            WindowEvent::Resized(size) => {
                if let Some(session) = self.session.as_mut() {
                    session.presenter.resize(size.width, size.height);
                }
            }

            WindowEvent::Focused(focused) => {
                if let Some(session) = self.session.as_mut() {
                    apply_focus(&mut session.input, focused);
                }
            }

            WindowEvent::KeyboardInput {
                event: key_event,
                is_synthetic,
                ..
            } => {
                if let Some(session) = self.session.as_mut() {
                    apply_key(
                        &mut session.input,
                        &self.context.forwarder,
                        key_event.physical_key,
                        key_event.state,
                        is_synthetic,
                    );
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(session) = self.session.as_mut() {
                    apply_mouse_button(&mut session.input, button, state);
                }
            }

            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if let Some(session) = self.session.as_mut() {
                apply_motion(&mut session.input, delta);
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.tick(event_loop);
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        store_display(&self.context.config, &self.context.display);
        // Presenter and window go while the loop is still alive.
        self.session = None;
        info!(target: "platform", "Event loop exiting");
    }
}

//=== Window Setup ========================================================

fn window_attributes(config: &SharedConfig, event_loop: &ActiveEventLoop) -> WindowAttributes {
    let mut config = config.borrow_mut();
    if let Some(monitor) = event_loop.primary_monitor() {
        let size = monitor.size();
        config.adopt_display_size(size.width, size.height);
    }
    config.clamp_window_dimensions();

    let mut attributes = Window::default_attributes()
        .with_title(WINDOW_TITLE)
        .with_inner_size(PhysicalSize::new(
            config.video_screenwidth as u32,
            config.video_screenheight as u32,
        ));

    if config.video_fullscreen {
        attributes = attributes.with_fullscreen(Some(Fullscreen::Borderless(None)));
    }
    attributes
}

#[allow(unused_variables)]
fn create_presenter(
    backend: WindowBackend,
    event_loop: &ActiveEventLoop,
    attributes: WindowAttributes,
    context: &HostContext<'_>,
) -> Result<(Arc<Window>, Box<dyn FramePresenter>), PlatformError> {
    match backend {
        #[cfg(feature = "gl")]
        WindowBackend::OpenGl => {
            let (window, presenter) = super::gl::GlPresenter::create(
                event_loop,
                attributes,
                &context.config,
                context.display.clone(),
                context.layout,
            )?;
            Ok((window, Box::new(presenter)))
        }

        #[cfg(feature = "wgpu")]
        WindowBackend::Wgpu => {
            let window = event_loop
                .create_window(attributes)
                .map(Arc::new)
                .map_err(|e| PlatformError::WindowCreation(e.to_string()))?;
            let presenter = super::wgpu_backend::WgpuPresenter::new(
                window.clone(),
                &context.config,
                context.display.clone(),
                context.layout,
            )?;
            Ok((window, Box::new(presenter)))
        }

        #[allow(unreachable_patterns)]
        other => Err(PlatformError::BackendUnavailable(other.name())),
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_names_match_features() {
        assert_eq!(WindowBackend::OpenGl.name(), "gl");
        assert_eq!(WindowBackend::Wgpu.name(), "wgpu");
    }
}
