//=========================================================================
// OpenGL Presenter
//
// Presents frames through an OpenGL 3.3 core context on a winit window.
//
// Setup order:
// ```text
//   glutin-winit DisplayBuilder ─► window + GL config
//        └─► context ─► window surface ─► make current ─► glow loader
//              └─► program ─► texture ─► VAO/VBO/IBO
// ```
//
// The texture is a power-of-two box allocated once; each `present`
// overwrites its top-left sub-rectangle with the stored frame and draws
// one quad. All GL objects are guards from `resources`, declared before
// the context so they are released while it is still current.
//
//=========================================================================

mod resources;

//=== Standard Library Imports ============================================
use std::ffi::CString;
use std::num::NonZeroU32;
use std::ptr;
use std::rc::Rc;
use std::sync::Arc;

//=== External Crates =====================================================
use glow::HasContext;
use glutin::config::{Config as GlutinConfig, ConfigTemplateBuilder};
use glutin::context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};
use glutin_winit::DisplayBuilder;
use log::{debug, warn};
use winit::event_loop::ActiveEventLoop;
use winit::raw_window_handle::HasWindowHandle;
use winit::window::{Window, WindowAttributes};

//=== Internal Imports ====================================================
use super::PlatformError;
use crate::core::config::SharedConfig;
use crate::core::video::geometry::{quad_vertices, texture_size_for, QuadVertex, QUAD_INDICES};
use crate::core::video::{
    check_frame, log_initialization, prepare_display, FrameBuffer, FrameFormat, FrameLayout,
    FramePresenter, SharedDisplay, VideoError,
};
use resources::{GlBuffer, GlProgram, GlTexture, GlVertexArray};

//=== Shaders =============================================================

const VERTEX_SHADER: &str = r#"#version 330 core
layout (location = 0) in vec3 a_position;
layout (location = 1) in vec2 a_tex_coord;

out vec2 v_tex_coord;

void main() {
    gl_Position = vec4(a_position, 1.0);
    v_tex_coord = a_tex_coord;
}
"#;

const FRAGMENT_SHADER: &str = r#"#version 330 core
in vec2 v_tex_coord;
out vec4 frag_color;

uniform sampler2D u_screen;

void main() {
    frag_color = texture(u_screen, v_tex_coord);
}
"#;

//=== GlPresenter =========================================================

pub(crate) struct GlPresenter {
    format: FrameFormat,
    display: SharedDisplay,

    // GL objects first: dropped before the context below.
    program: GlProgram,
    vertex_array: GlVertexArray,
    _vertices: GlBuffer,
    _indices: GlBuffer,
    texture: GlTexture,

    gl: Rc<glow::Context>,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
}

impl GlPresenter {
    /// Creates the window together with a matching GL config, then builds
    /// the presenter on it.
    pub(crate) fn create(
        event_loop: &ActiveEventLoop,
        attributes: WindowAttributes,
        config: &SharedConfig,
        display: SharedDisplay,
        layout: FrameLayout,
    ) -> Result<(Arc<Window>, Self), PlatformError> {
        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(attributes))
            .build(event_loop, ConfigTemplateBuilder::new(), pick_config)
            .map_err(|e| PlatformError::WindowCreation(e.to_string()))?;

        let window = window
            .map(Arc::new)
            .ok_or_else(|| PlatformError::WindowCreation("no window for GL config".to_string()))?;

        let format = prepare_display(config, &display, layout);
        let presenter = log_initialization("gl", Self::build(&window, &gl_config, format, display))?;
        Ok((window, presenter))
    }

    fn build(
        window: &Window,
        gl_config: &GlutinConfig,
        format: FrameFormat,
        display: SharedDisplay,
    ) -> Result<Self, VideoError> {
        //--- Context and surface ------------------------------------------
        let raw_handle = window
            .window_handle()
            .map_err(|e| VideoError::Surface(e.to_string()))?
            .as_raw();
        let gl_display = gl_config.display();

        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .with_profile(GlProfile::Core)
            .build(Some(raw_handle));
        let not_current = unsafe { gl_display.create_context(gl_config, &context_attributes) }
            .map_err(|e| VideoError::Context(e.to_string()))?;

        let size = window.inner_size();
        let surface_attributes = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            raw_handle,
            NonZeroU32::new(size.width).unwrap_or(NonZeroU32::MIN),
            NonZeroU32::new(size.height).unwrap_or(NonZeroU32::MIN),
        );
        let surface = unsafe { gl_display.create_window_surface(gl_config, &surface_attributes) }
            .map_err(|e| VideoError::Surface(e.to_string()))?;

        let context = not_current
            .make_current(&surface)
            .map_err(|e| VideoError::Context(e.to_string()))?;

        if let Err(e) = surface.set_swap_interval(&context, SwapInterval::Wait(NonZeroU32::MIN)) {
            warn!(target: "video", "VSync unavailable: {}", e);
        }

        let gl = Rc::new(unsafe {
            glow::Context::from_loader_function(|symbol| {
                CString::new(symbol)
                    .map(|symbol| gl_display.get_proc_address(&symbol))
                    .unwrap_or(ptr::null())
            })
        });

        //--- Objects --------------------------------------------------------
        let program = GlProgram::link(&gl, VERTEX_SHADER, FRAGMENT_SHADER)?;
        let texture = GlTexture::new(&gl)?;
        let vertex_array = GlVertexArray::new(&gl)?;
        let vertices = GlBuffer::new(&gl)?;
        let indices = GlBuffer::new(&gl)?;

        let texture_size = texture_size_for(format);
        let quad = quad_vertices(format, texture_size);
        debug!(target: "video", "GL texture {} for {}", texture_size, format);

        unsafe {
            gl.bind_texture(glow::TEXTURE_2D, Some(texture.raw()));
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::NEAREST as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::NEAREST as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE as i32);
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA8 as i32,
                texture_size.width as i32,
                texture_size.height as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                None,
            );

            gl.bind_vertex_array(Some(vertex_array.raw()));

            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vertices.raw()));
            gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, bytemuck::cast_slice(&quad), glow::STATIC_DRAW);

            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(indices.raw()));
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(&QUAD_INDICES),
                glow::STATIC_DRAW,
            );

            let stride = std::mem::size_of::<QuadVertex>() as i32;
            gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(1, 2, glow::FLOAT, false, stride, 3 * 4);
            gl.enable_vertex_attrib_array(1);

            gl.bind_vertex_array(None);

            gl.use_program(Some(program.raw()));
            if let Some(location) = gl.get_uniform_location(program.raw(), "u_screen") {
                gl.uniform_1_i32(Some(&location), 0);
            }

            gl.viewport(0, 0, size.width as i32, size.height as i32);
        }

        Ok(Self {
            format,
            display,
            program,
            vertex_array,
            _vertices: vertices,
            _indices: indices,
            texture,
            gl,
            surface,
            context,
        })
    }
}

impl FramePresenter for GlPresenter {
    fn present(&mut self, frame: &FrameBuffer) -> Result<(), VideoError> {
        check_frame(self.format, frame)?;
        let stored = frame.stored_size();
        let gl = &self.gl;

        unsafe {
            gl.clear_color(0.0, 0.0, 0.0, 1.0);
            gl.clear(glow::COLOR_BUFFER_BIT);

            gl.use_program(Some(self.program.raw()));
            gl.active_texture(glow::TEXTURE0);
            gl.bind_texture(glow::TEXTURE_2D, Some(self.texture.raw()));
            gl.tex_sub_image_2d(
                glow::TEXTURE_2D,
                0,
                0,
                0,
                stored.width as i32,
                stored.height as i32,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(frame.data()),
            );

            gl.bind_vertex_array(Some(self.vertex_array.raw()));
            gl.draw_elements(glow::TRIANGLES, QUAD_INDICES.len() as i32, glow::UNSIGNED_INT, 0);
            gl.bind_vertex_array(None);
        }

        self.surface
            .swap_buffers(&self.context)
            .map_err(|e| VideoError::Present(e.to_string()))
    }

    fn format(&self) -> FrameFormat {
        self.format
    }

    fn display(&self) -> &SharedDisplay {
        &self.display
    }

    fn resize(&mut self, width: u32, height: u32) {
        let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) else {
            return;
        };
        self.surface.resize(&self.context, w, h);
        unsafe { self.gl.viewport(0, 0, width as i32, height as i32) };
        debug!(target: "video", "GL surface resized to {}x{}", width, height);
    }
}

//=== Config Selection ====================================================

/// Prefers the config with the most samples.
fn pick_config(configs: Box<dyn Iterator<Item = GlutinConfig> + '_>) -> GlutinConfig {
    // glutin-winit only invokes the picker with a non-empty set.
    configs
        .reduce(|best, candidate| {
            if candidate.num_samples() > best.num_samples() {
                candidate
            } else {
                best
            }
        })
        .expect("GL config set is never empty")
}

//=========================================================================
// Unit Tests
//=========================================================================
