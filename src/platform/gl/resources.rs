//=========================================================================
// GL Resources
//
// Owning handles for GL objects. Each guard keeps the context alive and
// deletes its object on drop, so a half-built presenter unwinds cleanly
// on any `?` return.
//
//=========================================================================

//=== Standard Library Imports ============================================
use std::rc::Rc;

//=== External Crates =====================================================
use glow::HasContext;
use log::trace;

//=== Internal Imports ====================================================
use crate::core::video::VideoError;

//=== Guard Macro =========================================================

macro_rules! gl_object {
    ($name:ident, $raw:ty, $create:ident, $delete:ident, $error:path) => {
        pub(crate) struct $name {
            gl: Rc<glow::Context>,
            raw: $raw,
        }

        impl $name {
            pub(crate) fn new(gl: &Rc<glow::Context>) -> Result<Self, VideoError> {
                let raw = unsafe { gl.$create() }.map_err($error)?;
                Ok(Self {
                    gl: Rc::clone(gl),
                    raw,
                })
            }

            pub(crate) fn raw(&self) -> $raw {
                self.raw
            }
        }

        impl Drop for $name {
            fn drop(&mut self) {
                trace!(target: "video", "Releasing {}", stringify!($name));
                unsafe { self.gl.$delete(self.raw) };
            }
        }
    };
}

gl_object!(GlTexture, glow::NativeTexture, create_texture, delete_texture, VideoError::Texture);
gl_object!(GlBuffer, glow::NativeBuffer, create_buffer, delete_buffer, VideoError::Buffer);
gl_object!(
    GlVertexArray,
    glow::NativeVertexArray,
    create_vertex_array,
    delete_vertex_array,
    VideoError::Buffer
);

//=== GlShader ============================================================

struct GlShader {
    gl: Rc<glow::Context>,
    raw: glow::NativeShader,
}

impl GlShader {
    fn compile(
        gl: &Rc<glow::Context>,
        kind: u32,
        stage: &'static str,
        source: &str,
    ) -> Result<Self, VideoError> {
        let raw = unsafe { gl.create_shader(kind) }
            .map_err(|log| VideoError::ShaderCompile { stage, log })?;
        let shader = Self {
            gl: Rc::clone(gl),
            raw,
        };

        unsafe {
            gl.shader_source(raw, source);
            gl.compile_shader(raw);
            if !gl.get_shader_compile_status(raw) {
                return Err(VideoError::ShaderCompile {
                    stage,
                    log: gl.get_shader_info_log(raw),
                });
            }
        }

        Ok(shader)
    }
}

impl Drop for GlShader {
    fn drop(&mut self) {
        unsafe { self.gl.delete_shader(self.raw) };
    }
}

//=== GlProgram ===========================================================

pub(crate) struct GlProgram {
    gl: Rc<glow::Context>,
    raw: glow::NativeProgram,
}

impl GlProgram {
    /// Compiles both stages and links them. The shader objects are
    /// released whether or not linking succeeds.
    pub(crate) fn link(
        gl: &Rc<glow::Context>,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Self, VideoError> {
        let vertex = GlShader::compile(gl, glow::VERTEX_SHADER, "vertex", vertex_source)?;
        let fragment = GlShader::compile(gl, glow::FRAGMENT_SHADER, "fragment", fragment_source)?;

        let raw = unsafe { gl.create_program() }.map_err(VideoError::ProgramLink)?;
        let program = Self {
            gl: Rc::clone(gl),
            raw,
        };

        unsafe {
            gl.attach_shader(raw, vertex.raw);
            gl.attach_shader(raw, fragment.raw);
            gl.link_program(raw);
            gl.detach_shader(raw, vertex.raw);
            gl.detach_shader(raw, fragment.raw);

            if !gl.get_program_link_status(raw) {
                return Err(VideoError::ProgramLink(gl.get_program_info_log(raw)));
            }
        }

        Ok(program)
    }

    pub(crate) fn raw(&self) -> glow::NativeProgram {
        self.raw
    }
}

impl Drop for GlProgram {
    fn drop(&mut self) {
        trace!(target: "video", "Releasing GlProgram");
        unsafe { self.gl.delete_program(self.raw) };
    }
}
