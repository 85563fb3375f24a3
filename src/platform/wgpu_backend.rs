//=========================================================================
// wgpu Presenter
//
// Presents frames through a wgpu surface on a winit window.
//
// Setup (blocking, via pollster):
// ```text
//   Instance ─► Surface ─► Adapter ─► Device/Queue ─► configure surface
//      └─► texture (power-of-two, Rgba8Unorm) + nearest sampler
//      └─► bind group ─► pipeline ─► vertex/index buffers
// ```
//
// Per frame: write the stored frame into the texture's top-left corner,
// draw the quad, present. A lost or outdated surface is reconfigured and
// the frame skipped.
//
//=========================================================================

//=== Standard Library Imports ============================================
use std::borrow::Cow;
use std::sync::Arc;

//=== External Crates =====================================================
use log::{debug, info, warn};
use wgpu::util::DeviceExt;
use winit::window::Window;

//=== Internal Imports ====================================================
use crate::core::config::SharedConfig;
use crate::core::video::frame::BYTES_PER_PIXEL;
use crate::core::video::geometry::{quad_vertices, texture_size_for, QuadVertex, QUAD_INDICES};
use crate::core::video::{
    check_frame, log_initialization, prepare_display, FrameBuffer, FrameFormat, FrameLayout,
    FramePresenter, FrameSize, SharedDisplay, VideoError,
};

//=== Shader ==============================================================

const SHADER: &str = r#"
struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) tex_coord: vec2<f32>,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>, @location(1) tex_coord: vec2<f32>) -> VertexOutput {
    var out: VertexOutput;
    out.position = vec4<f32>(position, 1.0);
    out.tex_coord = tex_coord;
    return out;
}

@group(0) @binding(0) var screen: texture_2d<f32>;
@group(0) @binding(1) var screen_sampler: sampler;

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(screen, screen_sampler, in.tex_coord);
}
"#;

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

//=== WgpuPresenter =======================================================

pub(crate) struct WgpuPresenter {
    format: FrameFormat,
    display: SharedDisplay,

    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    texture: wgpu::Texture,

    surface_config: wgpu::SurfaceConfiguration,
    surface: wgpu::Surface<'static>,
    queue: wgpu::Queue,
    device: wgpu::Device,
}

impl WgpuPresenter {
    pub(crate) fn new(
        window: Arc<Window>,
        config: &SharedConfig,
        display: SharedDisplay,
        layout: FrameLayout,
    ) -> Result<Self, VideoError> {
        let format = prepare_display(config, &display, layout);
        log_initialization("wgpu", pollster::block_on(Self::build(window, format, display)))
    }

    async fn build(
        window: Arc<Window>,
        format: FrameFormat,
        display: SharedDisplay,
    ) -> Result<Self, VideoError> {
        //--- Device and surface -------------------------------------------
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let size = window.inner_size();
        let surface = instance
            .create_surface(window)
            .map_err(|e| VideoError::Surface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(VideoError::Adapter)?;
        info!(target: "video", "wgpu adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("doom_platform_device"),
                    ..Default::default()
                },
                None,
            )
            .await
            .map_err(|e| VideoError::Device(e.to_string()))?;

        let capabilities = surface.get_capabilities(&adapter);
        // Frame bytes are already display-ready; an sRGB target would
        // re-encode them.
        let surface_format = capabilities
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or_else(|| capabilities.formats.first())
            .copied()
            .ok_or_else(|| VideoError::Surface("surface reports no formats".to_string()))?;
        let alpha_mode = capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            desired_maximum_frame_latency: 2,
            alpha_mode,
            view_formats: vec![],
        };
        surface.configure(&device, &surface_config);

        //--- Resources ------------------------------------------------------
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let texture_size = texture_size_for(format);
        debug!(target: "video", "wgpu texture {} for {}", texture_size, format);
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("screen_texture"),
            size: extent(texture_size),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("screen_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("screen_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("screen_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let pipeline = create_pipeline(&device, &bind_group_layout, surface_format);

        let quad = quad_vertices(format, texture_size);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vertices"),
            contents: bytemuck::cast_slice(&quad),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_indices"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        if let Some(error) = device.pop_error_scope().await {
            return Err(VideoError::Device(format!("resource validation: {}", error)));
        }

        Ok(Self {
            format,
            display,
            pipeline,
            bind_group,
            vertex_buffer,
            index_buffer,
            texture,
            surface_config,
            surface,
            queue,
            device,
        })
    }

    fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.surface_config);
    }
}

impl FramePresenter for WgpuPresenter {
    fn present(&mut self, frame: &FrameBuffer) -> Result<(), VideoError> {
        check_frame(self.format, frame)?;
        let stored = frame.stored_size();

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!(target: "video", "Surface lost, reconfiguring");
                self.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                debug!(target: "video", "Surface timeout, frame skipped");
                return Ok(());
            }
            Err(e) => return Err(VideoError::Present(e.to_string())),
        };

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            frame.data(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(stored.width * BYTES_PER_PIXEL as u32),
                rows_per_image: Some(stored.height),
            },
            extent(stored),
        );

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("present_encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("present_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.bind_group, &[]);
            pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn format(&self) -> FrameFormat {
        self.format
    }

    fn display(&self) -> &SharedDisplay {
        &self.display
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.reconfigure();
        debug!(target: "video", "wgpu surface resized to {}x{}", width, height);
    }
}

//=== Helpers =============================================================

fn extent(size: FrameSize) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width: size.width,
        height: size.height,
        depth_or_array_layers: 1,
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
    target_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("screen_shader"),
        source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(SHADER)),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("screen_pipeline_layout"),
        bind_group_layouts: &[bind_group_layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("screen_pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &module,
            entry_point: Some("vs_main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &VERTEX_ATTRIBUTES,
            }],
        },
        fragment: Some(wgpu::FragmentState {
            module: &module,
            entry_point: Some("fs_main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: target_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extent_is_single_layer() {
        let e = extent(FrameSize::new(256, 512));
        assert_eq!((e.width, e.height, e.depth_or_array_layers), (256, 512, 1));
    }

    #[test]
    fn vertex_layout_matches_quad_vertex() {
        assert_eq!(std::mem::size_of::<QuadVertex>(), 20);
        assert_eq!(VERTEX_ATTRIBUTES[1].offset, 12);
        assert_eq!(VERTEX_ATTRIBUTES[1].shader_location, 1);
    }
}
