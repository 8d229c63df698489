use crate::shader::{ProgramDesc, ShaderProgram};
use crate::texture::{self, Texture};
use std::sync::Arc;
use viewscape_common::{AssetPaths, ContextProfile, GraphicsApi, SurfaceRequest, SurfaceSize, ViewportConfig};
use viewscape_render::{
    FrameParams, FrameStatus, Mesh, RenderBackend, RenderError, SceneAssets,
    TEXTURED_VERTEX_LAYOUT,
};
use wgpu::util::DeviceExt;
use winit::window::Window;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// wgpu backend set for a requested graphics API.
pub fn backends_for(api: GraphicsApi) -> wgpu::Backends {
    match api {
        GraphicsApi::OpenGl => wgpu::Backends::GL,
        GraphicsApi::Vulkan => wgpu::Backends::VULKAN,
        GraphicsApi::Metal => wgpu::Backends::METAL,
        GraphicsApi::Dx12 => wgpu::Backends::DX12,
        GraphicsApi::Any => wgpu::Backends::all(),
    }
}

/// Reject surface requests this backend cannot honour.
pub fn check_request(request: &SurfaceRequest) -> Result<(), RenderError> {
    request.check().map_err(RenderError::UnsupportedSurface)?;
    if request.profile == ContextProfile::Compatibility {
        return Err(RenderError::UnsupportedSurface(
            "wgpu only creates core/ES OpenGL contexts".into(),
        ));
    }
    Ok(())
}

/// Everything that exists between `initialize` and `release`.
struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    program: ShaderProgram,
    textures: Vec<Texture>,
    texture_bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    depth_view: Option<wgpu::TextureView>,
}

/// wgpu-based viewport renderer drawing the textured quad into a window.
pub struct WgpuBackend {
    window: Arc<Window>,
    request: SurfaceRequest,
    assets: AssetPaths,
    clear_color: wgpu::Color,
    depth_test: bool,
    gpu: Option<GpuState>,
}

impl WgpuBackend {
    pub fn new(window: Arc<Window>, config: &ViewportConfig) -> Self {
        let [r, g, b, a] = config.clear_color;
        Self {
            window,
            request: config.surface,
            assets: config.assets.clone(),
            clear_color: wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: a as f64,
            },
            depth_test: config.depth_test,
            gpu: None,
        }
    }

    fn create_gpu(&self, size: SurfaceSize) -> Result<GpuState, RenderError> {
        check_request(&self.request)?;
        let assets = SceneAssets::load(&self.assets)?;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: backends_for(self.request.api),
            ..Default::default()
        });

        let surface = instance
            .create_surface(self.window.clone())
            .map_err(|e| RenderError::UnsupportedSurface(e.to_string()))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| {
            RenderError::UnsupportedSurface(format!(
                "no {} adapter can present to this window",
                self.request.api
            ))
        })?;
        let info = adapter.get_info();
        tracing::info!(
            "using {} adapter `{}` ({} {})",
            info.backend.to_str(),
            info.name,
            info.driver,
            info.driver_info
        );

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("viewscape_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: Default::default(),
            },
            None,
        ))
        .map_err(|e| RenderError::Device(e.to_string()))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .ok_or_else(|| RenderError::UnsupportedSurface("surface reports no formats".into()))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let program = ShaderProgram::build(
            &device,
            &ProgramDesc {
                vertex_source: &assets.vertex_source,
                fragment_source: &assets.fragment_source,
                vertex_layout: &TEXTURED_VERTEX_LAYOUT,
                texture_units: assets.textures.len() as u32,
                color_format: format,
                depth_format: self.depth_test.then_some(DEPTH_FORMAT),
            },
        )?;
        tracing::debug!(
            "program linked: position@{:?} tex_coord@{:?}",
            program.attrib_location("position"),
            program.attrib_location("tex_coord")
        );

        let textures: Vec<Texture> = assets
            .textures
            .iter()
            .enumerate()
            .map(|(unit, image)| Texture::upload(&device, &queue, image, unit as u32))
            .collect();
        let texture_bind_group = texture::bind_units(&device, program.texture_layout(), &textures);

        let mesh = Mesh::textured_quad();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vertex_buffer"),
            contents: mesh.vertex_bytes(),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_index_buffer"),
            contents: mesh.index_bytes(),
            usage: wgpu::BufferUsages::INDEX,
        });

        let depth_view = self
            .depth_test
            .then(|| create_depth_view(&device, size));

        Ok(GpuState {
            surface,
            device,
            queue,
            config,
            program,
            textures,
            texture_bind_group,
            vertex_buffer,
            index_buffer,
            index_count: mesh.index_count(),
            depth_view,
        })
    }
}

impl RenderBackend for WgpuBackend {
    fn name(&self) -> &str {
        "wgpu"
    }

    fn initialize(&mut self, size: SurfaceSize) -> Result<(), RenderError> {
        let gpu = self.create_gpu(size)?;
        self.gpu = Some(gpu);
        Ok(())
    }

    fn resize(&mut self, size: SurfaceSize) {
        let depth_test = self.depth_test;
        if let Some(gpu) = &mut self.gpu {
            gpu.config.width = size.width;
            gpu.config.height = size.height;
            gpu.surface.configure(&gpu.device, &gpu.config);
            if depth_test {
                gpu.depth_view = Some(create_depth_view(&gpu.device, size));
            }
        }
    }

    fn draw_frame(&mut self, frame: &FrameParams) -> Result<FrameStatus, RenderError> {
        let gpu = self.gpu.as_mut().ok_or(RenderError::NotInitialized)?;

        gpu.program.set_matrix4("model", frame.model)?;
        gpu.program.set_matrix4("view", frame.view)?;
        gpu.program.set_matrix4("projection", frame.projection)?;
        gpu.program.set_float("texture_mix", frame.texture_mix)?;

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::debug!("surface lost or outdated, reconfiguring");
                gpu.surface.configure(&gpu.device, &gpu.config);
                return Ok(FrameStatus::Skipped);
            }
            Err(e) => return Err(RenderError::Surface(e.to_string())),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        gpu.program.flush(&gpu.queue);

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("quad_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: gpu.depth_view.as_ref().map(|depth| {
                    wgpu::RenderPassDepthStencilAttachment {
                        view: depth,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }
                }),
                ..Default::default()
            });

            gpu.program.bind(&mut pass);
            pass.set_bind_group(1, &gpu.texture_bind_group, &[]);
            pass.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
            pass.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..gpu.index_count, 0, 0..1);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));

        self.window.pre_present_notify();
        output.present();
        Ok(FrameStatus::Presented)
    }

    fn release(&mut self) {
        let Some(gpu) = self.gpu.take() else {
            return;
        };
        gpu.vertex_buffer.destroy();
        gpu.index_buffer.destroy();
        for texture in &gpu.textures {
            texture.destroy();
        }
        gpu.program.destroy();
        tracing::debug!("released {} textures and quad buffers", gpu.textures.len());
    }
}

fn create_depth_view(device: &wgpu::Device, size: SurfaceSize) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d {
            width: size.width.max(1),
            height: size.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&Default::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use viewscape_common::ApiVersion;

    #[test]
    fn api_maps_to_single_backend() {
        assert_eq!(backends_for(GraphicsApi::OpenGl), wgpu::Backends::GL);
        assert_eq!(backends_for(GraphicsApi::Vulkan), wgpu::Backends::VULKAN);
        assert_eq!(backends_for(GraphicsApi::Any), wgpu::Backends::all());
    }

    #[test]
    fn core_gl_request_accepted() {
        let req = SurfaceRequest {
            api: GraphicsApi::OpenGl,
            min_version: ApiVersion::new(4, 1),
            profile: ContextProfile::Core,
        };
        assert!(check_request(&req).is_ok());
    }

    #[test]
    fn compatibility_profile_rejected() {
        let req = SurfaceRequest {
            api: GraphicsApi::OpenGl,
            min_version: ApiVersion::new(3, 3),
            profile: ContextProfile::Compatibility,
        };
        assert!(matches!(
            check_request(&req),
            Err(RenderError::UnsupportedSurface(_))
        ));
    }
}
