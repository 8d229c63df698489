use glam::Mat4;
use viewscape_render::{RenderError, ShaderStage, UniformBlock, VertexLayout};
use wgpu::util::DeviceExt;

/// Inputs for building a [`ShaderProgram`].
pub struct ProgramDesc<'a> {
    pub vertex_source: &'a str,
    pub fragment_source: &'a str,
    pub vertex_layout: &'a VertexLayout,
    pub texture_units: u32,
    pub color_format: wgpu::TextureFormat,
    pub depth_format: Option<wgpu::TextureFormat>,
}

/// Vertex + fragment shader pair linked into a render pipeline, with its
/// uniform buffer.
///
/// Bind group 0 holds the uniform block; bind group 1 holds one
/// texture/sampler pair per texture unit (bindings `2n` and `2n + 1`).
pub struct ShaderProgram {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    texture_layout: wgpu::BindGroupLayout,
    vertex_layout: VertexLayout,
    uniforms: UniformBlock,
}

impl ShaderProgram {
    pub fn build(device: &wgpu::Device, desc: &ProgramDesc<'_>) -> Result<Self, RenderError> {
        let vertex = compile_module(device, ShaderStage::Vertex, desc.vertex_source)?;
        let fragment = compile_module(device, ShaderStage::Fragment, desc.fragment_source)?;

        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let uniforms = UniformBlock::default();
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniform_buffer"),
            contents: uniforms.as_bytes(),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform_bind_group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let texture_entries: Vec<wgpu::BindGroupLayoutEntry> = (0..desc.texture_units)
            .flat_map(crate::texture::Texture::layout_entries)
            .collect();
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_bind_group_layout"),
            entries: &texture_entries,
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("program_layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let attributes = vertex_attributes(desc.vertex_layout)?;

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("quad_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: desc.vertex_layout.stride,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &attributes,
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: desc.color_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: desc.depth_format.map(|format| wgpu::DepthStencilState {
                format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(RenderError::ProgramLink(err.to_string()));
        }

        Ok(Self {
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            texture_layout,
            vertex_layout: *desc.vertex_layout,
            uniforms,
        })
    }

    pub fn attrib_location(&self, name: &str) -> Option<u32> {
        self.vertex_layout.attrib_location(name)
    }

    pub fn set_matrix4(&mut self, name: &str, value: Mat4) -> Result<(), RenderError> {
        self.uniforms.set_matrix4(name, value)
    }

    pub fn set_float(&mut self, name: &str, value: f32) -> Result<(), RenderError> {
        self.uniforms.set_float(name, value)
    }

    pub fn texture_layout(&self) -> &wgpu::BindGroupLayout {
        &self.texture_layout
    }

    /// Upload pending uniform values. Call before recording the pass.
    pub fn flush(&self, queue: &wgpu::Queue) {
        queue.write_buffer(&self.uniform_buffer, 0, self.uniforms.as_bytes());
    }

    /// Make this program current inside `pass`.
    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.uniform_bind_group, &[]);
    }

    pub fn destroy(&self) {
        self.uniform_buffer.destroy();
    }
}

fn compile_module(
    device: &wgpu::Device,
    stage: ShaderStage,
    source: &str,
) -> Result<wgpu::ShaderModule, RenderError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(match stage {
            ShaderStage::Vertex => "vertex_shader",
            ShaderStage::Fragment => "fragment_shader",
        }),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    let info = pollster::block_on(module.get_compilation_info());
    let scope_error = pollster::block_on(device.pop_error_scope());

    if let Some(msg) = info
        .messages
        .iter()
        .find(|m| m.message_type == wgpu::CompilationMessageType::Error)
    {
        let message = match &msg.location {
            Some(loc) => format!("{}:{}: {}", loc.line_number, loc.line_position, msg.message),
            None => msg.message.clone(),
        };
        return Err(RenderError::ShaderCompile { stage, message });
    }
    if let Some(err) = scope_error {
        return Err(RenderError::ShaderCompile {
            stage,
            message: err.to_string(),
        });
    }
    Ok(module)
}

/// Translate a backend-agnostic vertex layout into wgpu attributes.
pub(crate) fn vertex_attributes(
    layout: &VertexLayout,
) -> Result<Vec<wgpu::VertexAttribute>, RenderError> {
    layout
        .attributes
        .iter()
        .map(|attr| {
            let format = match attr.components {
                1 => wgpu::VertexFormat::Float32,
                2 => wgpu::VertexFormat::Float32x2,
                3 => wgpu::VertexFormat::Float32x3,
                4 => wgpu::VertexFormat::Float32x4,
                n => {
                    return Err(RenderError::ProgramLink(format!(
                        "attribute `{}` has unsupported component count {n}",
                        attr.name
                    )));
                }
            };
            Ok(wgpu::VertexAttribute {
                format,
                offset: attr.offset,
                shader_location: attr.location,
            })
        })
        .collect()
}
