//! Meter render pipeline.
//!
//! One bind group, one uniform buffer, no vertex or index buffers: the
//! vertex stage derives everything from `@builtin(vertex_index)` and the
//! uniform record.

use wgpu::{BindGroup, BindGroupLayout, Buffer, Device, RenderPipeline, TextureFormat};

use super::shader::assemble_shader;
use crate::frame::MeterUniforms;
use crate::meter::MeterConfig;

/// Render pipeline with its uniform binding, built for one configuration.
///
/// Feature flags are baked into the shader source, so toggling a flag means
/// building a new pipeline; the uniform layout never changes.
pub struct MeterPipeline {
    pub pipeline: RenderPipeline,
    pub bind_group_layout: BindGroupLayout,
    pub uniform_buffer: Buffer,
    config: MeterConfig,
}

impl MeterPipeline {
    /// Create a pipeline for the given target format and configuration.
    pub fn new(device: &Device, format: TextureFormat, config: MeterConfig) -> Self {
        let source = assemble_shader(&config);
        log::debug!(
            "building meter pipeline: variant={} features={:?}",
            config.variant.name(),
            config.features
        );

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("meter_shader"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("meter_bind_group_layout"),
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

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("meter_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("meter_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("meter_uniforms"),
            size: std::mem::size_of::<MeterUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            pipeline,
            bind_group_layout,
            uniform_buffer,
            config,
        }
    }

    /// Create the bind group exposing the uniform buffer at binding 0.
    pub fn create_bind_group(&self, device: &Device) -> BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("meter_bind_group"),
            layout: &self.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: self.uniform_buffer.as_entire_binding(),
            }],
        })
    }

    /// Issue the fixed draws for this configuration's variant.
    ///
    /// Triangle is one strip of three; the meter is two strips of four, one
    /// per bar, matching the table ordering.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        match self.config.vertex_count() {
            3 => render_pass.draw(0..3, 0..1),
            _ => {
                render_pass.draw(0..4, 0..1);
                render_pass.draw(4..8, 0..1);
            }
        }
    }

    pub fn config(&self) -> &MeterConfig {
        &self.config
    }
}
