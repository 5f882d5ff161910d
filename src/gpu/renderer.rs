//! Headless meter renderer.

use std::path::Path;

use super::{
    context::{GpuContext, GpuError, GpuPreferences},
    pipeline::MeterPipeline,
};
use crate::frame::{FrameError, FrameInput};
use crate::meter::MeterConfig;
use serde::{Deserialize, Serialize};
use wgpu::{BindGroup, Texture, TextureDescriptor, TextureView};

/// Errors from rendering or snapshotting a frame.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("frame rejected: {0}")]
    Frame(#[from] FrameError),
    #[error("frame screen size {got} does not match render target {expected}")]
    ScreenSizeMismatch { expected: u32, got: u32 },
    #[error("device poll failed during readback: {0}")]
    Poll(#[from] wgpu::PollError),
    #[error("readback mapping failed: {0}")]
    Map(#[from] wgpu::BufferAsyncError),
    #[error("readback channel closed before mapping completed")]
    MapLost,
    #[error("image encode failed: {0}")]
    Image(#[from] image::ImageError),
}

/// Configuration for headless rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub background: [f32; 3],
    pub meter: MeterConfig,
    #[serde(default)]
    pub gpu: GpuPreferences,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            background: [0.0, 0.0, 0.0],
            meter: MeterConfig::audio_reactive(),
            gpu: GpuPreferences::default(),
        }
    }
}

/// Headless meter renderer: render-to-texture plus pixel readback.
pub struct MeterRenderer {
    ctx: GpuContext,
    pipeline: MeterPipeline,
    bind_group: BindGroup,
    render_texture: Texture,
    render_view: TextureView,
    options: RenderOptions,
}

impl MeterRenderer {
    /// Create a new renderer with the given options.
    pub async fn new(options: RenderOptions) -> Result<Self, GpuError> {
        let ctx = GpuContext::new(options.gpu).await?;
        let format = wgpu::TextureFormat::Rgba8Unorm;

        let pipeline = MeterPipeline::new(&ctx.device, format, options.meter);
        let bind_group = pipeline.create_bind_group(&ctx.device);

        let render_texture = ctx.device.create_texture(&TextureDescriptor {
            label: Some("meter_render_target"),
            size: wgpu::Extent3d {
                width: options.width,
                height: options.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });

        let render_view = render_texture.create_view(&wgpu::TextureViewDescriptor::default());

        Ok(Self {
            ctx,
            pipeline,
            bind_group,
            render_texture,
            render_view,
            options,
        })
    }

    /// Render one frame from the given host snapshot.
    ///
    /// The snapshot's `screen_size` must match the render target so the
    /// fragment fade denominators agree with the actual framebuffer.
    /// Returns tightly packed RGBA pixel data.
    pub fn render_frame(&self, input: &FrameInput) -> Result<Vec<u8>, RenderError> {
        let uniforms = input.to_uniforms()?;
        if uniforms.screen_size[0] as u32 != self.options.width {
            return Err(RenderError::ScreenSizeMismatch {
                expected: self.options.width,
                got: uniforms.screen_size[0] as u32,
            });
        }
        if uniforms.screen_size[1] as u32 != self.options.height {
            return Err(RenderError::ScreenSizeMismatch {
                expected: self.options.height,
                got: uniforms.screen_size[1] as u32,
            });
        }

        // Write-then-submit: the record is fully uploaded before the draw.
        self.ctx.queue.write_buffer(
            &self.pipeline.uniform_buffer,
            0,
            bytemuck::bytes_of(&uniforms),
        );

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("meter_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("meter_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.render_view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: self.options.background[0] as f64,
                            g: self.options.background[1] as f64,
                            b: self.options.background[2] as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            self.pipeline.draw(&mut render_pass);
        }

        // Copy texture to buffer for readback
        let bytes_per_pixel = 4u32;
        let unpadded_row_bytes = self.options.width * bytes_per_pixel;
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let padded_row_bytes = unpadded_row_bytes.div_ceil(align) * align;
        let buffer_size = (padded_row_bytes * self.options.height) as u64;

        let readback_buffer = self.ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("meter_readback"),
            size: buffer_size,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.render_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &readback_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row_bytes),
                    rows_per_image: Some(self.options.height),
                },
            },
            wgpu::Extent3d {
                width: self.options.width,
                height: self.options.height,
                depth_or_array_layers: 1,
            },
        );

        self.ctx.queue.submit(std::iter::once(encoder.finish()));

        // Read back pixels. Mapping and poll fail on device loss; both
        // surface as RenderError instead of unwinding through the host.
        let buffer_slice = readback_buffer.slice(..);
        let (sender, receiver) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        self.ctx.device.poll(wgpu::PollType::wait_indefinitely())?;
        receiver.recv().map_err(|_| RenderError::MapLost)??;

        let data = buffer_slice.get_mapped_range();

        // Remove row padding if present
        let mut pixels =
            Vec::with_capacity((self.options.width * self.options.height * 4) as usize);
        for row in 0..self.options.height {
            let start = (row * padded_row_bytes) as usize;
            let end = start + unpadded_row_bytes as usize;
            pixels.extend_from_slice(&data[start..end]);
        }

        Ok(pixels)
    }

    /// Render one frame and write it as a PNG snapshot.
    pub fn render_png<P: AsRef<Path>>(
        &self,
        input: &FrameInput,
        path: P,
    ) -> Result<(), RenderError> {
        let pixels = self.render_frame(input)?;
        let image =
            image::RgbaImage::from_raw(self.options.width, self.options.height, pixels)
                .ok_or_else(|| {
                    image::ImageError::Parameter(image::error::ParameterError::from_kind(
                        image::error::ParameterErrorKind::DimensionMismatch,
                    ))
                })?;
        image.save(path)?;
        Ok(())
    }

    /// Get the render options.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Get GPU adapter info.
    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.ctx.adapter_info()
    }
}
