use std::time::{Duration, Instant};

use anyhow::Result;
use noisefield::FieldParams;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use tracing::debug;

use crate::shader::QUAD_VERTEX_COUNT;
use crate::types::Antialiasing;
use crate::uniforms::{FieldUniforms, Resolution, UniformState};

use super::context::GpuContext;
use super::pipeline::FieldPipeline;

pub(crate) struct GpuState {
    context: GpuContext,
    pipeline: FieldPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    multisample_target: Option<MultisampleTarget>,
    stats: FrameStats,
}

struct MultisampleTarget {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl MultisampleTarget {
    fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: Resolution,
        sample_count: u32,
    ) -> Self {
        let size = size.clamped();
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("msaa color target"),
            size: wgpu::Extent3d {
                width: size.width,
                height: size.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}

/// Rolling frames-per-second counter reported at debug level once a second.
struct FrameStats {
    last_update: Instant,
    frames_since_update: u32,
    frames_per_second: f32,
}

impl FrameStats {
    fn new(now: Instant) -> Self {
        Self {
            last_update: now,
            frames_since_update: 0,
            frames_per_second: 0.0,
        }
    }

    fn record(&mut self, now: Instant, uniforms: &UniformState) {
        self.frames_since_update += 1;
        let since_update = now.saturating_duration_since(self.last_update);
        if since_update >= Duration::from_secs(1) {
            self.frames_per_second =
                self.frames_since_update as f32 / since_update.as_secs_f32();
            self.frames_since_update = 0;
            self.last_update = now;
            debug!(
                fps = self.frames_per_second.round(),
                time = uniforms.elapsed(),
                width = uniforms.resolution().width,
                height = uniforms.resolution().height,
                "render stats"
            );
        }
    }
}

impl GpuState {
    pub(crate) fn new<T>(
        target: T,
        initial_size: Resolution,
        antialiasing: Antialiasing,
        params: &FieldParams,
    ) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle + Send + Sync + 'static,
    {
        let context = GpuContext::new(target, initial_size, antialiasing)?;
        let pipeline = FieldPipeline::new(
            &context.device,
            context.surface_format,
            context.sample_count,
            params,
        )?;

        let uniform_buffer = context.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("field uniform buffer"),
            size: std::mem::size_of::<FieldUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_bind_group = context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("field uniform bind group"),
                layout: &pipeline.uniform_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            });

        let multisample_target = (context.sample_count > 1).then(|| {
            MultisampleTarget::new(
                &context.device,
                context.surface_format,
                context.size,
                context.sample_count,
            )
        });

        Ok(Self {
            context,
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            multisample_target,
            stats: FrameStats::new(Instant::now()),
        })
    }

    pub(crate) fn is_software(&self) -> bool {
        self.context.is_software
    }

    pub(crate) fn resize(&mut self, new_size: Resolution) {
        if new_size.is_empty() {
            return;
        }
        self.context.resize(new_size);
        self.multisample_target = (self.context.sample_count > 1).then(|| {
            MultisampleTarget::new(
                &self.context.device,
                self.context.surface_format,
                self.context.size,
                self.context.sample_count,
            )
        });
    }

    /// Restores the swapchain after it was lost or became outdated.
    pub(crate) fn reconfigure(&mut self) {
        self.context.reconfigure();
    }

    /// Uploads `uniforms`, draws the quad and presents the frame.
    pub(crate) fn draw(&mut self, uniforms: &UniformState) -> Result<(), wgpu::SurfaceError> {
        let frame = self.context.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let block = FieldUniforms::from(uniforms);
        self.context
            .queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&block));

        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("field encoder"),
                });

        let (attachment_view, resolve_target) = match self.multisample_target.as_ref() {
            Some(msaa) => (&msaa.view, Some(&view)),
            None => (&view, None),
        };
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("field pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: attachment_view,
                    depth_slice: None,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(&self.pipeline.pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.draw(0..QUAD_VERTEX_COUNT, 0..1);
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        self.stats.record(Instant::now(), uniforms);
        Ok(())
    }
}
