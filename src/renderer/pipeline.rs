//! WebGPU presentation of canvas-space triangle lists
//!
//! The scene is rebuilt every frame but its size is bounded, so one vertex
//! buffer lives for the whole session and is overwritten in place. It only
//! grows when a frame outgrows it.

use super::vertex::{Vertex, colors};
use crate::sim::Canvas;

/// Enough for the busiest scene (glow, trail, sparkles, dashed line) with room to spare
const INITIAL_VERTEX_CAPACITY: usize = 4096;

pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    /// Vertices `vertex_buffer` can hold
    capacity: usize,
    vertex_count: u32,
    /// NDC copy of the last frame, reused to avoid per-frame allocation
    staging: Vec<Vertex>,
    /// Surface size in pixels
    pub size: (u32, u32),
    /// Play area the scene is expressed in
    pub canvas: Canvas,
}

impl RenderState {
    /// Acquire a device and configure `surface` at the play area's pixel size
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        canvas: Canvas,
    ) -> Result<Self, wgpu::RequestDeviceError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("neon-arcade-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let caps = surface.get_capabilities(adapter);
        // Palette values are sRGB-encoded CSS colors, so write them unconverted
        let format = caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .unwrap_or(wgpu::TextureFormat::Bgra8Unorm);
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let size = surface_size(&canvas);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.0,
            height: size.1,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let pipeline = create_pipeline(&device, format);
        let vertex_buffer = create_vertex_buffer(&device, INITIAL_VERTEX_CAPACITY);

        log::info!("Renderer ready ({}x{}, {:?})", size.0, size.1, format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer,
            capacity: INITIAL_VERTEX_CAPACITY,
            vertex_count: 0,
            staging: Vec::with_capacity(INITIAL_VERTEX_CAPACITY),
            size,
            canvas,
        })
    }

    /// Reconfigure the surface, e.g. after it was lost
    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Draw one frame of canvas-space triangles over the background
    pub fn render(&mut self, vertices: &[Vertex]) -> Result<(), wgpu::SurfaceError> {
        self.upload(vertices);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if self.vertex_count > 0 {
                pass.set_pipeline(&self.pipeline);
                pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                pass.draw(0..self.vertex_count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    /// Map to NDC and overwrite the vertex buffer, growing it if needed
    fn upload(&mut self, vertices: &[Vertex]) {
        map_to_ndc(&self.canvas, vertices, &mut self.staging);

        let needed = grown_capacity(self.capacity, self.staging.len());
        if needed != self.capacity {
            log::debug!("Vertex buffer {} -> {} vertices", self.capacity, needed);
            self.vertex_buffer = create_vertex_buffer(&self.device, needed);
            self.capacity = needed;
        }

        if !self.staging.is_empty() {
            self.queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&self.staging));
        }
        self.vertex_count = self.staging.len() as u32;
    }
}

fn create_pipeline(device: &wgpu::Device, format: wgpu::TextureFormat) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("neon_shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("neon_layout"),
        bind_group_layouts: &[],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("neon_pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::desc()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                // Glows and trails are translucent
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        // Shapes wind both ways
        primitive: wgpu::PrimitiveState {
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

fn create_vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("scene_vertices"),
        size: (capacity * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn clear_color() -> wgpu::Color {
    let [r, g, b, a] = colors::BACKGROUND;
    wgpu::Color {
        r: r as f64,
        g: g as f64,
        b: b as f64,
        a: a as f64,
    }
}

/// Surface pixels for a play area, never zero
pub fn surface_size(canvas: &Canvas) -> (u32, u32) {
    (
        (canvas.width.round() as u32).max(1),
        (canvas.height.round() as u32).max(1),
    )
}

/// Buffer capacity able to hold `needed` vertices; doubles rather than tracking exact sizes
fn grown_capacity(current: usize, needed: usize) -> usize {
    if needed <= current {
        current
    } else {
        needed.next_power_of_two()
    }
}

/// Canvas pixels (origin top-left, y down) to normalized device coordinates
pub fn canvas_to_ndc(canvas: &Canvas, x: f32, y: f32) -> (f32, f32) {
    (x / canvas.width * 2.0 - 1.0, 1.0 - y / canvas.height * 2.0)
}

/// Replace `out` with `vertices` mapped into NDC
fn map_to_ndc(canvas: &Canvas, vertices: &[Vertex], out: &mut Vec<Vertex>) {
    out.clear();
    out.extend(vertices.iter().map(|v| {
        let (x, y) = canvas_to_ndc(canvas, v.position[0], v.position[1]);
        Vertex::new(x, y, v.color)
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::build_scene;
    use crate::settings::Settings;
    use crate::sim::GameState;
    use crate::tuning::Tuning;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_canvas_to_ndc_corners() {
        let canvas = Canvas::new(800.0, 600.0);
        assert_eq!(canvas_to_ndc(&canvas, 0.0, 0.0), (-1.0, 1.0));
        assert_eq!(canvas_to_ndc(&canvas, 800.0, 600.0), (1.0, -1.0));
        assert_eq!(canvas_to_ndc(&canvas, 400.0, 300.0), (0.0, 0.0));
    }

    #[test]
    fn test_map_to_ndc_reuses_staging() {
        let canvas = Canvas::new(800.0, 600.0);
        let mut staging = vec![Vertex::new(9.0, 9.0, [0.0; 4]); 10];
        let color = [0.2, 0.4, 0.6, 0.8];
        map_to_ndc(&canvas, &[Vertex::new(200.0, 450.0, color)], &mut staging);
        assert_eq!(staging, vec![Vertex::new(-0.5, -0.5, color)]);
    }

    #[test]
    fn test_capacity_only_grows_when_outgrown() {
        assert_eq!(grown_capacity(4096, 0), 4096);
        assert_eq!(grown_capacity(4096, 4096), 4096);
        assert_eq!(grown_capacity(4096, 4097), 8192);
    }

    #[test]
    fn test_busiest_scene_fits_initial_buffer() {
        let mut state = GameState::new(Canvas::default(), Tuning::default(), 3);
        for _ in 0..10 {
            state.ball.advance();
        }
        let mut rng = Pcg32::seed_from_u64(1);
        let vertices = build_scene(&state, &Settings::default(), &mut rng);
        assert!(vertices.len() <= INITIAL_VERTEX_CAPACITY);
    }

    #[test]
    fn test_surface_size_from_canvas() {
        assert_eq!(surface_size(&Canvas::new(800.0, 600.0)), (800, 600));
        assert_eq!(surface_size(&Canvas::new(0.0, 0.4)), (1, 1));
    }
}
