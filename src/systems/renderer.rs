use std::error::Error;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{error, warn};
use rustc_hash::FxHasher;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::collision::BoundPrimitive;
use crate::math::{Rect, Vector2};
use crate::systems::{DrawCall, DrawList};

#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    position: [f32; 2],
}

const SHAPE_QUAD: u32 = 0;
const SHAPE_CIRCLE: u32 = 1;

#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct QuadInstance {
    center: [f32; 2],
    half_size: [f32; 2],
    color: [f32; 4],
    shape: u32,
}

const QUAD_VERTICES: &[Vertex] = &[
    Vertex {
        position: [-1.0, -1.0],
    },
    Vertex {
        position: [1.0, -1.0],
    },
    Vertex {
        position: [1.0, 1.0],
    },
    Vertex {
        position: [-1.0, -1.0],
    },
    Vertex {
        position: [1.0, 1.0],
    },
    Vertex {
        position: [-1.0, 1.0],
    },
];

const INITIAL_INSTANCE_CAPACITY: usize = 128;
const DEBUG_RECT_COLOR: [f32; 4] = [1.0, 0.2, 0.2, 0.35];
const DEBUG_CIRCLE_COLOR: [f32; 4] = [0.2, 1.0, 0.4, 0.35];
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.55,
    g: 0.7,
    b: 0.85,
    a: 1.0,
};

pub struct FrameStats {
    pub last_present: Instant,
    pub frame_time_accum: Duration,
    pub frame_count: u32,
    pub avg_frame_time_ms: f32,
    pub present_fps: u32,

    pub sim_steps_accum: u32,
    pub sim_tps: u32,

    pub render_count: u32,
    pub render_fps: u32,
    pub sprites_drawn: usize,

    pub last_report: Instant,
    pub report_dt: Duration,
}

impl FrameStats {
    pub fn new(now: Instant) -> Self {
        Self {
            last_present: now,
            frame_time_accum: Duration::ZERO,
            frame_count: 0,
            avg_frame_time_ms: 0.0,
            present_fps: 0,
            sim_steps_accum: 0,
            sim_tps: 0,
            render_count: 0,
            render_fps: 0,
            sprites_drawn: 0,
            last_report: now,
            report_dt: Duration::from_secs(1),
        }
    }

    pub fn needs_update(&self) -> bool {
        Instant::now() - self.last_report >= self.report_dt
    }

    pub fn update(&mut self) {
        let now = Instant::now();
        let secs = (now - self.last_report).as_secs_f32();

        if self.frame_count > 0 {
            let avg_dt = self.frame_time_accum.as_secs_f32() / self.frame_count as f32;
            self.avg_frame_time_ms = avg_dt * 1000.0;
            self.present_fps = (1.0 / avg_dt).round() as u32;
        }

        self.sim_tps = (self.sim_steps_accum as f32 / secs).round() as u32;
        self.render_fps = (self.render_count as f32 / secs).round() as u32;

        self.frame_time_accum = Duration::ZERO;
        self.frame_count = 0;
        self.sim_steps_accum = 0;
        self.render_count = 0;
        self.last_report = now;
    }

    pub fn record_frame(&mut self, dt: Duration) {
        self.frame_time_accum += dt;
        self.frame_count += 1;
    }
}

/// Maps logical game pixels (origin top-left, y down) to clip space.
#[derive(Clone, Copy, Debug, PartialEq)]
struct ScreenMapping {
    width: f32,
    height: f32,
}

impl ScreenMapping {
    fn quad(&self, rect: &Rect, color: [f32; 4], shape: u32) -> QuadInstance {
        let center = rect.center();
        QuadInstance {
            center: [
                center.x / self.width * 2.0 - 1.0,
                1.0 - center.y / self.height * 2.0,
            ],
            half_size: [rect.width / self.width, rect.height / self.height],
            color,
            shape,
        }
    }
}

/// Stand-in colour for a sheet region until textures are loaded.
fn sheet_color(call: &DrawCall) -> [f32; 4] {
    let mut hasher = FxHasher::default();
    call.sheet.hash(&mut hasher);
    (call.source.x as u32, call.source.y as u32).hash(&mut hasher);
    let bits = hasher.finish();
    let channel = |shift: u32| 0.25 + ((bits >> shift) & 0xff) as f32 / 255.0 * 0.7;
    [channel(0), channel(8), channel(16), call.alpha.clamp(0.0, 1.0)]
}

fn build_instances(
    mapping: ScreenMapping,
    draw_list: &DrawList,
    debug_bounds: &[BoundPrimitive],
) -> Vec<QuadInstance> {
    let mut instances: Vec<QuadInstance> = draw_list
        .calls()
        .iter()
        .map(|call| mapping.quad(&call.destination, sheet_color(call), SHAPE_QUAD))
        .collect();

    for bound in debug_bounds {
        let instance = match bound {
            BoundPrimitive::Rect(rect) => mapping.quad(rect, DEBUG_RECT_COLOR, SHAPE_QUAD),
            BoundPrimitive::Circle(circle) => {
                mapping.quad(&circle.bounding_rect(), DEBUG_CIRCLE_COLOR, SHAPE_CIRCLE)
            }
        };
        instances.push(instance);
    }
    instances
}

pub struct Renderer {
    pub window: Arc<Window>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    surface_format: wgpu::TextureFormat,
    size: winit::dpi::PhysicalSize<u32>,
    mapping: ScreenMapping,

    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,

    // Text rendering
    font_system: glyphon::FontSystem,
    swash_cache: glyphon::SwashCache,
    viewport: glyphon::Viewport,
    atlas: glyphon::TextAtlas,
    text_renderer: glyphon::TextRenderer,
    stats_buffer: glyphon::Buffer,
    hud_buffer: glyphon::Buffer,
    hud_text: String,

    pub frame_stats: FrameStats,
}

impl Renderer {
    /// `logical_size` is the game's pixel space; it is stretched over the window.
    pub async fn new(window: Arc<Window>, logical_size: Vector2) -> Result<Self, Box<dyn Error>> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions::default())
            .await?;
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await?;

        let size = window.inner_size();
        let surface = instance.create_surface(window.clone())?;
        let cap = surface.get_capabilities(&adapter);
        let surface_format = *cap
            .formats
            .first()
            .ok_or("surface reports no supported formats")?;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Sprite Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shader.wgsl").into()),
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Sprite Pipeline"),
            layout: None,
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![0 => Float32x2],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<QuadInstance>() as wgpu::BufferAddress,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            1 => Float32x2,
                            2 => Float32x2,
                            3 => Float32x4,
                            4 => Uint32,
                        ],
                    },
                ],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let instance_buffer = create_instance_buffer(&device, INITIAL_INSTANCE_CAPACITY);

        // Text rendering setup
        let mut font_system = glyphon::FontSystem::new();
        let swash_cache = glyphon::SwashCache::new();
        let cache = glyphon::Cache::new(&device);
        let viewport = glyphon::Viewport::new(&device, &cache);
        let mut atlas = glyphon::TextAtlas::new(&device, &queue, &cache, surface_format);
        let text_renderer = glyphon::TextRenderer::new(
            &mut atlas,
            &device,
            wgpu::MultisampleState::default(),
            None,
        );

        let stats_buffer = text_buffer(&mut font_system, 18.0, size, "FPS: --");
        let hud_buffer = text_buffer(&mut font_system, 28.0, size, "");

        let renderer = Self {
            window,
            device,
            queue,
            surface,
            surface_format,
            size,
            mapping: ScreenMapping {
                width: logical_size.x.max(1.0),
                height: logical_size.y.max(1.0),
            },
            render_pipeline,
            vertex_buffer,
            instance_buffer,
            instance_capacity: INITIAL_INSTANCE_CAPACITY,
            font_system,
            swash_cache,
            viewport,
            atlas,
            text_renderer,
            stats_buffer,
            hud_buffer,
            hud_text: String::new(),
            frame_stats: FrameStats::new(Instant::now()),
        };

        renderer.configure_surface();
        Ok(renderer)
    }

    fn configure_surface(&self) {
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: self.surface_format,
            view_formats: vec![self.surface_format.add_srgb_suffix()],
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            width: self.size.width.max(1),
            height: self.size.height.max(1),
            desired_maximum_frame_latency: 2,
            present_mode: wgpu::PresentMode::AutoVsync,
        };
        self.surface.configure(&self.device, &surface_config);
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.size = new_size;
        self.configure_surface();
        for buffer in [&mut self.stats_buffer, &mut self.hud_buffer] {
            buffer.set_size(
                &mut self.font_system,
                Some(new_size.width as f32),
                Some(new_size.height as f32),
            );
        }
    }

    pub fn update_stats_text(&mut self) {
        let s = format!(
            "Frame:   {:5.2} ms ({:3} fps)\nSim:     {:3} ticks/s\nRender:  {:3} fps\nSprites: {:3}",
            self.frame_stats.avg_frame_time_ms,
            self.frame_stats.present_fps,
            self.frame_stats.sim_tps,
            self.frame_stats.render_fps,
            self.frame_stats.sprites_drawn,
        );
        set_buffer_text(
            &mut self.stats_buffer,
            &mut self.font_system,
            &s,
            glyphon::Color::rgb(255, 255, 160),
        );
    }

    fn set_hud_text(&mut self, hud: &str) {
        if self.hud_text == hud {
            return;
        }
        self.hud_text = hud.to_string();
        set_buffer_text(
            &mut self.hud_buffer,
            &mut self.font_system,
            hud,
            glyphon::Color::rgb(255, 255, 255),
        );
    }

    fn ensure_instance_capacity(&mut self, needed: usize) {
        if needed <= self.instance_capacity {
            return;
        }
        self.instance_capacity = needed.next_power_of_two();
        self.instance_buffer = create_instance_buffer(&self.device, self.instance_capacity);
    }

    /// Draws one frame: sprite stand-ins in draw-list order, optional debug
    /// bounds on top, then the HUD line and frame stats.
    pub fn render(&mut self, draw_list: &DrawList, debug_bounds: &[BoundPrimitive], hud: &str) {
        self.frame_stats.render_count += 1;
        self.frame_stats.sprites_drawn = draw_list.len();

        let instances = build_instances(self.mapping, draw_list, debug_bounds);
        self.ensure_instance_capacity(instances.len());
        self.queue
            .write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));

        self.set_hud_text(hud);
        self.viewport.update(
            &self.queue,
            glyphon::Resolution {
                width: self.size.width,
                height: self.size.height,
            },
        );

        let (w, h) = self.stats_buffer.size();
        let stats_width = w.unwrap_or(0.0);
        let stats_height = h.unwrap_or(0.0);
        let margin = 12.0;
        let stats_left = (self.size.width as f32 - stats_width - margin)
            .max(margin)
            .round();
        let stats_top = (self.size.height as f32 - stats_height - margin)
            .max(margin)
            .round();

        let text_areas = [
            glyphon::TextArea {
                buffer: &self.hud_buffer,
                left: margin,
                top: margin,
                scale: 1.0,
                bounds: glyphon::TextBounds::default(),
                default_color: glyphon::Color::rgb(255, 255, 255),
                custom_glyphs: &[],
            },
            glyphon::TextArea {
                buffer: &self.stats_buffer,
                left: stats_left,
                top: stats_top,
                scale: 1.0,
                bounds: glyphon::TextBounds::default(),
                default_color: glyphon::Color::rgb(255, 255, 160),
                custom_glyphs: &[],
            },
        ];

        if let Err(err) = self.text_renderer.prepare(
            &self.device,
            &self.queue,
            &mut self.font_system,
            &mut self.atlas,
            &self.viewport,
            text_areas,
            &mut self.swash_cache,
        ) {
            error!("Failed to prepare text: {err}");
        }

        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(err) => {
                warn!("Skipping frame, surface unavailable: {err}");
                self.configure_surface();
                return;
            }
        };
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.device.create_command_encoder(&Default::default());

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: None,
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            render_pass.draw(0..6, 0..instances.len() as u32);

            if let Err(err) =
                self.text_renderer
                    .render(&mut self.atlas, &mut self.viewport, &mut render_pass)
            {
                error!("Failed to render text: {err}");
            }
        }

        self.queue.submit([encoder.finish()]);
        surface_texture.present();
        self.atlas.trim();

        let now = Instant::now();
        let dt = now - self.frame_stats.last_present;
        self.frame_stats.last_present = now;
        self.frame_stats.record_frame(dt);

        if self.frame_stats.needs_update() {
            self.frame_stats.update();
            self.update_stats_text();
        }
    }
}

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Instance Buffer"),
        size: (std::mem::size_of::<QuadInstance>() * capacity) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn text_buffer(
    font_system: &mut glyphon::FontSystem,
    font_size: f32,
    size: winit::dpi::PhysicalSize<u32>,
    initial: &str,
) -> glyphon::Buffer {
    let mut buffer =
        glyphon::Buffer::new(font_system, glyphon::Metrics::new(font_size, font_size * 1.35));
    buffer.set_size(
        font_system,
        Some(size.width as f32),
        Some(size.height as f32),
    );
    buffer.set_text(
        font_system,
        initial,
        &glyphon::Attrs::new().family(glyphon::Family::Monospace),
        glyphon::Shaping::Advanced,
        None,
    );
    buffer.shape_until_scroll(font_system, false);
    buffer
}

fn set_buffer_text(
    buffer: &mut glyphon::Buffer,
    font_system: &mut glyphon::FontSystem,
    text: &str,
    color: glyphon::Color,
) {
    buffer.set_text(
        font_system,
        text,
        &glyphon::Attrs::new()
            .family(glyphon::Family::Monospace)
            .color(color),
        glyphon::Shaping::Basic,
        None,
    );
    buffer.shape_until_scroll(font_system, false);
}
