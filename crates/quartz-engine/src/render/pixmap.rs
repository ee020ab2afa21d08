use std::collections::HashSet;
use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::coords::Vec2;
use crate::raster::Pixmap;
use crate::render::{RenderCtx, RenderTarget};

/// One pixmap to composite, placed at `origin` (physical pixels).
#[derive(Debug, Copy, Clone)]
pub struct PixmapLayer<'a> {
    pub pixmap: &'a Pixmap,
    pub origin: Vec2,
}

/// Uploads pixmaps into textures and draws each as a 1:1 textured quad.
///
/// Layers are composited in slice order with premultiplied-alpha blending.
/// GPU resources per layer slot are reused across frames and recreated only
/// when the pixmap dimensions change.
#[derive(Default)]
pub struct PixmapRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    sampler: Option<wgpu::Sampler>,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,

    slots: Vec<Option<LayerSlot>>,
    /// Oversized layer sizes already warned about.
    oversized: HashSet<(u32, u32)>,
}

struct LayerSlot {
    size: (u32, u32),
    texture: wgpu::Texture,
    uniform: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl PixmapRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        layers: &[PixmapLayer<'_>],
    ) {
        self.ensure_pipeline(ctx);
        self.ensure_static_buffers(ctx);

        // Slots are keyed by layer index; skipped layers keep an empty slot.
        self.slots.resize_with(layers.len(), || None);

        let max_dim = ctx.device.limits().max_texture_dimension_2d;
        let plan = plan_layers(layers, max_dim);
        for &(w, h) in &plan.oversized {
            if self.oversized.insert((w, h)) {
                log::warn!("pixmap layer {w}x{h} exceeds the {max_dim}px texture limit; not drawn");
            }
        }

        let mut drawable = Vec::with_capacity(plan.drawable.len());
        for &(i, (w, h)) in &plan.drawable {
            let layer = &layers[i];
            self.ensure_slot(ctx, i, (w, h));
            let Some(slot) = self.slots.get(i).and_then(Option::as_ref) else { continue };

            ctx.queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &slot.texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                layer.pixmap.data(),
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * w),
                    rows_per_image: Some(h),
                },
                wgpu::Extent3d { width: w, height: h, depth_or_array_layers: 1 },
            );
            ctx.queue.write_buffer(
                &slot.uniform,
                0,
                bytemuck::bytes_of(&LayerUniform {
                    viewport: ctx.viewport.extent(),
                    origin: [layer.origin.x.round(), layer.origin.y.round()],
                    size: [w as f32, h as f32],
                    _pad: [0.0; 2],
                }),
            );
            drawable.push(i);
        }

        if drawable.is_empty() {
            return;
        }

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(quad_vbo) = self.quad_vbo.as_ref() else { return };
        let Some(quad_ibo) = self.quad_ibo.as_ref() else { return };

        let mut rpass = target.pass("quartz pixmap pass", None);

        rpass.set_pipeline(pipeline);
        rpass.set_vertex_buffer(0, quad_vbo.slice(..));
        rpass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
        for slot in drawable.iter().filter_map(|&i| self.slots[i].as_ref()) {
            rpass.set_bind_group(0, &slot.bind_group, &[]);
            rpass.draw_indexed(0..6, 0, 0..1);
        }
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("quartz pixmap shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/pixmap.wgsl").into()),
        });

        let bind_group_layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("quartz pixmap bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(std::mem::size_of::<LayerUniform>() as u64),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("quartz pixmap pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("quartz pixmap pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        // Pixmaps are drawn 1:1, so nearest sampling keeps them crisp.
        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("quartz pixmap sampler"),
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);
        self.sampler = Some(sampler);
        // Bind groups reference the old layout.
        self.slots.clear();
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad_vbo.is_some() && self.quad_ibo.is_some() {
            return;
        }
        self.quad_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quartz pixmap quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        self.quad_ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quartz pixmap quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }

    fn ensure_slot(&mut self, ctx: &RenderCtx<'_>, index: usize, size: (u32, u32)) {
        if self.slots.get(index).and_then(Option::as_ref).is_some_and(|s| s.size == size) {
            return;
        }
        let (Some(bgl), Some(sampler)) = (self.bind_group_layout.as_ref(), self.sampler.as_ref()) else {
            return;
        };

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("quartz pixmap texture"),
            size: wgpu::Extent3d { width: size.0, height: size.1, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let uniform = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("quartz pixmap layer ubo"),
            size: std::mem::size_of::<LayerUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("quartz pixmap bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: uniform.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::TextureView(&view) },
                wgpu::BindGroupEntry { binding: 2, resource: wgpu::BindingResource::Sampler(sampler) },
            ],
        });

        log::debug!("pixmap layer {index} texture {}x{}", size.0, size.1);
        if let Some(entry) = self.slots.get_mut(index) {
            *entry = Some(LayerSlot { size, texture, uniform, bind_group });
        }
    }
}

/// Which layers get a texture this frame.
#[derive(Debug, Default, PartialEq)]
struct LayerPlan {
    /// Layer index and pixel size, in paint order.
    drawable: Vec<(usize, (u32, u32))>,
    /// Sizes past the device's 2D texture limit.
    oversized: Vec<(u32, u32)>,
}

fn plan_layers(layers: &[PixmapLayer<'_>], max_dim: u32) -> LayerPlan {
    let mut plan = LayerPlan::default();
    for (i, layer) in layers.iter().enumerate() {
        let (w, h) = (layer.pixmap.width(), layer.pixmap.height());
        if w == 0 || h == 0 {
            continue;
        }
        if w > max_dim || h > max_dim {
            plan.oversized.push((w, h));
        } else {
            plan.drawable.push((i, (w, h)));
        }
    }
    plan
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Per-layer uniform (32 bytes):
///
///  offset  0  viewport [f32; 2]  physical surface size
///  offset  8  origin   [f32; 2]  layer top-left, physical px
///  offset 16  size     [f32; 2]  layer size, physical px
///  offset 24  _pad     [f32; 2]
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct LayerUniform {
    viewport: [f32; 2],
    origin: [f32; 2],
    size: [f32; 2],
    _pad: [f32; 2],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct QuadVertex {
    corner: [f32; 2], // 0..1
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { corner: [0.0, 0.0] },
    QuadVertex { corner: [1.0, 0.0] },
    QuadVertex { corner: [1.0, 1.0] },
    QuadVertex { corner: [0.0, 1.0] },
];

const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];
