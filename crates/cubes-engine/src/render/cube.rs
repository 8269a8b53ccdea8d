//! Two-cube renderer: one flat-colored cube, one textured cube, one draw each.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::assets::{TextureImage, TextureLoader};
use crate::render::shader::{validate_program, ProgramDesc, ShaderError};
use crate::render::texture::{self, CubeTexture};
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{mesh, Camera, CameraDesc, CubeScene, ObjectFrame};

const SHADER_SOURCE: &str = include_str!("shaders/cube.wgsl");

/// Vertex buffer slots; slot `n` feeds shader `@location(n)`.
const POSITION_SLOT: u32 = 0;
const COLOR_SLOT: u32 = 1;
const TEX_COORD_SLOT: u32 = 2;

const POSITION_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const COLOR_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x4];
const TEX_COORD_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32x2];

const ATTRIBUTE_LOCATIONS: [u32; 3] = [POSITION_SLOT, COLOR_SLOT, TEX_COORD_SLOT];

/// The embedded cube shader and the interface the pipeline binds to it.
pub fn cube_program() -> ProgramDesc<'static> {
    ProgramDesc {
        label: "cube",
        source: SHADER_SOURCE,
        vertex_entry: "vs_main",
        fragment_entry: "fs_main",
        attribute_locations: &ATTRIBUTE_LOCATIONS,
    }
}

/// Per-object uniform (group 0). Mirrors `ObjectUniform` in `cube.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ObjectUniform {
    mvp: [[f32; 4]; 4],
    use_texture: u32,
    _pad: [u32; 3], // 16-byte alignment
}

impl From<&ObjectFrame> for ObjectUniform {
    fn from(frame: &ObjectFrame) -> Self {
        Self {
            mvp: frame.mvp.to_cols_array_2d(),
            use_texture: frame.use_texture as u32,
            _pad: [0; 3],
        }
    }
}

/// One indexed draw of the cube mesh.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct DrawCall {
    /// Index into the scene's objects.
    object: usize,
}

/// CPU side of one frame, computed before any GPU work.
struct FramePlan {
    uniforms: [ObjectUniform; 2],
    draws: [DrawCall; 2],
    /// Image that arrived this frame and fits the device.
    texture: Option<TextureImage>,
}

/// Polls the loader and computes per-object uniforms and draws for `elapsed`.
///
/// Never waits: a pending texture leaves `texture` empty and both cubes are
/// still drawn. Images larger than `limits` allow are dropped with a warning.
fn plan_frame(
    scene: &mut CubeScene,
    loader: &mut TextureLoader,
    limits: &wgpu::Limits,
    elapsed: f32,
) -> FramePlan {
    let texture = loader.poll().filter(|image| {
        let fits = texture::fits_limits(image, limits);
        if !fits {
            log::warn!(
                "texture is {}x{}, device maximum is {}; textured cube keeps its placeholder",
                image.width(),
                image.height(),
                limits.max_texture_dimension_2d
            );
        }
        fits
    });

    let frames = scene.frame(elapsed);
    let uniforms = frames.each_ref().map(ObjectUniform::from);

    let draws = std::array::from_fn(|object| DrawCall { object });

    FramePlan { uniforms, draws, texture }
}

/// GPU resources owned by one cube.
struct GpuObject {
    color_vbo: wgpu::Buffer,
    uniform_ubo: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Renders the [`CubeScene`].
///
/// All GPU resources are created in [`CubeRenderer::new`]; the per-frame work
/// is two uniform writes and two indexed draws. The only resource that changes
/// after construction is the texture, once its background load completes.
pub struct CubeRenderer {
    scene: CubeScene,
    pipeline: wgpu::RenderPipeline,

    // Shared mesh.
    position_vbo: wgpu::Buffer,
    tex_coord_vbo: wgpu::Buffer,
    ibo: wgpu::Buffer,

    objects: [GpuObject; 2],

    texture: CubeTexture,
    texture_loader: TextureLoader,
    texture_bgl: wgpu::BindGroupLayout,
    texture_bind_group: wgpu::BindGroup,
    texture_bind_group_generation: u64,
}

impl CubeRenderer {
    /// Validates the shader and builds every GPU resource.
    ///
    /// The camera's aspect ratio is taken from `ctx.viewport` and kept for the
    /// renderer's lifetime.
    pub fn new(ctx: &RenderCtx<'_>, texture_loader: TextureLoader) -> Result<Self, ShaderError> {
        let program = cube_program();
        validate_program(&program)?;

        let aspect = ctx.viewport.aspect().unwrap_or(1.0);
        let scene = CubeScene::new(Camera::new(CameraDesc::default(), aspect));

        let object_bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("cubes object bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<ObjectUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let texture_bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("cubes texture bgl"),
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

        let pipeline = create_pipeline(ctx, program.source, &object_bgl, &texture_bgl);

        let position_vbo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cubes position vbo"),
            contents: bytemuck::cast_slice(&mesh::POSITIONS),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let tex_coord_vbo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cubes tex coord vbo"),
            contents: bytemuck::cast_slice(&mesh::TEX_COORDS),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let ibo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cubes ibo"),
            contents: bytemuck::cast_slice(&mesh::INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        let objects = scene.objects().each_ref().map(|obj| {
            let color_vbo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(obj.label),
                contents: bytemuck::cast_slice(&obj.colors),
                usage: wgpu::BufferUsages::VERTEX,
            });

            let uniform_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("cubes object ubo"),
                size: std::mem::size_of::<ObjectUniform>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });

            let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("cubes object bind group"),
                layout: &object_bgl,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_ubo.as_entire_binding(),
                }],
            });

            GpuObject { color_vbo, uniform_ubo, bind_group }
        });

        let texture = CubeTexture::placeholder(ctx.device, ctx.queue);
        let texture_bind_group = create_texture_bind_group(ctx.device, &texture_bgl, &texture);
        let texture_bind_group_generation = texture.generation();

        log::info!("cube renderer ready ({} indices per cube)", mesh::INDEX_COUNT);

        Ok(Self {
            scene,
            pipeline,
            position_vbo,
            tex_coord_vbo,
            ibo,
            objects,
            texture,
            texture_loader,
            texture_bgl,
            texture_bind_group,
            texture_bind_group_generation,
        })
    }

    /// Draws both cubes for `elapsed` seconds into `target`.
    ///
    /// The target is expected to be cleared already (color and depth). Never
    /// waits on the texture: until it has loaded, the textured cube samples the
    /// black placeholder.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, elapsed: f32) {
        let plan = plan_frame(
            &mut self.scene,
            &mut self.texture_loader,
            &ctx.device.limits(),
            elapsed,
        );

        if let Some(image) = &plan.texture {
            self.texture.upload(ctx.device, ctx.queue, image);
        }
        self.sync_texture_bind_group(ctx.device);

        for (object, uniform) in self.objects.iter().zip(&plan.uniforms) {
            ctx.queue.write_buffer(&object.uniform_ubo, 0, bytemuck::bytes_of(uniform));
        }

        if !ctx.viewport.is_valid() {
            return;
        }

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("cubes pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: target.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_viewport(0.0, 0.0, ctx.viewport.width, ctx.viewport.height, 0.0, 1.0);
        rpass.set_pipeline(&self.pipeline);
        rpass.set_vertex_buffer(POSITION_SLOT, self.position_vbo.slice(..));
        // The flat cube ignores texture coordinates, but every declared
        // attribute needs a bound buffer.
        rpass.set_vertex_buffer(TEX_COORD_SLOT, self.tex_coord_vbo.slice(..));
        rpass.set_index_buffer(self.ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.set_bind_group(1, &self.texture_bind_group, &[]);

        for draw in &plan.draws {
            let object = &self.objects[draw.object];
            rpass.set_bind_group(0, &object.bind_group, &[]);
            rpass.set_vertex_buffer(COLOR_SLOT, object.color_vbo.slice(..));
            rpass.draw_indexed(0..mesh::INDEX_COUNT as u32, 0, 0..1);
        }
    }

    /// Rebuilds the texture bind group after an upload.
    fn sync_texture_bind_group(&mut self, device: &wgpu::Device) {
        if self.texture_bind_group_generation != self.texture.generation() {
            self.texture_bind_group =
                create_texture_bind_group(device, &self.texture_bgl, &self.texture);
            self.texture_bind_group_generation = self.texture.generation();
        }
    }
}

fn vertex_layout(stride: usize, attributes: &[wgpu::VertexAttribute]) -> wgpu::VertexBufferLayout<'_> {
    wgpu::VertexBufferLayout {
        array_stride: stride as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes,
    }
}

fn create_pipeline(
    ctx: &RenderCtx<'_>,
    source: &str,
    object_bgl: &wgpu::BindGroupLayout,
    texture_bgl: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("cubes shader"),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("cubes pipeline layout"),
        bind_group_layouts: &[object_bgl, texture_bgl],
        immediate_size: 0,
    });

    // Order must match the *_SLOT constants.
    let buffers = [
        vertex_layout(std::mem::size_of::<[f32; 3]>(), &POSITION_ATTRS),
        vertex_layout(std::mem::size_of::<[f32; 4]>(), &COLOR_ATTRS),
        vertex_layout(std::mem::size_of::<[f32; 2]>(), &TEX_COORD_ATTRS),
    ];

    ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("cubes pipeline"),
        layout: Some(&pipeline_layout),

        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &buffers,
        },

        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: ctx.surface_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: Some(wgpu::DepthStencilState {
            format: ctx.depth_format,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),

        multiview_mask: None,
        cache: None,
    })
}

fn create_texture_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    texture: &CubeTexture,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("cubes texture bind group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(texture.view()),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(texture.sampler()),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;

    #[test]
    fn embedded_shader_validates() {
        validate_program(&cube_program()).unwrap();
    }

    #[test]
    fn object_uniform_matches_wgsl_layout() {
        // mat4x4<f32> (64) + u32 + 3 x u32 padding, 16-byte aligned.
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 80);
    }

    #[test]
    fn object_uniform_encodes_flag_and_columns() {
        let frame = ObjectFrame {
            model: Mat4::IDENTITY,
            mvp: Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0)),
            use_texture: true,
        };
        let u = ObjectUniform::from(&frame);
        assert_eq!(u.use_texture, 1);
        assert_eq!(u.mvp[3], [1.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    fn vertex_layouts_cover_shader_inputs() {
        assert_eq!(POSITION_ATTRS[0].shader_location, POSITION_SLOT);
        assert_eq!(COLOR_ATTRS[0].shader_location, COLOR_SLOT);
        assert_eq!(TEX_COORD_ATTRS[0].shader_location, TEX_COORD_SLOT);
    }

    // ── frame planning ────────────────────────────────────────────────────

    fn scene() -> CubeScene {
        CubeScene::new(Camera::new(CameraDesc::default(), 4.0 / 3.0))
    }

    #[test]
    fn both_cubes_drawn_while_texture_pending() {
        let (mut loader, _tx) = TextureLoader::pending();
        let plan = plan_frame(&mut scene(), &mut loader, &wgpu::Limits::default(), 1.5);

        assert!(plan.texture.is_none());
        assert_eq!(plan.draws, [DrawCall { object: 0 }, DrawCall { object: 1 }]);
        let flags = plan.draws.map(|d| plan.uniforms[d.object].use_texture);
        assert_eq!(flags, [0, 1]);
        assert_eq!(loader.state(), crate::assets::LoadState::Pending);
    }

    #[test]
    fn uniforms_follow_scene_frame() {
        let (mut loader, _tx) = TextureLoader::pending();
        let mut s = scene();
        let plan = plan_frame(&mut s, &mut loader, &wgpu::Limits::default(), 0.75);
        let frames = s.frame(0.75);
        assert_eq!(plan.uniforms[0].mvp, frames[0].mvp.to_cols_array_2d());
        assert_eq!(plan.uniforms[1].mvp, frames[1].mvp.to_cols_array_2d());
    }

    #[test]
    fn loaded_texture_is_handed_to_upload() {
        let (mut loader, tx) = TextureLoader::pending();
        let img = TextureImage::from_rgba(2, 1, vec![255; 8]).unwrap();
        tx.send(Ok(img.clone())).unwrap();

        let plan = plan_frame(&mut scene(), &mut loader, &wgpu::Limits::default(), 0.0);
        assert_eq!(plan.texture, Some(img));
    }

    #[test]
    fn oversized_texture_keeps_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        let limits = wgpu::Limits::default();
        let width = limits.max_texture_dimension_2d + 1;
        image::RgbaImage::from_pixel(width, 1, image::Rgba([0, 0, 255, 255]))
            .save(&path)
            .unwrap();

        let (mut loader, tx) = TextureLoader::pending();
        tx.send(TextureImage::load(&path)).unwrap();

        let plan = plan_frame(&mut scene(), &mut loader, &limits, 0.0);
        assert!(plan.texture.is_none());
        assert_eq!(plan.draws.len(), 2);
        assert_eq!(loader.state(), crate::assets::LoadState::Ready);
    }

    #[test]
    fn attribute_arrays_have_one_entry_per_vertex() {
        let colors = mesh::flat_colors();
        assert_eq!(bytemuck::cast_slice::<_, f32>(&mesh::POSITIONS).len(), mesh::VERTEX_COUNT * 3);
        assert_eq!(bytemuck::cast_slice::<_, f32>(&colors).len(), mesh::VERTEX_COUNT * 4);
        assert_eq!(bytemuck::cast_slice::<_, f32>(&mesh::TEX_COORDS).len(), mesh::VERTEX_COUNT * 2);
    }
}
