//! Scene rendering
//!
//! Flattens the retained scene into point instances and line vertices each
//! frame, then draws both with one render pass.

use crate::scene::{Primitive, Scene};
use common::{create_uniform_buffer, Camera3D, CameraUniform, GraphicsContext};
use wgpu::util::DeviceExt;

/// Instance data for one camera-facing point
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointInstance {
    pub position: [f32; 3],
    pub size: f32,
    pub color: [f32; 4],
}

impl PointInstance {
    const ATTRIBS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        2 => Float32x3,  // position
        3 => Float32,    // size
        4 => Float32x4,  // color
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PointInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Quad vertex for billboards
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
}

impl QuadVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

const QUAD_VERTICES: &[QuadVertex] = &[
    QuadVertex { position: [-1.0, -1.0] },
    QuadVertex { position: [1.0, -1.0] },
    QuadVertex { position: [1.0, 1.0] },
    QuadVertex { position: [-1.0, -1.0] },
    QuadVertex { position: [1.0, 1.0] },
    QuadVertex { position: [-1.0, 1.0] },
];

/// Line vertex; consecutive pairs form one segment
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl LineVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x4,
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// CPU-side draw data for one frame
#[derive(Debug, Default)]
pub struct FrameBatch {
    pub points: Vec<PointInstance>,
    pub lines: Vec<LineVertex>,
    /// Set when the scene held more than the buffers can take
    pub truncated: bool,
}

impl FrameBatch {
    /// Collect every visible drawable. Hidden slots (zero size or alpha) are
    /// skipped; colors are scaled by the scene's illumination.
    pub fn from_scene(scene: &Scene, max_points: usize, max_line_vertices: usize) -> Self {
        let mut batch = FrameBatch::default();
        let light = scene.illumination().clamp(0.0, 1.5);

        for (_, object) in scene.objects() {
            let Some(geometry) = object.geometry() else { continue };
            if !object.visible || object.opacity <= 0.0 {
                continue;
            }
            let matrix = object.transform.matrix();
            let shade = |c: [f32; 4]| {
                [
                    (c[0] * light).min(1.0),
                    (c[1] * light).min(1.0),
                    (c[2] * light).min(1.0),
                    c[3] * object.opacity,
                ]
            };

            match geometry.primitive() {
                Primitive::Points => {
                    let size_scale = object.transform.scale.max_element();
                    for ((p, c), s) in geometry
                        .positions()
                        .iter()
                        .zip(geometry.colors())
                        .zip(geometry.sizes())
                    {
                        if *s <= 0.0 || c[3] <= 0.0 {
                            continue;
                        }
                        if batch.points.len() >= max_points {
                            batch.truncated = true;
                            break;
                        }
                        batch.points.push(PointInstance {
                            position: matrix.transform_point3(*p).to_array(),
                            size: s * size_scale,
                            color: shade(*c),
                        });
                    }
                }
                Primitive::Lines => {
                    let positions = geometry.positions();
                    let colors = geometry.colors();
                    for [a, b] in geometry.edges() {
                        let (a, b) = (*a as usize, *b as usize);
                        if colors[a][3] <= 0.0 && colors[b][3] <= 0.0 {
                            continue;
                        }
                        if batch.lines.len() + 2 > max_line_vertices {
                            batch.truncated = true;
                            break;
                        }
                        for i in [a, b] {
                            batch.lines.push(LineVertex {
                                position: matrix.transform_point3(positions[i]).to_array(),
                                color: shade(colors[i]),
                            });
                        }
                    }
                }
            }
        }
        batch
    }
}

/// Renderer for points and lines of a [`Scene`]
pub struct SceneRenderer {
    point_pipeline: wgpu::RenderPipeline,
    quad_buffer: wgpu::Buffer,
    point_buffer: wgpu::Buffer,
    max_points: usize,

    line_pipeline: wgpu::RenderPipeline,
    line_buffer: wgpu::Buffer,
    max_line_vertices: usize,

    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,

    point_count: u32,
    line_vertex_count: u32,
    warned_truncation: bool,
}

impl SceneRenderer {
    pub fn new(
        ctx: &GraphicsContext,
        camera: &Camera3D,
        max_points: usize,
        max_lines: usize,
    ) -> Self {
        let device = &ctx.device;
        let max_line_vertices = max_lines * 2;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
        });

        let camera_buffer =
            create_uniform_buffer(device, "Camera Buffer", &CameraUniform::from_camera_3d(camera));

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
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

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout],
            push_constant_ranges: &[],
        });

        let blend = wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent::OVER,
        };

        let point_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Point Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_point",
                buffers: &[QuadVertex::layout(), PointInstance::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_point",
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.config.format,
                    blend: Some(blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
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
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        let line_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Line Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_line",
                buffers: &[LineVertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_line",
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.config.format,
                    blend: Some(blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        let quad_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Quad Buffer"),
            contents: bytemuck::cast_slice(QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let point_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Point Instance Buffer"),
            size: (std::mem::size_of::<PointInstance>() * max_points) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let line_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Line Buffer"),
            size: (std::mem::size_of::<LineVertex>() * max_line_vertices) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            point_pipeline,
            quad_buffer,
            point_buffer,
            max_points,
            line_pipeline,
            line_buffer,
            max_line_vertices,
            camera_buffer,
            camera_bind_group,
            point_count: 0,
            line_vertex_count: 0,
            warned_truncation: false,
        }
    }

    pub fn update_camera(&self, queue: &wgpu::Queue, camera: &Camera3D) {
        let uniform = CameraUniform::from_camera_3d(camera);
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    /// Upload this frame's scene contents
    pub fn prepare(&mut self, queue: &wgpu::Queue, scene: &Scene) {
        let batch = FrameBatch::from_scene(scene, self.max_points, self.max_line_vertices);
        if batch.truncated && !self.warned_truncation {
            log::warn!(
                "scene exceeds render buffers ({} points, {} line vertices); \
                 raise --max-points/--max-lines",
                self.max_points,
                self.max_line_vertices
            );
            self.warned_truncation = true;
        }
        if !batch.points.is_empty() {
            queue.write_buffer(&self.point_buffer, 0, bytemuck::cast_slice(&batch.points));
        }
        if !batch.lines.is_empty() {
            queue.write_buffer(&self.line_buffer, 0, bytemuck::cast_slice(&batch.lines));
        }
        self.point_count = batch.points.len() as u32;
        self.line_vertex_count = batch.lines.len() as u32;
    }

    /// Clear the target and draw lines, then points on top
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: 0.02,
                        g: 0.02,
                        b: 0.08,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);

        if self.line_vertex_count > 0 {
            render_pass.set_pipeline(&self.line_pipeline);
            render_pass.set_vertex_buffer(0, self.line_buffer.slice(..));
            render_pass.draw(0..self.line_vertex_count, 0..1);
        }

        if self.point_count > 0 {
            render_pass.set_pipeline(&self.point_pipeline);
            render_pass.set_vertex_buffer(0, self.quad_buffer.slice(..));
            render_pass.set_vertex_buffer(1, self.point_buffer.slice(..));
            render_pass.draw(0..6, 0..self.point_count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::WHITE;
    use crate::scene::{Geometry, Light, Transform};
    use glam::Vec3;

    fn lit_scene() -> Scene {
        let mut scene = Scene::new();
        scene.add_light("ambient", Light::ambient(1.0));
        scene
    }

    #[test]
    fn hidden_objects_and_slots_are_skipped() {
        let mut scene = lit_scene();
        let mut points = Geometry::points(3, WHITE, 0.1);
        points.sizes_mut()[1] = 0.0;
        scene.add("points", points);
        let hidden = scene.add("hidden", Geometry::points(5, WHITE, 0.1));
        scene.set_visible(hidden, false);

        let batch = FrameBatch::from_scene(&scene, 100, 100);
        assert_eq!(batch.points.len(), 2);
        assert!(!batch.truncated);
    }

    #[test]
    fn transforms_and_opacity_apply() {
        let mut scene = lit_scene();
        let id = scene.add("p", Geometry::points_at(vec![Vec3::X], WHITE, 0.1));
        scene.set_transform(id, Transform::at(Vec3::new(0.0, 2.0, 0.0)));
        scene.set_opacity(id, 0.5);

        let batch = FrameBatch::from_scene(&scene, 100, 100);
        assert_eq!(batch.points[0].position, [1.0, 2.0, 0.0]);
        assert_eq!(batch.points[0].color[3], 0.5);
    }

    #[test]
    fn lines_emit_vertex_pairs_and_truncate() {
        let mut scene = lit_scene();
        scene.add(
            "strip",
            Geometry::line_strip(vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z], WHITE),
        );
        let batch = FrameBatch::from_scene(&scene, 10, 100);
        assert_eq!(batch.lines.len(), 6);

        let batch = FrameBatch::from_scene(&scene, 10, 4);
        assert_eq!(batch.lines.len(), 4);
        assert!(batch.truncated);
    }

    #[test]
    fn unlit_scene_is_dark() {
        let mut scene = Scene::new();
        scene.add("p", Geometry::points(1, WHITE, 0.1));
        let batch = FrameBatch::from_scene(&scene, 10, 10);
        assert_eq!(&batch.points[0].color[..3], &[0.0, 0.0, 0.0]);
    }
}
