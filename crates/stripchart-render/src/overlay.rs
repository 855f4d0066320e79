//! Solid-color overlay for the data curve.
//!
//! The curve is expanded CPU-side into a triangle list with constant
//! on-screen width, uploaded fresh every frame (the data changes every
//! frame, unlike the background layer), and drawn through a pipeline
//! that maps pixel coordinates to clip space.

use crate::context::GraphicsContext;
use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use std::sync::Arc;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct OverlayUniform {
    surface_size: [f32; 2],
    _padding: [f32; 2],
    color: [f32; 4],
}

/// Renders a CPU-expanded triangle list in pixel coordinates.
pub struct OverlayRenderer {
    context: Arc<GraphicsContext>,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    vertex_buffer: Option<wgpu::Buffer>,
    vertex_count: u32,
}

impl OverlayRenderer {
    /// Create a new overlay renderer targeting the given surface format.
    pub fn new(context: Arc<GraphicsContext>, target_format: wgpu::TextureFormat) -> Self {
        let uniform_buffer = context.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some("Overlay Uniform Buffer"),
            size: std::mem::size_of::<OverlayUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout =
            context
                .device()
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("Overlay Bind Group Layout"),
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

        let uniform_bind_group = context.device().create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Overlay Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let shader = context
            .device()
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("Overlay Shader"),
                source: wgpu::ShaderSource::Wgsl(include_str!("shaders/overlay.wgsl").into()),
            });

        let pipeline_layout =
            context
                .device()
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("Overlay Pipeline Layout"),
                    bind_group_layouts: &[&bind_group_layout],
                    push_constant_ranges: &[],
                });

        let pipeline = context
            .device()
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Overlay Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: 8,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![0 => Float32x2],
                    }],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: target_format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            });

        Self {
            context,
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            vertex_buffer: None,
            vertex_count: 0,
        }
    }

    /// Upload this frame's triangle list.
    ///
    /// The buffer is rebuilt every call; the curve changes every frame so
    /// nothing is gained by keeping the previous upload around.
    pub fn prepare(&mut self, vertices: &[[f32; 2]]) {
        if vertices.is_empty() {
            self.vertex_buffer = None;
            self.vertex_count = 0;
            return;
        }

        tracing::trace!("Uploading {} overlay vertices", vertices.len());

        self.vertex_buffer = Some(self.context.device().create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Overlay Vertex Buffer"),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        ));
        self.vertex_count = vertices.len() as u32;
    }

    /// Draw the prepared triangles.
    ///
    /// `surface_size` is the current surface size in pixels; positions in
    /// the vertex buffer are pixel coordinates with the origin at the
    /// top-left corner.
    pub fn render(
        &self,
        pass: &mut wgpu::RenderPass,
        surface_size: (f32, f32),
        color: [f32; 4],
    ) {
        if self.vertex_count == 0 {
            return;
        }

        let Some(vertex_buffer) = &self.vertex_buffer else {
            return;
        };

        let uniform = OverlayUniform {
            surface_size: [surface_size.0, surface_size.1],
            _padding: [0.0; 2],
            color,
        };
        self.context
            .queue()
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniform]));

        pass.push_debug_group("OverlayRenderer::render");
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        pass.set_vertex_buffer(0, vertex_buffer.slice(..));
        pass.draw(0..self.vertex_count, 0..1);
        pass.pop_debug_group();
    }
}

/// Expand a polyline into a triangle list with constant half-width.
///
/// Each segment becomes a quad offset perpendicular to its direction.
/// Interior vertices get a two-triangle bridge between the end edge of
/// one segment and the start edge of the next; the outer wedge of each
/// corner is filled without any miter computation, and the inner
/// triangle lands inside the segment quads.
pub fn expand_polyline(points: &[Vec2], half_width: f32) -> Vec<[f32; 2]> {
    const MIN_SEGMENT: f32 = 1e-4;

    if points.len() < 2 {
        return Vec::new();
    }

    // 6 vertices per segment quad, 6 per interior bridge
    let mut triangles = Vec::with_capacity(12 * points.len());

    let normal = |from: Vec2, to: Vec2| -> Vec2 {
        let delta = to - from;
        if delta.length() < MIN_SEGMENT {
            Vec2::new(0.0, 1.0) * half_width
        } else {
            delta.perp().normalize() * half_width
        }
    };

    for pair in points.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        let n = normal(start, end);

        triangles.push((start + n).to_array());
        triangles.push((start - n).to_array());
        triangles.push((end - n).to_array());

        triangles.push((start + n).to_array());
        triangles.push((end - n).to_array());
        triangles.push((end + n).to_array());
    }

    for i in 1..points.len() - 1 {
        let joint = points[i];
        let n_in = normal(points[i - 1], joint);
        let n_out = normal(joint, points[i + 1]);

        // Collinear segments share their edge; no gap to bridge.
        if (points[i] - points[i - 1])
            .perp_dot(points[i + 1] - points[i])
            .abs()
            < MIN_SEGMENT
        {
            continue;
        }

        triangles.push((joint + n_in).to_array());
        triangles.push((joint + n_out).to_array());
        triangles.push(joint.to_array());

        triangles.push((joint - n_in).to_array());
        triangles.push((joint - n_out).to_array());
        triangles.push(joint.to_array());
    }

    triangles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_single_point_produce_nothing() {
        assert!(expand_polyline(&[], 2.5).is_empty());
        assert!(expand_polyline(&[Vec2::new(1.0, 1.0)], 2.5).is_empty());
    }

    #[test]
    fn horizontal_segment_expands_vertically() {
        let points = [Vec2::new(0.0, 10.0), Vec2::new(20.0, 10.0)];
        let triangles = expand_polyline(&points, 2.5);

        // One quad, no interior vertices.
        assert_eq!(triangles.len(), 6);
        for [x, y] in &triangles {
            assert!(*x == 0.0 || *x == 20.0);
            assert!((y - 7.5).abs() < 1e-5 || (y - 12.5).abs() < 1e-5);
        }
    }

    #[test]
    fn interior_vertex_adds_bridge() {
        let points = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
        ];
        let triangles = expand_polyline(&points, 1.0);

        // Two segment quads plus one two-triangle bridge.
        assert_eq!(triangles.len(), 2 * 6 + 6);
    }

    #[test]
    fn collinear_interior_vertex_has_no_bridge() {
        let points = [
            Vec2::new(0.0, 0.0),
            Vec2::new(5.0, 0.0),
            Vec2::new(10.0, 0.0),
        ];
        let triangles = expand_polyline(&points, 1.0);
        assert_eq!(triangles.len(), 2 * 6);
    }

    #[test]
    fn offsets_are_perpendicular_to_segment() {
        let points = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0)];
        let triangles = expand_polyline(&points, 2.0_f32.sqrt());

        let direction = Vec2::new(1.0, 1.0).normalize();
        for (vertex, base) in triangles
            .iter()
            .map(|v| Vec2::from_array(*v))
            .zip([points[0], points[0], points[1], points[0], points[1], points[1]])
        {
            let offset = vertex - base;
            assert!(offset.dot(direction).abs() < 1e-4);
        }
    }
}
