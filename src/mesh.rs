//! UV sphere mesh with fisheye texture coordinates
//!
//! Latitude step `i` is the angle from +z, longitude step `j` the angle
//! around it, so every `(i, j)` pair fixes one point:
//! `x = r·sin(i)·sin(j)`, `y = r·sin(i)·cos(j)`, `z = r·cos(i)`.
//! Texture coordinates are baked from the lens model once, so the shader
//! only has to sample.

use std::f32::consts::PI;
use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use log::debug;

use crate::config::SphereConfig;
use crate::error::Result;
use crate::projection::{equirectangular_uv, Lens, TextureLayout};

/// Indices emitted per grid quad (two triangles)
pub const INDICES_PER_QUAD: usize = 6;

/// Position + texture coordinate, laid out for direct upload
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    /// 3 position floats + 2 texture floats
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();
    pub const POSITION_OFFSET: usize = 0;
    pub const UV_OFFSET: usize = 3 * std::mem::size_of::<f32>();
}

/// Triangulated sphere sharing one vertex buffer across several index buffers
#[derive(Debug, Clone)]
pub struct SphereMesh {
    config: SphereConfig,
    vertices: Vec<Vertex>,
    indices: Vec<u16>,
    // one range into `indices` per index buffer
    buffers: Vec<Range<usize>>,
}

impl SphereMesh {
    pub fn new(config: SphereConfig) -> Result<Self> {
        config.validate()?;

        let vertices = build_vertices(&config);
        let indices = build_indices(config.slices);
        let buffers = partition(indices.len(), config.num_index_buffers);

        debug!(
            "SphereMesh: {} slices, {} vertices, {} indices in {} buffers",
            config.slices,
            vertices.len(),
            indices.len(),
            buffers.len()
        );

        Ok(Self { config, vertices, indices, buffers })
    }

    pub fn config(&self) -> &SphereConfig {
        &self.config
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn stride(&self) -> usize {
        Vertex::STRIDE
    }

    pub fn num_index_buffers(&self) -> usize {
        self.buffers.len()
    }

    /// Indices of buffer `n`. Panics if `n` is out of range.
    pub fn index_buffer(&self, n: usize) -> &[u16] {
        &self.indices[self.buffers[n].clone()]
    }

    pub fn index_buffers(&self) -> impl Iterator<Item = &[u16]> + '_ {
        self.buffers.iter().map(move |range| &self.indices[range.clone()])
    }

    pub fn index_counts(&self) -> Vec<usize> {
        self.buffers.iter().map(|range| range.len()).collect()
    }

    pub fn total_indices(&self) -> usize {
        self.indices.len()
    }
}

fn build_vertices(config: &SphereConfig) -> Vec<Vertex> {
    let slices = config.slices;
    let row_len = config.row_len();
    let step_i = PI / slices as f32;
    let step_j = 2.0 * PI / slices as f32;
    let model = config.fisheye_model();

    let mut vertices = Vec::with_capacity(config.vertex_count());
    for i in 0..row_len {
        let (sin_i, cos_i) = (step_i * i as f32).sin_cos();
        for j in 0..row_len {
            let (sin_j, cos_j) = (step_j * j as f32).sin_cos();
            let offset = config.radius * Vec3::new(sin_i * sin_j, sin_i * cos_j, cos_i);

            let uv = match config.layout {
                TextureLayout::DualFisheye => model.uv(offset, Lens::for_longitude(j, row_len)),
                TextureLayout::Equirectangular => equirectangular_uv(i, j, slices),
            };

            vertices.push(Vertex {
                position: (config.center + offset).to_array(),
                uv,
            });
        }
    }
    vertices
}

fn build_indices(slices: usize) -> Vec<u16> {
    let row_len = slices + 1;
    let mut indices = Vec::with_capacity(slices * slices * INDICES_PER_QUAD);
    for i in 0..slices {
        for j in 0..slices {
            let (i1, j1) = (i + 1, j + 1);
            // row_len^2 was validated against i16::MAX
            let at = |row: usize, col: usize| (row * row_len + col) as u16;
            indices.extend_from_slice(&[
                at(i, j),
                at(i1, j),
                at(i1, j1),
                at(i, j),
                at(i1, j1),
                at(i, j1),
            ]);
        }
    }
    indices
}

/// Spreads whole quads evenly over the first `count - 1` buffers and puts
/// the remainder in the last one.
fn partition(total: usize, count: usize) -> Vec<Range<usize>> {
    let per_buffer = total / count / INDICES_PER_QUAD * INDICES_PER_QUAD;
    let mut ranges = Vec::with_capacity(count);
    let mut start = 0;
    for _ in 0..count - 1 {
        ranges.push(start..start + per_buffer);
        start += per_buffer;
    }
    ranges.push(start..total);
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::projection::LensProjection;

    fn mesh(slices: usize, buffers: usize) -> SphereMesh {
        SphereMesh::new(SphereConfig::default().with_slices(slices).with_radius(1.0).with_index_buffers(buffers))
            .unwrap()
    }

    #[test]
    fn stride_is_twenty_bytes() {
        assert_eq!(Vertex::STRIDE, 20);
        assert_eq!(Vertex::UV_OFFSET, 12);
        assert_eq!(mesh(4, 1).vertex_bytes().len(), 25 * 20);
    }

    #[test]
    fn counts_follow_slices() {
        let m = mesh(10, 1);
        assert_eq!(m.vertices().len(), 121);
        assert_eq!(m.total_indices(), 600);
        assert_eq!(m.index_counts(), vec![600]);
    }

    #[test]
    fn partition_puts_remainder_last() {
        // 9 slices: 81 quads over 4 buffers -> 20, 20, 20, 21 quads
        let m = mesh(9, 4);
        assert_eq!(m.index_counts(), vec![120, 120, 120, 126]);
        assert_eq!(m.index_counts().iter().sum::<usize>(), m.total_indices());
    }

    #[test]
    fn more_buffers_than_quads_leaves_leading_buffers_empty() {
        // 2 slices: 4 quads over 6 buffers
        let m = mesh(2, 6);
        assert_eq!(m.index_counts(), vec![0, 0, 0, 0, 0, 24]);
    }

    #[test]
    fn first_quad_winding() {
        let m = mesh(3, 1);
        assert_eq!(&m.index_buffer(0)[..6], &[0, 4, 5, 0, 5, 1]);
    }

    #[test]
    fn buffers_concatenate_to_the_full_triangle_list() {
        let whole = mesh(6, 1);
        let split = mesh(6, 5);
        let joined: Vec<u16> = split.index_buffers().flatten().copied().collect();
        assert_eq!(joined, whole.index_buffer(0));
    }

    #[test]
    fn positions_lie_on_sphere_around_center() {
        let center = Vec3::new(1.0, -2.0, 3.0);
        let m = SphereMesh::new(SphereConfig::default().with_slices(12).with_radius(2.5).with_center(center)).unwrap();
        for v in m.vertices() {
            let d = Vec3::from(v.position).distance(center);
            assert!((d - 2.5).abs() < 1e-4, "distance {d}");
        }
        // first row is the +z pole
        assert!(Vec3::from(m.vertices()[0].position).abs_diff_eq(center + Vec3::Z * 2.5, 1e-5));
    }

    #[test]
    fn front_pole_of_left_lens_maps_to_left_centre() {
        // i = slices/2, j = slices/4 is (r, 0, 0)
        let m = mesh(8, 1);
        let v = m.vertices()[4 * 9 + 2];
        assert!(Vec3::from(v.position).abs_diff_eq(Vec3::X, 1e-6));
        assert!((v.uv[0] - 0.25).abs() < 1e-5 && (v.uv[1] - 0.5).abs() < 1e-5, "{:?}", v.uv);
    }

    #[test]
    fn crossing_half_a_turn_switches_lens() {
        let slices = 8;
        let m = mesh(slices, 1);
        let row_len = slices + 1;
        for i in 1..slices {
            for j in 0..slices / 2 {
                let left = m.vertices()[i * row_len + j].uv[0];
                let right = m.vertices()[i * row_len + j + slices / 2].uv[0];
                assert!((0.0..=0.5).contains(&left), "left u {left} at ({i},{j})");
                assert!((0.5..=1.0).contains(&right), "right u {right} at ({i},{j})");
            }
        }
    }

    #[test]
    fn equirectangular_layout_uses_grid_uv() {
        let m = SphereMesh::new(
            SphereConfig::default().with_slices(4).with_layout(TextureLayout::Equirectangular),
        )
        .unwrap();
        assert_eq!(m.vertices()[0].uv, [0.0, 0.0]);
        assert_eq!(m.vertices()[24].uv, [1.0, 1.0]);
        assert_eq!(m.vertices()[2 * 5 + 1].uv, [0.25, 0.5]);
    }

    #[test]
    fn projection_changes_uv_but_not_geometry() {
        let base = SphereConfig::default().with_slices(16);
        let a = SphereMesh::new(base).unwrap();
        let b = SphereMesh::new(base.with_projection(LensProjection::Stereographic)).unwrap();
        assert_eq!(a.index_buffer(0), b.index_buffer(0));
        assert!(a.vertices().iter().zip(b.vertices()).all(|(x, y)| x.position == y.position));
        assert!(a.vertices().iter().zip(b.vertices()).any(|(x, y)| x.uv != y.uv));
    }

    #[test]
    fn oversized_mesh_is_rejected() {
        let err = SphereMesh::new(SphereConfig::default().with_slices(181)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfiguration(_)));
    }

    #[test]
    fn absurd_index_buffer_count_is_an_error() {
        let config = SphereConfig::default().with_slices(4).with_index_buffers(usize::MAX);
        let err = SphereMesh::new(config).unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfiguration(_)));
    }
}
