//! Tunable parameters for the sphere mesh and the renderer

use glam::Vec3;

use crate::error::{CoreError, Result};
use crate::projection::{FisheyeModel, LensProjection, TextureLayout, DEFAULT_CALIBRATION_RADIUS};
use crate::shader::{DEFAULT_FRAGMENT_SHADER, DEFAULT_VERTEX_SHADER};

/// Largest vertex count addressable by a signed 16-bit index
pub const MAX_VERTICES: usize = i16::MAX as usize;

pub const MIN_SLICES: usize = 2;

/// Upper bound on index buffers; even the finest mesh has no use for more
pub const MAX_INDEX_BUFFERS: usize = MAX_VERTICES;

/// Sphere tessellation and lens parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereConfig {
    /// Steps in latitude and longitude (the same count is used for both)
    pub slices: usize,
    pub radius: f32,
    pub center: Vec3,
    /// Number of index buffers the triangles are spread across
    pub num_index_buffers: usize,
    pub projection: LensProjection,
    /// Lens circle radius as a fraction of frame height
    pub calibration_radius: f64,
    pub layout: TextureLayout,
}

impl Default for SphereConfig {
    fn default() -> Self {
        Self {
            slices: 180,
            radius: 50.0,
            center: Vec3::ZERO,
            num_index_buffers: 1,
            projection: LensProjection::Equidistant,
            calibration_radius: DEFAULT_CALIBRATION_RADIUS,
            layout: TextureLayout::DualFisheye,
        }
    }
}

impl SphereConfig {
    pub fn with_slices(mut self, slices: usize) -> Self {
        self.slices = slices;
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_center(mut self, center: Vec3) -> Self {
        self.center = center;
        self
    }

    pub fn with_index_buffers(mut self, count: usize) -> Self {
        self.num_index_buffers = count;
        self
    }

    pub fn with_projection(mut self, projection: LensProjection) -> Self {
        self.projection = projection;
        self
    }

    pub fn with_calibration_radius(mut self, radius: f64) -> Self {
        self.calibration_radius = radius;
        self
    }

    pub fn with_layout(mut self, layout: TextureLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Vertices per latitude row (and number of rows)
    pub fn row_len(&self) -> usize {
        self.slices + 1
    }

    pub fn vertex_count(&self) -> usize {
        self.row_len() * self.row_len()
    }

    pub fn total_indices(&self) -> usize {
        self.slices * self.slices * 6
    }

    pub fn fisheye_model(&self) -> FisheyeModel {
        FisheyeModel {
            projection: self.projection,
            calibration_radius: self.calibration_radius,
        }
    }

    /// Rejects parameters the mesh cannot be built from. Nothing is clamped.
    pub fn validate(&self) -> Result<()> {
        if self.slices < MIN_SLICES {
            return Err(CoreError::InvalidConfiguration(format!(
                "slices {} below minimum {}",
                self.slices, MIN_SLICES
            )));
        }
        // checked to stay clear of overflow for absurd slice counts
        let vertices = self.slices.checked_add(1).and_then(|n| n.checked_mul(n));
        if vertices.map_or(true, |n| n > MAX_VERTICES) {
            return Err(CoreError::InvalidConfiguration(format!(
                "slices {} too big for 16-bit indices ({} vertices, max {})",
                self.slices,
                vertices.map_or_else(|| "overflowing".to_string(), |n| n.to_string()),
                MAX_VERTICES
            )));
        }
        if self.num_index_buffers == 0 {
            return Err(CoreError::InvalidConfiguration(
                "at least one index buffer is required".to_string(),
            ));
        }
        if self.num_index_buffers > MAX_INDEX_BUFFERS {
            return Err(CoreError::InvalidConfiguration(format!(
                "{} index buffers requested, max {}",
                self.num_index_buffers, MAX_INDEX_BUFFERS
            )));
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(CoreError::InvalidConfiguration(format!(
                "radius must be positive, got {}",
                self.radius
            )));
        }
        if !self.center.is_finite() {
            return Err(CoreError::InvalidConfiguration(format!(
                "center must be finite, got {}",
                self.center
            )));
        }
        if !(self.calibration_radius > 0.0 && self.calibration_radius <= 0.5) {
            return Err(CoreError::InvalidConfiguration(format!(
                "calibration radius must be in (0, 0.5], got {}",
                self.calibration_radius
            )));
        }
        Ok(())
    }
}

/// Everything the renderer needs at construction time
#[derive(Debug, Clone)]
pub struct RendererConfig {
    pub sphere: SphereConfig,
    pub vertex_shader: String,
    pub fragment_shader: String,
    pub clear_color: [f32; 4],
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            sphere: SphereConfig::default(),
            vertex_shader: DEFAULT_VERTEX_SHADER.to_string(),
            fragment_shader: DEFAULT_FRAGMENT_SHADER.to_string(),
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl RendererConfig {
    pub fn with_sphere(mut self, sphere: SphereConfig) -> Self {
        self.sphere = sphere;
        self
    }

    pub fn with_shaders(mut self, vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        self.vertex_shader = vertex.into();
        self.fragment_shader = fragment.into();
        self
    }

    pub fn with_clear_color(mut self, color: [f32; 4]) -> Self {
        self.clear_color = color;
        self
    }
}
