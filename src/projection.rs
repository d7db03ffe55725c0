//! Fisheye lens models and the sphere-point to texture UV mapping
//!
//! A dual-fisheye frame stores two circular lens images side by side. Each
//! lens covers one hemisphere of the sphere: the left image looks down +x,
//! the right image looks down -x. Texture space has its origin at the top
//! left, so every mapping flips v.
//!
//! ```text
//!      | z
//!      |
//!      |____ y
//!     /
//!    x   (into the screen)
//! ```

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use glam::Vec3;

/// Calibration radius of one lens circle, as a fraction of frame height
pub const DEFAULT_CALIBRATION_RADIUS: f64 = 0.48;

/// Lens model relating the angle off the optical axis to image radius
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LensProjection {
    /// `r = f·θ`, used by most fisheye cameras
    #[default]
    Equidistant,
    /// `r = 2f·tan(θ/2)`
    Stereographic,
    /// `r = 2f·sin(θ/2)`
    Equisolid,
    /// `r = f·sin(θ)`
    Orthographic,
}

impl LensProjection {
    /// Focal scale such that the rim of a 180° lens (θ = π/2) lands on
    /// `calibration_radius`.
    pub fn focal_scale(self, calibration_radius: f64) -> f64 {
        match self {
            LensProjection::Equidistant => calibration_radius / FRAC_PI_2,
            LensProjection::Stereographic => calibration_radius / (2.0 * FRAC_PI_4.tan()),
            LensProjection::Equisolid => calibration_radius / (2.0 * FRAC_PI_4.sin()),
            LensProjection::Orthographic => calibration_radius / FRAC_PI_2.sin(),
        }
    }

    /// Image radius for a ray `theta` radians off the optical axis
    pub fn image_radius(self, focal_scale: f64, theta: f64) -> f64 {
        match self {
            LensProjection::Equidistant => focal_scale * theta,
            LensProjection::Stereographic => 2.0 * focal_scale * (theta / 2.0).tan(),
            LensProjection::Equisolid => 2.0 * focal_scale * (theta / 2.0).sin(),
            LensProjection::Orthographic => focal_scale * theta.sin(),
        }
    }
}

/// How the source video frame is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextureLayout {
    /// Two fisheye circles side by side
    #[default]
    DualFisheye,
    /// Already-unwrapped longitude/latitude panorama
    Equirectangular,
}

/// One half of a dual-fisheye frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lens {
    /// Left image, +x hemisphere
    Left,
    /// Right image, -x hemisphere
    Right,
}

impl Lens {
    /// Selects the lens for longitude step `j` of a row holding `row_len`
    /// vertices.
    pub fn for_longitude(j: usize, row_len: usize) -> Lens {
        if j < row_len / 2 {
            Lens::Left
        } else {
            Lens::Right
        }
    }
}

/// Parameters of the fisheye unwarp
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FisheyeModel {
    pub projection: LensProjection,
    pub calibration_radius: f64,
}

impl Default for FisheyeModel {
    fn default() -> Self {
        Self {
            projection: LensProjection::Equidistant,
            calibration_radius: DEFAULT_CALIBRATION_RADIUS,
        }
    }
}

impl FisheyeModel {
    /// Maps a point on the sphere (relative to its centre) to texture UV in
    /// the half of the frame that `lens` images.
    pub fn uv(&self, point: Vec3, lens: Lens) -> [f32; 2] {
        let (x, y, z) = (point.x as f64, point.y as f64, point.z as f64);
        let f = self.projection.focal_scale(self.calibration_radius);
        let axial = (z * z + y * y).sqrt();
        let phi = z.atan2(y);

        match lens {
            Lens::Left => {
                let theta = axial.atan2(x);
                let r = self.projection.image_radius(f, theta);
                let u = r * phi.cos() / 2.0 + 0.25;
                let v = r * phi.sin() + 0.5;
                // left image is mirrored horizontally
                [(0.5 - u) as f32, (1.0 - v) as f32]
            }
            Lens::Right => {
                let theta = axial.atan2(-x);
                let r = self.projection.image_radius(f, theta);
                let u = r * phi.cos() / 2.0 + 0.75;
                let v = r * phi.sin() + 0.5;
                [u as f32, (1.0 - v) as f32]
            }
        }
    }
}

/// Equirectangular mapping: UV follows the grid step directly
pub fn equirectangular_uv(i: usize, j: usize, slices: usize) -> [f32; 2] {
    [j as f32 / slices as f32, i as f32 / slices as f32]
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-6;

    fn close(a: [f32; 2], b: [f32; 2]) -> bool {
        (a[0] - b[0]).abs() < EPS && (a[1] - b[1]).abs() < EPS
    }

    #[test]
    fn left_lens_optical_axis_is_fixed_point() {
        let model = FisheyeModel::default();
        let uv = model.uv(Vec3::new(1.0, 0.0, 0.0), Lens::Left);
        assert!(close(uv, [0.25, 0.5]), "{uv:?}");
    }

    #[test]
    fn right_lens_optical_axis_maps_to_right_centre() {
        let model = FisheyeModel::default();
        let uv = model.uv(Vec3::new(-3.0, 0.0, 0.0), Lens::Right);
        assert!(close(uv, [0.75, 0.5]), "{uv:?}");
    }

    #[test]
    fn every_model_puts_the_rim_on_the_calibration_radius() {
        for projection in [
            LensProjection::Equidistant,
            LensProjection::Stereographic,
            LensProjection::Equisolid,
            LensProjection::Orthographic,
        ] {
            let f = projection.focal_scale(0.48);
            let r = projection.image_radius(f, FRAC_PI_2);
            assert!((r - 0.48).abs() < 1e-12, "{projection:?} rim at {r}");
        }
    }

    #[test]
    fn rim_point_on_top_of_left_lens() {
        // z-up rim point: theta = pi/2, phi = pi/2, so r = R straight up
        let model = FisheyeModel::default();
        let uv = model.uv(Vec3::new(0.0, 0.0, 1.0), Lens::Left);
        assert!(close(uv, [0.25, 1.0 - 0.98]), "{uv:?}");
    }

    #[test]
    fn lens_split_uses_half_row() {
        assert_eq!(Lens::for_longitude(0, 9), Lens::Left);
        assert_eq!(Lens::for_longitude(3, 9), Lens::Left);
        assert_eq!(Lens::for_longitude(4, 9), Lens::Right);
        assert_eq!(Lens::for_longitude(8, 9), Lens::Right);
    }

    #[test]
    fn equirectangular_corners() {
        assert_eq!(equirectangular_uv(0, 0, 4), [0.0, 0.0]);
        assert_eq!(equirectangular_uv(4, 4, 4), [1.0, 1.0]);
        assert_eq!(equirectangular_uv(2, 1, 4), [0.25, 0.5]);
    }
}
