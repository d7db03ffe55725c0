//! View-projection for a viewer sitting at the centre of the sphere

use glam::{Mat4, Quat, Vec3};

pub const DEFAULT_FOV_Y_DEGREES: f32 = 90.0;

// clip planes as fractions of the sphere radius
const NEAR_FACTOR: f32 = 0.01;
const FAR_FACTOR: f32 = 2.0;

/// Perspective (GL clip space, right-handed) times the inverse head
/// orientation, with the eye at `center`. Near and far scale with `radius`
/// so the whole sphere shell stays inside the depth range.
pub fn view_projection(orientation: Quat, center: Vec3, radius: f32, aspect: f32, fov_y_radians: f32) -> Mat4 {
    let proj = Mat4::perspective_rh_gl(fov_y_radians, aspect, radius * NEAR_FACTOR, radius * FAR_FACTOR);
    let view = Mat4::from_quat(orientation.inverse()) * Mat4::from_translation(-center);
    proj * view
}

/// Aspect ratio of a surface, guarding against a zero height
pub fn aspect_ratio(width: u32, height: u32) -> f32 {
    width as f32 / height.max(1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SphereConfig;
    use crate::mesh::SphereMesh;
    use glam::Vec4;

    fn fov() -> f32 {
        DEFAULT_FOV_Y_DEGREES.to_radians()
    }

    fn ndc(vp: Mat4, point: Vec3) -> (Vec3, f32) {
        let clip = vp * point.extend(1.0);
        (clip.truncate() / clip.w, clip.w)
    }

    #[test]
    fn identity_looks_down_negative_z() {
        let vp = view_projection(Quat::IDENTITY, Vec3::ZERO, 50.0, 1.0, fov());
        let (p, _) = ndc(vp, Vec3::new(0.0, 0.0, -50.0));
        assert!(p.x.abs() < 1e-6 && p.y.abs() < 1e-6);
        assert!((-1.0..=1.0).contains(&p.z));
    }

    #[test]
    fn turning_left_brings_left_into_view() {
        let turn = Quat::from_axis_angle(Vec3::Y, std::f32::consts::FRAC_PI_2);
        let vp = view_projection(turn, Vec3::ZERO, 50.0, 1.0, fov());
        let (p, w) = ndc(vp, Vec3::new(-50.0, 0.0, 0.0));
        assert!(w > 0.0);
        assert!(p.x.abs() < 1e-5, "{p}");
    }

    #[test]
    fn eye_sits_at_the_sphere_centre() {
        let center = Vec3::new(0.0, 0.0, -30.0);
        let vp = view_projection(Quat::IDENTITY, center, 50.0, 1.0, fov());

        let clip = vp * Vec4::new(center.x, center.y, center.z, 1.0);
        assert!(clip.w.abs() < 1e-5, "centre w {}", clip.w);

        let (p, w) = ndc(vp, center + Vec3::new(0.0, 0.0, -50.0));
        assert!((w - 50.0).abs() < 1e-4);
        assert!(p.x.abs() < 1e-6 && p.y.abs() < 1e-6);
        assert!((-1.0..=1.0).contains(&p.z));
    }

    #[test]
    fn large_sphere_stays_inside_depth_range() {
        let config = SphereConfig::default().with_slices(16).with_radius(500.0).with_center(Vec3::new(10.0, -20.0, 5.0));
        let mesh = SphereMesh::new(config).unwrap();
        let vp = view_projection(Quat::IDENTITY, config.center, config.radius, 1.0, fov());

        let mut in_front = 0;
        for vertex in mesh.vertices() {
            let (p, w) = ndc(vp, Vec3::from_array(vertex.position));
            // skip the grazing points the near plane legitimately cuts
            if w > config.radius * 0.1 {
                in_front += 1;
                assert!((-1.0 - 1e-4..=1.0 + 1e-4).contains(&p.z), "depth {} at w {}", p.z, w);
            }
        }
        assert!(in_front > 50, "only {in_front} vertices in front");
    }

    #[test]
    fn aspect_ignores_zero_height() {
        assert_eq!(aspect_ratio(1920, 1080), 1920.0 / 1080.0);
        assert_eq!(aspect_ratio(640, 0), 640.0);
    }
}
