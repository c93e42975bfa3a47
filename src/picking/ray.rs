use glam::Vec2;

use crate::camera::Camera;
use crate::scene::Ray;

/// Convert a pixel position (origin top-left) into normalized device
/// coordinates in `-1.0..=1.0`, +Y up.
#[must_use]
pub fn pixel_to_ndc(pixel: Vec2, viewport: Vec2) -> Vec2 {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(
        pixel.x / viewport.x * 2.0 - 1.0,
        1.0 - pixel.y / viewport.y * 2.0,
    )
}

/// World-space ray under a normalized device point.
#[must_use]
pub fn pointer_ray(camera: &Camera, ndc: Vec2) -> Ray {
    camera.ray_from_ndc(ndc.clamp(Vec2::NEG_ONE, Vec2::ONE))
}
