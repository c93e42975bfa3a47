//! Mesh geometry descriptions, bounding boxes and ray intersection.
//!
//! Geometry here is analytic: the scene graph only needs bounds (for size
//! normalization) and ray hits (for picking), never vertex data.

use glam::{Mat4, Vec3};

/// A half-line in 3D space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point.
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray, normalizing `direction`.
    #[must_use]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at parameter `t` along the ray.
    #[inline]
    #[must_use]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Transform into another space. The direction is NOT renormalized so
    /// that parameters stay comparable across spaces.
    #[must_use]
    pub fn transformed(&self, m: &Mat4) -> Self {
        Self {
            origin: m.transform_point3(self.origin),
            direction: m.transform_vector3(self.direction),
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// The empty box: contains nothing, absorbs into any union.
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Box from two corners.
    #[must_use]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box centered on the origin with the given half extents.
    #[must_use]
    pub fn from_half_extents(half: Vec3) -> Self {
        Self {
            min: -half,
            max: half,
        }
    }

    /// Whether the box contains no point.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x
            || self.min.y > self.max.y
            || self.min.z > self.max.z
    }

    /// Grow to include `point`.
    pub fn expand(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Smallest box containing both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Edge lengths (zero for an empty box).
    #[must_use]
    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            self.max - self.min
        }
    }

    /// Largest edge length.
    #[must_use]
    pub fn max_extent(&self) -> f32 {
        self.size().max_element()
    }

    /// Bounds of this box after transforming its 8 corners.
    #[must_use]
    pub fn transformed(&self, m: &Mat4) -> Self {
        if self.is_empty() {
            return *self;
        }
        let mut out = Self::EMPTY;
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            out.expand(m.transform_point3(corner));
        }
        out
    }

    /// Slab test. Returns the ray parameter of the first hit in front of
    /// the origin (the exit point when the origin is inside).
    #[must_use]
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        let (t_min, t_max) = self.span(ray)?;
        Some(if t_min >= 0.0 { t_min } else { t_max })
    }

    /// Entry and exit parameters of `ray` through the box, when the exit
    /// lies in front of the origin.
    fn span(&self, ray: &Ray) -> Option<(f32, f32)> {
        if self.is_empty() {
            return None;
        }
        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;
        for axis in 0..3 {
            let o = ray.origin[axis];
            let d = ray.direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);
            if d.abs() < f32::EPSILON {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let t1 = (lo - o) / d;
            let t2 = (hi - o) / d;
            t_min = t_min.max(t1.min(t2));
            t_max = t_max.min(t1.max(t2));
        }
        if t_max < t_min || t_max < 0.0 {
            return None;
        }
        Some((t_min, t_max))
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Analytic mesh geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    /// Flat card surface in the local XY plane, facing +Z.
    Plane {
        /// Extent along X.
        width: f32,
        /// Extent along Y.
        height: f32,
    },
    /// UV sphere.
    Sphere {
        /// Radius.
        radius: f32,
        /// Longitude segments.
        width_segments: u32,
        /// Latitude segments.
        height_segments: u32,
    },
    /// Axis-aligned box centered on the origin.
    Cuboid {
        /// Edge lengths.
        size: Vec3,
    },
    /// Cylinder (a cone when `radius_top` is zero) along Y.
    Cylinder {
        /// Top cap radius.
        radius_top: f32,
        /// Bottom cap radius.
        radius_bottom: f32,
        /// Extent along Y.
        height: f32,
        /// Segments around the axis.
        radial_segments: u32,
    },
    /// Torus in the XY plane.
    Torus {
        /// Distance from the center to the tube center.
        radius: f32,
        /// Tube radius.
        tube: f32,
        /// Segments around the tube.
        radial_segments: u32,
        /// Segments along the ring.
        tubular_segments: u32,
    },
    /// Loaded mesh known only by its local bounds.
    Bounded(Aabb),
}

impl Geometry {
    /// Local-space bounds.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        match *self {
            Self::Plane { width, height } => Aabb::from_half_extents(
                Vec3::new(width * 0.5, height * 0.5, 0.0),
            ),
            Self::Sphere { radius, .. } => {
                Aabb::from_half_extents(Vec3::splat(radius))
            }
            Self::Cuboid { size } => Aabb::from_half_extents(size * 0.5),
            Self::Cylinder {
                radius_top,
                radius_bottom,
                height,
                ..
            } => {
                let r = radius_top.max(radius_bottom);
                Aabb::from_half_extents(Vec3::new(r, height * 0.5, r))
            }
            Self::Torus { radius, tube, .. } => Aabb::from_half_extents(
                Vec3::new(radius + tube, radius + tube, tube),
            ),
            Self::Bounded(aabb) => aabb,
        }
    }

    /// Ray parameter of the first hit, in the local space of `ray`.
    /// Spheres, cylinders, cones and tori are exact; boxes, planes and
    /// loaded meshes test their bounds.
    #[must_use]
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        match *self {
            Self::Sphere { radius, .. } => intersect_sphere(ray, radius),
            Self::Cylinder {
                radius_top,
                radius_bottom,
                height,
                ..
            } => intersect_cylinder(ray, radius_top, radius_bottom, height),
            Self::Torus { radius, tube, .. } => {
                intersect_torus(ray, &self.bounds(), radius, tube)
            }
            _ => self.bounds().intersect(ray),
        }
    }
}

/// Smallest root of `a·t² + b·t + c` accepted by `keep`.
fn nearest_root(a: f32, b: f32, c: f32, keep: impl Fn(f32) -> bool) -> Option<f32> {
    let roots = if a.abs() < 1e-9 {
        if b.abs() < 1e-9 {
            return None;
        }
        [-c / b, f32::NAN]
    } else {
        let disc = b * b - 4.0 * a * c;
        if disc < 0.0 {
            return None;
        }
        let sqrt_disc = disc.sqrt();
        let (r1, r2) = ((-b - sqrt_disc) / (2.0 * a), (-b + sqrt_disc) / (2.0 * a));
        [r1.min(r2), r1.max(r2)]
    };
    roots.into_iter().find(|&t| t >= 0.0 && keep(t))
}

/// Capped (possibly truncated) cone along Y, centered on the origin.
fn intersect_cylinder(
    ray: &Ray,
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
) -> Option<f32> {
    let half = height * 0.5;
    if half <= 0.0 {
        return None;
    }
    let (o, d) = (ray.origin, ray.direction);
    // Radius along the axis: r(y) = r0 + k·y.
    let k = (radius_top - radius_bottom) / height;
    let r0 = (radius_top + radius_bottom) * 0.5;
    let ro = r0 + k * o.y;

    let a = d.x * d.x + d.z * d.z - k * k * d.y * d.y;
    let b = 2.0 * (o.x * d.x + o.z * d.z - k * d.y * ro);
    let c = o.x * o.x + o.z * o.z - ro * ro;
    let lateral = nearest_root(a, b, c, |t| {
        let y = o.y + t * d.y;
        // The mirrored nappe of a cone has a negative radius.
        y.abs() <= half && r0 + k * y >= 0.0
    });

    let caps = [(half, radius_top), (-half, radius_bottom)]
        .into_iter()
        .filter(|_| d.y.abs() > f32::EPSILON)
        .filter_map(|(y, r)| {
            let t = (y - o.y) / d.y;
            let p = ray.at(t);
            (t >= 0.0 && p.x * p.x + p.z * p.z <= r * r).then_some(t)
        });

    lateral.into_iter().chain(caps).min_by(f32::total_cmp)
}

/// Torus in the XY plane (axis +Z), sphere traced against its exact
/// distance field inside the bounding box.
fn intersect_torus(ray: &Ray, bounds: &Aabb, radius: f32, tube: f32) -> Option<f32> {
    const MAX_STEPS: usize = 256;
    let speed = ray.direction.length();
    if speed < f32::EPSILON || tube <= 0.0 {
        return None;
    }
    let (t_min, t_max) = bounds.span(ray)?;
    let distance = |p: Vec3| {
        let ring = p.truncate().length() - radius;
        ring.hypot(p.z) - tube
    };
    let epsilon = tube * 1e-4;
    let mut t = t_min.max(0.0);
    for _ in 0..MAX_STEPS {
        if t > t_max {
            return None;
        }
        let d = distance(ray.at(t));
        if d < epsilon {
            return Some(t);
        }
        // `t` is in ray units; the field is in local units.
        t += d / speed;
    }
    None
}

fn intersect_sphere(ray: &Ray, radius: f32) -> Option<f32> {
    let a = ray.direction.length_squared();
    if a < f32::EPSILON {
        return None;
    }
    let b = 2.0 * ray.origin.dot(ray.direction);
    let c = ray.origin.length_squared() - radius * radius;
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    let near = (-b - sqrt_disc) / (2.0 * a);
    let far = (-b + sqrt_disc) / (2.0 * a);
    if near >= 0.0 {
        Some(near)
    } else if far >= 0.0 {
        Some(far)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_box_absorbs_in_union() {
        let b = Aabb::from_half_extents(Vec3::ONE);
        assert_eq!(Aabb::EMPTY.union(&b), b);
        assert_eq!(Aabb::EMPTY.size(), Vec3::ZERO);
    }

    #[test]
    fn transformed_box_scales_extent() {
        let b = Aabb::from_half_extents(Vec3::new(1.0, 2.0, 3.0));
        let m = Mat4::from_scale(Vec3::splat(2.0));
        assert!((b.transformed(&m).max_extent() - 12.0).abs() < 1e-5);
    }

    #[test]
    fn slab_hits_front_face() {
        let b = Aabb::from_half_extents(Vec3::ONE);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        let t = b.intersect(&ray).unwrap();
        assert!((t - 9.0).abs() < 1e-5);
    }

    #[test]
    fn slab_misses_to_the_side() {
        let b = Aabb::from_half_extents(Vec3::ONE);
        let ray = Ray::new(Vec3::new(5.0, 0.0, 10.0), Vec3::NEG_Z);
        assert!(b.intersect(&ray).is_none());
    }

    #[test]
    fn slab_ignores_boxes_behind() {
        let b = Aabb::from_half_extents(Vec3::ONE);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::Z);
        assert!(b.intersect(&ray).is_none());
    }

    #[test]
    fn flat_plane_is_hit() {
        let plane = Geometry::Plane {
            width: 4.0,
            height: 2.0,
        };
        let ray = Ray::new(Vec3::new(1.5, 0.5, 3.0), Vec3::NEG_Z);
        assert!((plane.intersect(&ray).unwrap() - 3.0).abs() < 1e-5);
        let miss = Ray::new(Vec3::new(2.5, 0.0, 3.0), Vec3::NEG_Z);
        assert!(plane.intersect(&miss).is_none());
    }

    #[test]
    fn sphere_is_exact() {
        let sphere = Geometry::Sphere {
            radius: 1.0,
            width_segments: 32,
            height_segments: 16,
        };
        // Grazes the bounding box corner but misses the sphere.
        let corner = Ray::new(Vec3::new(0.95, 0.95, 5.0), Vec3::NEG_Z);
        assert!(sphere.intersect(&corner).is_none());
        let center = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        assert!((sphere.intersect(&center).unwrap() - 4.0).abs() < 1e-5);
    }

    #[test]
    fn ray_through_torus_hole_misses() {
        let torus = Geometry::Torus {
            radius: 10.0,
            tube: 2.5,
            radial_segments: 32,
            tubular_segments: 100,
        };
        let center = Ray::new(Vec3::new(0.0, 0.0, 20.0), Vec3::NEG_Z);
        assert!(torus.intersect(&center).is_none());
        // Inside the bounds but still within the hole.
        let off_center = Ray::new(Vec3::new(0.0, 7.0, 20.0), Vec3::NEG_Z);
        assert!(torus.intersect(&off_center).is_none());
        // Straight through the tube.
        let tube = Ray::new(Vec3::new(10.0, 0.0, 20.0), Vec3::NEG_Z);
        assert!((torus.intersect(&tube).unwrap() - 17.5).abs() < 1e-2);
        // Sideways along the X axis hits the outer rim first.
        let side = Ray::new(Vec3::new(-30.0, 0.0, 0.0), Vec3::X);
        assert!((torus.intersect(&side).unwrap() - 17.5).abs() < 1e-2);
    }

    #[test]
    fn cone_misses_beside_apex() {
        let cone = Geometry::Cylinder {
            radius_top: 0.0,
            radius_bottom: 5.0,
            height: 10.0,
            radial_segments: 32,
        };
        // Near the apex the cone is only 0.5 wide.
        let beside = Ray::new(Vec3::new(1.5, 4.0, 20.0), Vec3::NEG_Z);
        assert!(cone.bounds().intersect(&beside).is_some());
        assert!(cone.intersect(&beside).is_none());
        let lower = Ray::new(Vec3::new(0.0, -4.0, 20.0), Vec3::NEG_Z);
        assert!((cone.intersect(&lower).unwrap() - 15.5).abs() < 1e-4);
        // Up through the base cap.
        let up = Ray::new(Vec3::new(1.0, -20.0, 0.0), Vec3::Y);
        assert!((up.at(cone.intersect(&up).unwrap()).y + 5.0).abs() < 1e-4);
    }

    #[test]
    fn cylinder_hits_cap_and_side() {
        let cylinder = Geometry::Cylinder {
            radius_top: 5.0,
            radius_bottom: 5.0,
            height: 10.0,
            radial_segments: 32,
        };
        let down = Ray::new(Vec3::new(0.0, 20.0, 0.0), Vec3::NEG_Y);
        assert!((cylinder.intersect(&down).unwrap() - 15.0).abs() < 1e-4);
        let side = Ray::new(Vec3::new(0.0, 0.0, 20.0), Vec3::NEG_Z);
        assert!((cylinder.intersect(&side).unwrap() - 15.0).abs() < 1e-4);
        // Clips the box corner at (4.8, 4.8) but never comes within 5 of
        // the axis.
        let corner = Ray::new(Vec3::new(-15.2, 0.0, 24.8), Vec3::new(1.0, 0.0, -1.0));
        assert!(cylinder.bounds().intersect(&corner).is_some());
        assert!(cylinder.intersect(&corner).is_none());
    }

    #[test]
    fn torus_bounds_lie_in_xy() {
        let torus = Geometry::Torus {
            radius: 10.0,
            tube: 2.5,
            radial_segments: 32,
            tubular_segments: 100,
        };
        assert_eq!(torus.bounds().size(), Vec3::new(25.0, 25.0, 5.0));
    }
}
