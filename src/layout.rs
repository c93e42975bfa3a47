//! Ring layout: one angle per resolved card and a radius wide enough that
//! adjacent cards never overlap.

use std::f32::consts::{PI, TAU};

use glam::{Quat, Vec3};

use crate::options::LayoutOptions;
use crate::scene::Transform;

/// Angles and radius of the card ring.
#[derive(Debug, Clone, PartialEq)]
pub struct RingLayout {
    /// Ring radius in world units.
    pub radius: f32,
    /// Angle of each card around +Y, indexed by descriptor index.
    pub angles: Vec<f32>,
    /// Height of card centers above the ring plane.
    pub elevation: f32,
}

impl RingLayout {
    /// Layout for `count` resolved cards.
    ///
    /// With fewer than two cards there is no neighbor to clear, so the
    /// radius is the shape-relative floor.
    #[must_use]
    pub fn compute(count: usize, options: &LayoutOptions) -> Self {
        let min_radius = options.min_radius();
        let radius = if count >= 2 {
            let chord = (options.card_width + options.card_gap) / 2.0;
            (chord / (PI / count as f32).sin()).max(min_radius)
        } else {
            min_radius
        };
        let step = if count == 0 { 0.0 } else { TAU / count as f32 };
        let angles = (0..count).map(|i| i as f32 * step).collect();
        log::debug!("ring layout: {count} cards, radius {radius:.2}");
        Self {
            radius,
            angles,
            elevation: options.card_height * 0.5,
        }
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.angles.len()
    }

    /// Whether the ring has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.angles.is_empty()
    }

    /// Resting position of card `index`, or `None` past the last slot.
    #[must_use]
    pub fn position(&self, index: usize) -> Option<Vec3> {
        let angle = *self.angles.get(index)?;
        Some(Vec3::new(
            self.radius * angle.sin(),
            self.elevation,
            self.radius * angle.cos(),
        ))
    }

    /// Resting transform of card `index`: on the ring, facing outward.
    #[must_use]
    pub fn transform(&self, index: usize) -> Option<Transform> {
        let position = self.position(index)?;
        Some(Transform {
            position,
            rotation: Quat::from_rotation_y(self.angles[index]),
            scale: Vec3::ONE,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_cards_no_angles() {
        let layout = RingLayout::compute(0, &LayoutOptions::default());
        assert!(layout.is_empty());
        assert!(layout.position(0).is_none());
        assert!(layout.radius.is_finite());
    }

    #[test]
    fn single_card_uses_min_radius() {
        let layout = RingLayout::compute(1, &LayoutOptions::default());
        assert_eq!(layout.angles, vec![0.0]);
        assert!((layout.radius - 15.0).abs() < 1e-6);
    }

    #[test]
    fn four_cards_match_reference_layout() {
        let layout = RingLayout::compute(4, &LayoutOptions::default());
        let expected = [0.0, PI / 2.0, PI, 3.0 * PI / 2.0];
        for (a, e) in layout.angles.iter().zip(expected) {
            assert!((a - e).abs() < 1e-6);
        }
        let chord = (16.0_f32 + 16.0 / 3.0) / 2.0;
        let expected_radius = chord / (PI / 4.0).sin();
        assert!((layout.radius - expected_radius).abs() < 1e-4);
        assert!((layout.radius - 15.085).abs() < 1e-2);
    }

    #[test]
    fn angles_are_distinct_steps_for_any_count() {
        let options = LayoutOptions::default();
        for n in 2..40 {
            let layout = RingLayout::compute(n, &options);
            assert_eq!(layout.len(), n);
            let step = TAU / n as f32;
            for (i, a) in layout.angles.iter().enumerate() {
                assert!((a - i as f32 * step).abs() < 1e-5);
            }
            assert!(layout.radius >= options.min_radius());
            assert!(layout.radius.is_finite());
        }
    }

    #[test]
    fn many_cards_grow_the_ring() {
        let options = LayoutOptions::default();
        let small = RingLayout::compute(4, &options);
        let large = RingLayout::compute(24, &options);
        assert!(large.radius > small.radius);
        // Adjacent card centers are at least one card plus gap apart.
        let a = large.position(0).unwrap();
        let b = large.position(1).unwrap();
        assert!(a.distance(b) >= options.card_width + options.card_gap - 1e-3);
    }

    #[test]
    fn cards_face_outward() {
        let layout = RingLayout::compute(4, &LayoutOptions::default());
        let t = layout.transform(1).unwrap();
        let normal = t.rotation * Vec3::Z;
        let outward = (t.position * Vec3::new(1.0, 0.0, 1.0)).normalize();
        assert!((normal - outward).length() < 1e-5);
        assert_eq!(t.position.y, 10.0);
    }
}
