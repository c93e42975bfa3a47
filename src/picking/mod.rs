//! Ray-cast picking: normalized screen point to card or Thing identity.

mod pick_map;
mod ray;

use glam::{Vec2, Vec3};
pub use pick_map::{CardTag, PickMap, PickTag, PickTarget};
pub use ray::{pixel_to_ndc, pointer_ray};

use crate::camera::Camera;
use crate::scene::{NodeId, SceneGraph};

/// Resolved pick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    /// Identity of the picked object.
    pub target: PickTarget,
    /// Mesh node under the pointer.
    pub node: NodeId,
    /// World-space distance from the camera.
    pub distance: f32,
    /// World-space hit point.
    pub point: Vec3,
}

/// Stateless picking query over a scene and its side table.
pub struct PickingService<'a> {
    scene: &'a SceneGraph,
    pick_map: &'a PickMap,
}

impl<'a> PickingService<'a> {
    /// Query over `scene` using `pick_map` for identities.
    #[must_use]
    pub fn new(scene: &'a SceneGraph, pick_map: &'a PickMap) -> Self {
        Self { scene, pick_map }
    }

    /// Pick the object under `ndc`. Only the nearest intersection is
    /// considered; `None` when it is untagged or nothing is hit.
    #[must_use]
    pub fn pick(&self, camera: &Camera, ndc: Vec2) -> Option<PickHit> {
        let ray = pointer_ray(camera, ndc);
        let nearest = self.scene.raycast(&ray).into_iter().next()?;
        let target = self.pick_map.resolve(self.scene, nearest.node)?;
        Some(PickHit {
            target,
            node: nearest.node,
            distance: nearest.distance,
            point: nearest.point,
        })
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::scene::{Geometry, Material, Node};

    fn camera() -> Camera {
        Camera {
            eye: Vec3::new(0.0, 0.0, 20.0),
            target: Vec3::ZERO,
            ..Camera::default()
        }
    }

    fn plane() -> Node {
        Node::mesh(
            "surface",
            Geometry::Plane {
                width: 4.0,
                height: 4.0,
            },
            Material::default(),
        )
    }

    #[test]
    fn miss_returns_none() {
        let scene = SceneGraph::new();
        let map = PickMap::new();
        assert!(PickingService::new(&scene, &map)
            .pick(&camera(), Vec2::ZERO)
            .is_none());
    }

    #[test]
    fn hit_reports_nearest_card_identity() {
        let mut scene = SceneGraph::new();
        let card = scene.insert_child(scene.root(), Node::group("card"));
        let surface = scene.insert_child(card, plane());
        let behind = scene.insert_child(
            scene.root(),
            plane().at(Vec3::new(0.0, 0.0, -5.0)),
        );
        let mut map = PickMap::new();
        let card_id = Uuid::from_u128(42);
        map.tag_card(card, None, card_id, 0);
        map.tag_thing(behind, Some(Uuid::from_u128(9)));

        let hit = PickingService::new(&scene, &map)
            .pick(&camera(), Vec2::ZERO)
            .unwrap();
        assert_eq!(hit.node, surface);
        assert_eq!(hit.target.card_id(), Some(card_id));
        assert!((hit.distance - 20.0).abs() < 1e-3);
        assert!(hit.point.length() < 1e-3);
    }

    #[test]
    fn untagged_nearest_hit_is_no_result() {
        let mut scene = SceneGraph::new();
        let _ = scene.insert_child(scene.root(), plane());
        let tagged = scene.insert_child(
            scene.root(),
            plane().at(Vec3::new(0.0, 0.0, -5.0)),
        );
        let mut map = PickMap::new();
        map.tag_thing(tagged, Some(Uuid::from_u128(9)));
        assert!(PickingService::new(&scene, &map)
            .pick(&camera(), Vec2::ZERO)
            .is_none());
    }
}
