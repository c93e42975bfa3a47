//! Per-frame update and teardown.

use std::f32::consts::PI;
use std::time::Duration;

use glam::Vec3;

use super::{Carousel, Renderer};
use crate::animation::AnimationState;
use crate::assets::AssetLoader;
use crate::scene::Node;

impl<L: AssetLoader, R: Renderer> Carousel<L, R> {
    /// Per-frame tick using the wall clock.
    pub fn update(&mut self) {
        let dt = self.clock.tick();
        self.update_with_elapsed(dt);
    }

    /// Per-frame tick with an explicit elapsed time.
    ///
    /// Tweens always advance. While a transition is playing nothing else
    /// changes; otherwise billboards turn toward the camera and, with
    /// `distance_fade` enabled, cards fade with distance from the
    /// camera-facing side of the ring.
    pub fn update_with_elapsed(&mut self, dt: Duration) {
        self.controller.advance(dt, &mut self.scene);
        if self.controller.is_animating() || self.group.is_none() {
            return;
        }

        self.face_billboards();

        let forward = self.camera.world_direction();
        let theta = forward.x.atan2(forward.z) + PI;
        self.facing = Vec3::new(theta.sin(), 0.0, theta.cos());

        let revealed = matches!(
            self.controller.state(),
            AnimationState::Open | AnimationState::CardExpanded
        );
        if self.options.animation.distance_fade && revealed {
            self.apply_distance_fade();
        }
    }

    /// Remove every node the carousel added, drop all tweens and tags, and
    /// reject any further transition.
    pub fn dispose(&mut self) {
        if self.controller.state() == AnimationState::Disposed {
            return;
        }
        let roots: Vec<_> = self
            .registry
            .visual_roots()
            .chain(self.shape)
            .chain(self.group)
            .collect();
        let removed: usize = roots.into_iter().map(|n| self.scene.remove(n)).sum();
        self.pick_map.clear();
        self.registry.clear_visuals();
        self.controller.dispose();
        self.group = None;
        self.shape = None;
        log::info!("carousel disposed ({removed} nodes removed)");
    }

    fn face_billboards(&mut self) {
        let eye = self.camera.eye;
        let billboards: Vec<_> = self
            .registry
            .descriptors()
            .iter()
            .filter_map(|d| d.visual.as_ref())
            .filter(|v| v.billboard)
            .map(|v| v.root)
            .collect();
        for root in billboards {
            let parent_world = self
                .scene
                .node(root)
                .and_then(Node::parent)
                .map(|p| self.scene.world_matrix(p));
            let Some(parent_world) = parent_world else {
                continue;
            };
            let target = parent_world.inverse().transform_point3(eye);
            if let Some(node) = self.scene.node_mut(root) {
                node.transform.look_at(target, Vec3::Y);
            }
        }
    }

    fn apply_distance_fade(&mut self) {
        let reference = self.facing;
        let cards: Vec<_> = self
            .registry
            .descriptors()
            .iter()
            .filter_map(|d| d.visual.as_ref())
            .map(|v| {
                let position = self
                    .scene
                    .node(v.root)
                    .map_or(Vec3::ZERO, |n| n.transform.position);
                (position.distance(reference), v.surfaces.clone())
            })
            .collect();
        let (min, max) = cards.iter().fold(
            (f32::INFINITY, f32::NEG_INFINITY),
            |(lo, hi), (d, _)| (lo.min(*d), hi.max(*d)),
        );
        let span = max - min;
        for (distance, surfaces) in cards {
            let opacity = if span > f32::EPSILON {
                1.0 - (distance - min) / span
            } else {
                1.0
            };
            for s in surfaces {
                if let Some(m) =
                    self.scene.node_mut(s).and_then(Node::material_mut)
                {
                    m.opacity = opacity;
                }
            }
        }
    }
}
