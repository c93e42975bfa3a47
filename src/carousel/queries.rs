//! Picking queries.

use glam::Vec2;

use super::{Carousel, Renderer};
use crate::assets::AssetLoader;
use crate::picking::{PickHit, PickingService};

impl<L: AssetLoader, R: Renderer> Carousel<L, R> {
    /// Identify the card (or the Thing) under a normalized device point.
    /// `None` when nothing tagged is hit. Never mutates state.
    #[must_use]
    pub fn get_object_data_at_point(&self, point: Vec2) -> Option<PickHit> {
        let hit = PickingService::new(&self.scene, &self.pick_map)
            .pick(&self.camera, point)?;
        log::debug!("picked {:?} at {:.2}", hit.target, hit.distance);
        Some(hit)
    }
}
