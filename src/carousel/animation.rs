//! Transition entry points.

use uuid::Uuid;

use super::{Carousel, Renderer};
use crate::animation::controller::Stage;
use crate::assets::AssetLoader;
use crate::cards::CardVisual;
use crate::error::CarouselError;
use crate::scene::NodeId;

impl<L: AssetLoader, R: Renderer> Carousel<L, R> {
    /// Reveal the shape and the cards. Idempotent.
    pub fn start_animation(&mut self) -> Result<(), CarouselError> {
        let (group, shape) = self.stage_nodes()?;
        let stage = Stage {
            group,
            shape,
            cards: &self.registry,
            ring: &self.layout,
        };
        self.controller.start(&mut self.scene, &stage)
    }

    /// Collapse the cards back to the center.
    pub fn reverse_animation(&mut self) -> Result<(), CarouselError> {
        let (group, shape) = self.stage_nodes()?;
        let stage = Stage {
            group,
            shape,
            cards: &self.registry,
            ring: &self.layout,
        };
        self.controller.reverse(&mut self.scene, &stage)
    }

    /// Replay the card reveal after a reverse.
    pub fn restart_animation(&mut self) -> Result<(), CarouselError> {
        let (group, shape) = self.stage_nodes()?;
        let stage = Stage {
            group,
            shape,
            cards: &self.registry,
            ring: &self.layout,
        };
        self.controller.restart(&mut self.scene, &stage)
    }

    /// Fan out the surfaces of card `card_id`.
    pub fn card_expand(&mut self, card_id: Uuid) -> Result<(), CarouselError> {
        let visual = self.card_visual(card_id)?;
        self.controller.expand(&mut self.scene, card_id, &visual)
    }

    /// Fold card `card_id` back, keeping surface `keep_index` visible.
    pub fn card_condense(
        &mut self,
        card_id: Uuid,
        keep_index: usize,
    ) -> Result<(), CarouselError> {
        let visual = self.card_visual(card_id)?;
        self.controller
            .condense(&mut self.scene, card_id, &visual, keep_index)
    }

    fn stage_nodes(&self) -> Result<(NodeId, NodeId), CarouselError> {
        self.group
            .zip(self.shape)
            .ok_or(CarouselError::NotInitialized)
    }

    fn card_visual(&self, card_id: Uuid) -> Result<CardVisual, CarouselError> {
        if self.group.is_none() {
            return Err(CarouselError::NotInitialized);
        }
        self.registry
            .by_card_id(card_id)
            .and_then(|d| d.visual.clone())
            .ok_or(CarouselError::UnknownCard(card_id))
    }
}
