//! Construction and async initialization.

use glam::Vec3;
use rustc_hash::FxHashSet;

use super::{Carousel, Renderer};
use crate::animation::{AnimationController, AnimationState};
use crate::assets::{load_card_assets, AssetLoader};
use crate::camera::Camera;
use crate::cards::{build_card_visual, CardRegistry};
use crate::error::CarouselError;
use crate::layout::RingLayout;
use crate::options::CarouselOptions;
use crate::picking::PickMap;
use crate::scene::{Node, SceneGraph};
use crate::shape::ShapeBuilder;
use crate::thing::Thing;
use crate::util::frame_timing::FrameClock;

impl<L: AssetLoader, R: Renderer> Carousel<L, R> {
    /// Carousel for `thing`. Nothing is built until [`Self::init`].
    #[must_use]
    pub fn new(
        thing: Thing,
        renderer: R,
        scene: SceneGraph,
        camera: Camera,
        loader: L,
        options: CarouselOptions,
    ) -> Self {
        let controller =
            AnimationController::new(&options.animation, &options.layout);
        Self {
            thing,
            renderer,
            scene,
            camera,
            loader,
            layout: RingLayout::compute(0, &options.layout),
            options,
            registry: CardRegistry::default(),
            pick_map: PickMap::new(),
            controller,
            group: None,
            shape: None,
            clock: FrameClock::new(),
            facing: Vec3::Z,
        }
    }

    /// Build the shape and the cards.
    ///
    /// Card assets load concurrently (bounded by
    /// `loading.max_concurrent_loads`); a card whose asset fails is dropped
    /// and the rest are re-indexed before layout, so one bad card never
    /// affects the others. Nothing is attached to the scene root until
    /// the reveal starts.
    pub async fn init(&mut self) -> Result<(), CarouselError> {
        if self.controller.state() == AnimationState::Disposed {
            return Err(CarouselError::InvalidTransition {
                action: "init",
                state: AnimationState::Disposed.name(),
            });
        }
        if self.group.is_some() {
            return Err(CarouselError::AlreadyInitialized);
        }

        let background = self
            .options
            .colors
            .background_rgb(self.thing.colors.background.as_deref());
        self.renderer.set_clear_color(background, 1.0);

        let group = self.scene.insert(Node::group("carousel"));
        let shape = ShapeBuilder::new(&self.options.layout, &self.options.colors)
            .build(&mut self.scene, &mut self.pick_map, &self.thing, &self.loader)
            .await;

        let mut registry =
            CardRegistry::from_thing(&self.thing, &self.options.loading);
        let results = load_card_assets(
            &self.loader,
            registry.descriptors(),
            self.options.loading.max_concurrent_loads,
        )
        .await;

        let mut assets = Vec::with_capacity(results.len());
        let mut failed = FxHashSet::default();
        for (descriptor, result) in registry.descriptors().iter().zip(results) {
            match result {
                Ok(asset) => assets.push(asset),
                Err(e) => {
                    log::warn!(
                        "card {} ({}) dropped: {e}",
                        descriptor.card_id,
                        descriptor.kind().as_str()
                    );
                    let _ = failed.insert(descriptor.index);
                }
            }
        }
        registry.retain(|d| !failed.contains(&d.index));

        let layout = RingLayout::compute(registry.len(), &self.options.layout);
        let thing_id = self.thing.uuid();
        for (index, asset) in assets.iter().enumerate() {
            let Some(descriptor) = registry.get(index) else {
                continue;
            };
            let visual = build_card_visual(
                &mut self.scene,
                &mut self.pick_map,
                descriptor,
                asset,
                &self.options.layout,
                thing_id,
            );
            registry.set_visual(index, visual);
        }

        log::info!(
            "carousel initialized: {} cards, ring radius {:.2}",
            registry.len(),
            layout.radius
        );
        self.registry = registry;
        self.layout = layout;
        self.group = Some(group);
        self.shape = Some(shape);
        Ok(())
    }
}
