//! Guarded carousel transitions.
//!
//! Each transition starts a set of tweens and remembers their ids. The
//! transition settles once every one of them has reported completion;
//! while any is pending the controller is "animating" and frame effects
//! stay frozen. The shape's bob is never part of a transition.

use glam::Vec3;
use rustc_hash::FxHashSet;
use uuid::Uuid;

use super::easing::EasingFunction;
use super::state::AnimationState;
use super::tween::{
    CompletionAction, Repeat, Tween, TweenEvent, TweenId, TweenScheduler,
    TweenValue,
};
use crate::cards::{CardRegistry, CardVisual};
use crate::error::CarouselError;
use crate::layout::RingLayout;
use crate::options::{AnimationOptions, LayoutOptions};
use crate::scene::{Node, NodeId, SceneGraph};

/// Scene nodes and layout the transitions operate on.
pub struct Stage<'a> {
    /// Group holding the shape and every card; attached on start.
    pub group: NodeId,
    /// Central shape root.
    pub shape: NodeId,
    /// Cards with their visuals.
    pub cards: &'a CardRegistry,
    /// Resting ring layout.
    pub ring: &'a RingLayout,
}

/// State machine for reveal, reverse, restart, expand and condense.
pub struct AnimationController {
    timing: AnimationOptions,
    shape_size: f32,
    card_height: f32,
    state: AnimationState,
    tweens: TweenScheduler,
    pending: FxHashSet<TweenId>,
    reversed: bool,
    selected: Option<Uuid>,
    expanding: Option<Uuid>,
}

impl AnimationController {
    /// Controller in [`AnimationState::Idle`].
    #[must_use]
    pub fn new(timing: &AnimationOptions, layout: &LayoutOptions) -> Self {
        Self {
            timing: timing.clone(),
            shape_size: layout.shape_size,
            card_height: layout.card_height,
            state: AnimationState::Idle,
            tweens: TweenScheduler::new(),
            pending: FxHashSet::default(),
            reversed: false,
            selected: None,
            expanding: None,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> AnimationState {
        self.state
    }

    /// Whether a transition is still playing.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Whether the last settled global transition was a reverse.
    #[must_use]
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Card whose surfaces are fanned out, once the expand settled.
    #[must_use]
    pub fn selected_card(&self) -> Option<Uuid> {
        self.selected
    }

    /// The tween scheduler (including the perpetual shape bob).
    #[must_use]
    pub fn scheduler(&self) -> &TweenScheduler {
        &self.tweens
    }

    /// Reveal the carousel: Idle → Opening. Calls after the first are
    /// no-ops.
    ///
    /// The shape grows from zero to its natural scale over D1 and then
    /// bobs forever; every card grows from the origin to its ring slot
    /// over D2 while its surfaces fade in.
    pub fn start(&mut self, scene: &mut SceneGraph, stage: &Stage<'_>) -> Result<(), CarouselError> {
        match self.state {
            AnimationState::Idle => {}
            AnimationState::Disposed => return Err(self.reject("start")),
            _ => {
                log::debug!("start ignored, already {}", self.state);
                return Ok(());
            }
        }

        let root = scene.root();
        scene.attach(stage.group, root);

        let (natural, base_y) = scene
            .node(stage.shape)
            .map_or((Vec3::ONE, 0.0), |n| (n.transform.scale, n.transform.position.y));
        if let Some(n) = scene.node_mut(stage.shape) {
            n.transform.scale = Vec3::ZERO;
        }
        scene.attach(stage.shape, stage.group);
        let d1 = self.timing.shape_duration();
        let bob = Tween::new(stage.shape, TweenValue::PositionY(base_y + self.shape_size), d1)
            .yoyo(true)
            .repeat(Repeat::Infinite);
        self.track(Tween::new(stage.shape, TweenValue::Scale(natural), d1).chain(bob), scene);

        for d in stage.cards.descriptors() {
            let (Some(visual), Some(slot)) = (&d.visual, stage.ring.transform(d.index)) else {
                continue;
            };
            if let Some(n) = scene.node_mut(visual.root) {
                n.transform.scale = Vec3::ZERO;
                n.transform.position = Vec3::ZERO;
                n.transform.rotation = slot.rotation;
            }
            for &s in &visual.surfaces {
                set_opacity(scene, s, 0.0);
            }
            scene.attach(visual.root, stage.group);
        }
        self.play_forward(scene, stage);

        log::info!("carousel reveal started ({} cards)", stage.cards.len());
        self.enter(AnimationState::Opening);
        Ok(())
    }

    /// Collapse every card to the center: Open → Closing → Closed.
    ///
    /// Tween targets are taken from the current transforms, over D1.
    pub fn reverse(&mut self, scene: &mut SceneGraph, stage: &Stage<'_>) -> Result<(), CarouselError> {
        if self.state != AnimationState::Open {
            return Err(self.reject("reverse_animation"));
        }
        let d1 = self.timing.shape_duration();
        for visual in visuals(stage.cards) {
            self.track(Tween::new(visual.root, TweenValue::Scale(Vec3::ZERO), d1), scene);
            self.track(Tween::new(visual.root, TweenValue::Position(Vec3::ZERO), d1), scene);
            for &s in &visual.surfaces {
                self.track(Tween::new(s, TweenValue::Opacity(0.0), d1), scene);
            }
        }
        log::info!("carousel reverse started");
        self.enter(AnimationState::Closing);
        Ok(())
    }

    /// Replay the reveal of the cards: Closed → Opening → Open.
    pub fn restart(&mut self, scene: &mut SceneGraph, stage: &Stage<'_>) -> Result<(), CarouselError> {
        if self.state != AnimationState::Closed {
            return Err(self.reject("restart_animation"));
        }
        self.play_forward(scene, stage);
        log::info!("carousel restart started");
        self.enter(AnimationState::Opening);
        Ok(())
    }

    /// Fan a card's surfaces out vertically: Open → CardExpanded.
    ///
    /// Every surface fades in from zero and rises to
    /// `card_height × (count − 1 − i)`, so the first surface ends highest.
    pub fn expand(
        &mut self,
        scene: &mut SceneGraph,
        card_id: Uuid,
        visual: &CardVisual,
    ) -> Result<(), CarouselError> {
        if self.state != AnimationState::Open {
            return Err(self.reject("card_expand"));
        }
        let duration = self.timing.card_select_duration();
        let count = visual.surfaces.len();
        for (i, &s) in visual.surfaces.iter().enumerate() {
            if let Some(m) = scene.node_mut(s).and_then(Node::material_mut) {
                m.opacity = 0.0;
                m.visible = true;
            }
            self.track(Tween::new(s, TweenValue::Opacity(1.0), duration), scene);
            let height = self.card_height * (count - 1 - i) as f32;
            self.track(
                Tween::new(s, TweenValue::PositionY(height), duration)
                    .easing(EasingFunction::ElasticIn),
                scene,
            );
        }
        log::debug!("expanding card {card_id} ({count} surfaces)");
        self.expanding = Some(card_id);
        self.enter(AnimationState::CardExpanded);
        Ok(())
    }

    /// Fold an expanded card back, keeping surface `keep`:
    /// CardExpanded → CardCondensing → Open.
    ///
    /// Every other surface fades out and is then hidden with its opacity
    /// reset to 1; every surface drops back to offset 0.
    pub fn condense(
        &mut self,
        scene: &mut SceneGraph,
        card_id: Uuid,
        visual: &CardVisual,
        keep: usize,
    ) -> Result<(), CarouselError> {
        if self.state != AnimationState::CardExpanded || self.is_animating() {
            return Err(self.reject("card_condense"));
        }
        if self.selected != Some(card_id) {
            return Err(CarouselError::UnknownCard(card_id));
        }
        let count = visual.surfaces.len();
        if keep >= count {
            return Err(CarouselError::SurfaceOutOfRange {
                card: card_id,
                index: keep,
                count,
            });
        }
        let duration = self.timing.card_select_duration();
        for (i, &s) in visual.surfaces.iter().enumerate() {
            if i != keep {
                self.track(
                    Tween::new(s, TweenValue::Opacity(0.0), duration)
                        .on_complete(CompletionAction::HideAndResetOpacity),
                    scene,
                );
            }
            self.track(
                Tween::new(s, TweenValue::PositionY(0.0), duration)
                    .easing(EasingFunction::ElasticIn),
                scene,
            );
        }
        log::debug!("condensing card {card_id}, keeping surface {keep}");
        self.enter(AnimationState::CardCondensing);
        Ok(())
    }

    /// Step every tween by `dt` and settle the transition once its last
    /// tween completes.
    pub fn advance(&mut self, dt: std::time::Duration, scene: &mut SceneGraph) {
        let was_animating = self.is_animating();
        for event in self.tweens.advance(dt, scene) {
            let TweenEvent::Completed(id) = event;
            let _ = self.pending.remove(&id);
        }
        if was_animating && !self.is_animating() {
            self.settle();
        }
    }

    /// Drop every tween and reject all further transitions.
    pub fn dispose(&mut self) {
        self.tweens.clear();
        self.pending.clear();
        self.selected = None;
        self.expanding = None;
        self.enter(AnimationState::Disposed);
    }

    // -- internals --

    fn play_forward(&mut self, scene: &SceneGraph, stage: &Stage<'_>) {
        let d2 = self.timing.card_duration();
        for d in stage.cards.descriptors() {
            let (Some(visual), Some(slot)) = (&d.visual, stage.ring.position(d.index)) else {
                continue;
            };
            self.track(Tween::new(visual.root, TweenValue::Scale(Vec3::ONE), d2), scene);
            self.track(Tween::new(visual.root, TweenValue::Position(slot), d2), scene);
            for &s in &visual.surfaces {
                self.track(Tween::new(s, TweenValue::Opacity(1.0), d2), scene);
            }
        }
    }

    fn track(&mut self, tween: Tween, scene: &SceneGraph) {
        let id = self.tweens.start(tween, scene);
        let _ = self.pending.insert(id);
    }

    fn enter(&mut self, next: AnimationState) {
        log::debug!("animation state {} -> {next}", self.state);
        self.state = next;
        // A transition with nothing to animate settles at once.
        if !self.is_animating() && next != AnimationState::Disposed {
            self.settle();
        }
    }

    fn settle(&mut self) {
        let next = match self.state {
            AnimationState::Opening => {
                self.reversed = false;
                AnimationState::Open
            }
            AnimationState::Closing => {
                self.reversed = true;
                AnimationState::Closed
            }
            AnimationState::CardExpanded => {
                self.selected = self.expanding.take();
                return;
            }
            AnimationState::CardCondensing => {
                self.selected = None;
                AnimationState::Open
            }
            _ => return,
        };
        log::debug!("animation state {} -> {next}", self.state);
        self.state = next;
    }

    fn reject(&self, action: &'static str) -> CarouselError {
        log::warn!("{action} rejected in state {}", self.state);
        CarouselError::InvalidTransition {
            action,
            state: self.state.name(),
        }
    }
}

fn visuals(cards: &CardRegistry) -> impl Iterator<Item = &CardVisual> {
    cards.descriptors().iter().filter_map(|d| d.visual.as_ref())
}

fn set_opacity(scene: &mut SceneGraph, node: NodeId, opacity: f32) {
    if let Some(m) = scene.node_mut(node).and_then(Node::material_mut) {
        m.opacity = opacity;
    }
}
