//! The carousel controller.
//!
//! [`Carousel`] owns the scene it builds into, the camera it picks with
//! and the collaborators it loads through. Its methods are split across
//! files by concern:
//!
//! - `construction` - `new` and the async `init`
//! - `animation` - reveal, reverse, restart, expand and condense
//! - `queries` - picking
//! - `frame` - the per-frame update and `dispose`

mod animation;
mod construction;
mod frame;
mod queries;

use glam::Vec3;

use crate::animation::{AnimationController, AnimationState};
use crate::assets::AssetLoader;
use crate::camera::Camera;
use crate::cards::CardRegistry;
use crate::layout::RingLayout;
use crate::options::CarouselOptions;
use crate::picking::PickMap;
use crate::scene::{NodeId, SceneGraph};
use crate::thing::Thing;
use crate::util::frame_timing::FrameClock;

/// Renderer collaborator: the only renderer operation the carousel needs.
pub trait Renderer {
    /// Set the color the frame is cleared to.
    fn set_clear_color(&mut self, rgb: [f32; 3], alpha: f32);
}

/// Ring carousel for one Thing.
pub struct Carousel<L: AssetLoader, R: Renderer> {
    thing: Thing,
    renderer: R,
    scene: SceneGraph,
    camera: Camera,
    loader: L,
    options: CarouselOptions,
    registry: CardRegistry,
    layout: RingLayout,
    pick_map: PickMap,
    controller: AnimationController,
    /// Group holding the shape and the cards; `None` before `init`.
    group: Option<NodeId>,
    shape: Option<NodeId>,
    clock: FrameClock,
    facing: Vec3,
}

impl<L: AssetLoader, R: Renderer> Carousel<L, R> {
    /// The scene the carousel builds into.
    #[must_use]
    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    /// Mutable scene, for host-owned nodes (lights, backdrop).
    pub fn scene_mut(&mut self) -> &mut SceneGraph {
        &mut self.scene
    }

    /// The picking camera.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Mutable camera, for host orbit controls and resizes.
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// The renderer collaborator.
    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The source document.
    #[must_use]
    pub fn thing(&self) -> &Thing {
        &self.thing
    }

    /// Active options.
    #[must_use]
    pub fn options(&self) -> &CarouselOptions {
        &self.options
    }

    /// Resolved cards, in ring order.
    #[must_use]
    pub fn registry(&self) -> &CardRegistry {
        &self.registry
    }

    /// Ring layout of the resolved cards.
    #[must_use]
    pub fn layout(&self) -> &RingLayout {
        &self.layout
    }

    /// Current animation state.
    #[must_use]
    pub fn state(&self) -> AnimationState {
        self.controller.state()
    }

    /// Whether a transition is playing (frame effects frozen).
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.controller.is_animating()
    }

    /// Whether the cards were last collapsed by a reverse.
    #[must_use]
    pub fn is_reversed(&self) -> bool {
        self.controller.is_reversed()
    }

    /// Card whose surfaces are fanned out.
    #[must_use]
    pub fn selected_card(&self) -> Option<uuid::Uuid> {
        self.controller.selected_card()
    }

    /// Central shape root, once initialized.
    #[must_use]
    pub fn shape(&self) -> Option<NodeId> {
        self.shape
    }

    /// Camera-facing reference direction from the last frame update.
    #[must_use]
    pub fn facing_direction(&self) -> Vec3 {
        self.facing
    }
}
