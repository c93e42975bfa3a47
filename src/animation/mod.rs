//! Reveal, reverse and card selection animation.
//!
//! - [`easing`] - interpolation curves
//! - [`tween`] - per-property tweens and the scheduler that steps them
//! - [`state`] - the discrete carousel state
//! - [`controller`] - guarded transitions that turn state changes into tweens

pub mod controller;
pub mod easing;
pub mod state;
pub mod tween;

pub use controller::AnimationController;
pub use easing::EasingFunction;
pub use state::AnimationState;
pub use tween::{Tween, TweenEvent, TweenId, TweenScheduler, TweenValue};
