//! Perspective camera used for picking rays and camera-facing cards.
//!
//! The host owns camera motion (orbit controls, resize); the carousel only
//! reads the eye position and view direction.

/// Core camera struct.
pub mod core;

pub use self::core::Camera;
