// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Loads and transitions run on the single frame thread.
#![allow(clippy::future_not_send)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Function signature hygiene
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Ring carousel controller for heterogeneous 3D media cards.
//!
//! A [`Thing`](thing::Thing) document describes a central shape and a list
//! of media cards (images, videos, chroma-keyed videos, 3D models). The
//! [`Carousel`](carousel::Carousel) turns that document into a scene: it
//! resolves the cards into a dense descriptor list, loads their assets,
//! lays them out on a ring around the shape, and drives the reveal,
//! reverse, restart, expand and condense transitions with time-based
//! tweens. Screen-space clicks resolve back to card identities through
//! ray casting.
//!
//! # Key entry points
//!
//! - [`carousel::Carousel`] - the controller façade (`init`, transitions,
//!   picking, per-frame `update`)
//! - [`thing::Thing`] - the input document
//! - [`assets::AssetLoader`] - the async loader collaborator contract
//! - [`scene::SceneGraph`] - the arena scene graph the carousel writes to
//! - [`options::CarouselOptions`] - runtime configuration (layout, timing,
//!   colors, loading)
//!
//! # Architecture
//!
//! Everything runs on the single thread that drives frames. `init` is the
//! only suspension point: the shape and the card assets load through the
//! [`assets::AssetLoader`], card loads fanned out with a bounded
//! concurrency limit and isolated per card. After that, the host calls
//! [`Carousel::update`](carousel::Carousel::update) once per displayed
//! frame, which advances the [`animation::tween::TweenScheduler`] and feeds
//! completion events into the
//! [`animation::controller::AnimationController`] state machine.

pub mod animation;
pub mod assets;
pub mod camera;
pub mod cards;
pub mod carousel;
pub mod error;
pub mod layout;
pub mod options;
pub mod picking;
pub mod scene;
pub mod shape;
pub mod thing;
pub mod util;

pub use carousel::Carousel;
pub use error::CarouselError;
