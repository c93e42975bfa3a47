//! Card classification, descriptors and scene visuals.
//!
//! A [`CardRegistry`] is built from the Thing's raw cards once per
//! `init()`. It owns one [`CardDescriptor`] per displayable card, in ring
//! order, and each descriptor holds a weak handle to the card's visual
//! subtree once it has been built.

mod descriptor;
mod registry;
mod visual;

pub use descriptor::{CardDescriptor, CardKind, ResolvedMedia};
pub use registry::CardRegistry;
pub use visual::{build_card_visual, CardVisual};
