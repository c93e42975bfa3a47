use uuid::Uuid;

use super::CardVisual;

/// Closed set of card variants the carousel knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardKind {
    /// Stacked still images.
    Image,
    /// A single looping video.
    Video,
    /// A chroma-keyed video billboard.
    ChromaVideo,
    /// A 3D model.
    Model,
}

impl CardKind {
    /// Lowercase name for logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::ChromaVideo => "chroma-video",
            Self::Model => "model",
        }
    }
}

/// A card's media after source resolution and URL validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedMedia {
    /// Valid image URLs in source order; never empty.
    Image {
        /// Image URLs.
        sources: Vec<String>,
    },
    /// Video URL.
    Video {
        /// Video URL.
        source: String,
    },
    /// Chroma-keyed video URL.
    ChromaVideo {
        /// Video URL.
        source: String,
    },
    /// Model URL.
    Model {
        /// Model URL.
        source: String,
    },
}

impl ResolvedMedia {
    /// Variant tag.
    #[must_use]
    pub fn kind(&self) -> CardKind {
        match self {
            Self::Image { .. } => CardKind::Image,
            Self::Video { .. } => CardKind::Video,
            Self::ChromaVideo { .. } => CardKind::ChromaVideo,
            Self::Model { .. } => CardKind::Model,
        }
    }
}

/// One displayable card and its position in the ring.
#[derive(Debug, Clone, PartialEq)]
pub struct CardDescriptor {
    /// Resolved media.
    pub media: ResolvedMedia,
    /// Parsed card id.
    pub card_id: Uuid,
    /// Position in the ring, `0..N` with no gaps.
    pub index: usize,
    /// Visual subtree, present once assets loaded and the card was built.
    pub visual: Option<CardVisual>,
}

impl CardDescriptor {
    /// Descriptor without a visual.
    #[must_use]
    pub fn new(media: ResolvedMedia, card_id: Uuid, index: usize) -> Self {
        Self {
            media,
            card_id,
            index,
            visual: None,
        }
    }

    /// Variant tag.
    #[must_use]
    pub fn kind(&self) -> CardKind {
        self.media.kind()
    }
}
