//! Crate-level error types.

use std::fmt;

use uuid::Uuid;

/// Failure reported by an [`AssetLoader`](crate::assets::AssetLoader).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// Transport failure (DNS, connection, HTTP status).
    Network(String),
    /// The payload arrived but could not be decoded.
    Decode(String),
    /// The loader does not handle this kind of asset or URL.
    Unsupported(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "network error: {msg}"),
            Self::Decode(msg) => write!(f, "decode error: {msg}"),
            Self::Unsupported(msg) => write!(f, "unsupported asset: {msg}"),
        }
    }
}

impl std::error::Error for LoadError {}

/// Errors produced by the ring-carousel crate.
#[derive(Debug)]
pub enum CarouselError {
    /// The Thing document could not be fetched.
    ThingLoad(LoadError),
    /// The Thing document is not valid JSON for the expected shape.
    ThingParse(String),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// `init` was called on an instance that already ran it.
    AlreadyInitialized,
    /// A transition or query needs `init` to have completed.
    NotInitialized,
    /// A transition was requested from a state that does not allow it.
    InvalidTransition {
        /// Requested action name.
        action: &'static str,
        /// State the controller was in.
        state: &'static str,
    },
    /// No card visual exists for this card id.
    UnknownCard(Uuid),
    /// The surface index to keep is outside the card's surface stack.
    SurfaceOutOfRange {
        /// Card being condensed.
        card: Uuid,
        /// Requested surface index.
        index: usize,
        /// Number of surfaces in the stack.
        count: usize,
    },
}

impl fmt::Display for CarouselError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ThingLoad(e) => write!(f, "thing load error: {e}"),
            Self::ThingParse(msg) => write!(f, "thing parse error: {msg}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::AlreadyInitialized => {
                write!(f, "carousel is already initialized")
            }
            Self::NotInitialized => write!(f, "carousel is not initialized"),
            Self::InvalidTransition { action, state } => {
                write!(f, "cannot {action} while {state}")
            }
            Self::UnknownCard(id) => write!(f, "no card visual for {id}"),
            Self::SurfaceOutOfRange { card, index, count } => write!(
                f,
                "surface {index} out of range for card {card} ({count} \
                 surfaces)"
            ),
        }
    }
}

impl std::error::Error for CarouselError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ThingLoad(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LoadError> for CarouselError {
    fn from(e: LoadError) -> Self {
        Self::ThingLoad(e)
    }
}

impl From<std::io::Error> for CarouselError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for CarouselError {
    fn from(e: serde_json::Error) -> Self {
        Self::ThingParse(e.to_string())
    }
}
