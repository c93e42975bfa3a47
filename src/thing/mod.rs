//! The Thing document: one carousel's central shape, colors and cards.
//!
//! Field names follow the JSON wire format (`camelCase`). Every field is
//! optional on the wire; a malformed card is dropped with a warning rather
//! than failing the whole document.

pub mod validate;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::assets::AssetLoader;
use crate::error::CarouselError;

/// Preset for the central shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapePreset {
    /// Loaded from `shapeOptions.customModel.cdnUrl`.
    CustomModel,
    /// UV sphere.
    Sphere,
    /// Axis-aligned cube.
    Cube,
    /// Cylinder standing on the Y axis.
    Cylinder,
    /// Cone standing on the Y axis.
    Cone,
    /// Torus in the XY plane.
    Torus,
    /// Anything else; built as the default sphere.
    #[default]
    #[serde(other)]
    Unknown,
}

/// Raw card type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CardType {
    /// One or more still images.
    Image,
    /// A video; only the first source is used.
    Video,
    /// A chroma-keyed video rendered as a camera-facing billboard.
    ChromaVideo,
    /// A 3D model.
    Model,
    /// Social media embed.
    SocialMedia,
    /// Hand tracking experience.
    HandTracking,
    /// Embedded web page.
    Iframe,
    /// Mixed media.
    MultiMedia,
    /// Volumetric video.
    VolumetricVideo,
    /// Rich text.
    RichText,
    /// Unrecognized tag.
    #[default]
    #[serde(other)]
    Unknown,
}

/// One deliverable asset reference.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MediaSource {
    /// Delivery URL.
    pub cdn_url: Option<String>,
    /// Delivery-channel tag (e.g. `web`, `ios`, `android`).
    #[serde(rename = "type")]
    pub channel: Option<String>,
    /// MIME type of the payload.
    pub mime_type: Option<String>,
    /// Poster images for video sources.
    pub posters: Vec<MediaSource>,
}

impl MediaSource {
    /// Source pointing at `url` with no channel tag.
    #[must_use]
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            cdn_url: Some(url.into()),
            ..Self::default()
        }
    }

    /// The delivery URL if it passes validation.
    #[must_use]
    pub fn valid_url(&self) -> Option<&str> {
        validate::valid_url(self.cdn_url.as_deref())
    }

    /// First poster with a valid URL.
    #[must_use]
    pub fn poster(&self) -> Option<&MediaSource> {
        self.posters.iter().find(|p| p.valid_url().is_some())
    }
}

/// Type-specific card payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CardPayload {
    /// Ordered asset sources.
    pub sources: Vec<MediaSource>,
    /// Poster image (volumetric video).
    pub poster: Option<MediaSource>,
}

/// One media item to place on the ring.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Card {
    /// Card UUID as written in the document.
    pub id: String,
    /// Card type tag.
    pub card_type: CardType,
    /// Type-specific payload.
    pub payload: CardPayload,
    /// Card-level image fallback.
    pub image_background: Option<MediaSource>,
    /// Card-level video fallback.
    pub video_background: Option<MediaSource>,
}

impl Card {
    /// The card id if it is a valid UUID.
    #[must_use]
    pub fn uuid(&self) -> Option<Uuid> {
        validate::parse_uuid(&self.id)
    }

    /// First payload source.
    #[must_use]
    pub fn first_source(&self) -> Option<&MediaSource> {
        self.payload.sources.first()
    }

    /// First source on `channel`.
    #[must_use]
    pub fn source_on_channel(&self, channel: &str) -> Option<&MediaSource> {
        self.payload
            .sources
            .iter()
            .find(|s| s.channel.as_deref() == Some(channel))
    }
}

/// Options for the custom-model shape preset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShapeOptions {
    /// Model source used by [`ShapePreset::CustomModel`].
    pub custom_model: Option<MediaSource>,
}

/// Document colors as hex strings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThingColors {
    /// Shape material color.
    pub primary: Option<String>,
    /// Renderer clear color.
    pub background: Option<String>,
}

/// Top-level document describing one carousel's shape and cards.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Thing {
    /// Thing UUID as written in the document.
    pub id: String,
    /// Central shape preset.
    pub shape_preset: ShapePreset,
    /// Custom model options.
    pub shape_options: ShapeOptions,
    /// Colors.
    pub colors: ThingColors,
    /// Ordered cards.
    #[serde(deserialize_with = "lenient_cards")]
    pub cards: Vec<Card>,
}

impl Thing {
    /// Parse a Thing from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, CarouselError> {
        let thing: Self = serde_json::from_str(json)?;
        log::debug!(
            "parsed thing {} ({:?}, {} cards)",
            thing.id,
            thing.shape_preset,
            thing.cards.len()
        );
        Ok(thing)
    }

    /// Fetch and parse a Thing document. Any failure is fatal.
    pub async fn fetch<L: AssetLoader + ?Sized>(
        loader: &L,
        url: &str,
    ) -> Result<Self, CarouselError> {
        let body = loader.fetch_document(url).await?;
        Self::from_json(&body)
    }

    /// The thing id if it is a valid UUID.
    #[must_use]
    pub fn uuid(&self) -> Option<Uuid> {
        validate::parse_uuid(&self.id)
    }
}

/// Deserialize cards one by one, dropping the ones that do not parse.
fn lenient_cards<'de, D>(deserializer: D) -> Result<Vec<Card>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?
        .unwrap_or_default();
    Ok(raw
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| match serde_json::from_value::<Card>(value) {
            Ok(card) => Some(card),
            Err(e) => {
                log::warn!("dropping malformed card #{i}: {e}");
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r##"{
        "id": "bff130d0-66f0-4296-a57a-0aaae12d2ad0",
        "shapePreset": "torus",
        "shapeOptions": { "customModel": { "cdnUrl": "https://cdn/x.glb" } },
        "colors": { "primary": "#ff0000", "background": "#000" },
        "cards": [
            {
                "id": "6eb624ac-4c3d-4f8a-abb2-f91f9555d0b5",
                "cardType": "image",
                "payload": { "sources": [
                    { "cdnUrl": "https://cdn/a.png", "type": "web", "mimeType": "image/png" }
                ] }
            },
            { "id": 12, "cardType": ["broken"] },
            { "id": "0ad0e9a3-6e9b-4d7a-af0a-fbef39f71b7d", "cardType": "iframe" }
        ]
    }"##;

    #[test]
    fn parses_wire_format() {
        let thing = Thing::from_json(DOC).unwrap();
        assert_eq!(thing.shape_preset, ShapePreset::Torus);
        assert_eq!(thing.colors.primary.as_deref(), Some("#ff0000"));
        assert!(thing.uuid().is_some());
        assert_eq!(
            thing.shape_options.custom_model.unwrap().valid_url(),
            Some("https://cdn/x.glb")
        );
    }

    #[test]
    fn malformed_cards_are_dropped() {
        let thing = Thing::from_json(DOC).unwrap();
        assert_eq!(thing.cards.len(), 2);
        assert_eq!(thing.cards[0].card_type, CardType::Image);
        assert_eq!(thing.cards[1].card_type, CardType::Iframe);
        let source = thing.cards[0].first_source().unwrap();
        assert_eq!(source.channel.as_deref(), Some("web"));
        assert_eq!(source.mime_type.as_deref(), Some("image/png"));
    }

    #[test]
    fn unknown_tags_fall_back() {
        let thing = Thing::from_json(
            r#"{ "shapePreset": "dodecahedron",
                 "cards": [ { "cardType": "hologram" } ] }"#,
        )
        .unwrap();
        assert_eq!(thing.shape_preset, ShapePreset::Unknown);
        assert_eq!(thing.cards[0].card_type, CardType::Unknown);
        assert!(thing.uuid().is_none());
    }

    #[test]
    fn null_cards_is_empty() {
        let thing = Thing::from_json(r#"{ "cards": null }"#).unwrap();
        assert!(thing.cards.is_empty());
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let err = Thing::from_json("{ not json").unwrap_err();
        assert!(matches!(err, CarouselError::ThingParse(_)));
    }

    #[test]
    fn source_by_channel() {
        let card = Card {
            payload: CardPayload {
                sources: vec![
                    MediaSource {
                        channel: Some("ios".to_owned()),
                        ..MediaSource::from_url("https://cdn/a.usdz")
                    },
                    MediaSource {
                        channel: Some("web".to_owned()),
                        ..MediaSource::from_url("https://cdn/a.glb")
                    },
                ],
                poster: None,
            },
            ..Card::default()
        };
        assert_eq!(
            card.source_on_channel("web").and_then(MediaSource::valid_url),
            Some("https://cdn/a.glb")
        );
        assert!(card.source_on_channel("android").is_none());
    }
}
