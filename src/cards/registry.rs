use uuid::Uuid;

use super::{CardDescriptor, CardVisual, ResolvedMedia};
use crate::options::LoadingOptions;
use crate::scene::NodeId;
use crate::thing::{Card, CardType, MediaSource, Thing};

/// Raw card type folded into the variants the registry distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CardClass {
    Image,
    Video,
    ChromaVideo,
    Model,
    SocialMedia,
    Unsupported,
}

impl From<CardType> for CardClass {
    fn from(card_type: CardType) -> Self {
        match card_type {
            CardType::Image => Self::Image,
            CardType::Video => Self::Video,
            CardType::ChromaVideo => Self::ChromaVideo,
            CardType::Model => Self::Model,
            CardType::SocialMedia => Self::SocialMedia,
            CardType::HandTracking
            | CardType::Iframe
            | CardType::MultiMedia
            | CardType::VolumetricVideo
            | CardType::RichText
            | CardType::Unknown => Self::Unsupported,
        }
    }
}

/// Ordered, densely indexed card descriptors for one Thing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardRegistry {
    descriptors: Vec<CardDescriptor>,
}

impl CardRegistry {
    /// Resolve every card of `thing`. Cards without a usable source are
    /// left out and do not consume an index.
    #[must_use]
    pub fn from_thing(thing: &Thing, loading: &LoadingOptions) -> Self {
        let mut descriptors = Vec::with_capacity(thing.cards.len());
        for card in &thing.cards {
            let Some(card_id) = card.uuid() else {
                log::warn!("dropping card with invalid id {:?}", card.id);
                continue;
            };
            match resolve(card, &loading.preferred_model_channel) {
                Some(media) => {
                    log::debug!(
                        "card {card_id} resolved as {} at index {}",
                        media.kind().as_str(),
                        descriptors.len()
                    );
                    descriptors.push(CardDescriptor::new(
                        media,
                        card_id,
                        descriptors.len(),
                    ));
                }
                None => {
                    log::debug!(
                        "card {card_id} ({:?}) has no usable source",
                        card.card_type
                    );
                }
            }
        }
        Self { descriptors }
    }

    /// Descriptors in ring order.
    #[must_use]
    pub fn descriptors(&self) -> &[CardDescriptor] {
        &self.descriptors
    }

    /// Number of resolved cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether no card resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Descriptor at ring index `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&CardDescriptor> {
        self.descriptors.get(index)
    }

    /// First descriptor for `card_id`.
    #[must_use]
    pub fn by_card_id(&self, card_id: Uuid) -> Option<&CardDescriptor> {
        self.descriptors.iter().find(|d| d.card_id == card_id)
    }

    /// Attach the built visual to the descriptor at `index`.
    pub fn set_visual(&mut self, index: usize, visual: CardVisual) {
        if let Some(d) = self.descriptors.get_mut(index) {
            d.visual = Some(visual);
        }
    }

    /// Keep only descriptors matching `keep`, then re-index densely.
    pub fn retain(&mut self, mut keep: impl FnMut(&CardDescriptor) -> bool) {
        self.descriptors.retain(|d| keep(d));
        for (i, d) in self.descriptors.iter_mut().enumerate() {
            d.index = i;
        }
    }

    /// Forget every visual (after the scene nodes were removed).
    pub fn clear_visuals(&mut self) {
        for d in &mut self.descriptors {
            d.visual = None;
        }
    }

    /// Root nodes of every built visual, in ring order.
    pub fn visual_roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.descriptors
            .iter()
            .filter_map(|d| d.visual.as_ref().map(|v| v.root))
    }
}

fn resolve(card: &Card, preferred_channel: &str) -> Option<ResolvedMedia> {
    let primary = match CardClass::from(card.card_type) {
        CardClass::Image => {
            let sources: Vec<String> = card
                .payload
                .sources
                .iter()
                .filter_map(|s| s.valid_url().map(str::to_owned))
                .collect();
            (!sources.is_empty()).then_some(ResolvedMedia::Image { sources })
        }
        CardClass::Video => first_url(card)
            .map(|source| ResolvedMedia::Video { source }),
        CardClass::ChromaVideo => first_url(card)
            .map(|source| ResolvedMedia::ChromaVideo { source }),
        CardClass::Model => card
            .source_on_channel(preferred_channel)
            .and_then(MediaSource::valid_url)
            .or_else(|| {
                card.payload.sources.iter().find_map(MediaSource::valid_url)
            })
            .map(|source| ResolvedMedia::Model {
                source: source.to_owned(),
            }),
        CardClass::SocialMedia | CardClass::Unsupported => None,
    };
    primary.or_else(|| background_fallback(card))
}

/// Only the first source counts; a bad first source is not skipped.
fn first_url(card: &Card) -> Option<String> {
    card.first_source()
        .and_then(MediaSource::valid_url)
        .map(str::to_owned)
}

fn background_fallback(card: &Card) -> Option<ResolvedMedia> {
    let image = card
        .image_background
        .as_ref()
        .and_then(MediaSource::valid_url)
        .or_else(|| {
            card.video_background
                .as_ref()
                .and_then(MediaSource::poster)
                .and_then(MediaSource::valid_url)
        });
    if let Some(url) = image {
        return Some(ResolvedMedia::Image {
            sources: vec![url.to_owned()],
        });
    }
    card.video_background
        .as_ref()
        .and_then(MediaSource::valid_url)
        .map(|url| ResolvedMedia::Video {
            source: url.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thing::CardPayload;

    const ID_A: &str = "6eb624ac-4c3d-4f8a-abb2-f91f9555d0b5";
    const ID_B: &str = "0ad0e9a3-6e9b-4d7a-af0a-fbef39f71b7d";
    const ID_C: &str = "9b2e43f4-1f6c-4c39-8f55-1a3b6c2f8e11";

    fn card(id: &str, card_type: CardType, urls: &[&str]) -> Card {
        Card {
            id: id.to_owned(),
            card_type,
            payload: CardPayload {
                sources: urls.iter().map(|u| MediaSource::from_url(*u)).collect(),
                poster: None,
            },
            ..Card::default()
        }
    }

    fn registry(cards: Vec<Card>) -> CardRegistry {
        let thing = Thing {
            cards,
            ..Thing::default()
        };
        CardRegistry::from_thing(&thing, &LoadingOptions::default())
    }

    #[test]
    fn image_card_stacks_valid_sources_in_order() {
        let reg = registry(vec![card(
            ID_A,
            CardType::Image,
            &["https://cdn/1.png", "ftp://bad", "https://cdn/2.png"],
        )]);
        assert_eq!(
            reg.get(0).unwrap().media,
            ResolvedMedia::Image {
                sources: vec![
                    "https://cdn/1.png".to_owned(),
                    "https://cdn/2.png".to_owned()
                ]
            }
        );
    }

    #[test]
    fn video_card_uses_first_source_only() {
        let reg = registry(vec![card(
            ID_A,
            CardType::Video,
            &["https://cdn/1.mp4", "https://cdn/2.mp4"],
        )]);
        assert_eq!(reg.len(), 1);
        assert_eq!(
            reg.get(0).unwrap().media,
            ResolvedMedia::Video {
                source: "https://cdn/1.mp4".to_owned()
            }
        );
    }

    #[test]
    fn model_card_prefers_channel() {
        let mut c = card(ID_A, CardType::Model, &[]);
        c.payload.sources = vec![
            MediaSource {
                channel: Some("ios".to_owned()),
                ..MediaSource::from_url("https://cdn/m.usdz")
            },
            MediaSource {
                channel: Some("web".to_owned()),
                ..MediaSource::from_url("https://cdn/m.glb")
            },
        ];
        let mut other = card(ID_B, CardType::Model, &["https://cdn/any.glb"]);
        other.payload.sources[0].channel = Some("android".to_owned());
        let reg = registry(vec![c, other]);
        assert_eq!(
            reg.get(0).unwrap().media,
            ResolvedMedia::Model {
                source: "https://cdn/m.glb".to_owned()
            }
        );
        assert_eq!(
            reg.get(1).unwrap().media,
            ResolvedMedia::Model {
                source: "https://cdn/any.glb".to_owned()
            }
        );
    }

    #[test]
    fn unsupported_cards_fall_back_to_backgrounds() {
        let mut with_image = card(ID_A, CardType::Iframe, &[]);
        with_image.image_background =
            Some(MediaSource::from_url("https://cdn/bg.png"));

        let mut with_poster = card(ID_B, CardType::SocialMedia, &[]);
        with_poster.video_background = Some(MediaSource {
            posters: vec![MediaSource::from_url("https://cdn/poster.jpg")],
            ..MediaSource::from_url("https://cdn/bg.mp4")
        });

        let mut with_video = card(ID_C, CardType::RichText, &[]);
        with_video.video_background =
            Some(MediaSource::from_url("https://cdn/bg.mp4"));

        let reg = registry(vec![with_image, with_poster, with_video]);
        assert_eq!(
            reg.get(0).unwrap().media,
            ResolvedMedia::Image {
                sources: vec!["https://cdn/bg.png".to_owned()]
            }
        );
        assert_eq!(
            reg.get(1).unwrap().media,
            ResolvedMedia::Image {
                sources: vec!["https://cdn/poster.jpg".to_owned()]
            }
        );
        assert_eq!(
            reg.get(2).unwrap().media,
            ResolvedMedia::Video {
                source: "https://cdn/bg.mp4".to_owned()
            }
        );
    }

    #[test]
    fn unresolvable_cards_do_not_consume_an_index() {
        let reg = registry(vec![
            card(ID_A, CardType::Iframe, &[]),
            card("not-a-uuid", CardType::Image, &["https://cdn/x.png"]),
            card(ID_B, CardType::Image, &["https://cdn/1.png"]),
            card(ID_C, CardType::Video, &["javascript:alert(1)"]),
        ]);
        assert_eq!(reg.len(), 1);
        let only = reg.get(0).unwrap();
        assert_eq!(only.index, 0);
        assert_eq!(only.card_id.to_string(), ID_B);
    }

    #[test]
    fn retain_reindexes_densely() {
        let mut reg = registry(vec![
            card(ID_A, CardType::Image, &["https://cdn/1.png"]),
            card(ID_B, CardType::Image, &["https://cdn/2.png"]),
            card(ID_C, CardType::Image, &["https://cdn/3.png"]),
        ]);
        let dropped = reg.get(1).unwrap().card_id;
        reg.retain(|d| d.card_id != dropped);
        let indices: Vec<usize> =
            reg.descriptors().iter().map(|d| d.index).collect();
        assert_eq!(indices, vec![0, 1]);
        assert!(reg.by_card_id(dropped).is_none());
    }

    #[test]
    fn registry_does_not_mutate_thing() {
        let thing = Thing {
            cards: vec![card(ID_A, CardType::Iframe, &[])],
            ..Thing::default()
        };
        let before = thing.clone();
        let _ = CardRegistry::from_thing(&thing, &LoadingOptions::default());
        assert_eq!(thing, before);
    }
}
