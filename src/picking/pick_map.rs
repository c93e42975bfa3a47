//! Identity side table for scene nodes.

use rustc_hash::FxHashMap;
use uuid::Uuid;

use crate::scene::{NodeId, SceneGraph};

/// Card identity attached to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardTag {
    /// Originating card id.
    pub card_id: Uuid,
    /// Ring index of the card.
    pub index: usize,
}

/// Identity tags of one node. Either part may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PickTag {
    /// Owning Thing.
    pub thing_id: Option<Uuid>,
    /// Card identity, for nodes inside a card visual.
    pub card: Option<CardTag>,
}

/// A typed pick target resolved from the side table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickTarget {
    /// A card surface (or a node inside a model card).
    Card {
        /// Owning Thing, when it has a valid id.
        thing_id: Option<Uuid>,
        /// Card id.
        card_id: Uuid,
        /// Ring index.
        index: usize,
    },
    /// The central shape.
    Thing {
        /// Thing id.
        thing_id: Uuid,
    },
}

impl PickTarget {
    /// Card id for card targets.
    #[must_use]
    pub fn card_id(&self) -> Option<Uuid> {
        match *self {
            Self::Card { card_id, .. } => Some(card_id),
            Self::Thing { .. } => None,
        }
    }
}

/// Maps scene nodes to their identity tags.
///
/// Populated when the shape and card visuals are built, consulted by
/// picking instead of reading metadata off the nodes themselves.
#[derive(Debug, Clone, Default)]
pub struct PickMap {
    tags: FxHashMap<NodeId, PickTag>,
}

impl PickMap {
    /// Empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag `node` as part of the Thing.
    pub fn tag_thing(&mut self, node: NodeId, thing_id: Option<Uuid>) {
        self.tags.entry(node).or_default().thing_id = thing_id;
    }

    /// Tag `node` as part of a card.
    pub fn tag_card(
        &mut self,
        node: NodeId,
        thing_id: Option<Uuid>,
        card_id: Uuid,
        index: usize,
    ) {
        let _ = self.tags.insert(
            node,
            PickTag {
                thing_id,
                card: Some(CardTag { card_id, index }),
            },
        );
    }

    /// Tags of `node`.
    #[must_use]
    pub fn get(&self, node: NodeId) -> Option<&PickTag> {
        self.tags.get(&node)
    }

    /// Resolve `node` and its ancestors (nearest first) to a target. The
    /// nearest card tag wins; otherwise the nearest valid thing tag.
    #[must_use]
    pub fn resolve(
        &self,
        scene: &SceneGraph,
        node: NodeId,
    ) -> Option<PickTarget> {
        let chain = || std::iter::once(node).chain(scene.ancestors(node));
        let card = chain().find_map(|n| {
            let tag = self.get(n)?;
            tag.card.map(|card| PickTarget::Card {
                thing_id: tag.thing_id,
                card_id: card.card_id,
                index: card.index,
            })
        });
        card.or_else(|| {
            chain().find_map(|n| {
                self.get(n)
                    .and_then(|tag| tag.thing_id)
                    .map(|thing_id| PickTarget::Thing { thing_id })
            })
        })
    }

    /// Drop every tag.
    pub fn clear(&mut self) {
        self.tags.clear();
    }

    /// Number of tagged nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Whether no node is tagged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
