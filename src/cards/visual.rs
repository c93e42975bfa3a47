use glam::Vec3;
use uuid::Uuid;

use super::CardDescriptor;
use crate::assets::{AssetHandle, CardAsset, ModelAsset};
use crate::options::LayoutOptions;
use crate::picking::PickMap;
use crate::scene::{Geometry, Material, Node, NodeId, SceneGraph, Transform};

/// Scene nodes of one built card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardVisual {
    /// Card root group; ring transforms are written here.
    pub root: NodeId,
    /// Surfaces whose opacity and vertical offset animate, in stack order.
    /// For model cards these are the model's meshes.
    pub surfaces: Vec<NodeId>,
    /// Rotated toward the camera every frame instead of facing outward.
    pub billboard: bool,
}

/// Plane size that fits an image of `width × height` inside the card:
/// landscape images span the card width, portrait ones the card height.
#[must_use]
pub fn fit_surface(width: u32, height: u32, layout: &LayoutOptions) -> (f32, f32) {
    if width == 0 || height == 0 {
        return (layout.card_width, layout.card_height);
    }
    let aspect = width as f32 / height as f32;
    if aspect >= 1.0 {
        (layout.card_width, layout.card_width / aspect)
    } else {
        (layout.card_height * aspect, layout.card_height)
    }
}

/// Build the visual subtree of `descriptor` from its loaded asset. The root
/// is inserted detached; it is attached to the carousel when the reveal
/// starts. Every node of the subtree is tagged in `pick_map`.
pub fn build_card_visual(
    scene: &mut SceneGraph,
    pick_map: &mut PickMap,
    descriptor: &CardDescriptor,
    asset: &CardAsset,
    layout: &LayoutOptions,
    thing_id: Option<Uuid>,
) -> CardVisual {
    let root = scene.insert(Node::group(format!(
        "card-{}-{}",
        descriptor.index,
        descriptor.kind().as_str()
    )));

    let (surfaces, billboard) = match asset {
        CardAsset::Image(textures) => {
            let surfaces = textures
                .iter()
                .enumerate()
                .map(|(i, t)| {
                    add_surface(scene, root, i, t.handle, (t.width, t.height), layout)
                })
                .collect();
            (surfaces, false)
        }
        CardAsset::Video(video) => {
            let surface = add_surface(
                scene,
                root,
                0,
                video.handle,
                (video.width, video.height),
                layout,
            );
            (vec![surface], false)
        }
        CardAsset::ChromaVideo(video) => {
            let surface = add_surface(
                scene,
                root,
                0,
                video.handle,
                (video.width, video.height),
                layout,
            );
            (vec![surface], true)
        }
        CardAsset::Model(model) => {
            let target = layout.card_height * layout.model_card_fraction;
            (add_model(scene, root, model, target), false)
        }
    };

    for node in scene.descendants(root) {
        pick_map.tag_card(node, thing_id, descriptor.card_id, descriptor.index);
    }

    log::debug!(
        "built {} card {} with {} surface(s)",
        descriptor.kind().as_str(),
        descriptor.card_id,
        surfaces.len()
    );

    CardVisual {
        root,
        surfaces,
        billboard,
    }
}

/// Surface `index` of a stack: only the first starts visible; later ones
/// sit behind it along the card's local depth axis.
fn add_surface(
    scene: &mut SceneGraph,
    parent: NodeId,
    index: usize,
    map: AssetHandle,
    (width, height): (u32, u32),
    layout: &LayoutOptions,
) -> NodeId {
    let (w, h) = fit_surface(width, height, layout);
    let mut material = Material::textured(map);
    material.visible = index == 0;
    let node = Node::mesh(
        format!("surface-{index}"),
        Geometry::Plane {
            width: w,
            height: h,
        },
        material,
    )
    .at(Vec3::new(0.0, 0.0, -layout.surface_spacing * index as f32));
    scene.insert_child(parent, node)
}

/// Insert the model under a scaling group so its largest extent equals
/// `target_extent`. Returns the mesh nodes.
fn add_model(
    scene: &mut SceneGraph,
    parent: NodeId,
    model: &ModelAsset,
    target_extent: f32,
) -> Vec<NodeId> {
    let holder = scene.insert_child(parent, Node::group("model"));
    let meshes: Vec<NodeId> = model
        .meshes
        .iter()
        .map(|mesh| {
            let material = Material {
                map: Some(model.handle),
                transparent: true,
                ..Material::default()
            };
            let node = Node::mesh(
                mesh.name.clone(),
                Geometry::Bounded(mesh.bounds),
                material,
            )
            .with_transform(mesh.transform);
            scene.insert_child(holder, node)
        })
        .collect();

    let extent = scene.subtree_bounds(holder).max_extent();
    if extent > f32::EPSILON {
        if let Some(node) = scene.node_mut(holder) {
            node.transform = Transform {
                scale: Vec3::splat(target_extent / extent),
                ..Transform::IDENTITY
            };
        }
    }
    meshes
}
