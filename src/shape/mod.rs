//! Central shape construction.
//!
//! Parametric presets are built at the configured size with fixed
//! tessellation; custom models are loaded and uniformly scaled so their
//! largest extent matches. Any failure degrades to the default sphere.

use glam::Vec3;
use crate::assets::{AssetLoader, ModelAsset};
use crate::options::{ColorOptions, LayoutOptions};
use crate::picking::PickMap;
use crate::scene::{Geometry, Material, Node, NodeId, SceneGraph};
use crate::thing::{MediaSource, ShapePreset, Thing};

/// Parametric geometry for `preset` at `size`. `None` for presets that are
/// not parametric.
#[must_use]
pub fn preset_geometry(preset: ShapePreset, size: f32) -> Option<Geometry> {
    let geometry = match preset {
        ShapePreset::Sphere => sphere(size),
        ShapePreset::Cube => Geometry::Cuboid {
            size: Vec3::splat(size),
        },
        ShapePreset::Cylinder => Geometry::Cylinder {
            radius_top: size * 0.5,
            radius_bottom: size * 0.5,
            height: size,
            radial_segments: 32,
        },
        ShapePreset::Cone => Geometry::Cylinder {
            radius_top: 0.0,
            radius_bottom: size * 0.5,
            height: size,
            radial_segments: 32,
        },
        ShapePreset::Torus => Geometry::Torus {
            radius: size,
            tube: size * 0.25,
            radial_segments: 32,
            tubular_segments: 100,
        },
        ShapePreset::CustomModel | ShapePreset::Unknown => return None,
    };
    Some(geometry)
}

fn sphere(size: f32) -> Geometry {
    Geometry::Sphere {
        radius: size,
        width_segments: 32,
        height_segments: 16,
    }
}

/// Builds the Thing's central shape into the scene.
pub struct ShapeBuilder<'a> {
    layout: &'a LayoutOptions,
    colors: &'a ColorOptions,
}

impl<'a> ShapeBuilder<'a> {
    /// Builder using the given sizes and fallback colors.
    #[must_use]
    pub fn new(layout: &'a LayoutOptions, colors: &'a ColorOptions) -> Self {
        Self { layout, colors }
    }

    /// Build the shape of `thing`. The returned root is inserted detached
    /// (it is attached and revealed later) and tagged with the Thing id.
    /// Never fails.
    pub async fn build<L: AssetLoader + ?Sized>(
        &self,
        scene: &mut SceneGraph,
        pick_map: &mut PickMap,
        thing: &Thing,
        loader: &L,
    ) -> NodeId {
        let root = scene.insert(Node::group("shape"));
        let thing_id = thing.uuid();

        let model = if thing.shape_preset == ShapePreset::CustomModel {
            self.load_custom_model(thing, loader).await
        } else {
            None
        };

        match model {
            Some(model) => self.add_model(scene, root, &model),
            None => self.add_parametric(scene, root, thing),
        }

        for node in scene.descendants(root) {
            pick_map.tag_thing(node, thing_id);
        }
        root
    }

    async fn load_custom_model<L: AssetLoader + ?Sized>(
        &self,
        thing: &Thing,
        loader: &L,
    ) -> Option<ModelAsset> {
        let Some(url) = thing
            .shape_options
            .custom_model
            .as_ref()
            .and_then(MediaSource::valid_url)
        else {
            log::warn!("custom-model shape without a valid URL, using sphere");
            return None;
        };
        match loader.load_model(url).await {
            Ok(model) => Some(model),
            Err(e) => {
                log::warn!("shape model {url} failed to load ({e}), using sphere");
                None
            }
        }
    }

    fn add_parametric(&self, scene: &mut SceneGraph, root: NodeId, thing: &Thing) {
        let size = self.layout.shape_size;
        let geometry = preset_geometry(thing.shape_preset, size).unwrap_or_else(|| {
            if thing.shape_preset == ShapePreset::Unknown {
                log::warn!("unknown shape preset, using sphere");
            }
            sphere(size)
        });
        let mut material =
            Material::colored(self.colors.mesh_rgb(thing.colors.primary.as_deref()));
        material.transparent = true;
        let _ = scene.insert_child(root, Node::mesh("shape-mesh", geometry, material));
    }

    fn add_model(&self, scene: &mut SceneGraph, root: NodeId, model: &ModelAsset) {
        for mesh in &model.meshes {
            let material = Material {
                map: Some(model.handle),
                ..Material::default()
            };
            let _ = scene.insert_child(
                root,
                Node::mesh(mesh.name.clone(), Geometry::Bounded(mesh.bounds), material)
                    .with_transform(mesh.transform),
            );
        }
        let extent = scene.subtree_bounds(root).max_extent();
        if extent <= f32::EPSILON {
            log::warn!("shape model has no extent, left unscaled");
            return;
        }
        if let Some(node) = scene.node_mut(root) {
            node.transform.scale = Vec3::splat(self.layout.shape_size / extent);
        }
    }
}
