use glam::{Mat3, Mat4, Quat, Vec3};

use super::geometry::Geometry;
use crate::assets::AssetHandle;

/// Stable handle to a node in a [`SceneGraph`](super::SceneGraph).
///
/// Handles are weak: once the node is removed, lookups return `None`.
/// Slots are reused, so a handle must not outlive the subtree it points
/// into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Raw slot index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Local transform relative to the parent node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Translation.
    pub position: Vec3,
    /// Orientation.
    pub rotation: Quat,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Transform {
    /// No translation, rotation or scale.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Local matrix (scale, then rotate, then translate).
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.scale,
            self.rotation,
            self.position,
        )
    }

    /// Orient the local +Z axis toward `target` (given in the parent's
    /// space), keeping `up` as close to +Y as possible.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        let forward = (target - self.position).normalize_or_zero();
        if forward == Vec3::ZERO {
            return;
        }
        let mut right = up.cross(forward);
        if right.length_squared() < 1e-8 {
            // Looking straight along `up`; pick any perpendicular.
            right = forward.any_orthonormal_vector();
        }
        let right = right.normalize();
        let true_up = forward.cross(right);
        self.rotation =
            Quat::from_mat3(&Mat3::from_cols(right, true_up, forward));
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Surface appearance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Base color, `None` for texture-only materials.
    pub color: Option<[f32; 3]>,
    /// Texture or video frame source.
    pub map: Option<AssetHandle>,
    /// Alpha in `0.0..=1.0`.
    pub opacity: f32,
    /// Whether `opacity` takes effect.
    pub transparent: bool,
    /// Whether the surface is drawn (and pickable) at all.
    pub visible: bool,
    /// Draw back faces too.
    pub double_sided: bool,
}

impl Material {
    /// Opaque single-sided colored material.
    #[must_use]
    pub fn colored(color: [f32; 3]) -> Self {
        Self {
            color: Some(color),
            ..Self::default()
        }
    }

    /// Transparent double-sided textured material, used for card surfaces.
    #[must_use]
    pub fn textured(map: AssetHandle) -> Self {
        Self {
            map: Some(map),
            transparent: true,
            double_sided: true,
            ..Self::default()
        }
    }

    /// Opacity as the renderer sees it: hidden surfaces contribute nothing.
    #[must_use]
    pub fn effective_opacity(&self) -> f32 {
        if self.visible {
            self.opacity
        } else {
            0.0
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: None,
            map: None,
            opacity: 1.0,
            transparent: false,
            visible: true,
            double_sided: false,
        }
    }
}

/// Renderable payload of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mesh {
    /// Shape.
    pub geometry: Geometry,
    /// Appearance.
    pub material: Material,
}

/// One node of the scene graph: a group when `mesh` is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Debug name.
    pub name: String,
    /// Local transform.
    pub transform: Transform,
    /// Hides the node and its whole subtree.
    pub visible: bool,
    /// Renderable payload.
    pub mesh: Option<Mesh>,
    pub(super) parent: Option<NodeId>,
    pub(super) children: Vec<NodeId>,
}

impl Node {
    /// Empty group node.
    #[must_use]
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::IDENTITY,
            visible: true,
            mesh: None,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Mesh node.
    #[must_use]
    pub fn mesh(
        name: impl Into<String>,
        geometry: Geometry,
        material: Material,
    ) -> Self {
        Self {
            mesh: Some(Mesh { geometry, material }),
            ..Self::group(name)
        }
    }

    /// Builder: set the local position.
    #[must_use]
    pub fn at(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    /// Builder: set the local transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Parent node, `None` for detached nodes and the root.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Direct children in insertion order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Material of a mesh node.
    #[must_use]
    pub fn material(&self) -> Option<&Material> {
        self.mesh.as_ref().map(|m| &m.material)
    }

    /// Mutable material of a mesh node.
    pub fn material_mut(&mut self) -> Option<&mut Material> {
        self.mesh.as_mut().map(|m| &mut m.material)
    }
}
