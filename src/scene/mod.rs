//! Arena scene graph shared between the carousel and the host renderer.
//!
//! Nodes live in a flat slot vector and refer to each other by
//! [`NodeId`]. The carousel inserts its shape and card subtrees, writes
//! transforms and material opacity every frame, and ray casts against mesh
//! bounds for picking. The host renders whatever is attached under
//! [`SceneGraph::root`].

pub mod geometry;
mod node;

use glam::{Mat4, Vec3};
pub use geometry::{Aabb, Geometry, Ray};
pub use node::{Material, Mesh, Node, NodeId, Transform};

/// A ray hit against a mesh node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Mesh node that was hit.
    pub node: NodeId,
    /// World-space distance from the ray origin.
    pub distance: f32,
    /// World-space hit point.
    pub point: Vec3,
}

/// The scene graph. Owns every node; the root is a group that is never
/// removed.
pub struct SceneGraph {
    nodes: Vec<Option<Node>>,
    free: Vec<u32>,
    root: NodeId,
    /// Monotonically increasing generation; bumped on any mutation.
    generation: u64,
    /// Generation that was last consumed by the renderer.
    rendered_generation: u64,
}

impl SceneGraph {
    /// Create a scene holding only the root group.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Some(Node::group("scene"))],
            free: Vec::new(),
            root: NodeId(0),
            generation: 0,
            rendered_generation: 0,
        }
    }

    /// The root group.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    // -- Mutation helpers --

    fn invalidate(&mut self) {
        self.generation += 1;
    }

    /// Whether scene data changed since last `mark_rendered()`.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.generation != self.rendered_generation
    }

    /// Mark current generation as rendered (call after drawing).
    pub fn mark_rendered(&mut self) {
        self.rendered_generation = self.generation;
    }

    // -- Node management --

    /// Insert a detached node. Any parent/children set on `node` are
    /// ignored.
    pub fn insert(&mut self, mut node: Node) -> NodeId {
        node.parent = None;
        node.children.clear();
        self.invalidate();
        if let Some(slot) = self.free.pop() {
            self.nodes[slot as usize] = Some(node);
            NodeId(slot)
        } else {
            self.nodes.push(Some(node));
            NodeId((self.nodes.len() - 1) as u32)
        }
    }

    /// Insert a node as the last child of `parent`.
    pub fn insert_child(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = self.insert(node);
        self.attach(id, parent);
        id
    }

    /// Re-parent `child` under `parent`. No-op if either is missing, if
    /// they are the same node, or if `parent` lies inside `child`'s
    /// subtree.
    pub fn attach(&mut self, child: NodeId, parent: NodeId) {
        if child == parent
            || !self.contains(child)
            || !self.contains(parent)
            || self.ancestors(parent).any(|a| a == child)
        {
            return;
        }
        self.detach(child);
        if let Some(p) = self.node_slot_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.node_slot_mut(child) {
            c.parent = Some(parent);
        }
        self.invalidate();
    }

    /// Unlink `id` from its parent. The subtree stays alive.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.node(id).and_then(Node::parent) else {
            return;
        };
        if let Some(p) = self.node_slot_mut(parent) {
            p.children.retain(|&c| c != id);
        }
        if let Some(n) = self.node_slot_mut(id) {
            n.parent = None;
        }
        self.invalidate();
    }

    /// Remove `id` and its whole subtree. Returns the number of nodes
    /// removed. The root cannot be removed.
    pub fn remove(&mut self, id: NodeId) -> usize {
        if id == self.root || !self.contains(id) {
            return 0;
        }
        self.detach(id);
        let doomed = self.descendants(id);
        for &n in &doomed {
            self.nodes[n.index()] = None;
            self.free.push(n.0);
        }
        self.invalidate();
        doomed.len()
    }

    /// Whether `id` refers to a live node.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.get(id.index()).is_some_and(Option::is_some)
    }

    /// Number of live nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Whether only the root exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    /// Read access to a node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    /// Write access (invalidates the render generation).
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.invalidate();
        self.node_slot_mut(id)
    }

    fn node_slot_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Direct children of `id` (empty if missing).
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.node(id) {
            Some(node) => node.children(),
            None => &[],
        }
    }

    /// Ancestors of `id`, nearest first, excluding `id` itself.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.node(id).and_then(Node::parent), |&p| {
            self.node(p).and_then(Node::parent)
        })
    }

    /// `id` and every node below it, depth-first pre-order.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.contains(id) {
            return out;
        }
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.children(n).iter().rev().copied());
        }
        out
    }

    /// Mesh nodes in `id`'s subtree, pre-order.
    #[must_use]
    pub fn mesh_descendants(&self, id: NodeId) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|&n| self.node(n).is_some_and(|node| node.mesh.is_some()))
            .collect()
    }

    /// Whether `id` is reachable from the root.
    #[must_use]
    pub fn is_attached(&self, id: NodeId) -> bool {
        id == self.root || self.ancestors(id).any(|a| a == self.root)
    }

    // -- Spatial queries --

    /// Local-to-world matrix.
    #[must_use]
    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let Some(node) = self.node(id) else {
            return Mat4::IDENTITY;
        };
        let local = node.transform.matrix();
        match node.parent {
            Some(parent) => self.world_matrix(parent) * local,
            None => local,
        }
    }

    /// World-space position of the node's origin.
    #[must_use]
    pub fn world_position(&self, id: NodeId) -> Vec3 {
        self.world_matrix(id).transform_point3(Vec3::ZERO)
    }

    /// Bounds of every mesh in `id`'s subtree, expressed in the space of
    /// `id`'s parent (so `id`'s own transform is included).
    #[must_use]
    pub fn subtree_bounds(&self, id: NodeId) -> Aabb {
        let Some(node) = self.node(id) else {
            return Aabb::EMPTY;
        };
        let mut bounds = node
            .mesh
            .map_or(Aabb::EMPTY, |m| m.geometry.bounds());
        for &child in node.children() {
            bounds = bounds.union(&self.subtree_bounds(child));
        }
        bounds.transformed(&node.transform.matrix())
    }

    /// Cast `ray` (world space) against every visible mesh attached under
    /// the root. Hits are sorted nearest first.
    #[must_use]
    pub fn raycast(&self, ray: &Ray) -> Vec<Intersection> {
        let mut hits = Vec::new();
        self.raycast_node(self.root, Mat4::IDENTITY, ray, &mut hits);
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    fn raycast_node(
        &self,
        id: NodeId,
        parent_world: Mat4,
        ray: &Ray,
        hits: &mut Vec<Intersection>,
    ) {
        let Some(node) = self.node(id) else {
            return;
        };
        if !node.visible {
            return;
        }
        let world = parent_world * node.transform.matrix();
        if let Some(mesh) = node.mesh.filter(|m| m.material.visible) {
            // Collapsed (zero-scale) nodes cannot be hit.
            let inverse = world.inverse();
            if world.determinant() != 0.0 && inverse.is_finite() {
                let local_ray = ray.transformed(&inverse);
                if let Some(t) = mesh.geometry.intersect(&local_ray) {
                    let point = world.transform_point3(local_ray.at(t));
                    hits.push(Intersection {
                        node: id,
                        distance: (point - ray.origin).length(),
                        point,
                    });
                }
            }
        }
        for &child in node.children() {
            self.raycast_node(child, world, ray, hits);
        }
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Node {
        Node::mesh(
            "box",
            Geometry::Cuboid {
                size: Vec3::splat(2.0),
            },
            Material::default(),
        )
    }

    #[test]
    fn insert_and_attach() {
        let mut scene = SceneGraph::new();
        let group = scene.insert_child(scene.root(), Node::group("g"));
        let a = scene.insert_child(group, unit_box());
        assert_eq!(scene.children(group), &[a]);
        assert_eq!(scene.node(a).unwrap().parent(), Some(group));
        assert!(scene.is_attached(a));
        assert_eq!(scene.len(), 3);
    }

    #[test]
    fn attach_rejects_cycles() {
        let mut scene = SceneGraph::new();
        let a = scene.insert_child(scene.root(), Node::group("a"));
        let b = scene.insert_child(a, Node::group("b"));
        scene.attach(a, b);
        assert_eq!(scene.node(a).unwrap().parent(), Some(scene.root()));
    }

    #[test]
    fn remove_drops_subtree_and_reuses_slots() {
        let mut scene = SceneGraph::new();
        let a = scene.insert_child(scene.root(), Node::group("a"));
        let b = scene.insert_child(a, unit_box());
        assert_eq!(scene.remove(a), 2);
        assert!(!scene.contains(a));
        assert!(!scene.contains(b));
        assert!(scene.children(scene.root()).is_empty());
        assert_eq!(scene.remove(scene.root()), 0);
        let c = scene.insert(Node::group("c"));
        assert!(c == a || c == b);
    }

    #[test]
    fn ancestors_are_nearest_first() {
        let mut scene = SceneGraph::new();
        let a = scene.insert_child(scene.root(), Node::group("a"));
        let b = scene.insert_child(a, Node::group("b"));
        let c = scene.insert_child(b, unit_box());
        let chain: Vec<NodeId> = scene.ancestors(c).collect();
        assert_eq!(chain, vec![b, a, scene.root()]);
    }

    #[test]
    fn world_matrix_composes_parents() {
        let mut scene = SceneGraph::new();
        let a = scene.insert_child(
            scene.root(),
            Node::group("a").at(Vec3::new(1.0, 0.0, 0.0)),
        );
        let b = scene.insert_child(a, Node::group("b").at(Vec3::Y));
        assert!((scene.world_position(b) - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn subtree_bounds_include_own_transform() {
        let mut scene = SceneGraph::new();
        let a = scene.insert(Node::group("a"));
        let _ = scene.insert_child(a, unit_box().at(Vec3::new(3.0, 0.0, 0.0)));
        scene.node_mut(a).unwrap().transform.scale = Vec3::splat(2.0);
        let bounds = scene.subtree_bounds(a);
        assert!((bounds.max.x - 8.0).abs() < 1e-5);
        assert!((bounds.min.x - 4.0).abs() < 1e-5);
    }

    #[test]
    fn raycast_sorts_and_skips_hidden() {
        let mut scene = SceneGraph::new();
        let near = scene.insert_child(
            scene.root(),
            unit_box().at(Vec3::new(0.0, 0.0, 5.0)),
        );
        let far = scene.insert_child(scene.root(), unit_box());
        let detached = scene.insert(unit_box());
        let ray = Ray::new(Vec3::new(0.0, 0.0, 20.0), Vec3::NEG_Z);

        let hits = scene.raycast(&ray);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].node, near);
        assert_eq!(hits[1].node, far);
        assert!((hits[0].distance - 14.0).abs() < 1e-4);
        assert!(hits.iter().all(|h| h.node != detached));

        scene
            .node_mut(near)
            .and_then(Node::material_mut)
            .unwrap()
            .visible = false;
        let hits = scene.raycast(&ray);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].node, far);
    }

    #[test]
    fn collapsed_nodes_are_not_hit() {
        let mut scene = SceneGraph::new();
        let b = scene.insert_child(scene.root(), unit_box());
        scene.node_mut(b).unwrap().transform.scale = Vec3::ZERO;
        let ray = Ray::new(Vec3::new(0.0, 0.0, 20.0), Vec3::NEG_Z);
        assert!(scene.raycast(&ray).is_empty());
    }

    #[test]
    fn small_scaled_subtree_is_still_hit() {
        let mut scene = SceneGraph::new();
        // A model authored in millimetres, scaled down to a few units.
        let holder = scene.insert_child(
            scene.root(),
            Node::group("model").with_transform(Transform {
                scale: Vec3::splat(0.002),
                ..Transform::IDENTITY
            }),
        );
        let mesh = scene.insert_child(
            holder,
            Node::mesh(
                "mesh",
                Geometry::Bounded(Aabb::from_half_extents(Vec3::splat(2500.0))),
                Material::default(),
            ),
        );
        let ray = Ray::new(Vec3::new(0.0, 0.0, 20.0), Vec3::NEG_Z);
        let hits = scene.raycast(&ray);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].node, mesh);
        assert!((hits[0].distance - 15.0).abs() < 1e-3);
    }

    #[test]
    fn dirty_tracking() {
        let mut scene = SceneGraph::new();
        scene.mark_rendered();
        assert!(!scene.is_dirty());
        let _ = scene.insert_child(scene.root(), Node::group("a"));
        assert!(scene.is_dirty());
    }
}
