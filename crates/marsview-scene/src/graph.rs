//! Arena-backed scene tree.
//!
//! Nodes are only ever appended under an existing parent, so the structure is
//! always a tree rooted at [`SceneGraph::root`].

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::{Geometry, Light, Material};

/// Index of a node inside its [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a node represents. Hit-testing and lighting dispatch on this.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeKind {
    /// Pure transform container.
    Group,
    /// The pickable planet body.
    Planet,
    /// Any other visible object.
    Decoration,
    Light(Light),
}

/// Local transform with Euler rotation applied in X, Y, Z order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Radians about X, Y, Z.
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn quat(&self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        )
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quat(), self.position)
    }
}

/// Geometry plus material.
#[derive(Debug, Clone)]
pub struct Renderable {
    pub geometry: Geometry,
    pub material: Material,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
    pub transform: Transform,
    pub renderable: Option<Renderable>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            transform: Transform::default(),
            renderable: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_renderable(mut self, geometry: Geometry, material: Material) -> Self {
        self.renderable = Some(Renderable { geometry, material });
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// A tree of nodes stored in insertion order.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    nodes: Vec<Node>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Create a graph holding only the root group.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new("root", NodeKind::Group)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Attach `node` as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not belong to this graph.
    pub fn add(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        assert!(parent.0 < self.nodes.len(), "parent {parent:?} not in graph");
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Iterate over every node with its id, parents before children.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Composite local-to-world matrix of `id`.
    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let Some(node) = self.nodes.get(current.0) else {
                break;
            };
            matrix = node.transform.matrix() * matrix;
            cursor = node.parent;
        }
        matrix
    }

    /// World matrices for every node, indexed by [`NodeId::index`].
    ///
    /// Parents always precede children in the arena, so a single forward
    /// pass is enough.
    pub fn world_matrices(&self) -> Vec<Mat4> {
        let mut out: Vec<Mat4> = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let local = node.transform.matrix();
            let world = match node.parent {
                Some(parent) => out[parent.0] * local,
                None => local,
            };
            out.push(world);
        }
        out
    }

    /// Apply `f` to every material in the graph.
    pub fn for_each_material_mut(&mut self, mut f: impl FnMut(&mut Material)) {
        for node in &mut self.nodes {
            if let Some(renderable) = node.renderable.as_mut() {
                f(&mut renderable.material);
            }
        }
    }

    /// Every light node with its world position.
    pub fn lights(&self) -> Vec<(Light, Vec3)> {
        let worlds = self.world_matrices();
        self.iter()
            .filter_map(|(id, node)| match node.kind {
                NodeKind::Light(light) => {
                    Some((light, worlds[id.0].transform_point3(Vec3::ZERO)))
                }
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    #[test]
    fn test_new_graph_has_root_group() {
        let graph = SceneGraph::new();
        assert_eq!(graph.len(), 1);
        let root = graph.get(graph.root()).unwrap();
        assert_eq!(root.kind, NodeKind::Group);
        assert!(root.parent().is_none());
    }

    #[test]
    fn test_add_links_parent_and_child() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let group = graph.add(root, Node::new("group", NodeKind::Group));
        let child = graph.add(group, Node::new("child", NodeKind::Decoration));

        assert_eq!(graph.get(root).unwrap().children(), &[group]);
        assert_eq!(graph.get(group).unwrap().children(), &[child]);
        assert_eq!(graph.get(child).unwrap().parent(), Some(group));
    }

    #[test]
    fn test_world_matrix_composes_parents() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let group = graph.add(
            root,
            Node::new("group", NodeKind::Group).with_transform(Transform {
                rotation: Vec3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0),
                ..Transform::default()
            }),
        );
        let child = graph.add(
            group,
            Node::new("child", NodeKind::Decoration)
                .with_transform(Transform::from_position(Vec3::X)),
        );

        // Yaw of +90° maps +X onto -Z.
        let p = graph.world_matrix(child).transform_point3(Vec3::ZERO);
        assert!((p - Vec3::NEG_Z).length() < 1e-5, "got {p}");

        let all = graph.world_matrices();
        assert!(all[child.index()].abs_diff_eq(graph.world_matrix(child), 1e-5));
    }

    #[test]
    fn test_euler_order_is_xyz() {
        let t = Transform {
            rotation: Vec3::new(0.3, 0.5, 0.7),
            ..Transform::default()
        };
        let expected =
            Quat::from_rotation_x(0.3) * Quat::from_rotation_y(0.5) * Quat::from_rotation_z(0.7);
        assert!(t.quat().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn test_lights_report_world_position() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let sun = Light::Directional {
            color: Color::WHITE,
            intensity: 1.5,
        };
        graph.add(
            root,
            Node::new("sun", NodeKind::Light(sun))
                .with_transform(Transform::from_position(Vec3::new(10.0, 5.0, 5.0))),
        );
        let lights = graph.lights();
        assert_eq!(lights.len(), 1);
        assert_eq!(lights[0].0, sun);
        assert_eq!(lights[0].1, Vec3::new(10.0, 5.0, 5.0));
    }
}
