//! Input scene model.
//!
//! The exporter reads a [`Scene`] and never mutates it. The types here are
//! deliberately plain owned data: callers adapting another scene graph fill
//! them in and hand the result to [`crate::writer::FbxExporter`].

use crate::util::{DMat4, DVec3};

/// A complete scene: node hierarchy plus flat mesh and material lists.
///
/// Nodes refer to meshes by index into [`Scene::meshes`]; meshes refer to
/// materials by index into [`Scene::materials`].
pub struct Scene {
    /// Root of the node hierarchy. The root itself is not exported as an
    /// object; it is addressed by the implicit FBX root UID 0.
    pub root: SceneNode,
    /// All meshes, in a stable order.
    pub meshes: Vec<Mesh>,
    /// All materials, in a stable order.
    pub materials: Vec<Material>,
}

impl Scene {
    /// Create a scene with an empty root node and no content.
    pub fn new(root_name: &str) -> Self {
        Self {
            root: SceneNode::new(root_name),
            meshes: Vec::new(),
            materials: Vec::new(),
        }
    }

    /// Total number of nodes in the hierarchy, root included.
    pub fn node_count(&self) -> usize {
        fn count(node: &SceneNode) -> usize {
            1 + node.children.iter().map(count).sum::<usize>()
        }
        count(&self.root)
    }
}

/// One node of the scene hierarchy.
pub struct SceneNode {
    /// Node name. Names containing the importer's transform-chain marker
    /// ([`crate::format::SENTINEL_TAG`]) are collapsed on export instead of
    /// becoming Model objects.
    pub name: String,
    /// Local transform relative to the parent node.
    pub transform: DMat4,
    /// Indices into [`Scene::meshes`] attached to this node.
    pub mesh_indices: Vec<usize>,
    /// Child nodes.
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    /// Create a node with an identity transform and no content.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            transform: DMat4::IDENTITY,
            mesh_indices: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set the local transform.
    pub fn with_transform(mut self, transform: DMat4) -> Self {
        self.transform = transform;
        self
    }

    /// Add a child node and return a reference to it.
    pub fn add_child(&mut self, child: SceneNode) -> &mut SceneNode {
        self.children.push(child);
        self.children.last_mut().unwrap()
    }
}

/// A polygon mesh.
pub struct Mesh {
    /// Mesh name, used for synthesised per-mesh model nodes.
    pub name: String,
    /// Vertex positions.
    pub vertices: Vec<DVec3>,
    /// Optional per-vertex normals, parallel to [`Mesh::vertices`].
    pub normals: Option<Vec<DVec3>>,
    /// UV channels, each with per-vertex coordinates.
    pub uv_channels: Vec<UvChannel>,
    /// Faces as lists of vertex indices, in winding order.
    pub faces: Vec<Vec<u32>>,
    /// Index into [`Scene::materials`].
    pub material_index: usize,
}

impl Mesh {
    /// Create an empty mesh using material 0.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            vertices: Vec::new(),
            normals: None,
            uv_channels: Vec::new(),
            faces: Vec::new(),
            material_index: 0,
        }
    }
}

/// One UV channel of a mesh.
///
/// Coordinates are stored with three components regardless of how many the
/// channel declares; `components` records the declared count (2 or 3).
/// FBX can only represent two, so a 3-component channel is coerced on
/// export with a warning.
pub struct UvChannel {
    /// Declared component count, 2 or 3.
    pub components: u32,
    /// Per-vertex coordinates, parallel to [`Mesh::vertices`].
    pub coords: Vec<DVec3>,
}

/// A surface material.
///
/// `None` fields were not supplied by the source scene; the exporter
/// substitutes the classic FBX defaults where a value is required.
pub struct Material {
    pub name: String,
    pub ambient: Option<DVec3>,
    pub diffuse: Option<DVec3>,
    pub specular: Option<DVec3>,
    pub emissive: Option<DVec3>,
    pub transparent: Option<DVec3>,
    pub shininess: Option<f64>,
    pub reflectivity: Option<f64>,
    pub opacity: Option<f64>,
    /// Diffuse texture paths. More than one entry means a layered texture,
    /// which the exporter rejects.
    pub diffuse_textures: Vec<String>,
}

impl Material {
    /// Create a material with no authored values.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ambient: None,
            diffuse: None,
            specular: None,
            emissive: None,
            transparent: None,
            shininess: None,
            reflectivity: None,
            opacity: None,
            diffuse_textures: Vec::new(),
        }
    }

    /// True when the material exports with the phong shading model.
    pub fn is_phong(&self) -> bool {
        self.shininess.unwrap_or(0.0) > 0.0
    }
}
