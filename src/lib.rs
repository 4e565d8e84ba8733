//! # fbx-export
//!
//! FBX 7.4 scene exporter, binary and ASCII variants.
//!
//! FBX is Autodesk's 3D interchange format. Files written by this crate
//! load in the mainstream consumers (Maya, Blender, Unity, Unreal). The
//! exporter covers static scenes: node hierarchies, polygon meshes with
//! normals and UV channels, lambert/phong materials and diffuse file
//! textures. Skinning, animation curves and embedded media are out of
//! scope.
//!
//! ## Modules
//!
//! - [`util`] - Errors, math helpers
//! - [`format`] - Wire-format constants
//! - [`scene`] - Input scene model
//! - [`writer`] - Record tree, emitters and the exporter driver
//!
//! ## Example
//!
//! ```ignore
//! use fbx_export::{FbxExporter, Scene};
//!
//! let scene = Scene::new("RootNode");
//! FbxExporter::new(&scene).export_binary("empty.fbx")?;
//! ```

pub mod format;
pub mod scene;
pub mod util;
pub mod writer;

// Re-export commonly used types
pub use scene::{Material, Mesh, Scene, SceneNode, UvChannel};
pub use util::{Error, Result};
pub use writer::FbxExporter;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::scene::{Material, Mesh, Scene, SceneNode, UvChannel};
    pub use crate::util::{Error, Result};
    pub use crate::writer::{FbxExporter, FbxNode, Property};
}
