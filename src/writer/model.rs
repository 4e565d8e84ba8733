//! Model hierarchy emission and transform-chain collapsing.
//!
//! Importers that flatten FBX insert synthetic intermediate nodes, one per
//! transform-chain element, whose names carry the sentinel marker. On
//! export those nodes are folded back into the pivot properties of the
//! next real node instead of becoming Models of their own.

use crate::format::{SENTINEL_TAG, SEPARATOR};
use crate::scene::SceneNode;
use crate::util::{decompose_transform, DVec3, Error, Result};

use super::node::FbxNode;
use super::FbxExporter;

/// How a chain element contributes to the accumulated chain.
#[derive(Clone, Copy)]
enum ChainKind {
    Translation,
    Rotation,
    Scaling,
    /// Inverse pivot entries carry no data of their own; the forward
    /// partner records the value.
    Inverse,
}

/// FBX property name and contribution for each recognised chain element.
fn chain_element(name: &str) -> Option<(&'static str, ChainKind)> {
    use ChainKind::*;
    Some(match name {
        "Translation" => ("Lcl Translation", Translation),
        "RotationOffset" => ("RotationOffset", Translation),
        "RotationPivot" => ("RotationPivot", Translation),
        "PreRotation" => ("PreRotation", Rotation),
        "Rotation" => ("Lcl Rotation", Rotation),
        "PostRotation" => ("PostRotation", Rotation),
        "RotationPivotInverse" => ("RotationPivotInverse", Inverse),
        "ScalingOffset" => ("ScalingOffset", Translation),
        "ScalingPivot" => ("ScalingPivot", Translation),
        "Scaling" => ("Lcl Scaling", Scaling),
        "ScalingPivotInverse" => ("ScalingPivotInverse", Inverse),
        "GeometricTranslation" => ("GeometricTranslation", Translation),
        "GeometricRotation" => ("GeometricRotation", Rotation),
        "GeometricScaling" => ("GeometricScaling", Scaling),
        _ => return None,
    })
}

impl<'a> FbxExporter<'a> {
    /// Walk the node hierarchy and emit Model records.
    ///
    /// The root node itself is never emitted; it is addressed by the
    /// implicit UID 0. Meshes attached directly to the root hang from
    /// synthetic per-mesh Models connected to 0.
    pub(super) fn model_objects(&mut self, objects: &mut FbxNode) -> Result<()> {
        let scene = self.scene;
        self.synthetic_mesh_models(objects, &scene.root.mesh_indices, 0);
        for child in &scene.root.children {
            self.write_model_nodes(objects, child, 0, Vec::new())?;
        }
        Ok(())
    }

    fn write_model_nodes(
        &mut self,
        objects: &mut FbxNode,
        node: &SceneNode,
        parent_uid: i64,
        mut chain: Vec<(&'static str, DVec3)>,
    ) -> Result<()> {
        if let Some(pos) = node.name.find(SENTINEL_TAG) {
            // synthetic transform node: fold it into the chain and descend
            let element = &node.name[pos + SENTINEL_TAG.len()..];
            let (fbx_name, kind) = chain_element(element).ok_or_else(|| {
                Error::unsupported(format!(
                    "transform chain element \"{element}\" in node \"{}\"",
                    node.name
                ))
            })?;
            let (t, r, s) = decompose_transform(&node.transform);
            match kind {
                ChainKind::Inverse => {}
                ChainKind::Translation => chain.push((fbx_name, t)),
                ChainKind::Rotation => chain.push((fbx_name, degrees(r))),
                ChainKind::Scaling => chain.push((fbx_name, s)),
            }
            if node.children.len() != 1 {
                return Err(Error::MalformedTransformChain {
                    node: node.name.clone(),
                    children: node.children.len(),
                });
            }
            return self.write_model_nodes(objects, &node.children[0], parent_uid, chain);
        }

        let scene = self.scene;
        let node_uid = self.generate_uid();

        // content connections first, then the attach to the parent
        if node.mesh_indices.len() == 1 {
            let mi = node.mesh_indices[0];
            self.connect_oo(self.mesh_uids[mi], node_uid);
            self.connect_oo(
                self.material_uids[scene.meshes[mi].material_index],
                node_uid,
            );
            objects.add_child(model_node(node, node_uid, "Mesh", &chain));
        } else {
            // no mesh, or several meshes hung below as synthetic children
            objects.add_child(model_node(node, node_uid, "Null", &chain));
        }
        self.connect_oo(node_uid, parent_uid);
        if node.mesh_indices.len() > 1 {
            self.synthetic_mesh_models(objects, &node.mesh_indices, node_uid);
        }

        for child in &node.children {
            self.write_model_nodes(objects, child, node_uid, Vec::new())?;
        }
        Ok(())
    }

    /// Emit one child Model per mesh, named after the mesh, each connected
    /// to the parent, its mesh and its material.
    fn synthetic_mesh_models(
        &mut self,
        objects: &mut FbxNode,
        mesh_indices: &[usize],
        parent_uid: i64,
    ) {
        let scene = self.scene;
        for &mi in mesh_indices {
            let uid = self.generate_uid();
            self.connect_oo(self.mesh_uids[mi], uid);
            self.connect_oo(self.material_uids[scene.meshes[mi].material_index], uid);
            self.connect_oo(uid, parent_uid);

            let mut m = FbxNode::new("Model");
            m.add_property(uid);
            m.add_property(format!("{}{SEPARATOR}Model", scene.meshes[mi].name));
            m.add_property("Mesh");
            m.add_child_value("Version", 232i32);
            let mut p = FbxNode::new("Properties70");
            p.add_p70_enum("InheritType", 1);
            m.add_child(p);
            objects.add_child(m);
        }
    }
}

/// Build one Model record carrying the node transform.
///
/// With an accumulated chain the entries are emitted in chain order under
/// their FBX names; otherwise the node's own matrix is decomposed and only
/// non-default components are written.
fn model_node(
    node: &SceneNode,
    uid: i64,
    model_type: &str,
    chain: &[(&'static str, DVec3)],
) -> FbxNode {
    let mut m = FbxNode::new("Model");
    m.add_property(uid);
    m.add_property(format!("{}{SEPARATOR}Model", node.name));
    m.add_property(model_type);
    m.add_child_value("Version", 232i32);

    let mut p = FbxNode::new("Properties70");
    p.add_p70_bool("RotationActive", true);
    p.add_p70_int("DefaultAttributeIndex", 0);
    p.add_p70_enum("InheritType", 1); // RSrs

    if chain.is_empty() {
        let (t, r, s) = decompose_transform(&node.transform);
        if t != DVec3::ZERO {
            add_lcl(&mut p, "Lcl Translation", t);
        }
        if r != DVec3::ZERO {
            add_lcl(&mut p, "Lcl Rotation", degrees(r));
        }
        if s != DVec3::ONE {
            add_lcl(&mut p, "Lcl Scaling", s);
        }
    } else {
        for (name, v) in chain {
            if name.starts_with("Lcl ") {
                add_lcl(&mut p, name, *v);
            } else {
                p.add_p70_vector(name, v.x, v.y, v.z);
            }
        }
    }
    m.add_child(p);

    m.add_child_value("Shading", true);
    m.add_child_value("Culling", "CullingOff");
    m
}

fn add_lcl(p: &mut FbxNode, name: &str, v: DVec3) {
    p.add_p70(name, name, "", "A", [v.x.into(), v.y.into(), v.z.into()]);
}

fn degrees(radians: DVec3) -> DVec3 {
    DVec3::new(
        radians.x.to_degrees(),
        radians.y.to_degrees(),
        radians.z.to_degrees(),
    )
}
