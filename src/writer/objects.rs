//! Scene object translation: geometry, materials, textures.

use std::collections::HashMap;

use crate::format::SEPARATOR;
use crate::scene::{Material, Mesh};
use crate::util::{DVec3, Error, Result};

use super::node::FbxNode;
use super::FbxExporter;

impl<'a> FbxExporter<'a> {
    /// Build the Objects section, allocating UIDs and recording
    /// connections along the way. Emission order is geometry, materials,
    /// textures, then the model hierarchy, so every connection source is
    /// written before the records that reference it.
    pub(super) fn objects(&mut self) -> Result<FbxNode> {
        let mut objects = FbxNode::new("Objects");
        self.geometry_objects(&mut objects);
        self.material_objects(&mut objects);
        self.texture_objects(&mut objects)?;
        self.model_objects(&mut objects)?;
        Ok(objects)
    }

    fn geometry_objects(&mut self, objects: &mut FbxNode) {
        let scene = self.scene;
        for mesh in &scene.meshes {
            let uid = self.generate_uid();
            self.mesh_uids.push(uid);
            objects.add_child(build_geometry(mesh, uid));
        }
    }

    fn material_objects(&mut self, objects: &mut FbxNode) {
        let scene = self.scene;
        for material in &scene.materials {
            let uid = self.generate_uid();
            self.material_uids.push(uid);
            objects.add_child(build_material(material, uid));
        }
    }

    /// One Texture record per unique path, one OP connection per material
    /// using it. Layered (multi-image) diffuse slots cannot be expressed.
    fn texture_objects(&mut self, objects: &mut FbxNode) -> Result<()> {
        let scene = self.scene;
        for (i, material) in scene.materials.iter().enumerate() {
            match material.diffuse_textures.len() {
                0 => continue,
                1 => {}
                n => {
                    return Err(Error::unsupported(format!(
                        "material \"{}\" has {n} diffuse textures; multilayer textures cannot be exported",
                        material.name
                    )))
                }
            }
            let path = &material.diffuse_textures[0];
            let material_uid = self.material_uids[i];
            let texture_uid = match self.texture_uids.get(path) {
                Some(uid) => *uid,
                None => {
                    let uid = self.generate_uid();
                    self.texture_uids.insert(path.clone(), uid);
                    objects.add_child(build_texture(path, uid));
                    uid
                }
            };
            self.connect_op(texture_uid, material_uid, "DiffuseColor");
        }
        Ok(())
    }
}

/// Build one Geometry record: deduplicated vertex table, polygon index
/// list with negated terminators, and the layer elements.
fn build_geometry(mesh: &Mesh, uid: i64) -> FbxNode {
    let mut geom = FbxNode::new("Geometry");
    geom.add_property(uid);
    geom.add_property(format!("{SEPARATOR}Geometry"));
    geom.add_property("Mesh");

    // vertex table, deduplicated on exact float equality
    let mut flattened: Vec<f64> = Vec::new();
    let mut remap: Vec<i32> = Vec::with_capacity(mesh.vertices.len());
    let mut index_by_value: HashMap<[u64; 3], i32> = HashMap::new();
    for v in &mesh.vertices {
        let key = [v.x.to_bits(), v.y.to_bits(), v.z.to_bits()];
        match index_by_value.get(&key) {
            Some(index) => remap.push(*index),
            None => {
                let index = (flattened.len() / 3) as i32;
                index_by_value.insert(key, index);
                remap.push(index);
                flattened.extend_from_slice(&[v.x, v.y, v.z]);
            }
        }
    }
    geom.add_child_value("Vertices", flattened);

    // flattened polygons; the last index of each face is stored as
    // -(index + 1) to mark the polygon end
    let mut polygon_data: Vec<i32> = Vec::new();
    for face in &mesh.faces {
        if let Some((last, rest)) = face.split_last() {
            for index in rest {
                polygon_data.push(remap[*index as usize]);
            }
            polygon_data.push(-1 - remap[*last as usize]);
        }
    }
    geom.add_child_value("PolygonVertexIndex", polygon_data);
    geom.add_child_value("GeometryVersion", 124i32);

    if let Some(normals) = &mesh.normals {
        let mut le = FbxNode::with_property("LayerElementNormal", 0i32);
        le.add_child_value("Version", 102i32);
        le.add_child_value("Name", "");
        le.add_child_value("MappingInformationType", "ByPolygonVertex");
        le.add_child_value("ReferenceInformationType", "Direct");
        let mut normal_data: Vec<f64> = Vec::new();
        for face in &mesh.faces {
            for index in face {
                let n = normals[*index as usize];
                normal_data.extend_from_slice(&[n.x, n.y, n.z]);
            }
        }
        le.add_child_value("Normals", normal_data);
        geom.add_child(le);
    }

    for (k, channel) in mesh.uv_channels.iter().enumerate() {
        if channel.components > 2 {
            log::warn!(
                "mesh \"{}\" UV channel {k} declares {} components; FBX stores 2, extra components dropped",
                mesh.name,
                channel.components
            );
        }
        let mut le = FbxNode::with_property("LayerElementUV", k as i32);
        le.add_child_value("Version", 101i32);
        le.add_child_value("Name", "");
        le.add_child_value("MappingInformationType", "ByPolygonVertex");
        le.add_child_value("ReferenceInformationType", "IndexToDirect");

        let mut uv_data: Vec<f64> = Vec::new();
        let mut uv_indices: Vec<i32> = Vec::new();
        let mut index_by_uv: HashMap<[u64; 3], i32> = HashMap::new();
        let mut next_index = 0i32;
        for face in &mesh.faces {
            for (pvi, index) in face.iter().enumerate() {
                let uv = channel.coords[*index as usize];
                let key = [uv.x.to_bits(), uv.y.to_bits(), uv.z.to_bits()];
                let table_index = match index_by_uv.get(&key) {
                    Some(existing) => *existing,
                    None => {
                        index_by_uv.insert(key, next_index);
                        uv_data.extend_from_slice(&[uv.x, uv.y]);
                        next_index += 1;
                        next_index - 1
                    }
                };
                // the closing corner of each polygon is not indexed
                if pvi + 1 < face.len() {
                    uv_indices.push(table_index);
                }
            }
        }
        le.add_child_value("UV", uv_data);
        le.add_child_value("UVIndex", uv_indices);
        geom.add_child(le);
    }

    let mut le = FbxNode::with_property("LayerElementMaterial", 0i32);
    le.add_child_value("Version", 101i32);
    le.add_child_value("Name", "");
    le.add_child_value("MappingInformationType", "AllSame");
    le.add_child_value("ReferenceInformationType", "IndexToDirect");
    le.add_child_value("Materials", vec![0i32]);
    geom.add_child(le);

    let mut layer = FbxNode::with_property("Layer", 0i32);
    layer.add_child_value("Version", 100i32);
    if mesh.normals.is_some() {
        layer.add_child(layer_element("LayerElementNormal"));
    }
    layer.add_child(layer_element("LayerElementMaterial"));
    if !mesh.uv_channels.is_empty() {
        layer.add_child(layer_element("LayerElementUV"));
    }
    geom.add_child(layer);

    geom
}

fn layer_element(element_type: &str) -> FbxNode {
    let mut le = FbxNode::new("LayerElement");
    le.add_child_value("Type", element_type);
    le.add_child_value("TypedIndex", 0i32);
    le
}

/// Build one Material record.
///
/// Materials carry two property sets: the modern animatable colour/factor
/// pairs the SDK template declares, emitted only for authored inputs, and
/// the legacy pre-2009 scalars, always emitted since most interchange
/// consumers still read them.
fn build_material(material: &Material, uid: i64) -> FbxNode {
    let phong = material.is_phong();

    let mut n = FbxNode::new("Material");
    n.add_property(uid);
    n.add_property(format!("{}{SEPARATOR}Material", material.name));
    n.add_property("");
    n.add_child_value("Version", 102i32);
    n.add_child_value("ShadingModel", if phong { "phong" } else { "lambert" });
    n.add_child_value("MultiLayer", 0i32);

    let mut p = FbxNode::new("Properties70");

    if let Some(c) = material.ambient {
        p.add_p70_color_a("AmbientColor", c.x, c.y, c.z);
    }
    if let Some(c) = material.diffuse {
        p.add_p70_color_a("DiffuseColor", c.x, c.y, c.z);
    }
    if let Some(c) = material.transparent {
        p.add_p70_color_a("TransparentColor", c.x, c.y, c.z);
        // consumers default TransparencyFactor to 0.0, which would turn
        // the colour into a no-op; Maya writes 1.0 here as well
        p.add_p70_number_a("TransparencyFactor", 1.0);
    }
    if phong {
        if let Some(c) = material.specular {
            p.add_p70_color_a("SpecularColor", c.x, c.y, c.z);
        }
        if let Some(s) = material.shininess {
            p.add_p70_number_a("ShininessExponent", s);
        }
        if let Some(r) = material.reflectivity {
            p.add_p70_number_a("ReflectionFactor", r);
        }
    }

    let e = material.emissive.unwrap_or(DVec3::ZERO);
    p.add_p70_vector("Emissive", e.x, e.y, e.z);
    let a = material.ambient.unwrap_or(DVec3::splat(0.2));
    p.add_p70_vector("Ambient", a.x, a.y, a.z);
    let d = material.diffuse.unwrap_or(DVec3::splat(0.8));
    p.add_p70_vector("Diffuse", d.x, d.y, d.z);
    if let Some(opacity) = material.opacity {
        p.add_p70_double("Opacity", opacity);
    } else if let Some(t) = material.transparent {
        // opacity as one minus the mean transparency
        p.add_p70_double("Opacity", 1.0 - (t.x + t.y + t.z) / 3.0);
    }
    if phong {
        let s = material.specular.unwrap_or(DVec3::ZERO);
        p.add_p70_vector("Specular", s.x, s.y, s.z);
        p.add_p70_double("Shininess", material.shininess.unwrap_or(20.0));
        let r = material.reflectivity.unwrap_or(0.0);
        p.add_p70_double("Reflectivity", r * r * 0.25479);
    }

    n.add_child(p);
    n
}

/// Build one Texture record with default transform and cropping.
fn build_texture(path: &str, uid: i64) -> FbxNode {
    let mut n = FbxNode::new("Texture");
    n.add_property(uid);
    n.add_property(format!("{SEPARATOR}Texture"));
    n.add_property("");

    n.add_child_value("Type", "TextureVideoClip");
    n.add_child_value("Version", 202i32);
    n.add_child_value("TextureName", format!("{SEPARATOR}Texture"));

    let mut p = FbxNode::new("Properties70");
    p.add_p70_enum("CurrentTextureBlendMode", 0);
    p.add_p70_bool("UseMaterial", true);
    n.add_child(p);

    // which of the stored paths is valid depends on the consumer, so the
    // same path goes into both fields
    n.add_child_value("FileName", path);
    n.add_child_value("RelativeFilename", path);

    let mut t = FbxNode::new("ModelUVTranslation");
    t.add_property(0.0);
    t.add_property(0.0);
    n.add_child(t);
    let mut s = FbxNode::new("ModelUVScaling");
    s.add_property(1.0);
    s.add_property(1.0);
    n.add_child(s);
    n.add_child_value("Texture_Alpha_Source", "None");
    let mut c = FbxNode::new("Cropping");
    for _ in 0..4 {
        c.add_property(0i32);
    }
    n.add_child(c);
    n
}
