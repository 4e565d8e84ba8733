//! Fixed document sections.
//!
//! Everything surrounding the Objects/Connections payload: the header
//! extension, global settings, document table, definitions with their
//! property templates, and the binary footer.

use std::io::{Seek, Write};

use chrono::{Datelike, Local, Timelike};

use crate::format::{EXPORT_VERSION, FOOTER_ID, FOOTER_TAIL, KTIME_SECOND};
use crate::util::Result;

use super::node::FbxNode;
use super::stream::FbxStream;
use super::{creator_string, FbxExporter};

impl<'a> FbxExporter<'a> {
    /// FBXHeaderExtension: versions, creation timestamp, creator and an
    /// empty SceneInfo. EncryptionType only exists in binary files.
    pub(super) fn header_extension(&self) -> FbxNode {
        let mut n = FbxNode::new("FBXHeaderExtension");
        n.add_child_value("FBXHeaderVersion", crate::format::HEADER_VERSION);
        n.add_child_value("FBXVersion", EXPORT_VERSION as i32);
        if self.binary {
            n.add_child_value("EncryptionType", 0i32);
        }

        let now = Local::now();
        let mut stamp = FbxNode::new("CreationTimeStamp");
        stamp.add_child_value("Version", 1000i32);
        stamp.add_child_value("Year", now.year());
        stamp.add_child_value("Month", now.month() as i32);
        stamp.add_child_value("Day", now.day() as i32);
        stamp.add_child_value("Hour", now.hour() as i32);
        stamp.add_child_value("Minute", now.minute() as i32);
        stamp.add_child_value("Second", now.second() as i32);
        stamp.add_child_value("Millisecond", now.timestamp_subsec_millis() as i32);
        n.add_child(stamp);

        n.add_child_value("Creator", creator_string());
        n.add_child(FbxNode::new("SceneInfo"));
        n
    }

    /// GlobalSettings: right-handed Y-up, centimeter scale, 24 fps NTSC
    /// full-frame time mode.
    pub(super) fn global_settings(&self) -> FbxNode {
        let mut gs = FbxNode::new("GlobalSettings");
        gs.add_child_value("Version", 1000i32);

        let mut p = FbxNode::new("Properties70");
        p.add_p70_int("UpAxis", 1);
        p.add_p70_int("UpAxisSign", 1);
        p.add_p70_int("FrontAxis", 2);
        p.add_p70_int("FrontAxisSign", 1);
        p.add_p70_int("CoordAxis", 0);
        p.add_p70_int("CoordAxisSign", 1);
        p.add_p70_int("OriginalUpAxis", 1);
        p.add_p70_int("OriginalUpAxisSign", 1);
        p.add_p70_double("UnitScaleFactor", 1.0);
        p.add_p70_double("OriginalUnitScaleFactor", 1.0);
        p.add_p70_color("AmbientColor", 0.0, 0.0, 0.0);
        p.add_p70_string("DefaultCamera", "Producer Perspective");
        p.add_p70_enum("TimeMode", 11);
        p.add_p70_enum("TimeProtocol", 2);
        p.add_p70_enum("SnapOnFrameMode", 0);
        p.add_p70_time("TimeSpanStart", 0);
        p.add_p70_time("TimeSpanStop", KTIME_SECOND);
        p.add_p70_double("CustomFrameRate", -1.0);
        p.add_p70("TimeMarker", "Compound", "", "", []);
        p.add_p70_int("CurrentTimeMarker", -1);
        gs.add_child(p);
        gs
    }

    /// Documents: a single Document referencing the implicit root node 0.
    pub(super) fn documents(&mut self) -> FbxNode {
        let mut docs = FbxNode::new("Documents");
        docs.add_child_value("Count", 1i32);

        let mut doc = FbxNode::new("Document");
        doc.add_property(self.generate_uid());
        doc.add_property("");
        doc.add_property("Scene");

        let mut p = FbxNode::new("Properties70");
        p.add_p70("SourceObject", "object", "", "", []);
        p.add_p70_string("ActiveAnimStackName", "Take 001");
        doc.add_child(p);

        doc.add_child_value("RootNode", 0i64);
        docs.add_child(doc);
        docs
    }

    /// Definitions: per-category object counts and default property
    /// templates. Categories with no instances are omitted; the root node
    /// is implicit UID 0 and never becomes a Model, so it is not counted.
    pub(super) fn definitions(&self) -> FbxNode {
        let scene = self.scene;
        let model_count = (scene.node_count() - 1) as i32;
        let mesh_count = scene.meshes.len() as i32;
        let material_count = scene.materials.len() as i32;
        let texture_count = scene
            .materials
            .iter()
            .filter(|m| !m.diffuse_textures.is_empty())
            .count() as i32;
        let any_phong = scene.materials.iter().any(|m| m.is_phong());

        let mut object_types: Vec<FbxNode> = Vec::new();
        let mut total = 0i32;

        let mut n = FbxNode::with_property("ObjectType", "GlobalSettings");
        n.add_child_value("Count", 1i32);
        object_types.push(n);
        total += 1;

        let mut n = FbxNode::with_property("ObjectType", "AnimationStack");
        n.add_child_value("Count", 1i32);
        n.add_child(anim_stack_template());
        object_types.push(n);
        total += 1;

        let mut n = FbxNode::with_property("ObjectType", "AnimationLayer");
        n.add_child_value("Count", 1i32);
        n.add_child(anim_layer_template());
        object_types.push(n);
        total += 1;

        if model_count > 0 {
            let mut n = FbxNode::with_property("ObjectType", "Model");
            n.add_child_value("Count", model_count);
            n.add_child(model_template());
            object_types.push(n);
            total += model_count;
        }

        if mesh_count > 0 {
            let mut n = FbxNode::with_property("ObjectType", "Geometry");
            n.add_child_value("Count", mesh_count);
            n.add_child(geometry_template());
            object_types.push(n);
            total += mesh_count;
        }

        if material_count > 0 {
            let mut n = FbxNode::with_property("ObjectType", "Material");
            n.add_child_value("Count", material_count);
            n.add_child(material_template(any_phong));
            object_types.push(n);
            total += material_count;
        }

        if texture_count > 0 {
            let mut n = FbxNode::with_property("ObjectType", "Texture");
            n.add_child_value("Count", texture_count);
            n.add_child(texture_template());
            object_types.push(n);
            total += texture_count;
        }

        let mut defs = FbxNode::new("Definitions");
        defs.add_child_value("Version", 100i32);
        defs.add_child_value("Count", total);
        for n in object_types {
            defs.add_child(n);
        }
        defs
    }

    /// Binary footer, written after the top-level null record.
    ///
    /// The 16-byte footer id, four zero bytes, zero padding up to the next
    /// 16-byte boundary (a full 16 bytes when already aligned), the version
    /// word again, 120 zero bytes and the fixed 16-byte tail.
    pub(super) fn write_binary_footer<W: Write + Seek>(
        &self,
        s: &mut FbxStream<W>,
    ) -> Result<()> {
        s.write_bytes(&FOOTER_ID)?;
        s.write_bytes(&[0u8; 4])?;

        let pad = 16 - (s.pos() % 16) as usize;
        s.write_bytes(&vec![0u8; pad])?;

        s.write_u32(EXPORT_VERSION)?;
        s.write_bytes(&[0u8; 120])?;
        s.write_bytes(&FOOTER_TAIL)?;
        Ok(())
    }
}

fn anim_stack_template() -> FbxNode {
    let mut t = FbxNode::with_property("PropertyTemplate", "FbxAnimStack");
    let mut p = FbxNode::new("Properties70");
    p.add_p70_string("Description", "");
    p.add_p70_time("LocalStart", 0);
    p.add_p70_time("LocalStop", 0);
    p.add_p70_time("ReferenceStart", 0);
    p.add_p70_time("ReferenceStop", 0);
    t.add_child(p);
    t
}

fn anim_layer_template() -> FbxNode {
    let mut t = FbxNode::with_property("PropertyTemplate", "FbxAnimLayer");
    let mut p = FbxNode::new("Properties70");
    p.add_p70_number_a("Weight", 100.0);
    p.add_p70_bool("Mute", false);
    p.add_p70_bool("Solo", false);
    p.add_p70_bool("Lock", false);
    p.add_p70_color("Color", 0.8, 0.8, 0.8);
    p.add_p70_enum("BlendMode", 0);
    p.add_p70_enum("RotationAccumulationMode", 0);
    p.add_p70_enum("ScaleAccumulationMode", 0);
    p.add_p70("BlendModeBypass", "ULongLong", "", "", [0i64.into()]);
    t.add_child(p);
    t
}

/// Default FbxNode property set; per-model records override entries of
/// this template.
fn model_template() -> FbxNode {
    let mut t = FbxNode::with_property("PropertyTemplate", "FbxNode");
    let mut p = FbxNode::new("Properties70");
    p.add_p70_enum("QuaternionInterpolate", 0);
    p.add_p70_vector("RotationOffset", 0.0, 0.0, 0.0);
    p.add_p70_vector("RotationPivot", 0.0, 0.0, 0.0);
    p.add_p70_vector("ScalingOffset", 0.0, 0.0, 0.0);
    p.add_p70_vector("ScalingPivot", 0.0, 0.0, 0.0);
    p.add_p70_bool("TranslationActive", false);
    p.add_p70_vector("TranslationMin", 0.0, 0.0, 0.0);
    p.add_p70_vector("TranslationMax", 0.0, 0.0, 0.0);
    p.add_p70_bool("TranslationMinX", false);
    p.add_p70_bool("TranslationMinY", false);
    p.add_p70_bool("TranslationMinZ", false);
    p.add_p70_bool("TranslationMaxX", false);
    p.add_p70_bool("TranslationMaxY", false);
    p.add_p70_bool("TranslationMaxZ", false);
    p.add_p70_enum("RotationOrder", 0);
    p.add_p70_bool("RotationSpaceForLimitOnly", false);
    p.add_p70_double("RotationStiffnessX", 0.0);
    p.add_p70_double("RotationStiffnessY", 0.0);
    p.add_p70_double("RotationStiffnessZ", 0.0);
    p.add_p70_double("AxisLen", 10.0);
    p.add_p70_vector("PreRotation", 0.0, 0.0, 0.0);
    p.add_p70_vector("PostRotation", 0.0, 0.0, 0.0);
    p.add_p70_bool("RotationActive", false);
    p.add_p70_vector("RotationMin", 0.0, 0.0, 0.0);
    p.add_p70_vector("RotationMax", 0.0, 0.0, 0.0);
    p.add_p70_bool("RotationMinX", false);
    p.add_p70_bool("RotationMinY", false);
    p.add_p70_bool("RotationMinZ", false);
    p.add_p70_bool("RotationMaxX", false);
    p.add_p70_bool("RotationMaxY", false);
    p.add_p70_bool("RotationMaxZ", false);
    p.add_p70_enum("InheritType", 0);
    p.add_p70_bool("ScalingActive", false);
    p.add_p70_vector("ScalingMin", 0.0, 0.0, 0.0);
    p.add_p70_vector("ScalingMax", 1.0, 1.0, 1.0);
    p.add_p70_bool("ScalingMinX", false);
    p.add_p70_bool("ScalingMinY", false);
    p.add_p70_bool("ScalingMinZ", false);
    p.add_p70_bool("ScalingMaxX", false);
    p.add_p70_bool("ScalingMaxY", false);
    p.add_p70_bool("ScalingMaxZ", false);
    p.add_p70_vector("GeometricTranslation", 0.0, 0.0, 0.0);
    p.add_p70_vector("GeometricRotation", 0.0, 0.0, 0.0);
    p.add_p70_vector("GeometricScaling", 1.0, 1.0, 1.0);
    p.add_p70_double("MinDampRangeX", 0.0);
    p.add_p70_double("MinDampRangeY", 0.0);
    p.add_p70_double("MinDampRangeZ", 0.0);
    p.add_p70_double("MaxDampRangeX", 0.0);
    p.add_p70_double("MaxDampRangeY", 0.0);
    p.add_p70_double("MaxDampRangeZ", 0.0);
    p.add_p70_double("MinDampStrengthX", 0.0);
    p.add_p70_double("MinDampStrengthY", 0.0);
    p.add_p70_double("MinDampStrengthZ", 0.0);
    p.add_p70_double("MaxDampStrengthX", 0.0);
    p.add_p70_double("MaxDampStrengthY", 0.0);
    p.add_p70_double("MaxDampStrengthZ", 0.0);
    p.add_p70_double("PreferedAngleX", 0.0);
    p.add_p70_double("PreferedAngleY", 0.0);
    p.add_p70_double("PreferedAngleZ", 0.0);
    p.add_p70("LookAtProperty", "object", "", "", []);
    p.add_p70("UpVectorProperty", "object", "", "", []);
    p.add_p70_bool("Show", true);
    p.add_p70_bool("NegativePercentShapeSupport", true);
    p.add_p70_int("DefaultAttributeIndex", -1);
    p.add_p70_bool("Freeze", false);
    p.add_p70_bool("LODBox", false);
    p.add_p70(
        "Lcl Translation",
        "Lcl Translation",
        "",
        "A",
        [0.0.into(), 0.0.into(), 0.0.into()],
    );
    p.add_p70(
        "Lcl Rotation",
        "Lcl Rotation",
        "",
        "A",
        [0.0.into(), 0.0.into(), 0.0.into()],
    );
    p.add_p70(
        "Lcl Scaling",
        "Lcl Scaling",
        "",
        "A",
        [1.0.into(), 1.0.into(), 1.0.into()],
    );
    p.add_p70("Visibility", "Visibility", "", "A", [1.0.into()]);
    p.add_p70(
        "Visibility Inheritance",
        "Visibility Inheritance",
        "",
        "",
        [1i32.into()],
    );
    t.add_child(p);
    t
}

fn geometry_template() -> FbxNode {
    let mut t = FbxNode::with_property("PropertyTemplate", "FbxMesh");
    let mut p = FbxNode::new("Properties70");
    p.add_p70_color("Color", 0.0, 0.0, 0.0);
    p.add_p70_vector("BBoxMin", 0.0, 0.0, 0.0);
    p.add_p70_vector("BBoxMax", 0.0, 0.0, 0.0);
    p.add_p70_bool("Primary Visibility", true);
    p.add_p70_bool("Casts Shadows", true);
    p.add_p70_bool("Receive Shadows", true);
    t.add_child(p);
    t
}

/// Material template; phong when any scene material is phong, lambert
/// otherwise. Lambert is the phong set without the specular block.
fn material_template(phong: bool) -> FbxNode {
    let name = if phong {
        "FbxSurfacePhong"
    } else {
        "FbxSurfaceLambert"
    };
    let mut t = FbxNode::with_property("PropertyTemplate", name);
    let mut p = FbxNode::new("Properties70");
    p.add_p70_string("ShadingModel", if phong { "Phong" } else { "Lambert" });
    p.add_p70_bool("MultiLayer", false);
    p.add_p70_color_a("EmissiveColor", 0.0, 0.0, 0.0);
    p.add_p70_number_a("EmissiveFactor", 1.0);
    p.add_p70_color_a("AmbientColor", 0.2, 0.2, 0.2);
    p.add_p70_number_a("AmbientFactor", 1.0);
    p.add_p70_color_a("DiffuseColor", 0.8, 0.8, 0.8);
    p.add_p70_number_a("DiffuseFactor", 1.0);
    p.add_p70_vector("Bump", 0.0, 0.0, 0.0);
    p.add_p70_vector("NormalMap", 0.0, 0.0, 0.0);
    p.add_p70_double("BumpFactor", 1.0);
    p.add_p70_color_a("TransparentColor", 0.0, 0.0, 0.0);
    p.add_p70_number_a("TransparencyFactor", 0.0);
    p.add_p70_color("DisplacementColor", 0.0, 0.0, 0.0);
    p.add_p70_double("DisplacementFactor", 1.0);
    p.add_p70_color("VectorDisplacementColor", 0.0, 0.0, 0.0);
    p.add_p70_double("VectorDisplacementFactor", 1.0);
    if phong {
        p.add_p70_color_a("SpecularColor", 0.2, 0.2, 0.2);
        p.add_p70_number_a("SpecularFactor", 1.0);
        p.add_p70_number_a("ShininessExponent", 20.0);
        p.add_p70_color_a("ReflectionColor", 0.0, 0.0, 0.0);
        p.add_p70_number_a("ReflectionFactor", 1.0);
    }
    t.add_child(p);
    t
}

fn texture_template() -> FbxNode {
    let mut t = FbxNode::with_property("PropertyTemplate", "FbxFileTexture");
    let mut p = FbxNode::new("Properties70");
    p.add_p70_enum("TextureTypeUse", 0);
    p.add_p70_number_a("Texture alpha", 1.0);
    p.add_p70_enum("CurrentMappingType", 0);
    p.add_p70_enum("WrapModeU", 0);
    p.add_p70_enum("WrapModeV", 0);
    p.add_p70_bool("UVSwap", false);
    p.add_p70_bool("PremultiplyAlpha", true);
    p.add_p70_vector_a("Translation", 0.0, 0.0, 0.0);
    p.add_p70_vector_a("Rotation", 0.0, 0.0, 0.0);
    p.add_p70_vector_a("Scaling", 1.0, 1.0, 1.0);
    p.add_p70_vector("TextureRotationPivot", 0.0, 0.0, 0.0);
    p.add_p70_vector("TextureScalingPivot", 0.0, 0.0, 0.0);
    p.add_p70_enum("CurrentTextureBlendMode", 1);
    p.add_p70_string("UVSet", "default");
    p.add_p70_bool("UseMaterial", false);
    p.add_p70_bool("UseMipMap", false);
    t.add_child(p);
    t
}
