//! FBX record tree.
//!
//! A record is a named node carrying an ordered property list and ordered
//! children. The same tree drives both emitters: the binary form with its
//! end-offset back-patching and null-record child terminator, and the
//! indented ASCII form.

use std::io::{Seek, Write};

use crate::format::NULL_RECORD;
use crate::util::Result;

use super::property::Property;
use super::stream::FbxStream;

/// A named record with properties and children.
#[derive(Clone, Debug, Default)]
pub struct FbxNode {
    /// Record name (ASCII, at most 255 bytes).
    pub name: String,
    /// Ordered property list.
    pub properties: Vec<Property>,
    /// Ordered child records.
    pub children: Vec<FbxNode>,
}

impl FbxNode {
    /// Create an empty record.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            properties: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create a record holding a single property.
    pub fn with_property(name: &str, value: impl Into<Property>) -> Self {
        let mut node = Self::new(name);
        node.properties.push(value.into());
        node
    }

    /// Append a property.
    pub fn add_property(&mut self, value: impl Into<Property>) {
        self.properties.push(value.into());
    }

    /// Append a child record.
    pub fn add_child(&mut self, child: FbxNode) {
        self.children.push(child);
    }

    /// Append a child record holding a single property.
    pub fn add_child_value(&mut self, name: &str, value: impl Into<Property>) {
        self.children.push(Self::with_property(name, value));
    }

    /// Encoded size of the property list in bytes.
    pub fn property_list_size(&self) -> u64 {
        self.properties.iter().map(Property::wire_size).sum()
    }

    /// Write the binary record.
    ///
    /// The header is written with a placeholder end offset, patched once
    /// the subtree is on the wire. Property count and list size are known
    /// up front. A record with children is closed by the 13-byte null
    /// record; the patched end offset points at the first byte after it.
    pub fn emit_binary<W: Write + Seek>(&self, s: &mut FbxStream<W>) -> Result<()> {
        debug_assert!(self.name.len() <= u8::MAX as usize);
        debug_assert!(self.name.is_ascii());

        let start = s.pos();
        s.write_u32(0)?; // end offset, patched below
        s.write_u32(self.properties.len() as u32)?;
        s.write_u32(self.property_list_size() as u32)?;
        s.write_u8(self.name.len() as u8)?;
        s.write_bytes(self.name.as_bytes())?;

        for prop in &self.properties {
            prop.emit_binary(s)?;
        }
        for child in &self.children {
            child.emit_binary(s)?;
        }
        if !self.children.is_empty() {
            s.write_bytes(&NULL_RECORD)?;
        }

        let end = s.pos();
        s.seek(start)?;
        s.write_u32(end as u32)?;
        s.seek(end)?;
        Ok(())
    }

    /// Write the ASCII record at the given nesting depth.
    ///
    /// Two spaces of indentation per depth. Children are wrapped in
    /// braces; a childless record has none.
    pub fn emit_ascii<W: Write>(&self, w: &mut W, indent: usize) -> Result<()> {
        let pad = "  ".repeat(indent);
        write!(w, "{pad}{}: ", self.name)?;
        for (i, prop) in self.properties.iter().enumerate() {
            if i > 0 {
                write!(w, ", ")?;
            }
            prop.emit_ascii(w, indent)?;
        }
        if self.children.is_empty() {
            writeln!(w)?;
        } else {
            writeln!(w, " {{")?;
            for child in &self.children {
                child.emit_ascii(w, indent + 1)?;
            }
            writeln!(w, "{pad}}}")?;
        }
        Ok(())
    }
}

/// Properties70 entry helpers.
///
/// Each helper appends one `P` child with the `(name, type, label, flags,
/// values...)` shape FBX 7.x uses. The `_a` variants mark the entry
/// animatable.
impl FbxNode {
    /// Generic P entry.
    pub fn add_p70(
        &mut self,
        name: &str,
        typ: &str,
        label: &str,
        flags: &str,
        values: impl IntoIterator<Item = Property>,
    ) {
        let mut p = FbxNode::new("P");
        p.add_property(name);
        p.add_property(typ);
        p.add_property(label);
        p.add_property(flags);
        for v in values {
            p.properties.push(v);
        }
        self.add_child(p);
    }

    pub fn add_p70_int(&mut self, name: &str, value: i32) {
        self.add_p70(name, "int", "Integer", "", [Property::I32(value)]);
    }

    pub fn add_p70_bool(&mut self, name: &str, value: bool) {
        self.add_p70(name, "bool", "", "", [Property::I32(value as i32)]);
    }

    pub fn add_p70_double(&mut self, name: &str, value: f64) {
        self.add_p70(name, "double", "Number", "", [Property::F64(value)]);
    }

    pub fn add_p70_number_a(&mut self, name: &str, value: f64) {
        self.add_p70(name, "Number", "", "A", [Property::F64(value)]);
    }

    pub fn add_p70_color(&mut self, name: &str, r: f64, g: f64, b: f64) {
        self.add_p70(
            name,
            "ColorRGB",
            "Color",
            "",
            [Property::F64(r), Property::F64(g), Property::F64(b)],
        );
    }

    pub fn add_p70_color_a(&mut self, name: &str, r: f64, g: f64, b: f64) {
        self.add_p70(
            name,
            "Color",
            "",
            "A",
            [Property::F64(r), Property::F64(g), Property::F64(b)],
        );
    }

    pub fn add_p70_vector(&mut self, name: &str, x: f64, y: f64, z: f64) {
        self.add_p70(
            name,
            "Vector3D",
            "Vector",
            "",
            [Property::F64(x), Property::F64(y), Property::F64(z)],
        );
    }

    pub fn add_p70_vector_a(&mut self, name: &str, x: f64, y: f64, z: f64) {
        self.add_p70(
            name,
            "Vector",
            "",
            "A",
            [Property::F64(x), Property::F64(y), Property::F64(z)],
        );
    }

    pub fn add_p70_string(&mut self, name: &str, value: &str) {
        self.add_p70(name, "KString", "", "", [Property::from(value)]);
    }

    pub fn add_p70_enum(&mut self, name: &str, value: i32) {
        self.add_p70(name, "enum", "", "", [Property::I32(value)]);
    }

    pub fn add_p70_time(&mut self, name: &str, value: i64) {
        self.add_p70(name, "KTime", "Time", "", [Property::I64(value)]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn emit(node: &FbxNode) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut s = FbxStream::new(&mut cursor);
            node.emit_binary(&mut s).unwrap();
        }
        cursor.into_inner()
    }

    fn ascii(node: &FbxNode) -> String {
        let mut out = Vec::new();
        node.emit_ascii(&mut out, 0).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_leaf_layout() {
        let node = FbxNode::with_property("Version", 232i32);
        let bytes = emit(&node);
        // end offset closes over the whole record
        assert_eq!(&bytes[0..4], &(bytes.len() as u32).to_le_bytes());
        assert_eq!(&bytes[4..8], &1u32.to_le_bytes()); // one property
        assert_eq!(&bytes[8..12], &5u32.to_le_bytes()); // I32 wire size
        assert_eq!(bytes[12], 7); // name length
        assert_eq!(&bytes[13..20], b"Version");
        // leaf: no null record
        assert_ne!(&bytes[bytes.len() - 13..], &NULL_RECORD);
    }

    #[test]
    fn test_terminal_record_is_header_only() {
        let node = FbxNode::new("References");
        let bytes = emit(&node);
        assert_eq!(bytes.len(), 12 + 1 + "References".len());
        assert_eq!(&bytes[0..4], &(bytes.len() as u32).to_le_bytes());
    }

    #[test]
    fn test_children_get_null_terminator() {
        let mut node = FbxNode::new("Objects");
        node.add_child_value("Version", 100i32);
        let bytes = emit(&node);
        assert_eq!(&bytes[bytes.len() - 13..], &NULL_RECORD);
        assert_eq!(&bytes[0..4], &(bytes.len() as u32).to_le_bytes());
    }

    #[test]
    fn test_property_size_accounting() {
        let mut node = FbxNode::new("C");
        node.add_property("OO");
        node.add_property(1_000_000i64);
        node.add_property(0i64);
        let bytes = emit(&node);
        let listed = u32::from_le_bytes(bytes[8..12].try_into().unwrap());
        assert_eq!(u64::from(listed), node.property_list_size());
        // header + name + properties, no terminator
        assert_eq!(bytes.len() as u64, 13 + 1 + node.property_list_size());
    }

    #[test]
    fn test_nested_offsets_close() {
        let mut inner = FbxNode::new("Inner");
        inner.add_child_value("Leaf", 1i32);
        let mut outer = FbxNode::new("Outer");
        outer.add_child(inner);
        let bytes = emit(&outer);
        let outer_end = u32::from_le_bytes(bytes[0..4].try_into().unwrap());
        assert_eq!(outer_end as usize, bytes.len());
        // the inner record starts right after the outer header
        let inner_start = 12 + 1 + "Outer".len();
        let inner_end = u32::from_le_bytes(
            bytes[inner_start..inner_start + 4].try_into().unwrap(),
        );
        // inner ends exactly 13 bytes (outer terminator) before the outer end
        assert_eq!(inner_end as usize, bytes.len() - 13);
    }

    #[test]
    fn test_ascii_leaf_and_parent() {
        let mut model = FbxNode::new("Model");
        model.add_property(1_000_000i64);
        model.add_property("Cube\x00\x01Model");
        model.add_property("Mesh");
        model.add_child_value("Version", 232i32);
        assert_eq!(
            ascii(&model),
            "Model: 1000000, \"Model::Cube\", \"Mesh\" {\n  Version: 232\n}\n"
        );
    }

    #[test]
    fn test_ascii_no_properties_double_space() {
        let mut props = FbxNode::new("Properties70");
        props.add_p70_int("UpAxis", 1);
        let text = ascii(&props);
        assert!(text.starts_with("Properties70:  {\n"));
        assert!(text.contains("  P: \"UpAxis\", \"int\", \"Integer\", \"\", 1\n"));
    }

    #[test]
    fn test_ascii_childless_has_no_braces() {
        let node = FbxNode::with_property("Creator", "test");
        assert_eq!(ascii(&node), "Creator: \"test\"\n");
    }

    #[test]
    fn test_p70_helper_shapes() {
        let mut n = FbxNode::new("Properties70");
        n.add_p70_bool("Show", true);
        n.add_p70_color_a("DiffuseColor", 0.1, 0.2, 0.3);
        n.add_p70_time("TimeSpanStart", 0);

        let p = &n.children[0];
        assert_eq!(p.properties[1], Property::from("bool"));
        assert_eq!(p.properties[4], Property::I32(1));

        let p = &n.children[1];
        assert_eq!(p.properties[1], Property::from("Color"));
        assert_eq!(p.properties[3], Property::from("A"));
        assert_eq!(p.properties.len(), 7);

        let p = &n.children[2];
        assert_eq!(p.properties[4], Property::I64(0));
    }
}
