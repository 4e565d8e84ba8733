//! Minimal binary FBX decoder used by the integration tests.
//!
//! Deliberately strict: it panics on any structural inconsistency, so a
//! successful decode doubles as a check of the record offset and property
//! size invariants.

#![allow(dead_code)]

/// Decoded property value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Str(String),
    Raw(Vec<u8>),
    BoolArray(Vec<bool>),
    I32Array(Vec<i32>),
    I64Array(Vec<i64>),
    F32Array(Vec<f32>),
    F64Array(Vec<f64>),
}

impl Value {
    pub fn as_i64(&self) -> i64 {
        match self {
            Value::I64(v) => *v,
            other => panic!("expected i64, got {other:?}"),
        }
    }

    pub fn as_i32(&self) -> i32 {
        match self {
            Value::I32(v) => *v,
            other => panic!("expected i32, got {other:?}"),
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            Value::F64(v) => *v,
            other => panic!("expected f64, got {other:?}"),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Value::Str(v) => v,
            other => panic!("expected string, got {other:?}"),
        }
    }

    pub fn as_f64_array(&self) -> &[f64] {
        match self {
            Value::F64Array(v) => v,
            other => panic!("expected f64 array, got {other:?}"),
        }
    }

    pub fn as_i32_array(&self) -> &[i32] {
        match self {
            Value::I32Array(v) => v,
            other => panic!("expected i32 array, got {other:?}"),
        }
    }
}

/// Decoded record.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub properties: Vec<Value>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn expect_child(&self, name: &str) -> &Node {
        self.child(name)
            .unwrap_or_else(|| panic!("no child \"{name}\" in \"{}\"", self.name))
    }

    pub fn children_named(&self, name: &str) -> Vec<&Node> {
        self.children.iter().filter(|c| c.name == name).collect()
    }
}

/// A decoded binary document: version word, top-level records and the raw
/// footer bytes following the top-level null record.
pub struct Document {
    pub version: u32,
    pub nodes: Vec<Node>,
    pub footer: Vec<u8>,
}

impl Document {
    pub fn section(&self, name: &str) -> &Node {
        self.nodes
            .iter()
            .find(|n| n.name == name)
            .unwrap_or_else(|| panic!("no top-level section \"{name}\""))
    }
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn bytes(&mut self, n: usize) -> &'a [u8] {
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        slice
    }

    fn u8(&mut self) -> u8 {
        self.bytes(1)[0]
    }

    fn u32(&mut self) -> u32 {
        u32::from_le_bytes(self.bytes(4).try_into().unwrap())
    }

    fn i16(&mut self) -> i16 {
        i16::from_le_bytes(self.bytes(2).try_into().unwrap())
    }

    fn i32(&mut self) -> i32 {
        i32::from_le_bytes(self.bytes(4).try_into().unwrap())
    }

    fn i64(&mut self) -> i64 {
        i64::from_le_bytes(self.bytes(8).try_into().unwrap())
    }

    fn f32(&mut self) -> f32 {
        f32::from_le_bytes(self.bytes(4).try_into().unwrap())
    }

    fn f64(&mut self) -> f64 {
        f64::from_le_bytes(self.bytes(8).try_into().unwrap())
    }
}

/// Decode a complete binary FBX document, panicking on malformed input.
pub fn decode_document(data: &[u8]) -> Document {
    assert_eq!(&data[..23], b"Kaydara FBX Binary  \x00\x1a\x00", "bad magic");
    let mut r = Reader { data, pos: 23 };
    let version = r.u32();

    let mut nodes = Vec::new();
    while let Some(node) = decode_node(&mut r) {
        nodes.push(node);
    }

    Document {
        version,
        nodes,
        footer: data[r.pos..].to_vec(),
    }
}

/// Decode one record; `None` means a 13-byte null record was consumed.
fn decode_node(r: &mut Reader) -> Option<Node> {
    let end_offset = r.u32() as usize;
    let num_properties = r.u32() as usize;
    let property_list_size = r.u32() as usize;
    let name_length = r.u8() as usize;

    if end_offset == 0 && num_properties == 0 && property_list_size == 0 && name_length == 0 {
        return None;
    }

    let name = String::from_utf8(r.bytes(name_length).to_vec()).expect("non-UTF8 record name");

    let prop_start = r.pos;
    let properties: Vec<Value> = (0..num_properties).map(|_| decode_value(r)).collect();
    assert_eq!(
        r.pos - prop_start,
        property_list_size,
        "property size accounting broken in \"{name}\""
    );

    let mut children = Vec::new();
    if r.pos < end_offset {
        while let Some(child) = decode_node(r) {
            children.push(child);
        }
    }
    assert_eq!(r.pos, end_offset, "end offset does not close \"{name}\"");

    Some(Node {
        name,
        properties,
        children,
    })
}

fn decode_value(r: &mut Reader) -> Value {
    let tag = r.u8();
    match tag {
        b'C' => Value::Bool(r.u8() == 1),
        b'Y' => Value::I16(r.i16()),
        b'I' => Value::I32(r.i32()),
        b'L' => Value::I64(r.i64()),
        b'F' => Value::F32(r.f32()),
        b'D' => Value::F64(r.f64()),
        b'S' => {
            let len = r.u32() as usize;
            Value::Str(String::from_utf8(r.bytes(len).to_vec()).expect("non-UTF8 string"))
        }
        b'R' => {
            let len = r.u32() as usize;
            Value::Raw(r.bytes(len).to_vec())
        }
        b'b' => Value::BoolArray(decode_array(r, |r| r.u8() == 1, 1)),
        b'i' => Value::I32Array(decode_array(r, Reader::i32, 4)),
        b'l' => Value::I64Array(decode_array(r, Reader::i64, 8)),
        b'f' => Value::F32Array(decode_array(r, Reader::f32, 4)),
        b'd' => Value::F64Array(decode_array(r, Reader::f64, 8)),
        other => panic!("unknown property tag {other:#04x}"),
    }
}

fn decode_array<'a, T>(
    r: &mut Reader<'a>,
    element: impl Fn(&mut Reader<'a>) -> T,
    width: usize,
) -> Vec<T> {
    let count = r.u32() as usize;
    let encoding = r.u32();
    let payload = r.u32() as usize;
    assert_eq!(encoding, 0, "only uncompressed arrays are written");
    assert_eq!(payload, count * width, "array payload size mismatch");
    (0..count).map(|_| element(r)).collect()
}
