//! FBX document writer.
//!
//! [`FbxExporter`] drives one export: it walks the input scene, builds the
//! fixed envelope sections and the object graph as record trees, and emits
//! them through either the binary or the ASCII emitter.

mod envelope;
mod model;
mod node;
mod objects;
mod property;
mod stream;

pub use node::FbxNode;
pub use property::Property;
pub use stream::FbxStream;

use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

use crate::format::{
    BINARY_MAGIC, EXPORT_VERSION, EXPORT_VERSION_STR, FILE_ID, GENERIC_CREATION_TIME,
    NULL_RECORD, UID_SEED,
};
use crate::scene::Scene;
use crate::util::{Error, Result};

/// Underline used below ASCII section banner comments.
const ASCII_UNDERLINE: &str = ";------------------------------------------------------------------";

/// One top-level document section; the banner only appears in ASCII mode.
struct Section {
    banner: Option<&'static str>,
    node: FbxNode,
}

impl Section {
    fn plain(node: FbxNode) -> Self {
        Self { banner: None, node }
    }

    fn banner(banner: &'static str, node: FbxNode) -> Self {
        Self {
            banner: Some(banner),
            node,
        }
    }
}

/// Exporter for a single scene.
///
/// One instance can serve several exports; all per-export state (UID
/// counter, object tables, connection list) is reset at the start of each
/// run and nothing persists afterwards.
pub struct FbxExporter<'a> {
    scene: &'a Scene,
    /// Whether the current export is binary or ASCII.
    binary: bool,
    /// Last UID handed out; pre-incremented on allocation.
    last_uid: i64,
    /// Connection records accumulated while emitting objects, dumped into
    /// the Connections section in insertion order.
    connections: Vec<FbxNode>,
    /// UID of each input mesh, indexed like `scene.meshes`.
    mesh_uids: Vec<i64>,
    /// UID of each input material, indexed like `scene.materials`.
    material_uids: Vec<i64>,
    /// Texture UIDs keyed by resolved path; shared paths share one object.
    texture_uids: BTreeMap<String, i64>,
}

impl<'a> FbxExporter<'a> {
    /// Create an exporter for the given scene.
    pub fn new(scene: &'a Scene) -> Self {
        Self {
            scene,
            binary: true,
            last_uid: UID_SEED,
            connections: Vec::new(),
            mesh_uids: Vec::new(),
            material_uids: Vec::new(),
            texture_uids: BTreeMap::new(),
        }
    }

    /// Export in binary form to a seekable sink.
    pub fn write_binary<W: Write + Seek>(&mut self, sink: W) -> Result<()> {
        let mut stream = FbxStream::new(sink);
        self.emit_binary(&mut stream)
    }

    /// Export in binary form to a new file at `path`.
    pub fn export_binary(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let mut stream = FbxStream::create(path)?;
        self.emit_binary(&mut stream)
    }

    /// Export in ASCII form to a sink.
    pub fn write_ascii<W: Write>(&mut self, mut sink: W) -> Result<()> {
        self.reset();
        self.binary = false;

        writeln!(sink, "; FBX {EXPORT_VERSION_STR} project file")?;
        writeln!(sink, "; Created by {}", creator_string())?;
        writeln!(sink, "; ----------------------------------------------------")?;

        for section in self.build_document()? {
            if let Some(banner) = section.banner {
                writeln!(sink, "\n\n; {banner}\n{ASCII_UNDERLINE}\n")?;
            }
            section.node.emit_ascii(&mut sink, 0)?;
        }
        sink.flush()?;
        Ok(())
    }

    /// Export in ASCII form to a new file at `path`.
    pub fn export_ascii(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(|_| Error::Open(path.as_ref().to_path_buf()))?;
        self.write_ascii(BufWriter::new(file))
    }

    fn emit_binary<W: Write + Seek>(&mut self, stream: &mut FbxStream<W>) -> Result<()> {
        self.reset();
        self.binary = true;

        stream.write_bytes(BINARY_MAGIC)?;
        stream.write_u32(EXPORT_VERSION)?;

        for section in self.build_document()? {
            section.node.emit_binary(stream)?;
        }

        // the top-level record list ends with one null record
        stream.write_bytes(&NULL_RECORD)?;
        self.write_binary_footer(stream)?;
        stream.flush()
    }

    /// Build the fixed top-level record sequence.
    ///
    /// FileId, CreationTime and the top-level Creator are binary-only
    /// records; the ASCII variant carries the creator inside
    /// FBXHeaderExtension and has no raw-byte FileId form.
    fn build_document(&mut self) -> Result<Vec<Section>> {
        let mut sections = vec![Section::plain(self.header_extension())];

        if self.binary {
            sections.push(Section::plain(FbxNode::with_property(
                "FileId",
                FILE_ID.to_vec(),
            )));
            sections.push(Section::plain(FbxNode::with_property(
                "CreationTime",
                GENERIC_CREATION_TIME,
            )));
            sections.push(Section::plain(FbxNode::with_property(
                "Creator",
                creator_string(),
            )));
        }

        sections.push(Section::banner("Global settings", self.global_settings()));
        sections.push(Section::banner("Documents Description", self.documents()));
        sections.push(Section::banner(
            "Document References",
            FbxNode::new("References"),
        ));
        sections.push(Section::banner("Object definitions", self.definitions()));
        sections.push(Section::banner("Object properties", self.objects()?));
        sections.push(Section::banner(
            "Object connections",
            self.connections_section(),
        ));
        Ok(sections)
    }

    /// Allocate the next UID. Monotonic within one export; a UID never
    /// changes once handed to an object.
    fn generate_uid(&mut self) -> i64 {
        self.last_uid += 1;
        self.last_uid
    }

    /// Record an object-to-object connection (child attaches to parent).
    fn connect_oo(&mut self, src_uid: i64, dst_uid: i64) {
        let mut c = FbxNode::new("C");
        c.add_property("OO");
        c.add_property(src_uid);
        c.add_property(dst_uid);
        self.connections.push(c);
    }

    /// Record an object-to-property connection.
    fn connect_op(&mut self, src_uid: i64, dst_uid: i64, property: &str) {
        let mut c = FbxNode::new("C");
        c.add_property("OP");
        c.add_property(src_uid);
        c.add_property(dst_uid);
        c.add_property(property);
        self.connections.push(c);
    }

    /// Drain the accumulated connection list into the Connections record.
    fn connections_section(&mut self) -> FbxNode {
        let mut conn = FbxNode::new("Connections");
        conn.children = std::mem::take(&mut self.connections);
        conn
    }

    fn reset(&mut self) {
        self.last_uid = UID_SEED;
        self.connections.clear();
        self.mesh_uids.clear();
        self.material_uids.clear();
        self.texture_uids.clear();
    }
}

/// Creator string stamped into the header sections.
pub(crate) fn creator_string() -> String {
    format!(
        "FBX scene exporter (fbx-export) v{}",
        env!("CARGO_PKG_VERSION")
    )
}
