//! Typed FBX property values.
//!
//! Each property serialises as a one-character type tag followed by its
//! payload. The variants here map one-to-one onto the tags FBX 7.4
//! recognises; construction goes through per-type `From` impls so a value
//! can never silently change type on the way in.

use std::fmt::Display;
use std::io::{Seek, Write};

use crate::format::SEPARATOR;
use crate::util::{Error, Result};

use super::stream::FbxStream;

/// Column width after which ASCII array lines wrap (2014 convention).
const ASCII_ARRAY_WRAP: usize = 250;

/// A single typed property value.
///
/// Scalar tags: `C` bool, `Y` i16, `I` i32, `F` f32, `D` f64, `L` i64.
/// Length-prefixed tags: `S` string (may contain interior NUL as the
/// name/class separator), `R` raw bytes. Array tags `b`, `i`, `l`, `f`,
/// `d` share one envelope: element count, encoding (always 0 =
/// uncompressed), payload byte count, elements.
#[derive(Clone, Debug, PartialEq)]
pub enum Property {
    Bool(bool),
    I16(i16),
    I32(i32),
    F32(f32),
    F64(f64),
    I64(i64),
    String(String),
    Raw(Vec<u8>),
    BoolArray(Vec<bool>),
    I32Array(Vec<i32>),
    I64Array(Vec<i64>),
    F32Array(Vec<f32>),
    F64Array(Vec<f64>),
}

impl Property {
    /// The one-character wire tag.
    pub fn tag(&self) -> u8 {
        match self {
            Property::Bool(_) => b'C',
            Property::I16(_) => b'Y',
            Property::I32(_) => b'I',
            Property::F32(_) => b'F',
            Property::F64(_) => b'D',
            Property::I64(_) => b'L',
            Property::String(_) => b'S',
            Property::Raw(_) => b'R',
            Property::BoolArray(_) => b'b',
            Property::I32Array(_) => b'i',
            Property::I64Array(_) => b'l',
            Property::F32Array(_) => b'f',
            Property::F64Array(_) => b'd',
        }
    }

    /// Total encoded size in bytes, tag included.
    pub fn wire_size(&self) -> u64 {
        let payload = match self {
            Property::Bool(_) => 1,
            Property::I16(_) => 2,
            Property::I32(_) | Property::F32(_) => 4,
            Property::F64(_) | Property::I64(_) => 8,
            Property::String(s) => 4 + s.len() as u64,
            Property::Raw(r) => 4 + r.len() as u64,
            Property::BoolArray(v) => 12 + v.len() as u64,
            Property::I32Array(v) => 12 + 4 * v.len() as u64,
            Property::I64Array(v) => 12 + 8 * v.len() as u64,
            Property::F32Array(v) => 12 + 4 * v.len() as u64,
            Property::F64Array(v) => 12 + 8 * v.len() as u64,
        };
        1 + payload
    }

    /// Write the binary form: tag byte, then payload, little-endian.
    pub fn emit_binary<W: Write + Seek>(&self, s: &mut FbxStream<W>) -> Result<()> {
        s.write_u8(self.tag())?;
        match self {
            Property::Bool(v) => s.write_u8(*v as u8),
            Property::I16(v) => s.write_i16(*v),
            Property::I32(v) => s.write_i32(*v),
            Property::F32(v) => s.write_f32(*v),
            Property::F64(v) => s.write_f64(*v),
            Property::I64(v) => s.write_i64(*v),
            Property::String(v) => {
                s.write_u32(v.len() as u32)?;
                s.write_bytes(v.as_bytes())
            }
            Property::Raw(v) => {
                s.write_u32(v.len() as u32)?;
                s.write_bytes(v)
            }
            Property::BoolArray(v) => {
                Self::array_envelope(s, v.len(), 1)?;
                for b in v {
                    s.write_u8(*b as u8)?;
                }
                Ok(())
            }
            Property::I32Array(v) => {
                Self::array_envelope(s, v.len(), 4)?;
                for x in v {
                    s.write_i32(*x)?;
                }
                Ok(())
            }
            Property::I64Array(v) => {
                Self::array_envelope(s, v.len(), 8)?;
                for x in v {
                    s.write_i64(*x)?;
                }
                Ok(())
            }
            Property::F32Array(v) => {
                Self::array_envelope(s, v.len(), 4)?;
                for x in v {
                    s.write_f32(*x)?;
                }
                Ok(())
            }
            Property::F64Array(v) => {
                Self::array_envelope(s, v.len(), 8)?;
                for x in v {
                    s.write_f64(*x)?;
                }
                Ok(())
            }
        }
    }

    /// Array header: element count, encoding 0 (uncompressed), byte count.
    fn array_envelope<W: Write + Seek>(
        s: &mut FbxStream<W>,
        count: usize,
        elem_size: usize,
    ) -> Result<()> {
        s.write_u32(count as u32)?;
        s.write_u32(0)?;
        s.write_u32((count * elem_size) as u32)?;
        Ok(())
    }

    /// Write the textual form.
    ///
    /// Booleans are `T`/`F`, numbers print with round-trip precision,
    /// strings are quoted with the name/class separator rendered as
    /// `class::name`. Arrays emit the `*N { a: ... }` block form; `indent`
    /// is the nesting depth of the owning record. Raw data has no text
    /// form and is rejected.
    pub fn emit_ascii<W: Write>(&self, w: &mut W, indent: usize) -> Result<()> {
        match self {
            Property::Bool(v) => {
                write!(w, "{}", if *v { 'T' } else { 'F' })?;
                Ok(())
            }
            Property::I16(v) => Ok(write!(w, "{v}")?),
            Property::I32(v) => Ok(write!(w, "{v}")?),
            Property::F32(v) => Ok(write!(w, "{v}")?),
            Property::F64(v) => Ok(write!(w, "{v}")?),
            Property::I64(v) => Ok(write!(w, "{v}")?),
            Property::String(v) => {
                // the binary form stores "name<sep>class"; ascii swaps the
                // fields around "::"
                match v.find(SEPARATOR) {
                    Some(pos) => {
                        let name = &v[..pos];
                        let class = &v[pos + SEPARATOR.len()..];
                        write!(w, "\"{class}::{name}\"")?;
                    }
                    None => write!(w, "\"{v}\"")?,
                }
                Ok(())
            }
            Property::Raw(_) => Err(Error::InvalidProperty('R')),
            Property::BoolArray(v) => {
                Self::emit_ascii_array(w, indent, v.len(), v.iter().map(|b| *b as u8))
            }
            Property::I32Array(v) => {
                Self::emit_ascii_array(w, indent, v.len(), v.iter())
            }
            Property::I64Array(v) => {
                Self::emit_ascii_array(w, indent, v.len(), v.iter())
            }
            Property::F32Array(v) => {
                Self::emit_ascii_array(w, indent, v.len(), v.iter())
            }
            Property::F64Array(v) => {
                Self::emit_ascii_array(w, indent, v.len(), v.iter())
            }
        }
    }

    fn emit_ascii_array<W: Write, T: Display>(
        w: &mut W,
        indent: usize,
        count: usize,
        values: impl Iterator<Item = T>,
    ) -> Result<()> {
        let pad = "  ".repeat(indent + 1);
        writeln!(w, "*{count} {{")?;
        write!(w, "{pad}a: ")?;
        let mut column = pad.len() + 3;
        for (i, v) in values.enumerate() {
            if i > 0 {
                write!(w, ",")?;
                column += 1;
            }
            if column > ASCII_ARRAY_WRAP {
                write!(w, "\n{pad}")?;
                column = pad.len();
            }
            let text = v.to_string();
            column += text.len();
            w.write_all(text.as_bytes())?;
        }
        writeln!(w)?;
        write!(w, "{}}}", "  ".repeat(indent))?;
        Ok(())
    }
}

impl From<bool> for Property {
    fn from(v: bool) -> Self {
        Property::Bool(v)
    }
}

impl From<i16> for Property {
    fn from(v: i16) -> Self {
        Property::I16(v)
    }
}

impl From<i32> for Property {
    fn from(v: i32) -> Self {
        Property::I32(v)
    }
}

impl From<f32> for Property {
    fn from(v: f32) -> Self {
        Property::F32(v)
    }
}

impl From<f64> for Property {
    fn from(v: f64) -> Self {
        Property::F64(v)
    }
}

impl From<i64> for Property {
    fn from(v: i64) -> Self {
        Property::I64(v)
    }
}

impl From<&str> for Property {
    fn from(v: &str) -> Self {
        Property::String(v.to_string())
    }
}

impl From<String> for Property {
    fn from(v: String) -> Self {
        Property::String(v)
    }
}

impl From<Vec<u8>> for Property {
    fn from(v: Vec<u8>) -> Self {
        Property::Raw(v)
    }
}

impl From<Vec<bool>> for Property {
    fn from(v: Vec<bool>) -> Self {
        Property::BoolArray(v)
    }
}

impl From<Vec<i32>> for Property {
    fn from(v: Vec<i32>) -> Self {
        Property::I32Array(v)
    }
}

impl From<Vec<i64>> for Property {
    fn from(v: Vec<i64>) -> Self {
        Property::I64Array(v)
    }
}

impl From<Vec<f32>> for Property {
    fn from(v: Vec<f32>) -> Self {
        Property::F32Array(v)
    }
}

impl From<Vec<f64>> for Property {
    fn from(v: Vec<f64>) -> Self {
        Property::F64Array(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn binary_bytes(p: &Property) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut s = FbxStream::new(&mut cursor);
            p.emit_binary(&mut s).unwrap();
        }
        cursor.into_inner()
    }

    fn ascii_string(p: &Property) -> String {
        let mut out = Vec::new();
        p.emit_ascii(&mut out, 0).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_scalar_binary_forms() {
        assert_eq!(binary_bytes(&Property::Bool(true)), vec![b'C', 1]);
        assert_eq!(binary_bytes(&Property::I16(-2)), vec![b'Y', 0xfe, 0xff]);
        assert_eq!(
            binary_bytes(&Property::I32(7400)),
            vec![b'I', 0xe8, 0x1c, 0, 0]
        );
        assert_eq!(
            binary_bytes(&Property::F64(1.0)),
            vec![b'D', 0, 0, 0, 0, 0, 0, 0xf0, 0x3f]
        );
    }

    #[test]
    fn test_string_binary_form() {
        let p = Property::from("Mesh");
        assert_eq!(
            binary_bytes(&p),
            vec![b'S', 4, 0, 0, 0, b'M', b'e', b's', b'h']
        );
    }

    #[test]
    fn test_array_envelope() {
        let p = Property::from(vec![1i32, -2, 3]);
        let bytes = binary_bytes(&p);
        assert_eq!(bytes[0], b'i');
        assert_eq!(&bytes[1..5], &3u32.to_le_bytes()); // count
        assert_eq!(&bytes[5..9], &0u32.to_le_bytes()); // encoding
        assert_eq!(&bytes[9..13], &12u32.to_le_bytes()); // payload bytes
        assert_eq!(bytes.len(), 13 + 12);
    }

    #[test]
    fn test_wire_size_matches_emission() {
        let props = [
            Property::Bool(false),
            Property::I16(1),
            Property::I32(2),
            Property::F32(3.0),
            Property::F64(4.0),
            Property::I64(5),
            Property::from("hello\x00\x01Model"),
            Property::Raw(vec![1, 2, 3]),
            Property::from(vec![true, false]),
            Property::from(vec![1i32, 2]),
            Property::from(vec![1i64]),
            Property::from(vec![1.0f32, 2.0]),
            Property::from(vec![1.0f64, 2.0, 3.0]),
        ];
        for p in props {
            assert_eq!(
                binary_bytes(&p).len() as u64,
                p.wire_size(),
                "wire_size mismatch for tag {}",
                p.tag() as char
            );
        }
    }

    #[test]
    fn test_ascii_bool_and_numbers() {
        assert_eq!(ascii_string(&Property::Bool(true)), "T");
        assert_eq!(ascii_string(&Property::Bool(false)), "F");
        assert_eq!(ascii_string(&Property::I32(-7)), "-7");
        assert_eq!(ascii_string(&Property::F64(0.5)), "0.5");
    }

    #[test]
    fn test_ascii_double_round_trips() {
        let v = 0.123456789012345678;
        let text = ascii_string(&Property::F64(v));
        assert_eq!(text.parse::<f64>().unwrap(), v);
    }

    #[test]
    fn test_ascii_string_class_swap() {
        assert_eq!(ascii_string(&Property::from("plain")), "\"plain\"");
        assert_eq!(
            ascii_string(&Property::from("Cube\x00\x01Model")),
            "\"Model::Cube\""
        );
    }

    #[test]
    fn test_ascii_array_form() {
        let p = Property::from(vec![0i32, 1, -2]);
        assert_eq!(ascii_string(&p), "*3 {\n  a: 0,1,-2\n}");
    }

    #[test]
    fn test_ascii_rejects_raw() {
        let p = Property::Raw(vec![0; 4]);
        let mut out = Vec::new();
        assert!(matches!(
            p.emit_ascii(&mut out, 0),
            Err(Error::InvalidProperty('R'))
        ));
    }

    #[test]
    fn test_long_array_wraps_lines() {
        let p = Property::from((0..500).collect::<Vec<i32>>());
        let text = ascii_string(&p);
        let long_lines = text.lines().filter(|l| l.len() > 300).count();
        assert_eq!(long_lines, 0);
        assert!(text.lines().count() > 3);
    }
}
