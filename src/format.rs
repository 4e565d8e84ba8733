//! FBX wire-format constants.
//!
//! The binary header, footer and FileId values are the fixed byte sequences
//! accepted by all known FBX consumers. Files written by the official SDK
//! derive FileId and the first footer block from the creation time with an
//! undocumented hash; a fixed known-good value is compatible everywhere.

/// Magic bytes at the start of a binary FBX file (23 bytes, including the
/// trailing `00 1A 00`).
pub const BINARY_MAGIC: &[u8; 23] = b"Kaydara FBX Binary  \x00\x1a\x00";

/// Exported FBX version, "multiplied" by 1000 (7.4 => 7400, i.e. 2014/2015).
pub const EXPORT_VERSION: u32 = 7400;

/// Version string used in the ASCII header comment.
pub const EXPORT_VERSION_STR: &str = "7.4.0";

/// FBXHeaderVersion child of FBXHeaderExtension.
pub const HEADER_VERSION: i32 = 1003;

/// Fixed CreationTime string. The binary CreationTime record does not have
/// to match CreationTimeStamp; this literal is what Blender writes.
pub const GENERIC_CREATION_TIME: &str = "1970-01-01 10:00:00:000";

/// Fixed FileId payload (16 raw bytes).
pub const FILE_ID: [u8; 16] = [
    0x28, 0xb3, 0x2a, 0xeb, 0xb6, 0x24, 0xcc, 0xc2,
    0xbf, 0xc8, 0xb0, 0x2a, 0xa9, 0x2b, 0xfc, 0xf1,
];

/// First 16-byte magic block of the binary footer.
pub const FOOTER_ID: [u8; 16] = [
    0xfa, 0xbc, 0xab, 0x09, 0xd0, 0xc8, 0xd4, 0x66,
    0xb1, 0x76, 0xfb, 0x83, 0x1c, 0xf7, 0x26, 0x7e,
];

/// Final 16-byte magic tail of the binary footer.
pub const FOOTER_TAIL: [u8; 16] = [
    0xf8, 0x5a, 0x8c, 0x6a, 0xde, 0xf5, 0xd9, 0x7e,
    0xec, 0xe9, 0x0c, 0xe3, 0x75, 0x8f, 0x29, 0x0b,
];

/// 13-byte zero sentinel ending a children list in a binary record.
/// Shaped like a zero-length, zero-property record header with no name.
pub const NULL_RECORD: [u8; 13] = [0; 13];

/// Name/class separator inside FBX object name strings
/// (`"Cube\x00\x01Model"`). ASCII output reverses the two fields around
/// `::`.
pub const SEPARATOR: &str = "\x00\x01";

/// Marker substring of synthetic transform-chain nodes created by the
/// companion importer, followed by the chain element name. Boundary
/// contract with the import side; a different importer needs a different
/// marker.
pub const SENTINEL_TAG: &str = "_$AssimpFbx$_";

/// One second in KTime units.
pub const KTIME_SECOND: i64 = 46_186_158_000;

/// UID allocation seed; the allocator pre-increments, so the first UID
/// handed out is 1_000_000.
pub const UID_SEED: i64 = 999_999;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magic() {
        assert_eq!(BINARY_MAGIC.len(), 23);
        assert_eq!(&BINARY_MAGIC[..20], b"Kaydara FBX Binary  ");
        assert_eq!(&BINARY_MAGIC[20..], &[0x00, 0x1a, 0x00]);
    }

    #[test]
    fn test_version_word() {
        assert_eq!(EXPORT_VERSION, 7400);
        assert_eq!(EXPORT_VERSION.to_le_bytes(), [0xe8, 0x1c, 0x00, 0x00]);
    }

    #[test]
    fn test_null_record() {
        assert_eq!(NULL_RECORD.len(), 13);
        assert!(NULL_RECORD.iter().all(|b| *b == 0));
    }

    #[test]
    fn test_separator_bytes() {
        assert_eq!(SEPARATOR.as_bytes(), &[0x00, 0x01]);
    }

    #[test]
    fn test_sentinel_tag() {
        assert!("X_$AssimpFbx$_Translation".contains(SENTINEL_TAG));
    }
}
