#![forbid(unsafe_code)]

/// NWF archive magic, read as a little-endian i32.
pub const MAGIC: i32 = 0x6E77_6660;

/// Magic + reserved + entry count.
pub const HEADER_LEN: i64 = 12;

/// Fixed part of one entry record: name length, flag1, flag2, flag3, offset, size.
pub const ENTRY_FIXED_LEN: i64 = 20;

/// Largest entry the unpacker will allocate for by default (50 MiB).
pub const MAX_ENTRY_SIZE: u64 = 52_428_800;

/// One packed file's metadata.
///
/// The three flags have no known meaning and are carried through verbatim.
/// `offset` and `size` describe where the content sits in an archive; they are
/// recomputed by the repack planner and never trusted from a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub path: String,
    pub flag1: i16,
    pub flag2: i16,
    pub flag3: i32,
    pub offset: i32,
    pub size: i32,
}

impl ArchiveEntry {
    pub fn new(path: impl Into<String>, flag1: i16, flag2: i16, flag3: i32) -> Self {
        Self {
            path: path.into(),
            flag1,
            flag2,
            flag3,
            offset: 0,
            size: 0,
        }
    }

    /// Length of this entry's record in the entry table.
    pub fn record_len(&self) -> i64 {
        ENTRY_FIXED_LEN + self.path.len() as i64
    }
}

/// Ordered entries of an archive. Order is the on-disk layout order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveManifest {
    pub entries: Vec<ArchiveEntry>,
}

impl ArchiveManifest {
    pub fn new(entries: Vec<ArchiveEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ArchiveEntry> {
        self.entries.iter()
    }
}
