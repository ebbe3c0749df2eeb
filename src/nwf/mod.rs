#![forbid(unsafe_code)]

mod error;
mod format;
mod io;
mod ops;
mod path;
mod plan;
mod read;
mod schema;
mod unpack;
mod write;

pub use error::{NwfError, NwfResult};
pub use format::{
    ArchiveEntry, ArchiveManifest, ENTRY_FIXED_LEN, HEADER_LEN, MAGIC, MAX_ENTRY_SIZE,
};

pub use ops::{
    check, decode_file, encode_file, list, read_schema, repack, unpack_file, verify_file,
    write_schema,
};
pub use plan::plan;
pub use read::{decode, verify};
pub use schema::{from_xml, to_xml};
pub use unpack::{unpack, UnpackOptions};
pub use write::{encode, table_len};
