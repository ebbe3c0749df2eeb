#![forbid(unsafe_code)]

//! Reader, writer and repacker for NWF archives.
//!
//! An archive is a 12-byte header, a table of entry records and the entry
//! contents back to back. [`nwf::decode`] reads the table, [`nwf::to_xml`]
//! turns it into an editable schema, and [`nwf::plan`] plus [`nwf::encode`]
//! rebuild an archive from a schema and a directory of files.

pub mod nwf;
