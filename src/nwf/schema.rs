#![forbid(unsafe_code)]

//! Editable XML form of a manifest.
//!
//! ```xml
//! <nwf-schema>
//!   <entry path="textures/logo.png" flag1="0" flag2="1" flag3="-5" offset="63" size="3"/>
//! </nwf-schema>
//! ```
//!
//! Fields are attributes so that paths keep surrounding whitespace verbatim.
//! Child elements (`<path>`, `<flag1>`, ...) are accepted on read as well, for
//! hand-written schemas. `offset` and `size` are informational and optional on
//! read; the repack planner recomputes both. Schemas written by the older
//! sbtftool (`Files/PackageFile` with `FilePath`, `Unknown1..3`) load too.

use serde::{Deserialize, Serialize};

use crate::nwf::error::{NwfError, NwfResult};
use crate::nwf::format::{ArchiveEntry, ArchiveManifest};

const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "nwf-schema")]
struct SchemaDoc {
    #[serde(rename = "entry", default)]
    entries: Vec<SchemaEntry>,

    #[serde(rename = "Files", default, skip_serializing)]
    legacy: Option<LegacyFiles>,
}

#[derive(Debug, Serialize, Deserialize)]
struct LegacyFiles {
    #[serde(rename = "PackageFile", default)]
    files: Vec<SchemaEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SchemaEntry {
    #[serde(rename = "@path", alias = "path", alias = "FilePath")]
    path: String,
    #[serde(rename = "@flag1", alias = "flag1", alias = "Unknown1")]
    flag1: i16,
    #[serde(rename = "@flag2", alias = "flag2", alias = "Unknown2")]
    flag2: i16,
    #[serde(rename = "@flag3", alias = "flag3", alias = "Unknown3")]
    flag3: i32,
    #[serde(
        rename = "@offset",
        alias = "offset",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    offset: Option<i32>,
    #[serde(
        rename = "@size",
        alias = "size",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    size: Option<i32>,
}

impl From<&ArchiveEntry> for SchemaEntry {
    fn from(e: &ArchiveEntry) -> Self {
        Self {
            path: e.path.clone(),
            flag1: e.flag1,
            flag2: e.flag2,
            flag3: e.flag3,
            offset: Some(e.offset),
            size: Some(e.size),
        }
    }
}

impl From<SchemaEntry> for ArchiveEntry {
    fn from(e: SchemaEntry) -> Self {
        Self {
            path: e.path,
            flag1: e.flag1,
            flag2: e.flag2,
            flag3: e.flag3,
            offset: e.offset.unwrap_or(0),
            size: e.size.unwrap_or(0),
        }
    }
}

pub fn to_xml(manifest: &ArchiveManifest) -> NwfResult<String> {
    let doc = SchemaDoc {
        entries: manifest.iter().map(SchemaEntry::from).collect(),
        legacy: None,
    };

    let mut out = String::from(XML_DECL);
    let mut ser = quick_xml::se::Serializer::new(&mut out);
    ser.indent(' ', 2);
    doc.serialize(ser)
        .map_err(|e| NwfError::Schema(format!("serialize: {e}")))?;
    out.push('\n');
    Ok(out)
}

pub fn from_xml(text: &str) -> NwfResult<ArchiveManifest> {
    let doc: SchemaDoc =
        quick_xml::de::from_str(text).map_err(|e| NwfError::Schema(e.to_string()))?;

    let mut entries: Vec<ArchiveEntry> = doc.entries.into_iter().map(Into::into).collect();
    if let Some(legacy) = doc.legacy {
        entries.extend(legacy.files.into_iter().map(ArchiveEntry::from));
    }
    Ok(ArchiveManifest::new(entries))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ArchiveManifest {
        ArchiveManifest::new(vec![
            ArchiveEntry::new("zeta/last.bin", i16::MIN, i16::MAX, -1),
            ArchiveEntry::new("alpha.txt", 0, 1, i32::MAX),
            ArchiveEntry::new("données/é.png", -7, 3, 42),
        ])
    }

    fn fields(m: &ArchiveManifest) -> Vec<(String, i16, i16, i32)> {
        m.iter()
            .map(|e| (e.path.clone(), e.flag1, e.flag2, e.flag3))
            .collect()
    }

    #[test]
    fn round_trip_keeps_fields_and_order() {
        let m = sample();
        let xml = to_xml(&m).unwrap();
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<nwf-schema>"));

        let back = from_xml(&xml).unwrap();
        assert_eq!(fields(&back), fields(&m));
    }

    #[test]
    fn round_trip_keeps_surrounding_whitespace_in_paths() {
        let m = ArchiveManifest::new(vec![
            ArchiveEntry::new(" lead.bin ", 1, 2, 3),
            ArchiveEntry::new("two  spaces/x.bin ", 0, 0, 0),
        ]);
        let back = from_xml(&to_xml(&m).unwrap()).unwrap();
        assert_eq!(fields(&back), fields(&m));
    }

    #[test]
    fn empty_manifest_round_trips() {
        let xml = to_xml(&ArchiveManifest::default()).unwrap();
        assert!(from_xml(&xml).unwrap().is_empty());
    }

    #[test]
    fn offset_and_size_are_optional() {
        let xml = r#"<nwf-schema>
            <entry path="a.bin" flag1="1" flag2="2" flag3="3"/>
        </nwf-schema>"#;
        let m = from_xml(xml).unwrap();
        assert_eq!(m.entries[0], ArchiveEntry::new("a.bin", 1, 2, 3));
    }

    #[test]
    fn accepts_child_elements() {
        let xml = r#"<nwf-schema>
            <entry><path>a.bin</path><flag1>1</flag1><flag2>2</flag2><flag3>3</flag3></entry>
        </nwf-schema>"#;
        let m = from_xml(xml).unwrap();
        assert_eq!(m.entries[0], ArchiveEntry::new("a.bin", 1, 2, 3));
    }

    #[test]
    fn unknown_elements_are_ignored() {
        let xml = r#"<nwf-schema version="2">
            <comment>hand edited</comment>
            <entry path="a.bin" flag1="1" flag2="2" flag3="3" note="keep me"/>
            <comment>between entries</comment>
            <entry path="b.bin" flag1="4" flag2="5" flag3="6">
                <note>keep me too</note>
            </entry>
            <trailer/>
        </nwf-schema>"#;
        let m = from_xml(xml).unwrap();
        assert_eq!(
            fields(&m),
            vec![("a.bin".to_string(), 1, 2, 3), ("b.bin".to_string(), 4, 5, 6)]
        );
    }

    #[test]
    fn reads_legacy_sbtftool_schema() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<Package xmlns:i="http://www.w3.org/2001/XMLSchema-instance" xmlns="http://schemas.datacontract.org/2004/07/sbtftool">
  <Files>
    <PackageFile>
      <FilePath>data/one.bin</FilePath>
      <Unknown1>5</Unknown1>
      <Unknown2>-6</Unknown2>
      <Unknown3>700</Unknown3>
    </PackageFile>
    <PackageFile>
      <FilePath>two.bin</FilePath>
      <Unknown1>0</Unknown1>
      <Unknown2>0</Unknown2>
      <Unknown3>0</Unknown3>
    </PackageFile>
  </Files>
</Package>"#;
        let m = from_xml(xml).unwrap();
        assert_eq!(
            fields(&m),
            vec![
                ("data/one.bin".to_string(), 5, -6, 700),
                ("two.bin".to_string(), 0, 0, 0),
            ]
        );
    }

    #[test]
    fn missing_field_is_schema_error() {
        let xml = r#"<nwf-schema><entry path="a" flag1="1"/></nwf-schema>"#;
        assert!(matches!(from_xml(xml), Err(NwfError::Schema(_))));
    }

    #[test]
    fn out_of_range_flag_is_schema_error() {
        let xml = r#"<nwf-schema><entry path="a" flag1="40000" flag2="0" flag3="0"/></nwf-schema>"#;
        assert!(matches!(from_xml(xml), Err(NwfError::Schema(_))));
    }

    #[test]
    fn malformed_xml_is_schema_error() {
        assert!(matches!(from_xml("<nwf-schema><entry>"), Err(NwfError::Schema(_))));
    }
}
