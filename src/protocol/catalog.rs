//! # Packet Catalog
//!
//! Parses the tabular packet catalog into the registry's lookup tables.
//!
//! The catalog is a CSV file with a header row followed by one record per
//! (version, mode, direction, id, name) mapping. The header row is skipped
//! by position, never matched by content. Loading happens once at startup;
//! a row that cannot be parsed into the expected field types aborts the
//! load with [`BridgeError::DataFormat`].
//!
//! The loader only builds and returns tables; registry construction and
//! sharing is [`registry::PacketRegistry`]'s job.
//!
//! [`registry::PacketRegistry`]: crate::protocol::registry::PacketRegistry

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::{BridgeError, Result};
use crate::protocol::{ConnectionMode, Direction, PacketId, ProtocolVersion, RegistryKey};

/// One row of catalog source data.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogRecord {
    /// Human-readable release label, e.g. "1.8.9".
    pub version_label: String,
    /// Protocol revision the row applies to.
    pub protocol_version: i32,
    /// Connection phase, as text.
    pub mode: String,
    /// Traffic direction, as text.
    pub direction: String,
    /// Numeric wire id.
    pub id: PacketId,
    /// Logical, version-independent packet name.
    pub name: String,
}

/// Lookup tables built from the catalog, ready to back a registry.
#[derive(Debug, Default)]
pub struct Catalog {
    /// RegistryKey → id → name.
    pub names: HashMap<RegistryKey, HashMap<PacketId, String>>,
    /// RegistryKey → name → id.
    pub ids: HashMap<RegistryKey, HashMap<String, PacketId>>,
    /// Protocol version → human-readable release label.
    pub labels: HashMap<ProtocolVersion, String>,
    /// Highest protocol version seen across all rows.
    pub max_version: ProtocolVersion,
}

/// Load a catalog from any reader producing CSV text.
///
/// The first row is discarded unconditionally (positional header skip).
/// Rows that conflict with an earlier row inside the same [`RegistryKey`]
/// (same id mapped to a second name, or same name to a second id) are
/// rejected: they would break the tables' inverse-function invariant.
pub fn load<R: Read>(reader: R) -> Result<Catalog> {
    // Headers are disabled so field mapping stays positional; the header
    // row is skipped by index below instead.
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(reader);

    let mut catalog = Catalog::default();
    let mut seen_any = false;

    for (index, row) in csv_reader.records().enumerate() {
        if index == 0 {
            continue;
        }

        let row = row.map_err(|e| BridgeError::DataFormat(format!("row {index}: {e}")))?;
        let record: CatalogRecord = row
            .deserialize(None)
            .map_err(|e| BridgeError::DataFormat(format!("row {index}: {e}")))?;

        insert_record(&mut catalog, &record)
            .map_err(|e| BridgeError::DataFormat(format!("row {index}: {e}")))?;
        seen_any = true;
    }

    if !seen_any {
        return Err(BridgeError::DataFormat(
            "catalog contains no records".into(),
        ));
    }

    Ok(catalog)
}

/// Load a catalog from a CSV file on disk.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let file = File::open(&path).map_err(|e| {
        BridgeError::DataFormat(format!(
            "failed to open catalog {}: {e}",
            path.as_ref().display()
        ))
    })?;
    load(file)
}

fn insert_record(catalog: &mut Catalog, record: &CatalogRecord) -> Result<()> {
    let version = ProtocolVersion(record.protocol_version);
    let mode: ConnectionMode = record.mode.parse()?;
    let direction: Direction = record.direction.parse()?;
    let key = RegistryKey::new(version, mode, direction);

    let names = catalog.names.entry(key).or_default();
    if let Some(existing) = names.get(&record.id) {
        if *existing != record.name {
            return Err(BridgeError::DataFormat(format!(
                "id {} in {key} already mapped to {existing:?}",
                record.id
            )));
        }
    }

    let ids = catalog.ids.entry(key).or_default();
    if let Some(existing) = ids.get(&record.name) {
        if *existing != record.id {
            return Err(BridgeError::DataFormat(format!(
                "name {:?} in {key} already mapped to id {existing}",
                record.name
            )));
        }
    }

    names.insert(record.id, record.name.clone());
    ids.insert(record.name.clone(), record.id);
    catalog.labels.insert(version, record.version_label.clone());
    catalog.max_version = catalog.max_version.max(version);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
version_label,protocol_version,mode,direction,id,name
1.7.6,5,play,upstream,1,chat_message
1.7.6,5,play,downstream,2,chat_message
1.8,47,play,upstream,1,chat_message
1.8,47,play,downstream,2,chat_message
1.8,47,login,downstream,2,login_success
";

    #[test]
    fn loads_sample_catalog() {
        let catalog = load(SAMPLE.as_bytes()).unwrap();
        assert_eq!(catalog.max_version, ProtocolVersion(47));
        assert_eq!(catalog.labels[&ProtocolVersion(5)], "1.7.6");
        assert_eq!(catalog.labels[&ProtocolVersion(47)], "1.8");

        let key = RegistryKey::new(
            ProtocolVersion(47),
            ConnectionMode::Play,
            Direction::Upstream,
        );
        assert_eq!(catalog.names[&key][&1], "chat_message");
        assert_eq!(catalog.ids[&key]["chat_message"], 1);
    }

    #[test]
    fn header_skipped_by_position_not_content() {
        // The first row parses fine as a record; it must be dropped anyway.
        let data = "\
1.7.6,5,play,upstream,1,chat_message
1.8,47,play,upstream,1,chat_message
";
        let catalog = load(data.as_bytes()).unwrap();
        let v5 = RegistryKey::new(
            ProtocolVersion(5),
            ConnectionMode::Play,
            Direction::Upstream,
        );
        assert!(!catalog.names.contains_key(&v5));
        assert_eq!(catalog.max_version, ProtocolVersion(47));
    }

    #[test]
    fn malformed_row_is_data_format_error() {
        let data = "\
version_label,protocol_version,mode,direction,id,name
1.8,not_an_int,play,upstream,1,chat_message
";
        let err = load(data.as_bytes()).unwrap_err();
        assert!(matches!(err, BridgeError::DataFormat(_)));
    }

    #[test]
    fn unknown_mode_is_data_format_error() {
        let data = "\
version_label,protocol_version,mode,direction,id,name
1.8,47,lobby,upstream,1,chat_message
";
        assert!(matches!(
            load(data.as_bytes()),
            Err(BridgeError::DataFormat(_))
        ));
    }

    #[test]
    fn conflicting_duplicate_id_rejected() {
        let data = "\
version_label,protocol_version,mode,direction,id,name
1.8,47,play,upstream,1,chat_message
1.8,47,play,upstream,1,use_entity
";
        assert!(matches!(
            load(data.as_bytes()),
            Err(BridgeError::DataFormat(_))
        ));
    }

    #[test]
    fn exact_duplicate_row_is_idempotent() {
        let data = "\
version_label,protocol_version,mode,direction,id,name
1.8,47,play,upstream,1,chat_message
1.8,47,play,upstream,1,chat_message
";
        let catalog = load(data.as_bytes()).unwrap();
        let key = RegistryKey::new(
            ProtocolVersion(47),
            ConnectionMode::Play,
            Direction::Upstream,
        );
        assert_eq!(catalog.names[&key].len(), 1);
    }

    #[test]
    fn empty_catalog_rejected() {
        let data = "version_label,protocol_version,mode,direction,id,name\n";
        assert!(matches!(
            load(data.as_bytes()),
            Err(BridgeError::DataFormat(_))
        ));
    }
}
