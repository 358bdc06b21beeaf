//! # Packet Registry
//!
//! Version-aware bidirectional id↔name lookup.
//!
//! The registry is built once from a loaded [`Catalog`] and only read
//! afterwards, so it is shared read-only across all concurrent sessions
//! without synchronization (wrap it in an `Arc`).
//!
//! Lookups are exact: a (version, mode, direction) key with no record for
//! the requested id or name fails with [`BridgeError::NotFound`]. There is
//! no fallback to a neighboring version; substituting a near version would
//! risk wire-format mismatches.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{BridgeError, Result};
use crate::protocol::catalog::{self, Catalog};
use crate::protocol::{ConnectionMode, Direction, PacketId, ProtocolVersion, RegistryKey};

/// Read-only id↔name tables scoped by [`RegistryKey`].
#[derive(Debug)]
pub struct PacketRegistry {
    names: HashMap<RegistryKey, HashMap<PacketId, String>>,
    ids: HashMap<RegistryKey, HashMap<String, PacketId>>,
    labels: HashMap<ProtocolVersion, String>,
    default_version: ProtocolVersion,
}

impl PacketRegistry {
    /// Build a registry from loaded catalog tables.
    pub fn from_catalog(catalog: Catalog) -> Self {
        Self {
            names: catalog.names,
            ids: catalog.ids,
            labels: catalog.labels,
            default_version: catalog.max_version,
        }
    }

    /// Load the catalog file at `path` and build a registry from it.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_catalog(catalog::load_file(path)?))
    }

    /// Resolve a numeric wire id to its logical packet name.
    pub fn name_for_id(
        &self,
        version: ProtocolVersion,
        mode: ConnectionMode,
        direction: Direction,
        id: PacketId,
    ) -> Result<&str> {
        let key = RegistryKey::new(version, mode, direction);
        self.names
            .get(&key)
            .and_then(|table| table.get(&id))
            .map(String::as_str)
            .ok_or_else(|| BridgeError::NotFound(format!("packet id {id} in {key}")))
    }

    /// Resolve a logical packet name to its numeric wire id.
    pub fn id_for_name(
        &self,
        version: ProtocolVersion,
        mode: ConnectionMode,
        direction: Direction,
        name: &str,
    ) -> Result<PacketId> {
        let key = RegistryKey::new(version, mode, direction);
        self.ids
            .get(&key)
            .and_then(|table| table.get(name))
            .copied()
            .ok_or_else(|| BridgeError::NotFound(format!("packet {name:?} in {key}")))
    }

    /// The highest protocol version present in the loaded catalog.
    pub fn default_version(&self) -> ProtocolVersion {
        self.default_version
    }

    /// Human-readable release label for a protocol version, for diagnostics.
    pub fn version_label(&self, version: ProtocolVersion) -> Result<&str> {
        self.labels
            .get(&version)
            .map(String::as_str)
            .ok_or_else(|| BridgeError::NotFound(format!("protocol version {version}")))
    }

    /// Whether any record exists for the given protocol version.
    pub fn knows_version(&self, version: ProtocolVersion) -> bool {
        self.labels.contains_key(&version)
    }
}
