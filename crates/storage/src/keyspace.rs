//! Row key generation.
//!
//! Every table kind owns one namespace id, created the first time a table of
//! that kind asks for it and kept for the lifetime of the registry. Row keys
//! are UUID v5 values derived from that namespace and a composite name made
//! of the kind, the table name, a microsecond timestamp and a registry-wide
//! sequence number. The sequence number keeps two keys minted in the same
//! microsecond apart.

use core::borrow::Borrow;
use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};
use hashbrown::HashMap;
use log::debug;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Opaque, immutable identifier of one row.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "json", derive(serde::Serialize), serde(transparent))]
pub struct RowKey(String);

impl RowKey {
    /// Creates a row key from any string.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for RowKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RowKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RowKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for RowKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<Uuid> for RowKey {
    fn from(key: Uuid) -> Self {
        Self(key.hyphenated().to_string())
    }
}

/// Namespace id shared by every table of one kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NamespaceId(Uuid);

impl NamespaceId {
    /// Returns the underlying UUID.
    #[inline]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for NamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Registry of per-kind namespaces.
///
/// A host normally builds one registry and shares it (`Arc`) between all of
/// its tables. Lazy namespace creation happens under a mutex, so two threads
/// can never install different namespaces for the same kind.
#[derive(Debug, Default)]
pub struct KeySpaceRegistry {
    namespaces: Mutex<HashMap<String, NamespaceId>>,
    sequence: AtomicU64,
}

impl KeySpaceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry tables fall back to when none is configured.
    pub fn process_default() -> Arc<Self> {
        static DEFAULT: OnceLock<Arc<KeySpaceRegistry>> = OnceLock::new();
        Arc::clone(DEFAULT.get_or_init(|| Arc::new(KeySpaceRegistry::new())))
    }

    /// Returns the namespace for `kind`, generating it on first use.
    pub fn ensure_namespace(&self, kind: &str) -> NamespaceId {
        // A panic while holding the lock cannot leave a half-written entry.
        let mut namespaces = self
            .namespaces
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(ns) = namespaces.get(kind) {
            return *ns;
        }
        let ns = NamespaceId(Uuid::new_v4());
        debug!("created key space namespace {ns} for table kind {kind}");
        namespaces.insert(kind.to_string(), ns);
        ns
    }

    /// Returns the namespace for `kind` if one has been created.
    pub fn namespace(&self, kind: &str) -> Option<NamespaceId> {
        self.namespaces
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(kind)
            .copied()
    }

    /// Returns the number of kinds with a namespace.
    pub fn kind_count(&self) -> usize {
        self.namespaces
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Generates a fresh row key for a table of `kind` named `table_name`.
    pub fn generate_row_key(&self, kind: &str, table_name: &str) -> RowKey {
        let ns = self.ensure_namespace(kind);
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        let micros = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_micros())
            .unwrap_or_default();
        let composite = format!("{kind}.{table_name}_{micros}.{seq}");
        RowKey::from(Uuid::new_v5(ns.as_uuid(), composite.as_bytes()))
    }
}
