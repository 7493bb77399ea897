//! Whole-result-set cache keyed by query fingerprint.
//!
//! The cache is one JSON document mapping fingerprint to
//! `{response_data, pagination, all_sellers_info}`. It is read once before a
//! fetch and rewritten in full after a successful one; there is no
//! incremental update and no locking. The format is not versioned: after a
//! schema change, delete the file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use sellermap_core::{PaginationSummary, SellerEntity};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::IngestError;
use crate::query::SellerQuery;

/// Canonical form hashed by [`fingerprint`]. Fields are declared in
/// lexicographic order so the serialized keys are sorted.
#[derive(Serialize)]
struct CanonicalQuery<'a> {
    business_types: Vec<&'a str>,
    limit: u32,
    provinces: Vec<&'a str>,
}

/// Deterministic cache key for `query`.
///
/// Hashes the same lists [`SellerQuery`] sends in its request body, sorted so
/// that list order does not matter. The digest is SHA-256 over the compact
/// UTF-8 JSON of the canonical form and is stable across runs and platforms.
#[must_use]
pub fn fingerprint(query: &SellerQuery) -> String {
    let canonical = CanonicalQuery {
        business_types: sorted(query.business_types()),
        limit: query.limit(),
        provinces: sorted(query.provinces()),
    };
    // Serializing strings, integers and vectors cannot fail.
    let encoded = serde_json::to_vec(&canonical).unwrap_or_default();
    format!("{:x}", Sha256::digest(&encoded))
}

fn sorted(values: &[String]) -> Vec<&str> {
    let mut list: Vec<&str> = values.iter().map(String::as_str).collect();
    list.sort_unstable();
    list.dedup();
    list
}

/// One cached, fully paginated result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Last raw page response of the fetch that produced this entry.
    pub response_data: serde_json::Value,
    pub pagination: PaginationSummary,
    pub all_sellers_info: Vec<SellerEntity>,
}

/// In-memory view of the cache file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheTable {
    entries: BTreeMap<String, CacheEntry>,
}

impl CacheTable {
    #[must_use]
    pub fn get(&self, fingerprint: &str) -> Option<&CacheEntry> {
        self.entries.get(fingerprint)
    }

    /// Inserts or wholesale-replaces the entry for `fingerprint`.
    pub fn put(&mut self, fingerprint: impl Into<String>, entry: CacheEntry) {
        self.entries.insert(fingerprint.into(), entry);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in fingerprint order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CacheEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Handle to the cache file at an explicit path.
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the cache table.
    ///
    /// A missing, unreadable, or unparsable file yields an empty table: a
    /// broken cache is a cache miss, never an error.
    #[must_use]
    pub fn load(&self) -> CacheTable {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no cache file yet");
                return CacheTable::default();
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "could not read cache file; treating as empty"
                );
                return CacheTable::default();
            }
        };

        match serde_json::from_slice::<CacheTable>(&bytes) {
            Ok(table) => {
                tracing::debug!(path = %self.path.display(), entries = table.len(), "cache loaded");
                table
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "cache file is corrupt; treating as empty"
                );
                CacheTable::default()
            }
        }
    }

    /// Rewrites the whole cache file with `table`.
    ///
    /// The document is written to a sibling temp file and renamed over the
    /// old one, so a crash mid-write leaves the previous cache intact.
    ///
    /// # Errors
    ///
    /// - [`IngestError::CacheEncode`] if the table cannot be serialized.
    /// - [`IngestError::CacheIo`] if the directory, temp file, or rename fails.
    pub fn save(&self, table: &CacheTable) -> Result<(), IngestError> {
        let encoded = serde_json::to_vec_pretty(table).map_err(IngestError::CacheEncode)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        std::fs::write(&tmp_path, &encoded).map_err(|e| self.io_error(e))?;
        std::fs::rename(&tmp_path, &self.path).map_err(|e| self.io_error(e))?;

        tracing::debug!(path = %self.path.display(), entries = table.len(), "cache saved");
        Ok(())
    }

    /// Deletes the cache file. Returns `false` if there was nothing to delete.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::CacheIo`] if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<bool, IngestError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn io_error(&self, source: std::io::Error) -> IngestError {
        IngestError::CacheIo {
            path: self.path.display().to_string(),
            source,
        }
    }
}
