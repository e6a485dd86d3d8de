//! The fast-path metadata artifact.
//!
//! The artifact stores the parsed document together with the checksum of
//! the `composer.json` text it was rendered from. A checksum mismatch means
//! the primary file changed and the artifact must be rebuilt.

use pkg_fs::checksum;
use pkg_fs::{ConfigStore, NormalizedPath};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Result;

#[derive(Debug, Serialize)]
struct CacheEntryRef<'a> {
    source: &'a str,
    document: &'a Value,
}

#[derive(Debug, Deserialize)]
struct CacheEntry {
    source: String,
    document: Value,
}

/// Checksum of the primary metadata text, in the artifact's key format.
pub fn source_checksum(source: &str) -> String {
    checksum::fingerprint_text(source)
}

/// Read the artifact at `path` if it exists and was built from `checksum`.
///
/// A missing, unreadable or stale artifact yields `None`; it is a cache and
/// never a reason to fail a lookup.
pub fn read(path: &NormalizedPath, checksum: &str) -> Option<Value> {
    if !path.is_file() {
        return None;
    }

    match ConfigStore::new().load::<CacheEntry>(path) {
        Ok(entry) if entry.source == checksum => Some(entry.document),
        Ok(_) => {
            tracing::debug!(path = %path, "metadata cache is stale");
            None
        }
        Err(e) => {
            tracing::debug!(path = %path, error = %e, "ignoring unreadable metadata cache");
            None
        }
    }
}

/// Read the document stored in the artifact at `path`, stale or not.
///
/// This is the last rendering seen by any process, which is what an upgrade
/// compares the current metadata against.
pub fn read_last(path: &NormalizedPath) -> Option<Value> {
    if !path.is_file() {
        return None;
    }

    match ConfigStore::new().load::<CacheEntry>(path) {
        Ok(entry) => Some(entry.document),
        Err(e) => {
            tracing::debug!(path = %path, error = %e, "ignoring unreadable metadata cache");
            None
        }
    }
}

/// Write the artifact for `document`, keyed by `checksum`.
pub fn write(path: &NormalizedPath, checksum: &str, document: &Value) -> Result<()> {
    let entry = CacheEntryRef {
        source: checksum,
        document,
    };
    ConfigStore::new().save(path, &entry)?;
    tracing::debug!(path = %path, "wrote metadata cache");
    Ok(())
}
