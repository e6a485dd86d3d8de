//! Content fingerprints for derived files
//!
//! A derived file (such as the rendered metadata cache) records the
//! fingerprint of the source it was built from; a different fingerprint on
//! the next read means the derived file is stale.

use std::path::Path;

use sha2::{Digest, Sha256};

use crate::{Error, Result};

/// Algorithm tag every fingerprint starts with
pub const ALGORITHM: &str = "sha256";

/// Fingerprint of `bytes`, formatted as `sha256:<hex>`.
pub fn fingerprint(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    format!("{ALGORITHM}:{digest:x}")
}

/// Fingerprint of a text document.
pub fn fingerprint_text(text: &str) -> String {
    fingerprint(text.as_bytes())
}

/// Fingerprint of the file at `path`.
pub fn fingerprint_file(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    Ok(fingerprint(&bytes))
}
