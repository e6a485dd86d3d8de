//! Forwarding of autoload mappings.
//!
//! Packages declare namespace mappings under `autoload.psr-0` and
//! `autoload.psr-4`. They are not interpreted here, only resolved against
//! the package directory and handed to an [`Autoloader`].

use std::fmt;

use pkg_fs::NormalizedPath;
use serde_json::Value;

use crate::error::{Error, Result};

/// The mapping standard a namespace was declared under
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AutoloadStandard {
    Psr0,
    Psr4,
}

impl AutoloadStandard {
    pub const ALL: [AutoloadStandard; 2] = [Self::Psr0, Self::Psr4];

    /// Metadata key under `autoload`
    pub fn key(&self) -> &'static str {
        match self {
            Self::Psr0 => "psr-0",
            Self::Psr4 => "psr-4",
        }
    }
}

impl fmt::Display for AutoloadStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Receives namespace to directory mappings
pub trait Autoloader {
    fn register(&mut self, standard: AutoloadStandard, namespace: &str, path: &NormalizedPath);
}

/// One forwarded mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoloadEntry {
    pub standard: AutoloadStandard,
    pub namespace: String,
    pub path: NormalizedPath,
}

/// An [`Autoloader`] that records what it receives
#[derive(Debug, Default, Clone)]
pub struct AutoloadMap {
    entries: Vec<AutoloadEntry>,
}

impl AutoloadMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[AutoloadEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Autoloader for AutoloadMap {
    fn register(&mut self, standard: AutoloadStandard, namespace: &str, path: &NormalizedPath) {
        self.entries.push(AutoloadEntry {
            standard,
            namespace: namespace.to_string(),
            path: path.clone(),
        });
    }
}

/// Collect `(namespace, path)` pairs from one autoload section.
///
/// A namespace may map to a single path or a list of paths. Paths are
/// joined onto `package_dir`.
pub(crate) fn collect_section(
    standard: AutoloadStandard,
    section: &Value,
    package_dir: &NormalizedPath,
) -> Result<Vec<(String, NormalizedPath)>> {
    let Value::Object(map) = section else {
        return Err(invalid(standard, "mapping"));
    };

    let mut pairs = Vec::new();
    for (namespace, target) in map {
        match target {
            Value::String(path) => pairs.push((namespace.clone(), package_dir.join(path))),
            Value::Array(paths) => {
                for path in paths {
                    let Some(path) = path.as_str() else {
                        return Err(invalid(standard, "string or list of strings"));
                    };
                    pairs.push((namespace.clone(), package_dir.join(path)));
                }
            }
            _ => return Err(invalid(standard, "string or list of strings")),
        }
    }
    Ok(pairs)
}

fn invalid(standard: AutoloadStandard, expected: &'static str) -> Error {
    Error::Config(pkg_meta::Error::InvalidType {
        key: format!("autoload.{}", standard.key()),
        expected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_collect_single_and_list_paths() {
        let dir = NormalizedPath::dir("/srv/packages/foolz/fake");
        let section = json!({
            "Foolz\\Fake\\": "classes/",
            "Foolz\\Shared\\": ["lib/", "vendor-lib/"]
        });

        let pairs = collect_section(AutoloadStandard::Psr4, &section, &dir).unwrap();

        assert_eq!(
            pairs,
            vec![
                (
                    "Foolz\\Fake\\".to_string(),
                    NormalizedPath::new("/srv/packages/foolz/fake/classes/")
                ),
                (
                    "Foolz\\Shared\\".to_string(),
                    NormalizedPath::new("/srv/packages/foolz/fake/lib/")
                ),
                (
                    "Foolz\\Shared\\".to_string(),
                    NormalizedPath::new("/srv/packages/foolz/fake/vendor-lib/")
                ),
            ]
        );
    }

    #[test]
    fn test_non_mapping_section_is_rejected() {
        let dir = NormalizedPath::dir("/srv/packages/foolz/fake");
        let err = collect_section(AutoloadStandard::Psr0, &json!("classes"), &dir).unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_map_records_entries() {
        let mut map = AutoloadMap::new();
        map.register(
            AutoloadStandard::Psr0,
            "Foolz",
            &NormalizedPath::dir("/srv/foolz/fake/classes"),
        );
        assert_eq!(map.len(), 1);
        assert_eq!(map.entries()[0].standard.key(), "psr-0");
    }
}
