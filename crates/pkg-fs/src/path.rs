//! Forward-slash paths for package, root and public directories

use std::fmt;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// A path stored with `/` separators on every platform.
///
/// Directories are kept in their directory form (see
/// [`NormalizedPath::dir`]), so appending a relative segment to one always
/// yields exactly one separator between the two.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    inner: String,
}

impl NormalizedPath {
    /// Wrap `path`, converting backslashes to `/`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            inner: path.as_ref().to_string_lossy().replace('\\', "/"),
        }
    }

    /// Wrap `path` in directory form.
    pub fn dir(path: impl AsRef<Path>) -> Self {
        Self::new(path).as_dir()
    }

    /// Canonicalize an existing directory.
    ///
    /// Fails with [`Error::NotADirectory`] when `path` is missing or is a
    /// file.
    pub fn existing_dir(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(Error::NotADirectory {
                path: path.to_path_buf(),
            });
        }
        dunce::canonicalize(path)
            .map(Self::dir)
            .map_err(|e| Error::io(path, e))
    }

    /// This path with a single trailing `/`.
    pub fn as_dir(&self) -> Self {
        let mut inner = self.inner.trim_end_matches('/').to_string();
        inner.push('/');
        Self { inner }
    }

    pub fn is_dir_form(&self) -> bool {
        self.inner.ends_with('/')
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// The path as the platform expects it for I/O.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Append a relative `segment`.
    pub fn join(&self, segment: &str) -> Self {
        let segment = segment.replace('\\', "/");
        let separator = if self.is_dir_form() { "" } else { "/" };
        Self {
            inner: format!("{}{separator}{segment}", self.inner),
        }
    }

    /// The last non-empty component.
    pub fn file_name(&self) -> Option<&str> {
        self.inner
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
    }

    /// Text after the last `.` of the file name; dotfiles have none.
    pub fn extension(&self) -> Option<&str> {
        match self.file_name()?.rsplit_once('.') {
            Some((stem, extension)) if !stem.is_empty() => Some(extension),
            _ => None,
        }
    }

    /// The last `n` components joined with `/`, if the path has that many.
    ///
    /// `"/srv/themes/foolz/fake/".tail(2)` is `"foolz/fake"`.
    pub fn tail(&self, n: usize) -> Option<String> {
        let parts: Vec<&str> = self.inner.split('/').filter(|p| !p.is_empty()).collect();
        if n == 0 || parts.len() < n {
            return None;
        }
        Some(parts[parts.len() - n..].join("/"))
    }

    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }
}

/// Whether `relative` stays inside whatever directory it is joined to.
///
/// Rejects empty input, absolute paths, drive prefixes and `..` segments.
pub fn is_contained_relative(relative: &str) -> bool {
    let relative = relative.replace('\\', "/");
    let absolute = relative.starts_with('/') || relative.as_bytes().get(1) == Some(&b':');
    !relative.is_empty() && !absolute && !relative.split('/').any(|segment| segment == "..")
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner)
    }
}
