use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Where the host mount root appears inside every container.
pub const CONTAINER_MOUNT_POINT: &str = "/data";

#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("Path {path:?} is not under the mount root {root:?}")]
pub struct PathResolutionError {
    pub path: PathBuf,
    pub root: PathBuf,
}

/// The single host directory made visible inside the container.
///
/// Every path handed to a containerized tool must live under this root; it is rewritten into
/// the form the container sees (`<root>/a/b` becomes `/data/a/b`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountRoot {
    host: PathBuf,
    container: String,
}

impl MountRoot {
    /// `host` should be absolute; it is normalized lexically.
    pub fn new(host: impl AsRef<Path>) -> Self {
        Self::with_mount_point(host, CONTAINER_MOUNT_POINT)
    }

    pub fn with_mount_point(host: impl AsRef<Path>, container: &str) -> Self {
        Self {
            host: normalize(host.as_ref()),
            container: container.trim_end_matches('/').to_string(),
        }
    }

    pub fn host(&self) -> &Path {
        &self.host
    }

    /// The `-v host:container` volume specification.
    pub fn volume_spec(&self) -> String {
        format!("{}:{}", self.host.display(), self.container)
    }

    /// Resolves a caller-supplied path on the host: relative paths are taken relative to
    /// the mount root, and `.`/`..` components are folded away.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            normalize(path)
        } else {
            normalize(&self.host.join(path))
        }
    }

    /// Rewrites a host path into its in-container form.
    pub fn to_container(&self, path: impl AsRef<Path>) -> Result<String, PathResolutionError> {
        let resolved = self.resolve(path);
        let relative = resolved
            .strip_prefix(&self.host)
            .map_err(|_| PathResolutionError {
                path: resolved.clone(),
                root: self.host.clone(),
            })?;

        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();

        if parts.is_empty() {
            Ok(self.container.clone())
        } else {
            Ok(format!("{}/{}", self.container, parts.join("/")))
        }
    }
}

/// Lexical normalization; does not touch the filesystem, so the path need not exist yet.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}
