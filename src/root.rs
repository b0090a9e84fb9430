//! The root directory every tool is confined to, and the resolver that maps
//! untrusted relative paths onto it.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

const MAX_SYMLINK_HOPS: usize = 40;

#[derive(Debug, Error)]
pub enum PathRejection {
    #[error("absolute path not allowed")]
    Absolute,
    #[error("path escapes root")]
    EscapesRoot,
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Canonical, immutable handle on the root directory.
#[derive(Debug, Clone)]
pub struct RootDir {
    path: PathBuf,
}

impl RootDir {
    /// Creates `dir` if it is missing and pins its canonical form.
    pub fn open(dir: &Path) -> anyhow::Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dunce::canonicalize(dir)?;
        if !path.is_dir() {
            anyhow::bail!("root is not a directory: {}", path.display());
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolves `input` against the root. The result is canonical and is the
    /// root itself or one of its descendants; it need not exist.
    pub fn resolve(&self, input: &str) -> Result<PathBuf, PathRejection> {
        if input.is_empty() {
            return Ok(self.path.clone());
        }
        let rel = Path::new(input);
        if is_absolute(rel) {
            return Err(PathRejection::Absolute);
        }
        let candidate = canonicalize_lenient(&self.path.join(rel), 0)?;
        if candidate.starts_with(&self.path) {
            Ok(candidate)
        } else {
            Err(PathRejection::EscapesRoot)
        }
    }

    /// Root-relative form of a resolved path, `/`-separated. The root is `""`.
    pub fn relative(&self, resolved: &Path) -> String {
        let Ok(rel) = resolved.strip_prefix(&self.path) else {
            return String::new();
        };
        rel.components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

fn is_absolute(p: &Path) -> bool {
    p.is_absolute() || p.has_root() || matches!(p.components().next(), Some(Component::Prefix(_)))
}

pub(crate) fn is_missing(e: &io::Error) -> bool {
    matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory)
}

// The existing prefix goes through the OS so symlinks are followed; the
// missing tail cannot contain symlinks and is normalized lexically.
fn canonicalize_lenient(path: &Path, hops: usize) -> io::Result<PathBuf> {
    let mut resolved = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => resolved.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            Component::Normal(name) => {
                resolved.push(name);
                match fs::symlink_metadata(&resolved) {
                    Ok(meta) if meta.file_type().is_symlink() => {
                        resolved = match dunce::canonicalize(&resolved) {
                            Ok(real) => real,
                            Err(e) if is_missing(&e) => follow_dangling(&resolved, hops)?,
                            Err(e) => return Err(e),
                        };
                    }
                    Ok(_) => {}
                    Err(e) if is_missing(&e) => {}
                    Err(e) => return Err(e),
                }
            }
        }
    }
    Ok(resolved)
}

fn follow_dangling(link: &Path, hops: usize) -> io::Result<PathBuf> {
    if hops >= MAX_SYMLINK_HOPS {
        return Err(io::Error::new(
            io::ErrorKind::Other,
            "too many levels of symbolic links",
        ));
    }
    let target = fs::read_link(link)?;
    let base = link.parent().unwrap_or(link);
    canonicalize_lenient(&base.join(target), hops + 1)
}
