//! Filesystem Identity Probe.
//!
//! Resolves a directory to a stable identifier for the filesystem that
//! contains it, so the registry can tell whether two distinct paths alias
//! the same underlying block device. Stateless and reentrant: a single
//! `stat`-style syscall per call, no caching.

use std::path::Path;

use nix::sys::stat::{stat, SFlag};

use crate::error::{RegistryError, Result};

/// Opaque filesystem identifier.
///
/// Equal for two paths iff they reside on the same mounted filesystem.
/// Carries no meaning beyond equality/hashing; callers must not assume
/// anything about its internal structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FsId(u64);

/// Probe the filesystem containing `path`.
///
/// `path` must already exist and be a directory; this function performs no
/// canonicalization of its own (the registry canonicalizes before calling
/// it). Distinguishes nonexistent paths, non-directories, and raw stat
/// failures via [`RegistryError`] variants.
pub fn probe(path: &Path) -> Result<FsId> {
    let st = stat(path).map_err(|source| classify(path, source))?;

    let file_type = st.st_mode & SFlag::S_IFMT.bits();
    if file_type != SFlag::S_IFDIR.bits() {
        return Err(RegistryError::PathNotFound {
            path: path.to_path_buf(),
        });
    }

    Ok(FsId(st.st_dev))
}

fn classify(path: &Path, source: nix::Error) -> RegistryError {
    match source {
        nix::Error::ENOENT | nix::Error::ENOTDIR => RegistryError::PathNotFound {
            path: path.to_path_buf(),
        },
        _ => RegistryError::ProbeFailure {
            path: path.to_path_buf(),
            source,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probes_a_real_directory() {
        let dir = tempfile::tempdir().unwrap();
        let fsid = probe(dir.path()).unwrap();
        // Re-probing the same path must be stable.
        assert_eq!(fsid, probe(dir.path()).unwrap());
    }

    #[test]
    fn two_subdirs_of_the_same_mount_share_an_fsid() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        assert_eq!(probe(dir.path()).unwrap(), probe(&sub).unwrap());
    }

    #[test]
    fn unix_socket_is_not_a_directory() {
        // S_IFSOCK (0o140000) shares the S_IFDIR (0o040000) bit, so a naive
        // `contains(S_IFDIR)` check would wrongly admit a socket here.
        let dir = tempfile::tempdir().unwrap();
        let sock_path = dir.path().join("sock");
        let _listener = std::os::unix::net::UnixListener::bind(&sock_path).unwrap();
        assert!(matches!(
            probe(&sock_path),
            Err(RegistryError::PathNotFound { .. })
        ));
    }

    #[test]
    fn nonexistent_path_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        assert!(matches!(
            probe(&missing),
            Err(RegistryError::PathNotFound { .. })
        ));
    }

    #[test]
    fn file_is_not_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain-file");
        std::fs::write(&file, b"x").unwrap();
        assert!(matches!(
            probe(&file),
            Err(RegistryError::PathNotFound { .. })
        ));
    }
}
