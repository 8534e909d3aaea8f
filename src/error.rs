//! Error taxonomy for the mountpath registry.

use std::path::PathBuf;

/// Failure modes returned by registry mutators.
///
/// `SetIOstats` has no error surface by design: unknown paths are silently
/// skipped rather than reported (see [`crate::registry::Registry::set_iostats`]).
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The path collides with a reserved bucket-type subtree name (`local`,
    /// `cloud`) and was rejected before any filesystem probe ran.
    #[error("{path}: reserved mountpath name or subtree")]
    InvalidPath {
        /// The path as supplied by the caller.
        path: PathBuf,
    },

    /// The path does not exist, or exists but is not a directory.
    #[error("{path}: not found or not a directory")]
    PathNotFound {
        /// The path as supplied by the caller.
        path: PathBuf,
    },

    /// The path is already present, in either `available` or `disabled`.
    #[error("{path}: already registered")]
    AlreadyRegistered {
        /// The path as supplied by the caller.
        path: PathBuf,
    },

    /// The path resolves to the same filesystem as another available
    /// mountpath, and `fsid` uniqueness enforcement is on.
    #[error("{path}: same filesystem as already-available mountpath {existing}")]
    DuplicateFsId {
        /// The path that was rejected.
        path: PathBuf,
        /// The existing available mountpath it aliases.
        existing: PathBuf,
    },

    /// `Remove` was called on a path present in neither side of the snapshot.
    #[error("{path}: not registered")]
    NotRegistered {
        /// The path as supplied by the caller.
        path: PathBuf,
    },

    /// The OS failed to report a filesystem identifier for the path.
    #[error("{path}: failed to stat filesystem")]
    ProbeFailure {
        /// The path being probed.
        path: PathBuf,
        /// The underlying OS error.
        #[source]
        source: nix::Error,
    },
}

/// Result type returned by fallible registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
