//! Mountpath Record: an immutable-once-published description of one
//! filesystem root.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::fsid::FsId;
use crate::iostat::{IoStatCell, IoStats};

/// One filesystem root the target is (or was) serving object data from.
///
/// All fields are fixed at construction inside [`crate::registry::Registry::add`];
/// the record is never mutated after insertion into a snapshot. Equality
/// and keying use `path`. The `iostats` cell is the one piece of the record
/// that *is* mutated after publication, via its own short lock, decoupled
/// from the registry's mutator lock.
#[derive(Debug)]
pub struct MountpathRecord {
    path: PathBuf,
    fsid: FsId,
    iostats: Arc<IoStatCell>,
}

impl MountpathRecord {
    pub(crate) fn new(path: PathBuf, fsid: FsId) -> Self {
        Self {
            path,
            fsid,
            iostats: Arc::new(IoStatCell::new()),
        }
    }

    /// The cleaned, absolute path this record was registered under.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The filesystem identifier this path resolved to at Add time.
    pub fn fsid(&self) -> FsId {
        self.fsid
    }

    /// The latest `(prev, curr)` utilization/queue-length sample pair.
    pub fn iostats(&self) -> IoStats {
        self.iostats.get()
    }

    pub(crate) fn iostat_cell(&self) -> &Arc<IoStatCell> {
        &self.iostats
    }
}

impl PartialEq for MountpathRecord {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for MountpathRecord {}
