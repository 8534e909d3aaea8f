//! The immutable `(available, disabled)` pair published by the registry.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::record::MountpathRecord;

/// A mapping from cleaned path to the record registered under it.
pub type MountpathMap = HashMap<PathBuf, Arc<MountpathRecord>>;

/// The currently published view of the registry: which mountpaths are
/// serving I/O (`available`) and which are administratively disabled
/// (`disabled`).
///
/// Once published by a mutator, a `Snapshot` is never modified; mutators
/// construct a new one and swap the registry's published pointer. A reader
/// holding an `Arc<Snapshot>` is therefore unaffected by concurrent
/// mutators: its two maps stay exactly as they were at the moment `Get`
/// returned them.
#[derive(Debug, Default)]
pub struct Snapshot {
    available: MountpathMap,
    disabled: MountpathMap,
}

impl Snapshot {
    pub(crate) fn new(available: MountpathMap, disabled: MountpathMap) -> Self {
        Self { available, disabled }
    }

    /// Mountpaths currently serving I/O.
    pub fn available(&self) -> &MountpathMap {
        &self.available
    }

    /// Mountpaths retained but excluded from I/O and from `fsid` uniqueness.
    pub fn disabled(&self) -> &MountpathMap {
        &self.disabled
    }

    pub(crate) fn contains(&self, path: &Path) -> bool {
        self.available.contains_key(path) || self.disabled.contains_key(path)
    }

    pub(crate) fn available_mut_clone(&self) -> MountpathMap {
        self.available.clone()
    }

    pub(crate) fn disabled_mut_clone(&self) -> MountpathMap {
        self.disabled.clone()
    }
}
