//! The Registry: the top-level mountpath manager.
//!
//! Administrative mutators (`add`/`remove`/`enable`/`disable`) serialize on
//! a single lock, build a new [`Snapshot`], and publish it with one atomic
//! swap. Readers (`get`, `set_iostats`) never take that lock; they observe
//! whichever snapshot is currently published and, for telemetry, write
//! straight into a record's own [`IoStatCell`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info, warn};
use parking_lot::{Mutex, RwLock};

use crate::error::{RegistryError, Result};
use crate::fsid;
use crate::record::MountpathRecord;
use crate::snapshot::Snapshot;

/// Bucket-type subtree names reserved inside every mountpath; a path under
/// or equal to one of these can never itself be registered as a mountpath.
const RESERVED_NAMES: [&str; 2] = ["local", "cloud"];

/// Outcome of [`Registry::enable`]/[`Registry::disable`]: whether the
/// record actually moved, and whether the path was known at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    /// `true` iff the record was on the other side and is now on the
    /// requested side.
    pub changed: bool,
    /// `true` iff the path was registered (on either side) at all.
    pub exists: bool,
}

/// The mountpath registry.
///
/// Holds the currently published [`Snapshot`] behind a `RwLock<Arc<_>>` so
/// that `get`/`set_iostats` never block, plus a separate `Mutex` used only
/// to serialize mutators while they build the next snapshot.
#[derive(Debug)]
pub struct Registry {
    published: RwLock<Arc<Snapshot>>,
    mutator_lock: Mutex<()>,
    fsid_check_enabled: AtomicBool,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Construct an empty registry with `fsid` uniqueness enforcement on.
    pub fn new() -> Self {
        Self {
            published: RwLock::new(Arc::new(Snapshot::default())),
            mutator_lock: Mutex::new(()),
            fsid_check_enabled: AtomicBool::new(true),
        }
    }

    /// Turn off `fsid` uniqueness enforcement for subsequent `add` calls.
    ///
    /// Intended for test and single-disk scenarios where two mountpaths may
    /// legitimately share a filesystem. There is no way to turn the check
    /// back on; it is a one-way runtime toggle, not a config file.
    pub fn disable_fsid_check(&self) {
        self.fsid_check_enabled.store(false, Ordering::Relaxed);
    }

    /// Return the currently published snapshot.
    ///
    /// The caller must treat the returned maps as read-only; the registry
    /// never mutates a published snapshot in place.
    pub fn get(&self) -> Arc<Snapshot> {
        Arc::clone(&self.published.read())
    }

    /// Register `path` as an available mountpath.
    ///
    /// Canonicalizes and validates `path` and probes its filesystem
    /// *before* taking the mutator lock (steps 1-4 of the canonical
    /// sequence happen outside the lock, so a hung filesystem blocks only
    /// the calling thread, not other mutators). If validation fails at any
    /// step, no snapshot is published.
    pub fn add(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = canonicalize(path.as_ref());
        reject_reserved(&path)?;
        let new_fsid = fsid::probe(&path)?;

        let _guard = self.mutator_lock.lock();
        let current = self.get();

        if current.contains(&path) {
            warn!("add({}): already registered", path.display());
            return Err(RegistryError::AlreadyRegistered { path });
        }

        if self.fsid_check_enabled.load(Ordering::Relaxed) {
            if let Some(existing) = current
                .available()
                .values()
                .find(|r| r.fsid() == new_fsid)
            {
                warn!(
                    "add({}): same filesystem as available mountpath {}",
                    path.display(),
                    existing.path().display()
                );
                return Err(RegistryError::DuplicateFsId {
                    path,
                    existing: existing.path().to_path_buf(),
                });
            }
        }

        let mut available = current.available_mut_clone();
        available.insert(path.clone(), Arc::new(MountpathRecord::new(path.clone(), new_fsid)));
        let disabled = current.disabled_mut_clone();

        self.publish(Snapshot::new(available, disabled));
        info!("add({}): registered as available", path.display());
        Ok(())
    }

    /// Remove `path` from whichever side of the snapshot holds it.
    pub fn remove(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = canonicalize(path.as_ref());

        let _guard = self.mutator_lock.lock();
        let current = self.get();

        let mut available = current.available_mut_clone();
        let mut disabled = current.disabled_mut_clone();

        if available.remove(&path).is_some() {
            self.publish(Snapshot::new(available, disabled));
            info!("remove({}): removed from available", path.display());
            return Ok(());
        }
        if disabled.remove(&path).is_some() {
            self.publish(Snapshot::new(available, disabled));
            info!("remove({}): removed from disabled", path.display());
            return Ok(());
        }

        warn!("remove({}): not registered", path.display());
        Err(RegistryError::NotRegistered { path })
    }

    /// Move `path` from `disabled` to `available`, if it is currently
    /// disabled. Does not rebuild the record or re-run the `fsid`
    /// uniqueness check (see the registry's design notes).
    pub fn enable(&self, path: impl AsRef<Path>) -> MoveOutcome {
        self.move_side(path, Side::Disabled, Side::Available)
    }

    /// Move `path` from `available` to `disabled`, if it is currently
    /// available.
    pub fn disable(&self, path: impl AsRef<Path>) -> MoveOutcome {
        self.move_side(path, Side::Available, Side::Disabled)
    }

    fn move_side(&self, path: impl AsRef<Path>, from: Side, to: Side) -> MoveOutcome {
        let path = canonicalize(path.as_ref());

        let _guard = self.mutator_lock.lock();
        let current = self.get();

        let mut available = current.available_mut_clone();
        let mut disabled = current.disabled_mut_clone();

        let (from_map, to_map) = match from {
            Side::Available => (&mut available, &mut disabled),
            Side::Disabled => (&mut disabled, &mut available),
        };

        let Some(record) = from_map.remove(&path) else {
            let exists = to_map.contains_key(&path);
            return MoveOutcome {
                changed: false,
                exists,
            };
        };

        to_map.insert(path.clone(), record);
        self.publish(Snapshot::new(available, disabled));
        info!("{:?}({}): moved to {:?}", from, path.display(), to);
        MoveOutcome {
            changed: true,
            exists: true,
        }
    }

    /// Push a bulk telemetry update. Takes no registry lock: looks up each
    /// path through the currently published snapshot and writes into that
    /// record's own cell. Paths present only in `disabled`, or absent
    /// entirely, are silently skipped. Per the recommended policy for
    /// mismatched key sets (see design notes), only paths present in both
    /// maps are applied.
    pub fn set_iostats(
        &self,
        util_by_path: &HashMap<PathBuf, f64>,
        queue_by_path: &HashMap<PathBuf, f64>,
    ) {
        let current = self.get();
        for (path, &util) in util_by_path {
            let Some(&queue) = queue_by_path.get(path) else {
                debug!(
                    "set_iostats({}): present in util map only, skipping",
                    path.display()
                );
                continue;
            };
            match current.available().get(path) {
                Some(record) => record.iostat_cell().set(util, queue),
                None => debug!("set_iostats({}): not an available mountpath", path.display()),
            }
        }
    }

    fn publish(&self, snapshot: Snapshot) {
        *self.published.write() = Arc::new(snapshot);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Available,
    Disabled,
}

fn canonicalize(path: &Path) -> PathBuf {
    use path_clean::PathClean;

    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("/"))
            .join(path)
    };
    absolute.clean()
}

/// Rejects a path equal to, under, or ending in a reserved bucket-type
/// subtree name. Only the first segment after the root (the "under
/// /local or /cloud" case) and the final segment (the "ends in local or
/// cloud" case) are checked; a reserved name as an *interior* segment
/// (e.g. `/data/local/sda`) is a legitimate mountpath.
fn reject_reserved(path: &Path) -> Result<()> {
    use std::path::Component;

    let segments: Vec<&std::ffi::OsStr> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s),
            _ => None,
        })
        .collect();

    let is_reserved = |s: &std::ffi::OsStr| {
        s.to_str().is_some_and(|s| RESERVED_NAMES.contains(&s))
    };

    let reserved = segments
        .first()
        .is_some_and(|s| is_reserved(s))
        || segments.last().is_some_and(|s| is_reserved(s));

    if reserved {
        return Err(RegistryError::InvalidPath {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}
