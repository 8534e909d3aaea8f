//! Mountpath registry for a clustered object storage target.
//!
//! The registry is the in-process subsystem a storage node uses to manage
//! the set of local filesystem roots ("mountpaths") it is actively serving
//! object data from, together with the per-mountpath I/O-utilization
//! telemetry schedulers poll to balance work across disks.
//!
//! It sits on the hot path of every local read and write, so it is built
//! around three rules: two distinct mountpaths never resolve to the same
//! underlying filesystem; administrators can add/remove/enable/disable
//! disks at runtime without serializing against readers; and the "current
//! set of mountpaths" is always a single, immutable, atomically-published
//! snapshot so that readers never take a lock.

#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]

mod error;
mod fsid;
mod iostat;
mod record;
mod registry;
mod snapshot;

pub use crate::error::{RegistryError, Result};
pub use crate::fsid::FsId;
pub use crate::iostat::{IoStatCell, IoStats, Sample};
pub use crate::record::MountpathRecord;
pub use crate::registry::{MoveOutcome, Registry};
pub use crate::snapshot::{MountpathMap, Snapshot};
