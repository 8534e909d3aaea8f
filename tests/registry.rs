//! End-to-end registry scenarios, exercised against real temporary
//! directories the way `mnt/mod.rs`'s own mount/unmount test exercises a
//! real FUSE mount.

use std::collections::HashMap;

use mountpath_registry::{Registry, RegistryError};

fn counts(reg: &Registry) -> (usize, usize) {
    let snap = reg.get();
    (snap.available().len(), snap.disabled().len())
}

#[test]
fn full_lifecycle_add_disable_enable_remove() {
    let reg = Registry::new();
    reg.disable_fsid_check();
    let dir = tempfile::tempdir().unwrap();

    reg.add(dir.path()).unwrap();
    assert_eq!(counts(&reg), (1, 0));

    let outcome = reg.disable(dir.path());
    assert!(outcome.changed && outcome.exists);
    assert_eq!(counts(&reg), (0, 1));

    let outcome = reg.enable(dir.path());
    assert!(outcome.changed && outcome.exists);
    assert_eq!(counts(&reg), (1, 0));

    let outcome = reg.enable(dir.path());
    assert!(!outcome.changed && outcome.exists);

    reg.remove(dir.path()).unwrap();
    assert_eq!(counts(&reg), (0, 0));
}

#[test]
fn concurrent_adds_and_removes_never_leave_overlapping_sides() {
    use std::sync::Arc;
    use std::thread;

    let reg = Arc::new(Registry::new());
    reg.disable_fsid_check();
    let dirs: Vec<_> = (0..8).map(|_| tempfile::tempdir().unwrap()).collect();

    let handles: Vec<_> = dirs
        .iter()
        .map(|d| {
            let reg = Arc::clone(&reg);
            let path = d.path().to_path_buf();
            thread::spawn(move || reg.add(&path).unwrap())
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(counts(&reg), (8, 0));

    let snap = reg.get();
    for path in snap.available().keys() {
        assert!(!snap.disabled().contains_key(path));
    }

    let handles: Vec<_> = dirs
        .iter()
        .map(|d| {
            let reg = Arc::clone(&reg);
            let path = d.path().to_path_buf();
            thread::spawn(move || reg.remove(&path).unwrap())
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(counts(&reg), (0, 0));
}

#[test]
fn concurrent_iostat_updates_do_not_tear() {
    use std::sync::Arc;
    use std::thread;

    let reg = Arc::new(Registry::new());
    reg.disable_fsid_check();
    let dir = tempfile::tempdir().unwrap();
    reg.add(dir.path()).unwrap();
    let path = reg.get().available().keys().next().unwrap().clone();

    let handles: Vec<_> = (0..50)
        .map(|i| {
            let reg = Arc::clone(&reg);
            let path = path.clone();
            thread::spawn(move || {
                let v = i as f64;
                reg.set_iostats(
                    &HashMap::from([(path.clone(), v)]),
                    &HashMap::from([(path, v)]),
                );
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let stats = reg.get().available().get(&path).unwrap().iostats();
    // Util and queue must always have advanced together, never torn.
    assert_eq!(stats.util.curr, stats.queue.curr);
}

#[test]
fn remove_unregistered_path_fails() {
    let reg = Registry::new();
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        reg.remove(dir.path()),
        Err(RegistryError::NotRegistered { .. })
    ));
}
