//! Unit tests for cf-pool.

use std::cell::Cell;
use std::rc::Rc;

use cf_core::{EntityHandle, PrefabKind, Vec2};

use crate::{EntityPool, PoolError, Poolable};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Records every call the pool makes so ordering can be asserted.
#[derive(Debug, Default)]
struct Dummy {
    serial:   u32,
    enabled:  bool,
    active:   bool,
    position: Vec2,
    calls:    Vec<&'static str>,
}

impl Poolable for Dummy {
    fn set_movement_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.calls.push(if enabled { "enable" } else { "disable" });
    }

    fn place(&mut self, position: Vec2, _yaw: f32) {
        // Placing with movement on would let the primitive path from the
        // old position.
        assert!(!self.enabled, "placed while movement enabled");
        self.position = position;
        self.calls.push("place");
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
        self.calls.push(if active { "activate" } else { "deactivate" });
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

const K: PrefabKind = PrefabKind(1);

/// Pool whose factory counts how many instances it has built.
fn pool() -> (EntityPool<Dummy>, Rc<Cell<u32>>) {
    let built = Rc::new(Cell::new(0));
    let counter = Rc::clone(&built);
    let pool = EntityPool::new(move |_kind| {
        counter.set(counter.get() + 1);
        Dummy { serial: counter.get(), ..Dummy::default() }
    });
    (pool, built)
}

// ── Spawn / despawn ───────────────────────────────────────────────────────────

#[cfg(test)]
mod lifecycle {
    use super::*;

    #[test]
    fn prewarm_builds_inactive_instances() {
        let (mut p, built) = pool();
        p.prewarm(K, 3);
        assert_eq!(built.get(), 3);
        assert_eq!(p.free_count(K), 3);
        assert_eq!(p.stats().prewarmed, 3);
    }

    #[test]
    fn spawn_places_before_enabling() {
        let (mut p, _) = pool();
        p.prewarm(K, 1);
        let s = p.spawn(K, Vec2::new(3.0, 4.0), 0.0);
        assert!(!s.fresh);
        assert!(s.instance.is_active());
        assert!(s.instance.enabled);
        assert_eq!(s.instance.position, Vec2::new(3.0, 4.0));
        assert_eq!(
            s.instance.calls,
            vec!["disable", "deactivate", "disable", "place", "activate", "enable"]
        );
    }

    #[test]
    fn despawn_disables_and_deactivates() {
        let (mut p, _) = pool();
        let s = p.spawn(K, Vec2::ZERO, 0.0);
        assert!(s.fresh);
        p.despawn(K, s.handle, s.instance).unwrap();
        assert_eq!(p.free_count(K), 1);
        assert!(!p.is_checked_out(s.handle));

        let again = p.spawn(K, Vec2::X, 0.0);
        assert_eq!(again.handle, s.handle);
        assert!(again.instance.calls.ends_with(&["disable", "deactivate", "disable", "place", "activate", "enable"]));
    }

    #[test]
    fn prewarm_eight_spawn_ten_despawn_five() {
        let (mut p, built) = pool();
        p.prewarm(K, 8);

        let spawned: Vec<_> = (0..10).map(|i| p.spawn(K, Vec2::new(i as f32, 0.0), 0.0)).collect();
        let fresh: Vec<bool> = spawned.iter().map(|s| s.fresh).collect();
        assert_eq!(fresh.iter().filter(|f| !**f).count(), 8);
        assert!(fresh[8] && fresh[9]);
        assert_eq!(built.get(), 10);
        assert_eq!(p.checked_out_count(), 10);
        assert_eq!(p.free_count(K), 0);

        let mut spawned = spawned.into_iter();
        let mut returned = Vec::new();
        for s in spawned.by_ref().take(5) {
            returned.push(s.handle);
            p.despawn(K, s.handle, s.instance).unwrap();
        }
        assert_eq!(p.free_count(K), 5);
        assert_eq!(p.checked_out_count(), 5);

        // The returned five are reused, oldest first, without building more.
        for expected in returned {
            let s = p.spawn(K, Vec2::ZERO, 0.0);
            assert!(!s.fresh);
            assert_eq!(s.handle, expected);
        }
        assert_eq!(built.get(), 10);

        let stats = p.stats();
        assert_eq!(stats.prewarmed, 8);
        assert_eq!(stats.fresh, 2);
        assert_eq!(stats.recycled, 13);
        assert_eq!(stats.despawned, 5);
    }

    #[test]
    fn kinds_are_independent() {
        let (mut p, _) = pool();
        p.prewarm(PrefabKind(1), 2);
        p.prewarm(PrefabKind(2), 1);
        let s = p.spawn(PrefabKind(2), Vec2::ZERO, 0.0);
        assert!(!s.fresh);
        assert!(p.spawn(PrefabKind(2), Vec2::ZERO, 0.0).fresh);
        assert_eq!(p.free_count(PrefabKind(1)), 2);
        let kinds: Vec<_> = p.kinds().collect();
        assert_eq!(kinds, vec![PrefabKind(1), PrefabKind(2)]);
    }
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod errors {
    use super::*;

    #[test]
    fn double_despawn_rejected() {
        let (mut p, _) = pool();
        let s = p.spawn(K, Vec2::ZERO, 0.0);
        let handle = s.handle;
        p.despawn(K, handle, s.instance).unwrap();
        assert_eq!(p.despawn(K, handle, Dummy::default()), Err(PoolError::NotCheckedOut(handle)));
        assert_eq!(p.free_count(K), 1);
    }

    #[test]
    fn unknown_handle_rejected() {
        let (mut p, _) = pool();
        let h = EntityHandle(42);
        assert_eq!(p.despawn(K, h, Dummy::default()), Err(PoolError::UnknownHandle(h)));
    }

    #[test]
    fn wrong_kind_rejected_and_still_checked_out() {
        let (mut p, _) = pool();
        let s = p.spawn(K, Vec2::ZERO, 0.0);
        let err = p.despawn(PrefabKind(9), s.handle, Dummy::default()).unwrap_err();
        assert_eq!(err, PoolError::KindMismatch { handle: s.handle, expected: K, actual: PrefabKind(9) });
        assert!(p.is_checked_out(s.handle));
        assert_eq!(s.instance.serial, 1);
    }
}
