use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;

fn counter() -> (Arc<AtomicUsize>, ProgressCallback) {
    let hits = Arc::new(AtomicUsize::new(0));
    let h = hits.clone();
    (
        hits,
        Arc::new(move || {
            h.fetch_add(1, Ordering::SeqCst);
        }),
    )
}

#[test]
fn subscription_lives_as_long_as_guard() {
    let hooks = ProgressHooks::new();
    let (hits, cb) = counter();
    {
        let _sub = hooks.subscribe(cb);
        assert_eq!(hooks.registered(), 1);
        hooks.notify_frame_complete();
    }
    assert_eq!(hooks.registered(), 0);
    hooks.notify_frame_complete();
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn guards_release_independently() {
    let hooks = ProgressHooks::new();
    let (hits_a, a) = counter();
    let (hits_b, b) = counter();
    let sub_a = hooks.subscribe(a);
    let sub_b = hooks.subscribe(b);
    drop(sub_a);
    hooks.notify_frame_complete();
    assert_eq!(hits_a.load(Ordering::SeqCst), 0);
    assert_eq!(hits_b.load(Ordering::SeqCst), 1);
    drop(sub_b);
    assert_eq!(hooks.registered(), 0);
}

#[test]
fn release_happens_on_unwind() {
    let hooks = ProgressHooks::new();
    let (_, cb) = counter();
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _sub = hooks.subscribe(cb);
        panic!("render blew up");
    }));
    assert!(result.is_err());
    assert_eq!(hooks.registered(), 0);
}

#[test]
fn handler_may_query_registry() {
    let hooks = Arc::new(ProgressHooks::new());
    let seen = Arc::new(AtomicUsize::new(usize::MAX));
    let (h, s) = (hooks.clone(), seen.clone());
    let sub = hooks.subscribe(Arc::new(move || {
        s.store(h.registered(), Ordering::SeqCst);
    }));
    hooks.notify_frame_complete();
    assert_eq!(seen.load(Ordering::SeqCst), 1);
    drop(sub);
}
