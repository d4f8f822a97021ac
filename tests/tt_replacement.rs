use negamax_select::search::tt::{Bound, TranspositionTable};
use negamax_select::Move;

#[test]
fn tt_depth_preferred_on_collision() {
    let mut tt = TranspositionTable::new(4);
    // 1 and 5 share slot 1
    tt.store(1, 6, 10, Bound::Exact, None);
    tt.store(5, 2, 20, Bound::Exact, None);
    assert_eq!(tt.lookup(1).map(|e| e.score), Some(10), "deep entry evicted by shallow one");
    assert!(tt.lookup(5).is_none());
    tt.store(5, 6, 30, Bound::Lower, None);
    assert_eq!(tt.lookup(5).map(|e| (e.score, e.bound)), Some((30, Bound::Lower)), "equal depth should replace");
    assert!(tt.lookup(1).is_none(), "colliding key must read as a miss");
    assert_eq!(tt.len(), 1);
}

#[test]
fn tt_same_key_refreshes_at_depth() {
    let mut tt = TranspositionTable::new(16);
    let mv: Move = "e2e4".parse().unwrap();
    tt.store(42, 3, -5, Bound::Upper, None);
    tt.store(42, 4, 7, Bound::Exact, Some(mv));
    let e = tt.lookup(42).expect("entry present");
    assert_eq!((e.depth, e.score, e.bound, e.best), (4, 7, Bound::Exact, Some(mv)));
    tt.store(42, 1, 99, Bound::Lower, None);
    assert_eq!(tt.lookup(42).map(|e| e.depth), Some(4));
}

#[test]
fn tt_capacity_from_megabytes() {
    let tt = TranspositionTable::with_capacity_mb(1);
    assert!(tt.capacity() > 1000, "1 MB should hold thousands of entries, got {}", tt.capacity());
    assert!(tt.is_empty());
    assert_eq!(tt.hashfull(), 0);
}
