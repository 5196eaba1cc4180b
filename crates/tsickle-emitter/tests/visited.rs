use super::*;

#[test]
fn test_reentering_is_a_cycle() {
    let mut visited = VisitedTypeSet::new();
    let ty = TypeId(7);
    assert_eq!(visited.enter(ty), VisitResult::Entered);
    assert_eq!(visited.enter(ty), VisitResult::Cycle);
    visited.leave(ty);
    assert!(visited.is_empty());
    assert!(visited.enter(ty).is_entered());
    visited.leave(ty);
}

#[test]
fn test_depth_bound() {
    let mut visited = VisitedTypeSet::with_max_depth(2);
    assert!(visited.enter_nested());
    assert_eq!(visited.enter(TypeId(1)), VisitResult::Entered);
    assert_eq!(visited.enter(TypeId(2)), VisitResult::DepthExceeded);
    assert!(!visited.enter_nested());
    visited.leave(TypeId(1));
    visited.leave_nested();
    assert!(visited.is_empty());
    assert!(visited.enter_nested());
}
