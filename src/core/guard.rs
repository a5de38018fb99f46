//! Guard predicates for controlling state transitions.
//!
//! Guards are boolean functions over the active state and the owner. They
//! are re-evaluated every time a transition is considered, because the owner
//! data they read changes between ticks.

use std::fmt;

type Predicate<S, O> = Box<dyn Fn(&S, &O) -> bool + Send + Sync>;

/// Side-effect-free predicate that gates a transition.
///
/// The first argument is the active state of the layer (the from-state for
/// local transitions), the second is the owner.
///
/// # Example
///
/// ```rust
/// use stance::core::Guard;
///
/// struct Entity { is_dead: bool }
///
/// let is_dead = Guard::new(|_: &(), entity: &Entity| entity.is_dead);
///
/// assert!(is_dead.check(&(), &Entity { is_dead: true }));
/// assert!(!is_dead.check(&(), &Entity { is_dead: false }));
/// ```
pub struct Guard<S, O> {
    predicate: Predicate<S, O>,
}

impl<S, O> Guard<S, O> {
    /// Create a guard from a predicate.
    ///
    /// The predicate must not mutate anything it can reach.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&S, &O) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
        }
    }

    /// Evaluate the guard.
    pub fn check(&self, state: &S, owner: &O) -> bool {
        (self.predicate)(state, owner)
    }
}

impl<S, O> fmt::Debug for Guard<S, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(PartialEq, Debug)]
    enum Phase {
        Walking,
        Rolling,
    }

    struct Owner {
        hp: i32,
    }

    #[test]
    fn guard_reads_owner() {
        let guard = Guard::new(|_: &Phase, owner: &Owner| owner.hp <= 0);

        assert!(guard.check(&Phase::Walking, &Owner { hp: 0 }));
        assert!(!guard.check(&Phase::Walking, &Owner { hp: 10 }));
    }

    #[test]
    fn guard_reads_state() {
        let guard = Guard::new(|state: &Phase, _: &Owner| *state == Phase::Rolling);

        assert!(guard.check(&Phase::Rolling, &Owner { hp: 1 }));
        assert!(!guard.check(&Phase::Walking, &Owner { hp: 1 }));
    }

    #[test]
    fn guard_is_evaluated_on_every_check() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let guard = Guard::new(move |_: &Phase, _: &Owner| {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        });

        let owner = Owner { hp: 1 };
        guard.check(&Phase::Walking, &owner);
        guard.check(&Phase::Walking, &owner);

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn guard_follows_owner_changes() {
        let guard = Guard::new(|_: &Phase, owner: &Owner| owner.hp > 5);
        let mut owner = Owner { hp: 10 };

        assert!(guard.check(&Phase::Walking, &owner));
        owner.hp = 3;
        assert!(!guard.check(&Phase::Walking, &owner));
    }
}
