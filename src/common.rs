//! Identifier allocation shared by bodies, constraints and collision filters.
//!
//! All allocators are thread-local: a simulation runs on a single thread, and keeping the
//! counters per thread gives every test its own deterministic sequence.

use std::cell::Cell;
use std::fmt;

thread_local! {
    static NEXT_ID: Cell<u32> = const { Cell::new(0) };
    static NEXT_COLLIDING_GROUP: Cell<i32> = const { Cell::new(1) };
    static NEXT_NON_COLLIDING_GROUP: Cell<i32> = const { Cell::new(-1) };
    static NEXT_CATEGORY: Cell<u32> = const { Cell::new(0x0001) };
}

/// Return the next unique identifier (starting at 1).
pub fn next_id() -> u32 {
    NEXT_ID.with(|id| {
        let next = id.get() + 1;
        id.set(next);
        next
    })
}

/// Allocate a collision group.
///
/// Colliding groups are positive and count up; non-colliding groups are negative and count down.
pub fn next_group(non_colliding: bool) -> i32 {
    if non_colliding {
        NEXT_NON_COLLIDING_GROUP.with(|group| {
            let value = group.get();
            group.set(value - 1);
            value
        })
    } else {
        NEXT_COLLIDING_GROUP.with(|group| {
            let value = group.get();
            group.set(value + 1);
            value
        })
    }
}

/// Allocate the next single-bit collision category (the first call returns `0x0002`).
pub fn next_category() -> u32 {
    NEXT_CATEGORY.with(|category| {
        let next = category.get() << 1;
        category.set(next);
        next
    })
}

/// Reset every allocator on the current thread to its initial state.
pub fn reset_ids() {
    NEXT_ID.with(|id| id.set(0));
    NEXT_COLLIDING_GROUP.with(|group| group.set(1));
    NEXT_NON_COLLIDING_GROUP.with(|group| group.set(-1));
    NEXT_CATEGORY.with(|category| category.set(0x0001));
}

/// Stable identity of a body or body part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyId(pub u32);

impl BodyId {
    pub(crate) fn next() -> Self {
        Self(next_id())
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "body#{}", self.0)
    }
}

/// Stable identity of a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConstraintId(pub u32);

impl ConstraintId {
    pub(crate) fn next() -> Self {
        Self(next_id())
    }
}

impl fmt::Display for ConstraintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "constraint#{}", self.0)
    }
}

/// Round `value` to `decimals` decimal places.
pub(crate) fn round(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_sequential_after_reset() {
        reset_ids();
        assert_eq!(next_id(), 1);
        assert_eq!(next_id(), 2);
        reset_ids();
        assert_eq!(next_id(), 1);
    }

    #[test]
    fn test_group_allocation() {
        reset_ids();
        assert_eq!(next_group(false), 1);
        assert_eq!(next_group(false), 2);
        assert_eq!(next_group(true), -1);
        assert_eq!(next_group(true), -2);
    }

    #[test]
    fn test_category_allocation() {
        reset_ids();
        assert_eq!(next_category(), 0x0002);
        assert_eq!(next_category(), 0x0004);
        reset_ids();
        assert_eq!(next_category(), 0x0002);
    }

    #[test]
    fn test_round() {
        assert_eq!(round(1.23456, 3), 1.235);
        assert_eq!(round(-0.0004, 3), -0.0);
    }
}
