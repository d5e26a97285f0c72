//! Version counters for lazy-recompute invalidation.
//!
//! Instead of registering observer callbacks against mutable global
//! state, every mutable upstream collaborator carries a monotonically
//! increasing version counter, bumped on each mutation; a cache records
//! the versions it computed from and treats any mismatch on a later
//! read as an invalidation. This keeps the lazy-recompute contract
//! without hidden callback registration.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use crate::types::time::Date;

/// A collaborator whose mutations are observable through a version counter.
///
/// Implementations must bump the version on every externally visible
/// mutation. Versions only ever increase; equality of two observations
/// means no mutation happened in between.
pub trait Versioned {
    /// Returns the current version.
    fn version(&self) -> u64;
}

/// Shared, mutable evaluation date.
///
/// Stands in for a process-wide "today" singleton: consumers hold a
/// shared handle and pricing caches watch its version. Setting the date
/// bumps the version even when the new date equals the old one, so
/// dependants stay pessimistic and can never miss a change.
///
/// # Examples
///
/// ```
/// use stripper_core::market_data::{EvaluationDate, Versioned};
/// use stripper_core::types::time::Date;
///
/// let eval = EvaluationDate::new(Date::from_ymd(2024, 6, 14).unwrap());
/// let v0 = eval.version();
///
/// eval.set(Date::from_ymd(2024, 6, 17).unwrap());
/// assert!(eval.version() > v0);
/// assert_eq!(eval.get(), Date::from_ymd(2024, 6, 17).unwrap());
/// ```
#[derive(Debug)]
pub struct EvaluationDate {
    date: RwLock<Date>,
    version: AtomicU64,
}

impl EvaluationDate {
    /// Creates a handle holding the given date.
    pub fn new(date: Date) -> Self {
        Self {
            date: RwLock::new(date),
            version: AtomicU64::new(0),
        }
    }

    /// Returns the current evaluation date.
    pub fn get(&self) -> Date {
        match self.date.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Sets the evaluation date and bumps the version.
    pub fn set(&self, date: Date) {
        match self.date.write() {
            Ok(mut guard) => *guard = date,
            Err(poisoned) => *poisoned.into_inner() = date,
        }
        self.version.fetch_add(1, Ordering::SeqCst);
    }
}

impl Versioned for EvaluationDate {
    fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }
}
