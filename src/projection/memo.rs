//! Memoization cells for the recurrence engine
//!
//! Every time-indexed quantity in the projection is a pure function of its
//! arguments, so each distinct (quantity, argument) pair is computed at
//! most once per engine instance and cached. Cells release their borrow
//! before computing, which lets a quantity demand itself at an earlier
//! month during the computation (the recursion is bounded: every
//! self-reference strictly reduces `t` toward the base case at 0).
//!
//! Each cell counts hits and computations so callers can observe caching
//! behavior; errors are propagated to the caller and never cached.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::hash::Hash;

/// Cache statistics for one quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStats {
    /// Quantity name
    pub quantity: &'static str,

    /// Number of cached (argument, value) entries
    pub entries: usize,

    /// Lookups served from the cache
    pub hits: u64,

    /// Values actually computed
    pub computations: u64,
}

/// Memoization cell for a quantity keyed by its argument
#[derive(Debug, Default)]
pub struct MemoCell<K, V> {
    values: RefCell<HashMap<K, V>>,
    hits: Cell<u64>,
    computations: Cell<u64>,
}

impl<K: Eq + Hash + Copy, V: Copy> MemoCell<K, V> {
    pub fn new() -> Self {
        Self {
            values: RefCell::new(HashMap::new()),
            hits: Cell::new(0),
            computations: Cell::new(0),
        }
    }

    /// Return the cached value for `key`, computing and caching it first
    /// if absent. `compute` runs with no borrow held, so it may recurse
    /// back into this cell with a different key.
    pub fn get_or_try_compute<E>(
        &self,
        key: K,
        compute: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E> {
        if let Some(value) = self.values.borrow().get(&key) {
            self.hits.set(self.hits.get() + 1);
            return Ok(*value);
        }
        let value = compute()?;
        self.computations.set(self.computations.get() + 1);
        self.values.borrow_mut().insert(key, value);
        Ok(value)
    }

    /// Infallible variant of [`get_or_try_compute`](Self::get_or_try_compute)
    pub fn get_or_compute(&self, key: K, compute: impl FnOnce() -> V) -> V {
        if let Some(value) = self.values.borrow().get(&key) {
            self.hits.set(self.hits.get() + 1);
            return *value;
        }
        let value = compute();
        self.computations.set(self.computations.get() + 1);
        self.values.borrow_mut().insert(key, value);
        value
    }

    pub fn stats(&self, quantity: &'static str) -> CellStats {
        CellStats {
            quantity,
            entries: self.values.borrow().len(),
            hits: self.hits.get(),
            computations: self.computations.get(),
        }
    }
}

/// Memoization cell for a scalar quantity with no arguments
#[derive(Default)]
pub struct ScalarCell<V> {
    value: Cell<Option<V>>,
    hits: Cell<u64>,
    computations: Cell<u64>,
}

impl<V: Copy> ScalarCell<V> {
    pub fn new() -> Self {
        Self {
            value: Cell::new(None),
            hits: Cell::new(0),
            computations: Cell::new(0),
        }
    }

    /// Return the cached value, computing and caching it first if absent
    pub fn get_or_try_compute<E>(&self, compute: impl FnOnce() -> Result<V, E>) -> Result<V, E> {
        if let Some(value) = self.value.get() {
            self.hits.set(self.hits.get() + 1);
            return Ok(value);
        }
        let value = compute()?;
        self.computations.set(self.computations.get() + 1);
        self.value.set(Some(value));
        Ok(value)
    }

    pub fn stats(&self, quantity: &'static str) -> CellStats {
        CellStats {
            quantity,
            entries: if self.value.get().is_some() { 1 } else { 0 },
            hits: self.hits.get(),
            computations: self.computations.get(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_computes_once_per_key() {
        let cell: MemoCell<u32, f64> = MemoCell::new();
        let mut calls = 0;

        for _ in 0..3 {
            let v = cell.get_or_compute(7, || {
                calls += 1;
                42.0
            });
            assert_eq!(v, 42.0);
        }

        assert_eq!(calls, 1);
        let stats = cell.stats("x");
        assert_eq!(stats.computations, 1);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let cell: MemoCell<u32, f64> = MemoCell::new();

        let err: Result<f64, &str> = cell.get_or_try_compute(1, || Err("nope"));
        assert!(err.is_err());
        assert_eq!(cell.stats("x").entries, 0);

        // A later successful computation goes through
        let ok: Result<f64, &str> = cell.get_or_try_compute(1, || Ok(1.0));
        assert_eq!(ok.unwrap(), 1.0);
    }

    #[test]
    fn test_recursive_self_reference() {
        // factorial-flavored recurrence through the cell itself
        let cell: MemoCell<u32, f64> = MemoCell::new();

        fn fact(cell: &MemoCell<u32, f64>, n: u32) -> f64 {
            cell.get_or_compute(n, || {
                if n == 0 {
                    1.0
                } else {
                    n as f64 * fact(cell, n - 1)
                }
            })
        }

        assert_eq!(fact(&cell, 5), 120.0);
        // 0..=5 each computed exactly once
        assert_eq!(cell.stats("fact").computations, 6);
    }

    #[test]
    fn test_scalar_cell() {
        let cell: ScalarCell<f64> = ScalarCell::new();
        let mut calls = 0;

        for _ in 0..2 {
            let v: Result<f64, std::convert::Infallible> = cell.get_or_try_compute(|| {
                calls += 1;
                Ok(9.5)
            });
            assert_eq!(v.unwrap(), 9.5);
        }
        assert_eq!(calls, 1);
        assert_eq!(cell.stats("x").hits, 1);
    }
}
