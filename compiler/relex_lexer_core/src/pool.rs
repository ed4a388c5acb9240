//! Lock-guarded object pool with scoped return.
//!
//! A [`Pooled`] guard hands its value back to the pool when dropped, so a
//! lexing session releases its buffers on every exit path, unwinding
//! included. Pools are `Sync` and can live in a `static`.

use std::ops::{Deref, DerefMut};

use parking_lot::Mutex;

/// A bounded free list of reusable values.
pub struct Pool<T> {
    free: Mutex<Vec<T>>,
    max_retained: usize,
}

impl<T> Pool<T> {
    /// Create a pool that keeps at most `max_retained` idle values.
    pub const fn new(max_retained: usize) -> Self {
        Pool {
            free: parking_lot::const_mutex(Vec::new()),
            max_retained,
        }
    }

    /// Take an idle value accepted by `fits`, or build one with `create`.
    ///
    /// Idle values rejected by `fits` are dropped.
    pub fn take(&self, fits: impl Fn(&T) -> bool, create: impl FnOnce() -> T) -> Pooled<'_, T> {
        let reused = {
            let mut free = self.free.lock();
            let mut found = None;
            while let Some(value) = free.pop() {
                if fits(&value) {
                    found = Some(value);
                    break;
                }
            }
            found
        };
        let value = reused.unwrap_or_else(create);
        Pooled {
            pool: self,
            value: Some(value),
        }
    }

    /// Number of idle values.
    pub fn idle(&self) -> usize {
        self.free.lock().len()
    }

    fn give_back(&self, value: T) {
        let mut free = self.free.lock();
        if free.len() < self.max_retained {
            free.push(value);
        }
    }
}

/// A value borrowed from a [`Pool`]; returned on drop.
pub struct Pooled<'p, T> {
    pool: &'p Pool<T>,
    value: Option<T>,
}

impl<T> Pooled<'_, T> {
    /// Keep the value instead of returning it to the pool.
    pub fn detach(mut self) -> Option<T> {
        self.value.take()
    }
}

impl<T> Deref for Pooled<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        match &self.value {
            Some(value) => value,
            None => unreachable!("pooled value is only taken on drop or detach"),
        }
    }
}

impl<T> DerefMut for Pooled<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        match &mut self.value {
            Some(value) => value,
            None => unreachable!("pooled value is only taken on drop or detach"),
        }
    }
}

impl<T> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        if let Some(value) = self.value.take() {
            self.pool.give_back(value);
        }
    }
}

#[cfg(test)]
mod tests;
