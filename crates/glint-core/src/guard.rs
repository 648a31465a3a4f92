//! Scoped release guards.
//!
//! GPU objects in this workspace are owned by external systems (the Vulkan
//! driver, the windowing layer) and must be released through an explicit call
//! rather than a destructor. `ScopeGuard` ties that release call to a scope:
//! it runs exactly once when the guard is dropped, on every exit path.

/// Runs a release closure over a held value when the scope ends.
///
/// The release runs on normal fall-through, early `return`/`?`, and panic
/// unwind alike. [`ScopeGuard::into_inner`] disarms the guard and hands the
/// value back without releasing it. A guard whose value is absent is a no-op.
pub struct ScopeGuard<T, F: FnOnce(T)> {
    value: Option<T>,
    release: Option<F>,
}

impl<T, F: FnOnce(T)> ScopeGuard<T, F> {
    /// Create a guard that releases `value` with `release` on scope exit.
    pub fn new(value: T, release: F) -> Self {
        Self {
            value: Some(value),
            release: Some(release),
        }
    }

    /// Create a guard over an optional value.
    ///
    /// When `value` is `None` the guard does nothing on drop.
    pub fn from_option(value: Option<T>, release: F) -> Self {
        Self {
            value,
            release: Some(release),
        }
    }

    /// Borrow the held value, if any.
    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Disarm the guard and return the held value without releasing it.
    ///
    /// # Panics
    /// Panics if the guard was created over `None`.
    pub fn into_inner(mut self) -> T {
        self.release = None;
        self.value.take().expect("guard holds a value")
    }
}

impl<T, F: FnOnce(T)> Drop for ScopeGuard<T, F> {
    fn drop(&mut self) {
        if let (Some(value), Some(release)) = (self.value.take(), self.release.take()) {
            release(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn releases_on_scope_exit() {
        let released = Cell::new(0u32);
        {
            let _guard = ScopeGuard::new(7, |v| {
                assert_eq!(v, 7);
                released.set(released.get() + 1);
            });
        }
        assert_eq!(released.get(), 1);
    }

    #[test]
    fn releases_on_early_return() {
        let released = Cell::new(0u32);
        let run = |fail: bool| -> Result<(), ()> {
            let _guard = ScopeGuard::new((), |()| released.set(released.get() + 1));
            if fail {
                return Err(());
            }
            Ok(())
        };

        assert!(run(true).is_err());
        assert_eq!(released.get(), 1);
        assert!(run(false).is_ok());
        assert_eq!(released.get(), 2);
    }

    #[test]
    fn releases_on_unwind() {
        use std::sync::atomic::{AtomicU32, Ordering};

        static RELEASED: AtomicU32 = AtomicU32::new(0);

        let result = std::panic::catch_unwind(|| {
            let _guard = ScopeGuard::new((), |()| {
                RELEASED.fetch_add(1, Ordering::SeqCst);
            });
            panic!("boom");
        });

        assert!(result.is_err());
        assert_eq!(RELEASED.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn into_inner_disarms() {
        let released = Cell::new(false);
        let value = {
            let guard = ScopeGuard::new(42, |_| released.set(true));
            guard.into_inner()
        };
        assert_eq!(value, 42);
        assert!(!released.get());
    }

    #[test]
    fn absent_value_is_noop() {
        let released = Cell::new(false);
        {
            let guard = ScopeGuard::from_option(None::<u32>, |_| released.set(true));
            assert!(guard.get().is_none());
        }
        assert!(!released.get());
    }

    #[test]
    fn never_double_releases() {
        let released = Cell::new(0u32);
        {
            let guard = ScopeGuard::new(1, |_| released.set(released.get() + 1));
            assert_eq!(guard.get(), Some(&1));
            drop(guard);
        }
        assert_eq!(released.get(), 1);
    }
}
