//! Counting semaphore with a fixed maximum.

use parking_lot::{Condvar, Mutex};

/// A counting semaphore sized for a fixed number of permits.
///
/// A fresh semaphore starts with all `max` permits available, so a primitive
/// sized for N frames in flight admits N [`wait`](Self::wait) calls before
/// blocking. [`signal`](Self::signal) returns a permit and must pair with an
/// earlier `wait`: signalling past [`max`](Self::max) is a programming error,
/// caught by a `debug_assert!` in debug builds and saturating at `max` in
/// release builds.
pub struct Semaphore {
    permits: Mutex<u32>,
    available: Condvar,
    max: u32,
}

impl Semaphore {
    /// Create a semaphore with `max` permits, all initially available.
    pub fn new(max: u32) -> Self {
        Self {
            permits: Mutex::new(max),
            available: Condvar::new(),
            max,
        }
    }

    /// Block the calling thread until a permit is available, then take it.
    pub fn wait(&self) {
        let mut permits = self.permits.lock();
        while *permits == 0 {
            self.available.wait(&mut permits);
        }
        *permits -= 1;
    }

    /// Return one permit and wake at most one blocked waiter.
    pub fn signal(&self) {
        let mut permits = self.permits.lock();
        debug_assert!(
            *permits < self.max,
            "semaphore signalled past its maximum of {}",
            self.max
        );
        if *permits < self.max {
            *permits += 1;
        }
        drop(permits);
        self.available.notify_one();
    }

    /// The configured maximum permit count.
    pub fn max(&self) -> u32 {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn reports_configured_maximum() {
        let semaphore = Semaphore::new(3);
        assert_eq!(semaphore.max(), 3);
    }

    #[test]
    fn wait_takes_available_permits_without_blocking() {
        let semaphore = Semaphore::new(2);
        semaphore.wait();
        semaphore.wait();
        // Both permits taken; returning one makes wait pass again.
        semaphore.signal();
        semaphore.wait();
    }

    #[test]
    fn signal_wakes_blocked_waiter() {
        let semaphore = Arc::new(Semaphore::new(1));
        semaphore.wait();

        let waiter = {
            let semaphore = Arc::clone(&semaphore);
            std::thread::spawn(move || {
                semaphore.wait();
            })
        };

        // Give the waiter time to block before releasing the permit.
        std::thread::sleep(Duration::from_millis(50));
        semaphore.signal();

        waiter.join().expect("waiter thread completed");
    }

    #[test]
    fn permits_cycle_through_waits_and_signals() {
        let semaphore = Semaphore::new(2);
        for _ in 0..10 {
            semaphore.wait();
            semaphore.signal();
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "signalled past its maximum")]
    fn signalling_past_max_is_a_programming_error() {
        let semaphore = Semaphore::new(1);
        semaphore.signal();
    }
}
