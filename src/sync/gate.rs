use std::sync::{
    atomic::{AtomicU8, Ordering},
    Condvar, Mutex, PoisonError,
};

/// The table's `active` flag together with the barrier diners wait on before
/// the session starts.
///
/// Moves `Pending -> Open -> Closed` exactly once each. Reads of the flag are
/// lock-free; transitions happen under `lock` so a waiter cannot miss one.
pub struct Gate {
    state: AtomicU8,
    lock: Mutex<()>,
    changed: Condvar,
}

impl Gate {
    const PENDING: u8 = 0;
    const OPEN: u8 = 1;
    const CLOSED: u8 = 2;

    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(Gate::PENDING),
            lock: Mutex::new(()),
            changed: Condvar::new(),
        }
    }

    pub fn open(&self) {
        self.transition(Gate::PENDING, Gate::OPEN, "open");
    }

    pub fn close(&self) {
        self.transition(Gate::OPEN, Gate::CLOSED, "close");
    }

    pub fn is_active(&self) -> bool {
        self.state.load(Ordering::Acquire) == Gate::OPEN
    }

    /// Blocks until the gate has left `Pending`.
    ///
    /// Returns `false` when the session was already closed by the time the
    /// caller woke up; such a caller never saw `active == true`.
    pub fn wait_open(&self) -> bool {
        let mut guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        while self.state.load(Ordering::Acquire) == Gate::PENDING {
            guard = self
                .changed
                .wait(guard)
                .unwrap_or_else(PoisonError::into_inner);
        }
        self.is_active()
    }

    fn transition(&self, from: u8, to: u8, what: &str) {
        // Guards no data, so a poisoned lock is still usable
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(actual) =
            self.state
                .compare_exchange(from, to, Ordering::AcqRel, Ordering::Acquire)
        {
            panic!("cannot {what} gate in state {actual}");
        }
        self.changed.notify_all();
    }
}

impl Default for Gate {
    fn default() -> Self {
        Self::new()
    }
}
