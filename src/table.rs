use std::sync::{Condvar, Mutex, MutexGuard as StdGuard, PoisonError};

use crate::sync::{fork::Fork, gate::Gate, Mutex as PairMutex, MutexGuard};

/// Ring of `n` forks plus the session gate.
///
/// Fork `i` sits between seat `i` (its left fork) and seat `i - 1` (its right
/// fork). Every fork transition made through a [`Seat`] happens while holding
/// `lock`, which is what makes taking both forks a single indivisible step.
pub struct Table {
    forks: Vec<Fork>,
    gate: Gate,
    lock: Mutex<()>,
    freed: Condvar,
}

impl Table {
    pub fn new(n: usize) -> Self {
        assert!(n >= 2, "Expect at least 2 seats, got {n}");
        Self {
            forks: (0..n).map(|_| Fork::new()).collect(),
            gate: Gate::new(),
            lock: Mutex::new(()),
            freed: Condvar::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.forks.len()
    }

    /// Fork `i` as seen from outside any seat. Its transitions take the same
    /// lock as seats do, so a seat waiting on it is woken when it is released.
    pub fn fork(&self, i: usize) -> TableFork<'_> {
        assert!(i < self.len(), "Expect fork {i} < {}", self.len());
        TableFork {
            table: self,
            index: i,
        }
    }

    pub fn gate(&self) -> &Gate {
        &self.gate
    }

    pub fn seat(&self, i: usize) -> Seat<'_> {
        assert!(i < self.len(), "Expect seat {i} < {}", self.len());
        Seat {
            table: self,
            index: i,
            left: i,
            right: (i + 1) % self.len(),
        }
    }

    /// Holder of every fork, read in one critical section so that no pair
    /// transition can be observed half done.
    pub fn holders(&self) -> Vec<Option<usize>> {
        let _guard = self.guard();
        self.forks.iter().map(Fork::holder).collect()
    }

    fn release(&self, fork: usize, owner: usize) {
        let _guard = self.guard();
        self.forks[fork].release(owner);
        self.freed.notify_all();
    }

    fn guard(&self) -> StdGuard<'_, ()> {
        // Guards no data, fork state lives in the atomics
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Single-fork handle into a [`Table`].
pub struct TableFork<'t> {
    table: &'t Table,
    index: usize,
}

impl TableFork<'_> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn try_acquire(&self, owner: usize) -> bool {
        let _guard = self.table.guard();
        self.table.forks[self.index].try_acquire(owner)
    }

    pub fn release(&self, owner: usize) {
        self.table.release(self.index, owner);
    }

    pub fn holder(&self) -> Option<usize> {
        self.table.forks[self.index].holder()
    }
}

/// A diner's place at the table: the pair of forks either side of it.
pub struct Seat<'t> {
    table: &'t Table,
    index: usize,
    left: usize,
    right: usize,
}

impl<'t> Seat<'t> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn forks(&self) -> (usize, usize) {
        (self.left, self.right)
    }

    /// Takes both forks if both are free right now, otherwise takes neither.
    pub fn try_acquire(&self) -> Option<MutexGuard<'_, Self>> {
        let _guard = self.table.guard();
        self.take_both().then(|| MutexGuard { mutex: self })
    }

    fn take_both(&self) -> bool {
        let forks = &self.table.forks;
        let (left, right) = (&forks[self.left], &forks[self.right]);
        if !left.try_acquire(self.index) {
            return false;
        }
        if right.try_acquire(self.index) {
            return true;
        }
        // Still inside the critical section, nobody saw the left fork taken
        left.release(self.index);
        false
    }
}

impl PairMutex for Seat<'_> {
    fn acquire(&self) -> MutexGuard<'_, Self> {
        let mut guard = self.table.guard();
        while !self.take_both() {
            guard = self
                .table
                .freed
                .wait(guard)
                .unwrap_or_else(PoisonError::into_inner);
        }
        MutexGuard { mutex: self }
    }

    fn release(&self) {
        let _guard = self.table.guard();
        self.table.forks[self.left].release(self.index);
        self.table.forks[self.right].release(self.index);
        self.table.freed.notify_all();
    }
}
