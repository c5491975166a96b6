use std::sync::atomic::{AtomicUsize, Ordering};

/// One exclusive-access slot shared by two neighbouring diners.
///
/// The holder is stored as the owner's seat index so that a release by anyone
/// other than the current holder is caught instead of silently freeing the fork.
pub struct Fork {
    holder: AtomicUsize,
}

impl Fork {
    const FREE: usize = usize::MAX;

    pub fn new() -> Self {
        Self {
            holder: AtomicUsize::new(Fork::FREE),
        }
    }

    /// Non-blocking. Ownership is obtained iff this returns true.
    pub fn try_acquire(&self, owner: usize) -> bool {
        assert_ne!(owner, Fork::FREE, "owner id {owner} is reserved");
        self.holder
            .compare_exchange(Fork::FREE, owner, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    pub fn release(&self, owner: usize) {
        if let Err(actual) =
            self.holder
                .compare_exchange(owner, Fork::FREE, Ordering::Release, Ordering::Relaxed)
        {
            match actual {
                Fork::FREE => panic!("owner {owner} released a fork nobody holds"),
                other => panic!("owner {owner} released a fork held by {other}"),
            }
        }
    }

    pub fn holder(&self) -> Option<usize> {
        match self.holder.load(Ordering::Acquire) {
            Fork::FREE => None,
            owner => Some(owner),
        }
    }

    pub fn is_free(&self) -> bool {
        self.holder().is_none()
    }
}

impl Default for Fork {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::sync::fork::Fork;
    use std::sync::{
        atomic::{AtomicI32, Ordering},
        Arc,
    };
    const N_THREADS: usize = 4;
    const WORK: i32 = 100_000;

    #[test]
    fn acquire_then_release() {
        let fork = Fork::new();
        assert!(fork.is_free());
        assert!(fork.try_acquire(3));
        assert_eq!(fork.holder(), Some(3));
        assert!(!fork.try_acquire(3)); // not reentrant
        assert!(!fork.try_acquire(4));
        fork.release(3);
        assert!(fork.is_free());
        assert!(fork.try_acquire(4));
    }

    #[test]
    #[should_panic(expected = "nobody holds")]
    fn release_unheld_panics() {
        Fork::new().release(0);
    }

    #[test]
    #[should_panic(expected = "held by 1")]
    fn release_by_neighbour_panics() {
        let fork = Fork::new();
        assert!(fork.try_acquire(1));
        fork.release(2);
    }

    #[test]
    fn mutual_exclusion() {
        let fork = Arc::new(Fork::new());
        let data = Arc::new(AtomicI32::new(0));
        let ths = (0..N_THREADS)
            .map(|n| {
                let fork = fork.clone();
                let data = data.clone();
                std::thread::spawn(move || {
                    let mut done = 0;
                    while done < WORK {
                        if !fork.try_acquire(n) {
                            std::hint::spin_loop();
                            continue;
                        }
                        // Split load/store only adds up if nobody else is inside
                        let v = data.load(Ordering::Relaxed);
                        data.store(v + 1, Ordering::Relaxed);
                        fork.release(n);
                        done += 1;
                    }
                })
            })
            .collect::<Vec<_>>();
        ths.into_iter().for_each(|th| th.join().unwrap());
        assert_eq!(data.load(Ordering::Relaxed), WORK * N_THREADS as i32);
        assert!(fork.is_free());
    }
}
