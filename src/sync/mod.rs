pub mod fork;
pub mod gate;

/// Mutex acquired in a single blocking step and released when its guard drops.
///
/// Implementors decide what "held" means. For a [`crate::table::Seat`] it is
/// both adjacent forks at once, never one of them.
pub trait Mutex: Sized {
    fn acquire(&self) -> MutexGuard<'_, Self>;
    // Only the guard calls this; releasing something not held panics
    fn release(&self);
}

#[must_use = "dropping the guard releases the mutex immediately"]
pub struct MutexGuard<'a, M: Mutex> {
    pub(crate) mutex: &'a M,
}

impl<M: Mutex> Drop for MutexGuard<'_, M> {
    fn drop(&mut self) {
        self.mutex.release()
    }
}
