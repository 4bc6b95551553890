//! Single in-flight classification lock.

use std::sync::atomic::{AtomicBool, Ordering};

/// Allows at most one classification at a time. A second caller is turned
/// away rather than queued.
#[derive(Debug, Default)]
pub struct ClassifyGate {
    busy: AtomicBool,
}

impl ClassifyGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the gate, or returns `None` if a classification is already running.
    pub fn try_acquire(&self) -> Option<ClassifyPermit<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| ClassifyPermit { gate: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Relaxed)
    }
}

/// Releases the gate when dropped.
#[derive(Debug)]
pub struct ClassifyPermit<'a> {
    gate: &'a ClassifyGate,
}

impl Drop for ClassifyPermit<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn second_acquire_fails_until_release() {
        let gate = ClassifyGate::new();
        let permit = gate.try_acquire().expect("first acquire");
        assert!(gate.is_busy());
        assert!(gate.try_acquire().is_none());
        drop(permit);
        assert!(!gate.is_busy());
        assert!(gate.try_acquire().is_some());
    }

    #[test]
    fn only_one_thread_wins() {
        let gate = Arc::new(ClassifyGate::new());
        let held = gate.try_acquire().unwrap();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let gate = Arc::clone(&gate);
                std::thread::spawn(move || gate.try_acquire().is_some())
            })
            .collect();
        for h in handles {
            assert!(!h.join().unwrap());
        }
        drop(held);
    }
}
