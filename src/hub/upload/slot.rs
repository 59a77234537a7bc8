use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Idle,
    Busy,
}

/// Room for exactly one upload at a time. Occupied while a [`SlotGuard`]
/// is alive.
#[derive(Debug, Clone, Default)]
pub struct UploadSlot {
    busy: Arc<AtomicBool>,
}
impl UploadSlot {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn state(&self) -> SlotState {
        if self.busy.load(Ordering::SeqCst) {
            SlotState::Busy
        } else {
            SlotState::Idle
        }
    }
    pub fn try_acquire(&self) -> Option<SlotGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| SlotGuard {
                busy: self.busy.clone(),
            })
    }
}

#[derive(Debug)]
pub struct SlotGuard {
    busy: Arc<AtomicBool>,
}
impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::panic;

    #[test]
    fn single_holder() {
        let slot = UploadSlot::new();
        let guard = slot.try_acquire().unwrap();
        assert_eq!(slot.state(), SlotState::Busy);
        assert!(slot.clone().try_acquire().is_none());
        drop(guard);
        assert_eq!(slot.state(), SlotState::Idle);
        assert!(slot.try_acquire().is_some());
        assert_eq!(slot.state(), SlotState::Idle);
    }

    #[test]
    fn released_on_panic() {
        let slot = UploadSlot::new();
        let guard = slot.try_acquire().unwrap();
        let result = panic::catch_unwind(panic::AssertUnwindSafe(move || {
            let _guard = guard;
            panic!("upload blew up");
        }));
        assert!(result.is_err());
        assert_eq!(slot.state(), SlotState::Idle);
    }
}
