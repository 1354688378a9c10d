//! The shared sidebar panel controller.
//!
//! Many independent screens need to toggle one shared panel.  Instead of
//! an ambient, globally reachable context, the shell constructs a single
//! [`SidebarController`] and injects a clone into each screen that needs
//! it.  All clones share the same open/closed state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Handle to the sidebar's open/closed state.  Cloning is cheap; every
/// clone controls the same panel.
#[derive(Debug, Clone, Default)]
pub struct SidebarController {
    open: Arc<AtomicBool>,
}

impl SidebarController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self) {
        self.open.store(true, Ordering::SeqCst);
    }

    pub fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
    }

    pub fn toggle(&self) {
        self.open.fetch_xor(true, Ordering::SeqCst);
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let shell_handle = SidebarController::new();
        let screen_handle = shell_handle.clone();

        assert!(!shell_handle.is_open());
        screen_handle.toggle();
        assert!(shell_handle.is_open());
        shell_handle.close();
        assert!(!screen_handle.is_open());
    }

    #[test]
    fn toggle_round_trips() {
        let controller = SidebarController::new();
        controller.toggle();
        controller.toggle();
        assert!(!controller.is_open());
    }
}
