//! Registration of outside-interaction listeners.
//!
//! Each mounted search control listens for pointer presses anywhere in the window so
//! it can close its dropdown when the press lands outside its bounds. The registry
//! hands out a [`ListenerGuard`] per registration; dropping the guard unregisters,
//! so a control that is unmounted (or dropped) can never leak its listener.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

/// Identifies one search control instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ControlId(pub u32);

type Registrations = BTreeMap<ControlId, usize>;

/// Shared table of active outside-interaction listeners.
///
/// Cloning the registry yields another handle to the same table.
#[derive(Debug, Clone, Default)]
pub struct ListenerRegistry {
    inner: Rc<RefCell<Registrations>>,
}

impl ListenerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener for `control`, active until the guard is dropped.
    #[must_use = "dropping the guard unregisters the listener immediately"]
    pub fn register(&self, control: ControlId) -> ListenerGuard {
        *self.inner.borrow_mut().entry(control).or_insert(0) += 1;
        tracing::debug!(control = control.0, "outside-interaction listener registered");
        ListenerGuard {
            control,
            registry: Rc::downgrade(&self.inner),
        }
    }

    /// Number of live registrations for `control`.
    #[must_use]
    pub fn registrations(&self, control: ControlId) -> usize {
        self.inner.borrow().get(&control).copied().unwrap_or(0)
    }

    /// Number of live registrations across all controls.
    #[must_use]
    pub fn total(&self) -> usize {
        self.inner.borrow().values().sum()
    }
}

/// Keeps one listener registered for as long as it lives.
#[derive(Debug)]
pub struct ListenerGuard {
    control: ControlId,
    registry: Weak<RefCell<Registrations>>,
}

impl ListenerGuard {
    #[must_use]
    pub const fn control(&self) -> ControlId {
        self.control
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let mut registrations = registry.borrow_mut();
        if let Some(count) = registrations.get_mut(&self.control) {
            *count -= 1;
            if *count == 0 {
                registrations.remove(&self.control);
            }
        }
        tracing::debug!(control = self.control.0, "outside-interaction listener removed");
    }
}
