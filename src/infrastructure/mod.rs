//! Infrastructure layer: the collaborators the engine talks to but does not own.
//!
//! - [`history`]: The navigator capability and an in-memory history stack
//! - [`listeners`]: Outside-interaction listener registration with RAII teardown
//! - [`paths`]: Filesystem locations for configuration and trace output

pub mod history;
pub mod listeners;
pub mod paths;

pub use history::{History, HistoryEntry, Navigator};
pub use listeners::{ControlId, ListenerGuard, ListenerRegistry};
pub use paths::{expand_tilde, get_data_dir};
