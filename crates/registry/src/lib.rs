//! Module registry with delayed, cancelable updates.
//!
//! The registry is the single source of truth for which module is trusted
//! for each protocol key. Updates go through a two-phase workflow with a
//! mandatory 7-day delay and an explicit cancellation path; reads are open
//! to anyone. The registry only discovers modules; it never routes calls.

mod registry;

pub use registry::{ModuleRegistry, UpcomingModule, MODULE_UPDATE_DELAY_SECS};
