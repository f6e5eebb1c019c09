//! Club data module
//!
//! Provides meets, attendance records, the runner registry and badge tiers.

pub mod registry;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use registry::{BadgeTable, LookupError, RegistryEntry, RunnerRegistry};
pub use store::AttendanceStore;
pub use types::*;
