//! Dashboard assembly
//!
//! Everything a dashboard page renders, computed in one synchronous pass
//! over the loaded club data. Loaded data is held in an explicit
//! [`DataCache`] with manual invalidation; once-per-viewer effects are
//! tracked by [`SessionFlags`].

pub mod data;
pub mod session;
pub mod snapshot;

pub use data::{ClubData, DataCache, DataSource, FileDataSource};
pub use session::{SessionFlags, SessionId, NEW_RUNNER_WELCOMED};
pub use snapshot::{DashboardSnapshot, DataQuality, FeatureOutcome, RunnerProfile};
