//! Per-resource rate-limit tracking: header parsing, snapshots, thresholds, and the governor.

pub mod governor;
pub mod headers;
pub mod snapshot;
pub mod status;
pub mod thresholds;

pub use governor::*;
pub use headers::*;
pub use snapshot::*;
pub use status::*;
pub use thresholds::*;
