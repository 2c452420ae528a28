//! Optional observability helpers for issuance and rate-limit tracking.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (default) to emit spans named `github_governor.operation` with the
//!   `operation` and `stage` fields, plus leveled events whenever a rate-limit snapshot is
//!   recorded: `error` once exhausted, `warn` inside the warning or critical band, `debug`
//!   otherwise.
//! - Enable `metrics` to increment the `github_governor_operation_total` counter, labeled by
//!   `operation` + `outcome`, and to publish `github_governor_rate_limit_remaining` per resource.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Governor operations observed by spans and counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
	/// App token signing.
	Issue,
	/// App token verification.
	Verify,
	/// Rate-limit snapshot update.
	Update,
	/// Expired snapshot cleanup.
	Cleanup,
}
impl Operation {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Operation::Issue => "issue",
			Operation::Verify => "verify",
			Operation::Update => "update",
			Operation::Cleanup => "cleanup",
		}
	}
}
impl Display for Operation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure reported back to the caller.
	Failure,
}
impl Outcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Outcome::Attempt => "attempt",
			Outcome::Success => "success",
			Outcome::Failure => "failure",
		}
	}
}
impl Display for Outcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
