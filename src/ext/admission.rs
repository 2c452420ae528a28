//! Admission contracts that executors consult before issuing governed API calls.

// self
use crate::_prelude::*;

/// Strategy that inspects quota state before an outbound call is made.
pub trait AdmissionPolicy
where
	Self: Send + Sync,
{
	/// Decides whether the described call should proceed, shrink, or wait.
	fn evaluate(&self, context: &AdmissionContext) -> AdmissionDecision;
}

/// Context shared with an [`AdmissionPolicy`] before an outbound call is made.
#[derive(Clone, Debug)]
pub struct AdmissionContext {
	/// Resource bucket the call will be counted against.
	pub resource: String,
	/// Logical operation being attempted, for logs.
	pub operation: String,
	/// Number of items the caller wants to process in one go, if batching.
	pub batch_size: Option<usize>,
	/// Requests that must remain available for the call to proceed.
	pub minimum_remaining: i64,
}
impl AdmissionContext {
	/// Creates a context for a single call against `resource`.
	pub fn new(resource: impl Into<String>, operation: impl Into<String>) -> Self {
		Self {
			resource: resource.into(),
			operation: operation.into(),
			batch_size: None,
			minimum_remaining: 1,
		}
	}

	/// Requests admission for a batch of `size` items.
	pub fn with_batch_size(mut self, size: usize) -> Self {
		self.batch_size = Some(size);

		self
	}

	/// Overrides the minimum remaining quota (defaults to 1).
	pub fn with_minimum_remaining(mut self, minimum: i64) -> Self {
		self.minimum_remaining = minimum;

		self
	}
}

/// Result emitted by an [`AdmissionPolicy`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AdmissionDecision {
	/// The call may proceed as described.
	Allow,
	/// The batch should be cut down to `batch_size` items; zero defers batch work entirely.
	Shrink {
		/// Largest batch that keeps the reserve intact.
		batch_size: usize,
	},
	/// The call should be delayed.
	Delay(RetryDirective),
}

/// Advises callers when to retry after an [`AdmissionDecision::Delay`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryDirective {
	/// Instant when it is safe to retry.
	pub earliest_retry_at: OffsetDateTime,
	/// Suggested backoff duration.
	pub recommended_backoff: Duration,
	/// Optional descriptive string.
	pub reason: Option<String>,
}
impl RetryDirective {
	/// Creates a new directive with the provided timing metadata.
	pub fn new(earliest_retry_at: OffsetDateTime, recommended_backoff: Duration) -> Self {
		Self { earliest_retry_at, recommended_backoff, reason: None }
	}

	/// Adds a human-readable reason.
	pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
		self.reason = Some(reason.into());

		self
	}
}
