// self
use crate::{
	_prelude::*,
	auth::{AppId, VerificationFailure},
	error::SigningError,
	obs::Operation,
	rate_limit::{RateLimitSnapshot, ResourceHealth},
};

/// A span builder used by governor operations.
#[derive(Clone, Debug)]
pub struct GovernorSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl GovernorSpan {
	/// Creates a new span tagged with the provided operation + stage.
	pub fn new(operation: Operation, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::debug_span!(
				"github_governor.operation",
				operation = operation.as_str(),
				stage
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (operation, stage);

			Self {}
		}
	}

	/// Enters the span for the duration of the returned guard.
	pub fn entered(self) -> GovernorSpanGuard {
		#[cfg(feature = "tracing")]
		{
			GovernorSpanGuard { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			GovernorSpanGuard {}
		}
	}
}

/// RAII guard returned by [`GovernorSpan::entered`].
pub struct GovernorSpanGuard {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::EnteredSpan,
}
impl Debug for GovernorSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("GovernorSpanGuard(..)")
	}
}

/// Emits the leveled record for a freshly stored snapshot.
pub fn log_snapshot(snapshot: &RateLimitSnapshot, health: ResourceHealth) {
	#[cfg(feature = "tracing")]
	{
		let resource = snapshot.resource.as_str();
		let remaining = snapshot.remaining;
		let limit = snapshot.limit;
		let reset_at = snapshot.reset_at.unix_timestamp();

		match health {
			ResourceHealth::RateLimited => tracing::error!(
				resource,
				remaining,
				limit,
				reset_at,
				"GitHub rate limit exhausted."
			),
			ResourceHealth::Critical => tracing::warn!(
				resource,
				remaining,
				limit,
				reset_at,
				"GitHub rate limit critically low."
			),
			ResourceHealth::Warning => tracing::warn!(
				resource,
				remaining,
				limit,
				reset_at,
				"GitHub rate limit approaching."
			),
			ResourceHealth::Healthy =>
				tracing::debug!(resource, remaining, limit, reset_at, "GitHub rate limit updated."),
		}
	}

	#[cfg(not(feature = "tracing"))]
	{
		let _ = (snapshot, health);
	}
}

/// Records how many expired snapshots a cleanup pass dropped.
pub fn log_cleanup(removed: usize) {
	#[cfg(feature = "tracing")]
	{
		if removed > 0 {
			tracing::debug!(removed, "Cleared expired rate-limit snapshots.");
		}
	}

	#[cfg(not(feature = "tracing"))]
	{
		let _ = removed;
	}
}

/// Reports a token that could not be signed.
pub fn log_signing_failure(app_id: AppId, error: &SigningError) {
	#[cfg(feature = "tracing")]
	{
		tracing::error!(app_id = app_id.get(), error = %error, "Failed to sign GitHub App token.");
	}

	#[cfg(not(feature = "tracing"))]
	{
		let _ = (app_id, error);
	}
}

/// Reports a token that failed verification.
pub fn log_verification_failure(app_id: AppId, reason: VerificationFailure) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(app_id = app_id.get(), reason = reason.as_str(), "App token rejected.");
	}

	#[cfg(not(feature = "tracing"))]
	{
		let _ = (app_id, reason);
	}
}
