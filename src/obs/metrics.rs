// self
use crate::obs::{Operation, Outcome};

/// Records an operation outcome via the global metrics recorder (when enabled).
pub fn record_operation(operation: Operation, outcome: Outcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"github_governor_operation_total",
			"operation" => operation.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (operation, outcome);
	}
}

/// Publishes the latest remaining quota for a resource (when enabled).
pub fn record_remaining(resource: &str, remaining: i64) {
	#[cfg(feature = "metrics")]
	{
		metrics::gauge!("github_governor_rate_limit_remaining", "resource" => resource.to_owned())
			.set(remaining as f64);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (resource, remaining);
	}
}
