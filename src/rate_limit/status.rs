//! Health classification and human-readable status reports.

// self
use crate::{_prelude::*, rate_limit::RateLimitSnapshot};

/// Health band of a resource, from best to worst.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceHealth {
	/// Comfortably above the warning threshold, or no data yet.
	Healthy,
	/// At or below the warning threshold.
	Warning,
	/// At or below the critical threshold.
	Critical,
	/// No requests remain until the window resets.
	RateLimited,
}
impl ResourceHealth {
	/// Returns a stable label suitable for log fields and reports.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Healthy => "healthy",
			Self::Warning => "warning",
			Self::Critical => "critical",
			Self::RateLimited => "rate_limited",
		}
	}
}
impl Display for ResourceHealth {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Status report for one resource.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResourceStatus {
	/// Resource key the report describes.
	pub resource: String,
	/// Health band.
	pub health: ResourceHealth,
	/// Operator-facing summary.
	pub message: String,
	/// Remaining requests; `None` when nothing has been observed yet.
	pub remaining: Option<i64>,
	/// Wait until reset, rendered for humans.
	pub reset_in: String,
}
impl ResourceStatus {
	pub(crate) fn unknown(resource: &str) -> Self {
		Self {
			resource: resource.to_owned(),
			health: ResourceHealth::Healthy,
			message: format!("No rate limit data for {resource}."),
			remaining: None,
			reset_in: describe_wait(Duration::ZERO),
		}
	}

	pub(crate) fn observed(
		snapshot: &RateLimitSnapshot,
		health: ResourceHealth,
		wait: Duration,
	) -> Self {
		let resource = &snapshot.resource;
		let (remaining, limit) = (snapshot.remaining, snapshot.limit);
		let reset_in = describe_wait(wait);
		let message = match health {
			ResourceHealth::RateLimited =>
				format!("Rate limit exhausted for {resource}; resets in {reset_in}."),
			ResourceHealth::Critical =>
				format!("Rate limit critical for {resource}: {remaining} of {limit} remaining."),
			ResourceHealth::Warning =>
				format!("Rate limit low for {resource}: {remaining} of {limit} remaining."),
			ResourceHealth::Healthy =>
				format!("Rate limit healthy for {resource}: {remaining} of {limit} remaining."),
		};

		Self { resource: resource.clone(), health, message, remaining: Some(remaining), reset_in }
	}
}

/// Aggregate health counts across every tracked resource.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GlobalStatus {
	/// Number of tracked resources.
	pub total_resources: usize,
	/// Resources in the healthy band.
	pub healthy: usize,
	/// Resources in the warning band.
	pub warning: usize,
	/// Resources in the critical band.
	pub critical: usize,
	/// Exhausted resources.
	pub rate_limited: usize,
}
impl GlobalStatus {
	pub(crate) fn tally(&mut self, health: ResourceHealth) {
		self.total_resources += 1;

		match health {
			ResourceHealth::Healthy => self.healthy += 1,
			ResourceHealth::Warning => self.warning += 1,
			ResourceHealth::Critical => self.critical += 1,
			ResourceHealth::RateLimited => self.rate_limited += 1,
		}
	}
}

/// Renders a wait as "N minute(s)", or "H hour(s) M minute(s)" from sixty minutes on.
///
/// Partial minutes round up; a non-positive wait renders as "Not rate limited".
pub fn describe_wait(wait: Duration) -> String {
	if !wait.is_positive() {
		return "Not rate limited".into();
	}

	let seconds = wait.whole_seconds() + i64::from(wait.subsec_nanoseconds() > 0);
	let minutes = (seconds + 59) / 60;

	if minutes < 60 {
		return plural(minutes, "minute");
	}

	let (hours, rest) = (minutes / 60, minutes % 60);

	if rest == 0 {
		plural(hours, "hour")
	} else {
		format!("{} {}", plural(hours, "hour"), plural(rest, "minute"))
	}
}

fn plural(count: i64, unit: &str) -> String {
	if count == 1 { format!("1 {unit}") } else { format!("{count} {unit}s") }
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn wait_descriptions_round_up_and_split_hours() {
		assert_eq!(describe_wait(Duration::ZERO), "Not rate limited");
		assert_eq!(describe_wait(Duration::seconds(-5)), "Not rate limited");
		assert_eq!(describe_wait(Duration::seconds(1)), "1 minute");
		assert_eq!(describe_wait(Duration::seconds(61)), "2 minutes");
		assert_eq!(describe_wait(Duration::minutes(59)), "59 minutes");
		assert_eq!(describe_wait(Duration::minutes(60)), "1 hour");
		assert_eq!(describe_wait(Duration::minutes(61)), "1 hour 1 minute");
		assert_eq!(describe_wait(Duration::minutes(150)), "2 hours 30 minutes");
	}

	#[test]
	fn tally_counts_each_band() {
		let mut status = GlobalStatus::default();

		for health in [
			ResourceHealth::Healthy,
			ResourceHealth::Healthy,
			ResourceHealth::Critical,
			ResourceHealth::RateLimited,
		] {
			status.tally(health);
		}

		assert_eq!(
			status,
			GlobalStatus {
				total_resources: 4,
				healthy: 2,
				warning: 0,
				critical: 1,
				rate_limited: 1,
			}
		);
	}

	#[test]
	fn health_labels_serialize_snake_case() {
		let payload = serde_json::to_string(&ResourceHealth::RateLimited)
			.expect("ResourceHealth should serialize to JSON.");

		assert_eq!(payload, "\"rate_limited\"");
	}
}
