//! Point-in-time quota state for one resource.

// self
use crate::{
	_prelude::*,
	rate_limit::{
		DEFAULT_LIMIT, HeaderLookup, LIMIT_HEADER, REMAINING_HEADER, RESET_HEADER, USED_HEADER,
	},
};

/// Most recent quota observation for a resource; replaced whole on every update.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitSnapshot {
	/// Resource key (`core`, `search`, `graphql`, ...).
	pub resource: String,
	/// Requests allowed per window.
	pub limit: i64,
	/// Requests left; `<= 0` means exhausted.
	pub remaining: i64,
	/// Requests spent in the window.
	pub used: i64,
	/// Instant the window resets.
	#[serde(with = "time::serde::timestamp")]
	pub reset_at: OffsetDateTime,
	/// Instant the snapshot was recorded.
	#[serde(with = "time::serde::timestamp")]
	pub observed_at: OffsetDateTime,
}
impl RateLimitSnapshot {
	/// Builds a snapshot from response headers.
	///
	/// Missing or non-numeric values never fail: `limit` falls back to [`DEFAULT_LIMIT`], the
	/// other counters to zero, and the reset instant to the unix epoch.
	pub fn from_headers<H>(
		resource: impl Into<String>,
		headers: &H,
		observed_at: OffsetDateTime,
	) -> Self
	where
		H: ?Sized + HeaderLookup,
	{
		let reset_at = headers
			.header_i64(RESET_HEADER)
			.and_then(|secs| OffsetDateTime::from_unix_timestamp(secs).ok())
			.unwrap_or(OffsetDateTime::UNIX_EPOCH);

		Self {
			resource: resource.into(),
			limit: headers.header_i64(LIMIT_HEADER).unwrap_or(DEFAULT_LIMIT),
			remaining: headers.header_i64(REMAINING_HEADER).unwrap_or(0),
			used: headers.header_i64(USED_HEADER).unwrap_or(0),
			reset_at,
			observed_at,
		}
	}

	/// Returns `true` once no requests remain.
	pub fn is_exhausted(&self) -> bool {
		self.remaining <= 0
	}

	/// Time left until the window resets, clamped at zero.
	pub fn time_until_reset(&self, now: OffsetDateTime) -> Duration {
		let delta = self.reset_at - now;

		if delta.is_positive() { delta } else { Duration::ZERO }
	}

	/// Share of the window already spent, in percent; zero when `limit` is zero.
	pub fn percentage_used(&self) -> f64 {
		if self.limit == 0 {
			return 0.;
		}

		self.used as f64 / self.limit as f64 * 100.
	}

	/// Largest batch that still leaves `reserve` requests for other callers, capped at `max`.
	pub fn batch_headroom(&self, reserve: i64, max: usize) -> usize {
		let headroom = self.remaining.saturating_sub(reserve).max(0);

		usize::try_from(headroom).unwrap_or(usize::MAX).min(max)
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn headers_parse_with_defaults() {
		let observed = macros::datetime!(2025-01-01 00:00 UTC);
		let full = RateLimitSnapshot::from_headers(
			"search",
			&[
				(LIMIT_HEADER, "30"),
				(REMAINING_HEADER, "12"),
				(USED_HEADER, "18"),
				(RESET_HEADER, "1735693200"),
			],
			observed,
		);

		assert_eq!(full.limit, 30);
		assert_eq!(full.remaining, 12);
		assert_eq!(full.used, 18);
		assert_eq!(full.reset_at, macros::datetime!(2025-01-01 01:00 UTC));

		let sparse =
			RateLimitSnapshot::from_headers("core", &[(REMAINING_HEADER, "oops")], observed);

		assert_eq!(sparse.limit, DEFAULT_LIMIT);
		assert_eq!(sparse.remaining, 0);
		assert_eq!(sparse.used, 0);
		assert_eq!(sparse.reset_at, OffsetDateTime::UNIX_EPOCH);
		assert!(sparse.is_exhausted());
	}

	#[test]
	fn derived_values_guard_edges() {
		let now = macros::datetime!(2025-01-01 00:00 UTC);
		let mut snapshot = RateLimitSnapshot {
			resource: "core".into(),
			limit: 0,
			remaining: 30,
			used: 7,
			reset_at: now - Duration::minutes(1),
			observed_at: now,
		};

		assert_eq!(snapshot.percentage_used(), 0.);
		assert_eq!(snapshot.time_until_reset(now), Duration::ZERO);
		assert_eq!(snapshot.batch_headroom(10, 100), 20);
		assert_eq!(snapshot.batch_headroom(10, 5), 5);
		assert_eq!(snapshot.batch_headroom(40, 100), 0);

		snapshot.limit = 28;
		snapshot.reset_at = now + Duration::seconds(90);

		assert_eq!(snapshot.percentage_used(), 25.);
		assert_eq!(snapshot.time_until_reset(now), Duration::seconds(90));
	}
}
