//! Per-resource quota store that turns response headers into admission advice.

// self
use crate::{
	_prelude::*,
	clock::{Clock, SystemClock},
	ext::{AdmissionContext, AdmissionDecision, AdmissionPolicy, RetryDirective},
	obs::{self, GovernorSpan, Operation, Outcome},
	rate_limit::{
		DEFAULT_RESOURCE, GlobalStatus, HeaderLookup, RESOURCE_HEADER, RateLimitSnapshot,
		ResourceStatus, Thresholds,
	},
};

/// Batch cap used when callers have no preference of their own.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 100;

type SnapshotMap = Arc<RwLock<HashMap<String, RateLimitSnapshot>>>;

/// Tracks the latest quota snapshot per resource and derives backpressure signals.
///
/// Clones share the same store, so one governor built at startup can be handed to every
/// caller. Snapshots are replaced whole under the write lock and read under the read lock;
/// a reader never sees half of an update. Nothing here blocks or sleeps: waits are returned
/// as durations for the caller to act on.
///
/// Resources without a snapshot are treated optimistically: not limited, no wait, healthy,
/// and the full requested batch size.
#[derive(Clone)]
pub struct RateLimitGovernor {
	thresholds: Thresholds,
	clock: Arc<dyn Clock>,
	snapshots: SnapshotMap,
}
impl RateLimitGovernor {
	/// Builds a governor on the wall clock.
	pub fn new(thresholds: Thresholds) -> Self {
		Self::with_clock(thresholds, Arc::new(SystemClock))
	}

	/// Builds a governor on the provided clock.
	pub fn with_clock(thresholds: Thresholds, clock: Arc<dyn Clock>) -> Self {
		Self { thresholds, clock, snapshots: Default::default() }
	}

	/// Thresholds fixed at construction.
	pub fn thresholds(&self) -> Thresholds {
		self.thresholds
	}

	/// Parses `headers` into a snapshot for `resource`, stores it, and returns it.
	pub fn update_rate_limit<H>(&self, resource: &str, headers: &H) -> RateLimitSnapshot
	where
		H: ?Sized + HeaderLookup,
	{
		let _guard = GovernorSpan::new(Operation::Update, "update_rate_limit").entered();
		let snapshot = RateLimitSnapshot::from_headers(resource, headers, self.clock.now());

		self.record(snapshot.clone());

		snapshot
	}

	/// Like [`Self::update_rate_limit`], keyed by the response's `x-ratelimit-resource` header.
	pub fn update_from_response<H>(&self, headers: &H) -> RateLimitSnapshot
	where
		H: ?Sized + HeaderLookup,
	{
		let resource = headers
			.header(RESOURCE_HEADER)
			.map(str::trim)
			.filter(|name| !name.is_empty())
			.unwrap_or(DEFAULT_RESOURCE)
			.to_owned();

		self.update_rate_limit(&resource, headers)
	}

	/// Stores an already parsed snapshot, replacing any previous one for its resource.
	pub fn record(&self, snapshot: RateLimitSnapshot) {
		let health = self.thresholds.classify(snapshot.remaining);

		obs::log_snapshot(&snapshot, health);
		obs::record_remaining(&snapshot.resource, snapshot.remaining);

		self.snapshots.write().insert(snapshot.resource.clone(), snapshot);

		obs::record_operation(Operation::Update, Outcome::Success);
	}

	/// Returns a copy of the stored snapshot for `resource`.
	pub fn snapshot(&self, resource: &str) -> Option<RateLimitSnapshot> {
		self.snapshots.read().get(resource).cloned()
	}

	/// Tracked resource keys, sorted.
	pub fn resources(&self) -> Vec<String> {
		let mut keys = self.snapshots.read().keys().cloned().collect::<Vec<_>>();

		keys.sort_unstable();

		keys
	}

	/// Returns `true` if a snapshot exists and no requests remain.
	pub fn is_rate_limited(&self, resource: &str) -> bool {
		self.inspect(resource, RateLimitSnapshot::is_exhausted).unwrap_or(false)
	}

	/// Time until `resource` resets; zero when unknown or already reset.
	pub fn time_until_reset(&self, resource: &str) -> Duration {
		let now = self.clock.now();

		self.inspect(resource, |s| s.time_until_reset(now)).unwrap_or(Duration::ZERO)
	}

	/// [`Self::should_wait_for`] with a minimum of one remaining request.
	pub fn should_wait(&self, resource: &str) -> bool {
		self.should_wait_for(resource, 1)
	}

	/// Returns `true` if a snapshot exists with fewer than `minimum_remaining` requests left.
	pub fn should_wait_for(&self, resource: &str, minimum_remaining: i64) -> bool {
		self.inspect(resource, |s| s.remaining < minimum_remaining).unwrap_or(false)
	}

	/// Time to wait before calling `resource` again; zero unless it is rate limited.
	pub fn wait_time(&self, resource: &str) -> Duration {
		let now = self.clock.now();

		self.inspect(resource, |s| Self::wait_for(s, now)).unwrap_or(Duration::ZERO)
	}

	/// Percentage of the window spent; zero when unknown or the limit is zero.
	pub fn percentage_used(&self, resource: &str) -> f64 {
		self.inspect(resource, RateLimitSnapshot::percentage_used).unwrap_or(0.)
	}

	/// Returns `true` if `resource` is at or below the warning threshold.
	pub fn is_near_limit(&self, resource: &str) -> bool {
		self.is_near_limit_with(resource, self.thresholds.warning())
	}

	/// Returns `true` if a snapshot exists with at most `threshold` requests left.
	pub fn is_near_limit_with(&self, resource: &str, threshold: i64) -> bool {
		self.inspect(resource, |s| s.remaining <= threshold).unwrap_or(false)
	}

	/// Returns `true` if `resource` is at or below the critical threshold.
	pub fn is_critical(&self, resource: &str) -> bool {
		self.is_near_limit_with(resource, self.thresholds.critical())
	}

	/// Largest batch that keeps the critical threshold in reserve, capped at `max_batch_size`.
	///
	/// Unknown resources get `max_batch_size` unchanged.
	pub fn optimal_batch_size(&self, resource: &str, max_batch_size: usize) -> usize {
		let reserve = self.thresholds.critical();

		self.inspect(resource, |s| s.batch_headroom(reserve, max_batch_size))
			.unwrap_or(max_batch_size)
	}

	/// Health report for `resource`.
	pub fn resource_status(&self, resource: &str) -> ResourceStatus {
		let now = self.clock.now();

		self.inspect(resource, |s| {
			let health = self.thresholds.classify(s.remaining);

			ResourceStatus::observed(s, health, Self::wait_for(s, now))
		})
		.unwrap_or_else(|| ResourceStatus::unknown(resource))
	}

	/// Drops every snapshot whose reset instant has been reached; returns how many were dropped.
	pub fn clear_expired(&self) -> usize {
		let _guard = GovernorSpan::new(Operation::Cleanup, "clear_expired").entered();
		let now = self.clock.now();
		let removed = {
			let mut guard = self.snapshots.write();
			let before = guard.len();

			guard.retain(|_, snapshot| snapshot.reset_at > now);

			before - guard.len()
		};

		obs::log_cleanup(removed);
		obs::record_operation(Operation::Cleanup, Outcome::Success);

		removed
	}

	/// Health counts across every tracked resource, taken from one consistent view.
	pub fn global_status(&self) -> GlobalStatus {
		let guard = self.snapshots.read();

		guard.values().fold(GlobalStatus::default(), |mut status, snapshot| {
			status.tally(self.thresholds.classify(snapshot.remaining));

			status
		})
	}

	fn inspect<T>(&self, resource: &str, f: impl FnOnce(&RateLimitSnapshot) -> T) -> Option<T> {
		self.snapshots.read().get(resource).map(f)
	}

	fn wait_for(snapshot: &RateLimitSnapshot, now: OffsetDateTime) -> Duration {
		if snapshot.is_exhausted() { snapshot.time_until_reset(now) } else { Duration::ZERO }
	}
}
impl AdmissionPolicy for RateLimitGovernor {
	fn evaluate(&self, context: &AdmissionContext) -> AdmissionDecision {
		let now = self.clock.now();
		let Some(snapshot) = self.snapshot(&context.resource) else {
			return AdmissionDecision::Allow;
		};
		let backoff = snapshot.time_until_reset(now);

		// A window that already reset carries stale counters; let the call refresh them.
		if snapshot.remaining < context.minimum_remaining && backoff.is_positive() {
			let health = self.thresholds.classify(snapshot.remaining);
			let directive = RetryDirective::new(now + backoff, backoff).with_reason(format!(
				"{} is {health} with {} requests left; {} needs {}.",
				snapshot.resource, snapshot.remaining, context.operation, context.minimum_remaining
			));

			return AdmissionDecision::Delay(directive);
		}
		if let Some(requested) = context.batch_size {
			let batch_size = snapshot.batch_headroom(self.thresholds.critical(), requested);

			if batch_size < requested {
				return AdmissionDecision::Shrink { batch_size };
			}
		}

		AdmissionDecision::Allow
	}
}
impl Debug for RateLimitGovernor {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RateLimitGovernor")
			.field("thresholds", &self.thresholds)
			.field("resources", &self.snapshots.read().len())
			.finish()
	}
}
