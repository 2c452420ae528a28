// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::auth::VerificationFailure;

/// Thread-safe counters for token signing and verification.
#[derive(Debug, Default)]
pub struct IssuanceMetrics {
	attempts: AtomicU64,
	signed: AtomicU64,
	signing_failures: AtomicU64,
	verified: AtomicU64,
	// Indexed by `VerificationFailure as usize`.
	rejected: [AtomicU64; 5],
}
impl IssuanceMetrics {
	/// Returns the total number of signing attempts.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of tokens signed successfully.
	pub fn successes(&self) -> u64 {
		self.signed.load(Ordering::Relaxed)
	}

	/// Returns the number of signing calls that failed.
	pub fn failures(&self) -> u64 {
		self.signing_failures.load(Ordering::Relaxed)
	}

	/// Returns the number of tokens that passed verification.
	pub fn verified(&self) -> u64 {
		self.verified.load(Ordering::Relaxed)
	}

	/// Returns how many tokens were rejected for `reason`.
	pub fn rejected(&self, reason: VerificationFailure) -> u64 {
		self.rejected[reason as usize].load(Ordering::Relaxed)
	}

	/// Returns the number of rejected tokens across every reason.
	pub fn rejected_total(&self) -> u64 {
		self.rejected.iter().map(|counter| counter.load(Ordering::Relaxed)).sum()
	}

	pub(crate) fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_success(&self) {
		self.signed.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.signing_failures.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_verified(&self) {
		self.verified.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_rejected(&self, reason: VerificationFailure) {
		self.rejected[reason as usize].fetch_add(1, Ordering::Relaxed);
	}
}
