//! Warning/critical boundaries that classify remaining quota.

// self
use crate::{_prelude::*, error::ConfigError, rate_limit::ResourceHealth};

/// Remaining-quota boundaries, fixed when the governor is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ThresholdsRepr", into = "ThresholdsRepr")]
pub struct Thresholds {
	warning: i64,
	critical: i64,
}
impl Thresholds {
	/// Default warning boundary.
	pub const DEFAULT_WARNING: i64 = 100;
	/// Default critical boundary.
	pub const DEFAULT_CRITICAL: i64 = 10;

	/// Builds a threshold pair; both must be non-negative with `critical <= warning`.
	pub fn new(warning: i64, critical: i64) -> Result<Self, ConfigError> {
		if critical < 0 || warning < critical {
			return Err(ConfigError::InvalidThresholds { warning, critical });
		}

		Ok(Self { warning, critical })
	}

	/// Remaining quota at or below which a resource is in the warning band.
	pub const fn warning(&self) -> i64 {
		self.warning
	}

	/// Remaining quota at or below which a resource is critical.
	pub const fn critical(&self) -> i64 {
		self.critical
	}

	/// Classifies `remaining`: exhausted, then critical, then warning, then healthy.
	pub const fn classify(&self, remaining: i64) -> ResourceHealth {
		if remaining <= 0 {
			ResourceHealth::RateLimited
		} else if remaining <= self.critical {
			ResourceHealth::Critical
		} else if remaining <= self.warning {
			ResourceHealth::Warning
		} else {
			ResourceHealth::Healthy
		}
	}
}
impl Default for Thresholds {
	fn default() -> Self {
		Self { warning: Self::DEFAULT_WARNING, critical: Self::DEFAULT_CRITICAL }
	}
}

#[derive(Serialize, Deserialize)]
#[serde(default)]
struct ThresholdsRepr {
	warning: i64,
	critical: i64,
}
impl Default for ThresholdsRepr {
	fn default() -> Self {
		let defaults = Thresholds::default();

		Self { warning: defaults.warning, critical: defaults.critical }
	}
}
impl TryFrom<ThresholdsRepr> for Thresholds {
	type Error = ConfigError;

	fn try_from(value: ThresholdsRepr) -> Result<Self, Self::Error> {
		Self::new(value.warning, value.critical)
	}
}
impl From<Thresholds> for ThresholdsRepr {
	fn from(value: Thresholds) -> Self {
		Self { warning: value.warning, critical: value.critical }
	}
}
