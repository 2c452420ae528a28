//! Process-level configuration: App identity plus rate-limit thresholds.

// self
use crate::{
	_prelude::*,
	auth::{AppCredential, AppId, PrivateKeyPem, TokenIssuer},
	clock::Clock,
	error::ConfigError,
	rate_limit::{RateLimitGovernor, Thresholds},
};

/// Environment variable holding the numeric App id.
pub const APP_ID_VAR: &str = "GITHUB_APP_ID";
/// Environment variable holding the PEM private key.
pub const PRIVATE_KEY_VAR: &str = "GITHUB_APP_PRIVATE_KEY";
/// Optional environment variable overriding the warning threshold.
pub const WARNING_THRESHOLD_VAR: &str = "GITHUB_RATE_LIMIT_WARNING";
/// Optional environment variable overriding the critical threshold.
pub const CRITICAL_THRESHOLD_VAR: &str = "GITHUB_RATE_LIMIT_CRITICAL";

/// Everything needed to build a [`TokenIssuer`] and a [`RateLimitGovernor`].
#[derive(Clone, Debug, Deserialize)]
pub struct GovernorConfig {
	/// GitHub App id.
	pub app_id: AppId,
	/// PEM private key for the App.
	pub private_key: PrivateKeyPem,
	/// Warning/critical boundaries (defaults 100/10).
	#[serde(default)]
	pub thresholds: Thresholds,
}
impl GovernorConfig {
	/// Creates a config with default thresholds.
	pub fn new(app_id: AppId, private_key: impl Into<PrivateKeyPem>) -> Self {
		Self { app_id, private_key: private_key.into(), thresholds: Thresholds::default() }
	}

	/// Overrides the thresholds.
	pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
		self.thresholds = thresholds;

		self
	}

	/// Reads the config from the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Reads the config through `lookup`, which maps a variable name to its value.
	///
	/// Literal `\n` sequences in the private key are turned into newlines, since keys are often
	/// stored single-line in secret managers.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let app_id = require(&lookup, APP_ID_VAR)?;
		let app_id = app_id
			.parse::<AppId>()
			.map_err(|_| ConfigError::InvalidVariable { name: APP_ID_VAR, value: app_id })?;
		let private_key =
			PrivateKeyPem::new(require(&lookup, PRIVATE_KEY_VAR)?.replace("\\n", "\n"));
		let warning =
			parse_threshold(&lookup, WARNING_THRESHOLD_VAR, Thresholds::DEFAULT_WARNING)?;
		let critical =
			parse_threshold(&lookup, CRITICAL_THRESHOLD_VAR, Thresholds::DEFAULT_CRITICAL)?;

		Ok(Self { app_id, private_key, thresholds: Thresholds::new(warning, critical)? })
	}

	/// Checks the private key can sign RS256 payloads.
	pub fn validate(&self) -> Result<(), ConfigError> {
		crate::auth::issuer::probe_key(self.private_key.expose()).map(|_| ())
	}

	/// Builds both components on the provided clock.
	pub fn build(
		&self,
		clock: Arc<dyn Clock>,
	) -> Result<(TokenIssuer, RateLimitGovernor), ConfigError> {
		let credential = AppCredential::new(self.app_id, self.private_key.clone());
		let issuer = TokenIssuer::with_clock(credential, clock.clone())?;
		let governor = RateLimitGovernor::with_clock(self.thresholds, clock);

		Ok((issuer, governor))
	}
}

fn require<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
	F: Fn(&str) -> Option<String>,
{
	lookup(name).ok_or(ConfigError::MissingVariable { name })
}

fn parse_threshold<F>(lookup: &F, name: &'static str, default: i64) -> Result<i64, ConfigError>
where
	F: Fn(&str) -> Option<String>,
{
	match lookup(name) {
		None => Ok(default),
		Some(value) =>
			value.trim().parse().map_err(|_| ConfigError::InvalidVariable { name, value }),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{_preludet::APP_KEY_PEM as APP_KEY, clock::SystemClock};

	fn env(pairs: &[(&'static str, String)]) -> impl Fn(&str) -> Option<String> {
		let map = pairs.iter().cloned().collect::<HashMap<_, _>>();

		move |name: &str| map.get(name).cloned()
	}

	#[test]
	fn lookup_reads_identity_and_thresholds() {
		let escaped = APP_KEY.trim_end().replace('\n', "\\n");
		let config = GovernorConfig::from_lookup(env(&[
			(APP_ID_VAR, "4242".into()),
			(PRIVATE_KEY_VAR, escaped),
			(WARNING_THRESHOLD_VAR, "250".into()),
		]))
		.expect("Complete environment should load.");

		assert_eq!(config.app_id.get(), 4242);
		assert_eq!(config.thresholds.warning(), 250);
		assert_eq!(config.thresholds.critical(), Thresholds::DEFAULT_CRITICAL);
		assert!(config.private_key.expose().contains("\n"));

		config.validate().expect("Unescaped fixture key should validate.");

		let (issuer, governor) =
			config.build(Arc::new(SystemClock)).expect("Valid config should build.");

		assert_eq!(issuer.app_id().get(), 4242);
		assert_eq!(governor.thresholds().warning(), 250);
	}

	#[test]
	fn lookup_reports_missing_and_invalid_values() {
		assert!(matches!(
			GovernorConfig::from_lookup(env(&[])),
			Err(ConfigError::MissingVariable { name: APP_ID_VAR })
		));
		assert!(matches!(
			GovernorConfig::from_lookup(env(&[(APP_ID_VAR, "7".into())])),
			Err(ConfigError::MissingVariable { name: PRIVATE_KEY_VAR })
		));
		assert!(matches!(
			GovernorConfig::from_lookup(env(&[
				(APP_ID_VAR, "seven".into()),
				(PRIVATE_KEY_VAR, APP_KEY.into())
			])),
			Err(ConfigError::InvalidVariable { name: APP_ID_VAR, .. })
		));
		assert!(matches!(
			GovernorConfig::from_lookup(env(&[
				(APP_ID_VAR, "7".into()),
				(PRIVATE_KEY_VAR, APP_KEY.into()),
				(CRITICAL_THRESHOLD_VAR, "500".into()),
			])),
			Err(ConfigError::InvalidThresholds { warning: 100, critical: 500 })
		));
	}

	#[test]
	fn deserializes_with_default_thresholds() {
		let payload = serde_json::json!({ "app_id": 99, "private_key": APP_KEY });
		let config: GovernorConfig =
			serde_json::from_value(payload).expect("Config JSON should deserialize.");

		assert_eq!(config.thresholds, Thresholds::default());
		assert!(format!("{config:?}").contains("<redacted>"));
	}

	#[test]
	fn validation_rejects_unusable_keys() {
		let config = GovernorConfig::new(AppId::new(1).expect("Fixture App id."), "not a key");

		assert!(matches!(config.validate(), Err(ConfigError::InvalidPrivateKey { .. })));
		assert!(config.build(Arc::new(SystemClock)).is_err());
	}
}
