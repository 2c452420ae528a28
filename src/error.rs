//! Governor-level error types shared by token issuance and configuration.

// self
use crate::_prelude::*;

/// Governor-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical governor error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Token issuance failure.
	#[error(transparent)]
	Signing(#[from] SigningError),
}

/// Configuration and validation failures raised before any token is issued.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// GitHub App identifiers are positive integers.
	#[error("GitHub App id must be non-zero.")]
	InvalidAppId,
	/// Private key is not an RSA key in a PEM envelope usable for RS256.
	#[error("Private key is not a usable RS256 signing key: {reason}.")]
	InvalidPrivateKey {
		/// Short description of the failed check.
		reason: String,
		/// Underlying parser or signer failure, when one exists.
		#[source]
		source: Option<BoxError>,
	},
	/// Threshold pair is out of order or negative.
	#[error("Thresholds are invalid: warning={warning}, critical={critical}.")]
	InvalidThresholds {
		/// Warning threshold that was supplied.
		warning: i64,
		/// Critical threshold that was supplied.
		critical: i64,
	},
	/// Required environment variable is absent.
	#[error("Environment variable `{name}` is not set.")]
	MissingVariable {
		/// Variable name.
		name: &'static str,
	},
	/// Environment variable holds a value that cannot be parsed.
	#[error("Environment variable `{name}` has an invalid value: {value}.")]
	InvalidVariable {
		/// Variable name.
		name: &'static str,
		/// Offending value.
		value: String,
	},
}
impl ConfigError {
	/// Builds an [`ConfigError::InvalidPrivateKey`] without an underlying cause.
	pub fn invalid_key(reason: impl Into<String>) -> Self {
		Self::InvalidPrivateKey { reason: reason.into(), source: None }
	}

	/// Wraps a key parsing failure inside [`ConfigError::InvalidPrivateKey`].
	pub fn invalid_key_from(
		reason: impl Into<String>,
		src: impl 'static + Send + Sync + StdError,
	) -> Self {
		Self::InvalidPrivateKey { reason: reason.into(), source: Some(Box::new(src)) }
	}
}

/// Token issuance failures; fatal for the call that triggered them.
#[derive(Debug, ThisError)]
pub enum SigningError {
	/// Requested lifetime would produce a token that is already expired.
	#[error("Token lifetime must be positive, got {ttl}.")]
	InvalidLifetime {
		/// Lifetime that was requested.
		ttl: Duration,
	},
	/// The signing primitive rejected the payload or key.
	#[error("Signing the App token failed.")]
	Sign {
		/// Underlying signer failure.
		#[source]
		source: jsonwebtoken::errors::Error,
	},
}
impl From<jsonwebtoken::errors::Error> for SigningError {
	fn from(e: jsonwebtoken::errors::Error) -> Self {
		Self::Sign { source: e }
	}
}
