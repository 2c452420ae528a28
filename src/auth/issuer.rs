//! RS256 App token issuance and verification for one fixed App identity.

mod metrics;

pub use metrics::IssuanceMetrics;

// crates.io
use jsonwebtoken::{
	Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind,
};
use rsa::{
	RsaPrivateKey, RsaPublicKey, pkcs1::DecodeRsaPrivateKey, pkcs8::DecodePrivateKey,
	traits::PublicKeyParts,
};
// self
use crate::{
	_prelude::*,
	auth::{AppClaims, AppCredential, AppId, SignedToken, peek_claims},
	clock::{Clock, SystemClock},
	error::{ConfigError, SigningError},
	obs::{self, GovernorSpan, Operation, Outcome},
};

/// Default App token lifetime; GitHub refuses anything longer than ten minutes.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::seconds(600);
/// Backdating applied to `iat` so a verifier running slightly behind still accepts the token.
pub const CLOCK_SKEW_ALLOWANCE: Duration = Duration::seconds(60);
/// Default refresh buffer used by [`TokenIssuer::is_expired`].
pub const DEFAULT_EXPIRY_BUFFER: Duration = Duration::seconds(60);

/// Reason a token failed [`TokenIssuer::verify`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum VerificationFailure {
	/// Token is not a decodable RS256 JWS carrying `iat`, `exp`, and `iss`.
	Malformed,
	/// Signature or algorithm does not match the held key.
	BadSignature,
	/// `exp` is at or before now.
	Expired,
	/// `iat` lies further in the future than the skew allowance.
	NotYetValid,
	/// `iss` names a different App.
	IssuerMismatch,
}
impl VerificationFailure {
	/// Returns a stable label suitable for log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Malformed => "malformed",
			Self::BadSignature => "bad_signature",
			Self::Expired => "expired",
			Self::NotYetValid => "not_yet_valid",
			Self::IssuerMismatch => "issuer_mismatch",
		}
	}
}
impl Display for VerificationFailure {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome of [`TokenIssuer::verify`]. Invalid tokens are a value, not an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verification {
	/// Signature and temporal claims check out.
	Valid(AppClaims),
	/// The token must not be trusted.
	Invalid(VerificationFailure),
}
impl Verification {
	/// Returns `true` for [`Verification::Valid`].
	pub fn is_valid(&self) -> bool {
		matches!(self, Self::Valid(_))
	}

	/// Returns the verified claims, if any.
	pub fn claims(&self) -> Option<&AppClaims> {
		match self {
			Self::Valid(claims) => Some(claims),
			Self::Invalid(_) => None,
		}
	}

	/// Returns the failure reason, if any.
	pub fn failure(&self) -> Option<VerificationFailure> {
		match self {
			Self::Valid(_) => None,
			Self::Invalid(reason) => Some(*reason),
		}
	}
}

/// Issues and checks short-lived App tokens.
///
/// Immutable after construction apart from its counters, so one instance can be shared across
/// threads without coordination. Tokens are never cached here; callers own what they request.
pub struct TokenIssuer {
	app_id: AppId,
	encoding_key: EncodingKey,
	decoding_key: DecodingKey,
	validation: Validation,
	clock: Arc<dyn Clock>,
	metrics: IssuanceMetrics,
}
impl TokenIssuer {
	/// Builds an issuer on the wall clock.
	pub fn new(credential: AppCredential) -> Result<Self, ConfigError> {
		Self::with_clock(credential, Arc::new(SystemClock))
	}

	/// Builds an issuer on the provided clock.
	///
	/// The key is parsed and exercised with a probe signature here, so a bad key fails at
	/// configuration time instead of on the first API call.
	pub fn with_clock(
		credential: AppCredential,
		clock: Arc<dyn Clock>,
	) -> Result<Self, ConfigError> {
		let (encoding_key, decoding_key) = probe_key(credential.private_key.expose())?;
		let mut validation = Validation::new(Algorithm::RS256);

		// Temporal and issuer checks run against the injected clock in `verify`.
		validation.required_spec_claims.clear();
		validation.validate_exp = false;
		validation.validate_aud = false;
		validation.leeway = 0;

		Ok(Self {
			app_id: credential.app_id,
			encoding_key,
			decoding_key,
			validation,
			clock,
			metrics: IssuanceMetrics::default(),
		})
	}

	/// Returns `true` if `pem` is an RSA private key in a PEM envelope that can sign RS256.
	pub fn validate_key(pem: &str) -> bool {
		probe_key(pem).is_ok()
	}

	/// App id carried in the `iss` claim.
	pub fn app_id(&self) -> AppId {
		self.app_id
	}

	/// Issuance counters.
	pub fn metrics(&self) -> &IssuanceMetrics {
		&self.metrics
	}

	/// Signs a token valid for [`DEFAULT_TOKEN_TTL`].
	pub fn generate(&self) -> Result<SignedToken, SigningError> {
		self.generate_with_ttl(DEFAULT_TOKEN_TTL)
	}

	/// Signs a token with `iat = now - 60s` and `exp = now + ttl`.
	pub fn generate_with_ttl(&self, ttl: Duration) -> Result<SignedToken, SigningError> {
		let _guard = GovernorSpan::new(Operation::Issue, "generate").entered();

		self.metrics.record_attempt();
		obs::record_operation(Operation::Issue, Outcome::Attempt);

		match self.sign(ttl) {
			Ok(token) => {
				self.metrics.record_success();
				obs::record_operation(Operation::Issue, Outcome::Success);

				Ok(token)
			},
			Err(e) => {
				self.metrics.record_failure();
				obs::record_operation(Operation::Issue, Outcome::Failure);
				obs::log_signing_failure(self.app_id, &e);

				Err(e)
			},
		}
	}

	/// Checks signature, issuer, and temporal claims against the held key and clock.
	pub fn verify(&self, token: impl AsRef<str>) -> Verification {
		let _guard = GovernorSpan::new(Operation::Verify, "verify").entered();
		let verification = self.check(token.as_ref());
		let outcome = if verification.is_valid() { Outcome::Success } else { Outcome::Failure };

		obs::record_operation(Operation::Verify, outcome);

		match &verification {
			Verification::Valid(_) => self.metrics.record_verified(),
			Verification::Invalid(reason) => {
				self.metrics.record_rejected(*reason);
				obs::log_verification_failure(self.app_id, *reason);
			},
		}

		verification
	}

	/// [`Self::is_expired_with_buffer`] with [`DEFAULT_EXPIRY_BUFFER`].
	pub fn is_expired(&self, token: impl AsRef<str>) -> bool {
		self.is_expired_with_buffer(token, DEFAULT_EXPIRY_BUFFER)
	}

	/// Returns `true` if `exp <= now + buffer` or the token cannot be decoded.
	///
	/// The signature is NOT checked; this is a refresh hint, not a trust decision.
	pub fn is_expired_with_buffer(&self, token: impl AsRef<str>, buffer: Duration) -> bool {
		let Some(claims) = peek_claims(token.as_ref()) else {
			return true;
		};
		let now = self.clock.now();
		let horizon = now.checked_add(buffer).map(OffsetDateTime::unix_timestamp).unwrap_or(
			if buffer.is_negative() { i64::MIN } else { i64::MAX },
		);

		claims.exp <= horizon
	}

	/// Raw `exp` claim for diagnostics; `None` if the token cannot be decoded.
	pub fn expiration_time(&self, token: impl AsRef<str>) -> Option<OffsetDateTime> {
		peek_claims(token.as_ref())?.expires_at()
	}

	fn sign(&self, ttl: Duration) -> Result<SignedToken, SigningError> {
		if !ttl.is_positive() {
			return Err(SigningError::InvalidLifetime { ttl });
		}

		let now = self.clock.now();
		let expires_at = now.checked_add(ttl).ok_or(SigningError::InvalidLifetime { ttl })?;
		let claims = AppClaims {
			iat: (now - CLOCK_SKEW_ALLOWANCE).unix_timestamp(),
			exp: expires_at.unix_timestamp(),
			iss: self.app_id.get(),
		};
		let token =
			jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)?;

		Ok(SignedToken::new(token))
	}

	fn check(&self, token: &str) -> Verification {
		let claims = match jsonwebtoken::decode::<AppClaims>(
			token,
			&self.decoding_key,
			&self.validation,
		) {
			Ok(data) => data.claims,
			Err(e) => {
				let reason = match e.kind() {
					ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm =>
						VerificationFailure::BadSignature,
					_ => VerificationFailure::Malformed,
				};

				return Verification::Invalid(reason);
			},
		};

		if claims.iss != self.app_id.get() {
			return Verification::Invalid(VerificationFailure::IssuerMismatch);
		}

		let now = self.clock.now().unix_timestamp();

		if claims.exp <= now {
			return Verification::Invalid(VerificationFailure::Expired);
		}
		if claims.iat > now.saturating_add(CLOCK_SKEW_ALLOWANCE.whole_seconds()) {
			return Verification::Invalid(VerificationFailure::NotYetValid);
		}

		Verification::Valid(claims)
	}
}
impl Debug for TokenIssuer {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenIssuer")
			.field("app_id", &self.app_id)
			.field("signing_key", &"<redacted>")
			.field("metrics", &self.metrics)
			.finish()
	}
}

/// Parses `pem` into an RS256 key pair and proves it can sign.
pub(crate) fn probe_key(pem: &str) -> Result<(EncodingKey, DecodingKey), ConfigError> {
	check_envelope(pem)?;

	let encoding_key = EncodingKey::from_rsa_pem(pem.as_bytes())
		.map_err(|e| ConfigError::invalid_key_from("PEM body is not an RSA key", e))?;
	let private = match RsaPrivateKey::from_pkcs1_pem(pem) {
		Ok(key) => key,
		Err(_) => RsaPrivateKey::from_pkcs8_pem(pem)
			.map_err(|e| ConfigError::invalid_key_from("RSA key could not be decoded", e))?,
	};
	let public = RsaPublicKey::from(&private);
	let decoding_key =
		DecodingKey::from_rsa_raw_components(&public.n().to_bytes_be(), &public.e().to_bytes_be());
	let probe = AppClaims { iat: 0, exp: 0, iss: 0 };

	jsonwebtoken::encode(&Header::new(Algorithm::RS256), &probe, &encoding_key)
		.map_err(|e| ConfigError::invalid_key_from("RSA key cannot sign RS256 payloads", e))?;

	Ok((encoding_key, decoding_key))
}

fn check_envelope(pem: &str) -> Result<(), ConfigError> {
	let trimmed = pem.trim();

	if !trimmed.starts_with("-----BEGIN ") || !trimmed.ends_with("-----") {
		return Err(ConfigError::invalid_key("missing PEM envelope"));
	}

	let Some(label_end) = trimmed["-----BEGIN ".len()..].find("-----") else {
		return Err(ConfigError::invalid_key("missing PEM envelope"));
	};
	let label = &trimmed["-----BEGIN ".len().."-----BEGIN ".len() + label_end];

	match label {
		"RSA PRIVATE KEY" | "PRIVATE KEY" => Ok(()),
		_ => Err(ConfigError::invalid_key(format!("unexpected PEM label `{label}`"))),
	}
}
