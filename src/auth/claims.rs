//! App token claims and the unverified inspection path.
//!
//! [`peek_claims`] decodes the payload segment without touching the signature. It exists for
//! cheap pre-flight expiry checks only; trust decisions go through
//! [`TokenIssuer::verify`](crate::auth::TokenIssuer::verify).

// crates.io
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
// self
use crate::_prelude::*;

/// Claims carried by every App token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppClaims {
	/// Issued-at (unix seconds), backdated to absorb clock skew.
	pub iat: i64,
	/// Expiry (unix seconds).
	pub exp: i64,
	/// Issuer, the numeric App id.
	pub iss: u64,
}
impl AppClaims {
	/// Issued-at instant, if representable.
	pub fn issued_at(&self) -> Option<OffsetDateTime> {
		OffsetDateTime::from_unix_timestamp(self.iat).ok()
	}

	/// Expiry instant, if representable.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		OffsetDateTime::from_unix_timestamp(self.exp).ok()
	}
}

/// Decodes token claims WITHOUT verifying the signature.
///
/// Returns `None` when the token is not three dot-separated segments, the payload is not
/// base64url, or the JSON does not carry `iat`, `exp`, and `iss`.
pub fn peek_claims(token: &str) -> Option<AppClaims> {
	let mut parts = token.split('.');
	let (Some(_header), Some(payload), Some(_signature), None) =
		(parts.next(), parts.next(), parts.next(), parts.next())
	else {
		return None;
	};
	let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;

	serde_json::from_slice(&bytes).ok()
}
