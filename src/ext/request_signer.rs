//! Request signing contracts that let executors attach App tokens to arbitrary HTTP clients.

// self
use crate::auth::SignedToken;

/// Describes how to attach a [`SignedToken`] to an outbound request without constraining the
/// HTTP client type.
pub trait RequestSignerExt<Request, Error>
where
	Self: Send + Sync,
{
	/// Consumes the provided request and injects the `Authorization` header.
	fn attach_token(&self, request: Request, token: &SignedToken) -> Result<Request, Error>;
}

/// Signer that sets `Authorization: Bearer <token>` on `reqwest` request builders.
#[cfg(feature = "reqwest")]
#[derive(Clone, Copy, Debug, Default)]
pub struct BearerSigner;
#[cfg(feature = "reqwest")]
impl RequestSignerExt<reqwest::RequestBuilder, std::convert::Infallible> for BearerSigner {
	fn attach_token(
		&self,
		request: reqwest::RequestBuilder,
		token: &SignedToken,
	) -> Result<reqwest::RequestBuilder, std::convert::Infallible> {
		Ok(request.bearer_auth(token.expose()))
	}
}
