//! GitHub App access governor: short-lived App JWT issuance paired with per-resource
//! rate-limit tracking and backpressure advice.
//!
//! The two halves are independent. An executor asks [`auth::TokenIssuer`] for a token
//! (refreshing when [`auth::TokenIssuer::is_expired`] says so), makes the call, feeds the
//! response headers into [`rate_limit::RateLimitGovernor`], and consults the governor before
//! the next call. Neither half performs I/O or sleeps.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod clock;
pub mod config;
pub mod error;
pub mod ext;
pub mod obs;
pub mod rate_limit;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and fixtures for tests; enabled via `cfg(test)` or the `test`
	//! crate feature.

	pub use crate::_prelude::*;

	// crates.io
	use time::macros;
	// self
	use crate::{
		auth::{AppCredential, AppId, TokenIssuer},
		clock::ManualClock,
		rate_limit::{RateLimitGovernor, Thresholds},
	};

	/// PKCS#1 RSA key used as the App key in tests.
	pub const APP_KEY_PEM: &str = include_str!("../tests/fixtures/app_key.pem");
	/// The same key as [`APP_KEY_PEM`], PKCS#8 encoded.
	pub const APP_KEY_PKCS8_PEM: &str = include_str!("../tests/fixtures/app_key_pkcs8.pem");
	/// An unrelated RSA key for signature mismatch tests.
	pub const OTHER_KEY_PEM: &str = include_str!("../tests/fixtures/other_key.pem");
	/// App id paired with [`APP_KEY_PEM`].
	pub const TEST_APP_ID: u64 = 12_345;

	/// Manual clock frozen at 2025-01-01 00:00 UTC.
	pub fn test_clock() -> ManualClock {
		ManualClock::new(macros::datetime!(2025-01-01 00:00 UTC))
	}

	/// Issuer for [`TEST_APP_ID`] signing with `pem` on `clock`.
	pub fn build_test_issuer(pem: &str, clock: &ManualClock) -> TokenIssuer {
		let app_id = AppId::new(TEST_APP_ID).expect("Test App id should be valid.");

		TokenIssuer::with_clock(AppCredential::new(app_id, pem), Arc::new(clock.clone()))
			.expect("Test key should build an issuer.")
	}

	/// Governor with default thresholds on `clock`.
	pub fn build_test_governor(clock: &ManualClock) -> RateLimitGovernor {
		RateLimitGovernor::with_clock(Thresholds::default(), Arc::new(clock.clone()))
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};

	pub use crate::error::Result;
}

pub use jsonwebtoken;
#[cfg(feature = "reqwest")] pub use reqwest;
#[cfg(test)] use tokio as _;
