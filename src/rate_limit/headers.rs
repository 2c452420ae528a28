//! GitHub rate-limit response headers and the lookup seam used to read them.

// std
use std::hash::BuildHasher;
// self
use crate::_prelude::*;

/// Request quota for the current window.
pub const LIMIT_HEADER: &str = "x-ratelimit-limit";
/// Requests left in the current window.
pub const REMAINING_HEADER: &str = "x-ratelimit-remaining";
/// Requests spent in the current window.
pub const USED_HEADER: &str = "x-ratelimit-used";
/// Window reset instant, in unix seconds.
pub const RESET_HEADER: &str = "x-ratelimit-reset";
/// Bucket the response was counted against.
pub const RESOURCE_HEADER: &str = "x-ratelimit-resource";

/// Quota assumed when a response omits [`LIMIT_HEADER`].
pub const DEFAULT_LIMIT: i64 = 5_000;
/// Resource assumed when a response omits [`RESOURCE_HEADER`].
pub const DEFAULT_RESOURCE: &str = "core";

/// Read-only, case-insensitive view over response headers.
pub trait HeaderLookup {
	/// Returns the value for `name`, matching ASCII case-insensitively.
	fn header(&self, name: &str) -> Option<&str>;

	/// Parses `name` as a signed integer; missing or non-numeric values yield `None`.
	fn header_i64(&self, name: &str) -> Option<i64> {
		self.header(name)?.trim().parse().ok()
	}
}
impl<S> HeaderLookup for HashMap<String, String, S>
where
	S: BuildHasher,
{
	fn header(&self, name: &str) -> Option<&str> {
		self.get(name).or_else(|| find_ignore_case(self.iter(), name)).map(String::as_str)
	}
}
impl HeaderLookup for BTreeMap<String, String> {
	fn header(&self, name: &str) -> Option<&str> {
		self.get(name).or_else(|| find_ignore_case(self.iter(), name)).map(String::as_str)
	}
}
impl HeaderLookup for [(&str, &str)] {
	fn header(&self, name: &str) -> Option<&str> {
		self.iter().find(|(key, _)| key.eq_ignore_ascii_case(name)).map(|(_, value)| *value)
	}
}
impl<const N: usize> HeaderLookup for [(&str, &str); N] {
	fn header(&self, name: &str) -> Option<&str> {
		self.as_slice().header(name)
	}
}
#[cfg(feature = "reqwest")]
impl HeaderLookup for reqwest::header::HeaderMap {
	fn header(&self, name: &str) -> Option<&str> {
		self.get(name)?.to_str().ok()
	}
}

fn find_ignore_case<'a, I>(entries: I, name: &str) -> Option<&'a String>
where
	I: IntoIterator<Item = (&'a String, &'a String)>,
{
	entries.into_iter().find(|(key, _)| key.eq_ignore_ascii_case(name)).map(|(_, value)| value)
}
