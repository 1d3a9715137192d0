//! Per-region token cache with skewed validity and explicit refresh.

// self
use crate::{
	_prelude::*,
	auth::{Credential, TokenProvider, TokenSecret},
	error::AuthError,
	obs::{self, QueryKind, QueryOutcome, QuerySpan},
	region::RegionId,
};

/// Snapshot of a cache's token state, safe to log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TokenStatus {
	/// Region the cache serves.
	pub region: RegionId,
	/// Whether a token has ever been obtained.
	pub has_token: bool,
	/// Expiry of the current token, if any.
	#[serde(with = "time::serde::rfc3339::option")]
	pub expires_at: Option<OffsetDateTime>,
	/// Whether the token is usable right now (skew applied).
	pub valid: bool,
}

/// Holds one region's [`Credential`] and refreshes its token through a [`TokenProvider`].
///
/// A token is valid while `now < expires_at - skew`. The cache is not internally synchronized;
/// `&mut self` on [`get_token`](Self::get_token) means callers sharing a cache across tasks must
/// wrap it in a lock, which [`RegionalFacade`](crate::facade::RegionalFacade) does.
pub struct TokenCache {
	credential: Credential,
	provider: Box<dyn TokenProvider>,
	skew: Duration,
	closed: bool,
}
impl TokenCache {
	/// Creates a cache using the provider's default skew.
	pub fn new(credential: Credential, provider: Box<dyn TokenProvider>) -> Self {
		let skew = provider.kind().default_skew();

		Self { credential, provider, skew, closed: false }
	}

	/// Overrides the refresh skew. Negative values are clamped to zero.
	pub fn with_skew(mut self, skew: Duration) -> Self {
		self.set_skew(skew);

		self
	}

	/// Overrides the refresh skew in place. Negative values are clamped to zero.
	pub fn set_skew(&mut self, skew: Duration) {
		self.skew = if skew.is_negative() { Duration::ZERO } else { skew };
	}

	/// Refresh skew in effect.
	pub fn skew(&self) -> Duration {
		self.skew
	}

	/// Region served by this cache.
	pub fn region(&self) -> &RegionId {
		self.credential.region()
	}

	/// Underlying credential.
	pub fn credential(&self) -> &Credential {
		&self.credential
	}

	/// Whether the cached token can be used now.
	pub fn is_valid(&self) -> bool {
		self.is_valid_at(OffsetDateTime::now_utc())
	}

	/// Whether the cached token can be used at `now`.
	pub fn is_valid_at(&self, now: OffsetDateTime) -> bool {
		match self.credential.grant() {
			Some(grant) => grant.expires_at.checked_sub(self.skew).is_some_and(|edge| now < edge),
			None => false,
		}
	}

	/// Returns a usable token, calling the provider exactly once when the cache is empty,
	/// stale, or `force_refresh` is set.
	///
	/// On failure the previous grant is left untouched.
	pub async fn get_token(&mut self, force_refresh: bool) -> Result<TokenSecret, AuthError> {
		let region = self.credential.region().clone();

		if self.closed {
			return Err(AuthError::Closed { region });
		}

		let cached =
			if !force_refresh && self.is_valid() { self.credential.token().cloned() } else { None };

		if let Some(token) = cached {
			obs::trace_token_event(&region, "hit");

			return Ok(token);
		}

		let span = QuerySpan::new(QueryKind::Token, "token_cache.get_token");

		obs::record_query_outcome(QueryKind::Token, QueryOutcome::Attempt);
		obs::trace_token_event(&region, "refresh");

		let exchanged = span.instrument(self.provider.exchange(&self.credential)).await;

		match exchanged {
			Ok(grant) => {
				let token = grant.token.clone();

				self.credential.replace_grant(grant);
				obs::record_query_outcome(QueryKind::Token, QueryOutcome::Success);

				Ok(token)
			},
			Err(e) => {
				obs::record_query_outcome(QueryKind::Token, QueryOutcome::Failure);
				obs::trace_token_event(&region, "failure");

				Err(e)
			},
		}
	}

	/// Reports the cache state without exposing the token.
	pub fn status(&self) -> TokenStatus {
		TokenStatus {
			region: self.credential.region().clone(),
			has_token: self.credential.grant().is_some(),
			expires_at: self.credential.expires_at(),
			valid: self.is_valid(),
		}
	}

	/// Releases the provider's connection resources. Later calls to
	/// [`get_token`](Self::get_token) fail with [`AuthError::Closed`].
	pub fn close(&mut self) {
		self.provider.close();
		self.closed = true;
	}

	/// Whether [`close`](Self::close) has been called.
	pub fn is_closed(&self) -> bool {
		self.closed
	}
}
impl Debug for TokenCache {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenCache")
			.field("credential", &self.credential)
			.field("kind", &self.provider.kind())
			.field("skew", &self.skew)
			.field("closed", &self.closed)
			.finish()
	}
}
