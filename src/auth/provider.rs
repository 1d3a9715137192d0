//! Token providers: one network exchange that turns a region secret into a [`TokenGrant`].
//!
//! Providers hold no cache of their own; [`TokenCache`](crate::auth::TokenCache) decides when
//! an exchange is needed. Two variants exist because the regional auth domains disagree on
//! where the token travels: [`SessionTokenProvider`] reads it from a response header and
//! assumes a fixed lifetime, while [`ApplicationTokenProvider`] reads it from a JSON body that
//! also declares the lifetime.

pub mod application;
pub mod session;

pub use application::*;
pub use session::*;

// self
use crate::{
	_prelude::*,
	auth::{Credential, CredentialKind, TokenGrant},
	error::AuthError,
};

/// Boxed future returned by [`TokenProvider::exchange`].
pub type ProviderFuture<'a> = Pin<Box<dyn Future<Output = Result<TokenGrant, AuthError>> + 'a + Send>>;

/// Exchanges a credential's secret for a fresh token.
pub trait TokenProvider
where
	Self: Send + Sync,
{
	/// Credential kind served by this provider.
	fn kind(&self) -> CredentialKind;

	/// Performs exactly one exchange with the region's auth endpoint.
	fn exchange<'a>(&'a self, credential: &'a Credential) -> ProviderFuture<'a>;

	/// Releases any live connection resources. Later exchanges fail with
	/// [`AuthError::Closed`].
	fn close(&mut self) {}
}
