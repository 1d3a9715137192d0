//! Region credential value object.

// self
use crate::{_prelude::*, auth::TokenSecret, region::RegionId};

/// How a region authenticates, which fixes the refresh skew and the token lifetime source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialKind {
	/// Browser session secret exchanged for a short-lived token.
	Session,
	/// Application id/secret pair exchanged for a token with a remote-declared lifetime.
	Application,
}
impl CredentialKind {
	/// Lifetime assumed for session-derived tokens; the endpoint does not report one.
	pub const SESSION_TOKEN_LIFETIME: Duration = Duration::hours(1);

	/// Refresh skew applied before the recorded expiry.
	pub const fn default_skew(self) -> Duration {
		match self {
			Self::Session => Duration::minutes(5),
			Self::Application => Duration::minutes(30),
		}
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Session => "session",
			Self::Application => "application",
		}
	}
}
impl Display for CredentialKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Token issued by a provider together with its expiry instant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenGrant {
	/// Token sent to region query endpoints.
	pub token: TokenSecret,
	/// Instant the token stops being accepted.
	pub expires_at: OffsetDateTime,
}
impl TokenGrant {
	/// Creates a grant.
	pub fn new(token: impl Into<String>, expires_at: OffsetDateTime) -> Self {
		Self { token: TokenSecret::new(token), expires_at }
	}
}

/// Secret material for one region plus the token most recently derived from it.
///
/// The token and its expiry live in one [`TokenGrant`], so they are always present or absent
/// together. Only [`TokenCache`](crate::auth::TokenCache) replaces the grant.
#[derive(Clone)]
pub struct Credential {
	region: RegionId,
	secret: TokenSecret,
	grant: Option<TokenGrant>,
}
impl Credential {
	/// Creates a credential with no token yet.
	pub fn new(region: RegionId, secret: impl Into<String>) -> Self {
		Self { region, secret: TokenSecret::new(secret), grant: None }
	}

	/// Seeds a previously issued token.
	pub fn with_grant(mut self, grant: TokenGrant) -> Self {
		self.grant = Some(grant);

		self
	}

	/// Region this credential authenticates against.
	pub fn region(&self) -> &RegionId {
		&self.region
	}

	/// Secret exchanged with the auth endpoint.
	pub fn secret(&self) -> &TokenSecret {
		&self.secret
	}

	/// Current grant, if any.
	pub fn grant(&self) -> Option<&TokenGrant> {
		self.grant.as_ref()
	}

	/// Current token, if any.
	pub fn token(&self) -> Option<&TokenSecret> {
		self.grant.as_ref().map(|grant| &grant.token)
	}

	/// Expiry of the current token, if any.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		self.grant.as_ref().map(|grant| grant.expires_at)
	}

	pub(crate) fn replace_grant(&mut self, grant: TokenGrant) {
		self.grant = Some(grant);
	}
}
impl Debug for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credential")
			.field("region", &self.region)
			.field("secret", &"<redacted>")
			.field("token", &self.grant.as_ref().map(|_| "<redacted>"))
			.field("expires_at", &self.expires_at())
			.finish()
	}
}
