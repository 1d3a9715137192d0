//! Secret resolution: explicit values, environment variables, then captured browser sessions.

// std
use std::{
	fs,
	path::{Path, PathBuf},
};
// self
use crate::{_prelude::*, auth::TokenSecret, error::AuthError, region::RegionId};

#[derive(Debug, Deserialize)]
struct CapturedCookie {
	name: String,
	value: String,
}

#[derive(Debug, Deserialize)]
struct CapturedSession {
	#[serde(default)]
	cookies: Vec<CapturedCookie>,
	#[serde(default)]
	headers: BTreeMap<String, String>,
}

/// Ordered lookup of per-region secrets.
///
/// Resolution order for region `r` with prefix `P`:
///
/// 1. an explicit value registered with [`explicit`](Self::explicit);
/// 2. the environment variable `P_r`, then `P_R` (upper-cased region);
/// 3. the environment variable `P`;
/// 4. `config-r.json` inside the capture directory, reading the cookie (or header) named after
///    the configured cookie name.
///
/// Empty values are skipped at every step.
#[derive(Clone, Debug)]
pub struct SecretSource {
	explicit: BTreeMap<RegionId, TokenSecret>,
	env_prefix: String,
	cookie_name: String,
	capture_dir: Option<PathBuf>,
}
impl SecretSource {
	/// Default environment variable prefix and cookie name.
	pub const DEFAULT_NAME: &'static str = "CAS_SESSION";

	/// Creates a source with the default prefix and no capture directory.
	pub fn new() -> Self {
		Self {
			explicit: BTreeMap::new(),
			env_prefix: Self::DEFAULT_NAME.into(),
			cookie_name: Self::DEFAULT_NAME.into(),
			capture_dir: None,
		}
	}

	/// Registers an explicit secret for `region`, taking precedence over everything else.
	pub fn explicit(mut self, region: RegionId, secret: impl Into<String>) -> Self {
		self.explicit.insert(region, TokenSecret::new(secret));

		self
	}

	/// Overrides the environment variable prefix.
	pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.env_prefix = prefix.into();

		self
	}

	/// Overrides the cookie name looked up in capture files.
	pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
		self.cookie_name = name.into();

		self
	}

	/// Enables capture-file lookup in `dir`.
	pub fn with_capture_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.capture_dir = Some(dir.into());

		self
	}

	/// Capture file path for `region`, when a capture directory is configured.
	pub fn capture_path(&self, region: &RegionId) -> Option<PathBuf> {
		self.capture_dir.as_ref().map(|dir| dir.join(format!("config-{region}.json")))
	}

	/// Resolves the secret for `region` using the process environment.
	pub fn resolve(&self, region: &RegionId) -> Result<TokenSecret, AuthError> {
		self.resolve_with(region, |name| std::env::var(name).ok())
	}

	/// Resolves the secret for `region` using `lookup` in place of the process environment.
	pub fn resolve_with(
		&self,
		region: &RegionId,
		lookup: impl Fn(&str) -> Option<String>,
	) -> Result<TokenSecret, AuthError> {
		if let Some(secret) = self.explicit.get(region).filter(|secret| !secret.is_empty()) {
			return Ok(secret.clone());
		}

		let candidates = [
			format!("{}_{region}", self.env_prefix),
			format!("{}_{}", self.env_prefix, region.to_uppercase()),
			self.env_prefix.clone(),
		];

		for name in &candidates {
			if let Some(value) = lookup(name).filter(|value| !value.trim().is_empty()) {
				return Ok(TokenSecret::new(value.trim()));
			}
		}

		match self.capture_path(region) {
			Some(path) if path.is_file() => self.read_capture(region, &path),
			_ => Err(AuthError::MissingSecret { region: region.clone() }),
		}
	}

	fn read_capture(&self, region: &RegionId, path: &Path) -> Result<TokenSecret, AuthError> {
		let unreadable = |source: Box<dyn std::error::Error + Send + Sync>| {
			AuthError::UnreadableSecret {
				region: region.clone(),
				path: path.display().to_string(),
				source,
			}
		};
		let bytes = fs::read(path).map_err(|e| unreadable(Box::new(e)))?;
		let captured: CapturedSession =
			serde_json::from_slice(&bytes).map_err(|e| unreadable(Box::new(e)))?;
		let from_cookie = captured
			.cookies
			.into_iter()
			.find(|cookie| cookie.name == self.cookie_name)
			.map(|cookie| cookie.value);
		let from_header = || {
			captured
				.headers
				.iter()
				.find(|(name, _)| name.eq_ignore_ascii_case(&self.cookie_name))
				.map(|(_, value)| value.clone())
		};

		from_cookie
			.filter(|value| !value.is_empty())
			.or_else(from_header)
			.filter(|value| !value.is_empty())
			.map(TokenSecret::new)
			.ok_or_else(|| AuthError::MissingSecret { region: region.clone() })
	}
}
impl Default for SecretSource {
	fn default() -> Self {
		Self::new()
	}
}
