//! Response envelope shared by regional backends: `{error_code|code, message?, data}`.

// self
use crate::_prelude::*;

/// Why a body was not recognized as an envelope.
#[derive(Debug, ThisError)]
pub enum EnvelopeError {
	/// The body was not JSON.
	#[error("Response body is not JSON: {0}.")]
	NotJson(#[from] serde_json::Error),
	/// The body was JSON but not an object.
	#[error("Response body is not a JSON object.")]
	NotAnObject,
	/// Neither `error_code` nor `code` held an integer.
	#[error("Response envelope has no integer `error_code` or `code` field.")]
	MissingCode,
}

/// Normalized response envelope.
#[derive(Clone, Debug, PartialEq)]
pub struct Envelope {
	/// Status code reported inside the body; zero means success.
	pub code: i64,
	/// Human-readable message, if the backend sent one.
	pub message: Option<String>,
	/// Payload; `Null` when the backend omitted it.
	pub data: Value,
}
impl Envelope {
	const MESSAGE_FIELDS: [&'static str; 4] = ["message", "msg", "error_message", "error"];

	/// Parses a raw response body. `error_code` takes precedence over `code`.
	pub fn parse(bytes: &[u8]) -> Result<Self, EnvelopeError> {
		let value: Value = serde_json::from_slice(bytes)?;
		let Value::Object(mut object) = value else {
			return Err(EnvelopeError::NotAnObject);
		};
		let code = ["error_code", "code"]
			.iter()
			.find_map(|field| object.get(*field).and_then(Value::as_i64))
			.ok_or(EnvelopeError::MissingCode)?;
		let message = Self::MESSAGE_FIELDS
			.iter()
			.find_map(|field| object.get(*field).and_then(Value::as_str))
			.filter(|message| !message.is_empty())
			.map(str::to_owned);
		let data = object.remove("data").unwrap_or(Value::Null);

		Ok(Self { code, message, data })
	}

	/// Whether the envelope reports success.
	pub fn is_success(&self) -> bool {
		self.code == 0
	}

	/// Message describing a business failure.
	pub fn failure_message(&self) -> String {
		match &self.message {
			Some(message) => format!("error code {}: {message}", self.code),
			None => format!("error code {}", self.code),
		}
	}
}
