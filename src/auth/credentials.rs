//! Shopper email/password credentials.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
// self
use crate::{_prelude::*, auth::TokenSecret};

/// Email/password pair submitted for a registered-customer login.
#[derive(Clone)]
pub struct Credentials {
	/// Login email.
	pub email: String,
	password: TokenSecret,
}
impl Credentials {
	/// Creates a credential pair.
	pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
		Self { email: email.into(), password: TokenSecret::new(password) }
	}

	/// HTTP Basic header value used by the login endpoint.
	pub(crate) fn basic_authorization(&self) -> String {
		let raw = format!("{}:{}", self.email, self.password.expose());

		format!("Basic {}", STANDARD.encode(raw))
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("email", &self.email)
			.field("password", &"<redacted>")
			.finish()
	}
}
