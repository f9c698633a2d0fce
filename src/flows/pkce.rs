//! PKCE verifier/challenge pairs and redirect callback parsing.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::Rng;
use sha2::{Digest, Sha256};
// self
use crate::{_prelude::*, auth::TokenSecret, error::ConfigError};

const PKCE_VERIFIER_LEN: usize = 128;
const UNRESERVED: &[u8] =
	b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-._~";

/// Verifier plus its S256 challenge.
#[derive(Clone)]
pub struct PkcePair {
	verifier: TokenSecret,
	challenge: String,
}
impl PkcePair {
	/// Generates a fresh pair with a 128-character verifier.
	pub fn generate() -> Self {
		let mut rng = rand::rng();
		let verifier = (0..PKCE_VERIFIER_LEN)
			.map(|_| char::from(UNRESERVED[rng.random_range(0..UNRESERVED.len())]))
			.collect::<String>();

		Self::from_verifier(verifier)
	}

	/// Rebuilds a pair from a previously generated verifier.
	pub fn from_verifier(verifier: impl Into<String>) -> Self {
		let verifier = verifier.into();
		let challenge = compute_challenge(&verifier);

		Self { verifier: TokenSecret::new(verifier), challenge }
	}

	/// Secret verifier sent with the token exchange.
	pub fn verifier(&self) -> &str {
		self.verifier.expose()
	}

	/// Challenge sent with the authorize/login call.
	pub fn challenge(&self) -> &str {
		&self.challenge
	}
}
impl Debug for PkcePair {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PkcePair")
			.field("verifier", &"<redacted>")
			.field("challenge", &self.challenge)
			.finish()
	}
}

/// Query parameters delivered to the redirect callback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallbackParams {
	/// Single-use authorization code.
	pub code: String,
	/// Shopper session id, when the identity provider issued one.
	pub usid: Option<String>,
}

/// Parses a redirect target (absolute, or relative to `base`) into its callback parameters.
///
/// An `error` parameter from the identity provider becomes [`Error::Authentication`].
pub fn parse_callback(raw: &str, base: &Url) -> Result<CallbackParams> {
	let url = Url::parse(raw).or_else(|_| base.join(raw)).map_err(|e| {
		ConfigError::InvalidCallback { reason: format!("`{raw}` is not a URL ({e})") }
	})?;
	let mut code = None;
	let mut usid = None;
	let mut error = None;
	let mut description = None;

	for (key, value) in url.query_pairs() {
		match key.as_ref() {
			"code" => code = Some(value.into_owned()),
			"usid" => usid = Some(value.into_owned()),
			"error" => error = Some(value.into_owned()),
			"error_description" => description = Some(value.into_owned()),
			_ => {},
		}
	}

	if let Some(error) = error {
		return Err(Error::Authentication { status: None, reason: description.unwrap_or(error) });
	}

	let code = code
		.filter(|code| !code.is_empty())
		.ok_or_else(|| ConfigError::InvalidCallback { reason: "missing `code`".into() })?;

	Ok(CallbackParams { code, usid: usid.filter(|usid| !usid.is_empty()) })
}

fn compute_challenge(verifier: &str) -> String {
	let digest = Sha256::digest(verifier.as_bytes());

	URL_SAFE_NO_PAD.encode(digest)
}
