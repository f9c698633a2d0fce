//! Immutable bearer token records decoded from JWT claims.

// crates.io
use base64::{
	Engine as _,
	engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD},
};
// self
use crate::{_prelude::*, auth::token::secret::TokenSecret};

/// Safety margin subtracted from a token's lifetime before it is considered unusable.
pub const EXPIRY_MARGIN: Duration = Duration::seconds(60);

const BEARER_PREFIX: &str = "Bearer ";

/// Errors produced while decoding a bearer token.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum TokenError {
	/// The token is not a three-segment JWT.
	#[error("Bearer token is not a JWT.")]
	NotAJwt,
	/// The payload segment is not valid base64url.
	#[error("Bearer token payload is not base64url encoded.")]
	PayloadEncoding,
	/// The payload does not carry numeric `iat`/`exp` claims.
	#[error("Bearer token payload is missing the {claim} claim.")]
	MissingClaim {
		/// Name of the missing claim.
		claim: &'static str,
	},
	/// A claim timestamp is outside the representable range.
	#[error("Bearer token {claim} claim is out of range.")]
	ClaimOutOfRange {
		/// Name of the offending claim.
		claim: &'static str,
	},
}

#[derive(Deserialize)]
struct Claims {
	iat: Option<i64>,
	exp: Option<i64>,
}

/// Bearer access token plus the issued-at and expiry instants embedded in its claims.
///
/// The stored form is the full header value (`Bearer <jwt>`), matching what the interceptor
/// attaches to outgoing requests.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken {
	header: TokenSecret,
	/// Issued-at instant from the `iat` claim.
	pub issued_at: OffsetDateTime,
	/// Expiry instant from the `exp` claim.
	pub expires_at: OffsetDateTime,
}
impl AuthToken {
	/// Decodes a raw access token as returned by the token endpoint.
	pub fn from_access_token(access_token: &str) -> Result<Self, TokenError> {
		Self::parse(&format!("{BEARER_PREFIX}{access_token}"))
	}

	/// Decodes a stored `Authorization` header value. The `Bearer ` prefix is optional.
	pub fn parse(value: &str) -> Result<Self, TokenError> {
		let jwt = value.strip_prefix(BEARER_PREFIX).unwrap_or(value).trim();
		let mut segments = jwt.split('.');
		let (Some(_header), Some(payload), Some(_signature), None) =
			(segments.next(), segments.next(), segments.next(), segments.next())
		else {
			return Err(TokenError::NotAJwt);
		};
		let bytes = URL_SAFE_NO_PAD
			.decode(payload)
			.or_else(|_| URL_SAFE.decode(payload))
			.map_err(|_| TokenError::PayloadEncoding)?;
		let claims: Claims =
			serde_json::from_slice(&bytes).map_err(|_| TokenError::PayloadEncoding)?;
		let issued_at = claim_instant("iat", claims.iat)?;
		let expires_at = claim_instant("exp", claims.exp)?;

		Ok(Self { header: TokenSecret::new(format!("{BEARER_PREFIX}{jwt}")), issued_at, expires_at })
	}

	/// Returns the `Authorization` header value. Callers must avoid logging it.
	pub fn header_value(&self) -> &str {
		self.header.expose()
	}

	/// Total lifetime granted by the issuer.
	pub fn lifetime(&self) -> Duration {
		self.expires_at - self.issued_at
	}

	/// Returns `true` while the token is usable at `now`, honoring [`EXPIRY_MARGIN`].
	pub fn is_valid_at(&self, now: OffsetDateTime) -> bool {
		let valid_for = self.lifetime() - EXPIRY_MARGIN;
		let age = now - self.issued_at;

		valid_for > age
	}

	/// Convenience helper that checks validity against the current UTC clock.
	pub fn is_valid(&self) -> bool {
		self.is_valid_at(OffsetDateTime::now_utc())
	}
}
impl Debug for AuthToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthToken")
			.field("header", &"<redacted>")
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

/// Token validity check; absent tokens are never valid.
pub fn is_token_valid(token: Option<&AuthToken>, now: OffsetDateTime) -> bool {
	token.is_some_and(|token| token.is_valid_at(now))
}

fn claim_instant(claim: &'static str, value: Option<i64>) -> Result<OffsetDateTime, TokenError> {
	let seconds = value.ok_or(TokenError::MissingClaim { claim })?;

	OffsetDateTime::from_unix_timestamp(seconds).map_err(|_| TokenError::ClaimOutOfRange { claim })
}
