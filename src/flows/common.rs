//! Token endpoint response handling shared by the login flows.

// self
use crate::{
	_prelude::*,
	api::ApiResponse,
	auth::{AuthToken, CustomerId, TokenSecret},
	flows::Session,
	model::AuthType,
};

/// Token endpoint success body.
#[derive(Clone, Deserialize)]
pub(crate) struct TokenResponse {
	access_token: String,
	#[serde(default)]
	refresh_token: Option<String>,
	customer_id: CustomerId,
	#[serde(default)]
	usid: Option<String>,
}

/// Builds a session from a token endpoint response.
///
/// Guest sessions drop the refresh token. Registered sessions keep the response's refresh
/// token, falling back to `previous_refresh` when the endpoint did not rotate it.
pub(crate) fn session_from_token_response(
	response: &ApiResponse,
	auth_type: AuthType,
	previous_refresh: Option<TokenSecret>,
) -> Result<Session> {
	let body: TokenResponse = response.decode()?;
	let auth_token = AuthToken::from_access_token(&body.access_token)?;
	let refresh_token = match auth_type {
		AuthType::Guest => None,
		AuthType::Registered => body
			.refresh_token
			.filter(|token| !token.is_empty())
			.map(TokenSecret::new)
			.or(previous_refresh),
	};

	Ok(Session {
		auth_token,
		refresh_token,
		customer_id: body.customer_id,
		auth_type,
		usid: body.usid.filter(|usid| !usid.is_empty()),
	})
}

/// Converts a failed bootstrap response into [`Error::Authentication`].
pub(crate) fn authentication_failure(response: &ApiResponse) -> Error {
	Error::Authentication { status: Some(response.status), reason: failure_reason(response) }
}

/// Best human-readable reason carried by a failed bootstrap response.
pub(crate) fn failure_reason(response: &ApiResponse) -> String {
	const KEYS: [&str; 4] = ["error_description", "message", "detail", "error"];

	KEYS.iter()
		.find_map(|key| response.body.get(*key).and_then(Value::as_str))
		.filter(|reason| !reason.is_empty())
		.map(str::to_owned)
		.or_else(|| response.body.as_str().map(str::to_owned).filter(|text| !text.is_empty()))
		.unwrap_or_else(|| format!("{} failed with status {}", response.operation, response.status))
}
