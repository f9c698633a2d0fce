//! Request interceptor wrapping every non-bootstrap API call.
//!
//! [`Api::with_auth`] runs the pre-call hook (wait for a pending login, make sure the stored
//! token is valid, attach it) and the post-call hook (turn error-shaped bodies into
//! [`Error::Api`]). Bootstrap operations never pass through the hooks: they are the calls
//! that mint tokens in the first place.

// crates.io
use oauth2::http::header::AUTHORIZATION;
// self
use crate::{
	_prelude::*,
	api::{Api, ApiError, ApiRequest, ApiResponse, TransportErrorMapper},
	auth::AuthToken,
	http::CommerceHttpClient,
};

impl<C, M> Api<C, M>
where
	C: ?Sized + CommerceHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Sends `request` with the current bearer token and normalizes error responses.
	///
	/// Requests marked with [`ApiRequest::ignore_hooks`], and the three bootstrap operations,
	/// are dispatched as-is and return the raw response whatever its status.
	pub async fn with_auth(&self, request: ApiRequest) -> Result<ApiResponse> {
		if request.ignore_hooks || request.operation.is_auth_bootstrap() {
			return self.client().dispatch(request).await;
		}

		let token = self.ensure_token().await?;
		let request = attach_authorization(request, &token);
		let response = self.client().dispatch(request).await?;

		normalize_response(response)
	}

	async fn ensure_token(&self) -> Result<AuthToken> {
		let auth = self.auth();

		if auth.is_login_pending() {
			auth.wait_for_pending_login().await;
		}
		if let Some(token) = auth.current_token().await?.filter(AuthToken::is_valid) {
			return Ok(token);
		}

		Ok(auth.login(None).await?.auth_token.clone())
	}
}

/// Merges the bearer token into the caller's headers; any caller `Authorization` loses.
pub(crate) fn attach_authorization(mut request: ApiRequest, token: &AuthToken) -> ApiRequest {
	request.headers.retain(|name, _| !name.eq_ignore_ascii_case(AUTHORIZATION.as_str()));
	request.headers.insert(AUTHORIZATION.as_str().to_owned(), token.header_value().to_owned());

	request
}

/// Post-call hook: error-shaped bodies (and failed statuses) become [`Error::Api`].
pub(crate) fn normalize_response(response: ApiResponse) -> Result<ApiResponse> {
	if let Some(err) = ApiError::from_body(Some(response.status), &response.body) {
		return Err(err.into());
	}
	if !response.is_success() {
		return Err(ApiError::from_status(response.status, &response.body).into());
	}

	Ok(response)
}
