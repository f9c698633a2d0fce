//! Identity provider bootstrap calls.
//!
//! These three operations mint the tokens every other call depends on, so they go straight to
//! [`CommerceClient::dispatch`] and never through the request interceptor. Responses are
//! returned raw; the auth coordinator interprets statuses and redirects itself.

// self
use crate::{
	_prelude::*,
	api::{ApiRequest, ApiResponse, CommerceClient, Method, Operation, TransportErrorMapper},
	auth::Credentials,
	http::CommerceHttpClient,
};

/// Login resource bound to a [`CommerceClient`].
pub struct ShopperLogin<'a, C, M>
where
	C: ?Sized + CommerceHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	client: &'a CommerceClient<C, M>,
}
impl<'a, C, M> ShopperLogin<'a, C, M>
where
	C: ?Sized + CommerceHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	pub(crate) fn new(client: &'a CommerceClient<C, M>) -> Self {
		Self { client }
	}

	/// `GET /oauth2/authorize`; answered by a redirect whose `Location` carries the code.
	pub async fn authorize_customer(
		&self,
		code_challenge: &str,
		hint: Option<&str>,
		usid: Option<&str>,
	) -> Result<ApiResponse> {
		let config = &self.client.config;
		let mut request =
			ApiRequest::new(Operation::AuthorizeCustomer, Method::GET, "/oauth2/authorize")
				.query("redirect_uri", config.redirect_uri.as_str())
				.query("response_type", "code")
				.query("client_id", config.client_id.as_str())
				.query("code_challenge", code_challenge)
				.query("channel_id", config.site_id.as_str())
				.ignore_hooks();

		if let Some(hint) = hint {
			request = request.query("hint", hint);
		}
		if let Some(usid) = usid {
			request = request.query("usid", usid);
		}

		self.client.dispatch(request).await
	}

	/// `POST /oauth2/login` with HTTP Basic shopper credentials.
	pub async fn authenticate_customer(
		&self,
		credentials: &Credentials,
		code_challenge: &str,
		usid: Option<&str>,
	) -> Result<ApiResponse> {
		let config = &self.client.config;
		let mut form = vec![
			("redirect_uri".to_owned(), config.redirect_uri.to_string()),
			("client_id".to_owned(), config.client_id.clone()),
			("code_challenge".to_owned(), code_challenge.to_owned()),
			("channel_id".to_owned(), config.site_id.clone()),
		];

		if let Some(usid) = usid {
			form.push(("usid".to_owned(), usid.to_owned()));
		}

		let request = ApiRequest::new(Operation::AuthenticateCustomer, Method::POST, "/oauth2/login")
			.header("authorization", credentials.basic_authorization())
			.form(form)
			.ignore_hooks();

		self.client.dispatch(request).await
	}

	/// `POST /oauth2/token` with the supplied grant parameters.
	pub async fn get_access_token(&self, grant: Vec<(String, String)>) -> Result<ApiResponse> {
		let request = ApiRequest::new(Operation::GetAccessToken, Method::POST, "/oauth2/token")
			.form(grant)
			.ignore_hooks();

		self.client.dispatch(request).await
	}
}
