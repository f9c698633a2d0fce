//! Email/password login via authorization code + PKCE, and the redirect callback exchange.

// self
use crate::{
	_prelude::*,
	api::{ApiResponse, TransportErrorMapper},
	auth::Credentials,
	error::ConfigError,
	flows::{AuthCoordinator, CallbackParams, PkcePair, Session, common, pkce},
	http::CommerceHttpClient,
	model::AuthType,
	store::StoreKey,
};

const GRANT_AUTHORIZATION_CODE_PKCE: &str = "authorization_code_pkce";

impl<C, M> AuthCoordinator<C, M>
where
	C: ?Sized + CommerceHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Authenticates the shopper, then finishes the flow from the login redirect.
	///
	/// The verifier is stashed in the store before the login call so a redirect delivered
	/// out of band can still be completed through [`AuthCoordinator::handle_callback`].
	pub(super) async fn credential_login(
		&self,
		credentials: &Credentials,
		usid: Option<&str>,
	) -> Result<Session> {
		let pkce = PkcePair::generate();

		self.store.set(StoreKey::CodeVerifier, pkce.verifier().to_owned()).await?;

		let response = match self
			.client
			.login()
			.authenticate_customer(credentials, pkce.challenge(), usid)
			.await
		{
			Ok(response) => response,
			Err(err) => {
				self.store.remove(StoreKey::CodeVerifier).await?;

				return Err(err);
			},
		};

		if !response.is_success() {
			self.store.remove(StoreKey::CodeVerifier).await?;

			return Err(common::authentication_failure(&response));
		}

		let location = response.location.as_deref().ok_or_else(|| Error::Authentication {
			status: Some(response.status),
			reason: "login response carried no redirect".into(),
		})?;

		self.exchange_callback(location).await
	}

	/// Consumes the stashed verifier and exchanges the callback's code for tokens.
	pub(super) async fn exchange_callback(&self, url: &str) -> Result<Session> {
		let verifier = self
			.store
			.remove(StoreKey::CodeVerifier)
			.await?
			.ok_or(ConfigError::MissingCodeVerifier)?;
		let callback = pkce::parse_callback(url, &self.client.config.redirect_uri)?;
		let token = self.exchange_code(&callback, &verifier).await?;

		if !token.is_success() {
			return Err(common::authentication_failure(&token));
		}

		common::session_from_token_response(&token, AuthType::Registered, None)
	}

	pub(super) async fn exchange_code(
		&self,
		callback: &CallbackParams,
		verifier: &str,
	) -> Result<ApiResponse> {
		let config = &self.client.config;
		let mut grant = vec![
			("grant_type".to_owned(), GRANT_AUTHORIZATION_CODE_PKCE.to_owned()),
			("code".to_owned(), callback.code.clone()),
			("code_verifier".to_owned(), verifier.to_owned()),
			("redirect_uri".to_owned(), config.redirect_uri.to_string()),
			("client_id".to_owned(), config.client_id.clone()),
			("channel_id".to_owned(), config.site_id.clone()),
		];

		if let Some(usid) = &callback.usid {
			grant.push(("usid".to_owned(), usid.clone()));
		}

		self.client.login().get_access_token(grant).await
	}
}
