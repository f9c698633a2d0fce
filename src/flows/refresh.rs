//! Refresh token grant for registered sessions.

// self
use crate::{
	_prelude::*,
	api::TransportErrorMapper,
	auth::TokenSecret,
	flows::{AuthCoordinator, Session, common},
	http::CommerceHttpClient,
	model::AuthType,
};

impl<C, M> AuthCoordinator<C, M>
where
	C: ?Sized + CommerceHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Trades the stored refresh token for a new session.
	///
	/// A 400/401 means the refresh token is no longer accepted and surfaces as
	/// [`Error::ExpiredToken`], which makes the caller clear the session and fall back to a
	/// guest login.
	pub(super) async fn refresh_login(
		&self,
		refresh_token: TokenSecret,
		usid: Option<&str>,
	) -> Result<Session> {
		let config = &self.client.config;
		let mut grant = vec![
			("grant_type".to_owned(), "refresh_token".to_owned()),
			("refresh_token".to_owned(), refresh_token.expose().to_owned()),
			("client_id".to_owned(), config.client_id.clone()),
			("channel_id".to_owned(), config.site_id.clone()),
		];

		if let Some(usid) = usid {
			grant.push(("usid".to_owned(), usid.to_owned()));
		}

		let token = self.client.login().get_access_token(grant).await?;

		if matches!(token.status, 400 | 401) {
			return Err(Error::ExpiredToken);
		}
		if !token.is_success() {
			return Err(common::authentication_failure(&token));
		}

		common::session_from_token_response(&token, AuthType::Registered, Some(refresh_token))
	}
}
