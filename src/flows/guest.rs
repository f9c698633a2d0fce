//! Guest session bootstrap: `authorizeCustomer` with `hint=guest`, then the PKCE token
//! exchange.

// self
use crate::{
	_prelude::*,
	api::TransportErrorMapper,
	flows::{AuthCoordinator, PkcePair, Session, common, pkce, session::StoredSession},
	http::CommerceHttpClient,
	model::AuthType,
};

impl<C, M> AuthCoordinator<C, M>
where
	C: ?Sized + CommerceHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Mints a guest session. A 401 while an earlier session exists means the platform no
	/// longer accepts it and is reported as [`Error::ExpiredToken`].
	pub(super) async fn guest_login(&self, stored: &StoredSession) -> Result<Session> {
		let pkce = PkcePair::generate();
		let login = self.client.login();
		let authorized =
			login.authorize_customer(pkce.challenge(), Some("guest"), stored.usid.as_deref()).await?;

		if authorized.status == 401 && stored.exists() {
			return Err(Error::ExpiredToken);
		}
		if !authorized.is_success() {
			return Err(common::authentication_failure(&authorized));
		}

		let location = authorized.location.as_deref().ok_or_else(|| Error::Authentication {
			status: Some(authorized.status),
			reason: "authorization response carried no redirect".into(),
		})?;
		let callback = pkce::parse_callback(location, &self.client.config.redirect_uri)?;
		let token = self.exchange_code(&callback, pkce.verifier()).await?;

		if token.status == 401 && stored.exists() {
			return Err(Error::ExpiredToken);
		}
		if !token.is_success() {
			return Err(common::authentication_failure(&token));
		}

		common::session_from_token_response(&token, AuthType::Guest, None)
	}
}
