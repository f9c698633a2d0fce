//! Session snapshots and their persisted form.

// self
use crate::{
	_prelude::*,
	auth::{AuthToken, CustomerId, TokenSecret},
	model::AuthType,
	store::{SessionStore, StoreKey},
};

/// Authenticated shopper session.
///
/// Sessions are immutable; every login or refresh produces a new one. Concurrent callers of
/// a single login receive clones of the same `Arc<Session>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
	/// Bearer token attached to API calls.
	pub auth_token: AuthToken,
	/// Refresh token; only registered sessions keep one.
	pub refresh_token: Option<TokenSecret>,
	/// Customer the tokens were minted for.
	pub customer_id: CustomerId,
	/// Guest or registered.
	pub auth_type: AuthType,
	/// Shopper session id.
	pub usid: Option<String>,
}
impl Session {
	/// Returns `true` for registered sessions.
	pub fn is_registered(&self) -> bool {
		self.auth_type == AuthType::Registered
	}

	pub(crate) async fn persist(&self, store: &dyn SessionStore) -> Result<()> {
		store.set(StoreKey::AccessToken, self.auth_token.header_value().to_owned()).await?;
		store.set(StoreKey::CustomerId, self.customer_id.to_string()).await?;
		store.set(StoreKey::AuthType, self.auth_type.to_string()).await?;

		match &self.usid {
			Some(usid) => store.set(StoreKey::Usid, usid.clone()).await?,
			None => {
				store.remove(StoreKey::Usid).await?;
			},
		}
		match (&self.refresh_token, self.auth_type) {
			(Some(refresh), AuthType::Registered) =>
				store.set(StoreKey::RefreshToken, refresh.expose().to_owned()).await?,
			_ => {
				store.remove(StoreKey::RefreshToken).await?;
			},
		}

		Ok(())
	}
}

/// Whatever the store currently holds; any member may be missing or stale.
#[derive(Debug, Default)]
pub(crate) struct StoredSession {
	pub(crate) token: Option<AuthToken>,
	pub(crate) had_access_token: bool,
	pub(crate) refresh_token: Option<TokenSecret>,
	pub(crate) customer_id: Option<CustomerId>,
	pub(crate) usid: Option<String>,
	pub(crate) auth_type: AuthType,
}
impl StoredSession {
	/// Reads the session keys. Undecodable tokens and ids are treated as absent.
	pub(crate) async fn load(store: &dyn SessionStore) -> Result<Self> {
		let access = store.get(StoreKey::AccessToken).await?;
		let token = access.as_deref().and_then(|raw| AuthToken::parse(raw).ok());
		let refresh_token =
			store.get(StoreKey::RefreshToken).await?.filter(|v| !v.is_empty()).map(TokenSecret::new);
		let customer_id =
			store.get(StoreKey::CustomerId).await?.and_then(|raw| CustomerId::new(raw).ok());
		let usid = store.get(StoreKey::Usid).await?.filter(|v| !v.is_empty());
		let auth_type = store
			.get(StoreKey::AuthType)
			.await?
			.and_then(|raw| raw.parse().ok())
			.unwrap_or_default();

		Ok(Self {
			token,
			had_access_token: access.is_some(),
			refresh_token,
			customer_id,
			usid,
			auth_type,
		})
	}

	/// Returns `true` when any trace of an earlier session exists.
	pub(crate) fn exists(&self) -> bool {
		self.had_access_token || self.usid.is_some() || self.customer_id.is_some()
	}

	/// Rebuilds a session when the stored token is still usable at `now`.
	pub(crate) fn valid_session(&self, now: OffsetDateTime) -> Option<Session> {
		let token = self.token.as_ref().filter(|token| token.is_valid_at(now))?;

		Some(Session {
			auth_token: token.clone(),
			refresh_token: self.refresh_token.clone(),
			customer_id: self.customer_id.clone()?,
			auth_type: self.auth_type,
			usid: self.usid.clone(),
		})
	}
}

/// Removes every session key. The PKCE verifier is left alone.
pub(crate) async fn clear(store: &dyn SessionStore) -> Result<()> {
	for key in StoreKey::SESSION {
		store.remove(key).await?;
	}

	Ok(())
}
