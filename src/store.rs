//! Storage contracts and built-in store implementations for session secrets.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::_prelude::*;

/// Boxed future returned by [`SessionStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Key/value storage backend holding the session's persisted values.
///
/// Only the auth coordinator writes to the store; the request interceptor reads the bearer
/// token from it. No locking is implied beyond what the implementation provides.
pub trait SessionStore
where
	Self: Send + Sync,
{
	/// Fetches the value stored under `key`, if present.
	fn get(&self, key: StoreKey) -> StoreFuture<'_, Option<String>>;

	/// Persists or replaces the value stored under `key`.
	fn set(&self, key: StoreKey, value: String) -> StoreFuture<'_, ()>;

	/// Removes and returns the value stored under `key`.
	fn remove(&self, key: StoreKey) -> StoreFuture<'_, Option<String>>;
}

/// Keys persisted by the session layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKey {
	/// `Authorization` header value for the current session.
	AccessToken,
	/// Refresh token of a registered session.
	RefreshToken,
	/// Customer identifier bound to the current tokens.
	CustomerId,
	/// Shopper session identifier issued by the identity provider.
	Usid,
	/// Registered vs guest marker for the current tokens.
	AuthType,
	/// PKCE verifier awaiting its authorization callback.
	CodeVerifier,
}
impl StoreKey {
	/// Keys cleared on logout or when the platform rejects the session.
	pub const SESSION: [StoreKey; 5] =
		[Self::AccessToken, Self::RefreshToken, Self::CustomerId, Self::Usid, Self::AuthType];

	/// Returns the stable storage name for the key.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::AccessToken => "access_token",
			Self::RefreshToken => "refresh_token",
			Self::CustomerId => "customer_id",
			Self::Usid => "usid",
			Self::AuthType => "auth_type",
			Self::CodeVerifier => "code_verifier",
		}
	}
}
impl Display for StoreKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Error type produced by [`SessionStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
