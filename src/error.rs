//! Session-level error types shared across flows, API resources, and stores.

// self
use crate::{_prelude::*, api::Operation};

/// Session-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Sentinel message for a session whose tokens the platform no longer accepts.
pub const EXPIRED_TOKEN: &str = "EXPIRED_TOKEN";

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Temporary upstream failure; retry with backoff.
	#[error(transparent)]
	Transient(#[from] TransientError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// The platform answered with an error-shaped body.
	#[error(transparent)]
	Api(#[from] crate::api::ApiError),
	/// Bearer token could not be decoded.
	#[error(transparent)]
	InvalidToken(#[from] crate::auth::TokenError),

	/// The platform rejected the stored session; recovered by one automatic re-login.
	#[error("EXPIRED_TOKEN")]
	ExpiredToken,
	/// Login failed for a reason other than token expiry.
	#[error("Authentication failed: {reason}.")]
	Authentication {
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Platform- or client-supplied reason string.
		reason: String,
	},
	/// A concurrent login this call joined has failed.
	#[error("Pending login failed: {reason}.")]
	PendingLogin {
		/// Rendered failure of the shared login attempt.
		reason: String,
	},
}
impl Error {
	/// Returns the annotated API payload when the error carries one.
	pub fn api_payload(&self) -> Option<&Value> {
		match self {
			Self::Api(err) => Some(err.payload()),
			_ => None,
		}
	}
}

/// Configuration and validation failures raised locally.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// A request URL could not be assembled from the configured origin.
	#[error("Request URL for {operation} is invalid.")]
	InvalidRequestUrl {
		/// Operation that failed to build its URL.
		operation: Operation,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A request body could not be serialized.
	#[error("Request body for {operation} could not be serialized.")]
	RequestBody {
		/// Operation whose body failed to serialize.
		operation: Operation,
		/// Underlying serialization failure.
		#[source]
		source: serde_json::Error,
	},
	/// Store configuration could not be validated.
	#[error(transparent)]
	Storefront(#[from] crate::config::StorefrontConfigError),
	/// Redirect or callback URL is missing required parameters.
	#[error("Callback URL is invalid: {reason}.")]
	InvalidCallback {
		/// Which part of the callback was missing or malformed.
		reason: String,
	},
	/// A customer-scoped call was attempted without an authenticated customer.
	#[error("No customer is associated with the current session.")]
	MissingCustomer,
	/// A basket-scoped call was attempted before a basket was loaded.
	#[error("No basket is loaded.")]
	MissingBasket,
	/// A list-scoped call was attempted before the list was initialized.
	#[error("Product list `{name}` is not initialized.")]
	MissingProductList {
		/// Configured list name.
		name: String,
	},
	/// A list item operation referenced an item absent from local state.
	#[error("Product `{product_id}` is not in the product list.")]
	MissingListItem {
		/// Product identifier that was looked up.
		product_id: String,
	},
	/// PKCE callback arrived without a stashed code verifier.
	#[error("No PKCE code verifier is stashed for the callback.")]
	MissingCodeVerifier,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Temporary failure variants (safe to retry).
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// Platform returned an unexpected but non-fatal response.
	#[error("{operation} returned an unexpected response: {message}.")]
	Endpoint {
		/// Operation that was being called.
		operation: Operation,
		/// Platform- or client-supplied message summarizing the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Response body could not be decoded into the expected resource.
	#[error("{operation} returned a body that could not be decoded.")]
	ResponseParse {
		/// Operation that was being called.
		operation: Operation,
		/// Structured parsing failure naming the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {operation}.")]
	Network {
		/// Operation that was being called.
		operation: Operation,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the commerce API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(operation: Operation, src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { operation, source: Box::new(src) }
	}
}
