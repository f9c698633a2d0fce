//! Storefront configuration consumed by the API client and auth flows.
//!
//! A [`StorefrontConfig`] names the commerce tenant (organization, site, client id), the API
//! origin every resource path is resolved against, and the redirect URI the identity
//! provider sends authorization codes to. Values are validated once at construction, either
//! through [`StorefrontConfigBuilder`] or when deserialized with
//! [`StorefrontConfig::from_json_str`]/[`StorefrontConfig::from_path`].

/// Builder API for assembling storefront configurations.
pub mod builder;

pub use builder::*;

// std
use std::{fs, path::Path};
// self
use crate::_prelude::*;

/// Wire dialect spoken by the basket and order resources.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Dialect {
	#[default]
	/// Shopper APIs with camelCase bodies and `{detail,title,type}` errors.
	Scapi,
	/// Legacy shop API with snake_case bodies and `fault` errors.
	Ocapi {
		/// Shop API version segment, e.g. `v21_3`.
		version: String,
	},
}

/// Validated storefront configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorefrontConfig {
	/// Origin all API paths are resolved against.
	pub api_origin: Url,
	/// Commerce organization identifier (`f_ecom_...`).
	pub organization_id: String,
	/// Storefront site identifier, sent as `siteId`.
	pub site_id: String,
	/// Public client identifier registered with the identity provider.
	pub client_id: String,
	/// Callback route receiving `code` and `usid` after authorization.
	pub redirect_uri: Url,
	/// ISO 4217 currency used for new baskets.
	#[serde(default = "default_currency")]
	pub currency: String,
	/// Locale forwarded to catalog reads.
	#[serde(default = "default_locale")]
	pub locale: String,
	/// Dialect spoken by the basket and order resources.
	#[serde(default)]
	pub basket_dialect: Dialect,
}
impl StorefrontConfig {
	/// Creates a new builder.
	pub fn builder() -> StorefrontConfigBuilder {
		StorefrontConfigBuilder::new()
	}

	/// Parses and validates a JSON document.
	pub fn from_json_str(raw: &str) -> Result<Self, StorefrontConfigError> {
		let de = &mut serde_json::Deserializer::from_str(raw);
		let config: Self = serde_path_to_error::deserialize(de)
			.map_err(|source| StorefrontConfigError::Parse { source })?;

		config.validate()?;

		Ok(config)
	}

	/// Reads, parses, and validates a JSON file.
	pub fn from_path(path: impl AsRef<Path>) -> Result<Self, StorefrontConfigError> {
		let path = path.as_ref();
		let raw = fs::read_to_string(path).map_err(|e| StorefrontConfigError::Read {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		Self::from_json_str(&raw)
	}
}

fn default_currency() -> String {
	"USD".into()
}

fn default_locale() -> String {
	"en-US".into()
}
