// std
use std::net::IpAddr;
// self
use crate::{
	_prelude::*,
	config::{Dialect, StorefrontConfig, default_currency, default_locale},
};

/// Errors raised while constructing or validating configurations.
#[derive(Debug, ThisError)]
pub enum StorefrontConfigError {
	/// A required value was never supplied.
	#[error("Missing required value `{field}`.")]
	MissingField {
		/// Name of the missing field.
		field: &'static str,
	},
	/// An organization, site, or client identifier is empty or contains whitespace.
	#[error("The `{field}` value must be non-empty and free of whitespace.")]
	InvalidIdentifier {
		/// Name of the offending field.
		field: &'static str,
	},
	/// Endpoints must use HTTPS unless they point at a loopback host.
	#[error("The {endpoint} URL must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which URL failed validation.
		endpoint: &'static str,
		/// URL that failed validation.
		url: String,
	},
	/// The OCAPI dialect needs a version segment.
	#[error("The OCAPI dialect requires a version.")]
	MissingDialectVersion,
	/// JSON document could not be decoded.
	#[error("Configuration document is invalid.")]
	Parse {
		/// Structured parsing failure naming the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Configuration file could not be read.
	#[error("{message}")]
	Read {
		/// Human-readable error payload.
		message: String,
	},
}

/// Builder for [`StorefrontConfig`] values.
#[derive(Debug, Default)]
pub struct StorefrontConfigBuilder {
	api_origin: Option<Url>,
	organization_id: Option<String>,
	site_id: Option<String>,
	client_id: Option<String>,
	redirect_uri: Option<Url>,
	currency: Option<String>,
	locale: Option<String>,
	basket_dialect: Dialect,
}
impl StorefrontConfigBuilder {
	/// Creates an empty builder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the API origin.
	pub fn api_origin(mut self, url: Url) -> Self {
		self.api_origin = Some(url);

		self
	}

	/// Sets the organization identifier.
	pub fn organization_id(mut self, value: impl Into<String>) -> Self {
		self.organization_id = Some(value.into());

		self
	}

	/// Sets the site identifier.
	pub fn site_id(mut self, value: impl Into<String>) -> Self {
		self.site_id = Some(value.into());

		self
	}

	/// Sets the public client identifier.
	pub fn client_id(mut self, value: impl Into<String>) -> Self {
		self.client_id = Some(value.into());

		self
	}

	/// Sets the authorization callback URI.
	pub fn redirect_uri(mut self, url: Url) -> Self {
		self.redirect_uri = Some(url);

		self
	}

	/// Overrides the basket currency (defaults to `USD`).
	pub fn currency(mut self, value: impl Into<String>) -> Self {
		self.currency = Some(value.into());

		self
	}

	/// Overrides the catalog locale (defaults to `en-US`).
	pub fn locale(mut self, value: impl Into<String>) -> Self {
		self.locale = Some(value.into());

		self
	}

	/// Selects the dialect spoken by basket and order resources.
	pub fn basket_dialect(mut self, dialect: Dialect) -> Self {
		self.basket_dialect = dialect;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<StorefrontConfig, StorefrontConfigError> {
		let config = StorefrontConfig {
			api_origin: self
				.api_origin
				.ok_or(StorefrontConfigError::MissingField { field: "api_origin" })?,
			organization_id: self
				.organization_id
				.ok_or(StorefrontConfigError::MissingField { field: "organization_id" })?,
			site_id: self.site_id.ok_or(StorefrontConfigError::MissingField { field: "site_id" })?,
			client_id: self
				.client_id
				.ok_or(StorefrontConfigError::MissingField { field: "client_id" })?,
			redirect_uri: self
				.redirect_uri
				.ok_or(StorefrontConfigError::MissingField { field: "redirect_uri" })?,
			currency: self.currency.unwrap_or_else(default_currency),
			locale: self.locale.unwrap_or_else(default_locale),
			basket_dialect: self.basket_dialect,
		};

		config.validate()?;

		Ok(config)
	}
}

impl StorefrontConfig {
	/// Validates invariants for the configuration.
	pub(crate) fn validate(&self) -> Result<(), StorefrontConfigError> {
		validate_identifier("organization_id", &self.organization_id)?;
		validate_identifier("site_id", &self.site_id)?;
		validate_identifier("client_id", &self.client_id)?;
		validate_endpoint("api_origin", &self.api_origin)?;
		validate_endpoint("redirect_uri", &self.redirect_uri)?;

		if let Dialect::Ocapi { version } = &self.basket_dialect
			&& version.trim().is_empty()
		{
			return Err(StorefrontConfigError::MissingDialectVersion);
		}

		Ok(())
	}
}

fn validate_identifier(field: &'static str, value: &str) -> Result<(), StorefrontConfigError> {
	if value.is_empty() || value.chars().any(char::is_whitespace) {
		Err(StorefrontConfigError::InvalidIdentifier { field })
	} else {
		Ok(())
	}
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), StorefrontConfigError> {
	if url.scheme() == "https" || is_loopback(url) {
		Ok(())
	} else {
		Err(StorefrontConfigError::InsecureEndpoint { endpoint: name, url: url.to_string() })
	}
}

fn is_loopback(url: &Url) -> bool {
	match url.host_str() {
		Some("localhost") => true,
		Some(host) => host
			.trim_start_matches('[')
			.trim_end_matches(']')
			.parse::<IpAddr>()
			.is_ok_and(|ip| ip.is_loopback()),
		None => false,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Failed to parse fixture URL.")
	}

	fn complete() -> StorefrontConfigBuilder {
		StorefrontConfig::builder()
			.api_origin(url("https://kv7kzm78.api.commercecloud.salesforce.com"))
			.organization_id("f_ecom_zzrf_001")
			.site_id("RefArch")
			.client_id("c9c45bfd-0ed3-4aa2-9971-40f88962b836")
			.redirect_uri(url("https://shop.example.com/callback"))
	}

	#[test]
	fn builder_rejects_missing_and_insecure_values() {
		let err = StorefrontConfig::builder()
			.site_id("RefArch")
			.build()
			.expect_err("Builder should reject a missing origin.");

		assert!(matches!(err, StorefrontConfigError::MissingField { field: "api_origin" }));

		let err = complete()
			.api_origin(url("http://api.example.com"))
			.build()
			.expect_err("Builder should reject plain HTTP origins.");

		assert!(matches!(err, StorefrontConfigError::InsecureEndpoint { endpoint: "api_origin", .. }));

		let err = complete().site_id("Ref Arch").build().expect_err("Whitespace must be rejected.");

		assert!(matches!(err, StorefrontConfigError::InvalidIdentifier { field: "site_id" }));
	}

	#[test]
	fn loopback_hosts_may_use_plain_http() {
		let config = complete()
			.api_origin(url("http://127.0.0.1:8080"))
			.redirect_uri(url("http://localhost:3000/callback"))
			.currency("GBP")
			.build()
			.expect("Loopback endpoints should be accepted.");

		assert_eq!(config.currency, "GBP");
		assert_eq!(config.locale, "en-US");
	}

	#[test]
	fn ocapi_dialect_requires_version() {
		let err = complete()
			.basket_dialect(Dialect::Ocapi { version: " ".into() })
			.build()
			.expect_err("Blank OCAPI version should be rejected.");

		assert!(matches!(err, StorefrontConfigError::MissingDialectVersion));
	}
}
