//! Typed commerce API surface.
//!
//! [`CommerceClient`] owns the transport and configuration and dispatches raw
//! [`ApiRequest`]s. [`Api`] layers the auth coordinator and the request interceptor on top
//! and hands out one typed resource per shopper API ([`ShopperBaskets`],
//! [`ShopperCustomers`], [`ShopperProducts`], [`ShopperOrders`]); the login bootstrap
//! resource ([`ShopperLogin`]) hangs off the bare client so it never passes through the
//! interceptor.

pub mod baskets;
pub mod case;
pub mod customers;
pub mod login;
pub mod orders;
pub mod products;
pub mod shape;
pub mod transport;

pub use baskets::ShopperBaskets;
pub use customers::ShopperCustomers;
pub use login::ShopperLogin;
pub use oauth2::http::Method;
pub use orders::ShopperOrders;
pub use products::ShopperProducts;
pub use shape::{ApiError, is_error};
#[cfg(feature = "reqwest")] pub use transport::ReqwestTransportErrorMapper;
pub use transport::TransportErrorMapper;

// crates.io
use oauth2::{
	AsyncHttpClient, HttpRequest,
	http::header::{CONTENT_TYPE, LOCATION},
};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	config::{Dialect, StorefrontConfig},
	error::{ConfigError, TransientError},
	flows::AuthCoordinator,
	http::{CommerceHttpClient, ResponseMetadataSlot},
	obs::{self, FlowKind, FlowOutcome},
	store::SessionStore,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// API facade specialized for the crate's default reqwest transport stack.
pub type ReqwestApi = Api<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Shopper API families; each has its own base path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ApiFamily {
	/// Identity provider (guest/registered logins, token exchange).
	Login,
	/// Basket resources.
	Baskets,
	/// Order resources.
	Orders,
	/// Customer profile, customer baskets, and product lists.
	Customers,
	/// Catalog reads.
	Products,
}

/// Vendor SDK operations addressable through the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Operation {
	AuthorizeCustomer,
	AuthenticateCustomer,
	GetAccessToken,
	GetCustomer,
	GetCustomerBaskets,
	GetCustomerProductLists,
	GetCustomerProductList,
	CreateCustomerProductList,
	CreateCustomerProductListItem,
	UpdateCustomerProductListItem,
	DeleteCustomerProductListItem,
	CreateBasket,
	GetBasket,
	DeleteBasket,
	MergeBasket,
	AddItemToBasket,
	RemoveItemFromBasket,
	UpdateItemInBasket,
	UpdateCustomerForBasket,
	UpdateShippingAddressForShipment,
	UpdateShippingMethodForShipment,
	GetShippingMethodsForShipment,
	UpdateBillingAddressForBasket,
	AddPaymentInstrumentToBasket,
	RemovePaymentInstrumentFromBasket,
	AddCouponToBasket,
	RemoveCouponFromBasket,
	CreateOrder,
	GetProducts,
	GetProduct,
	GetCategory,
}
impl Operation {
	/// Returns the SDK method name for the operation.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::AuthorizeCustomer => "authorizeCustomer",
			Self::AuthenticateCustomer => "authenticateCustomer",
			Self::GetAccessToken => "getAccessToken",
			Self::GetCustomer => "getCustomer",
			Self::GetCustomerBaskets => "getCustomerBaskets",
			Self::GetCustomerProductLists => "getCustomerProductLists",
			Self::GetCustomerProductList => "getCustomerProductList",
			Self::CreateCustomerProductList => "createCustomerProductList",
			Self::CreateCustomerProductListItem => "createCustomerProductListItem",
			Self::UpdateCustomerProductListItem => "updateCustomerProductListItem",
			Self::DeleteCustomerProductListItem => "deleteCustomerProductListItem",
			Self::CreateBasket => "createBasket",
			Self::GetBasket => "getBasket",
			Self::DeleteBasket => "deleteBasket",
			Self::MergeBasket => "mergeBasket",
			Self::AddItemToBasket => "addItemToBasket",
			Self::RemoveItemFromBasket => "removeItemFromBasket",
			Self::UpdateItemInBasket => "updateItemInBasket",
			Self::UpdateCustomerForBasket => "updateCustomerForBasket",
			Self::UpdateShippingAddressForShipment => "updateShippingAddressForShipment",
			Self::UpdateShippingMethodForShipment => "updateShippingMethodForShipment",
			Self::GetShippingMethodsForShipment => "getShippingMethodsForShipment",
			Self::UpdateBillingAddressForBasket => "updateBillingAddressForBasket",
			Self::AddPaymentInstrumentToBasket => "addPaymentInstrumentToBasket",
			Self::RemovePaymentInstrumentFromBasket => "removePaymentInstrumentFromBasket",
			Self::AddCouponToBasket => "addCouponToBasket",
			Self::RemoveCouponFromBasket => "removeCouponFromBasket",
			Self::CreateOrder => "createOrder",
			Self::GetProducts => "getProducts",
			Self::GetProduct => "getProduct",
			Self::GetCategory => "getCategory",
		}
	}

	/// Returns `true` for the calls that mint tokens and therefore bypass the interceptor.
	pub const fn is_auth_bootstrap(self) -> bool {
		matches!(self, Self::AuthorizeCustomer | Self::AuthenticateCustomer | Self::GetAccessToken)
	}

	/// API family the operation belongs to.
	pub const fn family(self) -> ApiFamily {
		match self {
			Self::AuthorizeCustomer | Self::AuthenticateCustomer | Self::GetAccessToken =>
				ApiFamily::Login,
			Self::GetCustomer
			| Self::GetCustomerBaskets
			| Self::GetCustomerProductLists
			| Self::GetCustomerProductList
			| Self::CreateCustomerProductList
			| Self::CreateCustomerProductListItem
			| Self::UpdateCustomerProductListItem
			| Self::DeleteCustomerProductListItem => ApiFamily::Customers,
			Self::CreateOrder => ApiFamily::Orders,
			Self::GetProducts | Self::GetProduct | Self::GetCategory => ApiFamily::Products,
			_ => ApiFamily::Baskets,
		}
	}
}
impl Display for Operation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Request payload encodings.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ApiBody {
	#[default]
	/// No body.
	Empty,
	/// JSON document.
	Json(Value),
	/// `application/x-www-form-urlencoded` pairs.
	Form(Vec<(String, String)>),
}

/// One outbound call, described independently of the transport.
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// SDK operation being invoked.
	pub operation: Operation,
	/// HTTP method.
	pub method: Method,
	/// Path relative to the operation family's base path.
	pub path: String,
	/// Extra query parameters (the site id is appended automatically).
	pub query: Vec<(String, String)>,
	/// Caller-supplied headers.
	pub headers: BTreeMap<String, String>,
	/// Request payload.
	pub body: ApiBody,
	/// Skips both interceptor hooks, returning the raw response.
	pub ignore_hooks: bool,
}
impl ApiRequest {
	/// Creates a request without query, headers, or body.
	pub fn new(operation: Operation, method: Method, path: impl Into<String>) -> Self {
		Self {
			operation,
			method,
			path: path.into(),
			query: Vec::new(),
			headers: BTreeMap::new(),
			body: ApiBody::Empty,
			ignore_hooks: false,
		}
	}

	/// Appends a query parameter.
	pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.push((key.into(), value.into()));

		self
	}

	/// Sets a caller header.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.insert(name.into(), value.into());

		self
	}

	/// Sets a JSON body.
	pub fn json(mut self, body: Value) -> Self {
		self.body = ApiBody::Json(body);

		self
	}

	/// Serializes `value` into the JSON body.
	pub fn json_of<T>(self, value: &T) -> Result<Self>
	where
		T: ?Sized + Serialize,
	{
		let body = serde_json::to_value(value)
			.map_err(|source| ConfigError::RequestBody { operation: self.operation, source })?;

		Ok(self.json(body))
	}

	/// Sets a form body.
	pub fn form(mut self, pairs: Vec<(String, String)>) -> Self {
		self.body = ApiBody::Form(pairs);

		self
	}

	/// Marks the request as raw: no auth pre-hook and no error post-hook.
	pub fn ignore_hooks(mut self) -> Self {
		self.ignore_hooks = true;

		self
	}
}

/// Decoded response of an [`ApiRequest`].
#[derive(Clone, Debug)]
pub struct ApiResponse {
	/// Operation that produced the response.
	pub operation: Operation,
	/// HTTP status code.
	pub status: u16,
	/// `Location` header, present on login redirects.
	pub location: Option<String>,
	/// Parsed JSON body; `Null` when empty, a string when the body was not JSON.
	pub body: Value,
	/// Retry-After hint, if any.
	pub retry_after: Option<Duration>,
}
impl ApiResponse {
	/// Returns `true` for 2xx/3xx statuses.
	pub fn is_success(&self) -> bool {
		self.status < 400
	}

	/// Decodes the body into `T`, naming the offending field on failure.
	pub fn decode<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		serde_path_to_error::deserialize(self.body.clone()).map_err(|source| {
			TransientError::ResponseParse {
				operation: self.operation,
				source,
				status: Some(self.status),
			}
			.into()
		})
	}
}

/// Owns the transport, error mapper, and configuration shared by every call.
pub struct CommerceClient<C, M>
where
	C: ?Sized + CommerceHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP client wrapper used for every outbound request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	/// Storefront configuration.
	pub config: StorefrontConfig,
}
impl<C, M> CommerceClient<C, M>
where
	C: ?Sized + CommerceHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a client that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		config: StorefrontConfig,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self { http_client: http_client.into(), transport_mapper: mapper.into(), config }
	}

	/// Login bootstrap resource; its calls never pass through the interceptor.
	pub fn login(&self) -> ShopperLogin<'_, C, M> {
		ShopperLogin::new(self)
	}

	/// Sends a request without any auth handling.
	pub async fn dispatch(&self, request: ApiRequest) -> Result<ApiResponse> {
		let operation = request.operation;
		let dialect = self.dialect(operation.family());
		let http_request = self.build_http_request(request, &dialect)?;
		let meta = ResponseMetadataSlot::default();
		let handle = self.http_client.with_metadata(meta.clone());
		let response = handle.call(http_request).await.map_err(|err| {
			obs::record_flow_outcome(FlowKind::Dispatch, FlowOutcome::Failure);

			self.transport_mapper.map_transport_error(operation, meta.take().as_ref(), err)
		})?;
		let retry_after = meta.take().and_then(|value| value.retry_after);
		let status = response.status().as_u16();
		let location = response
			.headers()
			.get(LOCATION)
			.and_then(|value| value.to_str().ok())
			.map(str::to_owned);
		let mut body = parse_body(response.body());

		if !matches!(dialect, Dialect::Scapi) {
			body = case::keys_to_camel(shape::convert_fault(body));
		}

		Ok(ApiResponse { operation, status, location, body, retry_after })
	}

	fn dialect(&self, family: ApiFamily) -> Dialect {
		match family {
			ApiFamily::Baskets | ApiFamily::Orders => self.config.basket_dialect.clone(),
			_ => Dialect::Scapi,
		}
	}

	fn base_path(&self, family: ApiFamily, dialect: &Dialect) -> String {
		let org = &self.config.organization_id;

		match (family, dialect) {
			(ApiFamily::Baskets | ApiFamily::Orders, Dialect::Ocapi { version }) =>
				format!("/s/{}/dw/shop/{version}", self.config.site_id),
			(ApiFamily::Login, _) => format!("/shopper/auth/v1/organizations/{org}"),
			(ApiFamily::Baskets, _) => format!("/checkout/shopper-baskets/v1/organizations/{org}"),
			(ApiFamily::Orders, _) => format!("/checkout/shopper-orders/v1/organizations/{org}"),
			(ApiFamily::Customers, _) =>
				format!("/customer/shopper-customers/v1/organizations/{org}"),
			(ApiFamily::Products, _) => format!("/product/shopper-products/v1/organizations/{org}"),
		}
	}

	fn build_http_request(&self, request: ApiRequest, dialect: &Dialect) -> Result<HttpRequest> {
		let ApiRequest { operation, method, path, query, headers, body, .. } = request;
		let family = operation.family();
		let origin = self.config.api_origin.as_str().trim_end_matches('/');
		let raw = format!("{origin}{}{path}", self.base_path(family, dialect));
		let mut url = Url::parse(&raw)
			.map_err(|source| ConfigError::InvalidRequestUrl { operation, source })?;

		{
			let mut pairs = url.query_pairs_mut();

			for (key, value) in &query {
				pairs.append_pair(key, value);
			}
			if family != ApiFamily::Login && matches!(dialect, Dialect::Scapi) {
				pairs.append_pair("siteId", &self.config.site_id);
			}
		}

		if url.query() == Some("") {
			url.set_query(None);
		}

		let mut builder = oauth2::http::Request::builder().method(method).uri(url.as_str());

		for (name, value) in &headers {
			builder = builder.header(name.as_str(), value.as_str());
		}

		let bytes = match body {
			ApiBody::Empty => Vec::new(),
			ApiBody::Json(value) => {
				let value = match dialect {
					Dialect::Scapi => value,
					Dialect::Ocapi { .. } => case::keys_to_snake(value),
				};

				builder = builder.header(CONTENT_TYPE, "application/json");

				value.to_string().into_bytes()
			},
			ApiBody::Form(pairs) => {
				builder = builder.header(CONTENT_TYPE, "application/x-www-form-urlencoded");

				url::form_urlencoded::Serializer::new(String::new())
					.extend_pairs(pairs)
					.finish()
					.into_bytes()
			},
		};

		Ok(builder.body(bytes).map_err(ConfigError::from)?)
	}
}
#[cfg(feature = "reqwest")]
impl CommerceClient<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a client backed by a reqwest transport that does not follow redirects.
	pub fn new(config: StorefrontConfig) -> Result<Self> {
		Ok(Self::with_http_client(
			config,
			ReqwestHttpClient::new()?,
			Arc::new(ReqwestTransportErrorMapper),
		))
	}
}
impl<C, M> Debug for CommerceClient<C, M>
where
	C: ?Sized + CommerceHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CommerceClient").field("config", &self.config).finish()
	}
}

/// Auth-aware API facade: the auth coordinator plus the interceptor-wrapped resources.
pub struct Api<C, M>
where
	C: ?Sized + CommerceHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	client: Arc<CommerceClient<C, M>>,
	auth: Arc<AuthCoordinator<C, M>>,
}
impl<C, M> Api<C, M>
where
	C: ?Sized + CommerceHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Wires a client to a session store.
	pub fn new(client: Arc<CommerceClient<C, M>>, store: Arc<dyn SessionStore>) -> Self {
		let auth = Arc::new(AuthCoordinator::new(client.clone(), store));

		Self { client, auth }
	}

	/// Underlying client.
	pub fn client(&self) -> &CommerceClient<C, M> {
		&self.client
	}

	/// Storefront configuration.
	pub fn config(&self) -> &StorefrontConfig {
		&self.client.config
	}

	/// Auth coordinator shared by every resource.
	pub fn auth(&self) -> &AuthCoordinator<C, M> {
		&self.auth
	}

	/// Basket resource.
	pub fn baskets(&self) -> ShopperBaskets<'_, C, M> {
		ShopperBaskets::new(self)
	}

	/// Customer resource.
	pub fn customers(&self) -> ShopperCustomers<'_, C, M> {
		ShopperCustomers::new(self)
	}

	/// Catalog resource.
	pub fn products(&self) -> ShopperProducts<'_, C, M> {
		ShopperProducts::new(self)
	}

	/// Order resource.
	pub fn orders(&self) -> ShopperOrders<'_, C, M> {
		ShopperOrders::new(self)
	}
}
#[cfg(feature = "reqwest")]
impl Api<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Builds a reqwest-backed facade for `config` persisting into `store`.
	pub fn from_config(config: StorefrontConfig, store: Arc<dyn SessionStore>) -> Result<Self> {
		Ok(Self::new(Arc::new(CommerceClient::new(config)?), store))
	}
}
impl<C, M> Debug for Api<C, M>
where
	C: ?Sized + CommerceHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Api").field("client", &self.client).finish()
	}
}

fn parse_body(bytes: &[u8]) -> Value {
	if bytes.iter().all(u8::is_ascii_whitespace) {
		return Value::Null;
	}

	serde_json::from_slice(bytes)
		.unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}
