//! In-process fake commerce backend for integration tests.
//!
//! [`FakeCommerce`] implements the crate's transport trait and answers the shopper login,
//! basket, order, customer, and product resources from in-memory state. It verifies PKCE,
//! tracks which guest a registered login came from (so basket merges work), and records
//! every call for assertions.

#![allow(dead_code)]

// std
use std::{
	collections::{HashMap, HashSet},
	io,
	sync::Arc,
	time::Duration as StdDuration,
};
// crates.io
use base64::{
	Engine as _,
	engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
};
use oauth2::{
	AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse,
	http::header::{AUTHORIZATION, LOCATION},
};
use parking_lot::Mutex;
use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;
use url::Url;
// self
use commerce_session::{
	api::{Api, CommerceClient, Operation, TransportErrorMapper},
	config::StorefrontConfig,
	error::{Error, TransportError},
	http::{CommerceHttpClient, ResponseMetadata, ResponseMetadataSlot},
	store::{MemoryStore, SessionStore},
};

pub const ORIGIN: &str = "https://commerce.test";
pub const ORGANIZATION_ID: &str = "f_ecom_test";
pub const SITE_ID: &str = "RefArch";
pub const CLIENT_ID: &str = "storefront-client";
pub const REDIRECT_URI: &str = "https://shop.test/callback";

pub const SHOPPER_EMAIL: &str = "ada@example.com";
pub const SHOPPER_PASSWORD: &str = "correct horse";

/// Facade type wired to the fake backend.
pub type FakeApi = Api<FakeCommerce, FakeTransportErrorMapper>;

/// One recorded request.
#[derive(Clone, Debug)]
pub struct Call {
	pub method: String,
	pub path: String,
	pub query: Vec<(String, String)>,
	pub authorization: Option<String>,
}
impl Call {
	pub fn query(&self, key: &str) -> Option<&str> {
		param(&self.query, key)
	}
}

/// Transport backed by [`Backend`].
#[derive(Clone, Default)]
pub struct FakeCommerce {
	backend: Arc<Mutex<Backend>>,
}
impl FakeCommerce {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers the default shopper account and returns its customer id.
	pub fn with_shopper(self) -> (Self, String) {
		let customer_id = self.add_account(SHOPPER_EMAIL, SHOPPER_PASSWORD);

		(self, customer_id)
	}

	pub fn add_account(&self, email: &str, password: &str) -> String {
		let mut backend = self.backend.lock();
		let customer_id = backend.next("registered");

		backend.accounts.insert(
			email.to_owned(),
			Account {
				email: email.to_owned(),
				password: password.to_owned(),
				customer_id: customer_id.clone(),
			},
		);

		customer_id
	}

	/// Delays every identity endpoint response so concurrent logins overlap.
	pub fn set_auth_delay(&self, delay: StdDuration) {
		self.backend.lock().auth_delay = delay;
	}

	/// Lifetime of minted access tokens, in seconds.
	pub fn set_token_lifetime(&self, seconds: i64) {
		self.backend.lock().token_lifetime = seconds;
	}

	/// Makes the guest authorize endpoint answer with `status`.
	pub fn reject_guest_authorize(&self, status: Option<u16>) {
		self.backend.lock().guest_authorize_status = status;
	}

	/// Forgets every refresh token, as after a server-side revocation.
	pub fn revoke_refresh_tokens(&self) {
		self.backend.lock().refresh_tokens.clear();
	}

	/// Makes `getProducts` answer 503 whenever the batch contains `id`.
	pub fn set_product_unavailable(&self, id: &str, unavailable: bool) {
		let mut backend = self.backend.lock();

		if unavailable {
			backend.unavailable_products.insert(id.to_owned());
		} else {
			backend.unavailable_products.remove(id);
		}
	}

	pub fn fail_payment_removal(&self, fail: bool) {
		self.backend.lock().fail_payment_removal = fail;
	}

	pub fn calls(&self) -> Vec<Call> {
		self.backend.lock().calls.clone()
	}

	/// Calls whose path ends with `suffix`.
	pub fn calls_to(&self, suffix: &str) -> Vec<Call> {
		self.calls().into_iter().filter(|call| call.path.ends_with(suffix)).collect()
	}

	pub fn clear_calls(&self) {
		self.backend.lock().calls.clear();
	}

	/// Sizes of every `getProducts` batch, in call order.
	pub fn product_batches(&self) -> Vec<usize> {
		self.backend.lock().product_batches.clone()
	}

	/// Server-side baskets owned by `customer_id`.
	pub fn baskets_of(&self, customer_id: &str) -> Vec<Value> {
		self.backend.lock().baskets_of(customer_id)
	}

	/// Total number of baskets the server holds.
	pub fn basket_count(&self) -> usize {
		self.backend.lock().baskets.len()
	}

	/// Server-side product lists owned by `customer_id`.
	pub fn lists_of(&self, customer_id: &str) -> Vec<Value> {
		self.backend.lock().lists.get(customer_id).cloned().unwrap_or_default()
	}

	/// Stores a product list for `customer_id` directly.
	pub fn seed_list(&self, customer_id: &str, name: &str, list_type: &str) -> String {
		let mut backend = self.backend.lock();
		let id = backend.next("list");

		backend.lists.entry(customer_id.to_owned()).or_default().push(json!({
			"id": id,
			"name": name,
			"type": list_type,
			"customerProductListItems": [],
		}));

		id
	}
}
impl CommerceHttpClient for FakeCommerce {
	type Handle = FakeHandle;
	type TransportError = io::Error;

	fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle {
		FakeHandle { backend: self.backend.clone(), slot }
	}
}

/// Per-request handle publishing response metadata.
pub struct FakeHandle {
	backend: Arc<Mutex<Backend>>,
	slot: ResponseMetadataSlot,
}
impl<'c> AsyncHttpClient<'c> for FakeHandle {
	type Error = HttpClientError<io::Error>;
	type Future = std::pin::Pin<
		Box<dyn std::future::Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send>,
	>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let backend = self.backend.clone();
		let slot = self.slot.clone();

		Box::pin(async move {
			slot.take();

			let delay = backend.lock().delay_for(&request);

			if !delay.is_zero() {
				tokio::time::sleep(delay).await;
			}

			let reply = backend.lock().handle(&request);

			slot.store(ResponseMetadata { status: Some(reply.status), retry_after: None });

			let mut builder = oauth2::http::Response::builder().status(reply.status);

			if let Some(location) = &reply.location {
				builder = builder.header(LOCATION, location.as_str());
			}

			let bytes = match reply.body {
				Value::Null => Vec::new(),
				body => body.to_string().into_bytes(),
			};

			builder.body(bytes).map_err(HttpClientError::Http)
		})
	}
}

/// Maps the fake's (never emitted) transport errors.
#[derive(Clone, Debug, Default)]
pub struct FakeTransportErrorMapper;
impl TransportErrorMapper<io::Error> for FakeTransportErrorMapper {
	fn map_transport_error(
		&self,
		operation: Operation,
		_: Option<&ResponseMetadata>,
		error: HttpClientError<io::Error>,
	) -> Error {
		TransportError::network(operation, error).into()
	}
}

/// Facade, store, and backend handle for one test.
pub struct Harness {
	pub fake: FakeCommerce,
	pub store: Arc<MemoryStore>,
	pub api: Arc<FakeApi>,
}

pub fn config() -> StorefrontConfig {
	StorefrontConfig::builder()
		.api_origin(Url::parse(ORIGIN).expect("Origin fixture should parse."))
		.organization_id(ORGANIZATION_ID)
		.site_id(SITE_ID)
		.client_id(CLIENT_ID)
		.redirect_uri(Url::parse(REDIRECT_URI).expect("Redirect fixture should parse."))
		.currency("USD")
		.locale("en-US")
		.build()
		.expect("Storefront config fixture should build.")
}

pub fn harness(fake: FakeCommerce) -> Harness {
	harness_with_store(fake, Arc::new(MemoryStore::default()))
}

pub fn harness_with_store(fake: FakeCommerce, store: Arc<MemoryStore>) -> Harness {
	let client = CommerceClient::<FakeCommerce, FakeTransportErrorMapper>::with_http_client(
		config(),
		fake.clone(),
		FakeTransportErrorMapper,
	);
	let shared: Arc<dyn SessionStore> = store.clone();
	let api = Arc::new(Api::new(Arc::new(client), shared));

	Harness { fake, store, api }
}

/// Unsigned JWT whose claims start `issued_ago` seconds in the past.
pub fn access_token(customer_id: &str, issued_ago: i64, lifetime: i64) -> String {
	let iat = OffsetDateTime::now_utc().unix_timestamp() - issued_ago;
	let header = URL_SAFE_NO_PAD.encode(json!({ "alg": "none" }).to_string());
	let claims = URL_SAFE_NO_PAD.encode(
		json!({ "iat": iat, "exp": iat + lifetime, "sub": customer_id }).to_string(),
	);

	format!("{header}.{claims}.sig")
}

struct Account {
	email: String,
	password: String,
	customer_id: String,
}

struct PendingCode {
	customer_id: String,
	registered: bool,
	usid: String,
	challenge: String,
}

struct Reply {
	status: u16,
	location: Option<String>,
	body: Value,
}
impl Reply {
	fn json(status: u16, body: Value) -> Self {
		Self { status, location: None, body }
	}

	fn ok(body: Value) -> Self {
		Self::json(200, body)
	}

	fn no_content() -> Self {
		Self::json(204, Value::Null)
	}

	fn redirect(location: String) -> Self {
		Self { status: 303, location: Some(location), body: Value::Null }
	}

	fn problem(status: u16, title: &str, kind: &str, detail: &str) -> Self {
		Self::json(status, json!({ "title": title, "type": kind, "detail": detail }))
	}

	fn oauth_error(status: u16, error: &str, description: &str) -> Self {
		Self::json(status, json!({ "error": error, "error_description": description }))
	}

	fn not_found() -> Self {
		Self::problem(404, "Not Found", "not-found", "No such resource.")
	}
}

struct Backend {
	sequence: u64,
	calls: Vec<Call>,
	access_tokens: HashMap<String, String>,
	refresh_tokens: HashMap<String, String>,
	codes: HashMap<String, PendingCode>,
	guests_by_usid: HashMap<String, String>,
	accounts: HashMap<String, Account>,
	merge_sources: HashMap<String, String>,
	baskets: Vec<Value>,
	lists: HashMap<String, Vec<Value>>,
	product_batches: Vec<usize>,
	token_lifetime: i64,
	auth_delay: StdDuration,
	guest_authorize_status: Option<u16>,
	fail_payment_removal: bool,
	unavailable_products: HashSet<String>,
}
impl Default for Backend {
	fn default() -> Self {
		Self {
			sequence: 0,
			calls: Vec::new(),
			access_tokens: HashMap::new(),
			refresh_tokens: HashMap::new(),
			codes: HashMap::new(),
			guests_by_usid: HashMap::new(),
			accounts: HashMap::new(),
			merge_sources: HashMap::new(),
			baskets: Vec::new(),
			lists: HashMap::new(),
			product_batches: Vec::new(),
			token_lifetime: 1_800,
			auth_delay: StdDuration::ZERO,
			guest_authorize_status: None,
			fail_payment_removal: false,
			unavailable_products: HashSet::new(),
		}
	}
}
impl Backend {
	fn next(&mut self, prefix: &str) -> String {
		self.sequence += 1;

		format!("{prefix}-{}", self.sequence)
	}

	fn delay_for(&self, request: &HttpRequest) -> StdDuration {
		if request.uri().path().contains("/oauth2/") {
			self.auth_delay
		} else {
			StdDuration::ZERO
		}
	}

	fn handle(&mut self, request: &HttpRequest) -> Reply {
		let url = Url::parse(&request.uri().to_string()).expect("Request URI should be absolute.");
		let query = url.query_pairs().into_owned().collect::<Vec<_>>();
		let authorization = request
			.headers()
			.get(AUTHORIZATION)
			.and_then(|value| value.to_str().ok())
			.map(str::to_owned);
		let method = request.method().as_str().to_owned();

		self.calls.push(Call {
			method: method.clone(),
			path: url.path().to_owned(),
			query: query.clone(),
			authorization: authorization.clone(),
		});

		let segments = url.path_segments().map(|parts| parts.collect::<Vec<_>>()).unwrap_or_default();
		let body = request.body();

		match segments.as_slice() {
			["shopper", "auth", "v1", "organizations", org, rest @ ..] if *org == ORGANIZATION_ID =>
				self.auth(&method, rest, &query, authorization.as_deref(), body),
			[_, resource, "v1", "organizations", org, rest @ ..] if *org == ORGANIZATION_ID => {
				if param(&query, "siteId") != Some(SITE_ID) {
					return Reply::problem(400, "Bad Request", "missing-site-id", "siteId is required.");
				}

				let Some(customer_id) = authorization
					.as_deref()
					.and_then(|header| header.strip_prefix("Bearer "))
					.and_then(|token| self.access_tokens.get(token))
					.cloned()
				else {
					return Reply::problem(
						401,
						"Unauthorized",
						"unauthorized",
						"The request is not authorized.",
					);
				};
				let payload = serde_json::from_slice::<Value>(body).unwrap_or(Value::Null);

				match *resource {
					"shopper-baskets" => self.baskets(&method, rest, &customer_id, payload),
					"shopper-orders" => self.orders(&method, rest, &customer_id, payload),
					"shopper-customers" => self.customers(&method, rest, &customer_id, payload),
					"shopper-products" => self.products(&method, rest, &query),
					_ => Reply::not_found(),
				}
			},
			_ => Reply::not_found(),
		}
	}

	fn auth(
		&mut self,
		method: &str,
		rest: &[&str],
		query: &[(String, String)],
		authorization: Option<&str>,
		body: &[u8],
	) -> Reply {
		let form = url::form_urlencoded::parse(body).into_owned().collect::<Vec<_>>();

		match (method, rest) {
			("GET", ["oauth2", "authorize"]) => self.authorize(query),
			("POST", ["oauth2", "login"]) => self.login(authorization, &form),
			("POST", ["oauth2", "token"]) => self.token(&form),
			_ => Reply::not_found(),
		}
	}

	fn authorize(&mut self, query: &[(String, String)]) -> Reply {
		if let Some(status) = self.guest_authorize_status {
			return Reply::oauth_error(status, "unauthorized_client", "Guest access rejected.");
		}
		if param(query, "hint") != Some("guest") || param(query, "client_id") != Some(CLIENT_ID) {
			return Reply::oauth_error(400, "invalid_request", "Unsupported authorize request.");
		}

		let (Some(challenge), Some(redirect)) =
			(param(query, "code_challenge"), param(query, "redirect_uri"))
		else {
			return Reply::oauth_error(400, "invalid_request", "PKCE parameters are required.");
		};
		let (challenge, redirect) = (challenge.to_owned(), redirect.to_owned());
		let usid = match param(query, "usid") {
			Some(usid) => usid.to_owned(),
			None => self.next("usid"),
		};
		let customer_id = match self.guests_by_usid.get(&usid) {
			Some(id) => id.clone(),
			None => {
				let id = self.next("guest");

				self.guests_by_usid.insert(usid.clone(), id.clone());

				id
			},
		};

		self.issue_code(customer_id, false, usid, challenge, &redirect)
	}

	fn login(&mut self, authorization: Option<&str>, form: &[(String, String)]) -> Reply {
		let pair = authorization
			.and_then(|header| header.strip_prefix("Basic "))
			.and_then(|raw| STANDARD.decode(raw).ok())
			.and_then(|bytes| String::from_utf8(bytes).ok());
		let Some((email, password)) = pair.as_deref().and_then(|pair| pair.split_once(':')) else {
			return Reply::oauth_error(401, "invalid_client", "Basic credentials are required.");
		};
		let Some(account) =
			self.accounts.get(email).filter(|account| account.password == password)
		else {
			return Reply::oauth_error(401, "invalid_credentials", "Invalid credentials.");
		};
		let customer_id = account.customer_id.clone();
		let (Some(challenge), Some(redirect)) =
			(param(form, "code_challenge"), param(form, "redirect_uri"))
		else {
			return Reply::oauth_error(400, "invalid_request", "PKCE parameters are required.");
		};
		let (challenge, redirect) = (challenge.to_owned(), redirect.to_owned());
		let usid = match param(form, "usid") {
			Some(usid) => {
				if let Some(guest) = self.guests_by_usid.get(usid) {
					self.merge_sources.insert(customer_id.clone(), guest.clone());
				}

				usid.to_owned()
			},
			None => self.next("usid"),
		};

		self.issue_code(customer_id, true, usid, challenge, &redirect)
	}

	fn issue_code(
		&mut self,
		customer_id: String,
		registered: bool,
		usid: String,
		challenge: String,
		redirect: &str,
	) -> Reply {
		let code = self.next("code");
		let location = format!("{redirect}?code={code}&usid={usid}");

		self.codes.insert(code, PendingCode { customer_id, registered, usid, challenge });

		Reply::redirect(location)
	}

	fn token(&mut self, form: &[(String, String)]) -> Reply {
		match param(form, "grant_type") {
			Some("authorization_code_pkce") => {
				let Some(pending) = param(form, "code").and_then(|code| self.codes.remove(code))
				else {
					return Reply::oauth_error(400, "invalid_grant", "Unknown authorization code.");
				};
				let verifier = param(form, "code_verifier").unwrap_or_default();

				if URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes())) != pending.challenge {
					return Reply::oauth_error(400, "invalid_grant", "PKCE verification failed.");
				}

				self.issue_tokens(pending.customer_id, pending.registered, pending.usid)
			},
			Some("refresh_token") => {
				let Some(customer_id) = param(form, "refresh_token")
					.and_then(|token| self.refresh_tokens.get(token))
					.cloned()
				else {
					return Reply::oauth_error(400, "invalid_grant", "Refresh token is not valid.");
				};
				let usid = match param(form, "usid") {
					Some(usid) => usid.to_owned(),
					None => self.next("usid"),
				};

				self.issue_tokens(customer_id, true, usid)
			},
			_ => Reply::oauth_error(400, "unsupported_grant_type", "Unsupported grant type."),
		}
	}

	fn issue_tokens(&mut self, customer_id: String, registered: bool, usid: String) -> Reply {
		let jti = self.next("jti");
		let now = OffsetDateTime::now_utc().unix_timestamp();
		let header = URL_SAFE_NO_PAD.encode(json!({ "alg": "none" }).to_string());
		let claims = URL_SAFE_NO_PAD.encode(
			json!({ "iat": now, "exp": now + self.token_lifetime, "sub": customer_id, "jti": jti })
				.to_string(),
		);
		let access_token = format!("{header}.{claims}.sig");
		let refresh_token = self.next(if registered { "refresh" } else { "guest-refresh" });

		self.access_tokens.insert(access_token.clone(), customer_id.clone());
		self.refresh_tokens.insert(refresh_token.clone(), customer_id.clone());

		Reply::ok(json!({
			"access_token": access_token,
			"refresh_token": refresh_token,
			"customer_id": customer_id,
			"usid": usid,
			"token_type": "BEARER",
			"expires_in": self.token_lifetime,
		}))
	}

	fn baskets(&mut self, method: &str, rest: &[&str], customer_id: &str, payload: Value) -> Reply {
		match (method, rest) {
			("POST", ["baskets"]) => {
				let basket = self.new_basket(customer_id, payload["currency"].clone());

				Reply::ok(basket)
			},
			("POST", ["baskets", "actions", "merge"]) => self.merge(customer_id),
			_ => {
				let Some(basket_id) = rest.get(1).map(|id| (*id).to_owned()) else {
					return Reply::not_found();
				};
				let Some(index) = self.basket_index(&basket_id, customer_id) else {
					return Reply::problem(
						404,
						"Basket Not Found",
						"basket-not-found",
						&format!("No basket with ID '{basket_id}'."),
					);
				};

				self.basket_at(index, method, &rest[2..], payload)
			},
		}
	}

	fn basket_at(&mut self, index: usize, method: &str, rest: &[&str], payload: Value) -> Reply {
		match (method, rest) {
			("GET", []) => {},
			("DELETE", []) => {
				self.baskets.remove(index);

				return Reply::no_content();
			},
			("POST", ["items"]) => {
				let items = payload.as_array().cloned().unwrap_or_default();

				for mut item in items {
					item["itemId"] = json!(self.next("item"));
					item["price"] = json!(19.99);
					push(&mut self.baskets[index]["productItems"], item);
				}
			},
			("DELETE", ["items", item_id]) =>
				retain(&mut self.baskets[index]["productItems"], "itemId", item_id),
			("PATCH", ["items", item_id]) => {
				if let Some(item) = find_mut(&mut self.baskets[index]["productItems"], "itemId", item_id)
				{
					item["quantity"] = payload["quantity"].clone();
				}
			},
			("PUT", ["customer"]) => {
				self.baskets[index]["customerInfo"]["email"] = payload["email"].clone();
			},
			("PUT", ["shipments", shipment_id, "shipping-address"]) => {
				if let Some(shipment) =
					find_mut(&mut self.baskets[index]["shipments"], "shipmentId", shipment_id)
				{
					shipment["shippingAddress"] = payload;
				}
			},
			("PUT", ["shipments", shipment_id, "shipping-method"]) => {
				if let Some(shipment) =
					find_mut(&mut self.baskets[index]["shipments"], "shipmentId", shipment_id)
				{
					shipment["shippingMethod"] = json!({ "id": payload["id"], "name": "Ground" });
				}
			},
			("GET", ["shipments", _, "shipping-methods"]) =>
				return Reply::ok(json!({
					"defaultShippingMethodId": "001",
					"applicableShippingMethods": [
						{ "id": "001", "name": "Ground", "price": 5.99 },
						{ "id": "002", "name": "Express", "price": 15.99 },
					],
				})),
			("PUT", ["billing-address"]) => {
				self.baskets[index]["billingAddress"] = payload;
			},
			("POST", ["payment-instruments"]) => {
				let mut instrument = payload;

				instrument["paymentInstrumentId"] = json!(self.next("payment"));
				push(&mut self.baskets[index]["paymentInstruments"], instrument);
			},
			("DELETE", ["payment-instruments", instrument_id]) => {
				if self.fail_payment_removal {
					return Reply::problem(
						500,
						"Internal Server Error",
						"internal-error",
						"Payment instrument could not be removed.",
					);
				}

				retain(
					&mut self.baskets[index]["paymentInstruments"],
					"paymentInstrumentId",
					instrument_id,
				);
			},
			("POST", ["coupons"]) => {
				let code = payload["code"].as_str().unwrap_or_default().to_owned();

				if code != "SAVE10" {
					return Reply::problem(
						400,
						"Invalid Coupon Code",
						"invalid-coupon-code",
						&format!("Coupon '{code}' is not valid."),
					);
				}

				let coupon = json!({ "couponItemId": self.next("coupon"), "code": code, "valid": true });

				push(&mut self.baskets[index]["couponItems"], coupon);
			},
			("DELETE", ["coupons", coupon_item_id]) =>
				retain(&mut self.baskets[index]["couponItems"], "couponItemId", coupon_item_id),
			_ => return Reply::not_found(),
		}

		Reply::ok(self.baskets[index].clone())
	}

	fn merge(&mut self, customer_id: &str) -> Reply {
		let Some(source) = self.merge_sources.remove(customer_id) else {
			return Reply::problem(
				409,
				"Merge Not Possible",
				"basket-merge-not-possible",
				"No previous shopper basket to merge.",
			);
		};
		let mut moved = Vec::new();

		self.baskets.retain(|basket| {
			if basket["customerInfo"]["customerId"] == json!(source) {
				moved.extend(basket["productItems"].as_array().cloned().unwrap_or_default());

				false
			} else {
				true
			}
		});

		let index = match self.baskets.iter().position(|basket| {
			basket["customerInfo"]["customerId"] == json!(customer_id)
		}) {
			Some(index) => index,
			None => {
				self.new_basket(customer_id, json!("USD"));

				self.baskets.len() - 1
			},
		};

		for item in moved {
			push(&mut self.baskets[index]["productItems"], item);
		}

		Reply::ok(self.baskets[index].clone())
	}

	fn orders(&mut self, method: &str, rest: &[&str], customer_id: &str, payload: Value) -> Reply {
		if (method, rest) != ("POST", ["orders"].as_slice()) {
			return Reply::not_found();
		}

		let basket_id = payload["basketId"].as_str().unwrap_or_default().to_owned();
		let Some(index) = self.basket_index(&basket_id, customer_id) else {
			return Reply::problem(
				404,
				"Basket Not Found",
				"basket-not-found",
				&format!("No basket with ID '{basket_id}'."),
			);
		};
		let basket = self.baskets.remove(index);
		let order_no = self.next("order");

		Reply::ok(json!({
			"orderNo": order_no,
			"status": "created",
			"customerInfo": basket["customerInfo"],
			"currency": basket["currency"],
			"productItems": basket["productItems"],
			"orderTotal": 19.99,
		}))
	}

	fn customers(&mut self, method: &str, rest: &[&str], caller: &str, payload: Value) -> Reply {
		let Some(customer_id) = rest.get(1).copied() else {
			return Reply::not_found();
		};

		if rest.first() != Some(&"customers") || customer_id != caller {
			return Reply::problem(403, "Forbidden", "forbidden", "Customer mismatch.");
		}

		match (method, &rest[2..]) {
			("GET", []) => match self.accounts.values().find(|a| a.customer_id == customer_id) {
				Some(account) => Reply::ok(json!({
					"customerId": account.customer_id,
					"authType": "registered",
					"email": account.email,
					"firstName": "Ada",
					"lastName": "Lovelace",
				})),
				None => Reply::problem(403, "Forbidden", "forbidden", "Guests have no profile."),
			},
			("GET", ["baskets"]) => {
				let baskets = self.baskets_of(customer_id);

				Reply::ok(json!({ "total": baskets.len(), "baskets": baskets }))
			},
			("GET", ["product-lists"]) => {
				let lists = self.lists.get(customer_id).cloned().unwrap_or_default();

				Reply::ok(json!({ "total": lists.len(), "data": lists }))
			},
			("POST", ["product-lists"]) => {
				let id = self.next("list");
				let list = json!({
					"id": id,
					"name": payload["name"],
					"type": payload["type"],
					"customerProductListItems": [],
				});

				self.lists.entry(customer_id.to_owned()).or_default().push(list.clone());

				Reply::ok(list)
			},
			("GET", ["product-lists", list_id]) => match self.list_mut(customer_id, list_id) {
				Some(list) => Reply::ok(list.clone()),
				None => Reply::not_found(),
			},
			("POST", ["product-lists", list_id, "items"]) => {
				let id = self.next("list-item");
				let Some(list) = self.list_mut(customer_id, list_id) else {
					return Reply::not_found();
				};
				let item = json!({
					"id": id,
					"productId": payload["productId"],
					"quantity": payload["quantity"],
					"public": payload["public"],
					"priority": payload["priority"],
					"type": payload["type"],
				});

				push(&mut list["customerProductListItems"], item.clone());

				Reply::ok(item)
			},
			("PATCH", ["product-lists", list_id, "items", item_id]) => {
				let Some(list) = self.list_mut(customer_id, list_id) else {
					return Reply::not_found();
				};
				let Some(item) = find_mut(&mut list["customerProductListItems"], "id", item_id)
				else {
					return Reply::not_found();
				};

				item["quantity"] = payload["quantity"].clone();

				Reply::ok(item.clone())
			},
			("DELETE", ["product-lists", list_id, "items", item_id]) => {
				let Some(list) = self.list_mut(customer_id, list_id) else {
					return Reply::not_found();
				};

				retain(&mut list["customerProductListItems"], "id", item_id);

				Reply::no_content()
			},
			_ => Reply::not_found(),
		}
	}

	fn products(&mut self, method: &str, rest: &[&str], query: &[(String, String)]) -> Reply {
		match (method, rest) {
			("GET", ["products"]) => {
				let ids = param(query, "ids")
					.unwrap_or_default()
					.split(',')
					.filter(|id| !id.is_empty())
					.map(str::to_owned)
					.collect::<Vec<_>>();

				if ids.len() > 24 {
					return Reply::problem(400, "Bad Request", "too-many-ids", "At most 24 ids.");
				}

				if ids.iter().any(|id| self.unavailable_products.contains(id)) {
					return Reply::problem(
						503,
						"Unavailable",
						"service-unavailable",
						"Catalog unavailable.",
					);
				}

				self.product_batches.push(ids.len());

				let data = ids.iter().map(|id| product(id)).collect::<Vec<_>>();

				Reply::ok(json!({ "total": data.len(), "data": data }))
			},
			("GET", ["products", id]) => Reply::ok(product(id)),
			("GET", ["categories", id]) => Reply::ok(json!({
				"id": id,
				"name": format!("Category {id}"),
				"categories": [{ "id": format!("{id}-sub"), "name": "Sub" }],
			})),
			_ => Reply::not_found(),
		}
	}

	fn new_basket(&mut self, customer_id: &str, currency: Value) -> Value {
		let basket = json!({
			"basketId": self.next("basket"),
			"currency": currency,
			"customerInfo": { "customerId": customer_id },
			"productItems": [],
			"paymentInstruments": [],
			"couponItems": [],
			"shipments": [{ "shipmentId": "me" }],
		});

		self.baskets.push(basket.clone());

		basket
	}

	fn basket_index(&self, basket_id: &str, customer_id: &str) -> Option<usize> {
		self.baskets.iter().position(|basket| {
			basket["basketId"] == json!(basket_id)
				&& basket["customerInfo"]["customerId"] == json!(customer_id)
		})
	}

	fn baskets_of(&self, customer_id: &str) -> Vec<Value> {
		self.baskets
			.iter()
			.filter(|basket| basket["customerInfo"]["customerId"] == json!(customer_id))
			.cloned()
			.collect()
	}

	fn list_mut(&mut self, customer_id: &str, list_id: &str) -> Option<&mut Value> {
		self.lists.get_mut(customer_id)?.iter_mut().find(|list| list["id"] == json!(list_id))
	}
}

fn param<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
	pairs.iter().find(|(name, _)| name == key).map(|(_, value)| value.as_str())
}

fn product(id: &str) -> Value {
	json!({
		"id": id,
		"name": format!("Product {id}"),
		"price": 19.99,
		"currency": "USD",
		"imageGroups": [{ "viewType": "small" }],
	})
}

fn push(array: &mut Value, entry: Value) {
	if !array.is_array() {
		*array = json!([]);
	}
	if let Some(entries) = array.as_array_mut() {
		entries.push(entry);
	}
}

fn retain(array: &mut Value, key: &str, id: &str) {
	if let Some(entries) = array.as_array_mut() {
		entries.retain(|entry| entry[key] != json!(id));
	}
}

fn find_mut<'a>(array: &'a mut Value, key: &str, id: &str) -> Option<&'a mut Value> {
	array.as_array_mut()?.iter_mut().find(|entry| entry[key] == json!(id))
}
