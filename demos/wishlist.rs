//! Creates the shopper wishlist, adds a product, and prints the hydrated list, all against a
//! mocked commerce backend.

// std
use std::sync::Arc;
// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
use time::OffsetDateTime;
use url::Url;
// self
use commerce_session::{
	api::Api,
	auth::ProductId,
	config::StorefrontConfig,
	product_list::{ProductListConfig, ProductListService},
	store::MemoryStore,
};

const ORG: &str = "f_ecom_demo";
const SHOPPER: &str = "demo-shopper";

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let auth_base = format!("/shopper/auth/v1/organizations/{ORG}");
	let lists = format!(
		"/customer/shopper-customers/v1/organizations/{ORG}/customers/{SHOPPER}/product-lists"
	);

	server
		.mock_async(|when, then| {
			when.method(GET).path(format!("{auth_base}/oauth2/authorize"));
			then.status(303).header("location", server.url("/callback?code=demo-code"));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path(format!("{auth_base}/oauth2/token"));
			then.status(200).json_body(json!({
				"access_token": demo_access_token(SHOPPER),
				"customer_id": SHOPPER,
				"usid": "demo-usid",
			}));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path(lists.as_str());
			then.status(200).json_body(json!({ "total": 0, "data": [] }));
		})
		.await;

	let created = server
		.mock_async(|when, then| {
			when.method(POST).path(lists.as_str());
			then.status(201).json_body(json!({
				"id": "wishlist-1",
				"name": "PWA wishlist",
				"type": "wish_list",
			}));
		})
		.await;

	server
		.mock_async(|when, then| {
			when.method(GET).path(format!("{lists}/wishlist-1"));
			then.status(200).json_body(json!({
				"id": "wishlist-1",
				"name": "PWA wishlist",
				"type": "wish_list",
				"customerProductListItems": [],
			}));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path(format!("{lists}/wishlist-1/items"));
			then.status(201).json_body(json!({
				"id": "item-1",
				"productId": "25519318M",
				"quantity": 1,
				"public": false,
				"priority": 1,
				"type": "product",
			}));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET)
				.path(format!("/product/shopper-products/v1/organizations/{ORG}/products"))
				.query_param("ids", "25519318M");
			then.status(200).json_body(json!({
				"total": 1,
				"data": [{ "id": "25519318M", "name": "Classic Shirt", "price": 49.99 }],
			}));
		})
		.await;

	let config = StorefrontConfig::builder()
		.api_origin(Url::parse(&server.base_url())?)
		.organization_id(ORG)
		.site_id("RefArch")
		.client_id("demo-client")
		.redirect_uri(Url::parse(&server.url("/callback"))?)
		.build()?;
	let api = Arc::new(Api::from_config(config, Arc::new(MemoryStore::default()))?);
	let wishlist = ProductListService::new(api, ProductListConfig::wishlist());
	let list = wishlist.init().await?;

	println!("Using list {} ({:?}).", list.id, list.name);

	wishlist.create_list_item(ProductId::new("25519318M")?, 1).await?;

	let snapshot = wishlist.list().unwrap_or(list);
	let hydrated = wishlist.hydrate(&snapshot).await?;

	for item in &hydrated.items {
		println!("{}", serde_json::to_string_pretty(item)?);
	}

	created.assert_async().await;

	Ok(())
}

fn demo_access_token(subject: &str) -> String {
	let iat = OffsetDateTime::now_utc().unix_timestamp();
	let header = URL_SAFE_NO_PAD.encode(json!({ "alg": "none" }).to_string());
	let claims =
		URL_SAFE_NO_PAD.encode(json!({ "iat": iat, "exp": iat + 1_800, "sub": subject }).to_string());

	format!("{header}.{claims}.demo")
}
