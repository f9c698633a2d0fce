//! Bootstraps a guest shopper session against a mocked commerce backend, then makes an
//! authenticated catalog call through the request interceptor.

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
	store::{MemoryStore, SessionStore},
};

const ORG: &str = "f_ecom_demo";

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let auth_base = format!("/shopper/auth/v1/organizations/{ORG}");
	let authorize = server
		.mock_async(|when, then| {
			when.method(GET)
				.path(format!("{auth_base}/oauth2/authorize"))
				.query_param("hint", "guest");
			then.status(303)
				.header("location", server.url("/callback?code=demo-code&usid=demo-usid"));
		})
		.await;
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path(format!("{auth_base}/oauth2/token"));
			then.status(200).json_body(json!({
				"access_token": demo_access_token("demo-guest"),
				"customer_id": "demo-guest",
				"usid": "demo-usid",
				"token_type": "BEARER",
				"expires_in": 1800,
			}));
		})
		.await;
	let product = server
		.mock_async(|when, then| {
			when.method(GET)
				.path(format!("/product/shopper-products/v1/organizations/{ORG}/products/25519318M"));
			then.status(200).json_body(json!({ "id": "25519318M", "name": "Classic Shirt" }));
		})
		.await;
	let config = StorefrontConfig::builder()
		.api_origin(Url::parse(&server.base_url())?)
		.organization_id(ORG)
		.site_id("RefArch")
		.client_id("demo-client")
		.redirect_uri(Url::parse(&server.url("/callback"))?)
		.build()?;
	let store: Arc<dyn SessionStore> = Arc::new(MemoryStore::default());
	let api = Api::from_config(config, store)?;
	let session = api.auth().login(None).await?;

	println!("Guest {} holds a token valid for {}.", session.customer_id, session.auth_token.lifetime());

	let shirt = api.products().get_product(&ProductId::new("25519318M")?).await?;

	println!("Loaded {} ({}).", shirt.id, shirt.name.unwrap_or_default());

	authorize.assert_async().await;
	token.assert_async().await;
	product.assert_async().await;

	Ok(())
}

fn demo_access_token(subject: &str) -> String {
	let iat = OffsetDateTime::now_utc().unix_timestamp();
	let header = URL_SAFE_NO_PAD.encode(json!({ "alg": "none" }).to_string());
	let claims =
		URL_SAFE_NO_PAD.encode(json!({ "iat": iat, "exp": iat + 1_800, "sub": subject }).to_string());

	format!("{header}.{claims}.demo")
}
