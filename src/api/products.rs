//! Shopper product resource (catalog reads).

// self
use crate::{
	_prelude::*,
	api::{Api, ApiRequest, Method, Operation, TransportErrorMapper},
	auth::ProductId,
	http::CommerceHttpClient,
	model::{Category, Product, ProductsResult},
};

/// Maximum number of ids the platform accepts in one `getProducts` call.
pub const MAX_PRODUCT_IDS_PER_REQUEST: usize = 24;

/// Catalog calls, routed through the request interceptor.
pub struct ShopperProducts<'a, C, M>
where
	C: ?Sized + CommerceHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	api: &'a Api<C, M>,
}
impl<'a, C, M> ShopperProducts<'a, C, M>
where
	C: ?Sized + CommerceHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	pub(crate) fn new(api: &'a Api<C, M>) -> Self {
		Self { api }
	}

	/// Fetches up to [`MAX_PRODUCT_IDS_PER_REQUEST`] products in one call.
	///
	/// Callers holding more ids use [`ShopperProducts::get_products_batched`].
	pub async fn get_products(&self, ids: &[ProductId]) -> Result<ProductsResult> {
		let joined = ids.iter().map(|id| id.as_ref()).collect::<Vec<_>>().join(",");
		let request = self.localized(
			ApiRequest::new(Operation::GetProducts, Method::GET, "/products").query("ids", joined),
		);

		self.api.with_auth(request).await?.decode()
	}

	/// Fetches any number of products, issuing one call per
	/// [`MAX_PRODUCT_IDS_PER_REQUEST`] ids.
	pub async fn get_products_batched(&self, ids: &[ProductId]) -> Result<Vec<Product>> {
		let mut products = Vec::with_capacity(ids.len());

		for chunk in ids.chunks(MAX_PRODUCT_IDS_PER_REQUEST) {
			products.extend(self.get_products(chunk).await?.data);
		}

		Ok(products)
	}

	/// Fetches one product.
	pub async fn get_product(&self, id: &ProductId) -> Result<Product> {
		let request = self
			.localized(ApiRequest::new(Operation::GetProduct, Method::GET, format!("/products/{id}")));

		self.api.with_auth(request).await?.decode()
	}

	/// Fetches a category and `levels` of subcategories.
	pub async fn get_category(&self, id: &str, levels: u8) -> Result<Category> {
		let request = self.localized(
			ApiRequest::new(Operation::GetCategory, Method::GET, format!("/categories/{id}"))
				.query("levels", levels.to_string()),
		);

		self.api.with_auth(request).await?.decode()
	}

	fn localized(&self, request: ApiRequest) -> ApiRequest {
		let config = self.api.config();

		request.query("currency", config.currency.as_str()).query("locale", config.locale.as_str())
	}
}
