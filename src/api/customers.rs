//! Shopper customer resource: profile, baskets, and product lists.

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	api::{Api, ApiRequest, Method, Operation, TransportErrorMapper},
	auth::{CustomerId, ItemId, ProductListId},
	http::CommerceHttpClient,
	model::{
		BasketsResult, Customer, NewListItem, ProductList, ProductListItem, ProductListsResult,
	},
};

/// Customer calls, routed through the request interceptor.
pub struct ShopperCustomers<'a, C, M>
where
	C: ?Sized + CommerceHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	api: &'a Api<C, M>,
}
impl<'a, C, M> ShopperCustomers<'a, C, M>
where
	C: ?Sized + CommerceHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	pub(crate) fn new(api: &'a Api<C, M>) -> Self {
		Self { api }
	}

	/// Reads a registered customer's profile.
	pub async fn get_customer(&self, customer_id: &CustomerId) -> Result<Customer> {
		self.send(ApiRequest::new(
			Operation::GetCustomer,
			Method::GET,
			format!("/customers/{customer_id}"),
		))
		.await
	}

	/// Lists the customer's baskets.
	pub async fn get_customer_baskets(&self, customer_id: &CustomerId) -> Result<BasketsResult> {
		self.send(ApiRequest::new(
			Operation::GetCustomerBaskets,
			Method::GET,
			format!("/customers/{customer_id}/baskets"),
		))
		.await
	}

	/// Lists every product list of the customer. The platform offers no name filter.
	pub async fn get_customer_product_lists(
		&self,
		customer_id: &CustomerId,
	) -> Result<ProductListsResult> {
		self.send(ApiRequest::new(
			Operation::GetCustomerProductLists,
			Method::GET,
			format!("/customers/{customer_id}/product-lists"),
		))
		.await
	}

	/// Creates a named list.
	pub async fn create_customer_product_list(
		&self,
		customer_id: &CustomerId,
		name: &str,
		list_type: &str,
	) -> Result<ProductList> {
		self.send(
			ApiRequest::new(
				Operation::CreateCustomerProductList,
				Method::POST,
				format!("/customers/{customer_id}/product-lists"),
			)
			.json(json!({ "name": name, "type": list_type })),
		)
		.await
	}

	/// Reads one list with its items.
	pub async fn get_customer_product_list(
		&self,
		customer_id: &CustomerId,
		list_id: &ProductListId,
	) -> Result<ProductList> {
		self.send(ApiRequest::new(
			Operation::GetCustomerProductList,
			Method::GET,
			format!("/customers/{customer_id}/product-lists/{list_id}"),
		))
		.await
	}

	/// Adds an item to a list.
	pub async fn create_customer_product_list_item(
		&self,
		customer_id: &CustomerId,
		list_id: &ProductListId,
		item: &NewListItem,
	) -> Result<ProductListItem> {
		self.send(
			ApiRequest::new(
				Operation::CreateCustomerProductListItem,
				Method::POST,
				format!("/customers/{customer_id}/product-lists/{list_id}/items"),
			)
			.json_of(item)?,
		)
		.await
	}

	/// Patches a list item.
	pub async fn update_customer_product_list_item(
		&self,
		customer_id: &CustomerId,
		list_id: &ProductListId,
		item_id: &ItemId,
		patch: Value,
	) -> Result<ProductListItem> {
		self.send(
			ApiRequest::new(
				Operation::UpdateCustomerProductListItem,
				Method::PATCH,
				format!("/customers/{customer_id}/product-lists/{list_id}/items/{item_id}"),
			)
			.json(patch),
		)
		.await
	}

	/// Deletes a list item.
	pub async fn delete_customer_product_list_item(
		&self,
		customer_id: &CustomerId,
		list_id: &ProductListId,
		item_id: &ItemId,
	) -> Result<()> {
		self.api
			.with_auth(ApiRequest::new(
				Operation::DeleteCustomerProductListItem,
				Method::DELETE,
				format!("/customers/{customer_id}/product-lists/{list_id}/items/{item_id}"),
			))
			.await?;

		Ok(())
	}

	async fn send<T>(&self, request: ApiRequest) -> Result<T>
	where
		T: DeserializeOwned,
	{
		self.api.with_auth(request).await?.decode()
	}
}
