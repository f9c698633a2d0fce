//! Named customer product lists with optimistic local state.
//!
//! [`ProductListService`] manages one list, selected by the name and type in its
//! [`ProductListConfig`]. The wishlist is [`ProductListConfig::wishlist`], not a separate
//! type. Mutations hit the platform first and then mirror the change into the local copy
//! without refetching the list.

// self
use crate::{
	_prelude::*,
	api::{Api, TransportErrorMapper},
	auth::{CustomerId, ItemId, ProductId, ProductListId},
	error::ConfigError,
	http::CommerceHttpClient,
	model::{HydratedProductList, NewListItem, ProductList, ProductListItem},
	obs::{self, FlowKind},
};

/// Name of the list used as the wishlist.
pub const WISHLIST_NAME: &str = "PWA wishlist";
/// Type of the list used as the wishlist.
pub const WISHLIST_TYPE: &str = "wish_list";

const KIND: FlowKind = FlowKind::ProductList;

/// Selects which customer list a [`ProductListService`] manages.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductListConfig {
	/// List name; lists are matched by it.
	pub name: String,
	/// List type used when the list has to be created.
	#[serde(rename = "type")]
	pub list_type: String,
}
impl ProductListConfig {
	/// Arbitrary named list.
	pub fn new(name: impl Into<String>, list_type: impl Into<String>) -> Self {
		Self { name: name.into(), list_type: list_type.into() }
	}

	/// The storefront wishlist.
	pub fn wishlist() -> Self {
		Self::new(WISHLIST_NAME, WISHLIST_TYPE)
	}
}

/// CRUD over one named customer product list.
pub struct ProductListService<C, M>
where
	C: ?Sized + CommerceHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	api: Arc<Api<C, M>>,
	config: ProductListConfig,
	list: RwLock<Option<ProductList>>,
}
impl<C, M> ProductListService<C, M>
where
	C: ?Sized + CommerceHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates an uninitialized service for the list described by `config`.
	pub fn new(api: Arc<Api<C, M>>, config: ProductListConfig) -> Self {
		Self { api, config, list: RwLock::new(None) }
	}

	/// Which list this service manages.
	pub fn config(&self) -> &ProductListConfig {
		&self.config
	}

	/// Local copy of the list, once initialized.
	pub fn list(&self) -> Option<ProductList> {
		self.list.read().clone()
	}

	/// Drops the local copy, e.g. after the shopper changed.
	pub fn reset(&self) {
		*self.list.write() = None;
	}

	/// Loads (or creates) the configured list and keeps it locally.
	pub async fn init(&self) -> Result<ProductList> {
		let list = self.get_or_create_list(&self.config.name, &self.config.list_type).await?;

		*self.list.write() = Some(list.clone());

		Ok(list)
	}

	/// Returns the customer's list called `name`, creating it with `list_type` when absent.
	///
	/// The platform cannot filter lists by name, so every list is fetched and scanned.
	pub async fn get_or_create_list(&self, name: &str, list_type: &str) -> Result<ProductList> {
		let customer_id = self.customer_id().await?;
		let customers = self.api.customers();
		let lists = customers.get_customer_product_lists(&customer_id).await?;

		if let Some(list) = lists.data.into_iter().find(|list| list.name.as_deref() == Some(name)) {
			return Ok(list);
		}

		let created = customers.create_customer_product_list(&customer_id, name, list_type).await?;

		customers.get_customer_product_list(&customer_id, &created.id).await
	}

	/// Adds `quantity` units of `product_id` to the list.
	pub async fn create_list_item(
		&self,
		product_id: ProductId,
		quantity: u32,
	) -> Result<ProductListItem> {
		obs::observe(KIND, "create_list_item", async {
			let (customer_id, list_id) = self.target().await?;
			let item = self
				.api
				.customers()
				.create_customer_product_list_item(
					&customer_id,
					&list_id,
					&NewListItem::product(product_id, quantity),
				)
				.await?;

			if let Some(list) = self.list.write().as_mut() {
				list.customer_product_list_items.push(item.clone());
			}

			Ok(item)
		})
		.await
	}

	/// Changes an item's quantity; a quantity of zero removes the item.
	///
	/// Returns the updated item, or `None` when it was removed.
	pub async fn update_list_item(
		&self,
		item_id: &ItemId,
		quantity: u32,
	) -> Result<Option<ProductListItem>> {
		if quantity == 0 {
			self.remove_list_item(item_id).await?;

			return Ok(None);
		}

		obs::observe(KIND, "update_list_item", async {
			let (customer_id, list_id) = self.target().await?;
			let current = self
				.list
				.read()
				.as_ref()
				.and_then(|list| {
					list.customer_product_list_items.iter().find(|item| &item.id == item_id).cloned()
				});
			let patch = json!({
				"quantity": quantity,
				"public": current.as_ref().and_then(|item| item.public).unwrap_or(false),
				"priority": current.as_ref().and_then(|item| item.priority).unwrap_or(1),
			});
			let item = self
				.api
				.customers()
				.update_customer_product_list_item(&customer_id, &list_id, item_id, patch)
				.await?;

			if let Some(list) = self.list.write().as_mut()
				&& let Some(slot) =
					list.customer_product_list_items.iter_mut().find(|entry| &entry.id == item_id)
			{
				*slot = item.clone();
			}

			Ok(Some(item))
		})
		.await
	}

	/// Removes an item.
	pub async fn remove_list_item(&self, item_id: &ItemId) -> Result<()> {
		obs::observe(KIND, "remove_list_item", async {
			let (customer_id, list_id) = self.target().await?;

			self.api
				.customers()
				.delete_customer_product_list_item(&customer_id, &list_id, item_id)
				.await?;

			if let Some(list) = self.list.write().as_mut() {
				list.customer_product_list_items.retain(|item| &item.id != item_id);
			}

			Ok(())
		})
		.await
	}

	/// Removes the item referencing `product_id`.
	pub async fn remove_list_item_by_product_id(&self, product_id: &str) -> Result<()> {
		let item = self.find_item_by_product_id(product_id).ok_or_else(|| {
			ConfigError::MissingListItem { product_id: product_id.to_owned() }
		})?;

		self.remove_list_item(&item.id).await
	}

	/// Local lookup; `None` when absent or when the list is not initialized.
	pub fn find_item_by_product_id(&self, product_id: &str) -> Option<ProductListItem> {
		self.list.read().as_ref()?.item_by_product_id(product_id).cloned()
	}

	/// Copies `list` with product details merged into every item. Item members win over
	/// product members on conflict.
	pub async fn hydrate(&self, list: &ProductList) -> Result<HydratedProductList> {
		obs::observe(KIND, "hydrate", async {
			let mut seen = HashSet::new();
			let ids = list
				.customer_product_list_items
				.iter()
				.filter(|item| seen.insert(item.product_id.clone()))
				.map(|item| item.product_id.clone())
				.collect::<Vec<_>>();
			let products = self.api.products().get_products_batched(&ids).await?;
			let details = products
				.into_iter()
				.map(|product| (product.id.clone(), product))
				.collect::<HashMap<_, _>>();
			let items = list
				.customer_product_list_items
				.iter()
				.map(|item| {
					let mut merged = details
						.get(&item.product_id)
						.and_then(|product| object(serde_json::to_value(product).ok()))
						.unwrap_or_default();

					if let Some(own) = object(serde_json::to_value(item).ok()) {
						merged.extend(own);
					}

					merged
				})
				.collect();

			Ok(HydratedProductList { list: list.clone(), items, has_detail: true })
		})
		.await
	}

	async fn customer_id(&self) -> Result<CustomerId> {
		let auth = self.api.auth();

		if let Some(session) = auth.session() {
			return Ok(session.customer_id.clone());
		}

		Ok(auth.login(None).await?.customer_id.clone())
	}

	async fn target(&self) -> Result<(CustomerId, ProductListId)> {
		let list_id = self
			.list
			.read()
			.as_ref()
			.map(|list| list.id.clone())
			.ok_or_else(|| ConfigError::MissingProductList { name: self.config.name.clone() })?;

		Ok((self.customer_id().await?, list_id))
	}
}
impl<C, M> Debug for ProductListService<C, M>
where
	C: ?Sized + CommerceHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProductListService")
			.field("config", &self.config)
			.field("list", &*self.list.read())
			.finish()
	}
}

fn object(value: Option<Value>) -> Option<Map<String, Value>> {
	match value? {
		Value::Object(map) => Some(map),
		_ => None,
	}
}
