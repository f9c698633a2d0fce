//! Customer product lists.

// self
use crate::{
	_prelude::*,
	auth::{ItemId, ProductId, ProductListId},
};

/// Named customer product list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductList {
	/// List id.
	pub id: ProductListId,
	/// List name; lists are looked up by it.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// List type (e.g. `wish_list`).
	#[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
	pub list_type: Option<String>,
	/// Items.
	#[serde(default)]
	pub customer_product_list_items: Vec<ProductListItem>,
	/// Members not modeled above.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}
impl ProductList {
	/// Finds the item referencing `product_id`.
	pub fn item_by_product_id(&self, product_id: &str) -> Option<&ProductListItem> {
		self.customer_product_list_items.iter().find(|item| &*item.product_id == product_id)
	}
}

/// Entry of a product list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListItem {
	/// Item id.
	pub id: ItemId,
	/// Referenced product.
	pub product_id: ProductId,
	/// Desired quantity.
	pub quantity: u32,
	/// Whether the item is visible to others.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub public: Option<bool>,
	/// Sort priority.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub priority: Option<i32>,
	/// Item type (`product` or `gift_certificate`).
	#[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
	pub item_type: Option<String>,
	/// Members not modeled above.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

/// Body for creating a list item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewListItem {
	/// Product to add.
	pub product_id: ProductId,
	/// Quantity.
	pub quantity: u32,
	/// Visibility.
	pub public: bool,
	/// Sort priority.
	pub priority: i32,
	/// Item type.
	#[serde(rename = "type")]
	pub item_type: String,
}
impl NewListItem {
	/// Private `product` entry with priority 1.
	pub fn product(product_id: ProductId, quantity: u32) -> Self {
		Self { product_id, quantity, public: false, priority: 1, item_type: "product".into() }
	}
}

/// `getCustomerProductLists` result.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductListsResult {
	/// Every list owned by the customer.
	#[serde(default)]
	pub data: Vec<ProductList>,
	/// Number of lists.
	#[serde(default)]
	pub total: u32,
}

/// List copy whose items carry merged product details.
#[derive(Clone, Debug, PartialEq)]
pub struct HydratedProductList {
	/// Source list.
	pub list: ProductList,
	/// Per-item objects: product members overlaid by item members.
	pub items: Vec<Map<String, Value>>,
	/// Set once details were merged.
	pub has_detail: bool,
}
impl HydratedProductList {
	/// Merged object for `product_id`.
	pub fn item(&self, product_id: &str) -> Option<&Map<String, Value>> {
		self.items
			.iter()
			.find(|item| item.get("productId").and_then(Value::as_str) == Some(product_id))
	}
}
