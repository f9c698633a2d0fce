//! Catalog resources.

// self
use crate::{_prelude::*, auth::ProductId};

/// Catalog product.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
	/// Product id.
	pub id: ProductId,
	/// Display name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Sales price.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub price: Option<f64>,
	/// Currency of `price`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub currency: Option<String>,
	/// Members not modeled above (images, variation attributes, ...).
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

/// `getProducts` result.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductsResult {
	/// Products found; unknown ids are omitted.
	#[serde(default)]
	pub data: Vec<Product>,
	/// Number of products returned.
	#[serde(default)]
	pub total: u32,
}

/// Catalog category.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
	/// Category id.
	pub id: String,
	/// Display name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Subcategories, when requested with depth.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub categories: Vec<Category>,
	/// Members not modeled above.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}
