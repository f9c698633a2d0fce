//! Order resource.

// self
use crate::{
	_prelude::*,
	model::{Address, CustomerInfo, PaymentInstrument, ProductItem, Shipment},
};

/// Order created from a basket.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct Order {
	/// Order number.
	pub order_no: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub status: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub customer_info: Option<CustomerInfo>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub currency: Option<String>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub product_items: Vec<ProductItem>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub payment_instruments: Vec<PaymentInstrument>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub billing_address: Option<Address>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub shipments: Vec<Shipment>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub order_total: Option<f64>,
	/// Members not modeled above.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}
