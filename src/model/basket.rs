//! Basket resource and its nested parts.

// self
use crate::{
	_prelude::*,
	auth::{BasketId, CouponItemId, CustomerId, ItemId, PaymentInstrumentId, ProductId},
};

/// Server-side basket.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Basket {
	/// Basket identifier.
	pub basket_id: BasketId,
	/// Owner of the basket.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub customer_info: Option<CustomerInfo>,
	/// ISO 4217 currency code.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub currency: Option<String>,
	/// Line items.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub product_items: Vec<ProductItem>,
	/// Attached payment instruments.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub payment_instruments: Vec<PaymentInstrument>,
	/// Billing address.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub billing_address: Option<Address>,
	/// Shipments; the storefront uses the first (`me`) shipment.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub shipments: Vec<Shipment>,
	/// Applied coupons.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub coupon_items: Vec<CouponItem>,
	/// Sum of line item prices.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub product_total: Option<f64>,
	/// Grand total.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub order_total: Option<f64>,
	/// Members not modeled above.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}
impl Basket {
	/// Customer id recorded on the basket.
	pub fn customer_id(&self) -> Option<&CustomerId> {
		self.customer_info.as_ref().and_then(|info| info.customer_id.as_ref())
	}

	/// Email recorded on the basket.
	pub fn email(&self) -> Option<&str> {
		self.customer_info.as_ref().and_then(|info| info.email.as_deref())
	}

	/// Total quantity over all line items.
	pub fn item_count(&self) -> u32 {
		self.product_items.iter().map(|item| item.quantity).sum()
	}

	/// Distinct product ids referenced by line items, in first-seen order.
	pub fn product_ids(&self) -> Vec<ProductId> {
		let mut seen = HashSet::new();

		self.product_items
			.iter()
			.filter(|item| seen.insert(item.product_id.clone()))
			.map(|item| item.product_id.clone())
			.collect()
	}
}

/// Customer reference embedded in baskets and orders.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
	/// Owning customer.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub customer_id: Option<CustomerId>,
	/// Contact email.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	/// Members not modeled above.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

/// Basket or order line item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductItem {
	/// Line item id, assigned by the server.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub item_id: Option<ItemId>,
	/// Purchased product.
	pub product_id: ProductId,
	/// Quantity.
	pub quantity: u32,
	/// Unit price.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub price: Option<f64>,
	/// Display name captured at add time.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub product_name: Option<String>,
	/// Members not modeled above.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}
impl ProductItem {
	/// Creates a new line item request for `quantity` units of `product_id`.
	pub fn new(product_id: ProductId, quantity: u32) -> Self {
		Self {
			item_id: None,
			product_id,
			quantity,
			price: None,
			product_name: None,
			extra: Map::new(),
		}
	}
}

/// Postal address.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct Address {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub first_name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub last_name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub address1: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub address2: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub city: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub postal_code: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub state_code: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub country_code: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub phone: Option<String>,
	/// Members not modeled above.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

/// Basket shipment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
	/// Shipment id (`me` for the default shipment).
	pub shipment_id: String,
	/// Destination.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub shipping_address: Option<Address>,
	/// Selected method.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub shipping_method: Option<ShippingMethod>,
	/// Members not modeled above.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

/// Shipping method offered for a shipment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingMethod {
	/// Method id.
	pub id: String,
	/// Display name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Price for the shipment.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub price: Option<f64>,
	/// Members not modeled above.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

/// Result of listing shipping methods for a shipment.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingMethodResult {
	/// Method preselected by the platform.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub default_shipping_method_id: Option<String>,
	/// Methods the shipment may use.
	#[serde(default)]
	pub applicable_shipping_methods: Vec<ShippingMethod>,
}

/// Payment instrument attached to a basket or order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInstrument {
	/// Server-assigned id; absent on requests.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub payment_instrument_id: Option<PaymentInstrumentId>,
	/// Payment method (e.g. `CREDIT_CARD`).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub payment_method_id: Option<String>,
	/// Amount charged to the instrument.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub amount: Option<f64>,
	/// Card details, passed through as-is.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub payment_card: Option<Value>,
	/// Members not modeled above.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

/// Coupon applied to a basket.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponItem {
	/// Server-assigned id.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub coupon_item_id: Option<CouponItemId>,
	/// Promo code entered by the shopper.
	pub code: String,
	/// Whether the coupon currently applies.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub valid: Option<bool>,
	/// Members not modeled above.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

/// `getCustomerBaskets` result.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BasketsResult {
	/// Baskets owned by the customer, most recent first.
	#[serde(default)]
	pub baskets: Vec<Basket>,
	/// Number of baskets.
	#[serde(default)]
	pub total: u32,
}
