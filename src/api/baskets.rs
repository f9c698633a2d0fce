//! Shopper basket resource.

// self
use crate::{
	_prelude::*,
	api::{Api, ApiRequest, Method, Operation, TransportErrorMapper},
	auth::{BasketId, CouponItemId, ItemId, PaymentInstrumentId},
	config::Dialect,
	http::CommerceHttpClient,
	model::{Address, Basket, PaymentInstrument, ProductItem, ShippingMethodResult},
};

/// Basket calls, routed through the request interceptor.
pub struct ShopperBaskets<'a, C, M>
where
	C: ?Sized + CommerceHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	api: &'a Api<C, M>,
}
impl<'a, C, M> ShopperBaskets<'a, C, M>
where
	C: ?Sized + CommerceHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	pub(crate) fn new(api: &'a Api<C, M>) -> Self {
		Self { api }
	}

	/// Creates a basket for the current shopper.
	pub async fn create_basket(&self, body: Value) -> Result<Basket> {
		self.send(ApiRequest::new(Operation::CreateBasket, Method::POST, "/baskets").json(body))
			.await
	}

	/// Reads a basket.
	pub async fn get_basket(&self, basket_id: &BasketId) -> Result<Basket> {
		self.send(ApiRequest::new(Operation::GetBasket, Method::GET, format!("/baskets/{basket_id}")))
			.await
	}

	/// Deletes a basket.
	pub async fn delete_basket(&self, basket_id: &BasketId) -> Result<()> {
		self.api
			.with_auth(ApiRequest::new(
				Operation::DeleteBasket,
				Method::DELETE,
				format!("/baskets/{basket_id}"),
			))
			.await?;

		Ok(())
	}

	/// Merges the previous guest basket into the registered shopper's basket, creating the
	/// destination when needed. The platform deletes the source basket.
	pub async fn merge_basket(&self) -> Result<Basket> {
		let request = ApiRequest::new(Operation::MergeBasket, Method::POST, self.merge_path())
			.query(self.word("createDestinationBasket", "create_destination_basket"), "true");

		self.send(request).await
	}

	/// Adds line items.
	pub async fn add_item_to_basket(
		&self,
		basket_id: &BasketId,
		items: &[ProductItem],
	) -> Result<Basket> {
		self.send(
			ApiRequest::new(
				Operation::AddItemToBasket,
				Method::POST,
				format!("/baskets/{basket_id}/items"),
			)
			.json_of(items)?,
		)
		.await
	}

	/// Removes a line item.
	pub async fn remove_item_from_basket(
		&self,
		basket_id: &BasketId,
		item_id: &ItemId,
	) -> Result<Basket> {
		self.send(ApiRequest::new(
			Operation::RemoveItemFromBasket,
			Method::DELETE,
			format!("/baskets/{basket_id}/items/{item_id}"),
		))
		.await
	}

	/// Patches a line item (quantity, variant).
	pub async fn update_item_in_basket(
		&self,
		basket_id: &BasketId,
		item_id: &ItemId,
		patch: Value,
	) -> Result<Basket> {
		self.send(
			ApiRequest::new(
				Operation::UpdateItemInBasket,
				Method::PATCH,
				format!("/baskets/{basket_id}/items/{item_id}"),
			)
			.json(patch),
		)
		.await
	}

	/// Replaces the basket's customer info.
	pub async fn update_customer_for_basket(
		&self,
		basket_id: &BasketId,
		customer_info: Value,
	) -> Result<Basket> {
		self.send(
			ApiRequest::new(
				Operation::UpdateCustomerForBasket,
				Method::PUT,
				format!("/baskets/{basket_id}/customer"),
			)
			.json(customer_info),
		)
		.await
	}

	/// Sets a shipment's destination.
	pub async fn update_shipping_address_for_shipment(
		&self,
		basket_id: &BasketId,
		shipment_id: &str,
		address: &Address,
	) -> Result<Basket> {
		let path = format!(
			"/baskets/{basket_id}/shipments/{shipment_id}/{}",
			self.word("shipping-address", "shipping_address")
		);

		self.send(
			ApiRequest::new(Operation::UpdateShippingAddressForShipment, Method::PUT, path)
				.json_of(address)?,
		)
		.await
	}

	/// Selects a shipment's shipping method.
	pub async fn update_shipping_method_for_shipment(
		&self,
		basket_id: &BasketId,
		shipment_id: &str,
		method_id: &str,
	) -> Result<Basket> {
		let path = format!(
			"/baskets/{basket_id}/shipments/{shipment_id}/{}",
			self.word("shipping-method", "shipping_method")
		);

		self.send(
			ApiRequest::new(Operation::UpdateShippingMethodForShipment, Method::PUT, path)
				.json(json!({ "id": method_id })),
		)
		.await
	}

	/// Lists methods applicable to a shipment.
	pub async fn get_shipping_methods_for_shipment(
		&self,
		basket_id: &BasketId,
		shipment_id: &str,
	) -> Result<ShippingMethodResult> {
		let path = format!(
			"/baskets/{basket_id}/shipments/{shipment_id}/{}",
			self.word("shipping-methods", "shipping_methods")
		);

		self.send(ApiRequest::new(Operation::GetShippingMethodsForShipment, Method::GET, path))
			.await
	}

	/// Sets the billing address.
	pub async fn update_billing_address_for_basket(
		&self,
		basket_id: &BasketId,
		address: &Address,
	) -> Result<Basket> {
		let path =
			format!("/baskets/{basket_id}/{}", self.word("billing-address", "billing_address"));

		self.send(
			ApiRequest::new(Operation::UpdateBillingAddressForBasket, Method::PUT, path)
				.json_of(address)?,
		)
		.await
	}

	/// Attaches a payment instrument.
	pub async fn add_payment_instrument_to_basket(
		&self,
		basket_id: &BasketId,
		instrument: &PaymentInstrument,
	) -> Result<Basket> {
		let path = format!(
			"/baskets/{basket_id}/{}",
			self.word("payment-instruments", "payment_instruments")
		);

		self.send(
			ApiRequest::new(Operation::AddPaymentInstrumentToBasket, Method::POST, path)
				.json_of(instrument)?,
		)
		.await
	}

	/// Detaches a payment instrument.
	pub async fn remove_payment_instrument_from_basket(
		&self,
		basket_id: &BasketId,
		instrument_id: &PaymentInstrumentId,
	) -> Result<Basket> {
		let path = format!(
			"/baskets/{basket_id}/{}/{instrument_id}",
			self.word("payment-instruments", "payment_instruments")
		);

		self.send(ApiRequest::new(Operation::RemovePaymentInstrumentFromBasket, Method::DELETE, path))
			.await
	}

	/// Applies a promo code.
	pub async fn add_coupon_to_basket(&self, basket_id: &BasketId, code: &str) -> Result<Basket> {
		self.send(
			ApiRequest::new(
				Operation::AddCouponToBasket,
				Method::POST,
				format!("/baskets/{basket_id}/coupons"),
			)
			.json(json!({ "code": code })),
		)
		.await
	}

	/// Removes an applied coupon.
	pub async fn remove_coupon_from_basket(
		&self,
		basket_id: &BasketId,
		coupon_item_id: &CouponItemId,
	) -> Result<Basket> {
		self.send(ApiRequest::new(
			Operation::RemoveCouponFromBasket,
			Method::DELETE,
			format!("/baskets/{basket_id}/coupons/{coupon_item_id}"),
		))
		.await
	}

	async fn send<T>(&self, request: ApiRequest) -> Result<T>
	where
		T: serde::de::DeserializeOwned,
	{
		self.api.with_auth(request).await?.decode()
	}

	fn merge_path(&self) -> &'static str {
		self.word("/baskets/actions/merge", "/baskets/merge")
	}

	// Path and query words differ between the two dialects.
	fn word(&self, scapi: &'static str, ocapi: &'static str) -> &'static str {
		match self.api.config().basket_dialect {
			Dialect::Scapi => scapi,
			Dialect::Ocapi { .. } => ocapi,
		}
	}
}
