//! Shopper order resource.

// self
use crate::{
	_prelude::*,
	api::{Api, ApiRequest, Method, Operation, TransportErrorMapper},
	auth::BasketId,
	http::CommerceHttpClient,
	model::Order,
};

/// Order calls, routed through the request interceptor.
pub struct ShopperOrders<'a, C, M>
where
	C: ?Sized + CommerceHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	api: &'a Api<C, M>,
}
impl<'a, C, M> ShopperOrders<'a, C, M>
where
	C: ?Sized + CommerceHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	pub(crate) fn new(api: &'a Api<C, M>) -> Self {
		Self { api }
	}

	/// Places an order from a basket. The platform consumes the basket.
	pub async fn create_order(&self, basket_id: &BasketId) -> Result<Order> {
		let request = ApiRequest::new(Operation::CreateOrder, Method::POST, "/orders")
			.json(json!({ "basketId": basket_id.as_ref() }));

		self.api.with_auth(request).await?.decode()
	}
}
