//! Basket synchronizer: keeps the shopper's basket aligned with the authenticated customer.
//!
//! [`BasketSynchronizer::synchronize`] is re-run whenever the customer changes (login, logout,
//! session bootstrap). It evaluates, in order:
//!
//! 1. guest → registered transition with a non-empty guest basket: merge into the
//!    registered shopper's basket (the platform creates the destination and deletes the
//!    source);
//! 2. no basket loaded: fetch the customer's first basket or create one;
//! 3. loaded basket owned by another customer: fetch-or-create for the current customer;
//! 4. registered customer whose email differs from the basket's: patch the basket's
//!    customer info;
//! 5. line items without cached product details: fetch them in batches.
//!
//! Mutations replace the local basket with the server's representation. The product detail
//! cache lives beside the basket, so replacements never drop it.

// self
use crate::{
	_prelude::*,
	api::{Api, TransportErrorMapper},
	auth::{BasketId, CouponItemId, CustomerId, ItemId, ProductId},
	error::ConfigError,
	http::CommerceHttpClient,
	model::{
		Address, AuthType, Basket, Customer, Order, PaymentInstrument, Product, ProductItem,
		ShippingMethodResult,
	},
	obs::{self, FlowKind},
};

const DEFAULT_SHIPMENT_ID: &str = "me";

/// Local basket state.
#[derive(Clone, Debug, Default)]
pub struct BasketState {
	/// Server basket, when one is loaded.
	pub basket: Option<Basket>,
	/// Product details for line items; additive, never evicted.
	pub product_items_detail: HashMap<ProductId, Product>,
	/// Order placed by the last [`BasketSynchronizer::create_order`].
	pub last_order: Option<Order>,
}

/// Step taken by one synchronization pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyncAction {
	/// The guest basket was merged into the registered shopper's basket.
	Merged {
		/// Destination basket.
		basket_id: BasketId,
	},
	/// A basket was loaded for the customer.
	Loaded {
		/// Loaded basket.
		basket_id: BasketId,
		/// `true` when no basket existed and one was created.
		created: bool,
	},
	/// The basket's email was replaced with the customer's.
	EmailUpdated {
		/// New email.
		email: String,
	},
	/// Missing product details were fetched.
	DetailsFetched {
		/// Number of products fetched.
		count: usize,
	},
}

/// Outcome of [`BasketSynchronizer::synchronize`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
	/// Actions in the order they were taken.
	pub actions: Vec<SyncAction>,
}
impl SyncReport {
	/// Returns `true` when the pass changed nothing.
	pub fn is_noop(&self) -> bool {
		self.actions.is_empty()
	}
}

/// Reconciles basket identity with customer identity and performs basket mutations.
pub struct BasketSynchronizer<C, M>
where
	C: ?Sized + CommerceHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	api: Arc<Api<C, M>>,
	guard: AsyncMutex<()>,
	state: RwLock<BasketState>,
	last_auth_type: RwLock<Option<AuthType>>,
}
impl<C, M> BasketSynchronizer<C, M>
where
	C: ?Sized + CommerceHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a synchronizer with no basket loaded.
	pub fn new(api: Arc<Api<C, M>>) -> Self {
		Self {
			api,
			guard: AsyncMutex::new(()),
			state: Default::default(),
			last_auth_type: Default::default(),
		}
	}

	/// Snapshot of the local state.
	pub fn state(&self) -> BasketState {
		self.state.read().clone()
	}

	/// Loaded basket, if any.
	pub fn basket(&self) -> Option<Basket> {
		self.state.read().basket.clone()
	}

	/// Cached detail for a line item's product.
	pub fn product_detail(&self, product_id: &str) -> Option<Product> {
		self.state.read().product_items_detail.get(product_id).cloned()
	}

	/// Last order placed through this synchronizer.
	pub fn last_order(&self) -> Option<Order> {
		self.state.read().last_order.clone()
	}

	/// Reconciles the basket with `customer`; see the module docs for the evaluation order.
	pub async fn synchronize(&self, customer: &Customer) -> Result<SyncReport> {
		obs::observe(FlowKind::BasketSync, "synchronize", async {
			let _guard = self.guard.lock().await;

			self.synchronize_locked(customer).await
		})
		.await
	}

	async fn synchronize_locked(&self, customer: &Customer) -> Result<SyncReport> {
		let mut report = SyncReport::default();
		let previous = *self.last_auth_type.read();
		let guest_has_items =
			self.state.read().basket.as_ref().is_some_and(|basket| !basket.product_items.is_empty());

		if previous == Some(AuthType::Guest) && customer.is_registered() && guest_has_items {
			let merged = self.api.baskets().merge_basket().await?;

			report.actions.push(SyncAction::Merged { basket_id: merged.basket_id.clone() });

			self.replace_basket(merged);
		}

		let owner_matches = self
			.state
			.read()
			.basket
			.as_ref()
			.map(|basket| basket.customer_id() == Some(&customer.customer_id));

		if owner_matches != Some(true) {
			let (basket, created) = self.fetch_or_create(&customer.customer_id).await?;

			report
				.actions
				.push(SyncAction::Loaded { basket_id: basket.basket_id.clone(), created });

			self.replace_basket(basket);
		}

		if customer.is_registered()
			&& let Some(email) = customer.email.as_deref()
			&& let Some(basket) = self.basket()
			&& basket.email() != Some(email)
		{
			let updated = self
				.api
				.baskets()
				.update_customer_for_basket(&basket.basket_id, json!({ "email": email }))
				.await?;

			report.actions.push(SyncAction::EmailUpdated { email: email.to_owned() });

			self.replace_basket(updated);
		}

		let fetched = self.fetch_missing_details().await?;

		if fetched > 0 {
			report.actions.push(SyncAction::DetailsFetched { count: fetched });
		}

		*self.last_auth_type.write() = Some(customer.auth_type);

		Ok(report)
	}

	/// Returns the customer's first basket, creating one when none exists.
	pub async fn get_or_create_basket(&self, customer_id: &CustomerId) -> Result<Basket> {
		let _guard = self.guard.lock().await;
		let (basket, _) = self.fetch_or_create(customer_id).await?;

		self.replace_basket(basket.clone());

		Ok(basket)
	}

	/// Adds line items.
	pub async fn add_item_to_basket(&self, items: Vec<ProductItem>) -> Result<Basket> {
		let _guard = self.guard.lock().await;
		let basket_id = self.require_basket_id()?;
		let basket = self.api.baskets().add_item_to_basket(&basket_id, &items).await?;

		Ok(self.apply(basket).await)
	}

	/// Removes a line item.
	pub async fn remove_item_from_basket(&self, item_id: &ItemId) -> Result<Basket> {
		let _guard = self.guard.lock().await;
		let basket_id = self.require_basket_id()?;
		let basket = self.api.baskets().remove_item_from_basket(&basket_id, item_id).await?;

		Ok(self.apply(basket).await)
	}

	/// Changes a line item's quantity.
	pub async fn update_item_in_basket(&self, item_id: &ItemId, quantity: u32) -> Result<Basket> {
		let _guard = self.guard.lock().await;
		let basket_id = self.require_basket_id()?;
		let basket = self
			.api
			.baskets()
			.update_item_in_basket(&basket_id, item_id, json!({ "quantity": quantity }))
			.await?;

		Ok(self.apply(basket).await)
	}

	/// Replaces the basket's contact email.
	pub async fn update_customer_info(&self, email: &str) -> Result<Basket> {
		let _guard = self.guard.lock().await;
		let basket_id = self.require_basket_id()?;
		let basket = self
			.api
			.baskets()
			.update_customer_for_basket(&basket_id, json!({ "email": email }))
			.await?;

		Ok(self.apply(basket).await)
	}

	/// Sets the default shipment's destination.
	pub async fn set_shipping_address(&self, address: &Address) -> Result<Basket> {
		let _guard = self.guard.lock().await;
		let basket_id = self.require_basket_id()?;
		let shipment_id = self.shipment_id();
		let basket = self
			.api
			.baskets()
			.update_shipping_address_for_shipment(&basket_id, &shipment_id, address)
			.await?;

		Ok(self.apply(basket).await)
	}

	/// Selects the default shipment's shipping method.
	pub async fn set_shipping_method(&self, method_id: &str) -> Result<Basket> {
		let _guard = self.guard.lock().await;
		let basket_id = self.require_basket_id()?;
		let shipment_id = self.shipment_id();
		let basket = self
			.api
			.baskets()
			.update_shipping_method_for_shipment(&basket_id, &shipment_id, method_id)
			.await?;

		Ok(self.apply(basket).await)
	}

	/// Lists shipping methods for the default shipment.
	pub async fn get_shipping_methods(&self) -> Result<ShippingMethodResult> {
		let basket_id = self.require_basket_id()?;
		let shipment_id = self.shipment_id();

		self.api.baskets().get_shipping_methods_for_shipment(&basket_id, &shipment_id).await
	}

	/// Sets the billing address.
	pub async fn set_billing_address(&self, address: &Address) -> Result<Basket> {
		let _guard = self.guard.lock().await;
		let basket_id = self.require_basket_id()?;
		let basket =
			self.api.baskets().update_billing_address_for_basket(&basket_id, address).await?;

		Ok(self.apply(basket).await)
	}

	/// Attaches `instrument`, then detaches the previously attached one.
	///
	/// The two calls are not atomic. When the removal fails the basket keeps both instruments;
	/// the failure is logged and returned, and the basket state reflects the addition.
	pub async fn set_payment_instrument(&self, instrument: &PaymentInstrument) -> Result<Basket> {
		let _guard = self.guard.lock().await;
		let basket_id = self.require_basket_id()?;
		let previous = self.basket().and_then(|basket| {
			basket
				.payment_instruments
				.first()
				.and_then(|existing| existing.payment_instrument_id.clone())
		});
		let added =
			self.api.baskets().add_payment_instrument_to_basket(&basket_id, instrument).await?;
		let mut basket = self.apply(added).await;

		if let Some(previous) = previous {
			match self
				.api
				.baskets()
				.remove_payment_instrument_from_basket(&basket_id, &previous)
				.await
			{
				Ok(removed) => basket = self.apply(removed).await,
				Err(err) => {
					obs::record_warning(
						FlowKind::BasketSync,
						"Previous payment instrument could not be removed; basket holds both.",
					);

					return Err(err);
				},
			}
		}

		Ok(basket)
	}

	/// Applies a promo code.
	pub async fn apply_promo_code(&self, code: &str) -> Result<Basket> {
		let _guard = self.guard.lock().await;
		let basket_id = self.require_basket_id()?;
		let basket = self.api.baskets().add_coupon_to_basket(&basket_id, code).await?;

		Ok(self.apply(basket).await)
	}

	/// Removes an applied coupon.
	pub async fn remove_promo_code(&self, coupon_item_id: &CouponItemId) -> Result<Basket> {
		let _guard = self.guard.lock().await;
		let basket_id = self.require_basket_id()?;
		let basket = self.api.baskets().remove_coupon_from_basket(&basket_id, coupon_item_id).await?;

		Ok(self.apply(basket).await)
	}

	/// Places an order from the basket. The platform consumes the basket, so the local one is
	/// dropped and the next synchronization loads a fresh basket.
	pub async fn create_order(&self) -> Result<Order> {
		let _guard = self.guard.lock().await;
		let basket_id = self.require_basket_id()?;
		let order = self.api.orders().create_order(&basket_id).await?;
		let mut state = self.state.write();

		state.basket = None;
		state.last_order = Some(order.clone());

		Ok(order)
	}

	/// Deletes the loaded basket.
	pub async fn delete_basket(&self) -> Result<()> {
		let _guard = self.guard.lock().await;
		let basket_id = self.require_basket_id()?;

		self.api.baskets().delete_basket(&basket_id).await?;
		self.state.write().basket = None;

		Ok(())
	}

	async fn fetch_or_create(&self, customer_id: &CustomerId) -> Result<(Basket, bool)> {
		let existing = self.api.customers().get_customer_baskets(customer_id).await?;

		if let Some(basket) = existing.baskets.into_iter().next() {
			return Ok((basket, false));
		}

		let currency = &self.api.config().currency;

		Ok((self.api.baskets().create_basket(json!({ "currency": currency })).await?, true))
	}

	// Detail fetch failures are non-fatal; the next synchronization retries them.
	async fn apply(&self, basket: Basket) -> Basket {
		self.replace_basket(basket.clone());

		if let Err(err) = self.fetch_missing_details().await {
			obs::record_warning(
				FlowKind::BasketSync,
				&format!("Product details could not be fetched: {err}"),
			);
		}

		basket
	}

	async fn fetch_missing_details(&self) -> Result<usize> {
		let missing = {
			let state = self.state.read();
			let Some(basket) = state.basket.as_ref() else {
				return Ok(0);
			};

			basket
				.product_ids()
				.into_iter()
				.filter(|id| !state.product_items_detail.contains_key(id))
				.collect::<Vec<_>>()
		};

		if missing.is_empty() {
			return Ok(0);
		}

		let products = self.api.products().get_products_batched(&missing).await?;
		let count = products.len();
		let mut state = self.state.write();

		for product in products {
			state.product_items_detail.insert(product.id.clone(), product);
		}

		Ok(count)
	}

	fn replace_basket(&self, basket: Basket) {
		self.state.write().basket = Some(basket);
	}

	fn require_basket_id(&self) -> Result<BasketId> {
		self.state
			.read()
			.basket
			.as_ref()
			.map(|basket| basket.basket_id.clone())
			.ok_or_else(|| ConfigError::MissingBasket.into())
	}

	fn shipment_id(&self) -> String {
		self.state
			.read()
			.basket
			.as_ref()
			.and_then(|basket| basket.shipments.first())
			.map(|shipment| shipment.shipment_id.clone())
			.unwrap_or_else(|| DEFAULT_SHIPMENT_ID.to_owned())
	}
}
impl<C, M> Debug for BasketSynchronizer<C, M>
where
	C: ?Sized + CommerceHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("BasketSynchronizer").field("state", &*self.state.read()).finish()
	}
}
