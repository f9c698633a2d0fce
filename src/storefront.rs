//! Application state container tying customer, basket, and wishlist together.
//!
//! A [`Storefront`] is created once per shopper-facing process and handed to whatever needs
//! commerce state. It owns no global state; every collaborator is reachable from it.

// self
use crate::{
	_prelude::*,
	api::{Api, TransportErrorMapper},
	auth::Credentials,
	basket::{BasketSynchronizer, SyncReport},
	flows::Session,
	http::CommerceHttpClient,
	model::{AuthType, Customer},
	product_list::{ProductListConfig, ProductListService},
};

/// Customer, basket, and wishlist state for one shopper.
pub struct Storefront<C, M>
where
	C: ?Sized + CommerceHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	api: Arc<Api<C, M>>,
	basket: BasketSynchronizer<C, M>,
	wishlist: ProductListService<C, M>,
	customer: RwLock<Option<Customer>>,
}
impl<C, M> Storefront<C, M>
where
	C: ?Sized + CommerceHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a storefront whose wishlist is [`ProductListConfig::wishlist`].
	pub fn new(api: Arc<Api<C, M>>) -> Self {
		Self::with_list_config(api, ProductListConfig::wishlist())
	}

	/// Creates a storefront managing the list described by `config` as its wishlist.
	pub fn with_list_config(api: Arc<Api<C, M>>, config: ProductListConfig) -> Self {
		Self {
			basket: BasketSynchronizer::new(api.clone()),
			wishlist: ProductListService::new(api.clone(), config),
			api,
			customer: RwLock::new(None),
		}
	}

	/// Underlying API facade.
	pub fn api(&self) -> &Arc<Api<C, M>> {
		&self.api
	}

	/// Current customer, once [`Storefront::start`] or a login completed.
	pub fn customer(&self) -> Option<Customer> {
		self.customer.read().clone()
	}

	/// Basket synchronizer.
	pub fn basket(&self) -> &BasketSynchronizer<C, M> {
		&self.basket
	}

	/// Wishlist service.
	pub fn wishlist(&self) -> &ProductListService<C, M> {
		&self.wishlist
	}

	/// Resumes (or bootstraps) a session and synchronizes the basket.
	pub async fn start(&self) -> Result<SyncReport> {
		let session = self.api.auth().login(None).await?;

		self.adopt(&session).await
	}

	/// Logs in with `credentials`, loads the customer profile, and synchronizes the basket.
	///
	/// A guest basket with items is merged into the registered shopper's basket.
	pub async fn login(&self, credentials: Credentials) -> Result<SyncReport> {
		let session = self.api.auth().login(Some(credentials)).await?;

		self.adopt(&session).await
	}

	/// Logs out, starts a fresh guest session, and synchronizes the basket for it.
	pub async fn logout(&self) -> Result<SyncReport> {
		let session = match self.api.auth().logout(true).await? {
			Some(session) => session,
			None => self.api.auth().login(None).await?,
		};

		self.adopt(&session).await
	}

	/// Re-runs basket synchronization for the current customer.
	pub async fn refresh(&self) -> Result<SyncReport> {
		match self.customer() {
			Some(customer) => self.basket.synchronize(&customer).await,
			None => self.start().await,
		}
	}

	async fn adopt(&self, session: &Session) -> Result<SyncReport> {
		let customer = self.load_customer(session).await?;
		let changed = self
			.customer
			.read()
			.as_ref()
			.is_none_or(|previous| previous.customer_id != customer.customer_id);

		if changed {
			self.wishlist.reset();
		}

		*self.customer.write() = Some(customer.clone());

		self.basket.synchronize(&customer).await
	}

	async fn load_customer(&self, session: &Session) -> Result<Customer> {
		if !session.is_registered() {
			return Ok(Customer::guest(session.customer_id.clone()));
		}

		let mut customer = self.api.customers().get_customer(&session.customer_id).await?;

		customer.auth_type = AuthType::Registered;

		Ok(customer)
	}
}
impl<C, M> Debug for Storefront<C, M>
where
	C: ?Sized + CommerceHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Storefront")
			.field("customer", &*self.customer.read())
			.field("basket", &self.basket)
			.field("wishlist", &self.wishlist)
			.finish()
	}
}
