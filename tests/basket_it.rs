mod common;

// self
use commerce_session::{
	auth::{Credentials, ProductId},
	basket::SyncAction,
	error::Error,
	model::{Address, PaymentInstrument, ProductItem},
	storefront::Storefront,
};
use common::{FakeCommerce, SHOPPER_EMAIL, SHOPPER_PASSWORD};

fn item(product_id: &str, quantity: u32) -> ProductItem {
	ProductItem::new(
		ProductId::new(product_id).expect("Product id fixture should be valid."),
		quantity,
	)
}

fn address() -> Address {
	Address {
		first_name: Some("Ada".into()),
		last_name: Some("Lovelace".into()),
		address1: Some("12 St James's Square".into()),
		city: Some("London".into()),
		postal_code: Some("SW1Y 4JH".into()),
		country_code: Some("GB".into()),
		..Default::default()
	}
}

fn card(method: &str) -> PaymentInstrument {
	PaymentInstrument {
		payment_method_id: Some(method.into()),
		amount: Some(19.99),
		..Default::default()
	}
}

#[tokio::test]
async fn guest_basket_is_merged_into_the_registered_basket_on_login() {
	let (fake, customer_id) = FakeCommerce::new().with_shopper();
	let harness = common::harness(fake);
	let storefront = Storefront::new(harness.api.clone());
	let started = storefront.start().await.expect("Start should succeed.");

	assert!(matches!(started.actions.as_slice(), [SyncAction::Loaded { created: true, .. }]));

	let guest = storefront.customer().expect("A guest customer should be loaded.");

	assert!(!guest.is_registered());

	storefront.basket().add_item_to_basket(vec![item("P1", 1)]).await.expect("Add should succeed.");

	let report = storefront
		.login(Credentials::new(SHOPPER_EMAIL, SHOPPER_PASSWORD))
		.await
		.expect("Login should succeed.");

	assert!(matches!(report.actions.first(), Some(SyncAction::Merged { .. })));
	assert!(report.actions.contains(&SyncAction::EmailUpdated { email: SHOPPER_EMAIL.into() }));

	let basket = storefront.basket().basket().expect("A basket should be loaded.");

	assert_eq!(basket.customer_id().map(|id| &**id), Some(customer_id.as_str()));
	assert_eq!(basket.item_count(), 1);
	assert_eq!(basket.email(), Some(SHOPPER_EMAIL));
	assert!(harness.fake.baskets_of(&guest.customer_id).is_empty());
	let merge = &harness.fake.calls_to("/baskets/actions/merge")[0];

	assert_eq!(merge.query("createDestinationBasket"), Some("true"));
	assert!(storefront.basket().product_detail("P1").is_some());
}

#[tokio::test]
async fn empty_guest_baskets_are_not_merged() {
	let (fake, customer_id) = FakeCommerce::new().with_shopper();
	let harness = common::harness(fake);
	let storefront = Storefront::new(harness.api.clone());

	storefront.start().await.expect("Start should succeed.");

	let report = storefront
		.login(Credentials::new(SHOPPER_EMAIL, SHOPPER_PASSWORD))
		.await
		.expect("Login should succeed.");

	assert!(matches!(report.actions.first(), Some(SyncAction::Loaded { created: true, .. })));
	assert!(harness.fake.calls_to("/baskets/actions/merge").is_empty());

	let basket = storefront.basket().basket().expect("A basket should be loaded.");

	assert_eq!(basket.customer_id().map(|id| &**id), Some(customer_id.as_str()));
}

#[tokio::test]
async fn synchronization_is_idempotent_and_reuses_existing_baskets() {
	let (fake, _) = FakeCommerce::new().with_shopper();
	let harness = common::harness(fake.clone());
	let storefront = Storefront::new(harness.api.clone());

	storefront.start().await.expect("Start should succeed.");
	storefront
		.login(Credentials::new(SHOPPER_EMAIL, SHOPPER_PASSWORD))
		.await
		.expect("Login should succeed.");

	assert!(storefront.refresh().await.expect("Refresh should succeed.").is_noop());

	let basket_id = storefront.basket().basket().expect("A basket should be loaded.").basket_id;
	// Same store and backend, fresh process state.
	let restarted = common::harness_with_store(fake, harness.store.clone());
	let storefront = Storefront::new(restarted.api.clone());
	let report = storefront.start().await.expect("Restart should succeed.");

	assert!(
		report.actions.contains(&SyncAction::Loaded { basket_id: basket_id.clone(), created: false })
	);
	assert!(storefront.customer().expect("Customer should be loaded.").is_registered());
	assert_eq!(storefront.basket().basket().map(|basket| basket.basket_id), Some(basket_id));
}

#[tokio::test]
async fn mutations_keep_the_product_detail_cache() {
	let harness = common::harness(FakeCommerce::new());
	let storefront = Storefront::new(harness.api.clone());

	storefront.start().await.expect("Start should succeed.");

	let synchronizer = storefront.basket();

	synchronizer.add_item_to_basket(vec![item("P1", 1)]).await.expect("Add should succeed.");

	let basket =
		synchronizer.add_item_to_basket(vec![item("P2", 2)]).await.expect("Add should succeed.");

	assert_eq!(basket.item_count(), 3);
	assert_eq!(harness.fake.product_batches(), vec![1, 1]);

	let first = basket.product_items[0].item_id.clone().expect("Items carry server ids.");
	let basket =
		synchronizer.update_item_in_basket(&first, 4).await.expect("Update should succeed.");

	assert_eq!(basket.item_count(), 6);

	let basket = synchronizer.remove_item_from_basket(&first).await.expect("Remove should succeed.");

	assert_eq!(basket.item_count(), 2);
	assert!(synchronizer.product_detail("P1").is_some());
	assert!(synchronizer.product_detail("P2").is_some());
	assert_eq!(harness.fake.product_batches(), vec![1, 1]);
}

#[tokio::test]
async fn missing_details_are_fetched_in_batches_of_24() {
	let harness = common::harness(FakeCommerce::new());
	let storefront = Storefront::new(harness.api.clone());

	storefront.start().await.expect("Start should succeed.");

	let items = (0..30).map(|n| item(&format!("P{n}"), 1)).collect();

	storefront.basket().add_item_to_basket(items).await.expect("Add should succeed.");

	assert_eq!(harness.fake.product_batches(), vec![24, 6]);
	assert_eq!(storefront.basket().state().product_items_detail.len(), 30);
}

#[tokio::test]
async fn catalog_outages_do_not_fail_committed_mutations() {
	let harness = common::harness(FakeCommerce::new());
	let storefront = Storefront::new(harness.api.clone());

	storefront.start().await.expect("Start should succeed.");
	harness.fake.set_product_unavailable("OUTAGE", true);

	let synchronizer = storefront.basket();
	let basket = synchronizer
		.add_item_to_basket(vec![item("OUTAGE", 1)])
		.await
		.expect("The server accepted the item, so the add should succeed.");

	assert_eq!(basket.item_count(), 1);
	assert!(synchronizer.product_detail("OUTAGE").is_none());
	assert!(harness.fake.product_batches().is_empty());

	synchronizer.set_payment_instrument(&card("CREDIT_CARD")).await.expect("Card should attach.");

	let basket =
		synchronizer.set_payment_instrument(&card("GIFT_CARD")).await.expect("Card should swap.");

	// The swap still removes the previous instrument while details are unavailable.
	assert_eq!(basket.payment_instruments.len(), 1);
	assert_eq!(basket.payment_instruments[0].payment_method_id.as_deref(), Some("GIFT_CARD"));

	harness.fake.set_product_unavailable("OUTAGE", false);

	let report = storefront.refresh().await.expect("Refresh should succeed.");

	assert!(report.actions.contains(&SyncAction::DetailsFetched { count: 1 }));
	assert!(synchronizer.product_detail("OUTAGE").is_some());
}

#[tokio::test]
async fn new_baskets_are_created_in_the_configured_currency() {
	let harness = common::harness(FakeCommerce::new());
	let storefront = Storefront::new(harness.api.clone());

	storefront.start().await.expect("Start should succeed.");

	// The fake echoes the requested currency and leaves it unset when none is sent.
	let basket = storefront.basket().basket().expect("A basket should be loaded.");

	assert_eq!(basket.currency.as_deref(), Some("USD"));
}

#[tokio::test]
async fn checkout_steps_update_the_local_basket() {
	let harness = common::harness(FakeCommerce::new());
	let storefront = Storefront::new(harness.api.clone());

	storefront.start().await.expect("Start should succeed.");

	let synchronizer = storefront.basket();

	synchronizer.add_item_to_basket(vec![item("P1", 1)]).await.expect("Add should succeed.");
	synchronizer.update_customer_info("guest@example.com").await.expect("Email should be set.");

	let basket =
		synchronizer.set_shipping_address(&address()).await.expect("Address should be set.");

	assert_eq!(
		basket.shipments[0].shipping_address.as_ref().and_then(|a| a.city.as_deref()),
		Some("London")
	);

	let methods = synchronizer.get_shipping_methods().await.expect("Methods should load.");

	assert_eq!(methods.default_shipping_method_id.as_deref(), Some("001"));
	assert_eq!(methods.applicable_shipping_methods.len(), 2);

	let basket = synchronizer.set_shipping_method("002").await.expect("Method should be set.");

	assert_eq!(basket.shipments[0].shipping_method.as_ref().map(|m| m.id.as_str()), Some("002"));

	let basket =
		synchronizer.set_billing_address(&address()).await.expect("Billing should be set.");

	assert_eq!(basket.email(), Some("guest@example.com"));
	assert!(basket.billing_address.is_some());

	synchronizer.set_payment_instrument(&card("CREDIT_CARD")).await.expect("Card should attach.");

	let basket =
		synchronizer.set_payment_instrument(&card("GIFT_CARD")).await.expect("Card should swap.");

	assert_eq!(basket.payment_instruments.len(), 1);
	assert_eq!(basket.payment_instruments[0].payment_method_id.as_deref(), Some("GIFT_CARD"));

	let err = synchronizer.apply_promo_code("BOGUS").await.expect_err("Bad codes are rejected.");

	match err {
		Error::Api(api) => assert_eq!(api.error_type(), "invalid-coupon-code"),
		other => panic!("Unexpected error: {other:?}."),
	}

	let basket = synchronizer.apply_promo_code("SAVE10").await.expect("Code should apply.");
	let coupon = basket.coupon_items[0].coupon_item_id.clone().expect("Coupons carry ids.");
	let basket = synchronizer.remove_promo_code(&coupon).await.expect("Code should be removed.");

	assert!(basket.coupon_items.is_empty());

	let order = synchronizer.create_order().await.expect("Order should be placed.");

	assert_eq!(order.status.as_deref(), Some("created"));
	assert_eq!(order.product_items.len(), 1);
	assert!(synchronizer.basket().is_none());
	assert_eq!(synchronizer.last_order().map(|o| o.order_no), Some(order.order_no.clone()));

	let report = storefront.refresh().await.expect("Refresh should succeed.");

	assert!(matches!(report.actions.as_slice(), [SyncAction::Loaded { created: true, .. }]));
	assert_eq!(synchronizer.basket().map(|basket| basket.item_count()), Some(0));
}

#[tokio::test]
async fn failed_instrument_removal_leaves_both_instruments_attached() {
	let harness = common::harness(FakeCommerce::new());
	let storefront = Storefront::new(harness.api.clone());

	storefront.start().await.expect("Start should succeed.");

	let synchronizer = storefront.basket();

	synchronizer.set_payment_instrument(&card("CREDIT_CARD")).await.expect("Card should attach.");
	harness.fake.fail_payment_removal(true);

	let err = synchronizer
		.set_payment_instrument(&card("GIFT_CARD"))
		.await
		.expect_err("Removal failure should surface.");

	assert!(matches!(err, Error::Api(_)));
	assert_eq!(synchronizer.basket().map(|basket| basket.payment_instruments.len()), Some(2));
}

#[tokio::test]
async fn mutations_without_a_basket_are_rejected_locally() {
	let harness = common::harness(FakeCommerce::new());
	let storefront = Storefront::new(harness.api.clone());
	let err = storefront
		.basket()
		.add_item_to_basket(vec![item("P1", 1)])
		.await
		.expect_err("No basket is loaded yet.");

	assert!(matches!(err, Error::Config(_)));
	assert!(harness.fake.calls().is_empty());
}

#[tokio::test]
async fn logout_switches_the_basket_to_a_new_guest() {
	let (fake, customer_id) = FakeCommerce::new().with_shopper();
	let harness = common::harness(fake);
	let storefront = Storefront::new(harness.api.clone());

	storefront.start().await.expect("Start should succeed.");
	storefront
		.login(Credentials::new(SHOPPER_EMAIL, SHOPPER_PASSWORD))
		.await
		.expect("Login should succeed.");
	storefront.logout().await.expect("Logout should succeed.");

	let customer = storefront.customer().expect("A guest should be loaded.");
	let basket = storefront.basket().basket().expect("A guest basket should be loaded.");

	assert!(!customer.is_registered());
	assert_ne!(&*customer.customer_id, customer_id);
	assert_eq!(basket.customer_id(), Some(&customer.customer_id));
	assert_eq!(harness.fake.baskets_of(&customer_id).len(), 1);
}
