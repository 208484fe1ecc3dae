//! Application state store.
//!
//! [`Storefront`] owns the catalog, cart, order history, contact queue, the
//! signed-in identity and the view navigator. View code calls its operations
//! and renders from its accessors. Cart, orders and identity are written to
//! the [`KeyValueStore`] after every change and read back by
//! [`Storefront::load`].

use chrono::{Local, NaiveDate};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use validator::{Validate, ValidationError};

use crate::auth::{check_admin_pin, LoginForm, OtpChallenge, ResendCooldown, MIN_NAME_LEN};
use crate::backend::{Backend, SimulatedBackend};
use crate::config::StorefrontConfig;
use crate::domain::aggregates::order::{next_order_id, seed_orders};
use crate::domain::aggregates::product::seed_catalog;
use crate::domain::aggregates::{
    Cart, CartItem, Catalog, Category, ContactForm, ContactMessage, CustomerProfile, NewOrder, NewProduct,
    Order, OrderStatus, Product, ProductPatch,
};
use crate::domain::events::StoreEvent;
use crate::domain::value_objects::Money;
use crate::navigation::{History, MemoryHistory, Navigator, View};
use crate::payment::upi_payment_uri;
use crate::revenue::{dashboard_stats, revenue_report, DashboardStats, RevenueReport};
use crate::storage::{load_json, save_json, KeyValueStore, CART_KEY, ORDERS_KEY, PROFILE_KEY, USER_NAME_KEY};
use crate::{Result, StorefrontError};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Upi,
    CashOnDelivery,
}

fn not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() { return Err(ValidationError::new("blank")); }
    Ok(())
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate)]
pub struct CheckoutForm {
    #[validate(custom = "not_blank")]
    pub address: String,
    #[serde(default)]
    pub payment: PaymentMethod,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ShopOutcome {
    Added { quantity: u32 },
    LoginRequired,
}

#[derive(Clone, Debug, Serialize)]
pub struct CheckoutQuote {
    pub items: Vec<CartItem>,
    pub subtotal: Money,
    /// Equal to the subtotal; stored orders carry no fees.
    pub total: Money,
    pub upi_uri: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OtpDispatch {
    pub sent_to: String,
    pub resend_in: u32,
    pub notice: Option<String>,
}

pub struct Storefront {
    catalog: Catalog,
    cart: Cart,
    cart_open: bool,
    orders: Vec<Order>,
    messages: Vec<ContactMessage>,
    user_name: String,
    profile: CustomerProfile,
    admin: bool,
    otp: Option<OtpChallenge>,
    cooldown: ResendCooldown,
    navigator: Navigator,
    storage: Box<dyn KeyValueStore>,
    backend: Arc<dyn Backend>,
    config: StorefrontConfig,
    events: Vec<StoreEvent>,
}

fn restore<T: DeserializeOwned>(storage: &dyn KeyValueStore, key: &str) -> Option<T> {
    match load_json(storage, key) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "discarding stored value, using defaults");
            None
        }
    }
}

fn today() -> NaiveDate { Local::now().date_naive() }

impl Storefront {
    /// Builds the store from whatever `storage` holds, falling back to the
    /// seed catalog and demo orders where nothing usable is stored.
    pub fn load(
        storage: impl KeyValueStore + 'static,
        history: impl History + 'static,
        backend: Arc<dyn Backend>,
        config: StorefrontConfig,
    ) -> Self {
        let storage: Box<dyn KeyValueStore> = Box::new(storage);
        let cart = restore::<Vec<CartItem>>(storage.as_ref(), CART_KEY).map(Cart::from_items).unwrap_or_default();
        let orders = restore(storage.as_ref(), ORDERS_KEY).unwrap_or_else(seed_orders);
        let profile: CustomerProfile = restore(storage.as_ref(), PROFILE_KEY).unwrap_or_default();
        let user_name = restore::<String>(storage.as_ref(), USER_NAME_KEY)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| profile.name.clone());

        info!(cart_items = cart.item_count(), orders = orders.len(), signed_in = !user_name.is_empty(), "storefront loaded");
        Self {
            catalog: Catalog::new(seed_catalog()),
            cart,
            cart_open: false,
            orders,
            messages: Vec::new(),
            user_name,
            profile,
            admin: false,
            otp: None,
            cooldown: ResendCooldown::default(),
            navigator: Navigator::new(history),
            storage,
            backend,
            config,
            events: Vec::new(),
        }
    }

    /// In-process history, an instant backend and default settings.
    pub fn with_storage(storage: impl KeyValueStore + 'static) -> Self {
        let backend = Arc::new(SimulatedBackend::new(Duration::ZERO));
        Self::load(storage, MemoryHistory::new(), backend, StorefrontConfig::default())
    }

    // --- accessors ---

    pub fn view(&self) -> View { self.navigator.current() }
    pub fn products(&self) -> &[Product] { self.catalog.products() }
    pub fn products_in(&self, category: Option<Category>) -> Vec<&Product> { self.catalog.in_category(category) }
    pub fn low_stock_products(&self) -> Vec<&Product> { self.catalog.low_stock() }
    pub fn cart(&self) -> &Cart { &self.cart }
    pub fn is_cart_open(&self) -> bool { self.cart_open }
    pub fn orders(&self) -> &[Order] { &self.orders }
    pub fn contact_messages(&self) -> &[ContactMessage] { &self.messages }
    pub fn profile(&self) -> &CustomerProfile { &self.profile }
    pub fn is_signed_in(&self) -> bool { !self.user_name.is_empty() }
    pub fn is_admin(&self) -> bool { self.admin }
    pub fn otp_cooldown(&self) -> u32 { self.cooldown.remaining() }

    pub fn user_name(&self) -> Option<&str> {
        Some(self.user_name.as_str()).filter(|n| !n.is_empty())
    }

    pub fn take_events(&mut self) -> Vec<StoreEvent> { std::mem::take(&mut self.events) }

    // --- navigation ---

    pub fn navigate_to(&mut self, view: View) -> bool {
        let from = self.navigator.current();
        let moved = self.navigator.navigate_to(view);
        if moved { self.events.push(StoreEvent::Navigated { from, to: view }); }
        moved
    }

    pub fn back(&mut self) -> Option<View> {
        let from = self.navigator.current();
        let to = self.navigator.back()?;
        self.history_moved(from, to);
        Some(to)
    }

    pub fn forward(&mut self) -> Option<View> {
        let from = self.navigator.current();
        let to = self.navigator.forward()?;
        self.history_moved(from, to);
        Some(to)
    }

    fn history_moved(&mut self, from: View, to: View) {
        if from != to { self.events.push(StoreEvent::Navigated { from, to }); }
    }

    // --- cart ---

    pub fn add_to_cart(&mut self, product: &Product) {
        self.cart.add(product);
        debug!(product_id = %product.id, "added to cart");
        self.set_cart_open(true);
        self.persist_cart();
    }

    pub fn update_cart_quantity(&mut self, id: &str, delta: i64) {
        if self.cart.update_quantity(id, delta) {
            debug!(product_id = %id, delta, "cart quantity changed");
            self.persist_cart();
        }
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.persist_cart();
    }

    pub fn set_cart_open(&mut self, open: bool) {
        if open && !self.cart_open { self.events.push(StoreEvent::CartOpened); }
        self.cart_open = open;
    }

    /// Shop-page add button: guests are sent to sign in instead.
    pub fn shop_add_to_cart(&mut self, product_id: &str) -> Result<ShopOutcome> {
        if !self.is_signed_in() {
            self.navigate_to(View::Login);
            return Ok(ShopOutcome::LoginRequired);
        }
        let product = self
            .catalog
            .find(product_id)
            .cloned()
            .ok_or_else(|| StorefrontError::ProductNotFound(product_id.to_string()))?;
        self.add_to_cart(&product);
        let quantity = self.cart.get(product_id).map_or(0, |i| i.quantity);
        Ok(ShopOutcome::Added { quantity })
    }

    /// Cart checkout button. Returns the view it landed on.
    pub fn proceed_to_checkout(&mut self) -> View {
        let target = if self.is_signed_in() { View::Checkout } else { View::Login };
        self.navigate_to(target);
        self.view()
    }

    // --- checkout & orders ---

    pub fn checkout_quote(&self) -> CheckoutQuote {
        let subtotal = self.cart.subtotal();
        CheckoutQuote {
            items: self.cart.items().to_vec(),
            subtotal,
            total: subtotal,
            upi_uri: upi_payment_uri(&self.config.upi_payee, &self.config.upi_payee_name, subtotal),
        }
    }

    pub async fn place_order(&mut self, form: CheckoutForm) -> Result<Order> {
        if !self.is_signed_in() {
            self.navigate_to(View::Login);
            return Err(StorefrontError::LoginRequired);
        }
        if self.cart.is_empty() { return Err(StorefrontError::EmptyCart); }
        if form.validate().is_err() { return Err(StorefrontError::AddressMissing); }

        let status = match form.payment {
            PaymentMethod::Upi => OrderStatus::Paid,
            PaymentMethod::CashOnDelivery => OrderStatus::Pending,
        };
        let order = Order::place(NewOrder {
            id: next_order_id(&self.orders),
            customer_name: self.user_name.clone(),
            lines: self.cart.to_line_items(),
            summary: self.cart.summary(),
            status,
            placed_on: today(),
            address: Some(form.address.trim().to_string()),
            phone: Some(self.profile.phone.clone()).filter(|p| !p.is_empty()),
        });

        let backend = Arc::clone(&self.backend);
        let order = backend.submit_order(order).await?;
        info!(order_id = %order.id, total = order.total.amount(), status = %order.status, "order placed");
        self.events.push(StoreEvent::OrderPlaced { order_id: order.id.clone(), total: order.total });
        self.add_order(order.clone());
        self.clear_cart();
        self.cart_open = false;
        self.navigate_to(View::Shop);
        Ok(order)
    }

    pub fn add_order(&mut self, order: Order) {
        self.orders.insert(0, order);
        self.persist_orders();
    }

    /// Sets an explicit status. `None` when no order has `id`.
    pub fn set_order_status(&mut self, id: &str, status: OrderStatus) -> Option<OrderStatus> {
        let order = self.orders.iter_mut().find(|o| o.id == id)?;
        order.status = status;
        self.order_status_changed(id, status);
        Some(status)
    }

    /// Moves an order one step along Pending → Paid → Packed → Shipped → Pending.
    pub fn advance_order_status(&mut self, id: &str) -> Option<OrderStatus> {
        let order = self.orders.iter_mut().find(|o| o.id == id)?;
        order.status = order.status.next();
        let status = order.status;
        self.order_status_changed(id, status);
        Some(status)
    }

    fn order_status_changed(&mut self, id: &str, status: OrderStatus) {
        info!(order_id = %id, status = %status, "order status updated");
        self.events.push(StoreEvent::OrderStatusChanged { order_id: id.to_string(), status });
        self.persist_orders();
    }

    /// Orders placed under the signed-in name.
    pub fn customer_orders(&self) -> Vec<&Order> {
        match self.user_name() {
            Some(name) => self.orders.iter().filter(|o| o.customer_name == name).collect(),
            None => Vec::new(),
        }
    }

    // --- inventory ---

    pub fn set_products(&mut self, products: Vec<Product>) { self.catalog.set_products(products); }

    pub fn begin_inventory_edit(&mut self) -> &[Product] { self.catalog.begin_edit() }

    /// Draft under edit, or the live list when no edit is open.
    pub fn inventory_draft(&self) -> &[Product] { self.catalog.draft().unwrap_or(self.catalog.products()) }

    pub fn update_draft_product(&mut self, id: &str, patch: &ProductPatch) -> bool { self.catalog.update_draft(id, patch) }

    pub fn reset_draft_stock(&mut self) { self.catalog.reset_draft_stock(); }

    pub fn revert_draft(&mut self) { self.catalog.revert_draft(); }

    /// Saves the draft through the backend and makes it live. Without an open
    /// draft there is nothing to save and the live count is returned.
    pub async fn commit_inventory(&mut self) -> Result<usize> {
        let Some(draft) = self.catalog.draft().map(<[Product]>::to_vec) else {
            return Ok(self.catalog.products().len());
        };
        let backend = Arc::clone(&self.backend);
        let saved = backend.commit_catalog(draft).await?;
        self.catalog.take_draft();
        let count = saved.len();
        self.catalog.set_products(saved);
        info!(products = count, "catalog committed");
        self.events.push(StoreEvent::CatalogCommitted { products: count });
        Ok(count)
    }

    pub fn add_product(&mut self, form: NewProduct) -> Result<Product> {
        form.validate().map_err(|e| StorefrontError::InvalidInput(e.to_string()))?;
        let product = form.into_product();
        info!(product_id = %product.id, name = %product.name, "product added");
        self.events.push(StoreEvent::ProductAdded { product_id: product.id.clone() });
        self.catalog.add_product(product.clone());
        Ok(product)
    }

    pub fn delete_product(&mut self, id: &str) -> bool {
        let removed = self.catalog.delete_product(id);
        if removed {
            info!(product_id = %id, "product deleted");
            self.events.push(StoreEvent::ProductDeleted { product_id: id.to_string() });
        }
        removed
    }

    // --- identity ---

    pub async fn request_otp(&mut self, form: LoginForm) -> Result<OtpDispatch> {
        if self.cooldown.is_active() {
            return Err(StorefrontError::ResendCooldown { seconds: self.cooldown.remaining() });
        }
        let phone = form.check()?;
        let challenge = OtpChallenge::issue(&form.name, phone);
        let backend = Arc::clone(&self.backend);
        let notice = backend.deliver_otp(challenge.phone(), challenge.code()).await?;
        let sent_to = challenge.phone().masked();
        self.cooldown = ResendCooldown::start(self.config.otp_cooldown_secs);
        self.otp = Some(challenge);
        debug!(sent_to = %sent_to, "login code requested");
        Ok(OtpDispatch { sent_to, resend_in: self.cooldown.remaining(), notice })
    }

    pub fn tick_otp_cooldown(&mut self) -> u32 { self.cooldown.tick() }

    pub fn verify_otp(&mut self, code: &str) -> Result<()> {
        let challenge = self.otp.as_ref().ok_or(StorefrontError::NoOtpRequested)?;
        challenge.verify(code)?;
        let name = challenge.name().to_string();
        let phone = challenge.phone().to_string();
        self.otp = None;
        self.cooldown = ResendCooldown::default();

        self.profile.name = name.clone();
        self.profile.phone = phone;
        self.user_name = name.clone();
        self.persist_identity();
        info!(user = %name, "signed in");
        self.events.push(StoreEvent::SignedIn { name });
        self.navigate_to(View::Shop);
        Ok(())
    }

    pub fn unlock_admin(&mut self, pin: &str) -> Result<()> {
        if let Err(e) = check_admin_pin(&self.config.admin_pin, pin) {
            warn!("admin PIN rejected");
            return Err(e);
        }
        self.admin = true;
        self.events.push(StoreEvent::AdminUnlocked);
        self.navigate_to(View::AdminDashboard);
        Ok(())
    }

    /// Saves the profile; its name becomes the signed-in name. Signing out
    /// goes through [`Storefront::logout`], so a blank name is refused.
    pub fn update_profile(&mut self, profile: CustomerProfile) -> Result<()> {
        let name = profile.name.trim();
        if name.chars().count() < MIN_NAME_LEN { return Err(StorefrontError::NameTooShort); }
        self.user_name = name.to_string();
        self.profile = profile;
        self.persist_identity();
        debug!(user = %self.user_name, "profile updated");
        Ok(())
    }

    pub fn logout(&mut self) {
        info!(user = %self.user_name, "signed out");
        self.user_name.clear();
        self.profile = CustomerProfile::default();
        self.admin = false;
        self.otp = None;
        self.persist_identity();
        self.events.push(StoreEvent::SignedOut);
        self.navigate_to(View::Landing);
    }

    // --- contact & reporting ---

    pub fn submit_contact(&mut self, form: ContactForm) -> Result<ContactMessage> {
        form.validate().map_err(|e| StorefrontError::InvalidInput(e.to_string()))?;
        let message = ContactMessage::receive(form, today());
        info!(message_id = %message.id, "contact message received");
        self.events.push(StoreEvent::ContactReceived { message_id: message.id.clone() });
        self.messages.insert(0, message.clone());
        Ok(message)
    }

    pub fn revenue_report(&self) -> RevenueReport { revenue_report(&self.orders) }

    pub fn dashboard_stats(&self) -> DashboardStats {
        dashboard_stats(&self.orders, self.catalog.products(), self.messages.len())
    }

    // --- persistence ---

    fn persist_cart(&mut self) {
        if let Err(e) = save_json(self.storage.as_mut(), CART_KEY, self.cart.items()) {
            error!(error = %e, "failed to persist cart");
        }
    }

    fn persist_orders(&mut self) {
        if let Err(e) = save_json(self.storage.as_mut(), ORDERS_KEY, &self.orders) {
            error!(error = %e, "failed to persist orders");
        }
    }

    fn persist_identity(&mut self) {
        let result = if self.user_name.is_empty() {
            self.storage.remove(USER_NAME_KEY).and_then(|_| self.storage.remove(PROFILE_KEY))
        } else {
            save_json(self.storage.as_mut(), USER_NAME_KEY, &self.user_name)
                .and_then(|_| save_json(self.storage.as_mut(), PROFILE_KEY, &self.profile))
        };
        if let Err(e) = result {
            error!(error = %e, "failed to persist identity");
        }
    }
}

impl std::fmt::Debug for Storefront {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront")
            .field("view", &self.view())
            .field("cart_items", &self.cart.item_count())
            .field("orders", &self.orders.len())
            .field("signed_in", &self.is_signed_in())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn signed_in(storage: MemoryStorage) -> Storefront {
        let mut store = Storefront::with_storage(storage);
        store.update_profile(CustomerProfile { name: "Asha".into(), phone: "9876543210".into(), ..Default::default() }).unwrap();
        store
    }

    #[test]
    fn test_add_to_cart_opens_panel_once() {
        let mut store = signed_in(MemoryStorage::new());
        let spinach = store.products()[0].clone();
        store.add_to_cart(&spinach);
        store.add_to_cart(&spinach);
        assert!(store.is_cart_open());
        let opened = store.take_events().into_iter().filter(|e| *e == StoreEvent::CartOpened).count();
        assert_eq!(opened, 1);
    }

    #[test]
    fn test_unknown_product_on_shop_add() {
        let mut store = signed_in(MemoryStorage::new());
        assert!(matches!(store.shop_add_to_cart("nope"), Err(StorefrontError::ProductNotFound(_))));
    }

    #[test]
    fn test_status_setters_ignore_unknown_ids() {
        let mut store = Storefront::with_storage(MemoryStorage::new());
        assert_eq!(store.set_order_status("#ORD-999", OrderStatus::Shipped), None);
        assert_eq!(store.advance_order_status("#ORD-999"), None);
        assert_eq!(store.set_order_status("#ORD-002", OrderStatus::Packed), Some(OrderStatus::Packed));
        assert_eq!(store.advance_order_status("#ORD-002"), Some(OrderStatus::Shipped));
    }

    #[test]
    fn test_profile_name_becomes_user_name() {
        let storage = MemoryStorage::new();
        let store = signed_in(storage.clone());
        assert_eq!(store.user_name(), Some("Asha"));
        assert!(storage.keys().contains(&PROFILE_KEY.to_string()));
    }

    #[test]
    fn test_back_and_forward_record_navigation() {
        let mut store = Storefront::with_storage(MemoryStorage::new());
        store.navigate_to(View::About);
        store.take_events();
        assert_eq!(store.back(), Some(View::Landing));
        assert_eq!(store.forward(), Some(View::About));
        assert_eq!(store.take_events(), vec![
            StoreEvent::Navigated { from: View::About, to: View::Landing },
            StoreEvent::Navigated { from: View::Landing, to: View::About },
        ]);
        assert_eq!(store.forward(), None);
        assert!(store.take_events().is_empty());
    }

    #[test]
    fn test_blank_profile_name_rejected() {
        let storage = MemoryStorage::new();
        let mut store = signed_in(storage.clone());
        let blank = CustomerProfile { name: "  ".into(), address: "12 Market Road".into(), ..Default::default() };
        assert!(matches!(store.update_profile(blank), Err(StorefrontError::NameTooShort)));
        assert_eq!(store.user_name(), Some("Asha"));
        assert_eq!(store.profile().name, "Asha");
        assert!(storage.keys().contains(&PROFILE_KEY.to_string()));
    }
}
