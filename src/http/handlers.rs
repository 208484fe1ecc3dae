use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tokio::sync::MutexGuard;

use super::{reject, spawn_cooldown_ticker, AppState};
use crate::auth::LoginForm;
use crate::domain::aggregates::{
    CartItem, Category, ContactForm, ContactMessage, CustomerProfile, NewProduct, Order, OrderStatus, Product,
    ProductPatch,
};
use crate::domain::value_objects::Money;
use crate::revenue::{DashboardStats, RevenueReport};
use crate::store::{CheckoutQuote, OtpDispatch};
use crate::{CheckoutForm, ShopOutcome, Storefront, StorefrontError, View};

type ApiResult<T> = Result<T, (StatusCode, String)>;

fn not_found(what: &str) -> (StatusCode, String) { (StatusCode::NOT_FOUND, format!("{what} not found")) }

async fn admin(s: &AppState) -> ApiResult<MutexGuard<'_, Storefront>> {
    let store = s.store.lock().await;
    if !store.is_admin() { return Err(reject(StorefrontError::AdminRequired)); }
    Ok(store)
}

#[derive(Debug, Serialize)] pub(super) struct SessionSnapshot { view: View, user_name: Option<String>, cart_open: bool, cart_units: u32, cart_total: Money, admin: bool, otp_cooldown: u32 }
#[derive(Debug, Serialize, Deserialize)] pub(super) struct ViewBody { view: View }
#[derive(Debug, Deserialize)] pub(super) struct ProductFilter { category: Option<Category> }
#[derive(Debug, Deserialize)] pub(super) struct AddToCartRequest { product_id: String }
#[derive(Debug, Deserialize)] pub(super) struct QuantityDelta { delta: i64 }
#[derive(Debug, Deserialize)] pub(super) struct PanelRequest { open: bool }
#[derive(Debug, Deserialize)] pub(super) struct VerifyRequest { code: String }
#[derive(Debug, Deserialize)] pub(super) struct PinRequest { pin: String }
#[derive(Debug, Deserialize)] pub(super) struct StatusRequest { status: OrderStatus }
#[derive(Debug, Serialize)] pub(super) struct StatusResponse { id: String, status: OrderStatus }
#[derive(Debug, Serialize)] pub(super) struct CommitResponse { products: usize }

pub(super) async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "healthy", "service": "greenleaf-storefront"}))
}

pub(super) async fn session(State(s): State<AppState>) -> Json<SessionSnapshot> {
    let store = s.store.lock().await;
    Json(SessionSnapshot {
        view: store.view(),
        user_name: store.user_name().map(str::to_string),
        cart_open: store.is_cart_open(),
        cart_units: store.cart().unit_count(),
        cart_total: store.cart().subtotal(),
        admin: store.is_admin(),
        otp_cooldown: store.otp_cooldown(),
    })
}

pub(super) async fn list_products(State(s): State<AppState>, Query(f): Query<ProductFilter>) -> Json<Vec<Product>> {
    let store = s.store.lock().await;
    Json(store.products_in(f.category).into_iter().cloned().collect())
}

pub(super) async fn current_view(State(s): State<AppState>) -> Json<ViewBody> {
    Json(ViewBody { view: s.store.lock().await.view() })
}

pub(super) async fn navigate(State(s): State<AppState>, Json(r): Json<ViewBody>) -> Json<ViewBody> {
    let mut store = s.store.lock().await;
    store.navigate_to(r.view);
    Json(ViewBody { view: store.view() })
}

pub(super) async fn go_back(State(s): State<AppState>) -> Json<ViewBody> {
    let mut store = s.store.lock().await;
    store.back();
    Json(ViewBody { view: store.view() })
}

pub(super) async fn go_forward(State(s): State<AppState>) -> Json<ViewBody> {
    let mut store = s.store.lock().await;
    store.forward();
    Json(ViewBody { view: store.view() })
}

pub(super) async fn get_cart(State(s): State<AppState>) -> Json<Vec<CartItem>> {
    Json(s.store.lock().await.cart().items().to_vec())
}

pub(super) async fn clear_cart(State(s): State<AppState>) -> StatusCode {
    s.store.lock().await.clear_cart();
    StatusCode::NO_CONTENT
}

pub(super) async fn add_to_cart(State(s): State<AppState>, Json(r): Json<AddToCartRequest>) -> ApiResult<Json<ShopOutcome>> {
    s.store.lock().await.shop_add_to_cart(&r.product_id).map(Json).map_err(reject)
}

pub(super) async fn update_cart_item(State(s): State<AppState>, Path(id): Path<String>, Json(r): Json<QuantityDelta>) -> Json<Vec<CartItem>> {
    let mut store = s.store.lock().await;
    store.update_cart_quantity(&id, r.delta);
    Json(store.cart().items().to_vec())
}

pub(super) async fn set_cart_panel(State(s): State<AppState>, Json(r): Json<PanelRequest>) -> StatusCode {
    s.store.lock().await.set_cart_open(r.open);
    StatusCode::NO_CONTENT
}

pub(super) async fn proceed_to_checkout(State(s): State<AppState>) -> Json<ViewBody> {
    Json(ViewBody { view: s.store.lock().await.proceed_to_checkout() })
}

pub(super) async fn checkout_quote(State(s): State<AppState>) -> Json<CheckoutQuote> {
    Json(s.store.lock().await.checkout_quote())
}

pub(super) async fn place_order(State(s): State<AppState>, Json(r): Json<CheckoutForm>) -> ApiResult<(StatusCode, Json<Order>)> {
    let order = s.store.lock().await.place_order(r).await.map_err(reject)?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub(super) async fn my_orders(State(s): State<AppState>) -> ApiResult<Json<Vec<Order>>> {
    let store = s.store.lock().await;
    if !store.is_signed_in() { return Err(reject(StorefrontError::LoginRequired)); }
    Ok(Json(store.customer_orders().into_iter().cloned().collect()))
}

pub(super) async fn request_otp(State(s): State<AppState>, Json(r): Json<LoginForm>) -> ApiResult<Json<OtpDispatch>> {
    let dispatch = s.store.lock().await.request_otp(r).await.map_err(reject)?;
    if dispatch.resend_in > 0 { spawn_cooldown_ticker(&s); }
    Ok(Json(dispatch))
}

pub(super) async fn verify_otp(State(s): State<AppState>, Json(r): Json<VerifyRequest>) -> ApiResult<Json<ViewBody>> {
    let mut store = s.store.lock().await;
    store.verify_otp(&r.code).map_err(reject)?;
    Ok(Json(ViewBody { view: store.view() }))
}

pub(super) async fn unlock_admin(State(s): State<AppState>, Json(r): Json<PinRequest>) -> ApiResult<Json<ViewBody>> {
    let mut store = s.store.lock().await;
    store.unlock_admin(&r.pin).map_err(reject)?;
    Ok(Json(ViewBody { view: store.view() }))
}

pub(super) async fn logout(State(s): State<AppState>) -> Json<ViewBody> {
    let mut store = s.store.lock().await;
    store.logout();
    Json(ViewBody { view: store.view() })
}

pub(super) async fn get_profile(State(s): State<AppState>) -> Json<CustomerProfile> {
    Json(s.store.lock().await.profile().clone())
}

pub(super) async fn update_profile(State(s): State<AppState>, Json(r): Json<CustomerProfile>) -> ApiResult<Json<CustomerProfile>> {
    let mut store = s.store.lock().await;
    store.update_profile(r).map_err(reject)?;
    Ok(Json(store.profile().clone()))
}

pub(super) async fn submit_contact(State(s): State<AppState>, Json(r): Json<ContactForm>) -> ApiResult<(StatusCode, Json<ContactMessage>)> {
    let message = s.store.lock().await.submit_contact(r).map_err(reject)?;
    Ok((StatusCode::CREATED, Json(message)))
}

pub(super) async fn list_orders(State(s): State<AppState>) -> ApiResult<Json<Vec<Order>>> {
    Ok(Json(admin(&s).await?.orders().to_vec()))
}

pub(super) async fn set_order_status(State(s): State<AppState>, Path(id): Path<String>, Json(r): Json<StatusRequest>) -> ApiResult<Json<StatusResponse>> {
    let status = admin(&s).await?.set_order_status(&id, r.status).ok_or_else(|| not_found("Order"))?;
    Ok(Json(StatusResponse { id, status }))
}

pub(super) async fn advance_order_status(State(s): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<StatusResponse>> {
    let status = admin(&s).await?.advance_order_status(&id).ok_or_else(|| not_found("Order"))?;
    Ok(Json(StatusResponse { id, status }))
}

pub(super) async fn get_inventory(State(s): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    Ok(Json(admin(&s).await?.inventory_draft().to_vec()))
}

pub(super) async fn begin_inventory_edit(State(s): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    Ok(Json(admin(&s).await?.begin_inventory_edit().to_vec()))
}

pub(super) async fn update_inventory_item(State(s): State<AppState>, Path(id): Path<String>, Json(r): Json<ProductPatch>) -> ApiResult<StatusCode> {
    if !admin(&s).await?.update_draft_product(&id, &r) { return Err(not_found("Product")); }
    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn reset_inventory(State(s): State<AppState>) -> ApiResult<StatusCode> {
    admin(&s).await?.reset_draft_stock();
    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn revert_inventory(State(s): State<AppState>) -> ApiResult<StatusCode> {
    admin(&s).await?.revert_draft();
    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn commit_inventory(State(s): State<AppState>) -> ApiResult<Json<CommitResponse>> {
    let products = admin(&s).await?.commit_inventory().await.map_err(reject)?;
    Ok(Json(CommitResponse { products }))
}

pub(super) async fn add_product(State(s): State<AppState>, Json(r): Json<NewProduct>) -> ApiResult<(StatusCode, Json<Product>)> {
    let product = admin(&s).await?.add_product(r).map_err(reject)?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub(super) async fn delete_product(State(s): State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    if !admin(&s).await?.delete_product(&id) { return Err(not_found("Product")); }
    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn revenue(State(s): State<AppState>) -> ApiResult<Json<RevenueReport>> {
    Ok(Json(admin(&s).await?.revenue_report()))
}

pub(super) async fn dashboard(State(s): State<AppState>) -> ApiResult<Json<DashboardStats>> {
    Ok(Json(admin(&s).await?.dashboard_stats()))
}

pub(super) async fn contact_messages(State(s): State<AppState>) -> ApiResult<Json<Vec<ContactMessage>>> {
    Ok(Json(admin(&s).await?.contact_messages().to_vec()))
}
