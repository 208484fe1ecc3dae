//! JSON API over a single [`Storefront`] session.

mod handlers;

use axum::http::StatusCode;
use axum::routing::{delete, get, patch, post, put};
use axum::Router;
use std::sync::{Arc, PoisonError};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::debug;

use crate::{Storefront, StorefrontError};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<Storefront>>,
    /// At most one resend-cooldown ticker runs per session.
    cooldown_ticker: Arc<std::sync::Mutex<Option<JoinHandle<()>>>>,
}

impl AppState {
    pub fn new(store: Storefront) -> Self {
        Self { store: Arc::new(Mutex::new(store)), cooldown_ticker: Arc::default() }
    }
}

pub fn router(state: AppState) -> Router {
    use handlers::*;
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/session", get(session))
        .route("/api/v1/products", get(list_products))
        .route("/api/v1/view", get(current_view).post(navigate))
        .route("/api/v1/view/back", post(go_back))
        .route("/api/v1/view/forward", post(go_forward))
        .route("/api/v1/cart", get(get_cart).delete(clear_cart))
        .route("/api/v1/cart/items", post(add_to_cart))
        .route("/api/v1/cart/items/:id", patch(update_cart_item))
        .route("/api/v1/cart/panel", put(set_cart_panel))
        .route("/api/v1/checkout", post(proceed_to_checkout))
        .route("/api/v1/checkout/quote", get(checkout_quote))
        .route("/api/v1/orders", post(place_order))
        .route("/api/v1/orders/mine", get(my_orders))
        .route("/api/v1/auth/otp", post(request_otp))
        .route("/api/v1/auth/verify", post(verify_otp))
        .route("/api/v1/auth/admin", post(unlock_admin))
        .route("/api/v1/auth/logout", post(logout))
        .route("/api/v1/profile", get(get_profile).put(update_profile))
        .route("/api/v1/contact", post(submit_contact))
        .route("/api/v1/admin/orders", get(list_orders))
        .route("/api/v1/admin/orders/:id/status", put(set_order_status))
        .route("/api/v1/admin/orders/:id/advance", post(advance_order_status))
        .route("/api/v1/admin/inventory", get(get_inventory))
        .route("/api/v1/admin/inventory/edit", post(begin_inventory_edit))
        .route("/api/v1/admin/inventory/reset", post(reset_inventory))
        .route("/api/v1/admin/inventory/revert", post(revert_inventory))
        .route("/api/v1/admin/inventory/commit", post(commit_inventory))
        .route("/api/v1/admin/inventory/:id", patch(update_inventory_item))
        .route("/api/v1/admin/products", post(add_product))
        .route("/api/v1/admin/products/:id", delete(delete_product))
        .route("/api/v1/admin/revenue", get(revenue))
        .route("/api/v1/admin/dashboard", get(dashboard))
        .route("/api/v1/admin/messages", get(contact_messages))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub(crate) fn reject(e: StorefrontError) -> (StatusCode, String) {
    use StorefrontError::*;
    let status = match &e {
        NameTooShort | InvalidPhone(_) | AddressMissing | OtpIncomplete | OtpMismatch | NoOtpRequested
        | EmptyCart | InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ResendCooldown { .. } => StatusCode::TOO_MANY_REQUESTS,
        WrongAdminPin | LoginRequired => StatusCode::UNAUTHORIZED,
        AdminRequired => StatusCode::FORBIDDEN,
        ProductNotFound(_) => StatusCode::NOT_FOUND,
        Backend(_) => StatusCode::BAD_GATEWAY,
        Storage(_) | Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}

/// Counts the resend cooldown down once a second until it reaches zero.
/// Replaces any ticker still running from an earlier code request.
pub(crate) fn spawn_cooldown_ticker(state: &AppState) {
    let store = state.store.clone();
    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(1));
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let remaining = store.lock().await.tick_otp_cooldown();
            if remaining == 0 {
                debug!("otp resend cooldown finished");
                break;
            }
        }
    });
    let mut slot = state.cooldown_ticker.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(previous) = slot.replace(handle) {
        previous.abort();
    }
}
