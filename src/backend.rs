//! Asynchronous service boundary.
//!
//! Saving the catalog, submitting an order and sending a login code all go
//! through [`Backend`]. [`SimulatedBackend`] only waits out a fixed latency,
//! so swapping in a remote implementation leaves callers unchanged.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::domain::aggregates::{Order, Product};
use crate::domain::value_objects::Phone;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("backend rejected request: {0}")]
    Rejected(String),
}

#[async_trait]
pub trait Backend: Send + Sync {
    /// Stores the catalog and returns the list as accepted.
    async fn commit_catalog(&self, products: Vec<Product>) -> Result<Vec<Product>, BackendError>;

    async fn submit_order(&self, order: Order) -> Result<Order, BackendError>;

    /// Sends a login code. Returns the text of an in-app notice when the code
    /// is shown on screen instead of reaching the phone.
    async fn deliver_otp(&self, phone: &Phone, code: &str) -> Result<Option<String>, BackendError>;
}

#[derive(Clone, Debug, Default)]
pub struct SimulatedBackend {
    latency: Duration,
}

impl SimulatedBackend {
    pub fn new(latency: Duration) -> Self { Self { latency } }

    pub fn latency(&self) -> Duration { self.latency }

    async fn round_trip(&self) {
        if !self.latency.is_zero() { tokio::time::sleep(self.latency).await; }
    }
}

#[async_trait]
impl Backend for SimulatedBackend {
    async fn commit_catalog(&self, products: Vec<Product>) -> Result<Vec<Product>, BackendError> {
        self.round_trip().await;
        Ok(products)
    }

    async fn submit_order(&self, order: Order) -> Result<Order, BackendError> {
        self.round_trip().await;
        Ok(order)
    }

    async fn deliver_otp(&self, phone: &Phone, code: &str) -> Result<Option<String>, BackendError> {
        self.round_trip().await;
        info!(phone = %phone.masked(), "login code issued on screen");
        Ok(Some(format!("Your Greenleaf login code is {code}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_simulated_latency_elapses() {
        let backend = SimulatedBackend::new(Duration::from_millis(800));
        let started = tokio::time::Instant::now();
        let saved = backend.commit_catalog(vec![]).await.unwrap();
        assert!(saved.is_empty());
        assert!(started.elapsed() >= Duration::from_millis(800));
    }

    #[tokio::test]
    async fn test_otp_notice_contains_code() {
        let backend = SimulatedBackend::default();
        let phone = Phone::parse("9876543210").unwrap();
        let notice = backend.deliver_otp(&phone, "4821").await.unwrap();
        assert_eq!(notice.as_deref(), Some("Your Greenleaf login code is 4821"));
    }
}
