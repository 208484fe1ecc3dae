//! Runtime configuration read from the environment (and `.env` via `dotenvy`).

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::{Result, StorefrontError};

#[derive(Clone, Debug)]
pub struct StorefrontConfig {
    pub port: u16,
    /// JSON file backing the persisted session slices.
    pub data_path: PathBuf,
    pub admin_pin: String,
    pub upi_payee: String,
    pub upi_payee_name: String,
    pub simulated_latency: Duration,
    pub otp_cooldown_secs: u32,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            port: 8083,
            data_path: PathBuf::from("storefront.json"),
            admin_pin: "1234".to_string(),
            upi_payee: "greenleaf@upi".to_string(),
            upi_payee_name: "Greenleaf Organics".to_string(),
            simulated_latency: Duration::from_millis(800),
            otp_cooldown_secs: 30,
        }
    }
}

impl StorefrontConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any variable source; unset variables keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            port: parse_var(&lookup, "PORT")?.unwrap_or(defaults.port),
            data_path: lookup("STOREFRONT_DATA").map(PathBuf::from).unwrap_or(defaults.data_path),
            admin_pin: lookup("ADMIN_PIN").unwrap_or(defaults.admin_pin),
            upi_payee: lookup("UPI_PAYEE").unwrap_or(defaults.upi_payee),
            upi_payee_name: lookup("UPI_PAYEE_NAME").unwrap_or(defaults.upi_payee_name),
            simulated_latency: parse_var(&lookup, "SIMULATED_LATENCY_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.simulated_latency),
            otp_cooldown_secs: parse_var(&lookup, "OTP_COOLDOWN_SECS")?.unwrap_or(defaults.otp_cooldown_secs),
        })
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| StorefrontError::Config(format!("{key} must be a number, got {raw:?}"))),
    }
}
