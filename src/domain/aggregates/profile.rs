//! Customer profile

use serde::{Deserialize, Serialize};

/// Signed-in customer's details. One per session; empty when signed out.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerProfile {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub bio: String,
}
