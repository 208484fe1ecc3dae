//! Product Aggregate

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;
use crate::domain::value_objects::Money;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub unit: String,
    pub price: Money,
    pub available_qty: u32,
    pub max_qty: u32,
    pub in_stock: bool,
    pub low_stock_threshold: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Vegetables,
    Fruits,
    #[serde(rename = "Dairy & Eggs")]
    DairyAndEggs,
    #[serde(rename = "Leafy Greens")]
    LeafyGreens,
    #[serde(rename = "Root Veg")]
    RootVeg,
}

impl Category {
    pub const ALL: [Category; 5] = [Self::Vegetables, Self::Fruits, Self::DairyAndEggs, Self::LeafyGreens, Self::RootVeg];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Vegetables => "Vegetables",
            Self::Fruits => "Fruits",
            Self::DairyAndEggs => "Dairy & Eggs",
            Self::LeafyGreens => "Leafy Greens",
            Self::RootVeg => "Root Veg",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.label()) }
}

impl Product {
    pub fn is_low_stock(&self) -> bool { self.available_qty < self.low_stock_threshold }

    /// Stock level as a percentage of the stocking maximum, capped at 100.
    pub fn stock_ratio(&self) -> u32 {
        if self.max_qty == 0 { return 0; }
        let pct = u64::from(self.available_qty) * 100 / u64::from(self.max_qty);
        pct.min(100) as u32
    }

    pub fn apply(&mut self, patch: &ProductPatch) {
        if let Some(name) = &patch.name { self.name = name.clone(); }
        if let Some(category) = patch.category { self.category = category; }
        if let Some(unit) = &patch.unit { self.unit = unit.clone(); }
        if let Some(price) = patch.price { self.price = price; }
        if let Some(qty) = patch.available_qty { self.available_qty = qty; }
        if let Some(max) = patch.max_qty { self.max_qty = max; }
        if let Some(in_stock) = patch.in_stock { self.in_stock = in_stock; }
        if let Some(threshold) = patch.low_stock_threshold { self.low_stock_threshold = threshold; }
        if let Some(tag) = &patch.tag { self.tag = Some(tag.clone()).filter(|t| !t.is_empty()); }
        if let Some(description) = &patch.description { self.description = Some(description.clone()); }
    }
}

/// Field edits made from the inventory table. `None` leaves the field alone.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub category: Option<Category>,
    pub unit: Option<String>,
    pub price: Option<Money>,
    pub available_qty: Option<u32>,
    pub max_qty: Option<u32>,
    pub in_stock: Option<bool>,
    pub low_stock_threshold: Option<u32>,
    /// An empty tag clears it.
    pub tag: Option<String>,
    pub description: Option<String>,
}

/// The "add product" form.
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    #[validate(length(min = 1, message = "product name is required"))]
    pub name: String,
    #[serde(default)]
    pub category: Category,
    #[validate(length(min = 1, message = "unit is required"))]
    pub unit: String,
    pub price: Money,
    #[serde(default)]
    pub available_qty: u32,
    #[validate(range(min = 1, message = "max quantity must be positive"))]
    pub max_qty: u32,
    #[serde(default = "default_threshold")]
    pub low_stock_threshold: u32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

fn default_threshold() -> u32 { 10 }

impl NewProduct {
    pub fn into_product(self) -> Product {
        Product {
            id: Uuid::now_v7().to_string(),
            in_stock: self.available_qty > 0,
            name: self.name.trim().to_string(),
            category: self.category,
            unit: self.unit,
            price: self.price,
            available_qty: self.available_qty,
            max_qty: self.max_qty,
            low_stock_threshold: self.low_stock_threshold,
            tag: None,
            description: self.description.filter(|d| !d.is_empty()),
            image: self.image.filter(|i| !i.is_empty()),
        }
    }
}

fn seed(id: &str, name: &str, category: Category, unit: &str, price: i64, available: u32, max: u32, threshold: u32, tag: Option<&str>, description: &str, image: &str) -> Product {
    Product {
        id: id.into(), name: name.into(), category, unit: unit.into(), price: Money::new(price),
        available_qty: available, max_qty: max, in_stock: true, low_stock_threshold: threshold,
        tag: tag.map(Into::into), description: Some(description.into()),
        image: Some(format!("https://images.unsplash.com/{image}?q=80&w=400&h=400&fit=crop")),
    }
}

/// Catalog shipped with a fresh install.
pub fn seed_catalog() -> Vec<Product> {
    vec![
        seed("1", "Organic Spinach", Category::LeafyGreens, "Bunch", 60, 50, 60, 10, Some("Fresh"),
            "Freshly cut organic spinach, rich in iron and vitamins.", "photo-1576045057995-568f588f82fb"),
        seed("2", "Country Eggs", Category::DairyAndEggs, "pc", 10, 15, 100, 20, Some("Low Stock"),
            "Nutritious country eggs from pasture-raised hens.", "photo-1516448620398-c5f44bf9f441"),
        seed("3", "Red Tomatoes", Category::Vegetables, "kg", 80, 120, 200, 30, None,
            "Vine-ripened organic tomatoes, perfect for salads and sauces.", "photo-1518977676601-b53f02ac6d31"),
        seed("4", "Sweet Carrots", Category::RootVeg, "kg", 55, 40, 100, 10, None,
            "Crunchy and sweet carrots, harvested fresh this morning.", "photo-1598170845058-32b9d6a5da37"),
        seed("5", "Cauliflower", Category::Vegetables, "pc", 45, 92, 100, 5, None,
            "Dense and creamy organic cauliflower heads.", "photo-1568584711075-3d021a7c3ca3"),
        seed("6", "Strawberries", Category::Fruits, "box", 180, 8, 100, 10, Some("Last Batch"),
            "Juicy, sweet strawberries picked at the peak of ripeness.", "photo-1464965911861-746a04b4bca6"),
    ]
}
