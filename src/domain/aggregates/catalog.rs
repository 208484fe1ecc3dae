//! Catalog Aggregate
//!
//! The live product list the shop renders, plus the administrator's draft copy.
//! Draft edits stay invisible to the shop until the draft is committed.

use super::product::{Category, Product, ProductPatch};

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    live: Vec<Product>,
    draft: Option<Vec<Product>>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self { Self { live: products, draft: None } }

    pub fn products(&self) -> &[Product] { &self.live }
    pub fn find(&self, id: &str) -> Option<&Product> { self.live.iter().find(|p| p.id == id) }
    pub fn draft(&self) -> Option<&[Product]> { self.draft.as_deref() }
    pub fn has_draft(&self) -> bool { self.draft.is_some() }

    /// Products in a category; `None` is the "All Items" filter.
    pub fn in_category(&self, category: Option<Category>) -> Vec<&Product> {
        self.live.iter().filter(|p| category.map_or(true, |c| p.category == c)).collect()
    }

    pub fn low_stock(&self) -> Vec<&Product> { self.live.iter().filter(|p| p.is_low_stock()).collect() }

    pub fn set_products(&mut self, products: Vec<Product>) { self.live = products; }

    /// Starts (or restarts) a draft from the live list.
    pub fn begin_edit(&mut self) -> &[Product] {
        self.draft.insert(self.live.clone())
    }

    pub fn update_draft(&mut self, id: &str, patch: &ProductPatch) -> bool {
        let draft = self.draft.get_or_insert_with(|| self.live.clone());
        match draft.iter_mut().find(|p| p.id == id) {
            Some(product) => { product.apply(patch); true }
            None => false,
        }
    }

    pub fn reset_draft_stock(&mut self) {
        let draft = self.draft.get_or_insert_with(|| self.live.clone());
        for p in draft.iter_mut() {
            p.available_qty = 0;
            p.in_stock = false;
        }
    }

    pub fn revert_draft(&mut self) { self.draft = Some(self.live.clone()); }

    pub fn take_draft(&mut self) -> Option<Vec<Product>> { self.draft.take() }

    /// Added products go live immediately and also land in any open draft.
    pub fn add_product(&mut self, product: Product) {
        if let Some(draft) = self.draft.as_mut() { draft.push(product.clone()); }
        self.live.push(product);
    }

    pub fn delete_product(&mut self, id: &str) -> bool {
        let before = self.live.len();
        self.live.retain(|p| p.id != id);
        let mut removed = self.live.len() != before;
        if let Some(draft) = self.draft.as_mut() {
            let before = draft.len();
            draft.retain(|p| p.id != id);
            removed |= draft.len() != before;
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::product::seed_catalog;
    use crate::domain::value_objects::Money;

    #[test]
    fn test_draft_invisible_until_taken() {
        let mut catalog = Catalog::new(seed_catalog());
        catalog.begin_edit();
        assert!(catalog.update_draft("1", &ProductPatch { price: Some(Money::new(99)), ..Default::default() }));
        assert_eq!(catalog.find("1").unwrap().price.amount(), 60);
        let draft = catalog.take_draft().unwrap();
        catalog.set_products(draft);
        assert_eq!(catalog.find("1").unwrap().price.amount(), 99);
        assert!(!catalog.has_draft());
    }

    #[test]
    fn test_reset_and_revert() {
        let mut catalog = Catalog::new(seed_catalog());
        catalog.reset_draft_stock();
        assert!(catalog.draft().unwrap().iter().all(|p| p.available_qty == 0 && !p.in_stock));
        catalog.revert_draft();
        assert_eq!(catalog.draft().unwrap(), catalog.products());
    }

    #[test]
    fn test_delete_from_live_and_draft() {
        let mut catalog = Catalog::new(seed_catalog());
        catalog.begin_edit();
        assert!(catalog.delete_product("6"));
        assert!(catalog.find("6").is_none());
        assert!(catalog.draft().unwrap().iter().all(|p| p.id != "6"));
        assert!(!catalog.delete_product("6"));
    }

    #[test]
    fn test_category_filter() {
        let catalog = Catalog::new(seed_catalog());
        assert_eq!(catalog.in_category(None).len(), 6);
        assert_eq!(catalog.in_category(Some(Category::Vegetables)).len(), 2);
        assert_eq!(catalog.low_stock().len(), 2);
    }
}
