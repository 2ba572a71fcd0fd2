use anyhow::Result;

use crate::store::{Product, ShoppingListItem, StoreSection};

/// Section assignment and price for a resolved item name.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetails {
    pub price: f64,
    pub section_id: String,
}

/// The external route-suggestion collaborator.
///
/// Internals are opaque to the navigation engine: it only consumes section
/// assignments positionally and never validates ordering quality. A `None`
/// from [`RoutePlanner::resolve_section`] is a user-visible miss, not a
/// defect.
pub trait RoutePlanner: Send + Sync {
    /// Maps a free-text item name to a catalog section, or `None` when the
    /// item has no mapping.
    fn resolve_section(
        &self,
        item_name: &str,
        sections: &[StoreSection],
    ) -> Result<Option<ProductDetails>>;

    /// Returns a visiting order over the sections containing the given
    /// items.
    fn suggest_route(
        &self,
        items: &[ShoppingListItem],
        sections: &[StoreSection],
    ) -> Result<Vec<String>>;

    /// Supplies the full browsable product list, fetched once at startup.
    fn catalog(&self, sections: &[StoreSection]) -> Result<Vec<Product>>;
}

/// Keyword, display name, section id, price.
const PRODUCT_TABLE: &[(&str, &str, &str, f64)] = &[
    ("apple", "Apples", "fresh-produce", 2.49),
    ("banana", "Bananas", "fresh-produce", 1.19),
    ("lettuce", "Lettuce", "fresh-produce", 1.79),
    ("tomato", "Tomatoes", "fresh-produce", 2.99),
    ("bread", "Bread", "bakery", 2.25),
    ("bagel", "Bagels", "bakery", 3.49),
    ("croissant", "Croissants", "bakery", 4.25),
    ("milk", "Milk", "dairy-cheese", 3.50),
    ("cheese", "Cheese", "dairy-cheese", 5.99),
    ("yogurt", "Yogurt", "dairy-cheese", 1.25),
    ("butter", "Butter", "dairy-cheese", 4.49),
    ("egg", "Eggs", "dairy-cheese", 3.99),
    ("pasta", "Pasta", "pantry-goods", 1.89),
    ("rice", "Rice", "pantry-goods", 4.99),
    ("cereal", "Cereal", "pantry-goods", 4.29),
    ("flour", "Flour", "pantry-goods", 2.79),
    ("chicken", "Chicken", "butcher-shop", 7.99),
    ("beef", "Ground Beef", "butcher-shop", 8.49),
    ("steak", "Steak", "butcher-shop", 12.99),
    ("sausage", "Sausages", "butcher-shop", 6.49),
    ("rose", "Roses", "florist", 14.99),
    ("tulip", "Tulips", "florist", 9.99),
    ("flower", "Mixed Bouquet", "florist", 11.49),
    ("juice", "Orange Juice", "beverages", 3.99),
    ("soda", "Soda", "beverages", 1.99),
    ("water", "Sparkling Water", "beverages", 1.29),
    ("coffee", "Coffee", "beverages", 8.99),
    ("tea", "Tea", "beverages", 4.49),
    ("dog food", "Dog Food", "pet-supplies", 19.99),
    ("cat food", "Cat Food", "pet-supplies", 16.99),
    ("diaper", "Diapers", "baby-care", 24.99),
    ("wipes", "Baby Wipes", "baby-care", 5.99),
    ("formula", "Baby Formula", "baby-care", 28.99),
    ("detergent", "Detergent", "cleaning-supplies", 9.99),
    ("soap", "Dish Soap", "cleaning-supplies", 2.99),
    ("bleach", "Bleach", "cleaning-supplies", 3.49),
    ("sponge", "Sponges", "cleaning-supplies", 2.19),
];

/// Deterministic in-process planner: resolves items against a fixed keyword
/// table and visits sections in catalog order. Stands in for the remote
/// suggestion service so the binary and tests run offline.
#[derive(Debug, Default)]
pub struct AisleOrderPlanner;

impl AisleOrderPlanner {
    pub fn new() -> Self {
        AisleOrderPlanner
    }
}

impl RoutePlanner for AisleOrderPlanner {
    fn resolve_section(
        &self,
        item_name: &str,
        sections: &[StoreSection],
    ) -> Result<Option<ProductDetails>> {
        let needle = item_name.trim().to_lowercase();
        let hit = PRODUCT_TABLE.iter().find(|(keyword, ..)| {
            needle.contains(keyword)
        });
        Ok(hit.and_then(|(_, _, section_id, price)| {
            // Only hand out sections that actually exist in this store.
            sections.iter().any(|s| s.id == *section_id).then(|| ProductDetails {
                price: *price,
                section_id: (*section_id).to_string(),
            })
        }))
    }

    fn suggest_route(
        &self,
        items: &[ShoppingListItem],
        sections: &[StoreSection],
    ) -> Result<Vec<String>> {
        let route = sections
            .iter()
            .filter(|s| items.iter().any(|i| i.section_id == s.id))
            .map(|s| s.id.to_string())
            .collect();
        Ok(route)
    }

    fn catalog(&self, sections: &[StoreSection]) -> Result<Vec<Product>> {
        let products = PRODUCT_TABLE
            .iter()
            .filter(|(_, _, section_id, _)| sections.iter().any(|s| s.id == *section_id))
            .map(|(_, name, _, price)| Product {
                name: (*name).to_string(),
                price: *price,
            })
            .collect();
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::store_sections;

    #[test]
    fn test_resolve_known_item() {
        let sections = store_sections();
        let planner = AisleOrderPlanner::new();
        let details = planner
            .resolve_section("Whole Milk", &sections)
            .unwrap()
            .unwrap();
        assert_eq!(details.section_id, "dairy-cheese");
        assert!(details.price > 0.0);
    }

    #[test]
    fn test_resolve_unknown_item() {
        let sections = store_sections();
        let planner = AisleOrderPlanner::new();
        assert!(planner
            .resolve_section("chainsaw", &sections)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_route_follows_store_order_and_dedupes() {
        let sections = store_sections();
        let planner = AisleOrderPlanner::new();
        let items = vec![
            ShoppingListItem::new("Milk", 3.50, "dairy-cheese"),
            ShoppingListItem::new("Apples", 2.49, "fresh-produce"),
            ShoppingListItem::new("Cheese", 5.99, "dairy-cheese"),
        ];
        let route = planner.suggest_route(&items, &sections).unwrap();
        assert_eq!(route, vec!["fresh-produce", "dairy-cheese"]);
    }

    #[test]
    fn test_catalog_is_nonempty_and_deterministic() {
        let sections = store_sections();
        let planner = AisleOrderPlanner::new();
        let a = planner.catalog(&sections).unwrap();
        let b = planner.catalog(&sections).unwrap();
        assert!(!a.is_empty());
        assert_eq!(a, b);
    }
}
