use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storepilot_geo::GridPoint;

/// Rectangle of a section on the floor map, as 1-based grid lines
/// (row/column start inclusive, end exclusive), matching the 20x20 layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridArea {
    pub row_start: u16,
    pub col_start: u16,
    pub row_end: u16,
    pub col_end: u16,
}

impl GridArea {
    pub const fn new(row_start: u16, col_start: u16, row_end: u16, col_end: u16) -> Self {
        GridArea {
            row_start,
            col_start,
            row_end,
            col_end,
        }
    }
}

/// A named, fixed-position zone of the store. Its center is the routing
/// waypoint for every item assigned to the section.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSection {
    pub id: &'static str,
    pub name: &'static str,
    /// Fill color as 0xRRGGBB.
    pub color: u32,
    pub area: GridArea,
    pub floor: u8,
    pub center: GridPoint,
}

/// Section id of the default start location.
pub const MAIN_ENTRANCE_ID: &str = "main-entrance";

/// Fallback start position when the entrance section is missing from the
/// catalog.
pub const FALLBACK_ENTRANCE: GridPoint = GridPoint::new(11.5, 18.0);

/// The fixed single-floor section catalog.
pub fn store_sections() -> Vec<StoreSection> {
    vec![
        // Row 1
        StoreSection {
            id: "fresh-produce",
            name: "Fresh Produce",
            color: 0xa7f3d0,
            area: GridArea::new(2, 2, 10, 8),
            floor: 1,
            center: GridPoint::new(4.5, 5.5),
        },
        StoreSection {
            id: "bakery",
            name: "Bakery",
            color: 0xfef08a,
            area: GridArea::new(2, 9, 6, 13),
            floor: 1,
            center: GridPoint::new(11.0, 4.0),
        },
        StoreSection {
            id: "mens-washroom",
            name: "Men's Washroom",
            color: 0xe5e7eb,
            area: GridArea::new(2, 14, 4, 18),
            floor: 1,
            center: GridPoint::new(16.0, 3.0),
        },
        StoreSection {
            id: "womens-washroom",
            name: "Women's Washroom",
            color: 0xe5e7eb,
            area: GridArea::new(5, 14, 7, 18),
            floor: 1,
            center: GridPoint::new(16.0, 6.0),
        },
        // Row 2
        StoreSection {
            id: "dairy-cheese",
            name: "Dairy & Cheese",
            color: 0xbfdbfe,
            area: GridArea::new(7, 9, 12, 13),
            floor: 1,
            center: GridPoint::new(11.0, 9.5),
        },
        StoreSection {
            id: "pantry-goods",
            name: "Pantry Goods",
            color: 0xfef08a,
            area: GridArea::new(8, 14, 12, 18),
            floor: 1,
            center: GridPoint::new(16.0, 10.0),
        },
        // Row 3
        StoreSection {
            id: "butcher-shop",
            name: "Butcher Shop",
            color: 0xfecaca,
            area: GridArea::new(11, 2, 16, 8),
            floor: 1,
            center: GridPoint::new(5.0, 13.5),
        },
        StoreSection {
            id: "florist",
            name: "Florist",
            color: 0xfbcfe8,
            area: GridArea::new(13, 9, 16, 13),
            floor: 1,
            center: GridPoint::new(11.0, 14.5),
        },
        StoreSection {
            id: "beverages",
            name: "Beverages",
            color: 0xa5f3fc,
            area: GridArea::new(13, 14, 16, 18),
            floor: 1,
            center: GridPoint::new(16.0, 14.5),
        },
        // Row 4
        StoreSection {
            id: "pet-supplies",
            name: "Pet Supplies",
            color: 0xfed7aa,
            area: GridArea::new(17, 2, 19, 5),
            floor: 1,
            center: GridPoint::new(3.5, 18.0),
        },
        StoreSection {
            id: "baby-care",
            name: "Baby Care",
            color: 0xf5d0fe,
            area: GridArea::new(17, 6, 19, 9),
            floor: 1,
            center: GridPoint::new(7.5, 18.0),
        },
        StoreSection {
            id: MAIN_ENTRANCE_ID,
            name: "Main Entrance",
            color: 0xf3f4f6,
            area: GridArea::new(17, 10, 19, 13),
            floor: 1,
            center: FALLBACK_ENTRANCE,
        },
        StoreSection {
            id: "cleaning-supplies",
            name: "Cleaning Supplies",
            color: 0xbfdbfe,
            area: GridArea::new(17, 14, 19, 17),
            floor: 1,
            center: GridPoint::new(15.5, 18.0),
        },
        StoreSection {
            id: "exit",
            name: "Exit",
            color: 0xe5e7eb,
            area: GridArea::new(17, 18, 19, 20),
            floor: 1,
            center: GridPoint::new(19.0, 18.0),
        },
    ]
}

/// Looks up a section center by id.
pub fn section_center(sections: &[StoreSection], id: &str) -> Option<GridPoint> {
    sections.iter().find(|s| s.id == id).map(|s| s.center)
}

/// A browsable catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub price: f64,
}

/// Whether a list entry is still to be picked up or already in the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemStatus {
    InList,
    InCart,
}

/// One entry of the shopping list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListItem {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub section_id: String,
    pub floor: u8,
    pub status: ItemStatus,
}

impl ShoppingListItem {
    pub fn new(name: impl Into<String>, price: f64, section_id: impl Into<String>) -> Self {
        ShoppingListItem {
            id: Uuid::new_v4(),
            name: name.into(),
            price,
            section_id: section_id.into(),
            floor: 1,
            status: ItemStatus::InList,
        }
    }
}

/// Cart totals.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Billing {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

impl Billing {
    /// Sums the in-cart items and applies the configured tax rate.
    pub fn for_cart<'a>(items: impl Iterator<Item = &'a ShoppingListItem>, tax_rate: f64) -> Self {
        let subtotal: f64 = items
            .filter(|i| i.status == ItemStatus::InCart)
            .map(|i| i.price)
            .sum();
        let tax = subtotal * tax_rate;
        Billing {
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_catalog_shape() {
        let sections = store_sections();
        assert_eq!(sections.len(), 14);
        assert!(sections.iter().all(|s| s.floor == 1));
        // Ids are unique.
        for (i, s) in sections.iter().enumerate() {
            assert!(!sections[i + 1..].iter().any(|o| o.id == s.id));
        }
    }

    #[test]
    fn test_entrance_center() {
        let sections = store_sections();
        let entrance = section_center(&sections, MAIN_ENTRANCE_ID).unwrap();
        assert_eq!(entrance, FALLBACK_ENTRANCE);
    }

    #[test]
    fn test_section_centers_inside_grid() {
        for s in store_sections() {
            assert!(s.center.x > 0.0 && s.center.x < 20.0, "{}", s.id);
            assert!(s.center.y > 0.0 && s.center.y < 20.0, "{}", s.id);
        }
    }

    #[test]
    fn test_billing_counts_only_cart_items() {
        let mut milk = ShoppingListItem::new("Milk", 3.50, "dairy-cheese");
        milk.status = ItemStatus::InCart;
        let bread = ShoppingListItem::new("Bread", 2.25, "bakery");

        let items = vec![milk, bread];
        let billing = Billing::for_cart(items.iter(), 0.08);
        // subtotal 3.50, tax 0.28, total 3.78
        assert!((billing.subtotal - 3.50).abs() < EPSILON);
        assert!((billing.tax - 0.28).abs() < EPSILON);
        assert!((billing.total - 3.78).abs() < EPSILON);
    }

    #[test]
    fn test_billing_empty_cart() {
        let billing = Billing::for_cart([].iter(), 0.08);
        assert_eq!(billing, Billing::default());
    }
}
