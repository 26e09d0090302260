use annadata_core::error::AnnadataError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One product line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: String,
    pub name: String,
    /// Price per unit in paise.
    pub unit_price: u64,
    pub quantity: u32,
}

impl CartItem {
    /// `unit_price * quantity`, `None` on overflow.
    pub fn line_total(&self) -> Option<u64> {
        self.unit_price.checked_mul(u64::from(self.quantity))
    }
}

/// Shopping cart. Lines keep insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append a line, or add to the quantity of an existing line for the
    /// same product (whose name and price are refreshed).
    pub fn add(&mut self, item: CartItem) -> Result<(), AnnadataError> {
        if item.quantity == 0 {
            return Err(AnnadataError::Market(format!(
                "cannot add zero of '{}'",
                item.product_id
            )));
        }
        match self
            .items
            .iter_mut()
            .find(|i| i.product_id == item.product_id)
        {
            Some(existing) => {
                existing.quantity = existing.quantity.checked_add(item.quantity).ok_or_else(
                    || AnnadataError::Market(format!("quantity overflow for '{}'", item.product_id)),
                )?;
                existing.name = item.name;
                existing.unit_price = item.unit_price;
                debug!("cart: {} x{}", existing.product_id, existing.quantity);
            }
            None => {
                debug!("cart: added {} x{}", item.product_id, item.quantity);
                self.items.push(item);
            }
        }
        Ok(())
    }

    /// Set a line's quantity; zero removes the line. Returns `false` if the
    /// product is not in the cart.
    pub fn set_quantity(&mut self, product_id: &str, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(product_id).is_some();
        }
        match self.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, product_id: &str) -> Option<CartItem> {
        let idx = self.items.iter().position(|i| i.product_id == product_id)?;
        Some(self.items.remove(idx))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Sum of line totals in paise.
    pub fn total(&self) -> Result<u64, AnnadataError> {
        self.items.iter().try_fold(0u64, |acc, item| {
            item.line_total()
                .and_then(|line| acc.checked_add(line))
                .ok_or_else(|| AnnadataError::Market("cart total overflow".to_string()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, price: u64, qty: u32) -> CartItem {
        CartItem {
            product_id: id.into(),
            name: format!("Product {id}"),
            unit_price: price,
            quantity: qty,
        }
    }

    #[test]
    fn test_add_appends_and_merges() {
        let mut cart = Cart::new();
        cart.add(item("tomato", 4_000, 2)).unwrap();
        cart.add(item("onion", 3_500, 1)).unwrap();
        cart.add(item("tomato", 4_200, 3)).unwrap();

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.items()[0].product_id, "tomato");
        assert_eq!(cart.items()[0].quantity, 5);
        assert_eq!(cart.items()[0].unit_price, 4_200);
        assert_eq!(cart.item_count(), 6);
        assert_eq!(cart.total().unwrap(), 5 * 4_200 + 3_500);
    }

    #[test]
    fn test_zero_quantity_add_rejected() {
        let mut cart = Cart::new();
        assert!(cart.add(item("okra", 6_000, 0)).is_err());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_and_remove() {
        let mut cart = Cart::new();
        cart.add(item("rice", 7_000, 1)).unwrap();
        cart.add(item("dal", 12_000, 1)).unwrap();

        assert!(cart.set_quantity("rice", 4));
        assert_eq!(cart.items()[0].quantity, 4);
        assert!(cart.set_quantity("dal", 0));
        assert_eq!(cart.items().len(), 1);
        assert!(!cart.set_quantity("wheat", 2));
        assert_eq!(cart.remove("rice").map(|i| i.quantity), Some(4));
        assert!(cart.remove("rice").is_none());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_empty_cart_totals() {
        let mut cart = Cart::new();
        assert_eq!(cart.total().unwrap(), 0);
        assert_eq!(cart.item_count(), 0);
        cart.add(item("milk", 6_000, 2)).unwrap();
        cart.clear();
        assert_eq!(cart.total().unwrap(), 0);
    }

    #[test]
    fn test_total_overflow_is_error() {
        let mut cart = Cart::new();
        cart.add(item("gold", u64::MAX, 2)).unwrap();
        assert!(cart.total().is_err());
    }
}
