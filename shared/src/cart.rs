use crate::CartLineItem;

/// Ordered list of booked rounds.
///
/// The total is always derived from the items and never stored.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<CartLineItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn add_item(&mut self, item: CartLineItem) {
        self.items.push(item);
    }

    /// Remove every item carrying `id`. Returns how many were removed.
    pub fn remove_item(&mut self, id: &str) -> usize {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        before - self.items.len()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn total(&self) -> f64 {
        self.items.iter().map(|item| item.price).sum()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.items)
    }

    /// Rebuild a cart from its stored JSON. Anything unreadable gives an
    /// empty cart.
    pub fn restore(raw: Option<&str>) -> Self {
        raw.and_then(|json| serde_json::from_str::<Vec<CartLineItem>>(json).ok())
            .map(Self::from_items)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, price: f64) -> CartLineItem {
        CartLineItem {
            id: id.to_string(),
            date: "2026-10-20".to_string(),
            start_time: "08:00-10:00".to_string(),
            total_stops: 2,
            return_to_pharmacy: false,
            price,
            duration_minutes: 45,
            description: "Tournée de 45min (2 arrêt(s), retour: non)".to_string(),
            is_recurring: false,
        }
    }

    #[test]
    fn test_total_is_sum_of_prices() {
        let mut cart = Cart::new();
        assert_eq!(cart.total(), 0.0);

        cart.add_item(item("a", 13.0));
        cart.add_item(item("b", 21.5));
        cart.add_item(item("c", 0.25));
        assert_eq!(cart.total(), 34.75);
        assert_eq!(cart.len(), 3);
    }

    #[test]
    fn test_add_then_remove_restores_total() {
        let mut cart = Cart::from_items(vec![item("a", 13.0), item("b", 21.5)]);
        let before = cart.total();

        cart.add_item(item("c", 7.25));
        assert_eq!(cart.remove_item("c"), 1);
        assert_eq!(cart.total(), before);
        assert_eq!(cart.items().iter().map(|i| i.id.as_str()).collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_remove_drops_every_match() {
        let mut cart = Cart::from_items(vec![item("dup", 1.0), item("keep", 2.0), item("dup", 3.0)]);
        assert_eq!(cart.remove_item("dup"), 2);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.remove_item("missing"), 0);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::from_items(vec![item("a", 1.0)]);
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), 0.0);
    }

    #[test]
    fn test_persisted_round_trip_keeps_order() {
        let cart = Cart::from_items(vec![item("first", 10.0), item("second", 19.0), item("third", 29.0)]);
        let json = cart.to_json().unwrap();

        let restored = Cart::restore(Some(&json));
        assert_eq!(restored, cart);
    }

    #[test]
    fn test_restore_falls_back_to_empty() {
        assert!(Cart::restore(None).is_empty());
        assert!(Cart::restore(Some("")).is_empty());
        assert!(Cart::restore(Some("{not json")).is_empty());
        assert!(Cart::restore(Some(r#"{"id": "object, not list"}"#)).is_empty());
        assert!(Cart::restore(Some("[]")).is_empty());
    }
}
