use gloo::storage::{LocalStorage, Storage};
use shared::Cart;

use crate::services::logging::Logger;

const COMPONENT: &str = "cart-storage";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("localStorage indisponible")]
    Unavailable,
    #[error("échec d'écriture: {0}")]
    Write(String),
    #[error("panier non sérialisable: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Cart mirror in the browser's local storage
#[derive(Debug, Clone, PartialEq)]
pub struct CartStorage {
    key: String,
}

impl CartStorage {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Read the stored cart. Missing, unreadable or malformed data gives an
    /// empty cart.
    pub fn load(&self) -> Cart {
        if !local_storage_available() {
            Logger::warn_with_component(COMPONENT, "localStorage indisponible, panier vide");
            return Cart::new();
        }

        let raw = LocalStorage::raw().get_item(&self.key).ok().flatten();
        let cart = Cart::restore(raw.as_deref());
        Logger::debug_with_component(COMPONENT, &format!("{} tournée(s) restaurée(s)", cart.len()));
        cart
    }

    /// Overwrite the stored cart with `cart`
    pub fn save(&self, cart: &Cart) -> Result<(), StorageError> {
        if !local_storage_available() {
            return Err(StorageError::Unavailable);
        }

        let json = cart.to_json()?;
        LocalStorage::raw()
            .set_item(&self.key, &json)
            .map_err(|err| StorageError::Write(format!("{:?}", err)))
    }
}

/// `LocalStorage::raw` throws when storage is disabled, so probe first
fn local_storage_available() -> bool {
    web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::CartLineItem;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn item(id: &str, price: f64) -> CartLineItem {
        CartLineItem {
            id: id.to_string(),
            date: "2026-10-20".to_string(),
            start_time: "08:00-10:00".to_string(),
            total_stops: 3,
            return_to_pharmacy: true,
            price,
            duration_minutes: 60,
            description: "Tournée de 60min (3 arrêt(s), retour: oui)".to_string(),
            is_recurring: false,
        }
    }

    #[wasm_bindgen_test]
    fn test_save_then_load_in_fresh_state() {
        let storage = CartStorage::new("test-cart-round-trip");
        let cart = Cart::from_items(vec![item("a", 16.0), item("b", 29.0)]);
        storage.save(&cart).unwrap();

        let restored = CartStorage::new("test-cart-round-trip").load();
        assert_eq!(restored, cart);
        LocalStorage::delete("test-cart-round-trip");
    }

    #[wasm_bindgen_test]
    fn test_malformed_entry_loads_empty() {
        LocalStorage::raw().set_item("test-cart-malformed", "{oops").unwrap();
        assert!(CartStorage::new("test-cart-malformed").load().is_empty());
        LocalStorage::delete("test-cart-malformed");
    }

    #[wasm_bindgen_test]
    fn test_missing_key_loads_empty() {
        assert!(CartStorage::new("test-cart-never-written").load().is_empty());
    }
}
