//! In-memory storefront used when no backend is configured

use super::{
    errors::ApiResult,
    types::{ActionResponse, Cart, CartItem, Profile},
    Storefront,
};
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard, PoisonError};

pub struct SampleStore {
    cart: Mutex<Cart>,
    profile: Profile,
}

impl SampleStore {
    pub fn new(cart: Cart, profile: Profile) -> Self {
        Self {
            cart: Mutex::new(cart),
            profile,
        }
    }

    fn cart_guard(&self) -> MutexGuard<'_, Cart> {
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn rejected(message: impl Into<String>) -> ActionResponse {
        ActionResponse {
            success: false,
            message: Some(message.into()),
            cart: None,
        }
    }
}

impl Default for SampleStore {
    fn default() -> Self {
        let item = |id: &str, title: &str, author: &str, price: f64, quantity: u32, stock: u32| CartItem {
            book_id: id.to_string(),
            book_title: title.to_string(),
            book_author: author.to_string(),
            price,
            quantity,
            image_url: None,
            available_stock: stock,
        };

        Self::new(
            Cart {
                items: vec![
                    item("b-1001", "The Pragmatic Programmer", "David Thomas", 129.90, 1, 8),
                    item("b-1002", "Dune", "Frank Herbert", 45.50, 2, 12),
                    item("b-1003", "Norwegian Wood", "Haruki Murakami", 39.00, 1, 3),
                ],
            },
            Profile {
                address: Some("12 Jalan Ampang, 50450 Kuala Lumpur".to_string()),
                phone: Some("012-3456789".to_string()),
            },
        )
    }
}

#[async_trait]
impl Storefront for SampleStore {
    fn name(&self) -> &str {
        "sample store"
    }

    async fn cart(&self) -> ApiResult<Cart> {
        Ok(self.cart_guard().clone())
    }

    async fn update_quantity(&self, book_id: &str, quantity: u32) -> ApiResult<ActionResponse> {
        let mut cart = self.cart_guard();
        let Some(index) = cart.items.iter().position(|item| item.book_id == book_id) else {
            return Ok(Self::rejected("Book not found"));
        };

        if quantity == 0 {
            cart.items.remove(index);
        } else {
            let item = &mut cart.items[index];
            if quantity > item.available_stock {
                return Ok(Self::rejected(format!(
                    "Cannot add more items. Only {} remaining in stock.",
                    item.available_stock
                )));
            }
            item.quantity = quantity;
        }

        Ok(ActionResponse {
            success: true,
            message: None,
            cart: Some(cart.clone()),
        })
    }

    async fn clear_cart(&self) -> ApiResult<()> {
        self.cart_guard().items.clear();
        Ok(())
    }

    async fn profile(&self) -> ApiResult<Profile> {
        Ok(self.profile.clone())
    }

    async fn place_order(&self, address: &str, phone: &str) -> ApiResult<ActionResponse> {
        if address.trim().is_empty() || phone.trim().is_empty() {
            return Ok(Self::rejected("Shipping address and phone are required"));
        }

        let mut cart = self.cart_guard();
        if cart.is_empty() {
            return Ok(Self::rejected("Cart is empty"));
        }
        cart.items.clear();

        Ok(ActionResponse {
            success: true,
            message: Some("Order placed successfully".to_string()),
            cart: Some(cart.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_remove_and_stock_limits() {
        let store = SampleStore::default();

        let response = store.update_quantity("b-1003", 4).await.unwrap();
        assert!(!response.success);
        assert_eq!(
            response.message.as_deref(),
            Some("Cannot add more items. Only 3 remaining in stock.")
        );

        let response = store.update_quantity("b-1002", 0).await.unwrap();
        assert!(response.success);
        assert_eq!(response.cart.unwrap().items.len(), 2);

        let response = store.update_quantity("missing", 1).await.unwrap();
        assert_eq!(response.message.as_deref(), Some("Book not found"));
    }

    #[tokio::test]
    async fn test_place_order_empties_cart() {
        let store = SampleStore::default();
        let response = store.place_order("somewhere", "0123").await.unwrap();
        assert!(response.success);
        assert!(store.cart().await.unwrap().is_empty());

        let response = store.place_order("somewhere", "0123").await.unwrap();
        assert_eq!(response.message.as_deref(), Some("Cart is empty"));
    }
}
