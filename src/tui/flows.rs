//! Cart actions that talk to the user through modal dialogs
//!
//! Each action runs in its own task so the event loop keeps drawing and
//! routing input while a dialog waits for an answer. Results flow back to the
//! app through the event channel.

use super::events::Event;
use crate::{
    api::{format_price, ApiError, Cart, CartItem, Storefront},
    modal::{DialogHandle, ModalController},
};
use std::{future::Future, sync::Arc};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub const REMOVE_PROMPT: &str = "Are you sure you want to remove this item from your cart?";
pub const CLEAR_PROMPT: &str = "Are you sure you want to clear your cart?";
pub const MIN_QUANTITY_WARNING: &str = "Quantity must be at least 1. Use Remove button to delete item.";
pub const SHIPPING_WARNING: &str = "Please fill in shipping address and phone number";

#[derive(Clone)]
pub struct CartFlows {
    modal: ModalController,
    store: Arc<dyn Storefront>,
    events: mpsc::UnboundedSender<Event>,
}

impl CartFlows {
    pub fn new(
        modal: ModalController,
        store: Arc<dyn Storefront>,
        events: mpsc::UnboundedSender<Event>,
    ) -> Self {
        Self {
            modal,
            store,
            events,
        }
    }

    pub fn store_name(&self) -> &str {
        self.store.name()
    }

    /// Run an action in the background.
    pub fn spawn<F, Fut>(&self, name: &'static str, action: F)
    where
        F: FnOnce(CartFlows) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        debug!(action = name, "starting cart action");
        tokio::spawn(action(self.clone()));
    }

    fn publish(&self, cart: Cart) {
        let _ = self.events.send(Event::CartUpdated(cart));
    }

    fn status(&self, message: impl Into<String>) {
        let _ = self.events.send(Event::StatusMessage(message.into()));
    }

    pub async fn load_cart(self) {
        match self.store.cart().await {
            Ok(cart) => {
                info!(items = cart.items.len(), store = self.store.name(), "cart loaded");
                self.publish(cart);
            }
            Err(ApiError::Unauthorized) => {
                self.status("Not logged in");
                let _ = self.modal.warning("Please login to view your cart");
            }
            Err(e) => {
                warn!("Failed to load cart: {}", e);
                let _ = self.modal.error(format!("Failed to load cart: {}", e));
            }
        }
    }

    pub async fn remove_item(self, item: CartItem) {
        if !confirmed(self.modal.confirm(REMOVE_PROMPT, None)).await {
            return;
        }

        match self.store.update_quantity(&item.book_id, 0).await {
            Ok(response) if response.success => {
                if let Some(cart) = response.cart {
                    self.publish(cart);
                }
                self.status(format!("Removed {}", item.book_title));
                let _ = self.modal.success("Item removed from cart");
            }
            Ok(response) => {
                if let Some(message) = response.message {
                    let _ = self.modal.error(message);
                }
            }
            Err(e) => {
                let _ = self.modal.error(format!("Failed to remove item: {}", e));
            }
        }
    }

    pub async fn change_quantity(self, item: CartItem, quantity: u32) {
        if quantity < 1 {
            let _ = self.modal.warning(MIN_QUANTITY_WARNING);
            return;
        }

        match self.store.update_quantity(&item.book_id, quantity).await {
            Ok(response) if response.success => {
                if let Some(cart) = response.cart {
                    self.publish(cart);
                }
            }
            Ok(response) => {
                if let Some(message) = response.message {
                    let _ = self.modal.error(message);
                }
            }
            Err(e) => {
                let _ = self.modal.error(format!("Failed to update quantity: {}", e));
            }
        }
    }

    pub async fn clear_cart(self, cart: Cart) {
        if cart.is_empty() {
            let _ = self.modal.info("Your cart is already empty");
            return;
        }

        if !confirmed(self.modal.confirm(CLEAR_PROMPT, None)).await {
            return;
        }

        match self.store.clear_cart().await {
            Ok(()) => {
                self.publish(Cart::default());
                let _ = self.modal.success("Cart cleared successfully");
            }
            Err(e) => {
                let _ = self.modal.error(format!("Failed to clear cart: {}", e));
            }
        }
    }

    pub async fn checkout(self, cart: Cart) {
        if cart.is_empty() {
            let _ = self.modal.warning("Your cart is empty");
            return;
        }

        let profile = match self.store.profile().await {
            Ok(profile) => profile,
            Err(e) => {
                let _ = self
                    .modal
                    .error(format!("Failed to load profile information: {}", e));
                return;
            }
        };

        let (Some(address), Some(phone)) = (profile.address.clone(), profile.phone.clone()) else {
            let _ = self.modal.warning(SHIPPING_WARNING);
            return;
        };
        if !profile.can_ship() {
            let _ = self.modal.warning(SHIPPING_WARNING);
            return;
        }

        let prompt = format!(
            "Place order for {} item(s), total {}?\nShip to: {}\nPhone: {}",
            cart.item_count(),
            format_price(cart.total()),
            address,
            phone
        );
        if !confirmed(self.modal.confirm(prompt, Some("Checkout"))).await {
            return;
        }

        match self.store.place_order(&address, &phone).await {
            Ok(response) if response.success => {
                self.publish(response.cart.unwrap_or_default());
                self.status("Order placed");
                let _ = self.modal.success("Order placed successfully!");
            }
            Ok(response) => {
                if let Some(message) = response.message {
                    let _ = self.modal.error(message);
                }
            }
            Err(e) => {
                let _ = self.modal.error(format!("Failed to place order: {}", e));
            }
        }
    }

    pub async fn about(self) {
        let message = format!(
            "BookGetter cart\nConnected to: {}\nPrices are in Malaysian Ringgit.",
            self.store.name()
        );
        let _ = self.modal.notify(crate::modal::DialogKind::Info, message, Some("About"));
    }
}

/// Wait for a confirm dialog; anything but the primary action reads as "no".
async fn confirmed(handle: DialogHandle) -> bool {
    matches!(handle.await, Ok(outcome) if outcome.is_confirmed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::{Profile, SampleStore},
        modal::{DialogInput, DialogKind},
    };
    use std::time::Duration;

    struct Harness {
        flows: CartFlows,
        modal: ModalController,
        events: mpsc::UnboundedReceiver<Event>,
    }

    fn harness(store: SampleStore) -> Harness {
        let (sender, events) = mpsc::unbounded_channel();
        let modal = ModalController::new();
        let flows = CartFlows::new(modal.clone(), Arc::new(store), sender);
        Harness { flows, modal, events }
    }

    /// Let spawned tasks and fade timers run.
    async fn settle() {
        tokio::time::sleep(Duration::from_millis(300)).await;
    }

    fn shown(modal: &ModalController) -> (DialogKind, String) {
        let request = modal.active_request().expect("a dialog is showing");
        (request.kind, request.message)
    }

    fn next_cart(events: &mut mpsc::UnboundedReceiver<Event>) -> Option<Cart> {
        while let Ok(event) = events.try_recv() {
            if let Event::CartUpdated(cart) = event {
                return Some(cart);
            }
        }
        None
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_item_after_confirmation() {
        let mut h = harness(SampleStore::default());
        let cart = SampleStore::default().cart().await.unwrap();
        let item = cart.items[0].clone();

        h.flows.spawn("remove", move |flows| flows.remove_item(item));
        settle().await;
        assert_eq!(shown(&h.modal), (DialogKind::Confirm, REMOVE_PROMPT.to_string()));

        h.modal.dispatch(DialogInput::Primary);
        settle().await;

        assert_eq!(next_cart(&mut h.events).unwrap().items.len(), 2);
        assert_eq!(
            shown(&h.modal),
            (DialogKind::Success, "Item removed from cart".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_item_backdrop_keeps_cart() {
        let mut h = harness(SampleStore::default());
        let item = SampleStore::default().cart().await.unwrap().items[0].clone();

        h.flows.spawn("remove", move |flows| flows.remove_item(item));
        settle().await;
        h.modal.dispatch(DialogInput::Backdrop);
        settle().await;

        assert!(next_cart(&mut h.events).is_none());
        assert!(!h.modal.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_quantity_below_one_warns() {
        let h = harness(SampleStore::default());
        let item = SampleStore::default().cart().await.unwrap().items[0].clone();

        h.flows.clone().change_quantity(item, 0).await;
        assert_eq!(
            shown(&h.modal),
            (DialogKind::Warning, MIN_QUANTITY_WARNING.to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_stock_limit_is_reported_as_error() {
        let h = harness(SampleStore::default());
        let item = SampleStore::default().cart().await.unwrap().items[2].clone();

        h.flows.clone().change_quantity(item, 10).await;
        assert_eq!(
            shown(&h.modal),
            (
                DialogKind::Error,
                "Cannot add more items. Only 3 remaining in stock.".to_string()
            )
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_cart_flow() {
        let mut h = harness(SampleStore::default());
        let cart = SampleStore::default().cart().await.unwrap();

        h.flows.spawn("clear", move |flows| flows.clear_cart(cart));
        settle().await;
        assert_eq!(shown(&h.modal).1, CLEAR_PROMPT);

        h.modal.dispatch(DialogInput::Primary);
        settle().await;

        assert!(next_cart(&mut h.events).unwrap().is_empty());
        assert_eq!(shown(&h.modal).1, "Cart cleared successfully");
    }

    #[tokio::test(start_paused = true)]
    async fn test_checkout_without_profile_warns() {
        let store = SampleStore::new(SampleStore::default().cart().await.unwrap(), Profile::default());
        let h = harness(store);
        let cart = h.flows.store.cart().await.unwrap();

        h.flows.clone().checkout(cart).await;
        assert_eq!(shown(&h.modal), (DialogKind::Warning, SHIPPING_WARNING.to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_checkout_places_order() {
        let mut h = harness(SampleStore::default());
        let cart = h.flows.store.cart().await.unwrap();

        h.flows.spawn("checkout", move |flows| flows.checkout(cart));
        settle().await;
        let request = h.modal.active_request().unwrap();
        assert_eq!(request.effective_title(), "Checkout");
        assert!(request.message.contains("RM 259.90"));

        h.modal.dispatch(DialogInput::Primary);
        settle().await;

        assert!(next_cart(&mut h.events).unwrap().is_empty());
        assert_eq!(shown(&h.modal).1, "Order placed successfully!");
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_cart_checkout_warns() {
        let h = harness(SampleStore::default());
        h.flows.clone().checkout(Cart::default()).await;
        assert_eq!(shown(&h.modal), (DialogKind::Warning, "Your cart is empty".to_string()));
    }
}
