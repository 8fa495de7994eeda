//! BookGetter storefront access
//!
//! The REST backend is an external collaborator; this module only consumes
//! its existing contract. Pages talk to a [`Storefront`], which is either the
//! HTTP client or the in-memory sample store.

pub mod client;
pub mod errors;
pub mod sample;
pub mod types;

pub use client::ApiClient;
pub use errors::{ApiError, ApiResult};
pub use sample::SampleStore;
pub use types::{format_price, ActionResponse, Cart, CartItem, Profile, SessionUser};

use async_trait::async_trait;

/// Cart and checkout operations used by the cart page
#[async_trait]
pub trait Storefront: Send + Sync {
    /// Human readable name for logs and the status bar
    fn name(&self) -> &str;

    async fn cart(&self) -> ApiResult<Cart>;

    /// Set a cart line's quantity; zero removes the line
    async fn update_quantity(&self, book_id: &str, quantity: u32) -> ApiResult<ActionResponse>;

    async fn clear_cart(&self) -> ApiResult<()>;

    async fn profile(&self) -> ApiResult<Profile>;

    async fn place_order(&self, address: &str, phone: &str) -> ApiResult<ActionResponse>;
}

#[async_trait]
impl Storefront for ApiClient {
    fn name(&self) -> &str {
        self.base_url()
    }

    async fn cart(&self) -> ApiResult<Cart> {
        ApiClient::cart(self).await
    }

    async fn update_quantity(&self, book_id: &str, quantity: u32) -> ApiResult<ActionResponse> {
        ApiClient::update_quantity(self, book_id, quantity).await
    }

    async fn clear_cart(&self) -> ApiResult<()> {
        ApiClient::clear_cart(self).await
    }

    async fn profile(&self) -> ApiResult<Profile> {
        ApiClient::profile(self).await
    }

    async fn place_order(&self, address: &str, phone: &str) -> ApiResult<ActionResponse> {
        ApiClient::place_order(self, address, phone).await
    }
}
