//! HTTP client for the BookGetter REST API

use super::{
    errors::{ApiError, ApiResult},
    types::{ActionResponse, Cart, Profile, SessionStatus, SessionUser},
};
use reqwest::{header::CONTENT_TYPE, Client, Method, Response, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error};

const FALLBACK_ERROR: &str = "Request failed";

pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a JSON request.
    ///
    /// Error statuses become [`ApiError::Request`] with the server's
    /// `message`, except 401 and 403, which are handed back so the caller can
    /// decide how to gate access.
    pub async fn request(&self, method: Method, path: &str, body: Option<Value>) -> ApiResult<Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "api request");

        let mut request = self
            .client
            .request(method, &url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|e| {
            error!("API Error: {}", e);
            ApiError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() && !is_auth_status(status) {
            let text = response.text().await.unwrap_or_default();
            let message = error_message(&text);
            error!(%status, "API Error: {}", message);
            return Err(ApiError::Request(message));
        }

        Ok(response)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self.request(Method::GET, path, None).await?;
        Self::decode(response).await
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> ApiResult<T> {
        if is_auth_status(response.status()) {
            return Err(ApiError::Unauthorized);
        }
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Session user, `None` when logged out.
    pub async fn session(&self) -> ApiResult<Option<SessionUser>> {
        let status: SessionStatus = self.get_json("/login").await?;
        let logged_in = status.logged_in;
        Ok(status.user.filter(|_| logged_in))
    }

    /// Current session user. Any failure is logged and reads as logged out.
    pub async fn check_auth(&self) -> Option<SessionUser> {
        match self.session().await {
            Ok(user) => user,
            Err(e) => {
                error!("Auth check failed: {}", e);
                None
            }
        }
    }

    pub async fn cart(&self) -> ApiResult<Cart> {
        self.get_json("/cart").await
    }

    /// Set a cart line's quantity; zero removes the line.
    pub async fn update_quantity(&self, book_id: &str, quantity: u32) -> ApiResult<ActionResponse> {
        let response = self
            .request(
                Method::PUT,
                "/cart",
                Some(json!({ "bookId": book_id, "quantity": quantity })),
            )
            .await?;
        Self::decode(response).await
    }

    pub async fn clear_cart(&self) -> ApiResult<()> {
        let response = self.request(Method::DELETE, "/cart", None).await?;
        if is_auth_status(response.status()) {
            return Err(ApiError::Unauthorized);
        }
        Ok(())
    }

    pub async fn profile(&self) -> ApiResult<Profile> {
        self.get_json("/user").await
    }

    pub async fn place_order(&self, address: &str, phone: &str) -> ApiResult<ActionResponse> {
        let response = self
            .request(
                Method::POST,
                "/orders",
                Some(json!({ "shippingAddress": address, "phone": phone })),
            )
            .await?;
        Self::decode(response).await
    }
}

fn is_auth_status(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

/// The `message` of an error body, or a generic fallback.
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| json.get("message").and_then(Value::as_str).map(str::to_string))
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| FALLBACK_ERROR.to_string())
}
