//! Wire types of the BookGetter REST API

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub book_id: String,
    pub book_title: String,
    #[serde(default)]
    pub book_author: String,
    pub price: f64,
    pub quantity: u32,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub available_stock: u32,
}

impl CartItem {
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<CartItem>,
}

impl Cart {
    pub fn total(&self) -> f64 {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Number of books, counting quantities (the nav badge count)
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// `{success, message, cart}` envelope used by mutating endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub cart: Option<Cart>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub role: String,
}

impl SessionUser {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// Response of `GET /login`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    #[serde(default)]
    pub logged_in: bool,
    pub user: Option<SessionUser>,
}

/// Shipping details from `GET /user`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl Profile {
    /// Both the shipping address and the phone number are filled in
    pub fn can_ship(&self) -> bool {
        let filled = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.trim().is_empty());
        filled(&self.address) && filled(&self.phone)
    }
}

pub fn format_price(price: f64) -> String {
    format!("RM {:.2}", price)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_deserializes_server_shape() {
        let cart: Cart = serde_json::from_str(
            r#"{"id":"c1","userId":"u1","updatedAt":1700000000000,"items":[
                {"bookId":"b1","bookTitle":"Dune","bookAuthor":"Frank Herbert","price":39.9,"quantity":2,"imageUrl":null,"availableStock":5},
                {"bookId":"b2","bookTitle":"Emma","price":12.5,"quantity":1}
            ]}"#,
        )
        .unwrap();

        assert_eq!(cart.items.len(), 2);
        assert_eq!(cart.item_count(), 3);
        assert!((cart.total() - 92.3).abs() < 1e-9);
        assert_eq!(cart.items[1].book_author, "");
    }

    #[test]
    fn test_session_status() {
        let status: SessionStatus = serde_json::from_str(
            r#"{"loggedIn":true,"user":{"id":"1","username":"admin","role":"admin"}}"#,
        )
        .unwrap();
        assert!(status.logged_in);
        assert!(status.user.unwrap().is_admin());

        let status: SessionStatus = serde_json::from_str(r#"{"loggedIn":false}"#).unwrap();
        assert!(!status.logged_in);
        assert!(status.user.is_none());
    }

    #[test]
    fn test_profile_can_ship() {
        assert!(!Profile::default().can_ship());
        let profile = Profile {
            address: Some("12 Jalan Ampang".to_string()),
            phone: Some("  ".to_string()),
        };
        assert!(!profile.can_ship());
        let profile = Profile {
            phone: Some("012-3456789".to_string()),
            ..profile
        };
        assert!(profile.can_ship());
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(12.5), "RM 12.50");
        assert_eq!(format_price(0.0), "RM 0.00");
    }
}
