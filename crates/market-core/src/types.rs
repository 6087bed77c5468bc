//! # Domain Types
//!
//! Core domain types used throughout the marketplace.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Item       │   │      User       │   │   LedgerEntry   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄──│  id             │──►│  trans_id       │       │
//! │  │  title          │   │  name           │   │  item_id (FK)   │       │
//! │  │  price_cents    │   │  email (unique) │   │  buyer/seller   │       │
//! │  │  quantity ≥ 0   │   │  phone_number   │   │  title snapshot │       │
//! │  │  seller_id (FK) │   └─────────────────┘   │  price snapshot │       │
//! │  │  category_id?   │                         │  date           │       │
//! │  └────────┬────────┘                         └─────────────────┘       │
//! │           │                                                             │
//! │  ┌────────▼────────┐   ┌─────────────────┐                             │
//! │  │    Category     │   │     Review      │                             │
//! │  │  category_id    │   │  item_id (FK)   │                             │
//! │  │  category_name  │   │  reviewer_id    │                             │
//! │  └─────────────────┘   │  rating 1..=5   │                             │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Row types derive `sqlx::FromRow` when the `sqlx` feature is on. Request
//! bodies keep every field optional so a missing field is reported as a
//! validation error instead of a deserialization failure; see
//! [`crate::validation`] for the rules that turn them into drafts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Item
// =============================================================================

/// A listing offered by a seller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Item {
    pub id: i64,

    pub title: String,

    pub description: Option<String>,

    /// Unit price in cents.
    pub price_cents: i64,

    /// Units left. Never negative; 0 means not purchasable.
    pub quantity: i64,

    /// The user selling this item.
    pub seller_id: i64,

    /// Null when uncategorised or when the category was deleted.
    pub category_id: Option<i64>,
}

/// An item joined with its seller's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ItemDetail {
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub item: Item,

    pub seller_name: String,
}

// =============================================================================
// Category
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Category {
    pub category_id: i64,
    pub category_name: String,
}

// =============================================================================
// User
// =============================================================================

/// A marketplace account. Sellers and buyers are both plain users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct User {
    pub id: i64,
    pub name: String,
    /// Verified identity-provider email, unique across users.
    pub email: String,
    pub phone_number: Option<String>,
}

// =============================================================================
// Review
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Review {
    pub review_id: i64,
    pub item_id: i64,
    pub reviewer_id: i64,
    #[ts(as = "String")]
    pub review_date: NaiveDate,
    pub comment: String,
    /// 1 to 5 stars.
    pub rating: i64,
}

/// A review as shown on an item page, with the reviewer's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ItemReview {
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub review: Review,

    pub reviewer_name: String,
}

// =============================================================================
// Ledger
// =============================================================================

/// One completed purchase.
///
/// Uses the snapshot pattern: title and price are frozen at purchase time,
/// so later edits to the item never rewrite history. Entries are never
/// updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct LedgerEntry {
    pub trans_id: i64,
    pub item_id: i64,
    pub buyer_id: i64,
    /// Copied from the item at purchase time, never from the client.
    pub seller_id: i64,
    /// Item title at time of purchase (frozen).
    pub item_title: String,
    /// Unit price in cents at time of purchase (frozen).
    pub price_cents: i64,
    /// UTC calendar date of the purchase.
    #[ts(as = "String")]
    pub date: NaiveDate,
}

impl LedgerEntry {
    /// Returns the paid price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// A user's side of the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserTransactions {
    /// Entries where the user is the buyer, newest first.
    pub purchases: Vec<LedgerEntry>,
    /// Entries where the user is the seller, newest first.
    pub sales: Vec<LedgerEntry>,
}

// =============================================================================
// Drafts (validated input, ready for storage)
// =============================================================================

/// A validated new listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub title: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub quantity: i64,
    pub seller_id: i64,
    pub category_id: Option<i64>,
}

/// A validated partial item update. `None` leaves the column untouched.
///
/// `description` is tri-state: `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub price_cents: Option<i64>,
    pub quantity: Option<i64>,
    pub seller_id: Option<i64>,
    pub category_id: Option<i64>,
}

impl ItemChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.price_cents.is_none()
            && self.quantity.is_none()
            && self.seller_id.is_none()
            && self.category_id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
}

/// `phone_number` is tri-state like [`ItemChanges::description`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<Option<String>>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone_number.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub item_id: i64,
    pub reviewer_id: i64,
    pub comment: String,
    pub rating: i64,
}

// =============================================================================
// Request Bodies
// =============================================================================

/// Body of `POST /item/create` and `PATCH /item/{id}`.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
pub struct ItemRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub quantity: Option<i64>,
    pub seller_id: Option<i64>,
    pub category_id: Option<i64>,
}

/// Body of `POST /user/create` and `PATCH /user/{id}`.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
pub struct UserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

/// Body of `POST /review/create`.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
pub struct ReviewRequest {
    pub item_id: Option<i64>,
    pub reviewer_id: Option<i64>,
    pub comment: Option<String>,
    pub rating: Option<i64>,
}

/// Body of `POST /transaction/create`.
///
/// The only camelCase body in the API, kept for the web client.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PurchaseRequest {
    pub item_id: Option<i64>,
    pub buyer_id: Option<i64>,
}

/// Query string of the item search endpoints.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
    /// `?category_id=` with no value means no filter.
    #[serde(default, deserialize_with = "blank_as_none")]
    #[ts(optional)]
    pub category_id: Option<i64>,
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(trans_id: i64, price_cents: i64) -> LedgerEntry {
        LedgerEntry {
            trans_id,
            item_id: 1,
            buyer_id: 42,
            seller_id: 7,
            item_title: "Lamp".to_string(),
            price_cents,
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        }
    }

    #[test]
    fn test_item_detail_is_flat_json() {
        let detail = ItemDetail {
            item: Item {
                id: 3,
                title: "Desk".to_string(),
                description: Some("oak".to_string()),
                price_cents: 12000,
                quantity: 2,
                seller_id: 7,
                category_id: Some(1),
            },
            seller_name: "Sam".to_string(),
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["title"], "Desk");
        assert_eq!(json["seller_name"], "Sam");
        assert!(json.get("item").is_none());
    }

    #[test]
    fn test_ledger_date_serializes_as_calendar_date() {
        let json = serde_json::to_value(entry(1, 5000)).unwrap();
        assert_eq!(json["date"], "2024-05-01");
        assert_eq!(json["item_title"], "Lamp");
    }

    #[test]
    fn test_ledger_price_snapshot() {
        assert_eq!(entry(1, 2500).price().to_string(), "$25.00");
    }

    #[test]
    fn test_purchase_request_is_camel_case() {
        let req: PurchaseRequest =
            serde_json::from_str(r#"{"itemId": 1, "buyerId": 42}"#).unwrap();
        assert_eq!(req.item_id, Some(1));
        assert_eq!(req.buyer_id, Some(42));

        let req: PurchaseRequest = serde_json::from_str(r#"{"itemId": 1}"#).unwrap();
        assert_eq!(req.buyer_id, None);
    }
}
