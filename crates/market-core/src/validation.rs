//! # Validation Module
//!
//! Input validation for the marketplace API.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractor (market-api)                                  │
//! │  └── JSON shape (malformed body → 400)                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required fields present                                           │
//! │  └── Ranges: price ≥ 0, quantity ≥ 1, rating 1..=5                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: SQLite                                                       │
//! │  ├── CHECK (quantity >= 0)                                             │
//! │  ├── UNIQUE (email)                                                    │
//! │  └── Foreign keys                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here touches storage. Existence checks (seller, buyer, item)
//! belong to market-db.
//!
//! ## Usage
//! ```rust
//! use market_core::types::ItemRequest;
//! use market_core::validation::validate_new_item;
//!
//! let req = ItemRequest {
//!     title: Some("Desk lamp".into()),
//!     price_cents: Some(5000),
//!     quantity: Some(2),
//!     seller_id: Some(7),
//!     ..Default::default()
//! };
//! let draft = validate_new_item(req).unwrap();
//! assert_eq!(draft.title, "Desk lamp");
//! ```

use crate::error::ValidationError;
use crate::types::{
    ItemChanges, ItemRequest, NewItem, NewReview, NewUser, PurchaseRequest, ReviewRequest,
    UserChanges, UserRequest,
};
use crate::{MAX_RATING, MIN_RATING};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted search string.
pub const MAX_SEARCH_LEN: usize = 100;

const MAX_TITLE_LEN: usize = 200;
const MAX_NAME_LEN: usize = 100;
const MAX_EMAIL_LEN: usize = 254;
const MAX_COMMENT_LEN: usize = 2000;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates an item title.
///
/// ```rust
/// use market_core::validation::validate_title;
///
/// assert!(validate_title("Oak desk").is_ok());
/// assert!(validate_title("   ").is_err());
/// ```
pub fn validate_title(title: &str) -> ValidationResult<()> {
    validate_text("title", title, MAX_TITLE_LEN)
}

pub fn validate_user_name(name: &str) -> ValidationResult<()> {
    validate_text("name", name, MAX_NAME_LEN)
}

/// Validates an email address.
///
/// Only the shape is checked: something on both sides of a single '@'.
/// The identity provider has already verified ownership.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    validate_text("email", email, MAX_EMAIL_LEN)?;

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(())
        }
        _ => Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must be an email address".to_string(),
        }),
    }
}

/// Validates a unit price in cents. Zero is allowed (free listings).
pub fn validate_price_cents(price_cents: i64) -> ValidationResult<()> {
    if price_cents < 0 {
        return Err(ValidationError::Negative {
            field: "price_cents".to_string(),
        });
    }
    Ok(())
}

/// Validates a listing quantity. A listing starts with at least one unit.
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity < 1 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

/// Validates a star rating.
///
/// ```rust
/// use market_core::validation::validate_rating;
///
/// assert!(validate_rating(5).is_ok());
/// assert!(validate_rating(0).is_err());
/// assert!(validate_rating(6).is_err());
/// ```
pub fn validate_rating(rating: i64) -> ValidationResult<()> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(ValidationError::OutOfRange {
            field: "rating".to_string(),
            min: MIN_RATING,
            max: MAX_RATING,
        });
    }
    Ok(())
}

/// Validates a search string. Empty is fine (matches everything).
pub fn validate_search_query(query: &str) -> ValidationResult<()> {
    if query.chars().count() > MAX_SEARCH_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_SEARCH_LEN,
        });
    }
    Ok(())
}

fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Ids come from the client as plain numbers; rowids start at 1.
fn positive_id(id: Option<i64>) -> Option<i64> {
    id.filter(|id| *id > 0)
}

/// Trims and drops empty strings.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// =============================================================================
// Request Validators
// =============================================================================

/// Turns an item create body into a [`NewItem`].
///
/// ## Rules
/// - `title`, `price_cents`, `quantity`, `seller_id` are required
/// - `price_cents >= 0`, `quantity >= 1`
pub fn validate_new_item(req: ItemRequest) -> ValidationResult<NewItem> {
    let (Some(title), Some(price_cents), Some(quantity), Some(seller_id)) = (
        non_blank(req.title),
        req.price_cents,
        req.quantity,
        positive_id(req.seller_id),
    ) else {
        return Err(ValidationError::MissingFields);
    };

    validate_title(&title)?;
    validate_price_cents(price_cents)?;
    validate_quantity(quantity)?;

    Ok(NewItem {
        title,
        description: non_blank(req.description),
        price_cents,
        quantity,
        seller_id,
        category_id: req.category_id,
    })
}

/// Turns an item patch body into [`ItemChanges`], applying the same range
/// rules as creation to whatever fields are present.
///
/// A blank `description` clears the stored one.
pub fn validate_item_changes(req: ItemRequest) -> ValidationResult<ItemChanges> {
    if let Some(title) = &req.title {
        validate_title(title)?;
    }
    if let Some(price_cents) = req.price_cents {
        validate_price_cents(price_cents)?;
    }
    if let Some(quantity) = req.quantity {
        validate_quantity(quantity)?;
    }

    Ok(ItemChanges {
        title: req.title.map(|t| t.trim().to_string()),
        description: req.description.map(|d| non_blank(Some(d))),
        price_cents: req.price_cents,
        quantity: req.quantity,
        seller_id: req.seller_id,
        category_id: req.category_id,
    })
}

/// Turns a user create body into a [`NewUser`].
pub fn validate_new_user(req: UserRequest) -> ValidationResult<NewUser> {
    let (Some(name), Some(email)) = (non_blank(req.name), non_blank(req.email)) else {
        return Err(ValidationError::MissingFields);
    };

    validate_user_name(&name)?;
    validate_email(&email)?;

    Ok(NewUser {
        name,
        email,
        phone_number: non_blank(req.phone_number),
    })
}

/// Turns a user patch body into [`UserChanges`]. A blank `phone_number`
/// clears the stored one.
pub fn validate_user_changes(req: UserRequest) -> ValidationResult<UserChanges> {
    if let Some(name) = &req.name {
        validate_user_name(name)?;
    }
    if let Some(email) = &req.email {
        validate_email(email)?;
    }

    Ok(UserChanges {
        name: req.name.map(|n| n.trim().to_string()),
        email: req.email.map(|e| e.trim().to_string()),
        phone_number: req.phone_number.map(|p| non_blank(Some(p))),
    })
}

/// Turns a review body into a [`NewReview`]. All four fields are required.
pub fn validate_new_review(req: ReviewRequest) -> ValidationResult<NewReview> {
    let (Some(item_id), Some(reviewer_id), Some(comment), Some(rating)) = (
        positive_id(req.item_id),
        positive_id(req.reviewer_id),
        non_blank(req.comment),
        req.rating,
    ) else {
        return Err(ValidationError::MissingFields);
    };

    validate_rating(rating)?;
    if comment.chars().count() > MAX_COMMENT_LEN {
        return Err(ValidationError::TooLong {
            field: "comment".to_string(),
            max: MAX_COMMENT_LEN,
        });
    }

    Ok(NewReview {
        item_id,
        reviewer_id,
        comment,
        rating,
    })
}

/// Extracts `(item_id, buyer_id)` from a purchase body.
///
/// Absent, zero or negative ids are all "missing": there is no row they
/// could name.
pub fn validate_purchase(req: &PurchaseRequest) -> ValidationResult<(i64, i64)> {
    match (positive_id(req.item_id), positive_id(req.buyer_id)) {
        (Some(item_id), Some(buyer_id)) => Ok((item_id, buyer_id)),
        _ => Err(ValidationError::MissingFields),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item_request() -> ItemRequest {
        ItemRequest {
            title: Some("  Desk lamp ".to_string()),
            description: Some("brass".to_string()),
            price_cents: Some(5000),
            quantity: Some(2),
            seller_id: Some(7),
            category_id: Some(1),
        }
    }

    #[test]
    fn test_new_item_trims_title() {
        let draft = validate_new_item(item_request()).unwrap();
        assert_eq!(draft.title, "Desk lamp");
        assert_eq!(draft.seller_id, 7);
        assert_eq!(draft.category_id, Some(1));
    }

    #[test]
    fn test_new_item_missing_fields() {
        let req = ItemRequest {
            seller_id: None,
            ..item_request()
        };
        assert!(matches!(
            validate_new_item(req),
            Err(ValidationError::MissingFields)
        ));

        let req = ItemRequest {
            title: Some("   ".to_string()),
            ..item_request()
        };
        assert!(matches!(
            validate_new_item(req),
            Err(ValidationError::MissingFields)
        ));
    }

    #[test]
    fn test_new_item_ranges() {
        let free = ItemRequest {
            price_cents: Some(0),
            ..item_request()
        };
        assert!(validate_new_item(free).is_ok());

        let negative = ItemRequest {
            price_cents: Some(-1),
            ..item_request()
        };
        assert!(matches!(
            validate_new_item(negative),
            Err(ValidationError::Negative { .. })
        ));

        let empty_stock = ItemRequest {
            quantity: Some(0),
            ..item_request()
        };
        assert!(matches!(
            validate_new_item(empty_stock),
            Err(ValidationError::MustBePositive { .. })
        ));
    }

    #[test]
    fn test_item_changes_check_present_fields_only() {
        let changes = validate_item_changes(ItemRequest {
            price_cents: Some(7500),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(changes.price_cents, Some(7500));
        assert_eq!(changes.title, None);

        assert!(validate_item_changes(ItemRequest {
            quantity: Some(0),
            ..Default::default()
        })
        .is_err());
    }

    #[test]
    fn test_blank_optional_text_clears() {
        let changes = validate_item_changes(ItemRequest {
            description: Some("   ".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(changes.description, Some(None));
        assert!(!changes.is_empty());

        let changes = validate_item_changes(ItemRequest {
            description: Some(" brass ".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(changes.description, Some(Some("brass".to_string())));

        let changes = validate_user_changes(UserRequest {
            phone_number: Some(String::new()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(changes.phone_number, Some(None));
        assert!(!changes.is_empty());
    }

    #[test]
    fn test_email_shape() {
        assert!(validate_email("buyer@example.com").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("a@b@c").is_err());
        assert!(matches!(
            validate_email(""),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_new_user() {
        let user = validate_new_user(UserRequest {
            name: Some("Ada".to_string()),
            email: Some(" ada@example.com ".to_string()),
            phone_number: Some("".to_string()),
        })
        .unwrap();
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.phone_number, None);

        assert!(matches!(
            validate_new_user(UserRequest::default()),
            Err(ValidationError::MissingFields)
        ));
    }

    #[test]
    fn test_new_review() {
        let req = ReviewRequest {
            item_id: Some(1),
            reviewer_id: Some(42),
            comment: Some("Works great".to_string()),
            rating: Some(5),
        };
        assert_eq!(validate_new_review(req.clone()).unwrap().rating, 5);

        let bad = ReviewRequest {
            rating: Some(9),
            ..req.clone()
        };
        assert!(matches!(
            validate_new_review(bad),
            Err(ValidationError::OutOfRange { .. })
        ));

        let missing = ReviewRequest {
            comment: None,
            ..req
        };
        assert!(validate_new_review(missing).is_err());
    }

    #[test]
    fn test_purchase_ids() {
        let ok = PurchaseRequest {
            item_id: Some(1),
            buyer_id: Some(42),
        };
        assert_eq!(validate_purchase(&ok).unwrap(), (1, 42));

        let zero = PurchaseRequest {
            item_id: Some(0),
            buyer_id: Some(42),
        };
        assert!(validate_purchase(&zero).is_err());
        assert!(validate_purchase(&PurchaseRequest::default()).is_err());
    }

    #[test]
    fn test_search_query_length() {
        assert!(validate_search_query("").is_ok());
        assert!(validate_search_query(&"x".repeat(MAX_SEARCH_LEN)).is_ok());
        assert!(validate_search_query(&"x".repeat(MAX_SEARCH_LEN + 1)).is_err());
    }
}
