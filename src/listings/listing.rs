use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::users::UserId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Listing {
    pub id: Uuid,
    pub owner_id: UserId,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub location: String,
    pub availability: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A validated draft: trimmed text, numeric positive price.
#[derive(Debug, Clone, PartialEq)]
pub struct NewListing {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub location: String,
    pub availability: bool,
}

/// Field-wise changes; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub location: Option<String>,
    pub availability: Option<bool>,
}

impl From<NewListing> for ListingUpdate {
    fn from(NewListing { title, description, price, location, availability }: NewListing) -> Self {
        Self {
            title: Some(title),
            description: Some(description),
            price: Some(price),
            location: Some(location),
            availability: Some(availability),
        }
    }
}

/// Listing form input as submitted, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingDraft {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<PriceInput>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub availability: Option<bool>,
}

/// Forms send prices as text, API clients as numbers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Number(f64),
    Text(String),
}

impl PriceInput {
    /// The price if it is a finite number above zero.
    pub fn positive(&self) -> Option<f64> {
        let price = match self {
            PriceInput::Number(price) => *price,
            PriceInput::Text(text) => text.trim().parse().ok()?,
        };
        (price.is_finite() && price > 0.0).then_some(price)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    #[serde(rename = "newest")]
    Newest,
    #[serde(rename = "oldest")]
    Oldest,
    #[serde(rename = "price-low")]
    PriceAsc,
    #[serde(rename = "price-high")]
    PriceDesc,
}

impl SortKey {
    /// Reads the `sort` query parameter; anything unrecognised means newest first.
    pub fn from_param(param: Option<&str>) -> Self {
        match param.map(str::trim) {
            Some("oldest") => SortKey::Oldest,
            Some("price-low") => SortKey::PriceAsc,
            Some("price-high") => SortKey::PriceDesc,
            _ => SortKey::Newest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_accepts_numbers_and_numeric_text() {
        assert_eq!(PriceInput::Number(75.0).positive(), Some(75.0));
        assert_eq!(PriceInput::Text(" 75.50 ".to_owned()).positive(), Some(75.5));
    }

    #[test]
    fn price_rejects_non_positive_and_garbage() {
        for bad in [
            PriceInput::Number(0.0),
            PriceInput::Number(-5.0),
            PriceInput::Number(f64::NAN),
            PriceInput::Text(String::new()),
            PriceInput::Text("cheap".to_owned()),
            PriceInput::Text("inf".to_owned()),
        ] {
            assert_eq!(bad.positive(), None, "{bad:?}");
        }
    }

    #[test]
    fn draft_price_deserializes_from_either_form() {
        let draft: ListingDraft = serde_json::from_str(r#"{"price": 120}"#).unwrap();
        assert_eq!(draft.price, Some(PriceInput::Number(120.0)));

        let draft: ListingDraft = serde_json::from_str(r#"{"price": "120"}"#).unwrap();
        assert_eq!(draft.price, Some(PriceInput::Text("120".to_owned())));

        let draft: ListingDraft = serde_json::from_str("{}").unwrap();
        assert_eq!(draft.price, None);
    }

    #[test]
    fn sort_param_defaults_to_newest() {
        assert_eq!(SortKey::from_param(None), SortKey::Newest);
        assert_eq!(SortKey::from_param(Some("price-low")), SortKey::PriceAsc);
        assert_eq!(SortKey::from_param(Some("price-high")), SortKey::PriceDesc);
        assert_eq!(SortKey::from_param(Some("oldest")), SortKey::Oldest);
        assert_eq!(SortKey::from_param(Some("random")), SortKey::Newest);
    }
}
