//! Listing document types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crosslist_common::{ListingStatus, now_ms};

/// Legacy embedded channel record, kept inside the listing document under
/// `crossPostResults`. `listing_id` is the platform-assigned external id
/// (the field name predates the relational channel registry).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LegacyChannelRecord {
    pub listing_id: String,
    pub status: String,
}

/// A sellable item. Canonical source of truth for price and status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub status: ListingStatus,
    /// Legacy embedded channel map, platform name -> record. Empty for
    /// listings created after the relational registry became canonical.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub cross_post_results: HashMap<String, LegacyChannelRecord>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Listing {
    /// Build a draft listing with a fresh id and current timestamps.
    #[must_use]
    pub fn new(owner_id: impl Into<String>, title: impl Into<String>, price: f64) -> Self {
        let now = now_ms();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner_id.into(),
            title: title.into(),
            description: String::new(),
            price,
            image_url: None,
            condition: None,
            category: None,
            status: ListingStatus::Draft,
            cross_post_results: HashMap::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_roundtrip() {
        let mut listing = Listing::new("u1", "Vintage denim jacket", 25.0);
        listing.cross_post_results.insert(
            "ebay".into(),
            LegacyChannelRecord {
                listing_id: "ebay_123".into(),
                status: "active".into(),
            },
        );
        let json = serde_json::to_string(&listing).unwrap();
        assert!(json.contains("crossPostResults"));
        let back: Listing = serde_json::from_str(&json).unwrap();
        assert_eq!(back.cross_post_results["ebay"].listing_id, "ebay_123");
        assert_eq!(back.price, 25.0);
    }

    #[test]
    fn empty_legacy_map_is_omitted() {
        let listing = Listing::new("u1", "Hat", 5.0);
        let json = serde_json::to_string(&listing).unwrap();
        assert!(!json.contains("crossPostResults"));
    }

    #[test]
    fn deserializes_minimal_document() {
        let json = r#"{
            "id": "l1", "ownerId": "u1", "title": "Mug", "price": 3.5,
            "createdAt": 1000, "updatedAt": 1000
        }"#;
        let listing: Listing = serde_json::from_str(json).unwrap();
        assert_eq!(listing.status, ListingStatus::Draft);
        assert!(listing.cross_post_results.is_empty());
    }
}
