//! Core enums shared by the listing, channel, and sync crates.

use std::{
    fmt,
    time::{SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};

/// External marketplace a listing can be cross-posted to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ebay,
    Facebook,
    Poshmark,
}

impl Platform {
    /// All platforms the system knows about, in registration order.
    pub const ALL: [Platform; 3] = [Platform::Ebay, Platform::Facebook, Platform::Poshmark];

    /// Parse a platform name as it appears on the wire (webhook paths,
    /// publish requests). Returns `None` for anything unrecognized —
    /// callers surface this as a structured "Unsupported platform" result.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "ebay" => Some(Self::Ebay),
            "facebook" => Some(Self::Facebook),
            "poshmark" => Some(Self::Poshmark),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ebay => "ebay",
            Self::Facebook => "facebook",
            Self::Poshmark => "poshmark",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of an internal listing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    #[default]
    Draft,
    Active,
    Sold,
    Archived,
}

impl ListingStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Sold => "sold",
            Self::Archived => "archived",
        }
    }
}

/// Status of a listing's live copy on one platform.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChannelStatus {
    #[default]
    Active,
    Ended,
    Archived,
}

impl ChannelStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Ended => "ended",
            Self::Archived => "archived",
        }
    }

    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "active" => Some(Self::Active),
            "ended" => Some(Self::Ended),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }
}

/// Current time as epoch milliseconds.
#[must_use]
pub fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_parse_known() {
        assert_eq!(Platform::parse("ebay"), Some(Platform::Ebay));
        assert_eq!(Platform::parse("facebook"), Some(Platform::Facebook));
        assert_eq!(Platform::parse("poshmark"), Some(Platform::Poshmark));
    }

    #[test]
    fn platform_parse_unknown() {
        assert_eq!(Platform::parse("etsy"), None);
        assert_eq!(Platform::parse("EBAY"), None);
        assert_eq!(Platform::parse(""), None);
    }

    #[test]
    fn platform_display_roundtrip() {
        for p in Platform::ALL {
            assert_eq!(Platform::parse(p.as_str()), Some(p));
        }
    }

    #[test]
    fn platform_serde_lowercase() {
        let json = serde_json::to_string(&Platform::Ebay).unwrap();
        assert_eq!(json, "\"ebay\"");
        let back: Platform = serde_json::from_str("\"poshmark\"").unwrap();
        assert_eq!(back, Platform::Poshmark);
    }

    #[test]
    fn listing_status_default_is_draft() {
        assert_eq!(ListingStatus::default(), ListingStatus::Draft);
    }

    #[test]
    fn channel_status_parse() {
        assert_eq!(ChannelStatus::parse("ended"), Some(ChannelStatus::Ended));
        assert_eq!(ChannelStatus::parse("gone"), None);
    }
}
