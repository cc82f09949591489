//! Listing sort order value object.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order in which search results are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Most recently created first.
    #[default]
    Newest,
    /// Most booked first.
    BookingCount,
    /// Cheapest first.
    PriceAsc,
    /// Most expensive first.
    PriceDesc,
}

impl SortKey {
    /// Parses the wire value of a sort key.
    ///
    /// Unrecognised values fall back to [`SortKey::Newest`] rather than failing.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Self {
        match raw {
            "booking" => Self::BookingCount,
            "price-inc" => Self::PriceAsc,
            "price-des" => Self::PriceDesc,
            _ => Self::Newest,
        }
    }

    /// The canonical wire value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Newest => "new",
            Self::BookingCount => "booking",
            Self::PriceAsc => "price-inc",
            Self::PriceDesc => "price-des",
        }
    }

    #[must_use]
    pub const fn all() -> [Self; 4] {
        [Self::Newest, Self::BookingCount, Self::PriceAsc, Self::PriceDesc]
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_keys_round_trip() {
        for key in SortKey::all() {
            assert_eq!(SortKey::parse_lenient(key.as_str()), key);
        }
    }

    #[test]
    fn test_unknown_key_falls_back_to_newest() {
        assert_eq!(SortKey::parse_lenient("random"), SortKey::Newest);
        assert_eq!(SortKey::parse_lenient(""), SortKey::Newest);
        assert_eq!(SortKey::parse_lenient("PRICE-INC"), SortKey::Newest);
    }
}
