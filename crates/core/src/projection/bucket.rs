use serde::{Deserialize, Serialize};

use crate::catalog::CatalogEntry;

/// Catalog section an entry is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    House,
    PreferredAffiliate,
    Other,
}

impl Bucket {
    pub const ALL: [Bucket; 3] = [Bucket::House, Bucket::PreferredAffiliate, Bucket::Other];

    /// House source first, then the stored preferred flag, else other.
    pub fn classify(entry: &CatalogEntry, house_source: &str) -> Self {
        if entry.is_house(house_source) {
            Bucket::House
        } else if entry.is_preferred_affiliate {
            Bucket::PreferredAffiliate
        } else {
            Bucket::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::House => "house",
            Bucket::PreferredAffiliate => "preferred_affiliate",
            Bucket::Other => "other",
        }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of entries in each bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketCounts {
    pub house: usize,
    pub preferred_affiliate: usize,
    pub other: usize,
}

impl BucketCounts {
    pub fn tally<'a>(
        entries: impl IntoIterator<Item = &'a CatalogEntry>,
        house_source: &str,
    ) -> Self {
        let mut counts = Self::default();
        for entry in entries {
            match Bucket::classify(entry, house_source) {
                Bucket::House => counts.house += 1,
                Bucket::PreferredAffiliate => counts.preferred_affiliate += 1,
                Bucket::Other => counts.other += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.house + self.preferred_affiliate + self.other
    }
}

/// Case-insensitive substring search over name, ingredient and category.
///
/// A blank query matches everything.
pub fn matches_search(entry: &CatalogEntry, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    [
        &entry.display_name,
        &entry.active_ingredient,
        &entry.category,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&needle))
}
