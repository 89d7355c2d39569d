use serde::Serialize;

use super::Bucket;
use crate::catalog::{CatalogEntry, CatalogFeed};
use crate::images::ImageResolver;
use crate::repository::CatalogRepository;

/// Everything the detail screen shows for one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryDetail {
    pub entry: CatalogEntry,
    pub bucket: Bucket,
    pub preferred: bool,
    pub gallery: Vec<String>,
}

/// Loads single entries for the end-user detail screen.
///
/// Reads the same active feed as [`super::CatalogView`], so every listed card
/// has a detail.
#[derive(Clone)]
pub struct DetailView {
    feed: CatalogFeed,
    images: ImageResolver,
    house_source: String,
}

impl DetailView {
    pub fn new(
        repository: &CatalogRepository,
        images: ImageResolver,
        house_source: impl Into<String>,
    ) -> Self {
        Self {
            feed: repository.active_entries_feed(),
            images,
            house_source: house_source.into(),
        }
    }

    /// Detail for an active entry. Inactive and unknown ids are `None`.
    ///
    /// With several active rows sharing the external id, the lowest id wins.
    pub fn load(&self, external_id: &str) -> Option<EntryDetail> {
        let entry = self
            .feed
            .borrow()
            .iter()
            .filter(|e| e.external_id == external_id)
            .min_by_key(|e| e.id)
            .cloned()?;

        Some(EntryDetail {
            bucket: Bucket::classify(&entry, &self.house_source),
            preferred: entry.is_preferred(&self.house_source),
            gallery: self.images.gallery(&entry.external_id),
            entry,
        })
    }
}
