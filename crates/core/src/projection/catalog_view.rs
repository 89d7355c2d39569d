use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{matches_search, Bucket, BucketCounts};
use crate::catalog::{CatalogEntry, CatalogFeed};
use crate::images::ImageResolver;
use crate::repository::CatalogRepository;

/// Which cards to show.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFilter {
    /// `None` lists every bucket.
    #[serde(default)]
    pub bucket: Option<Bucket>,
    #[serde(default, alias = "q")]
    pub query: String,
}

impl CatalogFilter {
    pub fn bucket(bucket: Bucket) -> Self {
        Self {
            bucket: Some(bucket),
            query: String::new(),
        }
    }

    pub fn search(query: impl Into<String>) -> Self {
        Self {
            bucket: None,
            query: query.into(),
        }
    }
}

/// Card shown in the catalog grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogCard {
    pub external_id: String,
    pub display_name: String,
    pub source: String,
    pub active_ingredient: String,
    pub category: String,
    pub dosage: String,
    pub bucket: Bucket,
    pub thumbnail: Option<String>,
}

/// End-user catalog over the active entries.
#[derive(Clone)]
pub struct CatalogView {
    feed: CatalogFeed,
    images: ImageResolver,
    house_source: String,
}

impl CatalogView {
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

    /// Current active entries in store order.
    pub fn snapshot(&self) -> Arc<Vec<CatalogEntry>> {
        Arc::clone(&self.feed.borrow())
    }

    /// Cards matching the filter, in store order.
    pub fn entries(&self, filter: &CatalogFilter) -> Vec<CatalogCard> {
        self.snapshot()
            .iter()
            .filter(|entry| {
                filter
                    .bucket
                    .is_none_or(|b| Bucket::classify(entry, &self.house_source) == b)
            })
            .filter(|entry| matches_search(entry, &filter.query))
            .map(|entry| self.card(entry))
            .collect()
    }

    pub fn bucket_counts(&self) -> BucketCounts {
        BucketCounts::tally(self.snapshot().iter(), &self.house_source)
    }

    pub fn card(&self, entry: &CatalogEntry) -> CatalogCard {
        CatalogCard {
            external_id: entry.external_id.clone(),
            display_name: entry.display_name.clone(),
            source: entry.source.clone(),
            active_ingredient: entry.active_ingredient.clone(),
            category: entry.category.clone(),
            dosage: entry.dosage.clone(),
            bucket: Bucket::classify(entry, &self.house_source),
            thumbnail: self.images.thumbnail(&entry.external_id),
        }
    }

    /// Treat the current entries as seen, so [`Self::changed`] waits for the
    /// next write.
    pub fn mark_seen(&mut self) {
        self.feed.mark_unchanged();
    }

    /// Wait for the next change to the active entries.
    ///
    /// Returns `false` once the store has gone away.
    pub async fn changed(&mut self) -> bool {
        self.feed.changed().await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::StaticAssets;
    use crate::testing::{fixtures, MockCatalogStore};

    fn view(store: Arc<MockCatalogStore>, assets: &[&str]) -> (CatalogView, CatalogRepository) {
        let repository = CatalogRepository::new(store);
        let images = ImageResolver::new(
            Arc::new(StaticAssets::new(assets.iter().copied())),
            vec!["svg".to_string(), "png".to_string()],
            3,
        );
        (
            CatalogView::new(&repository, images, fixtures::HOUSE_SOURCE),
            repository,
        )
    }

    #[test]
    fn test_inactive_entries_hidden() {
        let (view, repository) = view(Arc::new(MockCatalogStore::new()), &[]);
        repository
            .insert_many(&[
                fixtures::house_entry("med1", "Amoxil"),
                fixtures::house_entry("med2", "Zyrtec").with_active(false),
            ])
            .unwrap();

        let cards = view.entries(&CatalogFilter::default());
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].external_id, "med1");
    }

    #[test]
    fn test_filter_by_bucket() {
        let (view, repository) = view(Arc::new(MockCatalogStore::new()), &[]);
        repository.insert_many(&fixtures::mixed_catalog()).unwrap();

        let house = view.entries(&CatalogFilter::bucket(Bucket::House));
        let preferred = view.entries(&CatalogFilter::bucket(Bucket::PreferredAffiliate));
        let other = view.entries(&CatalogFilter::bucket(Bucket::Other));

        assert!(house.iter().all(|c| c.bucket == Bucket::House));
        assert!(preferred.iter().all(|c| c.bucket == Bucket::PreferredAffiliate));
        assert!(other.iter().all(|c| c.bucket == Bucket::Other));
        assert_eq!(
            house.len() + preferred.len() + other.len(),
            view.entries(&CatalogFilter::default()).len()
        );
        assert_eq!(view.bucket_counts().house, house.len());
    }

    #[test]
    fn test_search_within_bucket() {
        let (view, repository) = view(Arc::new(MockCatalogStore::new()), &[]);
        repository.insert_many(&fixtures::mixed_catalog()).unwrap();

        let filter = CatalogFilter {
            bucket: Some(Bucket::House),
            query: "amox".to_string(),
        };
        let cards = view.entries(&filter);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].display_name, "Amoxil");
    }

    #[test]
    fn test_card_thumbnail() {
        let (view, repository) = view(Arc::new(MockCatalogStore::new()), &["med1-1.png"]);
        repository
            .insert_many(&[
                fixtures::house_entry("med1", "Amoxil"),
                fixtures::house_entry("med2", "Zyrtec"),
            ])
            .unwrap();

        let cards = view.entries(&CatalogFilter::default());
        assert_eq!(cards[0].thumbnail.as_deref(), Some("med1-1.png"));
        assert_eq!(cards[1].thumbnail, None);
    }

    #[tokio::test]
    async fn test_changed_after_write() {
        let (mut view, repository) = view(Arc::new(MockCatalogStore::new()), &[]);
        assert!(view.entries(&CatalogFilter::default()).is_empty());

        repository.insert(&fixtures::house_entry("med1", "Amoxil")).unwrap();

        assert!(view.changed().await);
        assert_eq!(view.entries(&CatalogFilter::default()).len(), 1);
    }

    #[tokio::test]
    async fn test_mark_seen_waits_for_next_write() {
        let (view, repository) = view(Arc::new(MockCatalogStore::new()), &[]);
        repository.insert(&fixtures::house_entry("med1", "Amoxil")).unwrap();

        let mut copy = view.clone();
        copy.mark_seen();
        let pending =
            tokio::time::timeout(std::time::Duration::from_millis(20), copy.changed()).await;
        assert!(pending.is_err());

        repository.insert(&fixtures::house_entry("med2", "Zyrtec")).unwrap();
        assert!(copy.changed().await);
        assert_eq!(copy.entries(&CatalogFilter::default()).len(), 2);
    }

    #[test]
    fn test_filter_query_alias() {
        let filter: CatalogFilter =
            serde_json::from_str(r#"{"bucket":"other","q":"zyr"}"#).unwrap();
        assert_eq!(filter.bucket, Some(Bucket::Other));
        assert_eq!(filter.query, "zyr");
    }
}
