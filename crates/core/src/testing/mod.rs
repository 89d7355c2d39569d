//! Testing utilities: an in-memory catalog store and fixtures.
//!
//! # Example
//!
//! ```rust,ignore
//! use biocatalog_core::testing::{fixtures, MockCatalogStore};
//!
//! let store = Arc::new(MockCatalogStore::new());
//! let repository = CatalogRepository::new(store.clone());
//! repository.insert_many(&fixtures::mixed_catalog())?;
//!
//! // Make the next import fail at the storage step
//! store.set_fail_writes(true);
//! ```

mod mock_catalog_store;

pub use mock_catalog_store::MockCatalogStore;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::CatalogEntry;
    use crate::config::DEFAULT_HOUSE_SOURCE;

    pub const HOUSE_SOURCE: &str = DEFAULT_HOUSE_SOURCE;

    /// Import file with one entry per bucket, one inactive entry and one
    /// unusable element.
    pub const SAMPLE_IMPORT_JSON: &str = r#"[
        {
            "id": "amoxil-500",
            "brandName": "Amoxil",
            "activeIngredient": "Amoxicillin",
            "category": "Antibiotic",
            "dosage": "500mg",
            "type": "Capsule",
            "price": "12.50",
            "keyFeatures": ["Broad spectrum"],
            "commonSideEffects": ["Nausea", "Rash"]
        },
        {
            "id": "generic-x",
            "brandName": "Generic X",
            "source": "Acme",
            "preferredAffiliate": true,
            "activeIngredient": "Ibuprofen",
            "category": "Analgesic"
        },
        {
            "id": "generic-y",
            "brandName": "Generic Y",
            "source": "Acme",
            "preferredAffiliate": false,
            "activeIngredient": "Paracetamol",
            "category": "Analgesic"
        },
        {
            "id": "retired",
            "brandName": "Retired Syrup",
            "isActive": false
        },
        {
            "id": "",
            "brandName": "No Id"
        }
    ]"#;

    /// Active in-house entry, flagged preferred the way an import would.
    pub fn house_entry(external_id: &str, display_name: &str) -> CatalogEntry {
        CatalogEntry::new(external_id, display_name)
            .with_source(HOUSE_SOURCE)
            .with_preferred_affiliate(true)
    }

    pub fn affiliate_entry(
        external_id: &str,
        display_name: &str,
        source: &str,
        preferred: bool,
    ) -> CatalogEntry {
        CatalogEntry::new(external_id, display_name)
            .with_source(source)
            .with_preferred_affiliate(preferred)
    }

    /// Active entries spread over all three buckets.
    pub fn mixed_catalog() -> Vec<CatalogEntry> {
        let mut amoxil = house_entry("amoxil-500", "Amoxil");
        amoxil.active_ingredient = "Amoxicillin".to_string();
        amoxil.category = "Antibiotic".to_string();

        let mut zyrtec = house_entry("zyrtec-10", "Zyrtec");
        zyrtec.active_ingredient = "Cetirizine".to_string();
        zyrtec.category = "Antihistamine".to_string();

        let mut generic_x = affiliate_entry("generic-x", "Generic X", "Acme", true);
        generic_x.active_ingredient = "Ibuprofen".to_string();

        let mut generic_y = affiliate_entry("generic-y", "Generic Y", "Acme", false);
        generic_y.active_ingredient = "Paracetamol".to_string();

        let generic_z = affiliate_entry("generic-z", "Generic Z", "Other Labs", false);

        vec![amoxil, zyrtec, generic_x, generic_y, generic_z]
    }
}
