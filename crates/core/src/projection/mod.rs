//! Read-side projections of the catalog.
//!
//! [`CatalogView`] and [`DetailView`] serve the end-user catalog (active
//! entries only). [`AdminView`] sees every entry and routes its mutations
//! through the command queue.

mod admin;
mod bucket;
mod catalog_view;
mod detail;

pub use admin::{AdminError, AdminView};
pub use bucket::{matches_search, Bucket, BucketCounts};
pub use catalog_view::{CatalogCard, CatalogFilter, CatalogView};
pub use detail::{DetailView, EntryDetail};
