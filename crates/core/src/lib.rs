pub mod catalog;
pub mod commands;
pub mod config;
pub mod images;
pub mod import;
pub mod projection;
pub mod repository;
pub mod testing;

pub use catalog::{
    is_preferred, CatalogEntry, CatalogFeed, CatalogStore, SqliteCatalogStore, StoreError,
};
pub use commands::{create_command_queue, CommandError, CommandHandle, CommandWorker};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use images::{AssetListing, DirectoryAssets, ImageResolver};
pub use import::{resolve_import_path, ImportError, ImportOutcome, ImportPipeline, ImportReport};
pub use projection::{
    AdminError, AdminView, Bucket, BucketCounts, CatalogCard, CatalogFilter, CatalogView,
    DetailView, EntryDetail,
};
pub use repository::CatalogRepository;
