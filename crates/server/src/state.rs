use biocatalog_core::{
    AdminView, CatalogRepository, CatalogView, CommandHandle, Config, DetailView, ImageResolver,
    SanitizedConfig,
};

/// Shared application state
pub struct AppState {
    config: Config,
    repository: CatalogRepository,
    images: ImageResolver,
    catalog: CatalogView,
    detail: DetailView,
    admin: AdminView,
}

impl AppState {
    pub fn new(config: Config, repository: CatalogRepository, commands: CommandHandle) -> Self {
        let images = ImageResolver::from_config(&config.images);
        Self::with_images(config, repository, commands, images)
    }

    /// Build state with a custom image resolver.
    pub fn with_images(
        config: Config,
        repository: CatalogRepository,
        commands: CommandHandle,
        images: ImageResolver,
    ) -> Self {
        let house = config.catalog.house_source.clone();
        Self {
            catalog: CatalogView::new(&repository, images.clone(), house.clone()),
            detail: DetailView::new(&repository, images.clone(), house.clone()),
            admin: AdminView::new(&repository, commands, house),
            config,
            repository,
            images,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn repository(&self) -> &CatalogRepository {
        &self.repository
    }

    pub fn images(&self) -> &ImageResolver {
        &self.images
    }

    pub fn catalog(&self) -> &CatalogView {
        &self.catalog
    }

    pub fn detail(&self) -> &DetailView {
        &self.detail
    }

    pub fn admin(&self) -> &AdminView {
        &self.admin
    }
}
