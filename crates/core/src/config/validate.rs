use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - House source label is not blank
/// - At least one image extension, none blank or dotted
/// - Gallery has at least one slot
/// - Command buffer is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.catalog.house_source.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "catalog.house_source cannot be empty".to_string(),
        ));
    }

    if config.images.extensions.is_empty() {
        return Err(ConfigError::ValidationError(
            "images.extensions must list at least one extension".to_string(),
        ));
    }

    if let Some(bad) = config
        .images
        .extensions
        .iter()
        .find(|ext| ext.trim().is_empty() || ext.starts_with('.'))
    {
        return Err(ConfigError::ValidationError(format!(
            "images.extensions contains invalid entry {:?} (use bare extensions like \"png\")",
            bad
        )));
    }

    if config.images.gallery_slots == 0 {
        return Err(ConfigError::ValidationError(
            "images.gallery_slots cannot be 0".to_string(),
        ));
    }

    if config.commands.buffer_size == 0 {
        return Err(ConfigError::ValidationError(
            "commands.buffer_size cannot be 0".to_string(),
        ));
    }

    Ok(())
}
