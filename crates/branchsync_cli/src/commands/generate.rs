//! `--generate-config`: write the configuration template.

use std::path::Path;

use crate::config::{Config, ConfigError};

/// Write the template to `path` unless a file is already there.
pub(crate) fn handle_generate(path: &Path) -> Result<(), ConfigError> {
    if Config::write_template(path)? {
        tracing::info!("Default config written to {}", path.display());
    } else {
        tracing::warn!(
            "Config file already exists at '{}', skipping generation",
            path.display()
        );
    }
    Ok(())
}
