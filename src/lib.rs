pub mod animation;
pub mod config;
pub mod content;
pub mod error;
pub mod logging;
pub mod resolver;
pub mod theme;

use std::path::Path;

pub use config::RawConfig;
pub use error::{AppError, AppResult};
pub use resolver::{resolve, resolve_with_defaults, ResolveError, ResolvedConfig};

/// Loads `<project_root>/stylecfg.json` and resolves it against the defaults.
pub fn resolve_project(project_root: &Path) -> AppResult<ResolvedConfig> {
    let path = config::project_config_path(project_root);
    tracing::info!(path = %path.display(), "resolving project config");

    let raw = config::load_raw_config(&path)?;
    let resolved = resolve(&raw, project_root)?;

    tracing::info!(
        patterns = resolved.content().patterns().len(),
        colors = resolved.colors().len(),
        animations = resolved.animations().len(),
        "resolution complete"
    );
    Ok(resolved)
}
