//! CLI command handlers.

/// Project initialisation and `.sift.toml` creation.
pub mod init;
/// Rule listing and inspection.
pub mod rules;
/// Corpus scanning against the loaded rule set.
pub mod scan;

use std::path::Path;

use anyhow::Context as _;
use sift_core::prelude::*;

use crate::CONFIG_FILENAME;

/// Convenience alias for command return types.
pub type Result<T = ()> = anyhow::Result<T>;

/// Loads configuration from the given path, or `.sift.toml` in the working
/// directory when none is specified. A missing file yields the defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = path.unwrap_or(Path::new(CONFIG_FILENAME));
    Config::load(path).context("loading configuration")
}

/// Loads rules from `dir`, surfacing a warning for every skipped definition.
pub fn load_rules_with_warnings(dir: &Path) -> Result<LoadedRules> {
    let loaded = load_rules(dir)?;

    for skipped in &loaded.skipped {
        crate::ui::print_warning(&format!(
            "skipping rule from '{}': {}",
            skipped.source.display(),
            skipped.reason
        ));
    }

    Ok(loaded)
}
