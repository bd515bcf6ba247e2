//! Init command - creates a configuration file and starter rule.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use sift_core::prelude::*;

use crate::CONFIG_FILENAME;
use crate::ui::{self, print_command_header};

const STARTER_RULE_FILE: &str = "aws-access-key.toml";

const STARTER_RULE: &str = r#"ruleName = "AWSAccessKey"
language = "Python"
library = "boto3"
example = "AKIA1234567890ABCDEF"
secretPattern = 'AKIA[0-9A-Z]{16}'
"#;

/// Executes the `sift init` command.
pub fn run(force: bool, output: Option<PathBuf>) -> super::Result {
    print_command_header("init");

    let config_path = output.unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));

    if config_path.exists() && !force {
        anyhow::bail!("'{}' already exists (use --force to overwrite)", config_path.display());
    }

    let config = Config::new();
    config.save(&config_path)?;
    ui::print_info(&format!("wrote {}", config_path.display()));

    let rules_dir = config_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
        .join(&config.rules_dir);

    if rules_dir.exists() {
        ui::print_info(&format!("rules directory '{}' already exists", rules_dir.display()));
    } else {
        std::fs::create_dir_all(&rules_dir)
            .with_context(|| format!("failed to create rules directory '{}'", rules_dir.display()))?;
        std::fs::write(rules_dir.join(STARTER_RULE_FILE), STARTER_RULE)
            .with_context(|| format!("failed to write starter rule in '{}'", rules_dir.display()))?;
        ui::print_info(&format!("wrote {}", rules_dir.join(STARTER_RULE_FILE).display()));
    }

    println!();
    println!("  Next steps:");
    println!("    sift rules        Review the loaded rules");
    println!("    sift scan         Scan the working directory");
    println!();

    Ok(())
}
