use cstools_core::{CsToolsConfig, CsToolsResult};
use std::path::PathBuf;

/// Load the layered configuration, plus `extra` when given on the command line.
pub fn load_config(extra: Option<PathBuf>) -> CsToolsResult<CsToolsConfig> {
    let config = CsToolsConfig::load_with_file(extra)?;
    apply_display(&config);
    Ok(config)
}

fn apply_display(config: &CsToolsConfig) {
    if !config.display.color {
        colored::control::set_override(false);
    }
}
