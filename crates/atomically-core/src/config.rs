use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::document::OutputOptions;

/// Project configuration loaded from `.atomically.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AtomicallyConfig {
    pub output: OutputOptions,
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".atomically.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<AtomicallyConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: AtomicallyConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# atomically configuration
output:
  format: yaml          # yaml | json
  sort_keys: false      # emit mapping keys in sorted order
  keep_extension: true  # keep the x-atomically block in the generated document
"#
}
