/// Config file loading and creation for the insertrank CLI.
///
/// Config lives at ~/.config/insertrank/config.toml.
/// All fields are optional. CLI args override config values.
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::bail;

#[derive(Debug, Deserialize, Default)]
pub struct InsertrankConfig {
    pub user: Option<String>,
    pub media: Option<String>,
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
    pub label_width: Option<usize>,
}

const DEFAULT_CONFIG_TEMPLATE: &str = "\
# insertrank configuration
# All values here can be overridden by CLI flags.

# AniList user whose completed list is ranked
# user = \"your-name\"

# \"anime\" or \"manga\"
# media = \"anime\"

# AniList GraphQL endpoint
# endpoint = \"https://graphql.anilist.co\"

# HTTP timeout for the list fetch, in seconds
# timeout_secs = 10

# Titles longer than this many characters are shortened in prompts
# label_width = 60
";

/// Returns the default config path: ~/.config/insertrank/config.toml
pub fn config_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| bail("HOME environment variable not set"));
    PathBuf::from(home).join(".config").join("insertrank").join("config.toml")
}

/// Load config from a file path. Returns default (all None) if file doesn't exist.
pub fn load_config(path: &Path) -> InsertrankConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_config(&content)
            .unwrap_or_else(|e| bail(format!("Failed to parse config at {}: {e}", path.display()))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            InsertrankConfig::default()
        }
        Err(e) => bail(format!("Failed to read config at {}: {e}", path.display())),
    }
}

fn parse_config(content: &str) -> Result<InsertrankConfig, toml::de::Error> {
    toml::from_str(content)
}

/// Create the default config file. Errors if it already exists.
pub fn create_default_config() -> PathBuf {
    let path = config_path();

    if path.exists() {
        bail(format!("Config file already exists at {}", path.display()));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .unwrap_or_else(|e| bail(format!("Failed to create directory {}: {e}", parent.display())));
    }

    std::fs::write(&path, DEFAULT_CONFIG_TEMPLATE)
        .unwrap_or_else(|e| bail(format!("Failed to write config to {}: {e}", path.display())));

    path
}
