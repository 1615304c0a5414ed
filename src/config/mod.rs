mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    apply_env(&mut config);
    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./config.toml",
        "./passsync.toml",
        "~/.config/passsync/config.toml",
        "/etc/passsync/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    // No file found; env vars alone can still carry the remote credentials
    let mut config = Config::default();
    apply_env(&mut config);
    validate_config(&config)?;
    Ok(config)
}

/// Overlay remote credentials from the environment.
///
/// `SUPABASE_URL` and `SUPABASE_KEY` take precedence over the config file so
/// secrets can stay out of it. Read once at startup.
fn apply_env(config: &mut Config) {
    if let Ok(url) = std::env::var("SUPABASE_URL") {
        if !url.is_empty() {
            config.remote.url = url;
        }
    }
    if let Ok(key) = std::env::var("SUPABASE_KEY") {
        if !key.is_empty() {
            config.remote.api_key = key;
        }
    }
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    if config.schedule.interval_mins == 0 {
        anyhow::bail!("Sync interval cannot be 0 minutes");
    }

    if config.remote.url.is_empty() {
        anyhow::bail!("Remote URL is not set (config [remote].url or SUPABASE_URL)");
    }
    if config.remote.api_key.is_empty() {
        anyhow::bail!("Remote API key is not set (config [remote].api_key or SUPABASE_KEY)");
    }

    // The capture pipeline may not have produced these yet; warn, don't fail
    if !config.local.db_path.exists() {
        tracing::warn!("Pass database does not exist: {:?}", config.local.db_path);
    }
    if !config.local.images_dir.exists() {
        tracing::warn!("Images directory does not exist: {:?}", config.local.images_dir);
    }

    Ok(())
}
