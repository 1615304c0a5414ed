use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub local: LocalConfig,

    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub schedule: ScheduleConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LocalConfig {
    /// SQLite database written by the capture pipeline
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Flat directory of rendered pass images
    #[serde(default = "default_images_dir")]
    pub images_dir: PathBuf,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("/home/pi/raspberry-noaa-v2/db/panel.db")
}
fn default_images_dir() -> PathBuf {
    PathBuf::from("/srv/images")
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            images_dir: default_images_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemoteConfig {
    /// Supabase project URL (or SUPABASE_URL env var)
    #[serde(default)]
    pub url: String,

    /// Service key sent as apikey / bearer token (or SUPABASE_KEY env var)
    #[serde(default)]
    pub api_key: String,

    /// Per-request timeout in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScheduleConfig {
    /// Minutes between sync cycles (default: 15)
    #[serde(default = "default_interval_mins")]
    pub interval_mins: u64,
}

fn default_interval_mins() -> u64 {
    15
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_mins: default_interval_mins(),
        }
    }
}
