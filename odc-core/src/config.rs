//! Configuration at ~/.config/odc-admin/config.toml

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::city::City;
use crate::constants::IMAGE_BUCKET;
use crate::error::{OdcError, OdcResult};

static DEFAULT_DATA_PATH: &str = "~/.local/share/odc-admin/records.json";

fn default_data_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_PATH)
}

fn is_default_data_path(p: &PathBuf) -> bool {
    *p == default_data_path()
}

fn default_bucket() -> String {
    IMAGE_BUCKET.to_string()
}

/// Connection to the hosted backend.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
    #[serde(default = "default_bucket")]
    pub bucket: String,
}

/// Settings for the admin CLI.
///
/// Without a `[supabase]` table, records are kept in the local JSON file at
/// `data_path`. Any value can be overridden from the environment with an
/// `ODC_` prefix and `__` between levels, e.g. `ODC_SUPABASE__ANON_KEY`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AdminConfig {
    #[serde(default = "default_data_path", skip_serializing_if = "is_default_data_path")]
    pub data_path: PathBuf,

    /// City the calendar views start on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_city: Option<City>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supabase: Option<SupabaseConfig>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        AdminConfig {
            data_path: default_data_path(),
            default_city: None,
            supabase: None,
        }
    }
}

impl AdminConfig {
    pub fn config_path() -> OdcResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| OdcError::Config("Could not determine config directory".into()))?
            .join("odc-admin");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, writing a commented template first if
    /// there is no config file yet.
    pub fn load() -> OdcResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> OdcResult<Self> {
        if !path.exists() {
            Self::create_default_config(path)?;
        }

        let config = Self::read(path, true)?;
        debug!(path = %path.display(), remote = config.supabase.is_some(), "config loaded");
        Ok(config)
    }

    fn read(path: &Path, with_environment: bool) -> OdcResult<Self> {
        let mut builder = Config::builder().add_source(File::from(path).required(false));
        if with_environment {
            builder = builder.add_source(
                Environment::with_prefix("ODC")
                    .prefix_separator("_")
                    .separator("__"),
            );
        }

        builder
            .build()
            .map_err(|e| OdcError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| OdcError::Config(e.to_string()))
    }

    /// Store `city` as the default in the file at `path`. Values coming from
    /// the environment are not written back.
    pub fn set_default_city(path: &Path, city: Option<City>) -> OdcResult<Self> {
        let mut config = Self::read(path, false)?;
        config.default_city = city;
        config.save_to(path)?;
        Ok(config)
    }

    /// Save to `path`, replacing the template comments.
    pub fn save_to(&self, path: &Path) -> OdcResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| OdcError::Config(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| OdcError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a config file with every option commented out.
    pub fn create_default_config(path: &Path) -> OdcResult<()> {
        let contents = format!(
            "\
# odc-admin configuration

# Local records file, used when no [supabase] table is set:
# data_path = \"{}\"

# City the calendar starts on (rabat, agadir, benmisk, sidimaarouf):
# default_city = \"rabat\"

# Hosted backend:
# [supabase]
# url = \"https://your-project.supabase.co\"
# anon_key = \"...\"
# bucket = \"{}\"
",
            DEFAULT_DATA_PATH, IMAGE_BUCKET
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                OdcError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| OdcError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// `data_path` with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_path.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    /// `data_path` as configured, keeping `~`.
    pub fn display_data_path(&self) -> &Path {
        &self.data_path
    }
}
