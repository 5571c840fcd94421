//! Picks the record and image stores from the configuration.

use anyhow::{Context, Result};
use odc_core::config::AdminConfig;
use odc_core::image::ImageStore;
use odc_core::store::{load_records, LocalStore, RecordStore, Records};
use odc_core::City;
use odc_provider_supabase::SupabaseStore;
use tracing::debug;

pub enum Store {
    Supabase(SupabaseStore),
    Local(LocalStore),
}

pub struct Backend {
    config: AdminConfig,
    store: Store,
}

impl Backend {
    pub fn load() -> Result<Self> {
        let config = AdminConfig::load().context("Failed to load configuration")?;
        Self::from_config(config)
    }

    pub fn from_config(config: AdminConfig) -> Result<Self> {
        let store = match &config.supabase {
            Some(supabase) => Store::Supabase(
                SupabaseStore::new(supabase).context("Failed to set up the Supabase client")?,
            ),
            None => Store::Local(LocalStore::new(config.data_path())),
        };
        debug!(remote = matches!(store, Store::Supabase(_)), "backend selected");

        Ok(Backend { config, store })
    }

    pub fn config(&self) -> &AdminConfig {
        &self.config
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn records(&self) -> &dyn RecordStore {
        match &self.store {
            Store::Supabase(s) => s,
            Store::Local(s) => s,
        }
    }

    /// Remote image storage, if the backend has one.
    pub fn images(&self) -> Option<&dyn ImageStore> {
        match &self.store {
            Store::Supabase(s) => Some(s as &dyn ImageStore),
            Store::Local(_) => None,
        }
    }

    pub fn default_city(&self) -> Option<City> {
        self.config.default_city
    }

    pub async fn load_records(&self) -> Records {
        load_records(self.records()).await
    }

    /// Short description for status output.
    pub fn describe(&self) -> String {
        match &self.store {
            Store::Supabase(s) => format!("Supabase ({}, bucket {})", self.supabase_url(), s.bucket()),
            Store::Local(s) => format!("local file {}", s.path().display()),
        }
    }

    fn supabase_url(&self) -> &str {
        self.config
            .supabase
            .as_ref()
            .map(|s| s.url.as_str())
            .unwrap_or_default()
    }
}
