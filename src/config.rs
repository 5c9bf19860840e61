//! Dataset configuration.
//!
//! [`DataSetConfig::load`] reads the `[dataset]` section of
//! `config/config.toml` and overlays `LIFEGUARD_DATASET__*` environment
//! variables, e.g. `LIFEGUARD_DATASET__DIALECT=mysql`.

use crate::catalog::CatalogProvider;
use crate::datatype::{DataTypeFactory, Dialect};
use crate::metadata::{DatabaseTableMetaData, KeyOrder};
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::sync::Arc;

const CONFIG_FILE: &str = "config/config.toml";
const ENV_PREFIX: &str = "LIFEGUARD";
const SECTION: &str = "dataset";

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct DataSetConfig {
    /// Selects the data type factory
    #[serde(default)]
    pub dialect: Dialect,
    /// Catalog schema qualifier; `None` uses the provider's default
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default)]
    pub primary_key_order: KeyOrder,
}

impl DataSetConfig {
    /// Load the dataset configuration from `config/config.toml`, falling back to env vars.
    ///
    /// A missing `[dataset]` section yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

        let settings = match builder.build() {
            Ok(cfg) => cfg,
            Err(err) => {
                // Unreadable file: warn and retry with env only
                if std::path::Path::new(CONFIG_FILE).exists() {
                    log::warn!("failed to load {}, falling back to env: {}", CONFIG_FILE, err);
                }
                Config::builder()
                    .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
                    .build()
                    .map_err(|env_err| {
                        ConfigError::Message(format!(
                            "Failed to load configuration from file and env: {}, then env-only error: {}",
                            err, env_err
                        ))
                    })?
            }
        };

        Self::from_settings(&settings)
    }

    /// Parse a TOML document holding a `[dataset]` section.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Self::from_settings(&settings)
    }

    fn from_settings(settings: &Config) -> Result<Self, ConfigError> {
        match settings.get::<DataSetConfig>(SECTION) {
            Ok(config) => Ok(config),
            Err(ConfigError::NotFound(_)) => Ok(Self::default()),
            Err(e) => Err(ConfigError::Message(format!(
                "Dataset configuration could not be loaded from file or environment: {}",
                e
            ))),
        }
    }

    pub fn data_type_factory(&self) -> Arc<dyn DataTypeFactory> {
        Arc::from(self.dialect.data_type_factory())
    }

    /// Lazily extracted schema of `table_name`, resolved with this
    /// configuration's dialect, schema qualifier and key order.
    pub fn table_meta_data(
        &self,
        table_name: &str,
        catalog: Arc<dyn CatalogProvider>,
    ) -> DatabaseTableMetaData {
        DatabaseTableMetaData::new(table_name, catalog, self.data_type_factory())
            .with_schema(self.schema.clone())
            .with_key_order(self.primary_key_order)
    }
}
