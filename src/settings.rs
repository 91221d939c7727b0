//! Layered settings: optional TOML file, then `P2CAVE_*` environment variables.

use std::collections::HashMap;
use std::path::Path;

use config::{Config, ConfigError, Environment, File, FileFormat};
use p2cave_data::catalog::Catalog;
use p2cave_types::{ObjectFlags, ObjectInfo, ObjectKind};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// `env_logger` filter string, e.g. `info` or `p2cave_data=debug`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Extra catalog rows keyed by internal class name.
    #[serde(default)]
    pub objects: HashMap<String, ObjectSettings>,
}

fn default_log_level() -> String {
    "info".into()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BurialSetting {
    Partial,
    Full,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectSettings {
    pub name: String,
    pub kind: ObjectKind,
    #[serde(default)]
    pub disambiguator: String,
    #[serde(default)]
    pub burial: Option<BurialSetting>,
    #[serde(default)]
    pub regional: bool,
    #[serde(default)]
    pub cargo: Vec<String>,
}

impl ObjectSettings {
    pub fn to_info(&self) -> ObjectInfo {
        let mut flags = match self.burial {
            Some(BurialSetting::Partial) => ObjectFlags::PARTIALLY_BURIED,
            Some(BurialSetting::Full) => ObjectFlags::FULLY_BURIED,
            None => ObjectFlags::empty(),
        };
        flags.set(ObjectFlags::REGIONAL, self.regional);
        ObjectInfo {
            display_name: self.name.clone(),
            kind: self.kind,
            disambiguator: self.disambiguator.clone(),
            flags,
            cargo: self.cargo.iter().map(|c| c.to_ascii_lowercase()).collect(),
        }
    }
}

impl Settings {
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }
        builder
            .add_source(
                Environment::with_prefix("P2CAVE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    /// Add or override catalog rows from the `objects` table.
    pub fn extend_catalog(&self, catalog: &mut Catalog) {
        for (class, object) in &self.objects {
            if catalog.insert(class, object.to_info()).is_some() {
                log::debug!("settings override catalog class `{class}`");
            }
        }
    }
}
