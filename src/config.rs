use std::env;
use std::path::Path;

use anyhow::Result;
use serde::Deserialize;

use crate::{consumer, telemetry};

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(rename = "KafkaConfig")]
    pub kafka: consumer::Config,
    pub telemetry: telemetry::Config,
}

pub const DEFAULT_CONFIG: &str = include_str!("../config.yaml");

/// Read from the working directory unless `CONFIG_PATH` is set.
pub const CONFIG_FILE: &str = "config.yaml";
pub const CONFIG_PATH_ENV: &str = "CONFIG_PATH";

impl Config {
    /// Loads `CONFIG_PATH` through pepe-config when set, otherwise the
    /// required `./config.yaml`. Both overlay the embedded defaults.
    ///
    /// Environment overrides do not reach `KafkaConfig`: `config` lowercases
    /// environment keys and this section is matched case-sensitively.
    pub fn load() -> Result<Self> {
        if env::var_os(CONFIG_PATH_ENV).is_some() {
            return Ok(pepe_config::load(DEFAULT_CONFIG, pepe_config::FileFormat::Yaml)?);
        }
        Self::load_from(Path::new(CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let cfg = ::config::Config::builder()
            .add_source(::config::File::from_str(DEFAULT_CONFIG, ::config::FileFormat::Yaml))
            .add_source(
                ::config::File::from(path)
                    .format(::config::FileFormat::Yaml)
                    .required(true),
            )
            .build()?
            .try_deserialize()?;
        Ok(cfg)
    }
}
