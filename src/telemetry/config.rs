use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogsFormat {
    Full,
    Compact,
    Pretty,
    Json,
}

fn default_format() -> LogsFormat {
    LogsFormat::Full
}

fn default_level() -> String {
    "info".to_string()
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    pub svc_name: String,
    #[serde(default = "default_format")]
    pub format: LogsFormat,
    /// Filter directives used when `RUST_LOG` is not set.
    #[serde(default = "default_level")]
    pub level: String,
}
