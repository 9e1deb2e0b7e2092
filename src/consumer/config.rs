use std::time::Duration;

use pepe_config::DurationString;
use serde::Deserialize;

fn default_client_id() -> String {
    "order-consumer".to_string()
}

fn default_fetch_max_wait() -> DurationString {
    DurationString::from_string("100ms".to_string()).expect("failed to init DurationString")
}

/// What to do with a payload the decoder rejects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeFailure {
    /// Log the default (null) value in place of the message.
    #[default]
    Null,
    /// Log the failure and move on to the next message.
    Skip,
    /// Stop the consumer.
    Fail,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Config {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default = "default_client_id")]
    pub client_id: String,
    #[serde(default = "default_fetch_max_wait")]
    pub fetch_max_wait: DurationString,
    #[serde(default)]
    pub decode_failure: DecodeFailure,
}

/// Everything needed to open a group consumer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientSettings {
    pub brokers: Vec<String>,
    pub group: String,
    pub client_id: String,
    pub fetch_max_wait: Duration,
}

impl Config {
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty() && !self.topic.trim().is_empty()
    }

    pub fn group_id(&self) -> String {
        format!("{}-group-0", self.topic)
    }

    pub fn brokers(&self) -> Vec<String> {
        self.url
            .split(',')
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            brokers: self.brokers(),
            group: self.group_id(),
            client_id: self.client_id.clone(),
            fetch_max_wait: self.fetch_max_wait.clone().into(),
        }
    }
}
