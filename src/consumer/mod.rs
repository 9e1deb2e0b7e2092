use async_trait::async_trait;

use crate::error::ConsumeError;

pub use self::config::{ClientSettings, Config, DecodeFailure};
pub use self::kafka_client::KafkaConnector;
pub use self::service::ConsumerService;

mod config;
mod kafka_client;
mod service;

#[cfg(test)]
pub mod testing;

/// A message as delivered by the broker.
#[derive(Clone, Debug, PartialEq)]
pub struct Envelope {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    pub key: Option<Vec<u8>>,
    pub payload: Option<Vec<u8>>,
}

#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(
        &self,
        settings: &ClientSettings,
    ) -> Result<Box<dyn MessageSource>, ConsumeError>;
}

/// A connected group consumer.
///
/// `recv` must be cancel-safe: a dropped `recv` future leaves every message
/// it did not return uncommitted.
#[async_trait]
pub trait MessageSource: Send {
    async fn subscribe(&mut self, topic: &str) -> Result<(), ConsumeError>;
    async fn recv(&mut self) -> Result<Envelope, ConsumeError>;
    async fn close(&mut self) -> Result<(), ConsumeError>;
}
