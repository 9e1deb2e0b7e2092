use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use kafka::client::KafkaClient;
use kafka::consumer::{Consumer, FetchOffset, GroupOffsetStorage};
use tokio::sync::Mutex;
use tokio::task;
use tracing::debug;

use super::{ClientSettings, Connector, Envelope, MessageSource};
use crate::error::ConsumeError;

/// Opens group consumers on a Kafka cluster.
pub struct KafkaConnector;

#[async_trait]
impl Connector for KafkaConnector {
    async fn connect(
        &self,
        settings: &ClientSettings,
    ) -> Result<Box<dyn MessageSource>, ConsumeError> {
        debug!("loading cluster metadata; brokers={:?}", settings.brokers);

        let brokers = settings.brokers.clone();
        let client_id = settings.client_id.clone();
        let client = task::spawn_blocking(move || {
            let mut client = KafkaClient::new(brokers);
            client.set_client_id(client_id);
            client.load_metadata_all().map(|_| client)
        })
        .await
        .map_err(|e| ConsumeError::Connect(e.to_string()))?
        .map_err(|e| ConsumeError::Connect(e.to_string()))?;

        Ok(Box::new(KafkaMessageSource::new(client, settings.clone())))
    }
}

/// Group consumer over a single topic.
///
/// Polling happens on the blocking pool; fetched messages are buffered and
/// marked consumed only when handed out by `recv`.
pub struct KafkaMessageSource {
    client: Option<KafkaClient>,
    settings: ClientSettings,
    consumer: Arc<Mutex<Option<Consumer>>>,
    pending: VecDeque<Envelope>,
    closed: bool,
}

impl KafkaMessageSource {
    fn new(client: KafkaClient, settings: ClientSettings) -> Self {
        Self {
            client: Some(client),
            settings,
            consumer: Arc::new(Mutex::new(None)),
            pending: VecDeque::new(),
            closed: false,
        }
    }
}

#[async_trait]
impl MessageSource for KafkaMessageSource {
    async fn subscribe(&mut self, topic: &str) -> Result<(), ConsumeError> {
        if self.closed {
            return Err(ConsumeError::Closed);
        }
        let client = self
            .client
            .take()
            .ok_or_else(|| ConsumeError::Subscribe("already subscribed".to_string()))?;

        debug!("subscribing; topic={}, group={}", topic, self.settings.group);

        let settings = self.settings.clone();
        let topic = topic.to_string();
        let consumer = task::spawn_blocking(move || {
            Consumer::from_client(client)
                .with_topic(topic)
                .with_group(settings.group)
                .with_fallback_offset(FetchOffset::Earliest)
                .with_offset_storage(GroupOffsetStorage::Kafka)
                .with_fetch_max_wait_time(settings.fetch_max_wait)
                .create()
        })
        .await
        .map_err(|e| ConsumeError::Subscribe(e.to_string()))?
        .map_err(|e| ConsumeError::Subscribe(e.to_string()))?;

        *self.consumer.lock().await = Some(consumer);
        Ok(())
    }

    async fn recv(&mut self) -> Result<Envelope, ConsumeError> {
        loop {
            if let Some(next) = self.pending.front() {
                let mut guard = self.consumer.lock().await;
                let consumer = guard.as_mut().ok_or(ConsumeError::Closed)?;
                consumer
                    .consume_message(&next.topic, next.partition, next.offset)
                    .map_err(|e| ConsumeError::Receive(e.to_string()))?;
                drop(guard);

                if let Some(envelope) = self.pending.pop_front() {
                    return Ok(envelope);
                }
            }

            debug!("fetching messagesets");

            let consumer = self.consumer.clone();
            let batch = task::spawn_blocking(move || poll_batch(&consumer))
                .await
                .map_err(|e| ConsumeError::Receive(e.to_string()))??;

            debug!("fetched {} messages", batch.len());
            self.pending.extend(batch);
        }
    }

    async fn close(&mut self) -> Result<(), ConsumeError> {
        self.closed = true;
        self.client = None;
        self.pending.clear();

        let consumer = self.consumer.clone();
        task::spawn_blocking(move || {
            let taken = consumer.blocking_lock().take();
            match taken {
                Some(mut c) => c
                    .commit_consumed()
                    .map_err(|e| ConsumeError::Close(e.to_string())),
                None => Ok(()),
            }
        })
        .await
        .map_err(|e| ConsumeError::Close(e.to_string()))?
    }
}

/// Commits what was handed out so far, then fetches the next batch.
fn poll_batch(consumer: &Mutex<Option<Consumer>>) -> Result<Vec<Envelope>, ConsumeError> {
    let mut guard = consumer.blocking_lock();
    let consumer = guard.as_mut().ok_or(ConsumeError::Closed)?;

    consumer
        .commit_consumed()
        .map_err(|e| ConsumeError::Receive(e.to_string()))?;

    let mss = consumer
        .poll()
        .map_err(|e| ConsumeError::Receive(e.to_string()))?;

    let mut batch = Vec::new();
    for ms in mss.iter() {
        let topic = ms.topic();
        let partition = ms.partition();
        batch.extend(ms.messages().iter().map(|m| Envelope {
            topic: topic.to_string(),
            partition,
            offset: m.offset,
            key: non_empty(m.key),
            payload: non_empty(m.value),
        }));
    }

    Ok(batch)
}

// kafka does not distinguish a null field from an empty one
fn non_empty(bytes: &[u8]) -> Option<Vec<u8>> {
    if bytes.is_empty() {
        None
    } else {
        Some(bytes.to_vec())
    }
}
