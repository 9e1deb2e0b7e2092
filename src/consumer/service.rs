use std::marker::PhantomData;

use serde::Serialize;
use tracing::instrument::WithSubscriber;
use tracing::{debug, error, info, warn, Dispatch};

use super::{Config, Connector, DecodeFailure, Envelope, MessageSource};
use crate::decoder::Decoder;
use crate::error::ConsumeError;
use crate::shutdown::Shutdown;

/// Why the consumer stopped.
#[derive(Debug)]
pub enum Stop {
    NotConfigured,
    Cancelled,
    Faulted(ConsumeError),
}

/// Subscribes to the configured topic and logs every message decoded as `T`.
pub struct ConsumerService<T, D> {
    cfg: Config,
    connector: Box<dyn Connector>,
    decoder: D,
    log: Dispatch,
    decoded: PhantomData<fn() -> T>,
}

impl<T, D> ConsumerService<T, D>
where
    T: Serialize + Default,
    D: Decoder<T> + Send + Sync,
{
    pub fn new(cfg: Config, connector: Box<dyn Connector>, decoder: D, log: Dispatch) -> Self {
        Self {
            cfg,
            connector,
            decoder,
            log,
            decoded: PhantomData,
        }
    }

    /// Runs until `shutdown` is raised or the first fault.
    pub async fn run(&self, shutdown: Shutdown) -> Stop {
        let log = self.log.clone();
        self.consume(shutdown).with_subscriber(log).await
    }

    async fn consume(&self, mut shutdown: Shutdown) -> Stop {
        info!("starting to consume messages from kafka");

        if !self.cfg.is_configured() {
            error!("kafka is not configured; set KafkaConfig.Url and KafkaConfig.Topic");
            return Stop::NotConfigured;
        }

        info!("bootstrap servers = {}", self.cfg.url);
        info!("topic = {}", self.cfg.topic);

        let mut source = match self.connector.connect(&self.cfg.client_settings()).await {
            Ok(s) => s,
            Err(e) => return fault(e),
        };

        let polled = match source.subscribe(&self.cfg.topic).await {
            Ok(()) => self.poll(source.as_mut(), &mut shutdown).await,
            Err(e) => Err(e),
        };

        let closed = source.close().await;

        let stop = match polled {
            Ok(()) => {
                warn!("consumer execution cancelled");
                Stop::Cancelled
            }
            Err(e) => fault(e),
        };

        if let Err(e) = closed {
            error!(kind = e.kind(), "failed to close consumer: {}", e);
        }

        stop
    }

    /// Returns `Ok` once cancelled.
    async fn poll(
        &self,
        source: &mut dyn MessageSource,
        shutdown: &mut Shutdown,
    ) -> Result<(), ConsumeError> {
        loop {
            let envelope = tokio::select! {
                biased;
                _ = shutdown.cancelled() => return Ok(()),
                received = source.recv() => received?,
            };

            self.handle(envelope)?;
        }
    }

    fn handle(&self, envelope: Envelope) -> Result<(), ConsumeError> {
        debug!(
            partition = envelope.partition,
            offset = envelope.offset,
            key = ?envelope.key,
            "message received"
        );

        let value = match self.decoder.decode(envelope.payload.as_deref()) {
            Ok(v) => v,
            Err(e) => match self.cfg.decode_failure {
                DecodeFailure::Null => {
                    debug!(
                        partition = envelope.partition,
                        offset = envelope.offset,
                        "decoding failed, using default value: {}",
                        e
                    );
                    T::default()
                }
                DecodeFailure::Skip => {
                    error!(
                        partition = envelope.partition,
                        offset = envelope.offset,
                        "skipping message: {}",
                        e
                    );
                    return Ok(());
                }
                DecodeFailure::Fail => return Err(e.into()),
            },
        };

        info!("message read: {}", serde_json::to_string(&value)?);
        Ok(())
    }
}

fn fault(e: ConsumeError) -> Stop {
    error!(kind = e.kind(), "consumer stopped on error: {}", e);
    Stop::Faulted(e)
}
