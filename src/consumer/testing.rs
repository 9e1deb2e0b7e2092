use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{ClientSettings, Connector, Envelope, MessageSource};
use crate::error::ConsumeError;
use crate::shutdown::ShutdownTrigger;

pub const TOPIC: &str = "orders";

/// Logged by the mock source on close, through the caller's subscriber.
pub const CLOSED_LINE: &str = "mock source closed";

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Connect(ClientSettings),
    Subscribe(String),
    Close,
}

/// Records every call made against the mock broker.
#[derive(Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<Call>>>);

impl Journal {
    fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }
}

pub fn envelope(offset: i64, payload: &[u8]) -> Envelope {
    Envelope {
        payload: Some(payload.to_vec()),
        ..null_envelope(offset)
    }
}

pub fn null_envelope(offset: i64) -> Envelope {
    Envelope {
        topic: TOPIC.to_string(),
        partition: 0,
        offset,
        key: None,
        payload: None,
    }
}

/// Connector handing out a source that replays `script`, then raises
/// `drained` (if set) and blocks.
pub struct MockConnector {
    journal: Journal,
    script: Mutex<Vec<Result<Envelope, ConsumeError>>>,
    drained: Option<ShutdownTrigger>,
    connect_error: Option<String>,
    subscribe_error: Option<String>,
}

impl MockConnector {
    pub fn new(script: Vec<Result<Envelope, ConsumeError>>) -> Self {
        Self {
            journal: Journal::default(),
            script: Mutex::new(script),
            drained: None,
            connect_error: None,
            subscribe_error: None,
        }
    }

    pub fn cancel_when_drained(mut self, trigger: ShutdownTrigger) -> Self {
        self.drained = Some(trigger);
        self
    }

    pub fn failing_connect(mut self, msg: &str) -> Self {
        self.connect_error = Some(msg.to_string());
        self
    }

    pub fn failing_subscribe(mut self, msg: &str) -> Self {
        self.subscribe_error = Some(msg.to_string());
        self
    }

    pub fn journal(&self) -> Journal {
        self.journal.clone()
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn connect(
        &self,
        settings: &ClientSettings,
    ) -> Result<Box<dyn MessageSource>, ConsumeError> {
        self.journal.push(Call::Connect(settings.clone()));

        if let Some(msg) = &self.connect_error {
            return Err(ConsumeError::Connect(msg.clone()));
        }

        let script = std::mem::take(&mut *self.script.lock().unwrap());
        Ok(Box::new(MockSource {
            journal: self.journal.clone(),
            script: script.into(),
            drained: self.drained.clone(),
            subscribe_error: self.subscribe_error.clone(),
        }))
    }
}

struct MockSource {
    journal: Journal,
    script: VecDeque<Result<Envelope, ConsumeError>>,
    drained: Option<ShutdownTrigger>,
    subscribe_error: Option<String>,
}

#[async_trait]
impl MessageSource for MockSource {
    async fn subscribe(&mut self, topic: &str) -> Result<(), ConsumeError> {
        self.journal.push(Call::Subscribe(topic.to_string()));

        match &self.subscribe_error {
            Some(msg) => Err(ConsumeError::Subscribe(msg.clone())),
            None => Ok(()),
        }
    }

    async fn recv(&mut self) -> Result<Envelope, ConsumeError> {
        if let Some(next) = self.script.pop_front() {
            return next;
        }

        if let Some(trigger) = &self.drained {
            trigger.cancel();
        }
        std::future::pending().await
    }

    async fn close(&mut self) -> Result<(), ConsumeError> {
        self.journal.push(Call::Close);
        tracing::info!("{}", CLOSED_LINE);
        Ok(())
    }
}
