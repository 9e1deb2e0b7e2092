use thiserror::Error;

use crate::decoder::DecodeError;

#[derive(Error, Debug)]
pub enum ConsumeError {
    #[error("connect to brokers: {0:?}")]
    Connect(String),

    #[error("subscribe to topic: {0:?}")]
    Subscribe(String),

    #[error("receive message: {0:?}")]
    Receive(String),

    #[error("close consumer: {0:?}")]
    Close(String),

    #[error("consumer is closed")]
    Closed,

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("encode decoded value: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ConsumeError {
    pub fn kind(&self) -> &'static str {
        match self {
            ConsumeError::Connect(_) => "connect",
            ConsumeError::Subscribe(_) => "subscribe",
            ConsumeError::Receive(_) | ConsumeError::Closed => "receive",
            ConsumeError::Close(_) => "close",
            ConsumeError::Decode(_) => "decode",
            ConsumeError::Encode(_) => "encode",
        }
    }
}
