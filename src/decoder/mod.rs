use thiserror::Error;

pub use self::json::JsonDecoder;

mod json;

/// Turns a raw message payload into a typed value.
///
/// `payload` is `None` when the broker delivered a null value.
pub trait Decoder<T> {
    fn decode(&self, payload: Option<&[u8]>) -> Result<T, DecodeError>;
}

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("payload is not valid json for {target}: {source}")]
    Json {
        target: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
