use std::any::type_name;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use super::{DecodeError, Decoder};

/// JSON decoder yielding `None` for null, empty and `null` payloads.
pub struct JsonDecoder<T> {
    target: PhantomData<fn() -> T>,
}

impl<T> JsonDecoder<T> {
    pub fn new() -> Self {
        Self {
            target: PhantomData,
        }
    }
}

impl<T> Default for JsonDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DeserializeOwned> Decoder<Option<T>> for JsonDecoder<T> {
    fn decode(&self, payload: Option<&[u8]>) -> Result<Option<T>, DecodeError> {
        let bytes = match payload {
            Some(b) if !b.iter().all(u8::is_ascii_whitespace) => b,
            _ => return Ok(None),
        };

        serde_json::from_slice::<Option<T>>(bytes).map_err(|source| DecodeError::Json {
            target: type_name::<T>(),
            source,
        })
    }
}
