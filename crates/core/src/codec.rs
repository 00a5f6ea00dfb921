use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{AppError, AppResult};

/// Encodes values to bytes and decodes them back.
///
/// Role files and serialized roles-of-subject go through a codec, so any
/// self-describing format that agrees on field names can be plugged in.
pub trait Codec: Send + Sync {
    /// Encodes a value into bytes.
    fn encode<T: Serialize>(&self, value: &T) -> AppResult<Vec<u8>>;

    /// Decodes bytes into a value of the requested type.
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> AppResult<T>;
}

/// JSON codec used when callers do not supply one.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> AppResult<Vec<u8>> {
        serde_json::to_vec(value)
            .map_err(|error| AppError::Codec(format!("failed to encode json: {error}")))
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> AppResult<T> {
        serde_json::from_slice(bytes)
            .map_err(|error| AppError::Codec(format!("failed to decode json: {error}")))
    }
}

/// Deserializes an explicit `null` as the type's default value.
///
/// Pair with `#[serde(default, deserialize_with = "null_as_default")]` so a
/// field that is missing and a field that is `null` decode the same way.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
