use rolekeep_core::{AppError, AppResult, Codec};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// YAML codec for deployments that keep role files as YAML.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlCodec;

impl Codec for YamlCodec {
    fn encode<T: Serialize>(&self, value: &T) -> AppResult<Vec<u8>> {
        serde_yaml::to_string(value)
            .map(String::into_bytes)
            .map_err(|error| AppError::Codec(format!("failed to encode yaml: {error}")))
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> AppResult<T> {
        serde_yaml::from_slice(bytes)
            .map_err(|error| AppError::Codec(format!("failed to decode yaml: {error}")))
    }
}
