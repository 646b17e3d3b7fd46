use serde::Deserialize;
use serde::Serialize;

use crate::TextEncoding;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct CodecConfig {
    /// Encoding used for outbound messages and inbound payloads
    #[serde(default)]
    pub encoding: TextEncoding,
}
