//! Text <-> wire byte conversion.
//!
//! The wire carries raw text with no length prefix or delimiter. What a single
//! socket read returns is decoded and handed over as one message.

use serde::Deserialize;
use serde::Serialize;

/// Substitute for characters (outbound) or bytes (inbound) outside ASCII.
const ASCII_REPLACEMENT: u8 = b'?';

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextEncoding {
    /// 7-bit ASCII, anything else is replaced by `?`
    #[default]
    Ascii,
    /// UTF-8, invalid inbound sequences are replaced by U+FFFD
    Utf8,
}

impl TextEncoding {
    pub fn encode(
        &self,
        message: &str,
    ) -> Vec<u8> {
        match self {
            TextEncoding::Ascii => message
                .chars()
                .map(|c| if c.is_ascii() { c as u8 } else { ASCII_REPLACEMENT })
                .collect(),
            TextEncoding::Utf8 => message.as_bytes().to_vec(),
        }
    }

    pub fn decode(
        &self,
        bytes: &[u8],
    ) -> String {
        match self {
            TextEncoding::Ascii => bytes
                .iter()
                .map(|&b| if b.is_ascii() { b as char } else { ASCII_REPLACEMENT as char })
                .collect(),
            TextEncoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        }
    }
}
