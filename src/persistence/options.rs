//! Codec options

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use super::PersistenceError;

/// Text encoding used for document files and stream sniffing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextEncoding {
    #[default]
    Utf8,
    /// ISO-8859-1. Characters above U+00FF cannot be written.
    Latin1,
}

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

impl TextEncoding {
    /// Decode `bytes`, skipping a leading UTF-8 byte order mark.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Result<Cow<'a, str>, PersistenceError> {
        match self {
            Self::Utf8 => {
                let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
                std::str::from_utf8(bytes)
                    .map(Cow::Borrowed)
                    .map_err(|e| PersistenceError::encoding(format!("Invalid UTF-8: {e}")))
            }
            Self::Latin1 => Ok(Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect())),
        }
    }

    /// Decode `bytes`, replacing anything undecodable.
    pub fn decode_lossy<'a>(&self, bytes: &'a [u8]) -> Cow<'a, str> {
        match self {
            Self::Utf8 => {
                String::from_utf8_lossy(bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes))
            }
            Self::Latin1 => Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }

    pub fn encode(&self, text: String) -> Result<Vec<u8>, PersistenceError> {
        match self {
            Self::Utf8 => Ok(text.into_bytes()),
            Self::Latin1 => text
                .chars()
                .map(|c| {
                    u8::try_from(u32::from(c)).map_err(|_| {
                        PersistenceError::encoding(format!(
                            "Character {c:?} cannot be encoded as Latin-1"
                        ))
                    })
                })
                .collect(),
        }
    }
}

/// Options for reading and writing document files.
///
/// Deserializable so hosts can keep it in their own settings file; missing
/// fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecOptions {
    /// Encoding of document files.
    pub encoding: TextEncoding,
    /// Spaces per indentation level in written files.
    pub indent_size: usize,
    /// Fail the save when the model provider has no registered name
    /// (false = omit the `Provider` attribute).
    pub strict_provider_names: bool,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            encoding: TextEncoding::Utf8,
            indent_size: 2,
            strict_provider_names: true,
        }
    }
}
