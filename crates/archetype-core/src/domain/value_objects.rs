//! Small value types: text encodings and the reification state machine.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::domain::DomainError;

// ============================================================================
// Encoding
// ============================================================================

/// Text encoding used to read templates and write rendered files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Encoding {
    #[default]
    Utf8,
    Utf16Le,
    Latin1,
    Ascii,
}

/// Bytes could not be decoded, or text could not be encoded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{encoding}: {message}")]
pub struct CodecError {
    pub encoding: Encoding,
    pub message: String,
}

impl Encoding {
    pub const ALL: [Encoding; 4] = [
        Encoding::Utf8,
        Encoding::Utf16Le,
        Encoding::Latin1,
        Encoding::Ascii,
    ];

    /// Canonical label, accepted back by [`FromStr`].
    pub const fn label(self) -> &'static str {
        match self {
            Self::Utf8 => "utf8",
            Self::Utf16Le => "utf16le",
            Self::Latin1 => "latin1",
            Self::Ascii => "ascii",
        }
    }

    /// Decode `bytes` strictly; invalid input is an error, never replaced.
    pub fn decode(self, bytes: &[u8]) -> Result<String, CodecError> {
        match self {
            Self::Utf8 => String::from_utf8(bytes.to_vec()).map_err(|e| {
                self.error(format!(
                    "invalid byte sequence at offset {}",
                    e.utf8_error().valid_up_to()
                ))
            }),
            Self::Utf16Le => {
                if bytes.len() % 2 != 0 {
                    return Err(self.error("odd number of bytes"));
                }
                let units: Vec<u16> = bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                    .collect();
                String::from_utf16(&units).map_err(|_| self.error("unpaired surrogate"))
            }
            Self::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
            Self::Ascii => match bytes.iter().position(|b| !b.is_ascii()) {
                Some(offset) => Err(self.error(format!("non-ASCII byte at offset {offset}"))),
                None => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
            },
        }
    }

    /// Encode `text` strictly; unrepresentable characters are an error.
    pub fn encode(self, text: &str) -> Result<Vec<u8>, CodecError> {
        match self {
            Self::Utf8 => Ok(text.as_bytes().to_vec()),
            Self::Utf16Le => Ok(text.encode_utf16().flat_map(u16::to_le_bytes).collect()),
            Self::Latin1 => text
                .chars()
                .map(|c| {
                    u8::try_from(u32::from(c))
                        .map_err(|_| self.error(format!("cannot represent {c:?}")))
                })
                .collect(),
            Self::Ascii => match text.chars().find(|c| !c.is_ascii()) {
                Some(c) => Err(self.error(format!("cannot represent {c:?}"))),
                None => Ok(text.as_bytes().to_vec()),
            },
        }
    }

    fn error(self, message: impl Into<String>) -> CodecError {
        CodecError {
            encoding: self,
            message: message.into(),
        }
    }
}

impl FromStr for Encoding {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(Self::Utf8),
            "utf16le" | "utf-16le" | "ucs2" | "ucs-2" => Ok(Self::Utf16Le),
            "latin1" | "binary" | "iso-8859-1" => Ok(Self::Latin1),
            "ascii" | "us-ascii" => Ok(Self::Ascii),
            _ => Err(DomainError::UnsupportedEncoding {
                label: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Reification state machine
// ============================================================================

/// Lifecycle of a single reification.
///
/// ```text
/// Idle -> Validating -> Bootstrapping -> Copying -> Done
///            \               \              \
///             +---------------+--------------+--> Failed
/// ```
///
/// Static copy and template rendering both run inside `Copying`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ReificationState {
    #[default]
    Idle,
    Validating,
    Bootstrapping,
    Copying,
    Done,
    Failed,
}

impl ReificationState {
    /// Whether `self -> next` is an edge of the state machine.
    pub fn can_transition_to(self, next: ReificationState) -> bool {
        use ReificationState::*;
        matches!(
            (self, next),
            (Idle, Validating)
                | (Validating, Bootstrapping)
                | (Bootstrapping, Copying)
                | (Copying, Done)
                | (Idle | Validating | Bootstrapping | Copying, Failed)
        )
    }
}

impl fmt::Display for ReificationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Bootstrapping => "bootstrapping",
            Self::Copying => "copying",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}
