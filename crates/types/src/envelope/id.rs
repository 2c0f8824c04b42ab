use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest id handed out by [`Id::random`]. Ids stay within the integer range
/// that JavaScript-based relays can represent exactly.
const MAX_RANDOM_ID: u64 = (1 << 53) - 1;

/// A JSON-RPC request identifier.
///
/// Relays echo the id back either as a number or as a string. A missing or
/// `null` id decodes to [`Id::None`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    /// Numeric id.
    Number(u64),
    /// String id.
    String(String),
    /// Absent or `null` id.
    #[default]
    None,
}

impl Id {
    /// Generate a fresh random numeric id.
    ///
    /// Ids need not be unique. Responses are paired with requests by the HTTP
    /// exchange that carries them, not by id.
    pub fn random() -> Self {
        Self::Number(uuid::Uuid::new_v4().as_u64_pair().0 & MAX_RANDOM_ID)
    }

    /// True if the id is absent.
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Get the numeric id, if this is a numeric id.
    pub const fn as_number(&self) -> Option<u64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<u64> for Id {
    fn from(n: u64) -> Self {
        Self::Number(n)
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
            Self::None => f.write_str("null"),
        }
    }
}
