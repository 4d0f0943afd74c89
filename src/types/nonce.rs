use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{NonceError, Result};

/// A single issued nonce.
///
/// Rendered as plain base-10 digits: no sign, no separators, no leading zeros.
/// Serializes as a JSON string because APIs take it as a request parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Nonce(u64);

impl Nonce {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u64 {
        self.0
    }

    pub fn from_string(value: &str) -> Result<Self> {
        if value.is_empty() {
            return Err(NonceError::Empty);
        }

        let mut parsed = 0_u64;
        for (position, found) in value.char_indices() {
            let digit = found
                .to_digit(10)
                .ok_or(NonceError::InvalidDigit { position, found })?;
            parsed = parsed
                .checked_mul(10)
                .and_then(|scaled| scaled.checked_add(u64::from(digit)))
                .ok_or(NonceError::Overflow)?;
        }

        if value.len() > 1 && value.starts_with('0') {
            return Err(NonceError::LeadingZero);
        }

        Ok(Self(parsed))
    }
}

impl From<u64> for Nonce {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Nonce> for u64 {
    fn from(value: Nonce) -> Self {
        value.0
    }
}

impl Display for Nonce {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Nonce {
    type Err = NonceError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_string(s)
    }
}

impl Serialize for Nonce {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNonce {
    Text(String),
    Number(u64),
}

impl<'de> Deserialize<'de> for Nonce {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawNonce::deserialize(deserializer)? {
            RawNonce::Text(value) => Self::from_string(&value).map_err(D::Error::custom),
            RawNonce::Number(value) => Ok(Self(value)),
        }
    }
}
