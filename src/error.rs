use thiserror::Error;

/// Failures when reading a nonce back from its decimal form.
///
/// Generating a nonce never fails; these only surface at the parsing boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NonceError {
    #[error("nonce string is empty")]
    Empty,

    #[error("invalid digit {found:?} at position {position}")]
    InvalidDigit { position: usize, found: char },

    #[error("nonce must not have leading zeros")]
    LeadingZero,

    #[error("nonce exceeds u64::MAX")]
    Overflow,
}

pub type Result<T> = std::result::Result<T, NonceError>;
