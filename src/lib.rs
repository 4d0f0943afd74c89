//! Strictly increasing nonces for signing API requests.
//!
//! [`get_nonce`] draws from one process-wide counter. Clients that want their
//! own sequence, or a clock they control, build an [`EpochNonceGenerator`] or
//! [`CounterNonceGenerator`] and pass it around as a [`NonceGenerator`].
//!
//! Nonces are unique per generator inside one process. Separate processes
//! sharing an API key can still collide.

pub mod clock;
pub mod error;
pub mod generator;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{NonceError, Result};
pub use generator::{get_nonce, CounterNonceGenerator, EpochNonceGenerator, NonceGenerator};
pub use types::Nonce;
