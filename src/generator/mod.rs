mod counter;
mod epoch;

use std::sync::Arc;

use crate::types::Nonce;

pub use counter::{get_nonce, CounterNonceGenerator};
pub use epoch::EpochNonceGenerator;

/// Produces strictly increasing nonces.
///
/// Uniqueness holds per generator within one process only. Several processes
/// signing with the same API credential must coordinate on their own.
pub trait NonceGenerator: Send + Sync {
    fn next_nonce(&self) -> Nonce;

    fn get_nonce(&self) -> String {
        self.next_nonce().to_string()
    }
}

impl<G: NonceGenerator + ?Sized> NonceGenerator for Arc<G> {
    fn next_nonce(&self) -> Nonce {
        (**self).next_nonce()
    }
}

impl<G: NonceGenerator + ?Sized> NonceGenerator for &G {
    fn next_nonce(&self) -> Nonce {
        (**self).next_nonce()
    }
}
