// Signet Storage Layer
//
// Signature store interface with pluggable in-memory backends

pub mod trait_;
pub mod memory;
pub mod indexed;

pub use trait_::*;
pub use memory::MemorySignatureStore;
pub use indexed::IndexedSignatureStore;

use signet_core::{Clock, StoreBackend, StoreConfig, SystemClock};

/// Create the store selected by `config`, stamped by the wall clock
pub fn create_signature_store(config: &StoreConfig) -> BoxedSignatureStore {
    create_signature_store_with_clock(config, SystemClock)
}

/// Create the store selected by `config` with a caller-supplied clock
pub fn create_signature_store_with_clock<C>(
    config: &StoreConfig,
    clock: C,
) -> BoxedSignatureStore
where
    C: Clock + 'static,
{
    tracing::info!(backend = %config.backend, "Creating signature store");
    match config.backend {
        StoreBackend::Memory => Box::new(MemorySignatureStore::with_clock(clock)),
        StoreBackend::Indexed => Box::new(IndexedSignatureStore::with_clock(clock)),
    }
}
