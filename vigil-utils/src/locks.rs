//! Synchronous lock aliases.
//!
//! All session state is guarded by blocking locks; nothing inside them
//! suspends, so the non-poisoning `parking_lot` primitives are used
//! throughout instead of the std variants.

/// A synchronous, non-poisoning mutex.
pub type SyncMutex<T> = parking_lot::Mutex<T>;

/// A synchronous, non-poisoning reader-writer lock.
pub type SyncRwLock<T> = parking_lot::RwLock<T>;
